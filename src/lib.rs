//! nirf-scraper library
//!
//! This crate provides the core functionality for the `nirf-scraper` binary.
//! Implementation and tests live in their modules.
//!
//! ## Overview
//!
//! - [`downloader`] - Builds listing URLs, extracts PDF links and downloads documents
//! - [`layout`] - Creates the `{year}/{category}` directory tree
//! - [`config`] - Scrape configuration with TOML overrides
//! - [`cli`] - Command-line entry point
//! - [`models`] - Categories, links and download outcomes
//! - [`errors`] - Error types used throughout the application
//!
//! ## Example Usage
//!
//! ```no_run
//! use nirf_scraper::{config::ScrapeConfig, downloader, errors::AppResult};
//!
//! # async fn example() -> AppResult<()> {
//! let config = ScrapeConfig {
//!     start_year: 2024,
//!     end_year: 2024,
//!     ..ScrapeConfig::default()
//! };
//! let client = reqwest::Client::new();
//! let summary = downloader::scrape_all(&client, &config).await?;
//! println!("{} file(s) written", summary.written());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod downloader;
pub mod errors;
pub mod layout;
pub mod models;
pub mod ui;
pub mod utils;
