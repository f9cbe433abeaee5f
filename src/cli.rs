use crate::config::ScrapeConfig;
use crate::downloader::scrape_all;
use crate::errors::{AppError, AppResult};
use crate::models::RunSummary;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use tracing::info;

// CLI metadata constants
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
const APP_ABOUT: &str = env!("CARGO_PKG_DESCRIPTION");

fn command() -> Command<'static> {
    Command::new("nirf-scraper")
        .version(APP_VERSION)
        .author(APP_AUTHOR)
        .about(APP_ABOUT)
        .after_help("Without arguments, downloads 2020-2025 for Engineering, Law, Research and Overall into ./NIRF.\nExample:\n  nirf-scraper -c nirf.toml -o data/nirf")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to a TOML config file overriding the built-in defaults")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("output_dir")
                .short('o')
                .long("output-dir")
                .help("Root directory for the year/category tree")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
}

/// Builds the effective configuration from parsed arguments.
///
/// Starts from the defaults, applies the TOML file if given, then the output
/// directory override.
fn resolve_config(matches: &ArgMatches) -> AppResult<ScrapeConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ScrapeConfig::from_toml_file(path)?,
        None => ScrapeConfig::default(),
    };
    if let Some(dir) = matches.get_one::<PathBuf>("output_dir") {
        config.output_dir = dir.clone();
    }
    Ok(config)
}

/// Parses command-line arguments and runs the scrape.
///
/// # Returns
///
/// Returns the run summary. Individual listing or download failures do not make this
/// fail; only configuration errors and directory provisioning errors do.
pub async fn cli() -> AppResult<RunSummary> {
    let matches = command().get_matches();
    let config = resolve_config(&matches)?;

    info!(
        base_url = %config.base_url,
        start_year = config.start_year,
        end_year = config.end_year,
        categories = config.categories.len(),
        output_dir = %config.output_dir.display(),
        "Starting scrape"
    );

    let client = reqwest::Client::builder()
        .user_agent(crate::constants::USER_AGENT)
        .build()
        .map_err(|e| AppError::NetworkError(format!("Failed to build HTTP client: {e}")))?;

    scrape_all(&client, &config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn no_arguments_uses_defaults() {
        let matches = command().try_get_matches_from(vec!["nirf-scraper"]).unwrap();
        let config = resolve_config(&matches).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("NIRF"));
        assert_eq!(config.start_year, 2020);
        assert_eq!(config.end_year, 2025);
    }

    #[test]
    fn output_dir_overrides_config_file() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "output_dir = \"from-file\"\nstart_year = 2024\n").unwrap();
        let config_path = tmp.path().to_string_lossy().to_string();

        let matches = command()
            .try_get_matches_from(vec!["nirf-scraper", "-c", config_path.as_str(), "-o", "from-cli"])
            .unwrap();
        let config = resolve_config(&matches).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("from-cli"));
        assert_eq!(config.start_year, 2024);
    }

    #[test]
    fn missing_config_file_errors() {
        let matches = command()
            .try_get_matches_from(vec!["nirf-scraper", "--config", "does-not-exist.toml"])
            .unwrap();
        assert!(matches!(
            resolve_config(&matches),
            Err(AppError::IoError(_))
        ));
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(command()
            .try_get_matches_from(vec!["nirf-scraper", "--parallel"])
            .is_err());
    }
}
