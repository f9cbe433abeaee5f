// Data source
pub const BASE_URL: &str = "https://www.nirfindia.org";

// Year range and the first year the Research listing exists
pub const FIRST_YEAR: u32 = 2020;
pub const LAST_YEAR: u32 = 2025;
pub const RESEARCH_FIRST_YEAR: u32 = 2021;

// Local layout
pub const OUTPUT_DIR: &str = "NIRF";
pub const PART_SUFFIX: &str = "part";

// Timeouts and pacing (milliseconds)
pub const LISTING_TIMEOUT_MS: u64 = 30_000;
pub const DOWNLOAD_TIMEOUTS_MS: &[u64] = &[30_000, 45_000];
pub const REQUEST_DELAY_MS: u64 = 2_000;

// Selectors and patterns
pub const LINK_SELECTOR: &str = "a[href]";
pub const PDF_MARKER: &str = ".pdf";
pub const ENCODED_SPACE: &str = "%20";
pub const UNSAFE_FILENAME_CHARS: &[char] = &['/', '\\', '?', '&', '=', ':', '*', '"', '<', '>', '|'];

pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
