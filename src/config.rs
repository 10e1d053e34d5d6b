use std::time::Duration;

// -----------------------------------------------
// NSE API ENDPOINTS
// -----------------------------------------------
pub const NSE_BASE_URL: &str = "https://www.nseindia.com";
pub const DEFAULT_SYMBOL: &str = "NIFTY";

pub fn nse_option_chain_indices_url(symbol: &str) -> String {
    format!(
        "{}/api/option-chain-indices?symbol={}",
        NSE_BASE_URL,
        urlencoding::encode(symbol)
    )
}

// -----------------------------------------------
// HTTP CLIENT CONFIG
// -----------------------------------------------
// NSE blocks requests that don't look like a browser
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                               AppleWebKit/537.36 (KHTML, like Gecko) \
                               Chrome/58.0.3029.110 Safari/537.3";

pub const ACCEPT_LANGUAGES: &[&str] = &[
    "en-US,en;q=0.9",
    "en-GB,en;q=0.8",
    "en-IN,en;q=0.9",
];

pub const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

// Max characters of an unexpected body kept in error messages
pub const BODY_PREVIEW_CHARS: usize = 200;

// -----------------------------------------------
// VIEW MODEL
// -----------------------------------------------
/// Strikes kept on each side of the at-the-money strike.
pub const WINDOW_RADIUS: usize = 8;

pub const NOT_AVAILABLE: &str = "N/A";

// -----------------------------------------------
// SERVER
// -----------------------------------------------
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STATIC_DIR: &str = "public";
pub const REFRESH_INTERVAL_SECS: u64 = 30;
