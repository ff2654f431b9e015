use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";
pub const DEFAULT_LISTING_BASE_URL: &str = "https://www.eventbrite.com/d";
pub const DEFAULT_LOCATION: &str = "online--tech";
pub const DEFAULT_DETAIL_DELAY: Duration = Duration::from_secs(12);
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub loki_url: Option<String>,
    pub scrape: ScrapeConfig,
    pub http: HttpConfig,
    pub delivery: DeliveryConfig,
}

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub listing_base_url: String,
    pub default_location: String,
    /// Wait after each detail page, to stay under Eventbrite's bot detection.
    pub detail_delay: Duration,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            listing_base_url: DEFAULT_LISTING_BASE_URL.to_string(),
            default_location: DEFAULT_LOCATION.to_string(),
            detail_delay: DEFAULT_DETAIL_DELAY,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: Duration,
    /// Transient-failure retries on page fetches. Zero means a single GET.
    pub fetch_max_retries: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_HTTP_TIMEOUT,
            fetch_max_retries: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DeliveryConfig {
    /// Used when a tick carries no return URL.
    pub webhook_url: Option<String>,
}
