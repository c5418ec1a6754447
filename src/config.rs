//! Scrape configuration and the supported-region table.
//!
//! Everything the fetch components need to know about the upstream site
//! lives here as an immutable value passed in at construction. Nothing in
//! this module is mutated after startup.

use std::time::Duration;

/// The 22 administrative regions the CWA county forecast page covers.
///
/// Region names are matched verbatim against page text, so the table uses
/// the site's own spelling (臺, not 台).
pub const TAIWAN_REGIONS: [&str; 22] = [
    "基隆市",
    "新北市",
    "臺北市",
    "桃園市",
    "新竹縣",
    "新竹市",
    "苗栗縣",
    "臺中市",
    "南投縣",
    "彰化縣",
    "雲林縣",
    "嘉義縣",
    "嘉義市",
    "臺南市",
    "高雄市",
    "屏東縣",
    "臺東縣",
    "花蓮縣",
    "宜蘭縣",
    "澎湖縣",
    "金門縣",
    "連江縣",
];

/// Region used when the caller does not name one.
pub const DEFAULT_REGION: &str = "臺北市";

const DEFAULT_SOURCE_URL: &str = "https://www.cwa.gov.tw/V8/C/W/County/index.html";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Check whether a region name (after trimming) is in the supported table.
pub fn is_supported(region: &str) -> bool {
    let trimmed = region.trim();
    TAIWAN_REGIONS.iter().any(|r| *r == trimmed)
}

/// Immutable settings shared by both fetch strategies.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Upstream forecast page.
    pub source_url: String,
    /// User-Agent sent on static fetches.
    pub user_agent: String,
    /// How long to let the rendered page settle before interacting.
    pub render_settle: Duration,
    /// Extra wait after a successful region click.
    pub post_click_wait: Duration,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            render_settle: Duration::from_secs(3),
            post_click_wait: Duration::from_secs(2),
        }
    }
}

impl ScrapeConfig {
    /// Build a config from the environment, falling back to the defaults.
    ///
    /// `RAINWATCH_SOURCE_URL` and `RAINWATCH_USER_AGENT` override the
    /// upstream page and the static-fetch User-Agent.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("RAINWATCH_SOURCE_URL") {
            if !url.trim().is_empty() {
                config.source_url = url;
            }
        }
        if let Ok(ua) = std::env::var("RAINWATCH_USER_AGENT") {
            if !ua.trim().is_empty() {
                config.user_agent = ua;
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_table_size() {
        assert_eq!(TAIWAN_REGIONS.len(), 22);
    }

    #[test]
    fn test_is_supported_exact_and_trimmed() {
        assert!(is_supported("臺北市"));
        assert!(is_supported("  高雄市  "));
        assert!(is_supported(DEFAULT_REGION));
    }

    #[test]
    fn test_is_supported_rejects_variants() {
        // Simplified spelling is not normalized; the site uses 臺.
        assert!(!is_supported("台北市"));
        assert!(!is_supported("Taipei"));
        assert!(!is_supported(""));
    }

    #[test]
    fn test_default_config() {
        let config = ScrapeConfig::default();
        assert!(config.source_url.starts_with("https://www.cwa.gov.tw/"));
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(config.render_settle, Duration::from_secs(3));
        assert_eq!(config.post_click_wait, Duration::from_secs(2));
    }
}
