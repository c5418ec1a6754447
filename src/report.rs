//! Result types returned to callers of the rain resolver.

use serde::{Deserialize, Serialize};

/// Message on a success report when rain is expected.
pub const MSG_RAIN: &str = "rain";

/// Message on a success report when rain is not expected.
pub const MSG_NO_RAIN: &str = "no_rain";

/// Message on an error report: upstream data was unobtainable.
pub const MSG_UNAVAILABLE: &str = "無法從網站獲取真實天氣資料，請稍後再試";

/// Probability at or above which the will-rain signal is set.
pub const RAIN_THRESHOLD: u8 = 50;

/// Outcome of a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Success,
    Error,
}

/// One resolved rain query. Created fresh per request, immutable after
/// construction, never cached.
///
/// Invariants are enforced by the constructors: `will_rain` is present
/// exactly when `rain_probability` is, `will_rain = probability >= 50`,
/// and `status` is `Error` exactly when the probability is absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RainReport {
    pub status: ReportStatus,
    pub rain_probability: Option<u8>,
    pub will_rain: Option<bool>,
    pub message: String,
    pub city: String,
}

impl RainReport {
    /// A successful resolution carrying a probability in [0,100].
    pub fn success(city: impl Into<String>, probability: u8) -> Self {
        let will_rain = probability >= RAIN_THRESHOLD;
        Self {
            status: ReportStatus::Success,
            rain_probability: Some(probability),
            will_rain: Some(will_rain),
            message: if will_rain { MSG_RAIN } else { MSG_NO_RAIN }.to_string(),
            city: city.into(),
        }
    }

    /// A failed resolution: no probability could be obtained.
    pub fn error(city: impl Into<String>) -> Self {
        Self {
            status: ReportStatus::Error,
            rain_probability: None,
            will_rain: None,
            message: MSG_UNAVAILABLE.to_string(),
            city: city.into(),
        }
    }

    /// Whether this report carries a usable probability.
    pub fn is_success(&self) -> bool {
        self.status == ReportStatus::Success
    }
}
