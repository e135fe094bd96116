// Time window and user controls for a refresh cycle
use serde::Serialize;

pub const DEFAULT_MINUTES: i64 = 180;
pub const DEFAULT_BUCKET: &str = "raw";

const MS_PER_MINUTE: i64 = 60_000;

/// The `[from, to]` range requested from the stats and series endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Window {
    pub from_ms: i64,
    pub to_ms: i64,
}

impl Window {
    /// Window of `minutes` ending at `to_ms`.
    pub fn ending_at(to_ms: i64, minutes: i64) -> Self {
        let span = minutes.saturating_mul(MS_PER_MINUTE);
        Self {
            from_ms: to_ms.saturating_sub(span),
            to_ms,
        }
    }
}

/// User configuration read at the start of every refresh.
///
/// `minutes` is kept as the raw text the user typed so that an invalid
/// entry falls back to the default on each cycle instead of being rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Controls {
    pub minutes: Option<String>,
    pub bucket: String,
}

impl Controls {
    pub fn new(minutes: Option<String>, bucket: String) -> Self {
        Self { minutes, bucket }
    }

    /// Window length in minutes, or `fallback` when the field is unset,
    /// blank, not an integer, or not positive.
    pub fn minutes_or(&self, fallback: i64) -> i64 {
        parse_minutes(self.minutes.as_deref()).unwrap_or(fallback)
    }
}

impl Default for Controls {
    fn default() -> Self {
        Self::new(None, DEFAULT_BUCKET.to_string())
    }
}

fn parse_minutes(raw: Option<&str>) -> Option<i64> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<i64>().ok())
        .filter(|m| *m > 0)
}
