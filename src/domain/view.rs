// Dashboard view - what the page should show for one refresh cycle
use crate::domain::chart::ChartView;
use crate::domain::reading::{Point, Reading, Stats};
use crate::domain::table::{TableRow, recent_rows};
use crate::domain::window::Window;
use chrono::{DateTime, SecondsFormat};
use serde::Serialize;

pub const PLACEHOLDER: &str = "—";
pub const NO_DATA: &str = "no data";

/// Immutable result of one fetch pass. Missing sections are `None` or empty.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub current: Option<Reading>,
    pub stats: Option<Stats>,
    pub points: Vec<Point>,
    pub window: Window,
    pub minutes: i64,
    pub bucket: String,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub generation: u64,
    pub current: String,
    pub current_ts: String,
    pub stats: String,
    pub chart: ChartView,
    pub rows: Vec<TableRow>,
    pub window: Option<Window>,
    pub minutes: i64,
    pub bucket: String,
    pub errors: Vec<String>,
}

impl DashboardView {
    /// Shown until the first refresh commits.
    pub fn placeholder(minutes: i64, bucket: String) -> Self {
        Self {
            generation: 0,
            current: PLACEHOLDER.to_string(),
            current_ts: PLACEHOLDER.to_string(),
            stats: NO_DATA.to_string(),
            chart: ChartView::default(),
            rows: Vec::new(),
            window: None,
            minutes,
            bucket,
            errors: Vec::new(),
        }
    }
}

impl Snapshot {
    pub fn render(&self, generation: u64, table_rows: usize) -> DashboardView {
        let (current, current_ts) = match &self.current {
            Some(r) => (
                format_temperature(r.temperature_celsius),
                format_timestamp(r.timestamp_ms),
            ),
            None => (PLACEHOLDER.to_string(), PLACEHOLDER.to_string()),
        };

        DashboardView {
            generation,
            current,
            current_ts,
            stats: self
                .stats
                .as_ref()
                .map(format_stats)
                .unwrap_or_else(|| NO_DATA.to_string()),
            chart: ChartView::render(&self.points),
            rows: recent_rows(&self.points, table_rows),
            window: Some(self.window),
            minutes: self.minutes,
            bucket: self.bucket.clone(),
            errors: self.errors.clone(),
        }
    }
}

pub fn format_temperature(celsius: f64) -> String {
    format!("{celsius:.2} °C")
}

/// ISO-8601 UTC with milliseconds, or the raw number when out of range.
pub fn format_timestamp(ms: i64) -> String {
    DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| ms.to_string())
}

pub fn format_stats(st: &Stats) -> String {
    format!(
        "bucket={} count={} min={:.2} max={:.2} avg={:.2}",
        st.bucket, st.count, st.min, st.max, st.avg
    )
}
