// Temperature readings and aggregates as reported by the logger backend

/// Most recent sample from `/api/current`.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub timestamp_ms: i64,
    pub temperature_celsius: f64,
}

impl Reading {
    pub fn new(timestamp_ms: i64, temperature_celsius: f64) -> Self {
        Self {
            timestamp_ms,
            temperature_celsius,
        }
    }
}

/// One aggregated sample of a series. `n` is the number of raw readings
/// folded into this point by the backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub t: i64,
    pub v: f64,
    pub n: i64,
}

impl Point {
    pub fn new(t: i64, v: f64, n: i64) -> Self {
        Self { t, v, n }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
    pub bucket: String,
    pub count: i64,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}
