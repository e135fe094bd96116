// Port for the temperature logger backend
use crate::domain::reading::{Point, Reading, Stats};
use crate::domain::window::Window;
use async_trait::async_trait;

/// Why a backend call produced no data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    /// Transport failure, or a non-success status carrying the response body.
    #[error("request failed: {0}")]
    Request(String),
    /// The response arrived but did not have the expected shape.
    #[error("malformed response: {0}")]
    Parse(String),
}

#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Latest reading (`/api/current`)
    async fn current(&self) -> Result<Reading, FetchError>;

    /// Aggregate over the window (`/api/stats`)
    async fn stats(&self, window: &Window, bucket: &str) -> Result<Stats, FetchError>;

    /// Bucketed points over the window, ascending by time (`/api/series`)
    async fn series(
        &self,
        window: &Window,
        bucket: &str,
        limit: usize,
    ) -> Result<Vec<Point>, FetchError>;
}
