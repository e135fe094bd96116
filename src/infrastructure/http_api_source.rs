// HTTP client for the temperature logger's JSON API
use crate::application::telemetry_source::{FetchError, TelemetrySource};
use crate::domain::reading::{Point, Reading, Stats};
use crate::domain::window::Window;
use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpApiSource {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct CurrentBody {
    temp_c: f64,
    ts_ms: i64,
}

#[derive(Debug, Deserialize)]
struct StatsBody {
    bucket: String,
    count: i64,
    min: f64,
    max: f64,
    avg: f64,
}

#[derive(Debug, Deserialize)]
struct SeriesBody {
    points: Vec<PointBody>,
}

#[derive(Debug, Deserialize)]
struct PointBody {
    t: i64,
    v: f64,
    n: i64,
}

impl HttpApiSource {
    pub fn new(base_url: String, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn range_query(window: &Window, bucket: &str) -> String {
        format!(
            "from={}&to={}&bucket={}",
            window.from_ms,
            window.to_ms,
            urlencoding::encode(bucket)
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path_and_query);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| FetchError::Request(e.to_string()))?;
            // The body is the message; fall back to the status for empty bodies
            return Err(FetchError::Request(if body.is_empty() {
                status.to_string()
            } else {
                body
            }));
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_decode() {
                FetchError::Parse(e.to_string())
            } else {
                FetchError::Request(e.to_string())
            }
        })
    }
}

#[async_trait]
impl TelemetrySource for HttpApiSource {
    async fn current(&self) -> Result<Reading, FetchError> {
        let body: CurrentBody = self.get_json("/api/current").await?;
        Ok(Reading::new(body.ts_ms, body.temp_c))
    }

    async fn stats(&self, window: &Window, bucket: &str) -> Result<Stats, FetchError> {
        let path = format!("/api/stats?{}", Self::range_query(window, bucket));
        let body: StatsBody = self.get_json(&path).await?;
        Ok(Stats {
            bucket: body.bucket,
            count: body.count,
            min: body.min,
            max: body.max,
            avg: body.avg,
        })
    }

    async fn series(
        &self,
        window: &Window,
        bucket: &str,
        limit: usize,
    ) -> Result<Vec<Point>, FetchError> {
        let path = format!(
            "/api/series?{}&limit={}",
            Self::range_query(window, bucket),
            limit
        );
        let body: SeriesBody = self.get_json(&path).await?;

        let points: Vec<Point> = body
            .points
            .into_iter()
            .map(|p| Point::new(p.t, p.v, p.n))
            .collect();

        // The chart maps [first, last] onto the x axis, so order matters
        if let Some(w) = points.windows(2).find(|w| w[1].t < w[0].t) {
            return Err(FetchError::Parse(format!(
                "series out of order: {} after {}",
                w[1].t, w[0].t
            )));
        }

        Ok(points)
    }
}
