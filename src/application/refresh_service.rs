// Refresh service - One fetch-and-render cycle per trigger
use crate::application::telemetry_source::{FetchError, TelemetrySource};
use crate::domain::view::{DashboardView, Snapshot};
use crate::domain::window::{Controls, Window};
use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{RwLock, watch};

#[derive(Debug, Clone)]
pub struct RefreshSettings {
    pub default_minutes: i64,
    pub series_limit: usize,
    pub table_rows: usize,
}

/// Fetches current/stats/series, renders them and publishes the result.
///
/// Cycles may overlap: each one takes the next generation number when it
/// starts, and a finished cycle only replaces the published view if no
/// newer cycle has committed in the meantime.
#[derive(Clone)]
pub struct RefreshService {
    source: Arc<dyn TelemetrySource>,
    settings: RefreshSettings,
    controls: Arc<RwLock<Controls>>,
    generation: Arc<AtomicU64>,
    published: Arc<watch::Sender<Arc<DashboardView>>>,
}

impl RefreshService {
    pub fn new(
        source: Arc<dyn TelemetrySource>,
        settings: RefreshSettings,
        controls: Controls,
    ) -> Self {
        let initial = DashboardView::placeholder(
            controls.minutes_or(settings.default_minutes),
            controls.bucket.clone(),
        );
        let (published, _) = watch::channel(Arc::new(initial));

        Self {
            source,
            settings,
            controls: Arc::new(RwLock::new(controls)),
            generation: Arc::new(AtomicU64::new(0)),
            published: Arc::new(published),
        }
    }

    pub fn latest(&self) -> Arc<DashboardView> {
        self.published.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<DashboardView>> {
        self.published.subscribe()
    }

    pub async fn controls(&self) -> Controls {
        self.controls.read().await.clone()
    }

    pub async fn set_controls(&self, controls: Controls) {
        *self.controls.write().await = controls;
    }

    /// Run one full cycle. Returns whether its view was committed.
    pub async fn refresh(&self) -> bool {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let snapshot = self.collect().await;
        let view = snapshot.render(generation, self.settings.table_rows);
        self.commit(view)
    }

    async fn collect(&self) -> Snapshot {
        let mut errors = Vec::new();

        let current = degrade("current", self.source.current().await, &mut errors);

        // Controls and clock are read after the current reading, fresh every cycle
        let controls = self.controls().await;
        // Zero and negative minutes are rejected here too, not passed on as an empty window
        let minutes = controls.minutes_or(self.settings.default_minutes);
        let window = Window::ending_at(Utc::now().timestamp_millis(), minutes);

        tracing::debug!(
            "Fetching stats/series from={} to={} bucket={}",
            window.from_ms,
            window.to_ms,
            controls.bucket
        );

        let stats = degrade(
            "stats",
            self.source.stats(&window, &controls.bucket).await,
            &mut errors,
        );

        let points = degrade(
            "series",
            self.source
                .series(&window, &controls.bucket, self.settings.series_limit)
                .await,
            &mut errors,
        )
        .unwrap_or_default();

        Snapshot {
            current,
            stats,
            points,
            window,
            minutes,
            bucket: controls.bucket,
            errors,
        }
    }

    fn commit(&self, view: DashboardView) -> bool {
        let generation = view.generation;
        let points = view.chart.vertices.len();

        let committed = self.published.send_if_modified(|shown| {
            if generation > shown.generation {
                *shown = Arc::new(view);
                true
            } else {
                false
            }
        });

        if committed {
            tracing::info!("Committed view generation {} ({} points)", generation, points);
        } else {
            tracing::warn!("Discarding stale view generation {}", generation);
        }
        committed
    }
}

/// Failures never leave a refresh; they only blank their own section.
fn degrade<T>(what: &str, result: Result<T, FetchError>, errors: &mut Vec<String>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Error fetching {}: {}", what, e);
            errors.push(format!("{what}: {e}"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reading::{Point, Reading, Stats};
    use crate::domain::view::{NO_DATA, PLACEHOLDER};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    #[derive(Default)]
    struct StubSource {
        fail_current: bool,
        fail_stats: bool,
        fail_series: bool,
        points: Vec<Point>,
        requests: Mutex<Vec<(Window, String, usize)>>,
        gate: Mutex<Option<oneshot::Receiver<()>>>,
    }

    #[async_trait]
    impl TelemetrySource for StubSource {
        async fn current(&self) -> Result<Reading, FetchError> {
            let gate = self.gate.lock().unwrap().take();
            if let Some(rx) = gate {
                let _ = rx.await;
            }
            if self.fail_current {
                return Err(FetchError::Request("no data".into()));
            }
            Ok(Reading::new(1_704_067_200_000, 21.5))
        }

        async fn stats(&self, window: &Window, bucket: &str) -> Result<Stats, FetchError> {
            self.requests
                .lock()
                .unwrap()
                .push((*window, bucket.to_string(), 0));
            if self.fail_stats {
                return Err(FetchError::Parse("expected value".into()));
            }
            Ok(Stats {
                bucket: bucket.to_string(),
                count: 3,
                min: 20.0,
                max: 22.0,
                avg: 21.0,
            })
        }

        async fn series(
            &self,
            window: &Window,
            bucket: &str,
            limit: usize,
        ) -> Result<Vec<Point>, FetchError> {
            self.requests
                .lock()
                .unwrap()
                .push((*window, bucket.to_string(), limit));
            if self.fail_series {
                return Err(FetchError::Request("boom".into()));
            }
            Ok(self.points.clone())
        }
    }

    fn settings() -> RefreshSettings {
        RefreshSettings {
            default_minutes: 180,
            series_limit: 5000,
            table_rows: 50,
        }
    }

    fn service(source: StubSource, controls: Controls) -> (RefreshService, Arc<StubSource>) {
        let source = Arc::new(source);
        (
            RefreshService::new(source.clone(), settings(), controls),
            source,
        )
    }

    #[tokio::test]
    async fn test_refresh_commits_view() {
        let (service, _) = service(
            StubSource {
                points: vec![Point::new(0, 10.0, 1), Point::new(60_000, 12.0, 2)],
                ..Default::default()
            },
            Controls::default(),
        );

        assert_eq!(service.latest().generation, 0);
        assert!(service.refresh().await);

        let view = service.latest();
        assert_eq!(view.generation, 1);
        assert_eq!(view.current, "21.50 °C");
        assert_eq!(view.stats, "bucket=raw count=3 min=20.00 max=22.00 avg=21.00");
        assert_eq!(view.chart.label.as_deref(), Some("min=10.00 max=12.00 n=2"));
        assert_eq!(view.rows.len(), 2);
        assert!(view.errors.is_empty());
    }

    #[tokio::test]
    async fn test_window_and_bucket_passed_through() {
        let (service, source) = service(
            StubSource::default(),
            Controls::new(Some("30".into()), "hour".into()),
        );
        service.refresh().await;

        service
            .set_controls(Controls::new(Some("not a number".into()), "day".into()))
            .await;
        service.refresh().await;

        let requests = source.requests.lock().unwrap().clone();
        assert_eq!(requests.len(), 4);

        let (stats_window, bucket, _) = &requests[0];
        assert_eq!(stats_window.to_ms - stats_window.from_ms, 30 * 60_000);
        assert_eq!(bucket, "hour");
        let (series_window, _, limit) = &requests[1];
        assert_eq!(series_window, stats_window);
        assert_eq!(*limit, 5000);

        let (window, bucket, _) = &requests[2];
        assert_eq!(window.to_ms - window.from_ms, 180 * 60_000);
        assert_eq!(bucket, "day");
        assert!(window.to_ms >= stats_window.to_ms);
        assert_eq!(service.latest().minutes, 180);
    }

    #[tokio::test]
    async fn test_non_positive_minutes_use_default_window() {
        let (service, source) = service(
            StubSource::default(),
            Controls::new(Some("0".into()), "raw".into()),
        );
        service.refresh().await;
        service
            .set_controls(Controls::new(Some("-15".into()), "raw".into()))
            .await;
        service.refresh().await;

        let requests = source.requests.lock().unwrap().clone();
        assert_eq!(requests.len(), 4);
        for (window, _, _) in &requests {
            assert_eq!(window.to_ms - window.from_ms, 180 * 60_000);
        }
        assert_eq!(service.latest().minutes, 180);
    }

    #[tokio::test]
    async fn test_failures_are_isolated() {
        let (service, _) = service(
            StubSource {
                fail_current: true,
                fail_stats: true,
                points: vec![Point::new(0, 1.0, 1)],
                ..Default::default()
            },
            Controls::default(),
        );
        service.refresh().await;

        let view = service.latest();
        assert_eq!(view.current, PLACEHOLDER);
        assert_eq!(view.current_ts, PLACEHOLDER);
        assert_eq!(view.stats, NO_DATA);
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.errors.len(), 2);
        assert!(view.errors[0].starts_with("current:"));
    }

    #[tokio::test]
    async fn test_series_failure_clears_chart_and_table() {
        let (service, _) = service(
            StubSource {
                fail_series: true,
                points: vec![Point::new(0, 1.0, 1)],
                ..Default::default()
            },
            Controls::default(),
        );
        service.refresh().await;

        let view = service.latest();
        assert!(view.chart.is_empty());
        assert!(view.rows.is_empty());
        assert_eq!(view.current, "21.50 °C");
    }

    #[tokio::test]
    async fn test_stale_cycle_is_discarded() {
        let (release, gate) = oneshot::channel();
        let (service, _) = service(
            StubSource {
                gate: Mutex::new(Some(gate)),
                ..Default::default()
            },
            Controls::default(),
        );

        let slow = {
            let service = service.clone();
            tokio::spawn(async move { service.refresh().await })
        };
        // Wait until the slow cycle has taken generation 1 and parked on the gate
        while service.generation.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        assert!(service.refresh().await);
        assert_eq!(service.latest().generation, 2);

        release.send(()).unwrap();
        assert!(!slow.await.unwrap());
        assert_eq!(service.latest().generation, 2);
    }

    #[tokio::test]
    async fn test_subscribers_see_commits() {
        let (service, _) = service(StubSource::default(), Controls::default());
        let mut rx = service.subscribe();

        service.refresh().await;
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().generation, 1);
    }
}
