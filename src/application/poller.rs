// Periodic refresh loop
use crate::application::refresh_service::RefreshService;
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Spawn a refresh every `period` until `shutdown` resolves. The first tick
/// fires immediately. Cycles are not awaited, so a slow backend never holds
/// back the next tick.
pub async fn run<F>(service: RefreshService, period: Duration, shutdown: F)
where
    F: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    tracing::info!("Polling backend every {:?}", period);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let service = service.clone();
                tokio::spawn(async move {
                    service.refresh().await;
                });
            }
            _ = &mut shutdown => {
                tracing::info!("Poller stopped");
                break;
            }
        }
    }
}
