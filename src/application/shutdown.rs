// Shutdown signal shared by the poller and long-lived responses
use tokio::sync::watch;

/// Resolves once `true` is sent, or once the sender is dropped.
pub async fn signalled(mut shutdown: watch::Receiver<bool>) {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            break;
        }
    }
}
