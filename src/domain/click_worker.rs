//! Background worker that applies click increments.
//!
//! Increments are best-effort: each one is retried a few times with jittered
//! exponential backoff and then logged and dropped. Nothing here can affect a
//! redirect response.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;

/// Retries after the first failed increment.
const MAX_RETRIES: usize = 3;

/// Hands a click event to the worker without waiting.
///
/// The queue is the only buffer: when it is full or closed the click is dropped
/// and counted in `shortify_click_failures_total`. Returns `true` if queued.
pub fn enqueue_click(sender: &mpsc::Sender<ClickEvent>, event: ClickEvent) -> bool {
    match sender.try_send(event) {
        Ok(()) => true,
        Err(mpsc::error::TrySendError::Full(event)) => {
            metrics::counter!("shortify_click_failures_total").increment(1);
            warn!(code = %event.code, "Click queue full, click dropped");
            false
        }
        Err(mpsc::error::TrySendError::Closed(event)) => {
            metrics::counter!("shortify_click_failures_total").increment(1);
            warn!(code = %event.code, "Click queue closed, click dropped");
            false
        }
    }
}

/// Consumes click events until every sender is dropped.
///
/// At most `concurrency` increments run at once. Before returning, waits for
/// in-flight increments to finish.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    repository: Arc<dyn LinkRepository>,
    concurrency: usize,
) {
    let concurrency = concurrency.max(1);
    let semaphore = Arc::new(Semaphore::new(concurrency));

    while let Some(event) = rx.recv().await {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };
        let repository = repository.clone();

        tokio::spawn(async move {
            record_click(repository.as_ref(), &event).await;
            drop(permit);
        });
    }

    // Wait for in-flight increments.
    let _ = semaphore.acquire_many(concurrency as u32).await;
    info!("Click queue closed, worker stopped");
}

/// Applies one click increment with retries.
///
/// Returns `true` if the increment was stored.
pub async fn record_click(repository: &dyn LinkRepository, event: &ClickEvent) -> bool {
    let strategy = ExponentialBackoff::from_millis(2)
        .factor(5)
        .max_delay(Duration::from_millis(200))
        .map(jitter)
        .take(MAX_RETRIES);

    match Retry::start(strategy, || repository.increment_clicks(&event.code)).await {
        Ok(()) => {
            debug!(code = %event.code, "Click recorded");
            true
        }
        Err(e) => {
            metrics::counter!("shortify_click_failures_total").increment(1);
            warn!(code = %event.code, error = %e, "Failed to record click");
            false
        }
    }
}
