//! Fixed-interval polling loop.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use sltrack_api::TelemetrySource;

use crate::sink::PresenceSink;
use crate::tracker::Tracker;

/// Drive the tracker forever: one refresh immediately, then one per interval.
///
/// A failed tick is logged and the loop moves on; the next tick is
/// independent of it. No jitter or backoff is applied.
pub async fn run<S: TelemetrySource, K: PresenceSink>(
    tracker: &Tracker<S, K>,
    interval: Duration,
) {
    loop {
        match tracker.refresh().await {
            Ok(published) => debug!("refresh published {} devices", published),
            Err(err) => warn!("refresh failed: {}", err),
        }
        sleep(interval).await;
    }
}
