//! Periodic health polling worker

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::{debug, info};

use crate::sync::engine::{PollOutcome, SyncEngine};

/// Poller worker options
#[derive(Debug, Clone)]
pub struct Options {
    /// Polling interval
    pub interval: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
        }
    }
}

/// Run the health poller: once immediately, then every `interval` until
/// shutdown. A failed poll never stops the loop.
pub async fn run<S, F>(
    options: &Options,
    engine: &SyncEngine,
    sleep_fn: S,
    mut shutdown_signal: Pin<Box<dyn Future<Output = ()> + Send>>,
) where
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    info!("Health poller starting (every {:?})...", options.interval);

    loop {
        debug!("Polling health...");
        if engine.poll_health().await == PollOutcome::Failed {
            debug!("Health poll failed, keeping last snapshot");
        }

        // Check for shutdown
        tokio::select! {
            _ = &mut shutdown_signal => {
                info!("Health poller shutting down...");
                return;
            }
            _ = sleep_fn(options.interval) => {
                // Continue with poll
            }
        }
    }
}
