//! On-demand refresh worker
//!
//! Commands request refreshes through a [`RefreshTrigger`]; the worker runs
//! each request as its own task so results apply in completion order.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::sync::engine::{Channel, SyncEngine};

/// Sender half of the refresh queue
#[derive(Debug, Clone)]
pub struct RefreshTrigger {
    tx: mpsc::UnboundedSender<Channel>,
}

impl RefreshTrigger {
    /// Create a trigger and the receiver the worker consumes
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Channel>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Request a poll. Returns false when the worker has stopped.
    pub fn request(&self, channel: Channel) -> bool {
        match self.tx.send(channel) {
            Ok(()) => true,
            Err(_) => {
                warn!("Refresh worker is gone, dropping {:?} refresh", channel);
                false
            }
        }
    }
}

/// Run the refresh worker until shutdown or until every trigger is dropped.
/// Polls still in flight at shutdown are awaited, never aborted.
pub async fn run(
    engine: Arc<SyncEngine>,
    mut requests: mpsc::UnboundedReceiver<Channel>,
    mut shutdown_signal: Pin<Box<dyn Future<Output = ()> + Send>>,
) {
    info!("Refresh worker starting...");
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            _ = &mut shutdown_signal => {
                info!("Refresh worker shutting down...");
                break;
            }
            request = requests.recv() => {
                let Some(channel) = request else {
                    info!("Refresh queue closed");
                    break;
                };
                debug!("Refreshing {:?}", channel);
                let engine = engine.clone();
                in_flight.spawn(async move { engine.poll(channel).await });
            }
            Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {
                // Reap finished polls
            }
        }
    }

    while in_flight.join_next().await.is_some() {}
}
