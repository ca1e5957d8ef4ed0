//! Snapshot synchronization
//!
//! Each poll fetches one collection, replaces the matching snapshot
//! wholesale and renders it. Failures are logged and leave the previous
//! snapshot and its rendering untouched.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use recorder_api::{HealthSnapshot, Recording, RecordingState};

use crate::errors::DashboardError;
use crate::health::{HealthView, DEFAULT_LOAD_SCALE};
use crate::http::recorder::RecorderApi;
use crate::lifecycle::LifecycleTracker;
use crate::render::{sort_newest_first, RenderMode, TableRenderer};
use crate::view::panel::View;

/// Sync engine options
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Multiplier applied to the load average before classification
    pub load_scale: f64,

    /// Discard responses issued before the last applied one
    pub sequence_guard: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            load_scale: DEFAULT_LOAD_SCALE,
            sequence_guard: false,
        }
    }
}

/// Polled collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Health,
    Active,
    History,
}

impl Channel {
    fn index(self) -> usize {
        match self {
            Channel::Health => 0,
            Channel::Active => 1,
            Channel::History => 2,
        }
    }
}

/// Result of a single poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Snapshot replaced and rendered
    Applied,
    /// Fetch failed; previous snapshot kept
    Failed,
    /// Superseded by a later-issued poll (sequence guard only)
    Discarded,
}

/// Poll bookkeeping for one channel
#[derive(Debug, Clone, Default)]
pub struct PollStats {
    pub last_attempted_at: Option<DateTime<Utc>>,
    pub last_applied_at: Option<DateTime<Utc>>,
    pub applied: u64,
    pub failures: u64,
    pub err_streak: u32,
    pub last_error: Option<String>,
    applied_ticket: u64,
}

#[derive(Debug, Default)]
struct EngineState {
    health: Option<HealthSnapshot>,
    active: Vec<Recording>,
    history: Vec<Recording>,
    tracker: LifecycleTracker,
    stats: [PollStats; 3],
}

/// Owner of the known server state
pub struct SyncEngine {
    api: Arc<dyn RecorderApi>,
    view: Arc<dyn View>,
    renderer: TableRenderer,
    options: SyncOptions,
    tickets: [AtomicU64; 3],
    state: RwLock<EngineState>,
}

impl SyncEngine {
    pub fn new(
        api: Arc<dyn RecorderApi>,
        view: Arc<dyn View>,
        renderer: TableRenderer,
        options: SyncOptions,
    ) -> Self {
        Self {
            api,
            view,
            renderer,
            options,
            tickets: Default::default(),
            state: RwLock::new(EngineState::default()),
        }
    }

    /// Poll `GET /health`
    pub async fn poll_health(&self) -> PollOutcome {
        let ticket = self.issue(Channel::Health).await;
        match self.api.health().await {
            Ok(snapshot) => {
                let mut state = self.state.write().await;
                if self.superseded(&state, Channel::Health, ticket) {
                    return PollOutcome::Discarded;
                }
                state.health = Some(snapshot);
                self.view
                    .show_health(HealthView::project(&snapshot, self.options.load_scale));
                mark_applied(&mut state, Channel::Health, ticket);
                debug!(
                    "Health applied: load={} mem={} disk={}",
                    snapshot.load, snapshot.mem_usage, snapshot.disk_usage
                );
                PollOutcome::Applied
            }
            Err(e) => self.fail(Channel::Health, e).await,
        }
    }

    /// Poll `GET /recordings`
    pub async fn poll_active(&self) -> PollOutcome {
        let ticket = self.issue(Channel::Active).await;
        match self.api.recordings().await {
            Ok(list) => self.apply_list(RenderMode::Active, ticket, list).await,
            Err(e) => self.fail(Channel::Active, e).await,
        }
    }

    /// Poll `GET /history`
    pub async fn poll_history(&self) -> PollOutcome {
        let ticket = self.issue(Channel::History).await;
        match self.api.history().await {
            Ok(list) => self.apply_list(RenderMode::Historical, ticket, list).await,
            Err(e) => self.fail(Channel::History, e).await,
        }
    }

    /// Poll a channel
    pub async fn poll(&self, channel: Channel) -> PollOutcome {
        match channel {
            Channel::Health => self.poll_health().await,
            Channel::Active => self.poll_active().await,
            Channel::History => self.poll_history().await,
        }
    }

    /// Last applied health snapshot
    pub async fn health(&self) -> Option<HealthSnapshot> {
        self.state.read().await.health
    }

    /// Last applied active list, newest first
    pub async fn active(&self) -> Vec<Recording> {
        self.state.read().await.active.clone()
    }

    /// Last applied history list, newest first
    pub async fn history(&self) -> Vec<Recording> {
        self.state.read().await.history.clone()
    }

    /// State of a recording in the last applied active list
    pub async fn active_state(&self, id: &str) -> Option<RecordingState> {
        let state = self.state.read().await;
        state
            .active
            .iter()
            .find(|rec| rec.id == id)
            .map(|rec| rec.state.clone())
    }

    /// Poll bookkeeping of a channel
    pub async fn stats(&self, channel: Channel) -> PollStats {
        self.state.read().await.stats[channel.index()].clone()
    }

    async fn issue(&self, channel: Channel) -> u64 {
        let ticket = self.tickets[channel.index()].fetch_add(1, Ordering::SeqCst) + 1;
        let mut state = self.state.write().await;
        state.stats[channel.index()].last_attempted_at = Some(Utc::now());
        ticket
    }

    fn superseded(&self, state: &EngineState, channel: Channel, ticket: u64) -> bool {
        let applied = state.stats[channel.index()].applied_ticket;
        if self.options.sequence_guard && ticket < applied {
            info!(
                "Discarding {:?} response #{} (already applied #{})",
                channel, ticket, applied
            );
            return true;
        }
        false
    }

    async fn apply_list(&self, mode: RenderMode, ticket: u64, mut list: Vec<Recording>) -> PollOutcome {
        let channel = match mode {
            RenderMode::Active => Channel::Active,
            RenderMode::Historical => Channel::History,
        };

        sort_newest_first(&mut list);

        let mut state = self.state.write().await;
        if self.superseded(&state, channel, ticket) {
            return PollOutcome::Discarded;
        }

        for regression in state.tracker.observe(&list) {
            warn!(
                "Recording {} moved from {} to {}",
                regression.id, regression.from, regression.to
            );
        }

        let rows = self.renderer.render(&list, mode);
        match mode {
            RenderMode::Active => {
                self.view.show_active(rows);
                state.active = list;
            }
            RenderMode::Historical => {
                self.view.show_history(rows);
                state.history = list;
            }
        }

        mark_applied(&mut state, channel, ticket);
        debug!("{:?} list applied (poll #{})", channel, ticket);
        PollOutcome::Applied
    }

    async fn fail(&self, channel: Channel, err: DashboardError) -> PollOutcome {
        warn!("{:?} poll failed: {}", channel, err);
        let mut state = self.state.write().await;
        let stats = &mut state.stats[channel.index()];
        stats.failures += 1;
        stats.err_streak += 1;
        stats.last_error = Some(err.to_string());
        PollOutcome::Failed
    }
}

fn mark_applied(state: &mut EngineState, channel: Channel, ticket: u64) {
    let stats = &mut state.stats[channel.index()];
    stats.last_applied_at = Some(Utc::now());
    stats.applied += 1;
    stats.err_streak = 0;
    stats.last_error = None;
    stats.applied_ticket = stats.applied_ticket.max(ticket);
}
