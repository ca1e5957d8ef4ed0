//! Recording lifecycle state machine
//!
//! The server owns every transition. The client only classifies states and
//! checks that consecutive observations of the same recording follow a legal
//! path, so that a regression reported by a poll can be logged.

use std::collections::HashMap;

use recorder_api::{Recording, RecordingState};

/// State classification for recordings
pub trait Lifecycle {
    /// `new` or `recording`
    fn is_active(&self) -> bool;

    /// No transition leaves this state
    fn is_terminal(&self) -> bool;

    /// A stop command may be offered for this state
    fn can_stop(&self) -> bool;

    /// Whether the server may move a recording from `self` to `next`
    fn can_transition_to(&self, next: &RecordingState) -> bool;
}

impl Lifecycle for RecordingState {
    fn is_active(&self) -> bool {
        matches!(self, RecordingState::New | RecordingState::Recording)
    }

    fn is_terminal(&self) -> bool {
        matches!(self, RecordingState::Stopped | RecordingState::Error)
    }

    fn can_stop(&self) -> bool {
        matches!(self, RecordingState::Recording)
    }

    fn can_transition_to(&self, next: &RecordingState) -> bool {
        match (self, next) {
            (a, b) if a == b => true,

            // From New
            (RecordingState::New, RecordingState::Recording) => true,
            (RecordingState::New, RecordingState::Stopped) => true,
            (RecordingState::New, RecordingState::Error) => true,

            // From Recording
            (RecordingState::Recording, RecordingState::Stopped) => true,
            (RecordingState::Recording, RecordingState::Error) => true,

            // Unknown states are not judged
            (RecordingState::Unknown(_), _) | (_, RecordingState::Unknown(_)) => true,

            _ => false,
        }
    }
}

/// An observed transition the lifecycle does not allow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Regression {
    pub id: String,
    pub from: RecordingState,
    pub to: RecordingState,
}

/// Last observed state per recording id
#[derive(Debug, Default)]
pub struct LifecycleTracker {
    observed: HashMap<String, RecordingState>,
}

impl LifecycleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the states carried by a polled list and report illegal
    /// transitions. Observations are always recorded; the server is trusted.
    pub fn observe(&mut self, recordings: &[Recording]) -> Vec<Regression> {
        let mut regressions = Vec::new();

        for rec in recordings {
            if let Some(prev) = self.observed.get(&rec.id) {
                if !prev.can_transition_to(&rec.state) {
                    regressions.push(Regression {
                        id: rec.id.clone(),
                        from: prev.clone(),
                        to: rec.state.clone(),
                    });
                }
            }
            self.observed.insert(rec.id.clone(), rec.state.clone());
        }

        regressions
    }

    /// Last observed state of a recording
    pub fn state(&self, id: &str) -> Option<&RecordingState> {
        self.observed.get(id)
    }

    pub fn len(&self) -> usize {
        self.observed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }
}
