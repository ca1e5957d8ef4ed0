//! Table projection of recording lists

use std::cmp::Ordering;

use serde::Serialize;
use url::Url;

use recorder_api::{Recording, RecordingState};

use crate::lifecycle::Lifecycle;
use crate::timefmt::TimeFormatter;

/// Length of the displayed identifier prefix
pub const SHORT_ID_LEN: usize = 8;

/// Which table is being rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    Active,
    Historical,
}

/// Stop control of a row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StopAffordance {
    /// Interactive; stops the recording with this id
    Enabled,
    /// Shown but inert
    Disabled,
    /// Not shown (historical rows)
    Absent,
}

/// State glyph of a row. Unrecognized states show their raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateTag {
    pub state: String,
    pub glyph: String,
}

impl StateTag {
    pub fn of(state: &RecordingState) -> Self {
        let glyph = match state {
            RecordingState::Recording => "🔴",
            RecordingState::New => "🟡",
            RecordingState::Stopped => "✅",
            other => other.as_str(),
        };
        Self {
            state: state.as_str().to_string(),
            glyph: glyph.to_string(),
        }
    }
}

/// One rendered table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub id: String,
    pub download: String,
    pub stop: StopAffordance,
    pub short_id: String,
    pub device_name: String,
    pub state: StateTag,
    pub timestamp: String,
}

/// First [`SHORT_ID_LEN`] characters of an identifier
pub fn short_id(id: &str) -> String {
    id.chars().take(SHORT_ID_LEN).collect()
}

/// Sort by `created_at`, newest first. The sort is stable; absent timestamps
/// sort as zero.
pub fn sort_newest_first(recordings: &mut [Recording]) {
    recordings.sort_by(|a, b| {
        let a = a.created_at.unwrap_or(0.0);
        let b = b.created_at.unwrap_or(0.0);
        b.partial_cmp(&a).unwrap_or(Ordering::Equal)
    });
}

/// Pure projection of recordings into table rows
#[derive(Debug, Clone)]
pub struct TableRenderer {
    api_base: Url,
    formatter: TimeFormatter,
}

impl TableRenderer {
    pub fn new(api_base: Url, formatter: TimeFormatter) -> Self {
        Self { api_base, formatter }
    }

    /// Download reference for a recording's artifact
    pub fn download_url(&self, id: &str) -> String {
        let mut url = self.api_base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("result").push(id);
        }
        url.to_string()
    }

    /// Render rows in input order
    pub fn render(&self, recordings: &[Recording], mode: RenderMode) -> Vec<RowView> {
        recordings.iter().map(|rec| self.row(rec, mode)).collect()
    }

    fn row(&self, rec: &Recording, mode: RenderMode) -> RowView {
        let (stop, timestamp) = match mode {
            RenderMode::Active => {
                let stop = if rec.state.can_stop() {
                    StopAffordance::Enabled
                } else {
                    StopAffordance::Disabled
                };
                (stop, rec.created_at)
            }
            RenderMode::Historical => (StopAffordance::Absent, rec.last_modification),
        };

        RowView {
            id: rec.id.clone(),
            download: self.download_url(&rec.id),
            stop,
            short_id: short_id(&rec.id),
            device_name: rec.device_name.clone(),
            state: StateTag::of(&rec.state),
            timestamp: self.formatter.format(timestamp),
        }
    }
}
