//! Epoch timestamp formatting

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Locale, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DashboardError;

/// Rendered in place of an absent timestamp
pub const PLACEHOLDER: &str = "-";

/// Time formatting settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSettings {
    /// Display timezone as a fixed offset from UTC
    #[serde(default)]
    pub utc_offset_secs: i32,

    /// Locale name, e.g. `pt_BR` or `en_US`
    #[serde(default = "default_locale")]
    pub locale: String,

    /// strftime pattern
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

fn default_locale() -> String {
    "pt_BR".to_string()
}

fn default_pattern() -> String {
    "%a, %d/%m/%Y, %H:%M:%S".to_string()
}

impl Default for TimeSettings {
    fn default() -> Self {
        Self {
            utc_offset_secs: 0,
            locale: default_locale(),
            pattern: default_pattern(),
        }
    }
}

/// Formats epoch seconds for display in a fixed zone and locale
#[derive(Debug, Clone)]
pub struct TimeFormatter {
    offset: FixedOffset,
    locale: Locale,
    pattern: String,
}

impl TimeFormatter {
    pub fn new(settings: &TimeSettings) -> Result<Self, DashboardError> {
        let offset = FixedOffset::east_opt(settings.utc_offset_secs).ok_or_else(|| {
            DashboardError::Config(format!(
                "UTC offset out of range: {}s",
                settings.utc_offset_secs
            ))
        })?;

        let locale = Locale::try_from(settings.locale.as_str()).map_err(|_| {
            DashboardError::Config(format!("unknown locale: {}", settings.locale))
        })?;

        if StrftimeItems::new(&settings.pattern).any(|item| matches!(item, Item::Error)) {
            return Err(DashboardError::Config(format!(
                "invalid time pattern: {}",
                settings.pattern
            )));
        }

        Ok(Self {
            offset,
            locale,
            pattern: settings.pattern.clone(),
        })
    }

    /// Format epoch seconds. Absent, zero, non-finite and out-of-range inputs
    /// all yield [`PLACEHOLDER`].
    pub fn format(&self, epoch_secs: Option<f64>) -> String {
        let Some(datetime) = epoch_secs.and_then(to_datetime) else {
            return PLACEHOLDER.to_string();
        };

        let local = datetime.with_timezone(&self.offset);
        let mut out = String::new();
        match write!(out, "{}", local.format_localized(&self.pattern, self.locale)) {
            Ok(()) => out,
            Err(_) => PLACEHOLDER.to_string(),
        }
    }
}

impl Default for TimeFormatter {
    fn default() -> Self {
        Self {
            offset: Utc.fix(),
            locale: Locale::pt_BR,
            pattern: default_pattern(),
        }
    }
}

fn to_datetime(epoch_secs: f64) -> Option<DateTime<Utc>> {
    if !epoch_secs.is_finite() || epoch_secs == 0.0 {
        return None;
    }
    let secs = epoch_secs.floor();
    if secs < i64::MIN as f64 || secs > i64::MAX as f64 {
        return None;
    }
    let nanos = ((epoch_secs - secs) * 1e9) as u32;
    DateTime::from_timestamp(secs as i64, nanos.min(999_999_999))
}
