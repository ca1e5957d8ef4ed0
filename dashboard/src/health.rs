//! Host health classification and display formatting

use serde::Serialize;

use recorder_api::HealthSnapshot;

/// Lower bound of the warn tier
pub const WARN_THRESHOLD: f64 = 75.0;

/// Lower bound of the critical tier
pub const CRITICAL_THRESHOLD: f64 = 90.0;

/// Default multiplier applied to the load average before classification
pub const DEFAULT_LOAD_SCALE: f64 = 10.0;

/// Severity tier of a health metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Ok,
    Warn,
    Critical,
}

/// Classify a (pre-scaled) metric value.
///
/// Boundaries land in the higher tier. NaN is not below any threshold and
/// therefore classifies as critical.
pub fn classify(value: f64) -> Tier {
    if value < WARN_THRESHOLD {
        Tier::Ok
    } else if value < CRITICAL_THRESHOLD {
        Tier::Warn
    } else {
        Tier::Critical
    }
}

/// A formatted metric with its tier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricView {
    pub text: String,
    pub tier: Tier,
}

/// Display projection of a health snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthView {
    pub load: MetricView,
    pub mem: MetricView,
    pub disk: MetricView,
}

impl HealthView {
    /// Project a snapshot. `load_scale` brings the load average onto the
    /// percentage thresholds.
    pub fn project(snapshot: &HealthSnapshot, load_scale: f64) -> Self {
        Self {
            load: MetricView {
                text: format!("{:.2}", snapshot.load),
                tier: classify(snapshot.load * load_scale),
            },
            mem: MetricView {
                text: format!("{:.1}%", snapshot.mem_usage),
                tier: classify(snapshot.mem_usage),
            },
            disk: MetricView {
                text: format!("{:.1}%", snapshot.disk_usage),
                tier: classify(snapshot.disk_usage),
            },
        }
    }
}
