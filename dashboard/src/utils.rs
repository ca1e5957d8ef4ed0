//! Utility functions

use serde::{Deserialize, Serialize};

const UNKNOWN: &str = "unknown";

/// Version information for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    pub git_hash: String,
    pub build_time: String,
}

/// Get version information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_hash: build_value(option_env!("GIT_HASH")),
        build_time: build_value(option_env!("BUILD_TIME")),
    }
}

/// Build-time value, with absent and blank both shown as "unknown"
fn build_value(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(UNKNOWN)
        .to_string()
}
