//! Application configuration options

use std::time::Duration;

use crate::settings::Settings;
use crate::sync::engine::SyncOptions;
use crate::timefmt::TimeSettings;
use crate::workers::poller;

/// Main application options
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Lifecycle configuration
    pub lifecycle: LifecycleOptions,

    /// Recorder API base URL
    pub backend_base_url: String,

    /// Recorder API request timeout
    pub request_timeout: Duration,

    /// Enable local control server
    pub enable_server: bool,

    /// Server configuration
    pub server: ServerOptions,

    /// Health poller options
    pub poller: poller::Options,

    /// Sync engine options
    pub sync: SyncOptions,

    /// Timestamp display
    pub time: TimeSettings,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for AppOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            lifecycle: LifecycleOptions::default(),
            backend_base_url: settings.backend.base_url.clone(),
            request_timeout: Duration::from_secs(settings.backend.timeout_secs),
            enable_server: settings.enable_server,
            server: ServerOptions {
                host: settings.server.host.clone(),
                port: settings.server.port,
            },
            poller: poller::Options {
                interval: Duration::from_secs(settings.health_interval_secs),
            },
            sync: SyncOptions {
                load_scale: settings.load_scale,
                sequence_guard: settings.sequence_guard,
            },
            time: settings.time.clone(),
        }
    }
}

/// Lifecycle options
#[derive(Debug, Clone)]
pub struct LifecycleOptions {
    /// Maximum delay for graceful shutdown
    pub max_shutdown_delay: Duration,
}

impl Default for LifecycleOptions {
    fn default() -> Self {
        Self {
            max_shutdown_delay: Duration::from_secs(30),
        }
    }
}

/// Local HTTP server options
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}
