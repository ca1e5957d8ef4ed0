//! Application state management

use std::sync::Arc;

use tracing::info;
use url::Url;

use crate::app::options::AppOptions;
use crate::catalog::DeviceCatalog;
use crate::commands::dispatcher::CommandDispatcher;
use crate::errors::DashboardError;
use crate::http::recorder::RecorderApi;
use crate::render::TableRenderer;
use crate::sync::engine::SyncEngine;
use crate::timefmt::TimeFormatter;
use crate::view::panel::{Panel, View};
use crate::workers::refresh::RefreshTrigger;

/// Main application state: the single owner of every component
pub struct AppState {
    /// Recorder service
    pub api: Arc<dyn RecorderApi>,

    /// Rendering adapter
    pub panel: Arc<Panel>,

    /// Snapshot owner
    pub engine: Arc<SyncEngine>,

    /// Device catalog and selection
    pub catalog: Arc<DeviceCatalog>,

    /// Command dispatcher
    pub dispatcher: Arc<CommandDispatcher>,
}

impl AppState {
    /// Wire the components together
    pub fn init(
        options: &AppOptions,
        api: Arc<dyn RecorderApi>,
        refresh: RefreshTrigger,
    ) -> Result<Self, DashboardError> {
        info!("Initializing application state...");

        let api_base = Url::parse(&options.backend_base_url)?;
        let formatter = TimeFormatter::new(&options.time)?;
        let renderer = TableRenderer::new(api_base, formatter);

        let panel = Arc::new(Panel::new());
        let view: Arc<dyn View> = panel.clone();

        let engine = Arc::new(SyncEngine::new(
            api.clone(),
            view.clone(),
            renderer,
            options.sync.clone(),
        ));

        let catalog = Arc::new(DeviceCatalog::new(api.clone(), view.clone()));

        let dispatcher = Arc::new(CommandDispatcher::new(
            api.clone(),
            engine.clone(),
            catalog.clone(),
            view,
            refresh,
        ));

        Ok(Self {
            api,
            panel,
            engine,
            catalog,
            dispatcher,
        })
    }

    /// Initial load: device catalog, active list and history, concurrently.
    /// Failures are logged by each component and do not abort startup.
    pub async fn startup_sync(&self) {
        info!("Running startup sync...");
        let (_, active, history) = futures::join!(
            self.catalog.load(),
            self.engine.poll_active(),
            self.engine.poll_history(),
        );
        info!("Startup sync done (active: {:?}, history: {:?})", active, history);
    }
}
