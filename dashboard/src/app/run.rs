//! Main application run loop

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::app::options::{AppOptions, LifecycleOptions};
use crate::app::state::AppState;
use crate::errors::DashboardError;
use crate::http::client::HttpClient;
use crate::http::recorder::RecorderApi;
use crate::server::serve::serve;
use crate::server::state::ServerState;
use crate::sync::engine::{Channel, SyncEngine};
use crate::view::panel::PanelState;
use crate::workers::poller;
use crate::workers::refresh::{self, RefreshTrigger};

/// Run the dashboard until the shutdown signal resolves
pub async fn run(
    options: AppOptions,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), DashboardError> {
    info!("Initializing recording dashboard...");

    // Create shutdown channel
    let (shutdown_tx, _shutdown_rx): (broadcast::Sender<()>, _) = broadcast::channel(1);
    let mut shutdown_manager = ShutdownManager::new(shutdown_tx.clone(), options.lifecycle.clone());

    let api = match connect(&options) {
        Ok(api) => api,
        Err(e) => {
            error!("Failed to create recorder client: {}", e);
            return Err(e);
        }
    };

    let app_state = match init(api, &options, &shutdown_tx, &mut shutdown_manager).await {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to start dashboard: {}", e);
            shutdown_manager.shutdown().await?;
            return Err(e);
        }
    };

    app_state.startup_sync().await;

    shutdown_signal.await;
    info!("Shutdown signal received, shutting down...");

    drop(shutdown_tx);
    shutdown_manager.shutdown().await
}

/// Poll every channel once and return the resulting panel
pub async fn run_once(options: AppOptions) -> Result<PanelState, DashboardError> {
    let api = connect(&options)?;
    let (refresh, _requests) = RefreshTrigger::channel();
    let app_state = AppState::init(&options, api, refresh)?;

    app_state.startup_sync().await;
    app_state.engine.poll(Channel::Health).await;

    Ok(app_state.panel.snapshot())
}

fn connect(options: &AppOptions) -> Result<Arc<dyn RecorderApi>, DashboardError> {
    let client = HttpClient::new(&options.backend_base_url, options.request_timeout)?;
    Ok(Arc::new(client))
}

// =============================== INITIALIZATION ================================== //

async fn init(
    api: Arc<dyn RecorderApi>,
    options: &AppOptions,
    shutdown_tx: &broadcast::Sender<()>,
    shutdown_manager: &mut ShutdownManager,
) -> Result<Arc<AppState>, DashboardError> {
    let (refresh, requests) = RefreshTrigger::channel();
    let app_state = Arc::new(AppState::init(options, api, refresh)?);

    init_refresh_worker(
        app_state.engine.clone(),
        requests,
        shutdown_manager,
        shutdown_tx.subscribe(),
    )?;

    init_poller_worker(
        options.poller.clone(),
        app_state.engine.clone(),
        shutdown_manager,
        shutdown_tx.subscribe(),
    )?;

    if options.enable_server {
        init_control_server(
            options,
            app_state.clone(),
            shutdown_manager,
            shutdown_tx.subscribe(),
        )
        .await?;
    }

    Ok(app_state)
}

fn init_refresh_worker(
    engine: Arc<SyncEngine>,
    requests: mpsc::UnboundedReceiver<Channel>,
    shutdown_manager: &mut ShutdownManager,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), DashboardError> {
    info!("Initializing refresh worker...");

    let refresh_handle = tokio::spawn(async move {
        refresh::run(
            engine,
            requests,
            Box::pin(async move {
                let _ = shutdown_rx.recv().await;
            }),
        )
        .await;
    });

    shutdown_manager.with_refresh_worker_handle(refresh_handle)
}

fn init_poller_worker(
    options: poller::Options,
    engine: Arc<SyncEngine>,
    shutdown_manager: &mut ShutdownManager,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), DashboardError> {
    info!("Initializing health poller...");

    let poller_handle = tokio::spawn(async move {
        poller::run(
            &options,
            engine.as_ref(),
            tokio::time::sleep,
            Box::pin(async move {
                let _ = shutdown_rx.recv().await;
            }),
        )
        .await;
    });

    shutdown_manager.with_poller_worker_handle(poller_handle)
}

async fn init_control_server(
    options: &AppOptions,
    app_state: Arc<AppState>,
    shutdown_manager: &mut ShutdownManager,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), DashboardError> {
    info!("Initializing local control server...");

    let server_state = ServerState::new(
        app_state.panel.clone(),
        app_state.catalog.clone(),
        app_state.dispatcher.clone(),
    );

    let server_handle = serve(&options.server, Arc::new(server_state), async move {
        let _ = shutdown_rx.recv().await;
    })
    .await?;

    shutdown_manager.with_server_handle(server_handle)
}

// ================================= SHUTDOWN ===================================== //

struct ShutdownManager {
    shutdown_tx: broadcast::Sender<()>,
    lifecycle_options: LifecycleOptions,
    server_handle: Option<JoinHandle<Result<(), DashboardError>>>,
    poller_worker_handle: Option<JoinHandle<()>>,
    refresh_worker_handle: Option<JoinHandle<()>>,
}

impl ShutdownManager {
    fn new(shutdown_tx: broadcast::Sender<()>, lifecycle_options: LifecycleOptions) -> Self {
        Self {
            shutdown_tx,
            lifecycle_options,
            server_handle: None,
            poller_worker_handle: None,
            refresh_worker_handle: None,
        }
    }

    fn with_poller_worker_handle(&mut self, handle: JoinHandle<()>) -> Result<(), DashboardError> {
        if self.poller_worker_handle.is_some() {
            return Err(DashboardError::Shutdown("poller_handle already set".to_string()));
        }
        self.poller_worker_handle = Some(handle);
        Ok(())
    }

    fn with_refresh_worker_handle(&mut self, handle: JoinHandle<()>) -> Result<(), DashboardError> {
        if self.refresh_worker_handle.is_some() {
            return Err(DashboardError::Shutdown("refresh_handle already set".to_string()));
        }
        self.refresh_worker_handle = Some(handle);
        Ok(())
    }

    fn with_server_handle(
        &mut self,
        handle: JoinHandle<Result<(), DashboardError>>,
    ) -> Result<(), DashboardError> {
        if self.server_handle.is_some() {
            return Err(DashboardError::Shutdown("server_handle already set".to_string()));
        }
        self.server_handle = Some(handle);
        Ok(())
    }

    async fn shutdown(&mut self) -> Result<(), DashboardError> {
        let _ = self.shutdown_tx.send(());

        match tokio::time::timeout(
            self.lifecycle_options.max_shutdown_delay,
            self.shutdown_impl(),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => {
                error!(
                    "Shutdown timed out after {:?}, forcing shutdown...",
                    self.lifecycle_options.max_shutdown_delay
                );
                std::process::exit(1);
            }
        }
    }

    async fn shutdown_impl(&mut self) -> Result<(), DashboardError> {
        info!("Shutting down recording dashboard...");

        // 1. Control server, so no new commands arrive
        if let Some(handle) = self.server_handle.take() {
            handle.await.map_err(|e| DashboardError::Shutdown(e.to_string()))??;
        }

        // 2. Health poller
        if let Some(handle) = self.poller_worker_handle.take() {
            handle.await.map_err(|e| DashboardError::Shutdown(e.to_string()))?;
        }

        // 3. Refresh worker, after its in-flight polls finish
        if let Some(handle) = self.refresh_worker_handle.take() {
            handle.await.map_err(|e| DashboardError::Shutdown(e.to_string()))?;
        }

        info!("Shutdown complete");
        Ok(())
    }
}
