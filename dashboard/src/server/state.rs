//! Server state

use std::sync::Arc;

use crate::catalog::DeviceCatalog;
use crate::commands::dispatcher::CommandDispatcher;
use crate::view::panel::Panel;

/// Server state shared across handlers
pub struct ServerState {
    pub panel: Arc<Panel>,
    pub catalog: Arc<DeviceCatalog>,
    pub dispatcher: Arc<CommandDispatcher>,
}

impl ServerState {
    pub fn new(
        panel: Arc<Panel>,
        catalog: Arc<DeviceCatalog>,
        dispatcher: Arc<CommandDispatcher>,
    ) -> Self {
        Self {
            panel,
            catalog,
            dispatcher,
        }
    }
}
