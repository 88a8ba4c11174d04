//! HTTP surface for the booking concierge

mod handlers;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::config::AppConfig;
use crate::cooldown::CooldownGuard;
use crate::dispatch::TriggerTable;
use crate::menu::{MenuFlow, MenuPricingTable, MenuResolver};
use crate::runtime::{
    DialogController, InMemorySessionStore, ProductionManager, RuntimeManager, TracingBookingSink,
};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<ProductionManager>,
}

impl AppState {
    pub fn new(config: &AppConfig, table: MenuPricingTable) -> Result<Self, regex::Error> {
        let controller = DialogController::new(
            InMemorySessionStore::new(),
            TracingBookingSink,
            TriggerTable::new()?,
            CooldownGuard::new(config.menu_cooldown),
            MenuFlow::new(MenuResolver::new(Arc::new(table))),
            config.nudge,
        );
        Ok(Self {
            runtime: Arc::new(RuntimeManager::new(controller)),
        })
    }

    pub fn resolver(&self) -> &MenuResolver {
        self.runtime.controller().menu().resolver()
    }
}
