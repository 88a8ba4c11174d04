//! Salon booking concierge
//!
//! Hosts the multilingual booking dialog and the menu pricing resolver
//! behind a normalized-event HTTP surface.

mod api;
mod branch;
mod config;
mod cooldown;
mod dispatch;
mod i18n;
mod inbound;
mod menu;
mod prompt;
mod runtime;
mod state_machine;

use api::{create_router, AppState};
use config::AppConfig;
use menu::MenuPricingTable;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "salon_concierge=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = AppConfig::from_env()?;
    tracing::info!(
        port = config.port,
        menu_path = %config.menu_path.display(),
        nudge = ?config.nudge,
        menu_cooldown_secs = config.menu_cooldown.as_secs(),
        "Configuration loaded"
    );

    // Pricing table; a broken file degrades to an empty menu
    let table = MenuPricingTable::load_or_empty(&config.menu_path);

    // Create application state
    let state = AppState::new(&config, table)?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state).layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Salon concierge listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
