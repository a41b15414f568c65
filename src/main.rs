// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc, time::Duration};

use horizon_site::infrastructure::config::load_config;
use horizon_site::infrastructure::discovery::autodiscover;
use horizon_site::infrastructure::memory_sessions::InMemorySessionStore;
use horizon_site::infrastructure::static_identity::StaticIdentityBackend;
use horizon_site::presentation::app_state::AppState;
use horizon_site::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = load_config()?;

    // Register dashboards and panels (application layer)
    let site = autodiscover(&config)?;

    // Create backends (infrastructure layer)
    let sessions = Arc::new(InMemorySessionStore::with_ttl(Duration::from_secs(
        config.server.session_ttl_secs,
    )));
    let identity = Arc::new(StaticIdentityBackend::new(config.users.clone()));

    // Create application state
    let state = Arc::new(AppState::new(site, sessions, identity));

    // Build router (presentation layer)
    let router = build_router(state);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!("Starting horizon-site on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
