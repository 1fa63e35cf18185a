//! Headless admin server.
//!
//! Starts the axum web server and waits for Ctrl+C.

use tracing_subscriber::EnvFilter;

use oidc_admin_lib::app::SharedState;
use oidc_admin_lib::server;
use oidc_admin_lib::templates::Templates;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Hitobito Auth admin server");

    let (db, config, overrides) = oidc_admin_lib::init_foundation()?;
    let templates = Templates::new()?;
    let state = SharedState::new(db, config, overrides, templates, Vec::new());

    let server_state = state.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server::start_server(server_state).await {
            tracing::error!("Server failed: {e}");
        }
    });

    tracing::info!(
        port = state.server_port(),
        "Admin server running. Press Ctrl+C to stop."
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down...");

    state.shutdown_token().cancel();
    server_handle.await?;
    Ok(())
}
