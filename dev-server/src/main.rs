use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use familycoins_dev_server::{router, DevServerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = DevServerConfig::from_env().context("Invalid dev server configuration")?;

    if !config.entry_page_path().is_file() {
        tracing::warn!(
            "Entry page {} not found, build the frontend first",
            config.entry_page_path().display()
        );
    }

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    info!("Serving {} on http://{}", config.static_dir.display(), addr);
    info!("Frontend talks to the backend at {}", config.app.api_base_url);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Port {} is already in use or unavailable", config.port))?;
    info!("Listening on {}", addr);

    axum::serve(listener, router(Arc::new(config)))
        .await
        .context("Dev server stopped unexpectedly")?;

    Ok(())
}
