use std::error::Error as StdError;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wardrobe_server::config::Config;
use wardrobe_server::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn StdError + Send + Sync + 'static>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    if !config.image_host.has_credentials() {
        tracing::warn!("image host credentials missing, uploads will fail");
    }

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, api = %config.public_api_url, "listening");

    wardrobe_server::serve(listener, AppState::from_config(&config), shutdown_signal()).await?;
    info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for interrupt signal");
        std::future::pending::<()>().await;
    }
    info!("interrupt received, shutting down");
}
