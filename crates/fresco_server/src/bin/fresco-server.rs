//! Fresco server binary.

use fresco_error::{FrescoResult, ServerError, ServerErrorKind};
use fresco_server::{ServerConfig, create_router};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> FrescoResult<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Arc::new(ServerConfig::from_env()?);
    let addr = format!("{}:{}", config.host(), config.port());

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ServerError::new(ServerErrorKind::Bind(format!("{}: {}", addr, e))))?;

    info!(%addr, mock = *config.mock(), "fresco server listening");

    axum::serve(listener, create_router(config))
        .await
        .map_err(|e| ServerError::new(ServerErrorKind::Serve(e.to_string())))?;

    Ok(())
}
