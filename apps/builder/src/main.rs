mod analysis;
mod config;
mod document;
mod errors;
mod export;
mod hydration;
mod persistence;
mod remote;
mod render;
mod routes;
mod session;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::export::{CommandConverter, DocumentConverter, ExportInvoker};
use crate::remote::{Credential, ResumeServiceClient};
use crate::routes::build_router;
use crate::session::Session;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume builder v{}", env!("CARGO_PKG_VERSION"));

    let remote = ResumeServiceClient::new(&config.resume_service_url)?;
    let credential = Credential::from_token(config.access_token.as_deref());
    info!(
        "Resume service at {} ({} session)",
        remote.base_url(),
        if credential.is_some() { "authenticated" } else { "guest" }
    );

    // Hydrate before serving: edits can only arrive once the document is settled
    let session = Arc::new(Session::start(&config, remote.clone(), credential.clone()).await);

    let converter = config
        .pdf_converter_cmd
        .as_deref()
        .and_then(CommandConverter::from_command_line)
        .map(|c| {
            info!("PDF export via '{}'", c.program());
            Arc::new(c) as Arc<dyn DocumentConverter>
        });
    if converter.is_none() {
        warn!("PDF_CONVERTER_CMD not set; PDF export is unavailable");
    }

    let state = AppState {
        session: session.clone(),
        remote,
        credential,
        exporter: ExportInvoker::new(converter),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    session.shutdown().await;
    info!("Session closed");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
