use clap::Parser;
use comply_nav::agents::context::AppContext;
use comply_nav::cli::Cli;
use comply_nav::config::Settings;
use std::net::SocketAddr;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (RUST_LOG overrides the default filter)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("comply_nav=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::new_with_cli(&cli)?;
    let addr: SocketAddr = settings.bind_address().parse()?;

    info!(
        model = %settings.llm.model,
        provider = %settings.llm.provider,
        max_iterations = settings.agent.max_iterations,
        "Starting Comply Nav on {}",
        addr
    );

    // Fails fast when the API key is missing
    let ctx = AppContext::from_settings(settings)?;
    let shutdown = ctx.shutdown.clone();

    let app = comply_nav::create_app(ctx);

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Wait for Ctrl+C, then cancel in-flight queries
async fn shutdown_signal(token: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
    token.cancel();
}
