use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;
use warp::Filter;

use smartstats_persistence::connection::connect_and_migrate;
use smartstats_server::{AppServices, config::Config, create_routes, static_routes};

#[tokio::main]
async fn main() {
    // Pick up a local .env before reading configuration
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting SmartStats server...");

    let config = Config::new();

    let host = match config.host.parse::<IpAddr>() {
        Ok(host) => host,
        Err(e) => {
            tracing::error!("Invalid HOST '{}': {}", config.host, e);
            std::process::exit(1);
        }
    };
    let addr = SocketAddr::new(host, config.port);

    if config.anthropic_api_key.is_none() {
        info!("No ANTHROPIC_API_KEY set; analysis requires an x-api-key header");
    }

    // Initialize database connection and run migrations
    let db = match connect_and_migrate(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to connect to database and run migrations: {}", e);
            std::process::exit(1);
        }
    };

    let static_dir = config.static_dir.clone().map(PathBuf::from);
    let routes = create_routes(AppServices::new(db, config));

    match static_dir {
        Some(dir) => {
            info!("Serving static files from {}", dir.display());
            serve(routes.or(static_routes(dir)), addr).await;
        }
        None => serve(routes, addr).await,
    }
}

async fn serve<F>(routes: F, addr: SocketAddr)
where
    F: Filter<Error = warp::Rejection> + Clone + Send + Sync + 'static,
    F::Extract: warp::Reply,
{
    info!("Server starting on {}", addr);

    let (addr, server) = warp::serve(routes).bind_with_graceful_shutdown(addr, async {
        // Wait for SIGINT (Ctrl+C) or SIGTERM
        #[cfg(unix)]
        {
            let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())
                .expect("Failed to install SIGINT handler");
            let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM handler");

            tokio::select! {
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down gracefully...");
                }
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully...");
                }
            }
        }

        #[cfg(not(unix))]
        {
            signal::ctrl_c().await.expect("Failed to listen for ctrl+c");
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    });

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
}
