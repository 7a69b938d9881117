//! Degree Registry - Entry point.

use degree_registry::{
    api::{create_router_with_rate_limit, AppState, RateLimitState, DOCS_PATH},
    config::{Config, LogFormat},
    registry::{RegistryService, Store},
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    let registry = tracing_subscriber::registry().with(filter);
    match config.log.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    let scheme = config.registry.fingerprint_scheme;
    info!(%scheme, "Starting Degree Registry");

    // Initialize storage
    let store = if config.registry.persist {
        info!(path = ?config.registry.path, "Using file-backed storage");
        Store::file(config.registry.path.clone())
    } else {
        warn!("Persistence disabled, using in-memory storage (data will be lost on restart)");
        Store::memory()
    };

    // Load existing registry
    let registry = match RegistryService::open(store, scheme).await {
        Ok(r) => r,
        Err(e) => {
            // Starting empty would overwrite the file on the next issuance
            error!("Failed to load registry: {}", e);
            std::process::exit(1);
        }
    };
    info!("Loaded registry with {} records", registry.count().await);

    let state = AppState::new(registry);

    let rate_limit = RateLimitState::new(config.rate_limit.global_per_minute);
    let app = create_router_with_rate_limit(state, rate_limit);

    let addr = SocketAddr::new(
        config.server.listen_addr.parse().unwrap_or([0, 0, 0, 0].into()),
        config.server.port,
    );

    info!("Listening on {}", addr);
    info!("API docs at http://{}{}", addr, DOCS_PATH);

    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
