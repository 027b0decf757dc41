use axum::{
    routing::{get, post, put},
    Router,
};
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod command;
mod config;
mod db;
mod error;
mod fingerprint;
mod gate;
mod handlers;
mod middleware;
mod models;
mod resolver;
mod store;
mod utils;

// Application State
pub struct AppState {
    pub store: store::PlayerStore,
    pub config: RwLock<config::AppConfig>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config_path = config::config_path();
    let app_config = config::AppConfig::load_or_create(&config_path)?;

    let pool = db::establish_connection(&app_config.database.path).await?;
    let player_store = store::PlayerStore::new(pool);
    player_store.init_schema().await?;

    let listen = app_config.server.listen.clone();
    let state = Arc::new(AppState {
        store: player_store,
        config: RwLock::new(app_config),
    });

    let protected_routes = Router::new()
        // Gate + command bridge (consumed by the host server)
        .route("/api/gate/connect", post(handlers::gate::check_connect))
        .route("/api/command", post(handlers::command::run_command))
        // Roster management
        .route(
            "/api/whitelist",
            get(handlers::roster::list_whitelist).post(handlers::roster::add_whitelist),
        )
        .route(
            "/api/blacklist",
            get(handlers::roster::list_blacklist).post(handlers::roster::add_blacklist),
        )
        .route("/api/players", get(handlers::roster::lookup_player_by_name))
        .route("/api/players/:uuid", get(handlers::roster::lookup_player))
        .route(
            "/api/players/:uuid/status",
            put(handlers::roster::move_player_status),
        )
        .route_layer(axum::middleware::from_fn(middleware::auth_middleware));

    let app = Router::new()
        .route("/", get(root))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state.clone());

    let addr = listen.parse::<SocketAddr>()?;
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Teardown mirrors startup: the in-memory config (mutated or not) goes
    // back to disk.
    state.config.read().await.save(&config_path)?;
    tracing::info!("config written back to {}", config_path.display());

    Ok(())
}

async fn root() -> &'static str {
    "Whitegate Backend API"
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install shutdown signal handler: {e}");
    }
}
