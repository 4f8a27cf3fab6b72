//! `pingpong serve` / `player` / `table` -- the two HTTP services.
//!
//! Player service endpoints:
//! - GET  /             - Service banner
//! - GET  /health       - Server status
//! - POST /new-match    - Play one match, persist it, return its log text
//! - GET  /match        - All stored matches (JSON, ordered by match id)
//! - GET  /match/{id}   - One stored match
//!
//! Table service endpoints:
//! - GET  /             - Service banner
//! - GET  /ping-power   - Reduce `power` for player `name` (decimal text)
//!
//! The player service reaches the table service over HTTP, so the two can
//! run in one process (`serve`) or separately (`player`, `table`).

mod player;
mod state;
mod table;

use std::path::Path;
use std::sync::Arc;

use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use pingpong_engine::{HttpResponder, MatchEngine, Table};
use pingpong_storage::{FileStore, MatchLogStore, MemoryStore, StorageError};
use tower_http::cors::{Any, CorsLayer};

use crate::config::PlayerConfig;
use crate::journal::CsvJournal;

use self::state::{PlayerState, TableState};

/// Construct a JSON error response with the given status code and message.
fn json_error(status: StatusCode, message: &str) -> impl IntoResponse {
    (status, Json(serde_json::json!({"error": message})))
}

/// Fallback handler for unmatched routes.
async fn handle_not_found() -> impl IntoResponse {
    json_error(StatusCode::NOT_FOUND, "not found")
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

fn player_router(state: Arc<PlayerState>) -> Router {
    Router::new()
        .route("/", get(player::handle_index))
        .route("/health", get(player::handle_health))
        .route("/new-match", post(player::handle_new_match))
        .route("/match", get(player::handle_list_matches))
        .route("/match/{id}", get(player::handle_get_match))
        .fallback(handle_not_found)
        .layer(cors())
        .with_state(state)
}

fn table_router(state: Arc<TableState>) -> Router {
    Router::new()
        .route("/", get(table::handle_index))
        .route("/ping-power", get(table::handle_ping_power))
        .fallback(handle_not_found)
        .layer(cors())
        .with_state(state)
}

/// Open the file store at `path`, or an in-memory store when `None`.
pub(crate) async fn open_store(
    path: Option<&Path>,
) -> Result<Arc<dyn MatchLogStore>, StorageError> {
    match path {
        Some(path) => {
            let store = FileStore::open(path).await?;
            tracing::info!(path = %path.display(), "using file match store");
            Ok(Arc::new(store))
        }
        None => {
            tracing::info!("using in-memory match store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

async fn build_player_state(config: &PlayerConfig) -> Result<Arc<PlayerState>, StorageError> {
    let store = open_store(config.store.as_deref()).await?;
    let next = store.next_match_id().await?;
    tracing::info!(next_match_id = next, "match numbering resumed");

    let responder = HttpResponder::new(&config.table_url, config.responder_timeout);
    tracing::info!(endpoint = responder.endpoint(), "player service uses table");
    let engine = MatchEngine::new(Arc::new(responder)).with_think_time(config.think_time);
    let journal = config.log_dir.as_ref().map(CsvJournal::new);

    Ok(Arc::new(PlayerState::new(engine, store, journal)))
}

async fn serve(name: &str, port: u16, app: Router) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("{} service listening on http://{}", name, addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("{} service shut down", name);
    Ok(())
}

/// Start the player service.
pub async fn start_player_service(config: PlayerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_player_state(&config).await?;
    serve("player", config.port, player_router(state)).await
}

/// Start the table service.
pub async fn start_table_service(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(TableState {
        table: Table::new(),
    });
    serve("table", port, table_router(state)).await
}

/// Start both services in one process. The player service is pointed at
/// the table service through `config.table_url`.
pub async fn start_both(
    config: PlayerConfig,
    table_port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let player_port = config.port;
    let player_state = build_player_state(&config).await?;
    let table_state = Arc::new(TableState {
        table: Table::new(),
    });

    tokio::try_join!(
        serve("table", table_port, table_router(table_state)),
        serve("player", player_port, player_router(player_state)),
    )?;
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("received shutdown signal");
}
