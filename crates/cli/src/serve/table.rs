//! Table service handlers: attenuate a submitted power.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use pingpong_engine::table;
use serde::Deserialize;

use super::state::TableState;

/// Query string of `/ping-power`. Both fields are optional at the extractor
/// level so missing or malformed values get the table's own 400 messages.
#[derive(Debug, Deserialize)]
pub(crate) struct PingPowerQuery {
    power: Option<String>,
    name: Option<String>,
}

/// GET /
pub(crate) async fn handle_index() -> impl IntoResponse {
    "Hello from Service Table!"
}

/// GET /ping-power?power=<int>&name=<str>
///
/// 200 with the reduced power as decimal text, or 400 with a text message.
/// An unparseable power is treated as zero.
pub(crate) async fn handle_ping_power(
    State(state): State<Arc<TableState>>,
    Query(query): Query<PingPowerQuery>,
) -> impl IntoResponse {
    let power = query
        .power
        .as_deref()
        .and_then(|p| p.trim().parse::<i64>().ok())
        .unwrap_or(0);
    let name = query.name.as_deref().unwrap_or("");

    let result = table::validate(power, name).and_then(|power| state.table.resolve(power, name));
    match result {
        Ok(reduced) => (StatusCode::OK, reduced.to_string()),
        Err(e) => {
            tracing::debug!(power, name, error = %e, "rejected ping-power request");
            (StatusCode::BAD_REQUEST, e.to_string())
        }
    }
}
