//! Player service handlers: trigger a match, list matches.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use pingpong_engine::log::format_timestamp;
use pingpong_storage::{MatchRecord, StorageError};

use super::json_error;
use super::state::PlayerState;

/// GET /
pub(crate) async fn handle_index() -> impl IntoResponse {
    "Player Service"
}

/// GET /health
pub(crate) async fn handle_health() -> impl IntoResponse {
    let response = serde_json::json!({
        "status": "ok",
        "service": "player",
    });
    (StatusCode::OK, Json(response))
}

/// POST /new-match
///
/// Plays one match and returns its log as plain text. If the store fails
/// after the match was played, the 500 body still carries the log.
pub(crate) async fn handle_new_match(State(state): State<Arc<PlayerState>>) -> impl IntoResponse {
    let _trigger = state.trigger.lock().await;

    let match_id = match state.store.next_match_id().await {
        Ok(id) => id,
        Err(e) => {
            tracing::error!(error = %e, "failed to allocate match id");
            return json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("failed to allocate match id: {}", e),
            )
            .into_response();
        }
    };

    let outcome = match state.engine.play(match_id).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(match_id, error = %e, "match failed");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()).into_response();
        }
    };

    let match_log = outcome.log_text();

    if let Some(journal) = &state.journal {
        journal.append_in_background(outcome.lines.clone()).await;
    }

    let record = MatchRecord::new(
        match_id,
        match_log.clone(),
        outcome.winner.name(),
        format_timestamp(outcome.completed_at),
    );
    if let Err(e) = state.store.append(record).await {
        tracing::error!(match_id, error = %e, "failed to persist match");
        let body = serde_json::json!({
            "error": format!("failed to persist match: {}", e),
            "match_id": match_id,
            "match_log": match_log,
        });
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
    }

    (StatusCode::OK, match_log).into_response()
}

/// GET /match
///
/// Every stored match, ordered by match id.
pub(crate) async fn handle_list_matches(
    State(state): State<Arc<PlayerState>>,
) -> impl IntoResponse {
    match state.store.list_all().await {
        Ok(mut records) => {
            records.sort_by_key(|r| r.match_id);
            (StatusCode::OK, Json(records)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to list matches");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("failed to list matches: {}", e),
            )
            .into_response()
        }
    }
}

/// GET /match/{id}
pub(crate) async fn handle_get_match(
    State(state): State<Arc<PlayerState>>,
    Path(match_id): Path<u64>,
) -> impl IntoResponse {
    match state.store.get(match_id).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(StorageError::MatchNotFound { .. }) => json_error(
            StatusCode::NOT_FOUND,
            &format!("match '{}' not found", match_id),
        )
        .into_response(),
        Err(e) => json_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::response::Response;
    use pingpong_engine::{MatchEngine, PowerResponder, ResponderError};
    use pingpong_storage::{MatchLogStore, MemoryStore};

    /// Returns more than any serve, so Player A misses on the first turn.
    struct Overpower {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PowerResponder for Overpower {
        async fn resolve(&self, _power: u32, _name: &str) -> Result<u32, ResponderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(200)
        }

        fn responder_id(&self) -> &str {
            "overpower"
        }
    }

    /// Store whose numbering and/or writes fail with a backend error.
    struct BrokenStore {
        fail_numbering: bool,
    }

    #[async_trait]
    impl MatchLogStore for BrokenStore {
        async fn next_match_id(&self) -> Result<u64, StorageError> {
            if self.fail_numbering {
                Err(StorageError::Backend("numbering offline".into()))
            } else {
                Ok(7)
            }
        }

        async fn append(&self, _record: MatchRecord) -> Result<(), StorageError> {
            Err(StorageError::Backend("disk full".into()))
        }

        async fn list_all(&self) -> Result<Vec<MatchRecord>, StorageError> {
            Ok(Vec::new())
        }

        async fn get(&self, match_id: u64) -> Result<MatchRecord, StorageError> {
            Err(StorageError::MatchNotFound { match_id })
        }
    }

    fn player_state(store: Arc<dyn MatchLogStore>) -> (Arc<PlayerState>, Arc<Overpower>) {
        let responder = Arc::new(Overpower {
            calls: AtomicUsize::new(0),
        });
        let engine = MatchEngine::new(responder.clone()).with_think_time(Duration::ZERO);
        (Arc::new(PlayerState::new(engine, store, None)), responder)
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn new_match_returns_log_and_stores_it() {
        let store = Arc::new(MemoryStore::new());
        let (state, _) = player_state(store.clone());

        let response = handle_new_match(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let text = body_text(response).await;
        assert!(text.contains("New Match 1 "));
        assert!(text.contains("[Alert] Player B wins!"));

        let stored = store.get(1).await.unwrap();
        assert_eq!(stored.match_log, text);
        assert_eq!(stored.winner, "Player B");
    }

    #[tokio::test]
    async fn failed_append_returns_500_with_match_log() {
        let (state, responder) = player_state(Arc::new(BrokenStore {
            fail_numbering: false,
        }));

        let response = handle_new_match(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(responder.calls.load(Ordering::SeqCst), 1);

        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["match_id"], 7);
        assert!(json["error"].as_str().unwrap().contains("disk full"));
        let log = json["match_log"].as_str().unwrap();
        assert!(log.contains("New Match 7 "));
        assert!(log.contains("[Alert] Player B wins!"));
        assert!(log.ends_with("------------------- Game Over -------------------\n"));
    }

    #[tokio::test]
    async fn failed_numbering_returns_500_without_playing() {
        let (state, responder) = player_state(Arc::new(BrokenStore {
            fail_numbering: true,
        }));

        let response = handle_new_match(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(responder.calls.load(Ordering::SeqCst), 0);

        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert!(json["error"].as_str().unwrap().contains("numbering offline"));
        assert!(json.get("match_log").is_none());
    }
}
