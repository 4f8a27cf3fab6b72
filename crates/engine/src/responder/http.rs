//! HTTP power responder: asks a remote table service.
//!
//! Uses `ureq` (sync) wrapped in `tokio::task::spawn_blocking` to avoid
//! blocking the async runtime. Sends
//! `GET {base_url}/ping-power?power=<p>&name=<n>` and parses the body as a
//! decimal `u32`.

use std::time::Duration;

use async_trait::async_trait;

use super::PowerResponder;
use crate::error::ResponderError;

/// Responder that calls the table service over HTTP.
///
/// - Non-2xx status → `ResponderError::Status`
/// - Connection or timeout failure → `ResponderError::Transport`
/// - Body that is not a decimal `u32` → `ResponderError::InvalidBody`
///
/// No retries.
pub struct HttpResponder {
    endpoint: String,
    agent: ureq::Agent,
}

impl HttpResponder {
    /// Create a responder for the table service at `base_url`.
    ///
    /// `timeout` bounds the whole request; `None` leaves it unbounded.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(timeout)
            .build();
        HttpResponder {
            endpoint: Self::endpoint_for(base_url),
            agent: config.into(),
        }
    }

    /// `http://host:8889/` → `http://host:8889/ping-power`
    pub fn endpoint_for(base_url: &str) -> String {
        format!("{}/ping-power", base_url.trim_end_matches('/'))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Parse a response body, tolerating surrounding whitespace.
    pub fn parse_body(body: &str) -> Result<u32, ResponderError> {
        body.trim()
            .parse::<u32>()
            .map_err(|_| ResponderError::InvalidBody {
                body: body.to_string(),
            })
    }
}

#[async_trait]
impl PowerResponder for HttpResponder {
    async fn resolve(&self, power: u32, name: &str) -> Result<u32, ResponderError> {
        let agent = self.agent.clone();
        let endpoint = self.endpoint.clone();
        let name = name.to_string();

        tokio::task::spawn_blocking(move || {
            let response = agent
                .get(&endpoint)
                .query("power", power.to_string())
                .query("name", &name)
                .call()
                .map_err(|e| match e {
                    ureq::Error::StatusCode(status) => ResponderError::Status { status },
                    other => ResponderError::Transport(other.to_string()),
                })?;

            let body = response
                .into_body()
                .read_to_string()
                .map_err(|e| ResponderError::Transport(format!("failed to read body: {}", e)))?;

            Self::parse_body(&body)
        })
        .await
        .map_err(|e| ResponderError::Join(e.to_string()))?
    }

    fn responder_id(&self) -> &str {
        "http"
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_trims_trailing_slash() {
        assert_eq!(
            HttpResponder::endpoint_for("http://localhost:8889/"),
            "http://localhost:8889/ping-power"
        );
        assert_eq!(
            HttpResponder::endpoint_for("http://table:9000"),
            "http://table:9000/ping-power"
        );
    }

    #[test]
    fn parse_body_accepts_decimal() {
        assert_eq!(HttpResponder::parse_body("77").unwrap(), 77);
        assert_eq!(HttpResponder::parse_body(" 77\n").unwrap(), 77);
    }

    #[test]
    fn parse_body_rejects_garbage() {
        for body in ["", "-4", "seventy", "7.5", "99999999999"] {
            assert!(
                matches!(
                    HttpResponder::parse_body(body),
                    Err(ResponderError::InvalidBody { .. })
                ),
                "accepted {body:?}"
            );
        }
    }

    #[tokio::test]
    async fn unreachable_table_is_transport_error() {
        // Port 9 (discard) on localhost is expected to refuse connections.
        let responder = HttpResponder::new(
            "http://127.0.0.1:9",
            Some(Duration::from_secs(2)),
        );
        let err = responder.resolve(80, "Player A").await.unwrap_err();
        assert!(
            matches!(err, ResponderError::Transport(_)),
            "unexpected error: {err}"
        );
    }
}
