use serde::{Deserialize, Serialize};

/// A finished match as stored in the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: u64,
    /// Concatenated log text, one `<timestamp>:<message>\n` line per entry.
    pub match_log: String,
    pub winner: String,
    /// ISO 8601 / RFC 3339 timestamp string.
    pub time: String,
}

impl MatchRecord {
    pub fn new(
        match_id: u64,
        match_log: impl Into<String>,
        winner: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            match_id,
            match_log: match_log.into(),
            winner: winner.into(),
            time: time.into(),
        }
    }
}
