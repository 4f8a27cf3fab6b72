//! Match log: timestamped lines in causal order.
//!
//! Each line renders as `<RFC 3339 timestamp>:<message>\n`. The message
//! constructors in this module are the only place the line templates live.

use std::fmt;
use std::sync::Arc;

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::clock::Clock;
use crate::participant::Participant;

/// Format a timestamp as RFC 3339, falling back to the unix timestamp for
/// dates RFC 3339 cannot express.
pub fn format_timestamp(at: OffsetDateTime) -> String {
    at.format(&Rfc3339)
        .unwrap_or_else(|_| at.unix_timestamp().to_string())
}

/// One timestamped log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub at: OffsetDateTime,
    pub message: String,
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", format_timestamp(self.at), self.message)
    }
}

/// Ordered lines of one match.
///
/// Timestamps are strictly increasing: a clock reading that does not move
/// past the previous line is bumped one nanosecond after it.
pub struct MatchLog {
    clock: Arc<dyn Clock>,
    lines: Vec<LogLine>,
}

impl MatchLog {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            lines: Vec::new(),
        }
    }

    pub fn push(&mut self, message: impl Into<String>) -> &LogLine {
        let now = self.clock.now();
        let at = match self.lines.last() {
            Some(prev) if now <= prev.at => prev.at + time::Duration::nanoseconds(1),
            _ => now,
        };
        self.lines.push(LogLine {
            at,
            message: message.into(),
        });
        let line = &self.lines[self.lines.len() - 1];
        tracing::trace!(line = %line, "match log");
        line
    }

    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }
}

/// Concatenate lines into the persisted text form, one `\n` per line.
pub fn render(lines: &[LogLine]) -> String {
    let mut text = String::new();
    for line in lines {
        text.push_str(&line.to_string());
        text.push('\n');
    }
    text
}

pub fn header(match_id: u64) -> String {
    format!("------------------ New Match {match_id} ------------------")
}

pub fn seating() -> String {
    format!(
        "{} & {} on the court",
        Participant::A.name(),
        Participant::B.name()
    )
}

pub fn rally_success(active: Participant, submitted: u32, responder_value: u32) -> String {
    format!(
        "[{}] {{{}}} ==> [{}] ==> [{}]",
        active.name(),
        submitted,
        responder_value,
        active.opponent().name()
    )
}

pub fn rally_failure(
    active: Participant,
    submitted: u32,
    responder_value: u32,
    new_power: u32,
) -> String {
    format!(
        "[{}] {{{}}} ==> [{}] ==> X [{}] [{}]",
        active.name(),
        submitted,
        responder_value,
        new_power,
        active.opponent().name()
    )
}

pub fn winner(winner: Participant) -> String {
    format!("[Alert] {} wins!", winner.name())
}

pub fn game_over() -> String {
    "------------------- Game Over -------------------".to_string()
}
