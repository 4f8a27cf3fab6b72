/// Errors from the power table's input validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// Power was zero, negative, or does not fit a `u32`.
    #[error("Power must be a positive integer")]
    InvalidPower { power: i64 },

    #[error("Name is required")]
    MissingName,
}

/// Errors that can occur when a turn asks the responder for a value.
///
/// The engine never surfaces these to its caller: any responder error is a
/// lost rally for the active participant.
#[derive(Debug, thiserror::Error)]
pub enum ResponderError {
    /// The request could not be sent or the connection failed.
    #[error("responder request failed: {0}")]
    Transport(String),

    /// The responder answered with a non-success status.
    #[error("responder returned status {status}")]
    Status { status: u16 },

    /// The response body was not a decimal unsigned integer.
    #[error("responder body is not an unsigned integer: {body:?}")]
    InvalidBody { body: String },

    /// The responder rejected the input.
    #[error("responder rejected input: {0}")]
    Rejected(#[from] TableError),

    #[error("responder task join error: {0}")]
    Join(String),
}

/// Errors from running a match.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Every channel closed before a winner was reported.
    #[error("match {match_id} stalled with no winner")]
    Stalled { match_id: u64 },
}
