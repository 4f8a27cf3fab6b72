/// All errors that can be returned by a MatchLogStore implementation.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A record with this match id is already stored. Records are immutable,
    /// so the append is rejected.
    #[error("match {match_id} already stored")]
    DuplicateMatch { match_id: u64 },

    /// No record with the given match id.
    #[error("match not found: {match_id}")]
    MatchNotFound { match_id: u64 },

    /// A stored line could not be decoded back into a record.
    #[error("corrupt record at line {line}: {message}")]
    Corrupt { line: usize, message: String },

    /// Filesystem error from a file-backed store.
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    /// A backend-specific storage error (serialization, connection, etc.).
    #[error("storage backend error: {0}")]
    Backend(String),
}
