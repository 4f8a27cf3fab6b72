use async_trait::async_trait;

use crate::error::StorageError;
use crate::record::MatchRecord;

/// The storage trait for finished matches.
///
/// ## Numbering
///
/// Match ids are assigned by the caller, not by the store. The caller asks
/// [`next_match_id`](MatchLogStore::next_match_id) for the id to use, runs
/// the match, then calls [`append`](MatchLogStore::append). `next_match_id`
/// is a pure read: calling it twice without an append in between returns the
/// same value. Callers that trigger matches concurrently must serialize the
/// read/append pair themselves.
///
/// ## Immutability
///
/// A stored record is never replaced. Appending an id that already exists
/// returns `Err(StorageError::DuplicateMatch)` and leaves the stored record
/// untouched.
///
/// ## Thread Safety
///
/// Implementations must be `Send + Sync + 'static` to be used in axum
/// application state and across async task boundaries.
#[async_trait]
pub trait MatchLogStore: Send + Sync + 'static {
    /// One greater than the highest stored match id, or `1` when empty.
    async fn next_match_id(&self) -> Result<u64, StorageError>;

    /// Persist a new match record.
    async fn append(&self, record: MatchRecord) -> Result<(), StorageError>;

    /// Every stored record, in no particular order.
    async fn list_all(&self) -> Result<Vec<MatchRecord>, StorageError>;

    /// Read one record by match id.
    ///
    /// Returns `Err(StorageError::MatchNotFound)` if it does not exist.
    async fn get(&self, match_id: u64) -> Result<MatchRecord, StorageError>;
}
