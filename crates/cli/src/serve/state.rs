//! Application state for the player and table services.

use std::sync::Arc;

use pingpong_engine::{MatchEngine, Table};
use pingpong_storage::MatchLogStore;
use tokio::sync::Mutex;

use crate::journal::CsvJournal;

/// Player service state: the engine, the store, and the trigger lock.
pub(crate) struct PlayerState {
    pub(crate) engine: MatchEngine,
    pub(crate) store: Arc<dyn MatchLogStore>,
    /// Optional CSV copy of every finished match.
    pub(crate) journal: Option<CsvJournal>,
    /// Held from id allocation until the record is appended, so concurrent
    /// triggers never receive the same match id.
    pub(crate) trigger: Mutex<()>,
}

impl PlayerState {
    pub(crate) fn new(
        engine: MatchEngine,
        store: Arc<dyn MatchLogStore>,
        journal: Option<CsvJournal>,
    ) -> Self {
        Self {
            engine,
            store,
            journal,
            trigger: Mutex::new(()),
        }
    }
}

/// Table service state.
pub(crate) struct TableState {
    pub(crate) table: Table,
}
