//! Match log storage for the ping-pong services.
//!
//! [`MatchLogStore`] is the append/query contract the player service uses to
//! persist finished matches and to continue match numbering across restarts.
//! Two backends ship with the crate:
//!
//! - [`MemoryStore`]: process-local, lost on exit.
//! - [`FileStore`]: JSON-lines file, one record per line.
//!
//! Any backend can be checked against [`conformance::run_conformance_suite`].

pub mod conformance;
mod error;
mod file;
mod memory;
mod record;
mod traits;

pub use error::StorageError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use record::MatchRecord;
pub use traits::MatchLogStore;
