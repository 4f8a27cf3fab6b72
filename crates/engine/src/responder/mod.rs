//! Power responder abstraction: how a turn learns the value it must beat.
//!
//! - [`LocalResponder`] calls a [`Table`](crate::Table) in process
//! - [`HttpResponder`] calls a remote table service over HTTP

pub mod http;
pub mod local;

use async_trait::async_trait;

use crate::error::ResponderError;

pub use http::HttpResponder;
pub use local::LocalResponder;

/// Returns the value the opponent's defense puts on a submitted power.
///
/// The engine only consumes the returned integer; it does not assume any
/// relation to `power`. Any error is a lost rally for the submitting player.
#[async_trait]
pub trait PowerResponder: Send + Sync + 'static {
    async fn resolve(&self, power: u32, name: &str) -> Result<u32, ResponderError>;

    /// Short identifier for logs (e.g. `"local"`, `"http"`).
    fn responder_id(&self) -> &str;
}
