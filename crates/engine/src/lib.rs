//! Ping-pong match engine.
//!
//! A match alternates turns between [`Participant::A`] and [`Participant::B`].
//! Each turn submits the incoming power to a [`PowerResponder`], draws a new
//! power from a [`PowerSource`], and either returns the ball to the opponent
//! or loses the match. The [`MatchEngine`] runs every turn as its own tokio
//! task and hands the ball between them over channels; the result is a
//! [`MatchOutcome`] carrying the ordered [`MatchLog`] and the winner.
//!
//! The power table (the responder side of a rally) lives in [`table`] and is
//! reachable in process through [`LocalResponder`] or over HTTP through
//! [`HttpResponder`].

pub mod clock;
pub mod engine;
mod error;
pub mod log;
pub mod participant;
pub mod power;
pub mod responder;
pub mod table;

pub use clock::{Clock, SystemClock};
pub use engine::{MatchEngine, MatchOutcome};
pub use error::{EngineError, ResponderError, TableError};
pub use log::{LogLine, MatchLog};
pub use participant::Participant;
pub use power::{PowerSource, RandomPower, MAX_POWER, MIN_POWER};
pub use responder::{HttpResponder, LocalResponder, PowerResponder};
pub use table::Table;
