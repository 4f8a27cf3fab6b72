//! `pingpong play` -- run one match without the HTTP services.

use std::sync::Arc;
use std::time::Duration;

use pingpong_engine::{
    HttpResponder, LocalResponder, MatchEngine, MatchOutcome, PowerResponder, RandomPower, Table,
};

/// Options for a single local match.
pub(crate) struct PlayOptions {
    pub(crate) match_id: u64,
    /// Seeds both the player power draws and the local table.
    pub(crate) seed: Option<u64>,
    /// Resolve against a remote table service instead of an in-process one.
    pub(crate) table_url: Option<String>,
    pub(crate) think_time: Duration,
    pub(crate) responder_timeout: Option<Duration>,
}

pub(crate) fn build_engine(options: &PlayOptions) -> MatchEngine {
    let responder: Arc<dyn PowerResponder> = match (&options.table_url, options.seed) {
        (Some(url), _) => Arc::new(HttpResponder::new(url, options.responder_timeout)),
        // The table gets a derived seed so its stream differs from the players'.
        (None, Some(seed)) => Arc::new(LocalResponder::new(Arc::new(Table::seeded(
            seed.wrapping_mul(0x9e3779b97f4a7c15),
        )))),
        (None, None) => Arc::new(LocalResponder::default()),
    };

    let power = match options.seed {
        Some(seed) => RandomPower::seeded(seed),
        None => RandomPower::from_entropy(),
    };

    MatchEngine::new(responder)
        .with_power_source(Arc::new(power))
        .with_think_time(options.think_time)
}

pub(crate) async fn run_play(options: PlayOptions) -> Result<MatchOutcome, Box<dyn std::error::Error>> {
    let engine = build_engine(&options);
    let outcome = engine.play(options.match_id).await?;
    Ok(outcome)
}
