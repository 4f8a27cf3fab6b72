//! The match engine: turn tasks handing the ball to each other over channels.
//!
//! ```text
//!            serve                ┌──────────────┐
//!   dispatch ─────▶ a_tx ───────▶ │  dispatch    │ ──spawn──▶ turn(A) ─┐
//!                                 │  loop        │                     │ new power
//!            b_tx ◀─────────────────────────────────────────────────────┘
//!              │                  │  (select!)   │ ──spawn──▶ turn(B) ── ...
//!              └────────────────▶ │              │
//!   winner_tx ◀── failing turn    └──────────────┘ ◀── winner_rx
//! ```
//!
//! Each hand-off channel carries the power the receiving player must
//! return. The dispatch loop spawns one turn task per received power and
//! stops at the first winner. Only the task holding the ball does any work,
//! so log appends never race.

use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;

use crate::clock::{Clock, SystemClock};
use crate::error::EngineError;
use crate::log::{self, LogLine, MatchLog};
use crate::participant::Participant;
use crate::power::{PowerSource, RandomPower};
use crate::responder::PowerResponder;

/// Think time before and after each responder call.
pub const DEFAULT_THINK_TIME: Duration = Duration::from_secs(1);

/// A finished match.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub match_id: u64,
    pub lines: Vec<LogLine>,
    pub winner: Participant,
    pub completed_at: OffsetDateTime,
}

impl MatchOutcome {
    /// The persisted log text: every line followed by `\n`.
    pub fn log_text(&self) -> String {
        log::render(&self.lines)
    }

    /// Number of rallies played (one log line each).
    pub fn rally_count(&self) -> usize {
        // header, seating, winner, game over
        self.lines.len().saturating_sub(4)
    }
}

/// Runs matches. Holds the collaborators, never any match state.
pub struct MatchEngine {
    responder: Arc<dyn PowerResponder>,
    power: Arc<dyn PowerSource>,
    clock: Arc<dyn Clock>,
    think_time: Duration,
}

impl MatchEngine {
    /// Engine with random power, the system clock, and the default think time.
    pub fn new(responder: Arc<dyn PowerResponder>) -> Self {
        Self {
            responder,
            power: Arc::new(RandomPower::from_entropy()),
            clock: Arc::new(SystemClock),
            think_time: DEFAULT_THINK_TIME,
        }
    }

    pub fn with_power_source(mut self, power: Arc<dyn PowerSource>) -> Self {
        self.power = power;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_think_time(mut self, think_time: Duration) -> Self {
        self.think_time = think_time;
        self
    }

    /// Play one match to completion.
    ///
    /// `match_id` only labels the header line; allocating it is the caller's
    /// job. Responder failures end the match, they are not errors here.
    pub async fn play(&self, match_id: u64) -> Result<MatchOutcome, EngineError> {
        let log = Arc::new(Mutex::new(MatchLog::new(self.clock.clone())));
        {
            let mut log = log.lock().await;
            log.push(log::header(match_id));
            log.push(log::seating());
        }

        let (a_tx, mut a_rx) = mpsc::channel::<u32>(1);
        let (b_tx, mut b_rx) = mpsc::channel::<u32>(1);
        let (winner_tx, mut winner_rx) = mpsc::channel::<Participant>(1);

        let serve = self.power.draw();
        tracing::debug!(match_id, power = serve, "serving to {}", Participant::A);
        a_tx.send(serve)
            .await
            .map_err(|_| EngineError::Stalled { match_id })?;

        let mut turns = JoinSet::new();
        let winner = loop {
            tokio::select! {
                // Winner first: once a winner is readable, no queued hand-off
                // may start another turn.
                biased;

                Some(winner) = winner_rx.recv() => break winner,
                Some(power) = a_rx.recv() => {
                    turns.spawn(self.turn(Participant::A, power, &b_tx, &winner_tx, &log).resolve());
                }
                Some(power) = b_rx.recv() => {
                    turns.spawn(self.turn(Participant::B, power, &a_tx, &winner_tx, &log).resolve());
                }
                else => return Err(EngineError::Stalled { match_id }),
            }
        };

        // Close everything before stopping stragglers so a late send fails
        // instead of queueing.
        a_rx.close();
        b_rx.close();
        winner_rx.close();
        turns.shutdown().await;

        let mut log = log.lock().await;
        log.push(log::winner(winner));
        log.push(log::game_over());
        let lines = log.lines().to_vec();
        let completed_at = lines.last().map_or_else(|| self.clock.now(), |l| l.at);

        tracing::info!(match_id, winner = %winner, rallies = lines.len().saturating_sub(4), "match finished");

        Ok(MatchOutcome {
            match_id,
            lines,
            winner,
            completed_at,
        })
    }

    fn turn(
        &self,
        active: Participant,
        power: u32,
        hand_off: &mpsc::Sender<u32>,
        winner: &mpsc::Sender<Participant>,
        log: &Arc<Mutex<MatchLog>>,
    ) -> Turn {
        Turn {
            active,
            power,
            hand_off: hand_off.clone(),
            forfeit: Forfeit {
                winner: winner.clone(),
                opponent: active.opponent(),
                armed: true,
            },
            responder: self.responder.clone(),
            source: self.power.clone(),
            log: log.clone(),
            think_time: self.think_time,
        }
    }
}

/// One participant holding the ball.
struct Turn {
    active: Participant,
    power: u32,
    hand_off: mpsc::Sender<u32>,
    forfeit: Forfeit,
    responder: Arc<dyn PowerResponder>,
    source: Arc<dyn PowerSource>,
    log: Arc<Mutex<MatchLog>>,
    think_time: Duration,
}

impl Turn {
    async fn resolve(mut self) {
        let active = self.active;

        tokio::time::sleep(self.think_time).await;
        let response = self.responder.resolve(self.power, active.name()).await;
        tokio::time::sleep(self.think_time).await;

        let responder_value = match response {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(
                    player = %active,
                    power = self.power,
                    responder = self.responder.responder_id(),
                    error = %e,
                    "responder failed, rally lost"
                );
                self.forfeit.declare().await;
                return;
            }
        };

        let new_power = self.source.draw();
        tracing::debug!(
            player = %active,
            submitted = self.power,
            responder_value,
            new_power,
            "rally"
        );

        if new_power > responder_value {
            self.log
                .lock()
                .await
                .push(log::rally_success(active, self.power, responder_value));
            // A closed channel means the match is already over.
            let _ = self.hand_off.send(new_power).await;
            self.forfeit.disarm();
        } else {
            self.log.lock().await.push(log::rally_failure(
                active,
                self.power,
                responder_value,
                new_power,
            ));
            self.forfeit.declare().await;
        }
    }
}

/// Reports the opponent as winner unless the turn finished cleanly.
///
/// A turn that is dropped while armed (panic inside the task) still
/// produces a winner, so the dispatch loop never waits forever.
struct Forfeit {
    winner: mpsc::Sender<Participant>,
    opponent: Participant,
    armed: bool,
}

impl Forfeit {
    async fn declare(&mut self) {
        self.armed = false;
        let _ = self.winner.send(self.opponent).await;
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for Forfeit {
    fn drop(&mut self) {
        if self.armed {
            let _ = self.winner.try_send(self.opponent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResponderError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Always(u32);

    impl PowerSource for Always {
        fn draw(&self) -> u32 {
            self.0
        }
    }

    struct Returns(u32);

    #[async_trait]
    impl PowerResponder for Returns {
        async fn resolve(&self, _power: u32, _name: &str) -> Result<u32, ResponderError> {
            Ok(self.0)
        }

        fn responder_id(&self) -> &str {
            "fixed"
        }
    }

    /// Succeeds `rallies` times, then demands more than any power.
    struct CountingResponder {
        calls: AtomicUsize,
        rallies: usize,
    }

    #[async_trait]
    impl PowerResponder for CountingResponder {
        async fn resolve(&self, _power: u32, _name: &str) -> Result<u32, ResponderError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(if n < self.rallies { 0 } else { u32::MAX })
        }

        fn responder_id(&self) -> &str {
            "counting"
        }
    }

    struct Panics;

    #[async_trait]
    impl PowerResponder for Panics {
        async fn resolve(&self, _power: u32, _name: &str) -> Result<u32, ResponderError> {
            panic!("responder blew up");
        }

        fn responder_id(&self) -> &str {
            "panics"
        }
    }

    fn engine(responder: Arc<dyn PowerResponder>) -> MatchEngine {
        MatchEngine::new(responder)
            .with_power_source(Arc::new(Always(100)))
            .with_think_time(Duration::ZERO)
    }

    #[tokio::test]
    async fn first_failure_ends_match_after_one_turn() {
        let outcome = engine(Arc::new(Returns(200))).play(1).await.unwrap();
        assert_eq!(outcome.winner, Participant::B);
        assert_eq!(outcome.rally_count(), 1);
        assert_eq!(
            outcome.lines[2].message,
            "[Player A] {100} ==> [200] ==> X [100] [Player B]"
        );
    }

    #[tokio::test]
    async fn loser_alternates_with_rally_count() {
        for rallies in 0..6usize {
            let responder = Arc::new(CountingResponder {
                calls: AtomicUsize::new(0),
                rallies,
            });
            let outcome = engine(responder).play(1).await.unwrap();
            // Turn `rallies` fails; even turns belong to Player A.
            let loser = if rallies % 2 == 0 {
                Participant::A
            } else {
                Participant::B
            };
            assert_eq!(outcome.winner, loser.opponent(), "rallies = {rallies}");
            assert_eq!(outcome.rally_count(), rallies + 1);
        }
    }

    #[tokio::test]
    async fn panicking_turn_forfeits() {
        let outcome = engine(Arc::new(Panics)).play(3).await.unwrap();
        assert_eq!(outcome.winner, Participant::B);
        assert_eq!(outcome.rally_count(), 0);
    }

    #[tokio::test]
    async fn header_carries_match_id() {
        let outcome = engine(Arc::new(Returns(200))).play(41).await.unwrap();
        assert_eq!(
            outcome.lines[0].message,
            "------------------ New Match 41 ------------------"
        );
        assert_eq!(outcome.completed_at, outcome.lines[outcome.lines.len() - 1].at);
    }
}
