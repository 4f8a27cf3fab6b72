//! Power generation for serves and returns.

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Lowest power a player can generate.
pub const MIN_POWER: u32 = 50;
/// Highest power a player can generate.
pub const MAX_POWER: u32 = 100;

/// Source of player power values.
///
/// Every serve and every return draws one value. Implementations used in
/// play must be uniform over `MIN_POWER..=MAX_POWER`; tests inject scripted
/// sources to make outcomes reproducible.
pub trait PowerSource: Send + Sync + 'static {
    fn draw(&self) -> u32;
}

/// Uniform draws over `MIN_POWER..=MAX_POWER` from a `StdRng`.
pub struct RandomPower {
    rng: Mutex<StdRng>,
}

impl RandomPower {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible draws: the same seed gives the same sequence.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomPower {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl PowerSource for RandomPower {
    fn draw(&self) -> u32 {
        // A poisoned rng is still a valid rng.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen_range(MIN_POWER..=MAX_POWER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_stay_in_range() {
        let source = RandomPower::seeded(7);
        for _ in 0..10_000 {
            let p = source.draw();
            assert!((MIN_POWER..=MAX_POWER).contains(&p), "out of range: {p}");
        }
    }

    #[test]
    fn draws_cover_both_bounds() {
        let source = RandomPower::seeded(11);
        let draws: Vec<u32> = (0..10_000).map(|_| source.draw()).collect();
        assert!(draws.contains(&MIN_POWER));
        assert!(draws.contains(&MAX_POWER));
    }

    #[test]
    fn same_seed_same_sequence() {
        let a = RandomPower::seeded(42);
        let b = RandomPower::seeded(42);
        let xs: Vec<u32> = (0..32).map(|_| a.draw()).collect();
        let ys: Vec<u32> = (0..32).map(|_| b.draw()).collect();
        assert_eq!(xs, ys);
    }
}
