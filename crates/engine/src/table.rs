//! The power table: the responder side of every rally.
//!
//! Given a submitted power and the submitting player's name, the table
//! returns a reduced power between 70% and 90% of the input. It holds no
//! match state and may be called concurrently.

use std::ops::RangeInclusive;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::TableError;

/// Percentages the table may keep of a submitted power.
pub const ATTENUATION_PERCENT: RangeInclusive<u32> = 70..=90;

/// Reduce `power` to `percent`% using integer arithmetic.
///
/// The product is computed in 64 bits so every `u32` power is accepted.
pub fn attenuate(power: u32, percent: u32) -> u32 {
    (u64::from(power) * u64::from(percent) / 100) as u32
}

/// Check raw request input and narrow the power to `u32`.
///
/// Rejects non-positive powers, powers above `u32::MAX`, and empty names.
pub fn validate(power: i64, name: &str) -> Result<u32, TableError> {
    if power <= 0 {
        return Err(TableError::InvalidPower { power });
    }
    let power = u32::try_from(power).map_err(|_| TableError::InvalidPower { power })?;
    if name.is_empty() {
        return Err(TableError::MissingName);
    }
    Ok(power)
}

/// A table with its own percentage generator.
pub struct Table {
    rng: Mutex<StdRng>,
}

impl Table {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Return a power between 70% and 90% of `power`.
    pub fn resolve(&self, power: u32, name: &str) -> Result<u32, TableError> {
        if power == 0 {
            return Err(TableError::InvalidPower { power: 0 });
        }
        if name.is_empty() {
            return Err(TableError::MissingName);
        }
        let percent = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            rng.gen_range(ATTENUATION_PERCENT)
        };
        let reduced = attenuate(power, percent);
        tracing::trace!(power, percent, reduced, name, "table resolved power");
        Ok(reduced)
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attenuate_uses_integer_floor() {
        assert_eq!(attenuate(100, 70), 70);
        assert_eq!(attenuate(99, 90), 89);
        assert_eq!(attenuate(1, 90), 0);
        assert_eq!(attenuate(u32::MAX, 90), (u64::from(u32::MAX) * 90 / 100) as u32);
    }

    #[test]
    fn resolve_stays_within_bounds() {
        let table = Table::seeded(3);
        for power in 1..=2_000u32 {
            let r = table.resolve(power, "Player A").unwrap();
            assert!(
                r >= attenuate(power, 70) && r <= attenuate(power, 90),
                "power {power} resolved to {r}"
            );
        }
    }

    #[test]
    fn resolve_hits_both_percent_bounds() {
        let table = Table::seeded(5);
        let results: Vec<u32> = (0..5_000)
            .map(|_| table.resolve(100, "Player B").unwrap())
            .collect();
        assert!(results.contains(&70));
        assert!(results.contains(&90));
    }

    #[test]
    fn resolve_rejects_zero_and_empty_name() {
        let table = Table::seeded(1);
        assert_eq!(
            table.resolve(0, "Player A"),
            Err(TableError::InvalidPower { power: 0 })
        );
        assert_eq!(table.resolve(80, ""), Err(TableError::MissingName));
    }

    #[test]
    fn validate_checks_power_before_name() {
        assert_eq!(validate(75, "Player A"), Ok(75));
        assert_eq!(validate(0, "Player A"), Err(TableError::InvalidPower { power: 0 }));
        assert_eq!(validate(-3, ""), Err(TableError::InvalidPower { power: -3 }));
        assert_eq!(validate(75, ""), Err(TableError::MissingName));
        let too_big = i64::from(u32::MAX) + 1;
        assert_eq!(
            validate(too_big, "Player A"),
            Err(TableError::InvalidPower { power: too_big })
        );
    }
}
