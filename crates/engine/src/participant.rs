use std::fmt;

/// One of the two fixed players. Player A always serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Participant {
    A,
    B,
}

impl Participant {
    pub const ALL: [Participant; 2] = [Participant::A, Participant::B];

    pub fn name(self) -> &'static str {
        match self {
            Participant::A => "Player A",
            Participant::B => "Player B",
        }
    }

    pub fn opponent(self) -> Participant {
        match self {
            Participant::A => Participant::B,
            Participant::B => Participant::A,
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opponent_is_involution() {
        for p in Participant::ALL {
            assert_ne!(p.opponent(), p);
            assert_eq!(p.opponent().opponent(), p);
        }
    }

    #[test]
    fn display_matches_name() {
        for p in Participant::ALL {
            assert_eq!(p.to_string(), p.name());
        }
        assert_eq!(Participant::B.to_string(), "Player B");
    }
}
