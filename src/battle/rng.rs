use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of every random outcome in a battle.
///
/// All randomness is expressed as a percent roll in `1..=100`. A chance of
/// `n` percent succeeds when the roll is `<= n`, and every chance check draws
/// exactly one roll, so a scripted sequence lines up with the checks a turn
/// performs.
#[derive(Debug, Clone)]
pub enum TurnRng {
    /// Replays fixed outcomes in order. Used by tests.
    Scripted { outcomes: Vec<u8>, index: usize },
    /// Reproducible pseudo-random outcomes.
    Seeded(StdRng),
}

impl TurnRng {
    pub fn scripted(outcomes: Vec<u8>) -> Self {
        TurnRng::Scripted { outcomes, index: 0 }
    }

    pub fn seeded(seed: u64) -> Self {
        TurnRng::Seeded(StdRng::seed_from_u64(seed))
    }

    pub fn from_os_rng() -> Self {
        TurnRng::Seeded(StdRng::from_os_rng())
    }

    pub fn next_outcome(&mut self, reason: &str) -> u8 {
        let outcome = match self {
            TurnRng::Scripted { outcomes, index } => {
                let Some(&outcome) = outcomes.get(*index) else {
                    panic!(
                        "TurnRng exhausted! Tried to get a value for: '{}'. Need more random values.",
                        reason
                    );
                };
                *index += 1;
                outcome
            }
            TurnRng::Seeded(rng) => rng.random_range(1..=100),
        };
        tracing::trace!(outcome, reason, "rng roll");
        outcome
    }

    /// Percent check; always consumes one roll.
    pub fn roll_chance(&mut self, chance: u8, reason: &str) -> bool {
        self.next_outcome(reason) <= chance
    }

    /// Rolls left in a scripted sequence; `None` for seeded sources.
    pub fn remaining(&self) -> Option<usize> {
        match self {
            TurnRng::Scripted { outcomes, index } => Some(outcomes.len().saturating_sub(*index)),
            TurnRng::Seeded(_) => None,
        }
    }
}
