//! Stochastic generators for test variations
//!
//! Uses seeded RNG for reproducibility. Print seed on failure for replay.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use edifact_core::Delimiters;

/// Characters a custom dialect may use as service characters.
///
/// No letters, digits or whitespace, and neither decimal mark.
const SERVICE_POOL: &[char] = &[
    '!', '"', '#', '%', '&', '|', '~', '^', '@', ';', '/', '=', '<', '>', ':', '+', '*', '?',
    '\'', '$', '_', '`',
];

/// Seeded generator for reproducible stochastic tests
pub struct Gen {
    pub rng: StdRng,
    pub seed: u64,
}

impl Gen {
    /// Create with specific seed (for reproduction)
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create from environment or random seed
    pub fn from_env_or_random() -> Self {
        let seed = std::env::var("EDIFACT_TEST_SEED")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(rand::random);
        Self::new(seed)
    }

    /// Geometric distribution: count until rand > alpha
    pub fn geometric(&mut self, alpha: f64) -> usize {
        let mut n = 0;
        while self.rng.gen::<f64>() < alpha {
            n += 1;
        }
        n
    }

    /// Random boolean with probability p
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.gen::<f64>() < p
    }

    /// Five distinct service characters plus a decimal mark
    pub fn custom_delimiters(&mut self) -> Delimiters {
        let mut chosen: Vec<char> = SERVICE_POOL
            .choose_multiple(&mut self.rng, 5)
            .copied()
            .collect();
        chosen.shuffle(&mut self.rng);
        Delimiters {
            component: chosen[0],
            data: chosen[1],
            decimal: if self.chance(0.5) { '.' } else { ',' },
            escape: Some(chosen[2]),
            repetition: Some(chosen[3]),
            segment: chosen[4],
        }
    }

    /// What follows a segment terminator in the raw text
    pub fn line_break(&mut self) -> &'static str {
        ["", "", "\n", "\r\n", "\r"][self.rng.gen_range(0..5)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reproducibility() {
        let mut g1 = Gen::new(42);
        let mut g2 = Gen::new(42);

        for _ in 0..10 {
            assert_eq!(g1.custom_delimiters(), g2.custom_delimiters());
            assert_eq!(g1.geometric(0.9), g2.geometric(0.9));
        }
    }

    #[test]
    fn test_custom_delimiters_distinct() {
        let mut gen = Gen::new(7);
        for _ in 0..100 {
            let d = gen.custom_delimiters();
            let mut all = vec![
                d.component,
                d.data,
                d.escape.unwrap(),
                d.repetition.unwrap(),
                d.segment,
            ];
            all.sort_unstable();
            all.dedup();
            assert_eq!(all.len(), 5);
            assert!(!all.contains(&d.decimal));
        }
    }
}
