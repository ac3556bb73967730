//! Allocation pattern simulation
//!
//! Every worker picks one [`AllocationPatternKind`] when it starts and keeps it
//! for its whole run. After each iteration the pattern decides how long the
//! worker pauses before allocating again:
//!
//! - **Sequential**: fixed 10 ms pause
//! - **Random**: pause drawn uniformly from 5..=20 ms
//! - **Burst**: no pause

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Pause used by the sequential pattern
pub const SEQUENTIAL_DELAY: Duration = Duration::from_millis(10);

/// Inclusive millisecond bounds of the random pattern's pause
pub const RANDOM_DELAY_MS: (u64, u64) = (5, 20);

/// Allocation cadence of a worker
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AllocationPatternKind {
    Sequential,
    Random,
    Burst,
}

impl AllocationPatternKind {
    /// All pattern kinds, in declaration order
    pub const ALL: [AllocationPatternKind; 3] = [
        AllocationPatternKind::Sequential,
        AllocationPatternKind::Random,
        AllocationPatternKind::Burst,
    ];

    /// Pick one kind uniformly at random
    pub fn choose(rng: &mut dyn RngCore) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            AllocationPatternKind::Sequential => "Sequential",
            AllocationPatternKind::Random => "Random",
            AllocationPatternKind::Burst => "Burst",
        }
    }
}

impl fmt::Display for AllocationPatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compute the pause that follows an iteration
///
/// Only the random pattern consumes a value from `rng`.
pub fn delay_for(kind: AllocationPatternKind, rng: &mut dyn RngCore) -> Duration {
    match kind {
        AllocationPatternKind::Sequential => SEQUENTIAL_DELAY,
        AllocationPatternKind::Random => {
            let (lo, hi) = RANDOM_DELAY_MS;
            Duration::from_millis(rng.gen_range(lo..=hi))
        }
        AllocationPatternKind::Burst => Duration::ZERO,
    }
}

/// Block the calling thread for the pattern's pause
pub fn apply(kind: AllocationPatternKind, rng: &mut dyn RngCore) {
    let delay = delay_for(kind, rng);
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;
    use std::time::Instant;

    #[test]
    fn test_sequential_delay_is_fixed() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        for _ in 0..10 {
            assert_eq!(
                delay_for(AllocationPatternKind::Sequential, &mut rng),
                Duration::from_millis(10)
            );
        }
    }

    #[test]
    fn test_random_delay_in_range() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(2);
        let mut min_seen = u128::MAX;
        let mut max_seen = 0;

        for _ in 0..2000 {
            let ms = delay_for(AllocationPatternKind::Random, &mut rng).as_millis();
            assert!((5..=20).contains(&ms), "delay {}ms out of range", ms);
            min_seen = min_seen.min(ms);
            max_seen = max_seen.max(ms);
        }

        assert_eq!(min_seen, 5);
        assert_eq!(max_seen, 20);
    }

    #[test]
    fn test_burst_has_no_delay() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        assert_eq!(delay_for(AllocationPatternKind::Burst, &mut rng), Duration::ZERO);

        let start = Instant::now();
        apply(AllocationPatternKind::Burst, &mut rng);
        assert!(start.elapsed() < Duration::from_millis(5));
    }

    #[test]
    fn test_apply_sequential_sleeps() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(4);
        let start = Instant::now();
        apply(AllocationPatternKind::Sequential, &mut rng);
        assert!(start.elapsed() >= Duration::from_millis(10));
    }

    #[test]
    fn test_choose_covers_all_kinds() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
        let mut seen = std::collections::HashSet::new();

        for _ in 0..300 {
            seen.insert(AllocationPatternKind::choose(&mut rng));
        }

        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_choose_is_roughly_uniform() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(6);
        let mut counts = std::collections::HashMap::new();

        for _ in 0..3000 {
            *counts.entry(AllocationPatternKind::choose(&mut rng)).or_insert(0u32) += 1;
        }

        for kind in AllocationPatternKind::ALL {
            let count = counts.get(&kind).copied().unwrap_or(0);
            assert!(count > 850 && count < 1150, "{} chosen {} times", kind, count);
        }
    }

    #[test]
    fn test_display_names() {
        assert_eq!(AllocationPatternKind::Sequential.to_string(), "Sequential");
        assert_eq!(AllocationPatternKind::Random.to_string(), "Random");
        assert_eq!(AllocationPatternKind::Burst.to_string(), "Burst");
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&AllocationPatternKind::Burst).unwrap();
        assert_eq!(json, "\"burst\"");
    }
}
