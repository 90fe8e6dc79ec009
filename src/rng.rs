//! PCG32 random source behind unique-random sessions.
//!
//! Every [`UniqueSession`](crate::picking::UniqueSession) owns one [`Pcg32`]. A
//! session built from a seed replays the same picks on every run, which is what
//! a failing fixture-based test needs to be reproducible; a session built from
//! entropy differs per build.
//!
//! # PCG32 Algorithm
//!
//! PCG-XSH-RR with 64 bits of state and 32-bit output, period 2^64.
//! Reference: <https://www.pcg-random.org/>
//!
//! ```rust
//! use fixture_forge::rng::{Pcg32, Rng, SeedableRng};
//!
//! let mut rng = Pcg32::seed_from_u64(12345);
//! let position = rng.gen_range_usize(0..40);
//! assert!(position < 40);
//! ```

use crate::{
    report_violation,
    telemetry::{ViolationKind, ViolationSeverity},
};

/// PCG32 random number generator.
///
/// Not cryptographically secure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pcg32 {
    state: u64,
    inc: u64,
}

/// Default increment for single-stream PCG32.
const PCG_DEFAULT_INCREMENT: u64 = 1442695040888963407;

/// Multiplier for the 64-bit LCG step.
const PCG_MULTIPLIER: u64 = 6364136223846793005;

impl Pcg32 {
    /// Creates a generator from an initial state and a stream selector.
    ///
    /// The increment derived from `stream` is forced odd.
    #[must_use]
    pub const fn new(state: u64, stream: u64) -> Self {
        let inc = (stream << 1) | 1;
        let mut pcg = Self { state: 0, inc };
        pcg.state = pcg.state.wrapping_mul(PCG_MULTIPLIER).wrapping_add(pcg.inc);
        pcg.state = pcg.state.wrapping_add(state);
        pcg.state = pcg.state.wrapping_mul(PCG_MULTIPLIER).wrapping_add(pcg.inc);
        pcg
    }

    /// Generates the next 32-bit random value.
    #[inline]
    #[must_use]
    pub fn next_u32(&mut self) -> u32 {
        let old_state = self.state;
        self.state = old_state
            .wrapping_mul(PCG_MULTIPLIER)
            .wrapping_add(self.inc);
        let xorshifted = (((old_state >> 18) ^ old_state) >> 27) as u32;
        let rot = (old_state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    /// Generates the next 64-bit random value from two 32-bit outputs.
    #[inline]
    #[must_use]
    pub fn next_u64(&mut self) -> u64 {
        let high = u64::from(self.next_u32());
        let low = u64::from(self.next_u32());
        (high << 32) | low
    }
}

/// Seeding for random sources.
pub trait SeedableRng: Sized {
    /// Creates a generator seeded from a 64-bit value.
    #[must_use]
    fn seed_from_u64(seed: u64) -> Self;

    /// Creates a generator seeded from timing and thread identity.
    #[must_use]
    fn from_entropy() -> Self;
}

impl SeedableRng for Pcg32 {
    fn seed_from_u64(seed: u64) -> Self {
        Self::new(seed, PCG_DEFAULT_INCREMENT)
    }

    fn from_entropy() -> Self {
        Self::seed_from_u64(timing_entropy_seed())
    }
}

/// Random draws used by the sampling code.
pub trait Rng {
    /// Returns the next 32-bit random value.
    fn next_u32(&mut self) -> u32;

    /// Returns the next 64-bit random value.
    fn next_u64(&mut self) -> u64;

    /// Draws a `usize` uniformly from `[low, high)` using rejection sampling.
    ///
    /// # Empty Range Behavior
    /// If `range.is_empty()`, reports a [`ViolationKind::Sampling`] violation and
    /// returns `range.start`.
    fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        if range.start >= range.end {
            report_violation!(
                ViolationSeverity::Error,
                ViolationKind::Sampling,
                "gen_range_usize called with empty range [{}..{})",
                range.start,
                range.end
            );
            return range.start;
        }
        let span = range.end - range.start;

        if span <= u32::MAX as usize {
            let threshold = (span as u32).wrapping_neg() % (span as u32);
            loop {
                let random_value = self.next_u32();
                if random_value >= threshold {
                    return range.start + (random_value % span as u32) as usize;
                }
            }
        } else {
            let span64 = span as u64;
            let threshold = span64.wrapping_neg() % span64;
            loop {
                let random_value = self.next_u64();
                if random_value >= threshold {
                    return range.start + (random_value % span64) as usize;
                }
            }
        }
    }
}

impl Rng for Pcg32 {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        Self::next_u32(self)
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        Self::next_u64(self)
    }
}

/// Timing-based seed for unseeded sessions.
///
/// Mixes the thread identity with a wall-clock reading so that two builds in a
/// row, or on two test threads, start from different states.
fn timing_entropy_seed() -> u64 {
    use crate::hash::DeterministicHasher;
    use std::hash::{Hash, Hasher};
    use web_time::{SystemTime, UNIX_EPOCH};

    let thread_hash = {
        let mut hasher = DeterministicHasher::new();
        std::thread::current().id().hash(&mut hasher);
        hasher.finish()
    };

    let timing_hash = {
        let mut hasher = DeterministicHasher::new();
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos())
            .unwrap_or_default()
            .hash(&mut hasher);
        hasher.finish()
    };

    thread_hash
        .wrapping_mul(timing_hash | 1)
        .wrapping_add(0x9e3779b97f4a7c15)
}

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;

    #[test]
    fn test_pcg32_deterministic() {
        let mut rng1 = Pcg32::seed_from_u64(12345);
        let mut rng2 = Pcg32::seed_from_u64(12345);

        for _ in 0..1000 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_gen_range_usize_stays_in_bounds() {
        let mut rng = Pcg32::seed_from_u64(42);

        for _ in 0..1000 {
            let val = rng.gen_range_usize(10..20);
            assert!((10..20).contains(&val));
        }
    }

    #[test]
    fn test_gen_range_usize_single_value() {
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..100 {
            assert_eq!(rng.gen_range_usize(7..8), 7);
        }
    }

    #[test]
    fn test_gen_range_usize_covers_every_bucket() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut buckets = [0u32; 10];

        for _ in 0..10_000 {
            buckets[rng.gen_range_usize(0..10)] += 1;
        }

        // ~1000 per bucket; wide margin keeps this deterministic-seed test stable
        for &count in &buckets {
            assert!(count > 800, "Bucket too low: {count}");
            assert!(count < 1200, "Bucket too high: {count}");
        }
    }

    /// An empty range returns its start instead of panicking.
    #[test]
    fn test_gen_range_usize_empty_returns_start() {
        let mut rng = Pcg32::seed_from_u64(42);
        assert_eq!(rng.gen_range_usize(500..500), 500);
        assert_eq!(rng.gen_range_usize(0..0), 0);
    }

    #[test]
    fn test_seedable_from_entropy() {
        let _rng = Pcg32::from_entropy();
    }

    #[test]
    fn test_pcg32_golden() {
        let mut rng = Pcg32::seed_from_u64(0);

        // Regression guard: these values pin the algorithm
        let expected = [
            0x348a463f_u32,
            0x4f205a1b_u32,
            0x2946c488_u32,
            0x805e36de_u32,
            0x79f994a9_u32,
        ];

        for &exp in &expected {
            assert_eq!(rng.next_u32(), exp, "Golden test failed");
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Same seed, same draws: seeded builds are reproducible.
        #[test]
        fn prop_same_seed_same_draws(seed in any::<u64>(), upper in 1usize..500) {
            let mut rng1 = Pcg32::seed_from_u64(seed);
            let mut rng2 = Pcg32::seed_from_u64(seed);

            for _ in 0..50 {
                prop_assert_eq!(
                    rng1.gen_range_usize(0..upper),
                    rng2.gen_range_usize(0..upper)
                );
            }
        }

        #[test]
        fn prop_gen_range_usize_within_bounds(
            seed in any::<u64>(),
            start in 0usize..10000,
            span in 1usize..10000,
        ) {
            let end = start + span;
            let mut rng = Pcg32::seed_from_u64(seed);

            for _ in 0..50 {
                let val = rng.gen_range_usize(start..end);
                prop_assert!(val >= start, "output {} below start {}", val, start);
                prop_assert!(val < end, "output {} >= end {}", val, end);
            }
        }
    }
}
