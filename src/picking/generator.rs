//! Unique random value sources.

use std::collections::BTreeMap;

use crate::error::{ForgeError, ForgeResult, InvalidRangeKind};
use crate::hash::derive_seed;
use crate::rng::{Pcg32, Rng, SeedableRng};
use crate::telemetry::{InvariantChecker, InvariantViolation};

/// A source of random values that never repeats within a sampling space until
/// [`reset`](Self::reset) is called.
///
/// A sampling space is identified by its `(lower, upper)` pair. Calls against
/// different spaces do not affect each other.
pub trait UniqueRandomGenerator {
    /// Returns a value in `[lower, upper)` that this generator has not returned
    /// for the same space since the last reset.
    ///
    /// # Errors
    /// - [`ExhaustedSequence`] when the space holds no unreturned value, which
    ///   includes the empty space `lower == upper`.
    /// - [`InvalidRange`] with [`InvertedBounds`] when `lower > upper`.
    ///
    /// [`ExhaustedSequence`]: ForgeError::ExhaustedSequence
    /// [`InvalidRange`]: ForgeError::InvalidRange
    /// [`InvertedBounds`]: InvalidRangeKind::InvertedBounds
    fn next(&mut self, lower: usize, upper: usize) -> ForgeResult<usize>;

    /// Returns a value in `[lower, upper]` (inclusive) without recording it.
    ///
    /// # Errors
    /// [`InvalidRange`] with [`InvertedBounds`] when `lower > upper`.
    ///
    /// [`InvalidRange`]: ForgeError::InvalidRange
    /// [`InvertedBounds`]: InvalidRangeKind::InvertedBounds
    fn draw(&mut self, lower: usize, upper: usize) -> ForgeResult<usize>;

    /// Forgets every value returned so far; all spaces become fresh.
    fn reset(&mut self);
}

/// Values of one sampling space not handed out yet.
///
/// Stored as a lazy Fisher-Yates shuffle: the first `remaining` slots of a
/// virtual array `0..size` hold the unreturned offsets, and `displaced` records
/// the slots whose content differs from their own index.
#[derive(Debug, Clone)]
struct SamplingSpace {
    size: usize,
    remaining: usize,
    displaced: BTreeMap<usize, usize>,
}

impl SamplingSpace {
    fn new(size: usize) -> Self {
        Self {
            size,
            remaining: size,
            displaced: BTreeMap::new(),
        }
    }

    /// Removes one offset chosen uniformly among the remaining ones.
    fn take(&mut self, rng: &mut Pcg32) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let slot = rng.gen_range_usize(0..self.remaining);
        let last = self.remaining - 1;
        let picked = self.displaced.get(&slot).copied().unwrap_or(slot);
        let tail = self.displaced.remove(&last).unwrap_or(last);
        if slot != last {
            self.displaced.insert(slot, tail);
        }
        self.remaining = last;
        Some(picked)
    }
}

/// The default [`UniqueRandomGenerator`], backed by [`Pcg32`].
///
/// Each call to [`next`](UniqueRandomGenerator::next) costs one RNG draw and is
/// uniform over the values still available, with no retry loop. Memory grows
/// with the number of values returned, not with the size of the space.
///
/// ```
/// use fixture_forge::picking::{UniqueRandomGenerator, UniqueSession};
///
/// let mut session = UniqueSession::seeded(42);
/// let mut seen: Vec<usize> = (0..5).map(|_| session.next(0, 5)).collect::<Result<_, _>>()?;
/// seen.sort_unstable();
/// assert_eq!(seen, vec![0, 1, 2, 3, 4]);
/// assert!(session.next(0, 5).is_err());
///
/// session.reset();
/// assert!(session.next(0, 5).is_ok());
/// # Ok::<(), fixture_forge::ForgeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct UniqueSession {
    rng: Pcg32,
    spaces: BTreeMap<(usize, usize), SamplingSpace>,
    epoch: u64,
}

impl UniqueSession {
    /// Creates a session seeded from timing entropy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(Pcg32::from_entropy())
    }

    /// Creates a session whose picks are fully determined by `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(Pcg32::seed_from_u64(seed))
    }

    /// Creates the session of one list build.
    ///
    /// With a base seed, the session seed is derived from it, the fixture type
    /// name and the list size. Without one, entropy is used.
    #[must_use]
    pub fn for_build(base_seed: Option<u64>, type_name: &str, capacity: usize) -> Self {
        match base_seed {
            Some(seed) => Self::seeded(derive_seed(seed, type_name, capacity)),
            None => Self::new(),
        }
    }

    /// Creates a session around an existing random source.
    #[must_use]
    pub fn with_rng(rng: Pcg32) -> Self {
        Self {
            rng,
            spaces: BTreeMap::new(),
            epoch: 0,
        }
    }

    /// Number of resets so far.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Number of values still available in `[lower, upper)`.
    #[must_use]
    pub fn remaining(&self, lower: usize, upper: usize) -> usize {
        self.spaces
            .get(&(lower, upper))
            .map_or(upper.saturating_sub(lower), |space| space.remaining)
    }
}

impl Default for UniqueSession {
    fn default() -> Self {
        Self::new()
    }
}

impl UniqueRandomGenerator for UniqueSession {
    fn next(&mut self, lower: usize, upper: usize) -> ForgeResult<usize> {
        if lower > upper {
            return Err(InvalidRangeKind::InvertedBounds { lower, upper }.into());
        }
        let space = self
            .spaces
            .entry((lower, upper))
            .or_insert_with(|| SamplingSpace::new(upper - lower));
        let offset = space
            .take(&mut self.rng)
            .ok_or(ForgeError::ExhaustedSequence { lower, upper })?;
        crate::debug_check_invariants!(self, "UniqueSession::next");
        Ok(lower + offset)
    }

    fn draw(&mut self, lower: usize, upper: usize) -> ForgeResult<usize> {
        if lower > upper {
            return Err(InvalidRangeKind::InvertedBounds { lower, upper }.into());
        }
        match (upper - lower).checked_add(1) {
            Some(span) => Ok(lower + self.rng.gen_range_usize(0..span)),
            // the whole usize domain
            None => Ok(self.rng.next_u64() as usize),
        }
    }

    fn reset(&mut self) {
        self.spaces.clear();
        self.epoch = self.epoch.wrapping_add(1);
        tracing::trace!(epoch = self.epoch, "unique session reset");
    }
}

impl InvariantChecker for UniqueSession {
    fn check_invariants(&self) -> Result<(), InvariantViolation> {
        for (&(lower, upper), space) in &self.spaces {
            if space.size != upper - lower {
                return Err(InvariantViolation::new(
                    "UniqueSession",
                    "sampling space size does not match its bounds",
                )
                .with_details(format!("[{lower}, {upper}) has size {}", space.size)));
            }
            if space.remaining > space.size {
                return Err(InvariantViolation::new(
                    "UniqueSession",
                    "more values remaining than the space holds",
                )
                .with_details(format!("{} > {}", space.remaining, space.size)));
            }
            if let Some((&slot, &offset)) = space
                .displaced
                .iter()
                .find(|&(&slot, &offset)| slot >= space.remaining || offset >= space.size)
            {
                return Err(InvariantViolation::new(
                    "UniqueSession",
                    "displaced slot outside the remaining pool",
                )
                .with_details(format!(
                    "slot {slot} -> {offset}, remaining {}",
                    space.remaining
                )));
            }
        }
        Ok(())
    }
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
    use std::collections::BTreeSet;

    #[test]
    fn next_exhausts_after_every_value() {
        let mut session = UniqueSession::seeded(1);
        let values: BTreeSet<usize> = (0..10).map(|_| session.next(10, 20).unwrap()).collect();
        assert_eq!(values, (10..20).collect());
        assert_eq!(
            session.next(10, 20),
            Err(ForgeError::ExhaustedSequence {
                lower: 10,
                upper: 20
            })
        );
        assert!(session.check_invariants().is_ok());
    }

    #[test]
    fn empty_space_is_exhausted_immediately() {
        let mut session = UniqueSession::seeded(1);
        assert_eq!(
            session.next(4, 4),
            Err(ForgeError::ExhaustedSequence { lower: 4, upper: 4 })
        );
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let mut session = UniqueSession::seeded(1);
        let expected: ForgeError = InvalidRangeKind::InvertedBounds { lower: 5, upper: 2 }.into();
        assert_eq!(session.next(5, 2), Err(expected.clone()));
        assert_eq!(session.draw(5, 2), Err(expected));
    }

    #[test]
    fn spaces_are_independent() {
        let mut session = UniqueSession::seeded(9);
        assert_eq!(session.next(0, 1).unwrap(), 0);
        assert!(session.next(0, 1).is_err());
        // another space is untouched
        assert!(session.next(0, 2).is_ok());
        assert_eq!(session.remaining(0, 2), 1);
        assert_eq!(session.remaining(0, 1), 0);
    }

    #[test]
    fn reset_restores_every_space() {
        let mut session = UniqueSession::seeded(3);
        for _ in 0..3 {
            session.next(0, 3).unwrap();
        }
        assert_eq!(session.epoch(), 0);
        session.reset();
        assert_eq!(session.epoch(), 1);
        assert_eq!(session.remaining(0, 3), 3);
        assert!(session.next(0, 3).is_ok());
    }

    #[test]
    fn draw_does_not_consume_the_space() {
        let mut session = UniqueSession::seeded(5);
        for _ in 0..50 {
            let value = session.draw(0, 1).unwrap();
            assert!(value <= 1);
        }
        assert_eq!(session.remaining(0, 1), 1);
        assert_eq!(session.draw(7, 7).unwrap(), 7);
        let _ = session.draw(0, usize::MAX).unwrap();
    }

    #[test]
    fn seeded_sessions_replay_the_same_picks() {
        let mut a = UniqueSession::seeded(77);
        let mut b = UniqueSession::seeded(77);
        for _ in 0..20 {
            assert_eq!(a.next(0, 20).unwrap(), b.next(0, 20).unwrap());
        }
    }

    #[test]
    fn for_build_derives_from_the_base_seed() {
        let mut a = UniqueSession::for_build(Some(1), "Widget", 30);
        let mut b = UniqueSession::for_build(Some(1), "Widget", 30);
        let picks_a: Vec<usize> = (0..30).map(|_| a.next(0, 30).unwrap()).collect();
        let picks_b: Vec<usize> = (0..30).map(|_| b.next(0, 30).unwrap()).collect();
        assert_eq!(picks_a, picks_b);
    }

    #[test]
    fn huge_space_does_not_allocate_eagerly() {
        let mut session = UniqueSession::seeded(8);
        let first = session.next(0, usize::MAX).unwrap();
        let second = session.next(0, usize::MAX).unwrap();
        assert_ne!(first, second);
        assert_eq!(session.remaining(0, usize::MAX), usize::MAX - 2);
    }

    /// Every value is equally likely at every draw of an epoch, not only the
    /// first: the swap bookkeeping must keep the remaining pool uniform.
    #[test]
    fn next_is_uniform_at_every_draw_of_an_epoch() {
        const EPOCHS: usize = 20_000;
        const SIZE: usize = 10;
        // draw index within the epoch -> bucket counts
        let depths = [0usize, 1, 4, SIZE - 1];
        let mut buckets = [[0u32; SIZE]; 4];

        let mut session = UniqueSession::seeded(2024);
        for _ in 0..EPOCHS {
            session.reset();
            for depth in 0..SIZE {
                let value = session.next(0, SIZE).unwrap();
                if let Some(slot) = depths.iter().position(|&d| d == depth) {
                    buckets[slot][value] += 1;
                }
            }
        }

        // ~2000 per bucket; the bounds sit about six standard deviations out
        for (slot, counts) in buckets.iter().enumerate() {
            for (value, &count) in counts.iter().enumerate() {
                assert!(
                    (1750..=2250).contains(&count),
                    "draw {} picked {} {} times: {:?}",
                    depths[slot],
                    value,
                    count,
                    counts
                );
            }
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
    use std::collections::BTreeSet;

    proptest! {
        /// m successful calls over a space of size m return every value once.
        #[test]
        fn prop_next_is_a_permutation(
            seed in any::<u64>(),
            lower in 0usize..1000,
            size in 0usize..64,
        ) {
            let upper = lower + size;
            let mut session = UniqueSession::seeded(seed);
            let mut seen = BTreeSet::new();
            for _ in 0..size {
                let value = session.next(lower, upper).unwrap();
                prop_assert!((lower..upper).contains(&value));
                prop_assert!(seen.insert(value), "duplicate {}", value);
            }
            prop_assert!(
                matches!(session.next(lower, upper), Err(ForgeError::ExhaustedSequence { .. })),
                "call {} should exhaust the space",
                size + 1
            );
            prop_assert!(session.check_invariants().is_ok());
        }

        #[test]
        fn prop_draw_stays_inclusive(
            seed in any::<u64>(),
            lower in 0usize..1000,
            span in 0usize..1000,
        ) {
            let upper = lower + span;
            let mut session = UniqueSession::seeded(seed);
            for _ in 0..20 {
                let value = session.draw(lower, upper).unwrap();
                prop_assert!(value >= lower && value <= upper);
            }
        }
    }
}
