//! How many elements a random selection takes.

use std::fmt;

use crate::error::{ForgeResult, InvalidRangeKind};
use crate::picking::UniqueRandomGenerator;

/// How many elements a random selection takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// Exactly `count` elements.
    UpTo(usize),
    /// A count drawn once, uniformly from `min..=max`.
    Between {
        /// Smallest count.
        min: usize,
        /// Largest count (inclusive).
        max: usize,
    },
}

impl Constraint {
    /// A constraint selecting exactly `count` elements.
    #[must_use]
    pub const fn up_to(count: usize) -> Self {
        Self::UpTo(count)
    }

    /// A constraint selecting between `min` and `max` elements (inclusive).
    ///
    /// # Errors
    /// Returns [`InvalidRange`] with [`MinGreaterThanMax`] when `min > max`.
    ///
    /// [`InvalidRange`]: crate::ForgeError::InvalidRange
    /// [`MinGreaterThanMax`]: InvalidRangeKind::MinGreaterThanMax
    pub fn between(min: usize, max: usize) -> ForgeResult<Self> {
        if min > max {
            return Err(InvalidRangeKind::MinGreaterThanMax { min, max }.into());
        }
        Ok(Self::Between { min, max })
    }

    /// Number of elements the selection takes.
    ///
    /// `UpTo` never touches the generator. `Between` draws once from the
    /// generator's plain (non-unique) source, so two windows in the same
    /// session do not consume each other's counts. A degenerate window
    /// `min == max` returns `min` without drawing.
    pub fn end(&self, generator: &mut dyn UniqueRandomGenerator) -> ForgeResult<usize> {
        match *self {
            Self::UpTo(count) => Ok(count),
            Self::Between { min, max } if min > max => {
                Err(InvalidRangeKind::MinGreaterThanMax { min, max }.into())
            },
            Self::Between { min, max } if min == max => Ok(min),
            Self::Between { min, max } => generator.draw(min, max),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UpTo(count) => write!(f, "{}", count),
            Self::Between { min, max } => write!(f, "{}..={}", min, max),
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
mod tests {
    use super::*;
    use crate::picking::UniqueSession;
    use crate::ForgeError;

    /// Counts how often the generator is touched.
    #[derive(Default)]
    struct CountingGenerator {
        draws: usize,
        nexts: usize,
    }

    impl UniqueRandomGenerator for CountingGenerator {
        fn next(&mut self, lower: usize, _upper: usize) -> ForgeResult<usize> {
            self.nexts += 1;
            Ok(lower)
        }

        fn draw(&mut self, _lower: usize, upper: usize) -> ForgeResult<usize> {
            self.draws += 1;
            Ok(upper)
        }

        fn reset(&mut self) {}
    }

    #[test]
    fn up_to_returns_its_count_without_randomness() {
        let mut generator = CountingGenerator::default();
        assert_eq!(Constraint::UpTo(7).end(&mut generator).unwrap(), 7);
        assert_eq!(Constraint::up_to(0).end(&mut generator).unwrap(), 0);
        assert_eq!(generator.draws, 0);
        assert_eq!(generator.nexts, 0);
    }

    #[test]
    fn between_rejects_inverted_bounds() {
        assert_eq!(
            Constraint::between(5, 2),
            Err(ForgeError::InvalidRange(InvalidRangeKind::MinGreaterThanMax {
                min: 5,
                max: 2
            }))
        );

        let mut generator = CountingGenerator::default();
        let raw = Constraint::Between { min: 9, max: 1 };
        assert!(matches!(
            raw.end(&mut generator),
            Err(ForgeError::InvalidRange(
                InvalidRangeKind::MinGreaterThanMax { .. }
            ))
        ));
    }

    #[test]
    fn degenerate_between_skips_the_generator() {
        let mut generator = CountingGenerator::default();
        let constraint = Constraint::between(3, 3).unwrap();
        assert_eq!(constraint.end(&mut generator).unwrap(), 3);
        assert_eq!(generator.draws, 0);
    }

    #[test]
    fn between_uses_the_plain_draw() {
        let mut generator = CountingGenerator::default();
        let constraint = Constraint::between(1, 4).unwrap();
        assert_eq!(constraint.end(&mut generator).unwrap(), 4);
        assert_eq!(generator.draws, 1);
        assert_eq!(generator.nexts, 0);
    }

    #[test]
    fn between_stays_in_window_over_many_draws() {
        let mut session = UniqueSession::seeded(11);
        let constraint = Constraint::between(2, 6).unwrap();
        let mut seen = [false; 7];
        for _ in 0..500 {
            let end = constraint.end(&mut session).unwrap();
            assert!((2..=6).contains(&end), "{end} outside 2..=6");
            seen[end] = true;
        }
        assert_eq!(seen, [false, false, true, true, true, true, true]);
    }

    #[test]
    fn display_shows_window() {
        assert_eq!(Constraint::UpTo(4).to_string(), "4");
        assert_eq!(Constraint::Between { min: 1, max: 3 }.to_string(), "1..=3");
    }
}
