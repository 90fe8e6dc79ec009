//! Picking distinct elements of a list.

use crate::error::{ForgeError, ForgeResult, InvalidRangeKind};
use crate::picking::{Constraint, UniqueRandomGenerator};

/// Selects distinct elements of a list through a [`UniqueRandomGenerator`].
///
/// The picker never resets the generator. Every pick made through one session
/// is unique within that session, so callers decide the uniqueness scope by
/// deciding when to reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniqueRandomPicker {
    constraint: Constraint,
}

impl UniqueRandomPicker {
    /// Creates a picker taking as many elements as `constraint` asks for.
    #[must_use]
    pub const fn new(constraint: Constraint) -> Self {
        Self { constraint }
    }

    /// The constraint this picker was created with.
    #[must_use]
    pub const fn constraint(&self) -> Constraint {
        self.constraint
    }

    /// Picks one element of `list` not yet picked from a list of this length in
    /// the current session.
    ///
    /// # Errors
    /// - [`EmptyCollection`] when `list` is empty.
    /// - [`ExhaustedSequence`] when every index has already been picked.
    /// - [`InvalidRange`] when the generator returns an index outside `list`.
    ///
    /// [`EmptyCollection`]: ForgeError::EmptyCollection
    /// [`ExhaustedSequence`]: ForgeError::ExhaustedSequence
    /// [`InvalidRange`]: ForgeError::InvalidRange
    pub fn from<'a, T>(
        &self,
        generator: &mut dyn UniqueRandomGenerator,
        list: &'a [T],
    ) -> ForgeResult<&'a T> {
        if list.is_empty() {
            return Err(ForgeError::EmptyCollection);
        }
        let index = generator.next(0, list.len())?;
        list.get(index).ok_or_else(|| {
            InvalidRangeKind::IndexOutOfBounds {
                index,
                len: list.len(),
            }
            .into()
        })
    }

    /// Picks as many distinct elements of `list` as the constraint asks for,
    /// in pick order.
    ///
    /// An end of zero returns an empty vector without looking at `list`.
    ///
    /// # Errors
    /// Everything [`from`](Self::from) and [`Constraint::end`] return. Asking
    /// for more elements than `list` holds ends in [`ExhaustedSequence`].
    ///
    /// [`ExhaustedSequence`]: ForgeError::ExhaustedSequence
    pub fn list_from<'a, T>(
        &self,
        generator: &mut dyn UniqueRandomGenerator,
        list: &'a [T],
    ) -> ForgeResult<Vec<&'a T>> {
        let end = self.constraint.end(generator)?;
        let mut picked = Vec::with_capacity(end.min(list.len()));
        for _ in 0..end {
            picked.push(self.from(generator, list)?);
        }
        Ok(picked)
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
    use std::collections::{BTreeSet, VecDeque};

    /// Replays scripted indices and records how it was used.
    #[derive(Default)]
    struct ScriptedGenerator {
        script: VecDeque<usize>,
        requests: Vec<(usize, usize)>,
        resets: usize,
    }

    impl ScriptedGenerator {
        fn new(script: &[usize]) -> Self {
            Self {
                script: script.iter().copied().collect(),
                ..Self::default()
            }
        }
    }

    impl UniqueRandomGenerator for ScriptedGenerator {
        fn next(&mut self, lower: usize, upper: usize) -> ForgeResult<usize> {
            self.requests.push((lower, upper));
            self.script
                .pop_front()
                .ok_or(ForgeError::ExhaustedSequence { lower, upper })
        }

        fn draw(&mut self, lower: usize, _upper: usize) -> ForgeResult<usize> {
            Ok(lower)
        }

        fn reset(&mut self) {
            self.resets += 1;
        }
    }

    #[test]
    fn from_returns_the_generated_index() {
        let picker = UniqueRandomPicker::new(Constraint::UpTo(1));
        let mut generator = ScriptedGenerator::new(&[2]);
        let list = ["a", "b", "c"];

        assert_eq!(*picker.from(&mut generator, &list).unwrap(), "c");
        assert_eq!(generator.requests, vec![(0, 3)]);
        assert_eq!(generator.resets, 0);
    }

    #[test]
    fn from_empty_list_fails_without_touching_the_generator() {
        let picker = UniqueRandomPicker::new(Constraint::UpTo(1));
        let mut generator = ScriptedGenerator::new(&[0]);
        let list: [u8; 0] = [];

        assert_eq!(
            picker.from(&mut generator, &list),
            Err(ForgeError::EmptyCollection)
        );
        assert!(generator.requests.is_empty());
    }

    #[test]
    fn from_rejects_out_of_bounds_index() {
        let picker = UniqueRandomPicker::new(Constraint::UpTo(1));
        let mut generator = ScriptedGenerator::new(&[5]);
        let list = [1, 2];

        assert_eq!(
            picker.from(&mut generator, &list),
            Err(ForgeError::InvalidRange(InvalidRangeKind::IndexOutOfBounds {
                index: 5,
                len: 2
            }))
        );
    }

    #[test]
    fn list_from_with_zero_end_is_empty() {
        let picker = UniqueRandomPicker::new(Constraint::UpTo(0));
        let mut generator = ScriptedGenerator::new(&[]);
        let list: [u8; 0] = [];

        assert!(picker.list_from(&mut generator, &list).unwrap().is_empty());
        assert!(generator.requests.is_empty());
    }

    #[test]
    fn list_from_picks_in_generator_order() {
        let picker = UniqueRandomPicker::new(Constraint::UpTo(3));
        let mut generator = ScriptedGenerator::new(&[4, 0, 2]);
        let list = [10, 11, 12, 13, 14];

        let picked = picker.list_from(&mut generator, &list).unwrap();
        assert_eq!(picked, vec![&14, &10, &12]);
        assert_eq!(generator.resets, 0);
    }

    #[test]
    fn list_from_is_distinct_within_a_session() {
        let picker = UniqueRandomPicker::new(Constraint::UpTo(10));
        let mut session = UniqueSession::seeded(21);
        let list: Vec<usize> = (0..10).collect();

        let picked: BTreeSet<usize> = picker
            .list_from(&mut session, &list)
            .unwrap()
            .into_iter()
            .copied()
            .collect();
        assert_eq!(picked.len(), 10);
    }

    #[test]
    fn list_from_asking_for_too_many_is_exhausted() {
        let picker = UniqueRandomPicker::new(Constraint::UpTo(4));
        let mut session = UniqueSession::seeded(21);
        let list = [1, 2, 3];

        assert_eq!(
            picker.list_from(&mut session, &list),
            Err(ForgeError::ExhaustedSequence { lower: 0, upper: 3 })
        );
    }

    #[test]
    fn two_pickers_in_one_session_do_not_overlap() {
        let picker = UniqueRandomPicker::new(Constraint::UpTo(5));
        let mut session = UniqueSession::seeded(4);
        let list: Vec<usize> = (0..10).collect();

        let first: BTreeSet<usize> = picker
            .list_from(&mut session, &list)
            .unwrap()
            .into_iter()
            .copied()
            .collect();
        let second: BTreeSet<usize> = picker
            .list_from(&mut session, &list)
            .unwrap()
            .into_iter()
            .copied()
            .collect();
        assert!(first.is_disjoint(&second));
    }
}
