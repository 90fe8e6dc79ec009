//! Declarations: a section of a list plus the actions applied to it.

use std::fmt;
use std::sync::Arc;

use crate::error::{ForgeResult, InvalidRangeKind};
use crate::picking::{Constraint, UniqueRandomGenerator, UniqueRandomPicker};
use crate::telemetry::{
    report_to_observer, BuildViolation, InvariantChecker, InvariantViolation, ViolationKind,
    ViolationObserver, ViolationSeverity,
};

/// An action run on one object; the `usize` is the object's list position.
pub type Action<T> = Box<dyn FnMut(&mut T, usize)>;

/// A constructor supplied by a declaration for the positions it covers.
pub type Constructor<T> = Box<dyn Fn() -> T>;

/// Which positions of a list a declaration targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Every position.
    Global,
    /// Positions `start..end`.
    Range {
        /// First position.
        start: usize,
        /// One past the last position.
        end: usize,
    },
    /// Distinct positions chosen at build time.
    Random {
        /// How many positions to choose.
        constraint: Constraint,
    },
}

impl Section {
    /// Whether this is the [`Global`](Self::Global) section.
    #[must_use]
    pub const fn is_global(&self) -> bool {
        matches!(self, Self::Global)
    }

    /// The bounds of a [`Range`](Self::Range) section.
    #[must_use]
    pub const fn as_range(&self) -> Option<(usize, usize)> {
        match *self {
            Self::Range { start, end } => Some((start, end)),
            Self::Global | Self::Random { .. } => None,
        }
    }

    /// Resolves the section against a list of `capacity` objects.
    ///
    /// Random sections draw from `generator` without resetting it.
    pub fn resolve(
        &self,
        capacity: usize,
        generator: &mut dyn UniqueRandomGenerator,
    ) -> ForgeResult<ResolvedIndices> {
        match *self {
            Self::Global => Ok(ResolvedIndices::all(capacity)),
            Self::Range { start, end } => {
                if start > end || end > capacity {
                    return Err(InvalidRangeKind::SectionOutOfBounds {
                        start,
                        end,
                        capacity,
                    }
                    .into());
                }
                Ok(ResolvedIndices::from_positions((start..end).collect(), capacity))
            },
            Self::Random { constraint } => {
                let candidates: Vec<usize> = (0..capacity).collect();
                let picked = UniqueRandomPicker::new(constraint).list_from(generator, &candidates)?;
                Ok(ResolvedIndices::from_positions(
                    picked.into_iter().copied().collect(),
                    capacity,
                ))
            },
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => write!(f, "all"),
            Self::Range { start, end } => write!(f, "[{}, {})", start, end),
            Self::Random { constraint } => write!(f, "random({})", constraint),
        }
    }
}

/// Sorted, duplicate-free positions of a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIndices {
    positions: Vec<usize>,
    capacity: usize,
}

impl ResolvedIndices {
    /// Every position of a list of `capacity` objects.
    #[must_use]
    pub fn all(capacity: usize) -> Self {
        Self {
            positions: (0..capacity).collect(),
            capacity,
        }
    }

    /// Sorts and deduplicates `positions`, dropping any at or past `capacity`.
    #[must_use]
    pub fn from_positions(mut positions: Vec<usize>, capacity: usize) -> Self {
        positions.sort_unstable();
        positions.dedup();
        positions.retain(|&position| position < capacity);
        let resolved = Self {
            positions,
            capacity,
        };
        crate::debug_check_invariants!(resolved);
        resolved
    }

    /// The positions in ascending order.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.positions
    }

    /// Number of positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether no position was resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Whether `position` is included.
    #[must_use]
    pub fn contains(&self, position: usize) -> bool {
        self.positions.binary_search(&position).is_ok()
    }

    /// Iterates the positions in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.positions.iter().copied()
    }
}

impl InvariantChecker for ResolvedIndices {
    fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if let Some(window) = self.positions.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(
                InvariantViolation::new("ResolvedIndices", "positions not strictly ascending")
                    .with_details(format!("{} before {}", window[0], window[1])),
            );
        }
        if let Some(&last) = self.positions.last() {
            if last >= self.capacity {
                return Err(
                    InvariantViolation::new("ResolvedIndices", "position out of range")
                        .with_details(format!("{} >= {}", last, self.capacity)),
                );
            }
        }
        Ok(())
    }
}

/// A section together with what happens to the objects it selects.
///
/// Mutate actions run first, in the order they were added, then side-effect
/// actions. Both kinds run once per selected object in ascending position order.
pub struct Declaration<T> {
    section: Section,
    mutate_actions: Vec<Action<T>>,
    side_effect_actions: Vec<Action<T>>,
    constructor: Option<Constructor<T>>,
    implicit: bool,
}

impl<T> Declaration<T> {
    /// An empty declaration over `section`.
    #[must_use]
    pub fn new(section: Section) -> Self {
        Self {
            section,
            mutate_actions: Vec::new(),
            side_effect_actions: Vec::new(),
            constructor: None,
            implicit: false,
        }
    }

    /// The catch-all a build adds when caller declarations leave positions
    /// uncovered.
    #[must_use]
    pub fn implicit_global() -> Self {
        Self {
            implicit: true,
            ..Self::new(Section::Global)
        }
    }

    /// The targeted section.
    #[must_use]
    pub const fn section(&self) -> &Section {
        &self.section
    }

    /// Whether the build synthesized this declaration.
    #[must_use]
    pub const fn is_implicit(&self) -> bool {
        self.implicit
    }

    /// Whether the declaration changes anything when applied.
    #[must_use]
    pub fn has_effect(&self) -> bool {
        !self.mutate_actions.is_empty()
            || !self.side_effect_actions.is_empty()
            || self.constructor.is_some()
    }

    /// Appends a mutate action.
    pub fn push_mutate(&mut self, action: Action<T>) {
        self.mutate_actions.push(action);
    }

    /// Appends a side-effect action.
    pub fn push_side_effect(&mut self, action: Action<T>) {
        self.side_effect_actions.push(action);
    }

    /// Sets the constructor for the covered positions, replacing any earlier one.
    pub fn set_constructor(&mut self, constructor: Constructor<T>) {
        self.constructor = Some(constructor);
    }

    /// The declaration's constructor, if one was supplied.
    #[must_use]
    pub fn constructor(&self) -> Option<&Constructor<T>> {
        self.constructor.as_ref()
    }

    /// Resolves the section; see [`Section::resolve`].
    pub fn resolve(
        &self,
        capacity: usize,
        generator: &mut dyn UniqueRandomGenerator,
    ) -> ForgeResult<ResolvedIndices> {
        self.section.resolve(capacity, generator)
    }

    /// Runs the mutate actions, then the side-effect actions, on the objects at
    /// `indices`.
    ///
    /// A position outside `objects` is skipped and reported to `observer`, or
    /// to the tracing log without one.
    pub fn apply(
        &mut self,
        objects: &mut [T],
        indices: &ResolvedIndices,
        observer: Option<&Arc<dyn ViolationObserver>>,
    ) {
        let Self {
            section,
            mutate_actions,
            side_effect_actions,
            ..
        } = self;
        for actions in [mutate_actions, side_effect_actions] {
            if actions.is_empty() {
                continue;
            }
            for position in indices.iter() {
                let len = objects.len();
                let Some(object) = objects.get_mut(position) else {
                    let violation = BuildViolation::new(
                        ViolationSeverity::Critical,
                        ViolationKind::InternalError,
                        format!("resolved position is outside a list of {} objects", len),
                        concat!(file!(), ":", line!()),
                    )
                    .with_position(position)
                    .with_context("section", section.to_string());
                    report_to_observer(observer, &violation);
                    continue;
                };
                for action in actions.iter_mut() {
                    action(object, position);
                }
            }
        }
    }
}

impl<T> fmt::Debug for Declaration<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            section,
            mutate_actions,
            side_effect_actions,
            constructor,
            implicit,
        } = self;

        f.debug_struct("Declaration")
            .field("section", section)
            .field("mutate_actions", &mutate_actions.len())
            .field("side_effect_actions", &side_effect_actions.len())
            .field("has_constructor", &constructor.is_some())
            .field("implicit", implicit)
            .finish()
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

    #[test]
    fn global_covers_everything() {
        let mut session = UniqueSession::seeded(1);
        let resolved = Section::Global.resolve(4, &mut session).unwrap();
        assert_eq!(resolved.as_slice(), &[0, 1, 2, 3]);
    }

    #[test]
    fn range_resolves_literally() {
        let mut session = UniqueSession::seeded(1);
        let resolved = Section::Range { start: 2, end: 5 }
            .resolve(10, &mut session)
            .unwrap();
        assert_eq!(resolved.as_slice(), &[2, 3, 4]);
        assert!(resolved.contains(4));
        assert!(!resolved.contains(5));
    }

    #[test]
    fn range_past_capacity_is_rejected() {
        let mut session = UniqueSession::seeded(1);
        assert_eq!(
            Section::Range { start: 8, end: 12 }.resolve(10, &mut session),
            Err(ForgeError::InvalidRange(InvalidRangeKind::SectionOutOfBounds {
                start: 8,
                end: 12,
                capacity: 10
            }))
        );
    }

    #[test]
    fn random_resolves_to_distinct_sorted_positions() {
        let mut session = UniqueSession::seeded(5);
        let resolved = Section::Random {
            constraint: Constraint::UpTo(5),
        }
        .resolve(10, &mut session)
        .unwrap();
        assert_eq!(resolved.len(), 5);
        assert!(resolved.check_invariants().is_ok());
    }

    #[test]
    fn random_beyond_capacity_is_exhausted() {
        let mut session = UniqueSession::seeded(5);
        let result = Section::Random {
            constraint: Constraint::UpTo(3),
        }
        .resolve(2, &mut session);
        assert_eq!(result, Err(ForgeError::ExhaustedSequence { lower: 0, upper: 2 }));
    }

    #[test]
    fn from_positions_normalizes() {
        let resolved = ResolvedIndices::from_positions(vec![3, 1, 3, 9, 0], 4);
        assert_eq!(resolved.as_slice(), &[0, 1, 3]);
    }

    #[test]
    fn invariant_checker_flags_bad_positions() {
        let unsorted = ResolvedIndices {
            positions: vec![2, 1],
            capacity: 4,
        };
        assert!(unsorted.check_invariants().is_err());

        let outside = ResolvedIndices {
            positions: vec![1, 4],
            capacity: 4,
        };
        assert!(outside.check_invariants().is_err());
    }

    #[test]
    fn apply_runs_mutations_before_side_effects() {
        let mut declaration = Declaration::<Vec<&'static str>>::new(Section::Global);
        declaration.push_side_effect(Box::new(|log: &mut Vec<&str>, _: usize| log.push("side")));
        declaration.push_mutate(Box::new(|log: &mut Vec<&str>, _: usize| log.push("mutate")));
        assert!(declaration.has_effect());

        let mut objects = vec![Vec::new(), Vec::new()];
        let indices = ResolvedIndices::from_positions(vec![1], 2);
        declaration.apply(&mut objects, &indices, None);

        assert!(objects[0].is_empty());
        assert_eq!(objects[1], vec!["mutate", "side"]);
    }

    #[test]
    fn actions_receive_positions() {
        let mut declaration = Declaration::<usize>::new(Section::Range { start: 1, end: 3 });
        declaration.push_mutate(Box::new(|value: &mut usize, position: usize| {
            *value = position * 10;
        }));

        let mut objects = vec![0; 4];
        let mut session = UniqueSession::seeded(1);
        let indices = declaration.resolve(4, &mut session).unwrap();
        declaration.apply(&mut objects, &indices, None);
        assert_eq!(objects, vec![0, 10, 20, 0]);
    }

    #[test]
    fn positions_past_the_list_are_skipped_and_reported() {
        let collector = Arc::new(crate::telemetry::CollectingObserver::new());
        let observer: Arc<dyn ViolationObserver> = collector.clone();
        let mut declaration = Declaration::<u32>::new(Section::Global);
        declaration.push_mutate(Box::new(|value: &mut u32, _: usize| *value += 1));

        let mut objects = vec![0, 0];
        let indices = ResolvedIndices::from_positions(vec![0, 3], 4);
        declaration.apply(&mut objects, &indices, Some(&observer));

        assert_eq!(objects, vec![1, 0]);
        let violations = collector.violations_of_kind(ViolationKind::InternalError);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].position, Some(3));
        assert_eq!(violations[0].context["section"], "all");
    }

    #[test]
    fn implicit_global_has_no_effect() {
        let declaration = Declaration::<u8>::implicit_global();
        assert!(declaration.is_implicit());
        assert!(declaration.section().is_global());
        assert!(!declaration.has_effect());
        assert!(format!("{declaration:?}").contains("implicit: true"));
    }

    #[test]
    fn section_display() {
        assert_eq!(Section::Global.to_string(), "all");
        assert_eq!(Section::Range { start: 0, end: 4 }.to_string(), "[0, 4)");
        assert_eq!(
            Section::Random {
                constraint: Constraint::UpTo(2)
            }
            .to_string(),
            "random(2)"
        );
    }
}
