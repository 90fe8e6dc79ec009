//! Property-based tests for declaration resolution and unique sampling.
//!
//! These tests drive resolution directly through the `__internal` module.
//!
//! # Properties Tested
//!
//! - Random sections select exactly `n` distinct in-range positions
//! - Random sections of one build never overlap
//! - Range sections resolve to their literal bounds
//! - `the_next`/`the_previous` continue from the most recent range
//! - A generator over `m` values yields `m` distinct values, then fails
//! - Random positions asked of an empty list fail with `EmptyCollection`
//! - Every position of a built list is covered exactly once by the catch-all

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use crate::common::fixtures::Marker;
use fixture_forge::__internal::{resolve_declarations, Declaration, InvariantChecker, Section};
use fixture_forge::{Constraint, ForgeError, ListBuilder, UniqueRandomGenerator, UniqueSession};
use proptest::prelude::*;
use std::collections::BTreeSet;

// ============================================================================
// Strategies
// ============================================================================

/// A capacity with a random count that fits in it.
fn capacity_and_count() -> impl Strategy<Value = (usize, usize)> {
    (1usize..64).prop_flat_map(|capacity| (Just(capacity), 0..=capacity))
}

/// A capacity with a list of random counts whose sum fits in it.
fn capacity_and_counts() -> impl Strategy<Value = (usize, Vec<usize>)> {
    (1usize..64).prop_flat_map(|capacity| {
        (Just(capacity), prop::collection::vec(0..=capacity / 4, 1..5))
    })
}

fn random_section(count: usize) -> Declaration<Marker> {
    Declaration::new(Section::Random {
        constraint: Constraint::UpTo(count),
    })
}

#[test]
fn random_on_empty_list_is_an_empty_collection() {
    let mut session = UniqueSession::seeded(0);
    let result = resolve_declarations(&[random_section(1)], 0, &mut session);
    assert_eq!(result, Err(ForgeError::EmptyCollection));

    let err = ListBuilder::<Marker>::new(0)
        .random(3)
        .and_do(|marker| marker.hits.push(1))
        .build()
        .unwrap_err();
    assert_eq!(err, ForgeError::EmptyCollection);

    // nothing asked, nothing picked
    let resolved = resolve_declarations(&[random_section(0)], 0, &mut session).unwrap();
    assert!(resolved[0].is_empty());
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_random_selects_exactly_n_distinct((capacity, count) in capacity_and_count(), seed in any::<u64>()) {
        let mut session = UniqueSession::seeded(seed);
        let resolved = resolve_declarations(&[random_section(count)], capacity, &mut session).unwrap();

        prop_assert_eq!(resolved[0].len(), count);
        prop_assert!(resolved[0].iter().all(|position| position < capacity));
        prop_assert!(resolved[0].check_invariants().is_ok());
    }

    #[test]
    fn prop_random_sections_are_pairwise_disjoint((capacity, counts) in capacity_and_counts(), seed in any::<u64>()) {
        let declarations: Vec<_> = counts.iter().copied().map(random_section).collect();
        let mut session = UniqueSession::seeded(seed);
        let resolved = resolve_declarations(&declarations, capacity, &mut session).unwrap();

        let mut seen = BTreeSet::new();
        for (indices, &count) in resolved.iter().zip(&counts) {
            prop_assert_eq!(indices.len(), count);
            for position in indices.iter() {
                prop_assert!(seen.insert(position), "position {} selected twice", position);
            }
        }
    }

    #[test]
    fn prop_too_many_random_positions_exhaust(capacity in 1usize..32, extra in 1usize..8, seed in any::<u64>()) {
        let mut session = UniqueSession::seeded(seed);
        let result = resolve_declarations(&[random_section(capacity + extra)], capacity, &mut session);
        prop_assert_eq!(result, Err(ForgeError::ExhaustedSequence { lower: 0, upper: capacity }));
    }

    #[test]
    fn prop_range_resolves_literally(capacity in 1usize..64, start in 0usize..64, count in 0usize..64) {
        prop_assume!(start + count <= capacity);
        let declaration = Declaration::<Marker>::new(Section::Range { start, end: start + count });
        let mut session = UniqueSession::seeded(0);
        let resolved = resolve_declarations(&[declaration], capacity, &mut session).unwrap();
        let expected: Vec<usize> = (start..start + count).collect();
        prop_assert_eq!(resolved[0].as_slice(), expected.as_slice());
    }

    #[test]
    fn prop_the_next_and_the_previous_continue_from_last_range(
        capacity in 2usize..64,
        first in 1usize..32,
        next in 0usize..32,
    ) {
        prop_assume!(first + next <= capacity);
        let markers = ListBuilder::<Marker>::new(capacity)
            .the_first(first).unwrap()
            .and_do(|marker| marker.hits.push(1))
            .the_next(next).unwrap()
            .and_do(|marker| marker.hits.push(2))
            .the_previous(next.min(first)).unwrap()
            .and_do(|marker| marker.hits.push(3))
            .build()
            .unwrap();

        // the_previous is relative to the_next's range [first, first + next)
        let previous_start = first - next.min(first);
        for (position, marker) in markers.iter().enumerate() {
            let mut expected = Vec::new();
            if position < first {
                expected.push(1);
            }
            if position >= first && position < first + next {
                expected.push(2);
            }
            if position >= previous_start && position < first {
                expected.push(3);
            }
            prop_assert_eq!(&marker.hits, &expected, "position {}", position);
        }
    }

    #[test]
    fn prop_generator_exhausts_after_m_values(size in 0usize..100, lower in 0usize..1000, seed in any::<u64>()) {
        let mut session = UniqueSession::seeded(seed);
        let values: BTreeSet<usize> = (0..size)
            .map(|_| session.next(lower, lower + size).unwrap())
            .collect();
        prop_assert_eq!(values.len(), size);
        prop_assert!(session.next(lower, lower + size).is_err());
    }

    #[test]
    fn prop_uncovered_positions_still_built(capacity in 0usize..40, covered in 0usize..40) {
        prop_assume!(covered <= capacity);
        let markers = ListBuilder::<Marker>::new(capacity)
            .the_first(covered).unwrap()
            .and_do_indexed(|marker, position| marker.hits.push(position))
            .build()
            .unwrap();

        prop_assert_eq!(markers.len(), capacity);
        for (position, marker) in markers.iter().enumerate() {
            let expected: Vec<usize> = if position < covered { vec![position] } else { Vec::new() };
            prop_assert_eq!(&marker.hits, &expected);
        }
    }
}
