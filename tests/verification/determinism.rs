//! Seeded builds replay exactly; unseeded builds stay valid.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use crate::common::fixtures::{Marker, Widget};
use crate::common::{seeded_settings, TEST_SEED};
use fixture_forge::__internal::derive_seed;
use fixture_forge::{BuilderSettings, ListBuilder, UniqueSession};
use std::sync::Arc;

fn random_positions(settings: Arc<BuilderSettings>, capacity: usize, count: usize) -> Vec<usize> {
    ListBuilder::<Marker>::new(capacity)
        .with_settings(settings)
        .random(count)
        .and_do_indexed(|marker, position| marker.hits.push(position))
        .build()
        .unwrap()
        .into_iter()
        .flat_map(|marker| marker.hits)
        .collect()
}

#[test]
fn same_seed_same_positions() {
    for _ in 0..5 {
        assert_eq!(
            random_positions(seeded_settings(), 50, 10),
            random_positions(seeded_settings(), 50, 10)
        );
    }
}

#[test]
fn different_seeds_usually_differ() {
    let base = random_positions(seeded_settings(), 200, 20);
    let differing = (1..=5)
        .map(|offset| {
            random_positions(
                Arc::new(BuilderSettings::deterministic(TEST_SEED + offset)),
                200,
                20,
            )
        })
        .filter(|positions| *positions != base)
        .count();
    assert!(differing >= 4, "only {differing} of 5 seeds differ");
}

#[test]
fn injected_generator_matches_seeded_settings() {
    let seed = derive_seed(TEST_SEED, std::any::type_name::<Marker>(), 30);
    let injected: Vec<usize> = ListBuilder::<Marker>::new(30)
        .with_generator(UniqueSession::seeded(seed))
        .random(6)
        .and_do_indexed(|marker, position| marker.hits.push(position))
        .build()
        .unwrap()
        .into_iter()
        .flat_map(|marker| marker.hits)
        .collect();

    assert_eq!(injected, random_positions(seeded_settings(), 30, 6));
}

#[test]
fn unseeded_builds_are_valid() {
    for _ in 0..20 {
        let positions = random_positions(Arc::new(BuilderSettings::new()), 10, 10);
        assert_eq!(positions, (0..10).collect::<Vec<_>>());
    }
}

#[test]
fn seeding_does_not_change_naming() {
    let seeded = ListBuilder::<Widget>::new(5)
        .with_settings(seeded_settings())
        .build()
        .unwrap();
    let unseeded = ListBuilder::<Widget>::new(5).build().unwrap();
    assert_eq!(seeded, unseeded);
}
