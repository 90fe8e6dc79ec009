//! List builder behaviour through the public API.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use crate::common::fixtures::{Marker, Vehicle, Widget, WidgetKind};
use crate::common::namers::RecordingNamer;
use crate::common::{seeded_settings, with_debug_logging};
use fixture_forge::telemetry::{CollectingObserver, ViolationKind};
use fixture_forge::{
    assert_no_violations, assert_violation, Builder, ForgeError, InvalidRangeKind, ListBuilder,
    RequiresArguments,
};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;
use std::sync::Arc;

// ============================================================================
// Sequential defaults
// ============================================================================

#[test]
fn list_of_ten_is_named_by_position() {
    let widgets = Builder::new()
        .create_list_of_size::<Widget>(10)
        .build()
        .unwrap();

    assert_eq!(widgets.len(), 10);
    assert_eq!(widgets[0].string_one, "string_one1");
    assert_eq!(widgets[9].string_one, "string_one10");
    assert_eq!(widgets[9].string_two, "string_two10");
    assert_eq!(widgets[9].int, 10);
    assert_eq!(widgets[9].long, 10);
    assert_eq!(widgets[9].kind, WidgetKind::Wheel);
    assert!(widgets[9].active);
    assert!(widgets.iter().all(|widget| widget.simple_items.is_empty()));
}

#[test]
fn each_build_starts_its_own_sequence() {
    let builder = Builder::new();
    let first = builder.create_list_of_size::<Widget>(3).build().unwrap();
    let second = builder.create_list_of_size::<Widget>(3).build().unwrap();
    assert_eq!(first, second);
}

// ============================================================================
// Range sections
// ============================================================================

#[test]
fn the_first_and_the_next_on_four() {
    let widgets = ListBuilder::<Widget>::new(4)
        .the_first(2)
        .unwrap()
        .with(|widget| widget.string_one = "first".to_owned())
        .the_next(2)
        .unwrap()
        .with(|widget| widget.string_one = "next".to_owned())
        .build()
        .unwrap();

    let names: Vec<&str> = widgets.iter().map(|w| w.string_one.as_str()).collect();
    assert_eq!(names, vec!["first", "first", "next", "next"]);
}

#[test]
fn the_last_and_the_previous_on_four() {
    let widgets = ListBuilder::<Widget>::new(4)
        .the_last(2)
        .unwrap()
        .with(|widget| widget.int = -1)
        .the_previous(2)
        .unwrap()
        .with(|widget| widget.int = -2)
        .build()
        .unwrap();

    let ints: Vec<i32> = widgets.iter().map(|w| w.int).collect();
    assert_eq!(ints, vec![-2, -2, -1, -1]);
}

#[test]
fn section_then_the_next_continues_after_the_section() {
    let widgets = ListBuilder::<Widget>::new(10)
        .section(0, 4)
        .unwrap()
        .with(|widget| widget.int = 100)
        .the_next(3)
        .unwrap()
        .with(|widget| widget.int = 200)
        .build()
        .unwrap();

    let ints: Vec<i32> = widgets.iter().map(|w| w.int).collect();
    assert_eq!(ints, vec![100, 100, 100, 100, 200, 200, 200, 8, 9, 10]);
}

#[test]
fn multiple_the_first_declarations_apply_in_order() {
    let widgets = ListBuilder::<Widget>::new(5)
        .the_first(3)
        .unwrap()
        .with(|widget| widget.string_one = "wide".to_owned())
        .with(|widget| widget.active = true)
        .the_first(1)
        .unwrap()
        .with(|widget| widget.string_one = "narrow".to_owned())
        .build()
        .unwrap();

    assert_eq!(widgets[0].string_one, "narrow");
    assert_eq!(widgets[1].string_one, "wide");
    assert_eq!(widgets[2].string_one, "wide");
    assert!(widgets[0].active && widgets[2].active);
    assert_eq!(widgets[3].string_one, "string_one4");
}

#[test]
fn all_after_a_range_overrides_it() {
    let widgets = ListBuilder::<Widget>::new(3)
        .the_first(1)
        .unwrap()
        .with(|widget| widget.long = 5)
        .all()
        .with(|widget| widget.long = 7)
        .build()
        .unwrap();
    assert!(widgets.iter().all(|widget| widget.long == 7));
}

#[test]
fn out_of_range_sections_are_rejected_at_registration() {
    let err = ListBuilder::<Widget>::new(10).the_first(11).unwrap_err();
    assert!(matches!(
        err,
        ForgeError::InvalidRange(InvalidRangeKind::SectionOutOfBounds { .. })
    ));

    let err = ListBuilder::<Widget>::new(10)
        .section(8, 3)
        .unwrap_err();
    assert_eq!(
        err,
        ForgeError::InvalidRange(InvalidRangeKind::SectionOutOfBounds {
            start: 8,
            end: 11,
            capacity: 10
        })
    );
}

// ============================================================================
// Random sections
// ============================================================================

fn count_marked(capacity: usize, amount: usize) -> usize {
    ListBuilder::<Widget>::new(capacity)
        .random(amount)
        .with(|widget| widget.string_one = "marked".to_owned())
        .build()
        .unwrap()
        .iter()
        .filter(|widget| widget.string_one == "marked")
        .count()
}

#[test]
fn random_marks_exactly_the_requested_amount() {
    for (capacity, amount) in [(10, 5), (10, 1), (5, 5), (1, 1)] {
        assert_eq!(
            count_marked(capacity, amount),
            amount,
            "random({amount}) on {capacity}"
        );
    }
}

#[test]
fn four_random_sections_over_forty_are_disjoint() {
    let widgets = ListBuilder::<Widget>::new(40)
        .with_settings(seeded_settings())
        .random(10)
        .with(|widget| widget.simple_items.push(1))
        .random(10)
        .with(|widget| widget.simple_items.push(2))
        .random(10)
        .with(|widget| widget.simple_items.push(3))
        .random(10)
        .with(|widget| widget.simple_items.push(4))
        .build()
        .unwrap();

    assert!(widgets.iter().all(|widget| widget.simple_items.len() == 1));
    let tags: BTreeSet<u32> = widgets.iter().map(|w| w.simple_items[0]).collect();
    assert_eq!(tags, BTreeSet::from([1, 2, 3, 4]));
}

#[test]
fn random_between_stays_in_its_window() {
    for _ in 0..20 {
        let widgets = ListBuilder::<Widget>::new(10)
            .random_between(2, 4)
            .unwrap()
            .with(|widget| widget.active = false)
            .with(|widget| widget.byte = 0)
            .build()
            .unwrap();
        let marked = widgets.iter().filter(|widget| widget.byte == 0).count();
        assert!((2..=4).contains(&marked), "{marked} outside 2..=4");
    }
}

#[test]
fn random_with_more_than_capacity_fails() {
    let err = ListBuilder::<Widget>::new(5)
        .random(6)
        .with(|widget| widget.int = 0)
        .build()
        .unwrap_err();
    assert_eq!(err, ForgeError::ExhaustedSequence { lower: 0, upper: 5 });
}

#[test]
fn random_sections_exhaust_shared_positions() {
    let err = ListBuilder::<Widget>::new(5)
        .random(3)
        .with(|widget| widget.int = 0)
        .random(3)
        .with(|widget| widget.int = 1)
        .build()
        .unwrap_err();
    assert!(matches!(err, ForgeError::ExhaustedSequence { .. }));
}

#[test]
fn seeded_builds_pick_the_same_positions() {
    let marked = || {
        ListBuilder::<Widget>::new(30)
            .with_settings(seeded_settings())
            .random(7)
            .with(|widget| widget.active = true)
            .with(|widget| widget.letter = '*')
            .build()
            .unwrap()
            .iter()
            .enumerate()
            .filter(|(_, widget)| widget.letter == '*')
            .map(|(position, _)| position)
            .collect::<Vec<_>>()
    };
    assert_eq!(marked(), marked());
}

// ============================================================================
// Side effects
// ============================================================================

#[test]
fn and_do_runs_once_per_object() {
    let widgets = ListBuilder::<Widget>::new(6)
        .all()
        .and_do(|widget| widget.simple_items.push(9))
        .build()
        .unwrap();
    assert!(widgets.iter().all(|widget| widget.simple_items == vec![9]));
}

#[test]
fn overlapping_and_do_sections_accumulate() {
    let widgets = ListBuilder::<Widget>::new(3)
        .the_first(2)
        .unwrap()
        .and_do(|widget| widget.simple_items.push(1))
        .the_last(2)
        .unwrap()
        .and_do(|widget| widget.simple_items.push(2))
        .build()
        .unwrap();

    assert_eq!(widgets[0].simple_items, vec![1]);
    assert_eq!(widgets[1].simple_items, vec![1, 2]);
    assert_eq!(widgets[2].simple_items, vec![2]);
}

#[test]
fn side_effects_see_final_mutations() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    ListBuilder::<Widget>::new(2)
        .all()
        .and_do(move |widget| sink.borrow_mut().push(widget.int))
        .with(|widget| widget.int *= 10)
        .build()
        .unwrap();
    assert_eq!(*seen.borrow(), vec![10, 20]);
}

#[test]
fn indexed_actions_receive_list_positions() {
    let markers = ListBuilder::<Marker>::new(5)
        .section(1, 3)
        .unwrap()
        .and_do_indexed(|marker, position| marker.hits.push(position))
        .build()
        .unwrap();
    let hits: Vec<Vec<usize>> = markers.into_iter().map(|m| m.hits).collect();
    assert_eq!(hits, vec![vec![], vec![1], vec![2], vec![3], vec![]]);
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn type_requiring_arguments_fails_without_constructor() {
    let err = ListBuilder::<Vehicle>::with_factory(3, RequiresArguments::new())
        .all()
        .with(|vehicle| vehicle.wheels = 3)
        .build()
        .unwrap_err();
    assert!(matches!(err, ForgeError::ConstructionNotSupported { .. }));
    assert!(err.to_string().contains("Vehicle"));
}

#[test]
fn partial_constructor_coverage_still_fails() {
    let err = ListBuilder::<Vehicle>::with_factory(3, RequiresArguments::new())
        .the_first(2)
        .unwrap()
        .with_constructor(|| Vehicle::new("ann"))
        .build()
        .unwrap_err();
    assert!(matches!(err, ForgeError::ConstructionNotSupported { .. }));
}

#[test]
fn constructor_through_all_builds_every_object() {
    let vehicles = ListBuilder::<Vehicle>::with_factory(3, RequiresArguments::new())
        .all()
        .with_constructor(|| Vehicle::new("ann"))
        .the_last(1)
        .unwrap()
        .with_constructor(|| Vehicle::new("bob"))
        .build()
        .unwrap();

    let owners: Vec<&str> = vehicles.iter().map(|v| v.owner.as_str()).collect();
    assert_eq!(owners, vec!["ann", "ann", "bob"]);
    assert_eq!(vehicles[2].plate, "plate3");
    assert_eq!(vehicles[0].wheels, 4);
}

#[test]
fn list_level_constructor_builds_every_object() {
    let vehicles = Builder::new()
        .create_list_of_size_with_factory::<Vehicle>(2, RequiresArguments::new())
        .with_constructor(|| Vehicle::new("fleet"))
        .build()
        .unwrap();
    assert!(vehicles.iter().all(|v| v.owner == "fleet"));
}

// ============================================================================
// Diagnostics
// ============================================================================

#[test]
fn well_formed_build_reports_nothing() {
    let observer = Arc::new(CollectingObserver::new());
    ListBuilder::<Widget>::new(4)
        .with_violation_observer(observer.clone())
        .the_first(2)
        .unwrap()
        .with(|widget| widget.int = 0)
        .build()
        .unwrap();
    assert_no_violations!(observer);
}

#[test]
fn declaration_without_actions_is_reported() {
    let observer = Arc::new(CollectingObserver::new());
    ListBuilder::<Widget>::new(4)
        .with_violation_observer(observer.clone())
        .random(2)
        .the_first(1)
        .unwrap()
        .with(|widget| widget.int = 0)
        .build()
        .unwrap();
    assert_violation!(observer, ViolationKind::Declaration);
    assert_eq!(observer.len(), 1);
}

#[test]
fn misspelled_exclusion_is_reported_to_the_installed_observer() {
    let mut settings = fixture_forge::BuilderSettings::new();
    settings.disable_property_naming_for::<Widget>("strng_one");
    let observer = Arc::new(CollectingObserver::new());
    let widgets = ListBuilder::<Widget>::new(3)
        .with_settings(Arc::new(settings))
        .with_violation_observer(observer.clone())
        .build()
        .unwrap();

    assert_violation!(observer, ViolationKind::Naming);
    let naming = observer.violations_of_kind(ViolationKind::Naming);
    assert_eq!(naming.len(), 1);
    assert_eq!(naming[0].context["property"], "strng_one");
    assert_eq!(widgets[2].string_one, "string_one3");
}

#[test]
fn ignored_exclusions_are_reported_to_the_installed_observer() {
    let mut settings = fixture_forge::BuilderSettings::new();
    settings.disable_property_naming_for::<Widget>("string_one");
    settings.set_property_namer_for::<Widget>(Arc::new(RecordingNamer::with_sequence(1)));
    let observer = Arc::new(CollectingObserver::new());
    ListBuilder::<Widget>::new(2)
        .with_settings(Arc::new(settings))
        .with_violation_observer(observer.clone())
        .build()
        .unwrap();

    let configuration = observer.violations_of_kind(ViolationKind::Configuration);
    assert_eq!(configuration.len(), 1);
    assert!(configuration[0].context["type"].ends_with("Widget"));
}

#[test]
fn declaration_without_actions_names_its_section() {
    let observer = Arc::new(CollectingObserver::new());
    ListBuilder::<Widget>::new(4)
        .with_violation_observer(observer.clone())
        .the_last(2)
        .unwrap()
        .build()
        .unwrap();
    let declaration = observer.violations_of_kind(ViolationKind::Declaration);
    assert_eq!(declaration.len(), 1);
    assert!(declaration[0].context.contains_key("section"));
}

#[test]
fn build_with_tracing_enabled_matches_silent_build() {
    let build = || {
        ListBuilder::<Widget>::new(6)
            .with_settings(seeded_settings())
            .random(2)
            .with(|widget| widget.int = -1)
            .the_first(1)
            .unwrap()
            .and_do(|widget| widget.simple_items.push(9))
            .build()
            .unwrap()
    };
    let logged = with_debug_logging(build);
    assert_eq!(logged, build());
}
