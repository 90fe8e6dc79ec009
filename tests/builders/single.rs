//! Single-object builds.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use crate::common::fixtures::{Vehicle, Widget, WidgetKind};
use fixture_forge::{Builder, ForgeError, RequiresArguments};

#[test]
fn single_object_gets_first_sequence_values() {
    let widget = Builder::new().create_new::<Widget>().build().unwrap();
    assert_eq!(widget.string_one, "string_one1");
    assert_eq!(widget.int, 1);
    assert_eq!(widget.kind, WidgetKind::Gear);
    assert_eq!(widget.letter, 'A');
    assert!(!widget.active);
}

#[test]
fn with_and_and_do_apply_in_order() {
    let widget = Builder::new()
        .create_new::<Widget>()
        .and_do(|widget| widget.simple_items.push(widget.int as u32))
        .with(|widget| widget.int = 41)
        .with(|widget| widget.int += 1)
        .build()
        .unwrap();
    assert_eq!(widget.int, 42);
    assert_eq!(widget.simple_items, vec![42]);
}

#[test]
fn single_object_requiring_arguments() {
    let builder = Builder::new();
    let err = builder
        .create_new_with_factory::<Vehicle>(RequiresArguments::new())
        .build()
        .unwrap_err();
    assert!(matches!(err, ForgeError::ConstructionNotSupported { .. }));

    let vehicle = builder
        .create_new_with_factory::<Vehicle>(RequiresArguments::new())
        .with_constructor(|| Vehicle::new("cy"))
        .build()
        .unwrap();
    assert_eq!(vehicle.owner, "cy");
    assert_eq!(vehicle.plate, "plate1");
}
