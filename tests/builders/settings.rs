//! Settings: exclusions, custom namers, automatic naming.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use crate::common::fixtures::{ConcreteWidget, Widget};
use crate::common::namers::RecordingNamer;
use fixture_forge::{Builder, BuilderSettings, PropertyNamer};
use std::sync::Arc;

#[test]
fn disabled_property_keeps_its_default() {
    let mut settings = BuilderSettings::new();
    settings.disable_property_naming_for::<Widget>("string_one");

    let widgets = Builder::with_settings(settings)
        .create_list_of_size::<Widget>(3)
        .build()
        .unwrap();

    assert!(widgets.iter().all(|widget| widget.string_one.is_empty()));
    assert_eq!(widgets[2].string_two, "string_two3");
}

#[test]
fn disabled_inherited_property_is_skipped() {
    let mut settings = BuilderSettings::new();
    settings.disable_property_naming_for::<ConcreteWidget>("string_two");

    let widgets = Builder::with_settings(settings)
        .create_list_of_size::<ConcreteWidget>(2)
        .build()
        .unwrap();

    assert!(widgets[1].base.string_two.is_empty());
    assert_eq!(widgets[1].base.string_one, "string_one2");
    assert_eq!(widgets[1].serial, 2);
}

#[test]
fn exclusions_are_per_type() {
    let mut settings = BuilderSettings::new();
    settings.disable_property_naming_for::<ConcreteWidget>("string_one");
    let builder = Builder::with_settings(settings);

    let plain = builder.create_list_of_size::<Widget>(1).build().unwrap();
    assert_eq!(plain[0].string_one, "string_one1");
}

#[test]
fn auto_naming_off_leaves_defaults() {
    let mut settings = BuilderSettings::new();
    settings.auto_name_properties = false;
    let widgets = Builder::with_settings(settings)
        .create_list_of_size::<Widget>(4)
        .build()
        .unwrap();
    assert!(widgets.iter().all(|widget| *widget == Widget::default()));
}

#[test]
fn type_specific_namer_applies_to_its_type_only() {
    let namer = Arc::new(RecordingNamer::with_sequence(77));
    let mut settings = BuilderSettings::new();
    settings.set_property_namer_for::<Widget>(namer.clone());
    let builder = Builder::with_settings(settings);

    let widgets = builder.create_list_of_size::<Widget>(3).build().unwrap();
    assert!(widgets.iter().all(|widget| widget.int == 77));

    let concrete = builder
        .create_list_of_size::<ConcreteWidget>(3)
        .build()
        .unwrap();
    assert_eq!(concrete[2].serial, 3);

    assert_eq!(namer.list_calls(), 1);
    assert_eq!(namer.objects_seen(), 3);
}

#[test]
fn default_namer_is_called_once_per_build() {
    let namer = Arc::new(RecordingNamer::with_sequence(5));
    let mut settings = BuilderSettings::new();
    settings.set_default_property_namer(namer.clone());
    let builder = Builder::with_settings(settings);

    let widgets = builder.create_list_of_size::<Widget>(10).build().unwrap();
    assert_eq!(namer.list_calls(), 1);
    assert_eq!(namer.single_calls(), 0);
    assert!(widgets.iter().all(|widget| widget.long == 5));

    let single = builder.create_new::<Widget>().build().unwrap();
    assert_eq!(namer.list_calls(), 1);
    assert_eq!(namer.single_calls(), 1);
    assert_eq!(single.string_one, "string_one5");
}

#[test]
fn reset_to_defaults_restores_sequential_naming() {
    let mut settings = BuilderSettings::deterministic(1);
    settings.auto_name_properties = false;
    settings.disable_property_naming_for::<Widget>("int");
    settings.set_default_property_namer(Arc::new(RecordingNamer::with_sequence(3)));
    settings.reset_to_defaults();

    let widgets = Builder::with_settings(settings)
        .create_list_of_size::<Widget>(2)
        .build()
        .unwrap();
    assert_eq!(widgets[1].int, 2);
    assert_eq!(widgets[1].string_one, "string_one2");
}

#[test]
fn namer_trait_objects_are_shareable() {
    fn assert_send_sync<T: Send + Sync + ?Sized>() {}
    assert_send_sync::<dyn PropertyNamer>();
    assert_send_sync::<BuilderSettings>();
}
