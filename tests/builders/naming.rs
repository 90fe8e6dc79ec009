//! Sequential naming of every supported property type.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use crate::common::fixtures::{ConcreteWidget, WidgetKind};
use fixture_forge::naming::cycle;
use fixture_forge::{ListBuilder, Properties, PropertyVisitor, SequentialValue};

/// A fixture holding a single property of one type.
macro_rules! single_property_fixture {
    ($($ty:ident),* $(,)?) => {
        pastey::paste! {
            $(
                #[derive(Debug, Default)]
                struct [<Only $ty:camel>] {
                    value: $ty,
                }

                impl Properties for [<Only $ty:camel>] {
                    fn visit_properties(&mut self, visitor: &mut dyn PropertyVisitor) {
                        visitor.visit("value", &mut self.value);
                    }
                }

                #[test]
                fn [<sequential_ $ty:snake _follows_position>]() {
                    let objects = ListBuilder::<[<Only $ty:camel>]>::new(3).build().unwrap();
                    for (position, object) in objects.iter().enumerate() {
                        let mut expected = <$ty>::default();
                        expected.assign_sequential("value", position as u64 + 1);
                        assert_eq!(object.value, expected, "position {position}");
                    }
                    assert_ne!(objects[0].value, objects[1].value);
                }
            )*
        }
    };
}

single_property_fixture!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64, bool, char, String);

#[test]
fn integers_start_at_one() {
    let objects = ListBuilder::<OnlyU32>::new(2).build().unwrap();
    assert_eq!(objects[0].value, 1);
    assert_eq!(objects[1].value, 2);
}

#[test]
fn strings_carry_the_property_name() {
    let objects = ListBuilder::<OnlyString>::new(12).build().unwrap();
    assert_eq!(objects[0].value, "value1");
    assert_eq!(objects[11].value, "value12");
}

#[test]
fn enums_cycle_over_long_lists() {
    let variants = [
        WidgetKind::Gear,
        WidgetKind::Spring,
        WidgetKind::Lever,
        WidgetKind::Pulley,
        WidgetKind::Wheel,
    ];
    let widgets = ListBuilder::<ConcreteWidget>::new(12).build().unwrap();
    for (position, widget) in widgets.iter().enumerate() {
        assert_eq!(
            Some(&widget.base.kind),
            cycle(&variants, position as u64 + 1),
            "position {position}"
        );
    }
}

#[test]
fn nested_fixture_properties_are_named() {
    let widgets = ListBuilder::<ConcreteWidget>::new(3).build().unwrap();
    assert_eq!(widgets[2].serial, 3);
    assert_eq!(widgets[2].base.string_one, "string_one3");
    assert_eq!(widgets[2].base.nickname.as_deref(), Some("nickname3"));
    assert_eq!(widgets[2].base.letter, 'C');
}
