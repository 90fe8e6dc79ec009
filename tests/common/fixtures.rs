//! Fixture types used by the integration tests.

#![allow(dead_code)]

use fixture_forge::{impl_properties, sequential_enum};

/// Five variants, so position 9 of a list cycles back to the last one.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    #[default]
    Gear,
    Spring,
    Lever,
    Pulley,
    Wheel,
}
sequential_enum!(WidgetKind { Gear, Spring, Lever, Pulley, Wheel });

/// One property of every supported kind, plus a collection that is never named.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Widget {
    pub string_one: String,
    pub string_two: String,
    pub int: i32,
    pub long: i64,
    pub byte: u8,
    pub ratio: f64,
    pub active: bool,
    pub letter: char,
    pub nickname: Option<String>,
    pub kind: WidgetKind,
    pub simple_items: Vec<u32>,
}
impl_properties!(Widget {
    string_one,
    string_two,
    int,
    long,
    byte,
    ratio,
    active,
    letter,
    nickname,
    kind,
});

/// Embeds a [`Widget`]; its properties are named alongside the outer ones.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConcreteWidget {
    pub base: Widget,
    pub serial: u64,
}
impl_properties!(ConcreteWidget { serial } nested { base });

/// Has no argument-free constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    pub owner: String,
    pub plate: String,
    pub wheels: u8,
}

impl Vehicle {
    pub fn new(owner: &str) -> Self {
        Self {
            owner: owner.to_owned(),
            plate: String::new(),
            wheels: 4,
        }
    }
}
impl_properties!(Vehicle { plate });

/// Nothing to name.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Marker {
    pub hits: Vec<usize>,
}
impl_properties!(Marker {});
