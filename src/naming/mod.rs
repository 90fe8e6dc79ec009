//! Sequential default values for fixture properties.
//!
//! Fixture types expose their properties through [`Properties`]; a
//! [`PropertyNamer`] walks them with a [`PropertyVisitor`] and writes a value
//! derived from the object's position into every [`SequentialValue`] it meets.
//! With the default [`SequentialPropertyNamer`], the object at position `p`
//! gets sequence number `p + 1`:
//!
//! | Property type | Value for sequence `n` |
//! |---|---|
//! | integers | `n` (wrapped at the type's maximum) |
//! | `f32`, `f64` | `n` as float |
//! | `bool` | `n % 2 == 0` |
//! | `char` | `'A'` for 1, `'B'` for 2, ... cycling after `'Z'` |
//! | `String` | property name followed by `n` |
//! | `Option<V>` | `Some` of the value `V` would get |
//! | unit enums | the `n`-th variant, cycling ([`sequential_enum!`](crate::sequential_enum)) |
//!
//! ```
//! use fixture_forge::naming::{PropertyNamer, SequentialPropertyNamer};
//! use fixture_forge::{impl_properties, sequential_enum};
//!
//! #[derive(Debug, Default, Clone, Copy, PartialEq)]
//! enum Colour {
//!     #[default]
//!     Red,
//!     Green,
//! }
//! sequential_enum!(Colour { Red, Green });
//!
//! #[derive(Default)]
//! struct Paint {
//!     name: String,
//!     colour: Colour,
//!     litres: u32,
//! }
//! impl_properties!(Paint { name, colour, litres });
//!
//! let mut paint = Paint::default();
//! SequentialPropertyNamer::new().set_values_of(&mut paint);
//! assert_eq!(paint.name, "name1");
//! assert_eq!(paint.colour, Colour::Red);
//! assert_eq!(paint.litres, 1);
//! ```

mod sequential;

use std::sync::Arc;

use crate::telemetry::ViolationObserver;

pub use sequential::SequentialPropertyNamer;

/// A property value the namer can fill from a sequence number.
pub trait SequentialValue {
    /// Replaces the value with the one for `sequence` (1-based).
    fn assign_sequential(&mut self, property: &str, sequence: u64);
}

/// Receives each named property of an object.
pub trait PropertyVisitor {
    /// Called once per property, with the property's name and value.
    fn visit(&mut self, property: &'static str, value: &mut dyn SequentialValue);
}

/// Fixture types list their nameable properties by implementing this trait.
///
/// A type with nothing to name can leave the body empty. A type that embeds
/// another fixture forwards to the embedded value so its properties are named
/// as well. [`impl_properties!`](crate::impl_properties) writes the impl from a
/// field list.
pub trait Properties {
    /// Presents every nameable property to `visitor`.
    fn visit_properties(&mut self, visitor: &mut dyn PropertyVisitor);
}

/// Assigns default values to the properties of freshly built objects.
///
/// Namers are shared between builds through
/// [`BuilderSettings`](crate::BuilderSettings), hence `Send + Sync`.
pub trait PropertyNamer: Send + Sync {
    /// Names a whole list; the object at index `p` is the `p + 1`-th of its type.
    fn set_values_of_all_in(&self, objects: &mut [&mut dyn Properties]);

    /// Names a single object as the first of its type.
    fn set_values_of(&self, object: &mut dyn Properties);

    /// Names a whole list, reporting diagnostics to `observer` instead of the
    /// tracing log.
    ///
    /// List builds call this one. The default ignores `observer` and forwards
    /// to [`set_values_of_all_in`](Self::set_values_of_all_in).
    fn set_values_of_all_in_observed(
        &self,
        objects: &mut [&mut dyn Properties],
        _observer: Option<&Arc<dyn ViolationObserver>>,
    ) {
        self.set_values_of_all_in(objects);
    }
}

/// Returns the variant a sequence number selects, cycling through `variants`.
///
/// Sequence 1 selects the first variant. Returns `None` for an empty slice.
///
/// ```
/// use fixture_forge::naming::cycle;
///
/// let variants = ["a", "b", "c", "d", "e"];
/// assert_eq!(cycle(&variants, 1), Some(&"a"));
/// assert_eq!(cycle(&variants, 10), Some(&"e"));
/// assert_eq!(cycle(&variants, 6), Some(&"a"));
/// ```
#[must_use]
pub fn cycle<T>(variants: &[T], sequence: u64) -> Option<&T> {
    if variants.is_empty() {
        return None;
    }
    variants.get(cycle_index(variants.len(), sequence))
}

/// Index into `len` variants for a sequence number; `0` when `len` is zero.
#[must_use]
pub fn cycle_index(len: usize, sequence: u64) -> usize {
    if len == 0 {
        return 0;
    }
    (sequence.saturating_sub(1) % len as u64) as usize
}

macro_rules! impl_sequential_int {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SequentialValue for $ty {
                fn assign_sequential(&mut self, _property: &str, sequence: u64) {
                    *self = <$ty>::try_from(sequence)
                        .unwrap_or_else(|_| (sequence % (<$ty>::MAX as u64)) as $ty);
                }
            }
        )*
    };
}

impl_sequential_int!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl SequentialValue for f32 {
    fn assign_sequential(&mut self, _property: &str, sequence: u64) {
        *self = sequence as f32;
    }
}

impl SequentialValue for f64 {
    fn assign_sequential(&mut self, _property: &str, sequence: u64) {
        *self = sequence as f64;
    }
}

impl SequentialValue for bool {
    fn assign_sequential(&mut self, _property: &str, sequence: u64) {
        *self = sequence % 2 == 0;
    }
}

impl SequentialValue for char {
    fn assign_sequential(&mut self, _property: &str, sequence: u64) {
        let offset = (sequence.saturating_sub(1) % 26) as u8;
        *self = char::from(b'A' + offset);
    }
}

impl SequentialValue for String {
    fn assign_sequential(&mut self, property: &str, sequence: u64) {
        self.clear();
        self.push_str(property);
        self.push_str(&sequence.to_string());
    }
}

impl<V: SequentialValue + Default> SequentialValue for Option<V> {
    fn assign_sequential(&mut self, property: &str, sequence: u64) {
        self.get_or_insert_with(V::default)
            .assign_sequential(property, sequence);
    }
}

/// Implements [`SequentialValue`] for a fieldless enum by cycling through the
/// listed variants in order.
///
/// ```
/// use fixture_forge::naming::SequentialValue;
/// use fixture_forge::sequential_enum;
///
/// #[derive(Debug, PartialEq)]
/// enum Size { Small, Large }
/// sequential_enum!(Size { Small, Large });
///
/// let mut size = Size::Small;
/// size.assign_sequential("size", 4);
/// assert_eq!(size, Size::Large);
/// ```
#[macro_export]
macro_rules! sequential_enum {
    ($ty:ident { $($variant:ident),+ $(,)? }) => {
        impl $crate::naming::SequentialValue for $ty {
            fn assign_sequential(&mut self, _property: &str, sequence: u64) {
                let count = [$(stringify!($variant)),+].len();
                let index = $crate::naming::cycle_index(count, sequence);
                if let Some(variant) = [$($ty::$variant),+].into_iter().nth(index) {
                    *self = variant;
                }
            }
        }
    };
}

/// Implements [`Properties`](crate::naming::Properties) from a field list.
///
/// Embedded fixtures listed under `nested` forward their own properties, so
/// they are named together with the outer fields.
///
/// ```
/// use fixture_forge::impl_properties;
///
/// #[derive(Default)]
/// struct Base {
///     id: u32,
/// }
/// impl_properties!(Base { id });
///
/// #[derive(Default)]
/// struct Derived {
///     base: Base,
///     label: String,
///     tags: Vec<String>,
/// }
/// impl_properties!(Derived { label } nested { base });
/// ```
#[macro_export]
macro_rules! impl_properties {
    ($ty:ty { $($field:ident),* $(,)? } $(nested { $($inner:ident),+ $(,)? })?) => {
        impl $crate::naming::Properties for $ty {
            #[allow(unused_variables)]
            fn visit_properties(&mut self, visitor: &mut dyn $crate::naming::PropertyVisitor) {
                $($(
                    $crate::naming::Properties::visit_properties(&mut self.$inner, visitor);
                )+)?
                $(
                    visitor.visit(stringify!($field), &mut self.$field);
                )*
            }
        }
    };
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

    fn assigned<V: SequentialValue + Default>(property: &str, sequence: u64) -> V {
        let mut value = V::default();
        value.assign_sequential(property, sequence);
        value
    }

    #[test]
    fn integers_take_the_sequence() {
        assert_eq!(assigned::<i32>("int", 7), 7);
        assert_eq!(assigned::<u64>("long", 10), 10);
        assert_eq!(assigned::<usize>("count", 3), 3);
    }

    #[test]
    fn small_integers_wrap_at_their_maximum() {
        assert_eq!(assigned::<u8>("byte", 255), 255);
        assert_eq!(assigned::<u8>("byte", 256), 1);
        assert_eq!(assigned::<i8>("byte", 128), 1);
    }

    #[test]
    fn strings_join_name_and_sequence() {
        assert_eq!(assigned::<String>("StringOne", 1), "StringOne1");
        assert_eq!(assigned::<String>("StringOne", 10), "StringOne10");

        let mut existing = String::from("stale");
        existing.assign_sequential("title", 2);
        assert_eq!(existing, "title2");
    }

    #[test]
    fn bool_char_float_and_option() {
        assert!(!assigned::<bool>("flag", 1));
        assert!(assigned::<bool>("flag", 2));
        assert_eq!(assigned::<char>("letter", 1), 'A');
        assert_eq!(assigned::<char>("letter", 27), 'A');
        assert_eq!(assigned::<char>("letter", 26), 'Z');
        assert!((assigned::<f64>("ratio", 4) - 4.0).abs() < f64::EPSILON);
        assert_eq!(assigned::<Option<u16>>("maybe", 5), Some(5));
        assert_eq!(
            assigned::<Option<String>>("nick", 2),
            Some("nick2".to_owned())
        );
    }

    #[test]
    fn cycle_wraps_and_handles_empty() {
        let variants = [1, 2, 3];
        assert_eq!(cycle(&variants, 3), Some(&3));
        assert_eq!(cycle(&variants, 4), Some(&1));
        assert_eq!(cycle::<u8>(&[], 1), None);
        assert_eq!(cycle_index(0, 9), 0);
    }

    #[derive(Debug, Default, PartialEq)]
    enum Shade {
        #[default]
        Light,
        Medium,
        Dark,
    }
    crate::sequential_enum!(Shade { Light, Medium, Dark });

    #[test]
    fn enums_cycle_through_variants() {
        assert_eq!(assigned::<Shade>("shade", 1), Shade::Light);
        assert_eq!(assigned::<Shade>("shade", 2), Shade::Medium);
        assert_eq!(assigned::<Shade>("shade", 3), Shade::Dark);
        assert_eq!(assigned::<Shade>("shade", 4), Shade::Light);
    }

    #[derive(Default)]
    struct Inner {
        code: u32,
    }
    crate::impl_properties!(Inner { code });

    #[derive(Default)]
    struct Outer {
        inner: Inner,
        title: String,
    }
    crate::impl_properties!(Outer { title } nested { inner });

    #[derive(Default)]
    struct Recorder(Vec<&'static str>);

    impl PropertyVisitor for Recorder {
        fn visit(&mut self, property: &'static str, _value: &mut dyn SequentialValue) {
            self.0.push(property);
        }
    }

    #[test]
    fn impl_properties_visits_nested_first() {
        let mut outer = Outer::default();
        let mut recorder = Recorder::default();
        outer.visit_properties(&mut recorder);
        assert_eq!(recorder.0, vec!["code", "title"]);
    }
}
