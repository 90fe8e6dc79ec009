//! Configuration shared by every builder created from one [`Builder`](crate::Builder).
//!
//! # Overview
//!
//! | Setting | Default | Effect |
//! |---------|---------|--------|
//! | `auto_name_properties` | `true` | Run the property namer on new objects |
//! | `seed` | `None` | Seed random sections for reproducible lists |
//! | per-type exclusions | none | Properties the default namer skips |
//! | per-type namer | none | Replaces the namer for one type |
//! | default namer | none | Replaces the namer for every other type |
//!
//! Settings are configured first and then shared as `Arc<BuilderSettings>`;
//! there is no global instance.
//!
//! ```
//! use fixture_forge::{Builder, BuilderSettings};
//!
//! #[derive(Default)]
//! struct User {
//!     name: String,
//!     email: String,
//! }
//! fixture_forge::impl_properties!(User { name, email });
//!
//! let mut settings = BuilderSettings::deterministic(42);
//! settings.disable_property_naming_for::<User>("email");
//!
//! let users = Builder::with_settings(settings)
//!     .create_list_of_size::<User>(3)
//!     .build()?;
//! assert_eq!(users[2].name, "name3");
//! assert!(users[2].email.is_empty());
//! # Ok::<(), fixture_forge::ForgeError>(())
//! ```

use std::any::{type_name, TypeId};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::naming::{PropertyNamer, SequentialPropertyNamer};
use crate::telemetry::{
    report_to_observer, BuildViolation, ViolationKind, ViolationObserver, ViolationSeverity,
};

/// Settings for naming and random selection.
///
/// # Forward Compatibility
///
/// New fields may be added. Construct with [`BuilderSettings::new`] or a preset
/// and then assign the public fields.
#[derive(Clone)]
#[must_use = "BuilderSettings has no effect unless passed to Builder::with_settings()"]
pub struct BuilderSettings {
    /// Whether new objects get sequential default values.
    ///
    /// Default: `true`
    pub auto_name_properties: bool,

    /// Base seed for random sections. Each list build derives its own seed from
    /// this, the fixture type and the list size.
    ///
    /// Default: `None` (seeded from entropy on every build)
    pub seed: Option<u64>,

    disabled: BTreeMap<TypeId, BTreeSet<&'static str>>,
    namers: BTreeMap<TypeId, Arc<dyn PropertyNamer>>,
    default_namer: Option<Arc<dyn PropertyNamer>>,
}

impl Default for BuilderSettings {
    fn default() -> Self {
        Self {
            auto_name_properties: true,
            seed: None,
            disabled: BTreeMap::new(),
            namers: BTreeMap::new(),
            default_namer: None,
        }
    }
}

impl BuilderSettings {
    /// Creates settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset for reproducible fixtures: default naming, fixed seed.
    ///
    /// Two builds of the same type and size from settings with the same seed
    /// select the same random positions.
    pub fn deterministic(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Makes the default namer skip `property` on objects of type `T`.
    ///
    /// Applies to properties of embedded fixtures as well, since they are
    /// visited by name like the type's own.
    pub fn disable_property_naming_for<T: 'static>(&mut self, property: &'static str) {
        self.disabled
            .entry(TypeId::of::<T>())
            .or_default()
            .insert(property);
    }

    /// Whether naming of `property` is disabled for `T`.
    #[must_use]
    pub fn is_property_naming_disabled<T: 'static>(&self, property: &str) -> bool {
        self.disabled
            .get(&TypeId::of::<T>())
            .is_some_and(|names| names.contains(property))
    }

    /// Uses `namer` for objects of type `T` only.
    pub fn set_property_namer_for<T: 'static>(&mut self, namer: Arc<dyn PropertyNamer>) {
        self.namers.insert(TypeId::of::<T>(), namer);
    }

    /// Uses `namer` for every type without a type-specific namer.
    pub fn set_default_property_namer(&mut self, namer: Arc<dyn PropertyNamer>) {
        self.default_namer = Some(namer);
    }

    /// The namer builds of `T` use, or `None` when automatic naming is off.
    ///
    /// Lookup order: the namer set for `T`, then the default namer, then a
    /// [`SequentialPropertyNamer`] honouring `T`'s exclusions.
    #[must_use]
    pub fn property_namer_for<T: 'static>(&self) -> Option<Arc<dyn PropertyNamer>> {
        self.property_namer_observed::<T>(None)
    }

    /// Like [`property_namer_for`](Self::property_namer_for), reporting
    /// configuration warnings to `observer` instead of the tracing log.
    #[must_use]
    pub fn property_namer_observed<T: 'static>(
        &self,
        observer: Option<&Arc<dyn ViolationObserver>>,
    ) -> Option<Arc<dyn PropertyNamer>> {
        if !self.auto_name_properties {
            return None;
        }
        let type_id = TypeId::of::<T>();
        let custom = self
            .namers
            .get(&type_id)
            .or(self.default_namer.as_ref())
            .cloned();
        let excluded = self.disabled.get(&type_id);

        match custom {
            Some(namer) => {
                if excluded.is_some_and(|names| !names.is_empty()) {
                    let violation = BuildViolation::new(
                        ViolationSeverity::Warning,
                        ViolationKind::Configuration,
                        format!(
                            "naming exclusions for {} are ignored by a custom property namer",
                            type_name::<T>()
                        ),
                        concat!(file!(), ":", line!()),
                    )
                    .with_context("type", type_name::<T>());
                    report_to_observer(observer, &violation);
                }
                Some(namer)
            },
            None => Some(Arc::new(SequentialPropertyNamer::excluding(
                excluded.into_iter().flatten().copied(),
            ))),
        }
    }

    /// Restores every setting to its default, dropping exclusions and namers.
    pub fn reset_to_defaults(&mut self) {
        *self = Self::default();
    }
}

impl std::fmt::Debug for BuilderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Destructure to ensure all fields are included when new fields are added.
        let Self {
            auto_name_properties,
            seed,
            disabled,
            namers,
            default_namer,
        } = self;

        f.debug_struct("BuilderSettings")
            .field("auto_name_properties", auto_name_properties)
            .field("seed", seed)
            .field("disabled_types", &disabled.len())
            .field("custom_namers", &namers.len())
            .field("has_default_namer", &default_namer.is_some())
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
    use crate::naming::Properties;

    #[derive(Default)]
    struct Item {
        title: String,
        count: u32,
    }
    crate::impl_properties!(Item { title, count });

    struct Other;

    struct FixedNamer;

    impl PropertyNamer for FixedNamer {
        fn set_values_of_all_in(&self, _objects: &mut [&mut dyn Properties]) {}
        fn set_values_of(&self, _object: &mut dyn Properties) {}
    }

    #[test]
    fn defaults() {
        let settings = BuilderSettings::new();
        assert!(settings.auto_name_properties);
        assert_eq!(settings.seed, None);
        assert!(settings.property_namer_for::<Item>().is_some());
    }

    #[test]
    fn deterministic_preset_sets_seed() {
        let settings = BuilderSettings::deterministic(9);
        assert_eq!(settings.seed, Some(9));
        assert!(settings.auto_name_properties);
    }

    #[test]
    fn disabled_naming_is_per_type() {
        let mut settings = BuilderSettings::new();
        settings.disable_property_naming_for::<Item>("title");
        assert!(settings.is_property_naming_disabled::<Item>("title"));
        assert!(!settings.is_property_naming_disabled::<Item>("count"));
        assert!(!settings.is_property_naming_disabled::<Other>("title"));
    }

    #[test]
    fn default_namer_honours_exclusions() {
        let mut settings = BuilderSettings::new();
        settings.disable_property_naming_for::<Item>("title");
        let namer = settings.property_namer_for::<Item>().unwrap();

        let mut item = Item::default();
        namer.set_values_of(&mut item);
        assert!(item.title.is_empty());
        assert_eq!(item.count, 1);
    }

    #[test]
    fn auto_naming_off_yields_no_namer() {
        let settings = BuilderSettings {
            auto_name_properties: false,
            ..BuilderSettings::new()
        };
        assert!(settings.property_namer_for::<Item>().is_none());
    }

    #[test]
    fn type_namer_wins_over_default_namer() {
        let type_namer: Arc<dyn PropertyNamer> = Arc::new(FixedNamer);
        let default_namer: Arc<dyn PropertyNamer> = Arc::new(FixedNamer);
        let mut settings = BuilderSettings::new();
        settings.set_property_namer_for::<Item>(type_namer.clone());
        settings.set_default_property_namer(default_namer.clone());

        let for_item = settings.property_namer_for::<Item>().unwrap();
        let for_other = settings.property_namer_for::<Other>().unwrap();
        assert!(Arc::ptr_eq(&for_item, &type_namer));
        assert!(Arc::ptr_eq(&for_other, &default_namer));
    }

    #[test]
    fn ignored_exclusions_are_reported_to_the_observer() {
        let collector = Arc::new(crate::telemetry::CollectingObserver::new());
        let observer: Arc<dyn ViolationObserver> = collector.clone();
        let mut settings = BuilderSettings::new();
        settings.disable_property_naming_for::<Item>("title");

        assert!(settings.property_namer_observed::<Item>(Some(&observer)).is_some());
        assert!(collector.is_empty());

        settings.set_default_property_namer(Arc::new(FixedNamer));
        assert!(settings.property_namer_observed::<Item>(Some(&observer)).is_some());
        let warnings = collector.violations_of_kind(ViolationKind::Configuration);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].context["type"].ends_with("Item"));

        // types without exclusions are not reported
        assert!(settings.property_namer_observed::<Other>(Some(&observer)).is_some());
        assert_eq!(collector.len(), 1);
    }

    #[test]
    fn reset_to_defaults_clears_everything() {
        let mut settings = BuilderSettings::deterministic(3);
        settings.auto_name_properties = false;
        settings.disable_property_naming_for::<Item>("title");
        settings.set_default_property_namer(Arc::new(FixedNamer));

        settings.reset_to_defaults();
        assert!(settings.auto_name_properties);
        assert_eq!(settings.seed, None);
        assert!(!settings.is_property_naming_disabled::<Item>("title"));
        assert!(format!("{settings:?}").contains("has_default_namer: false"));
    }
}
