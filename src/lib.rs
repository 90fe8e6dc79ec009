//! # Fixture Forge
//!
//! Declarative construction of test-fixture lists. Describe which objects of a
//! list get which values, and the builder takes care of the rest:
//!
//! - every property starts from a **sequential default** derived from the
//!   object's position (`name1`, `name2`, ...),
//! - **declarations** override those defaults on sections of the list
//!   (`all`, `the_first`, `the_next`, `section`, ...),
//! - **random sections** select distinct objects, never overlapping within one
//!   build.
//!
//! ```
//! use fixture_forge::prelude::*;
//!
//! #[derive(Debug, Default, Clone, Copy, PartialEq)]
//! enum Tier {
//!     #[default]
//!     Free,
//!     Pro,
//! }
//! fixture_forge::sequential_enum!(Tier { Free, Pro });
//!
//! #[derive(Default)]
//! struct Customer {
//!     name: String,
//!     tier: Tier,
//!     flagged: bool,
//! }
//! fixture_forge::impl_properties!(Customer { name, tier });
//!
//! let customers = Builder::with_settings(BuilderSettings::deterministic(7))
//!     .create_list_of_size::<Customer>(10)
//!     .the_first(3)?
//!     .with(|c| c.tier = Tier::Pro)
//!     .random(2)
//!     .with(|c| c.flagged = true)
//!     .build()?;
//!
//! assert_eq!(customers[0].name, "name1");
//! assert_eq!(customers[9].name, "name10");
//! assert_eq!(customers[2].tier, Tier::Pro);
//! assert_eq!(customers.iter().filter(|c| c.flagged).count(), 2);
//! # Ok::<(), fixture_forge::ForgeError>(())
//! ```
//!
//! Build failures are returned as [`ForgeError`]; non-fatal diagnostics go
//! through the [`telemetry`] pipeline and end up in the `tracing` log unless a
//! [`ViolationObserver`](telemetry::ViolationObserver) is installed.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub use builders::{Builder, DeclarationBuilder, ListBuilder, SingleObjectBuilder};
pub use construction::{DefaultFactory, FnFactory, ObjectFactory, RequiresArguments};
pub use error::{ForgeError, ForgeResult, InvalidRangeKind};
pub use naming::{
    Properties, PropertyNamer, PropertyVisitor, SequentialPropertyNamer, SequentialValue,
};
pub use picking::{Constraint, UniqueRandomGenerator, UniqueRandomPicker, UniqueSession};
pub use settings::BuilderSettings;

pub mod builders;
pub mod construction;
#[doc(hidden)]
pub mod error;
pub mod hash;
pub mod naming;
pub mod picking;
pub mod prelude;
/// Internal random number generator module based on PCG32.
///
/// Backs [`UniqueSession`]; see the module documentation for usage details.
pub mod rng;
pub mod settings;
pub mod telemetry;

/// Internal module exposing implementation details for testing and benchmarks.
///
/// # WARNING: No Stability Guarantees
///
/// **This module is NOT part of the public API.** Everything here may change
/// without notice and is not covered by semver. It exists so that integration
/// tests, property tests and benches can drive declaration resolution directly,
/// without going through a full build.
#[doc(hidden)]
pub mod __internal {
    pub use crate::builders::declaration::{Action, Constructor};
    pub use crate::builders::{resolve_declarations, Declaration, ResolvedIndices, Section};
    pub use crate::hash::derive_seed;
    pub use crate::telemetry::InvariantChecker;
}
