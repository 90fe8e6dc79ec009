//! Unique random selection of list positions.
//!
//! A [`UniqueSession`] hands out values that do not repeat until it is reset. A
//! [`Constraint`] decides how many values a `random(..)` declaration wants, and a
//! [`UniqueRandomPicker`] combines the two to select distinct elements of a
//! candidate list.
//!
//! ```
//! use fixture_forge::picking::{Constraint, UniqueRandomPicker, UniqueSession};
//!
//! let positions: Vec<usize> = (0..10).collect();
//! let mut session = UniqueSession::seeded(3);
//! let picker = UniqueRandomPicker::new(Constraint::UpTo(4));
//!
//! let picked = picker.list_from(&mut session, &positions)?;
//! assert_eq!(picked.len(), 4);
//! # Ok::<(), fixture_forge::ForgeError>(())
//! ```

pub mod constraint;
pub mod generator;
pub mod picker;

pub use constraint::Constraint;
pub use generator::{UniqueRandomGenerator, UniqueSession};
pub use picker::UniqueRandomPicker;
