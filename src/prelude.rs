//! Convenient re-exports for common usage.
//!
//! ```rust
//! use fixture_forge::prelude::*;
//! ```
//!
//! # What's Included
//!
//! - **Builders**: [`Builder`], [`ListBuilder`], [`DeclarationBuilder`], [`SingleObjectBuilder`]
//! - **Fixture traits**: [`Properties`], [`PropertyVisitor`], [`SequentialValue`]
//! - **Naming**: [`PropertyNamer`], [`SequentialPropertyNamer`]
//! - **Construction**: [`ObjectFactory`], [`RequiresArguments`]
//! - **Configuration**: [`BuilderSettings`]
//! - **Error handling**: [`ForgeError`], [`ForgeResult`]
//!
//! # Example
//!
//! ```rust
//! use fixture_forge::prelude::*;
//!
//! #[derive(Default)]
//! struct Note {
//!     text: String,
//! }
//!
//! impl Properties for Note {
//!     fn visit_properties(&mut self, visitor: &mut dyn PropertyVisitor) {
//!         visitor.visit("text", &mut self.text);
//!     }
//! }
//!
//! fn notes() -> ForgeResult<Vec<Note>> {
//!     Builder::new().create_list_of_size::<Note>(2).build()
//! }
//!
//! assert_eq!(notes()?[1].text, "text2");
//! # Ok::<(), ForgeError>(())
//! ```

// Builders
pub use crate::builders::{Builder, DeclarationBuilder, ListBuilder, SingleObjectBuilder};

// Fixture traits
pub use crate::naming::{Properties, PropertyVisitor, SequentialValue};

// Naming
pub use crate::naming::{PropertyNamer, SequentialPropertyNamer};

// Construction
pub use crate::construction::{ObjectFactory, RequiresArguments};

// Configuration
pub use crate::settings::BuilderSettings;

// Error handling
pub use crate::error::{ForgeError, ForgeResult};
