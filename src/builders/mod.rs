//! Fluent builders for fixture lists and single fixtures.

pub mod declaration;
mod entry;
mod list;
mod single;

pub use declaration::{Declaration, ResolvedIndices, Section};
pub use entry::Builder;
pub use list::{resolve_declarations, DeclarationBuilder, ListBuilder};
pub use single::SingleObjectBuilder;
