//! Strongly-typed accessor class generation for C# and Visual Basic.
//!
//! [`AccessorCodeGenerator`] implements the
//! [`AccessorGenerator`](resforge_build::AccessorGenerator) collaborator: one
//! static class per resource set, with a lazily created `ResourceManager`, a
//! `Culture` override and one string property per resource name.

#![warn(missing_docs)]

pub mod emit;
pub mod generate;
pub mod language;

pub use generate::AccessorCodeGenerator;
pub use language::Language;
