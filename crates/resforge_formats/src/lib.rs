//! Built-in resource readers, writers and the [`BuiltinConverter`].
//!
//! All three formats go through the same in-memory [`ResourceSet`]:
//!
//! - `.resx`: XML `<data>` entries, with file references resolved relative
//!   to the document and reported as linked content.
//! - `.txt` / `.restext`: one `name=value` per line.
//! - `.resources`: the resource set in the versioned binary envelope.

#![warn(missing_docs)]

pub mod binary;
pub mod convert;
pub mod error;
pub mod model;
pub mod resx;
pub mod text;

pub use convert::{read_file, render, BuiltinConverter, ReadOutcome};
pub use error::FormatError;
pub use model::{Resource, ResourceSet, ResourceValue};
