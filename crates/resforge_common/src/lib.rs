//! Shared foundational types used across the resforge build task.
//!
//! This crate provides content hashing, file modification stamps, task items
//! with forwardable metadata, the resource format table, identifier helpers,
//! and the versioned binary envelope used by the state file and compiled
//! resource blobs.

#![warn(missing_docs)]

pub mod envelope;
pub mod format;
pub mod hash;
pub mod ident;
pub mod item;
pub mod stamp;

pub use envelope::{write_atomic, Envelope, EnvelopeError};
pub use format::{ParseFormatError, ResourceFormat};
pub use hash::ContentHash;
pub use item::{merge_forwarding, Metadata, TaskItem};
pub use stamp::FileStamp;
