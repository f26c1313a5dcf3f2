//! Persisted dependency cache for incremental resource builds.
//!
//! The cache is a single state file holding one [`CacheRecord`] per source
//! and one [`AccessorRecord`] per generated accessor file. A [`CacheStore`]
//! is loaded once at the start of a run, shared by the conversion workers,
//! and flushed once at the end. Every read is fail-safe: a missing, foreign,
//! or corrupted state file yields an empty store and the run rebuilds
//! everything.

#![warn(missing_docs)]

pub mod error;
pub mod fingerprint;
pub mod state;
pub mod store;

pub use error::CacheError;
pub use fingerprint::{accessor_fingerprint, path_set_fingerprint};
pub use state::{AccessorRecord, CacheRecord, StateFile};
pub use store::{CacheStore, LoadOutcome};
