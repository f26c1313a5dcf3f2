//! Incremental build decision engine and batch conversion orchestrator.
//!
//! Given a list of resource sources, this crate decides which of them need
//! converting by consulting the persisted [`CacheStore`](resforge_cache::CacheStore)
//! and live file stamps, drives a [`Converter`] over the stale ones with
//! per-source failure isolation, optionally (re)generates a strongly-typed
//! accessor through an [`AccessorGenerator`], and returns index-ordered
//! output collections in a [`RunResult`].
//!
//! The converter and code generator are collaborators behind traits; the
//! built-in implementations live in `resforge_formats` and `resforge_codegen`.

#![warn(missing_docs)]

pub mod accessor;
pub mod batch;
pub mod codes;
pub mod converter;
pub mod dependency;
pub mod error;
pub mod outputs;
pub mod staleness;
pub mod task;

pub use accessor::{AccessorPlan, StronglyTypedCoordinator};
pub use batch::{BatchCoordinator, BuildOptions};
pub use converter::{
    AccessorGenerator, AccessorRequest, ConversionOutcome, ConversionRequest, Converter,
};
pub use dependency::{Dependency, DependencyKind, DependencyScope, Invalidation};
pub use error::{ConfigurationError, ConversionError, GenerationError};
pub use outputs::OutputResolver;
pub use staleness::{StaleReason, Staleness, StalenessEvaluator};
pub use task::{RunResult, StronglyTypedDescriptor, TaskInputs};
