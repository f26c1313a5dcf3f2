//! Strongly-typed accessor coordination.
//!
//! The accessor's staleness is tracked apart from the resource payload: it
//! depends on the class identity and the set of resource names, never on the
//! resource values, and it is regenerated whenever its file goes missing.

use std::path::{Path, PathBuf};

use resforge_cache::{accessor_fingerprint, AccessorRecord, CacheStore};
use resforge_common::ident::{is_valid_identifier, is_valid_namespace, sanitize_identifier};
use tracing::debug;

use crate::converter::{AccessorGenerator, AccessorRequest};
use crate::error::GenerationError;
use crate::outputs::validate_path;
use crate::task::StronglyTypedDescriptor;

/// A fully resolved accessor to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorPlan {
    /// The accessor file.
    pub path: PathBuf,
    /// The class name.
    pub class_name: String,
    /// The language as supplied.
    pub language: String,
    /// The accessor file extension for the language.
    pub extension: &'static str,
    /// The namespace, if any.
    pub namespace: Option<String>,
    /// The resolved manifest prefix, if any.
    pub resources_namespace: Option<String>,
    /// Emit a public class.
    pub public: bool,
}

/// Resolves and (re)generates the accessor for a single-source batch.
pub struct StronglyTypedCoordinator<'g> {
    generator: &'g dyn AccessorGenerator,
}

impl<'g> StronglyTypedCoordinator<'g> {
    /// Creates a coordinator around a generator.
    pub fn new(generator: &'g dyn AccessorGenerator) -> Self {
        Self { generator }
    }

    /// Best-effort accessor path and class name, for reporting even when
    /// the plan itself fails.
    pub fn echo(
        &self,
        descriptor: &StronglyTypedDescriptor,
        output_resource: &Path,
    ) -> (Option<PathBuf>, Option<String>) {
        let path = descriptor.file_name.clone().or_else(|| {
            let language = descriptor.language.as_deref()?;
            let ext = self.generator.file_extension(language)?;
            Some(output_resource.with_extension(ext))
        });
        let class = descriptor.class_name.clone().or_else(|| {
            let stem = path.as_deref().unwrap_or(output_resource).file_stem()?;
            Some(sanitize_identifier(&stem.to_string_lossy()))
        });
        (path, class)
    }

    /// Resolves the accessor path, class name and namespace.
    ///
    /// The path defaults to the output resource path with the language's
    /// extension; the class name defaults to the sanitized file stem of the
    /// accessor path.
    pub fn plan(
        &self,
        descriptor: &StronglyTypedDescriptor,
        output_resource: &Path,
    ) -> Result<AccessorPlan, GenerationError> {
        let language = descriptor.language.clone().unwrap_or_default();
        let extension = self
            .generator
            .file_extension(&language)
            .ok_or_else(|| GenerationError::UnknownLanguage(language.clone()))?;

        let path = descriptor
            .file_name
            .clone()
            .unwrap_or_else(|| output_resource.with_extension(extension));
        validate_path(&path).map_err(|_| GenerationError::InvalidPath(path.clone()))?;

        let class_name = match &descriptor.class_name {
            Some(name) if is_valid_identifier(name) => name.clone(),
            Some(name) => return Err(GenerationError::InvalidClassName(name.clone())),
            None => {
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                sanitize_identifier(&stem)
            }
        };

        let namespace = descriptor
            .namespace
            .clone()
            .filter(|ns| !ns.is_empty());
        // An explicit empty resources namespace drops the prefix entirely.
        let resources_namespace = match &descriptor.resources_namespace {
            Some(prefix) => Some(prefix.clone()).filter(|p| !p.is_empty()),
            None => namespace.clone(),
        };
        for ns in namespace.iter().chain(&resources_namespace) {
            if !is_valid_namespace(ns) {
                return Err(GenerationError::InvalidNamespace(ns.clone()));
            }
        }

        Ok(AccessorPlan {
            path,
            class_name,
            language,
            extension,
            namespace,
            resources_namespace,
            public: descriptor.public_class,
        })
    }

    /// Generates the accessor unless the file exists and its recorded
    /// identity matches. Returns whether the file was written.
    pub fn maybe_generate(
        &self,
        plan: &AccessorPlan,
        resource_names: &[String],
        resource_path: &Path,
        cache: &CacheStore,
    ) -> Result<bool, GenerationError> {
        if plan.path.is_dir() {
            return Err(GenerationError::PathIsDirectory(plan.path.clone()));
        }

        let fingerprint = accessor_fingerprint(
            plan.extension,
            plan.namespace.as_deref(),
            plan.resources_namespace.as_deref(),
            &plan.class_name,
            plan.public,
            resource_names,
        );
        let recorded = cache.accessor(&plan.path).map(|r| r.fingerprint);
        if plan.path.is_file() && recorded == Some(fingerprint) {
            debug!(path = %plan.path.display(), "accessor up to date");
            return Ok(false);
        }

        self.generator.generate(&AccessorRequest {
            resource_names: resource_names.to_vec(),
            language: plan.language.clone(),
            namespace: plan.namespace.clone(),
            resources_namespace: plan.resources_namespace.clone(),
            class_name: plan.class_name.clone(),
            public: plan.public,
            output: plan.path.clone(),
            resource_path: resource_path.to_path_buf(),
        })?;
        cache.update_accessor(plan.path.clone(), AccessorRecord { fingerprint });
        debug!(path = %plan.path.display(), class = %plan.class_name, "accessor generated");
        Ok(true)
    }
}
