//! The [`AccessorGenerator`] implementation.

use std::path::Path;

use resforge_build::{AccessorGenerator, AccessorRequest, GenerationError};
use resforge_common::ident::{is_valid_identifier, is_valid_namespace};
use resforge_common::write_atomic;

use crate::emit::{properties, render, ClassSpec};
use crate::language::Language;

/// Writes C# and Visual Basic accessor classes.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessorCodeGenerator;

impl AccessorCodeGenerator {
    /// Renders the accessor source without writing it.
    pub fn source(&self, request: &AccessorRequest) -> Result<String, GenerationError> {
        let language = Language::from_name(&request.language)
            .ok_or_else(|| GenerationError::UnknownLanguage(request.language.clone()))?;
        if !is_valid_identifier(&request.class_name) {
            return Err(GenerationError::InvalidClassName(request.class_name.clone()));
        }
        let namespace = request.namespace.as_deref().filter(|ns| !ns.is_empty());
        let resources_namespace = request
            .resources_namespace
            .as_deref()
            .filter(|ns| !ns.is_empty());
        for ns in namespace.into_iter().chain(resources_namespace) {
            if !is_valid_namespace(ns) {
                return Err(GenerationError::InvalidNamespace(ns.to_string()));
            }
        }

        let stem = request
            .resource_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| request.class_name.clone());
        let base_name = match resources_namespace {
            Some(ns) => format!("{ns}.{stem}"),
            None => stem,
        };

        Ok(render(&ClassSpec {
            language,
            namespace,
            class_name: &request.class_name,
            public: request.public,
            base_name,
            properties: properties(language, &request.class_name, &request.resource_names),
        }))
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> GenerationError + '_ {
    move |source| GenerationError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl AccessorGenerator for AccessorCodeGenerator {
    fn file_extension(&self, language: &str) -> Option<&'static str> {
        Language::from_name(language).map(Language::extension)
    }

    fn generate(&self, request: &AccessorRequest) -> Result<(), GenerationError> {
        let output = &request.output;
        if output.is_dir() {
            return Err(GenerationError::PathIsDirectory(output.clone()));
        }
        let source = self.source(request)?;

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error(parent))?;
        }
        write_atomic(output, source.as_bytes()).map_err(io_error(output))?;
        tracing::debug!(
            path = %output.display(),
            class = %request.class_name,
            properties = request.resource_names.len(),
            "wrote accessor"
        );
        Ok(())
    }
}
