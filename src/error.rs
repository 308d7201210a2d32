#![allow(unused_assignments)]

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::ssm::StoreError;

#[derive(Debug, Error, Diagnostic)]
pub enum HydrateError {
    #[error("there is an invalid character in the name of the parameter: {name}. It should match {pattern}")]
    #[diagnostic(help("Parameter names may only contain letters, digits, '.', '-', '_' and '/'"))]
    InvalidParameterName { name: String, pattern: &'static str },

    #[error("SSM parameter not found: {name}")]
    #[diagnostic(help("Create the parameter or pass a non-empty default as the second argument to ssm"))]
    ParameterNotFound {
        name: String,
        #[source]
        source: StoreError,
    },

    #[error("unable to get SSM parameter: {name}")]
    #[diagnostic(help("Check your AWS credentials, profile and region"))]
    Remote {
        name: String,
        #[source]
        source: StoreError,
    },

    #[error("invalid arguments to '{function}': {reason}")]
    InvalidFunctionArgs { function: String, reason: String },

    #[error("function '{name}' is already registered")]
    DuplicateFunction { name: String },

    #[error("unable to parse template {path}")]
    #[diagnostic(help("Check the Go template syntax and that every function called exists"))]
    TemplateParse {
        path: String,
        #[source]
        source: lithos_gotmpl_core::Error,
    },

    #[error("unable to execute template {path}")]
    TemplateExecution {
        path: String,
        #[source]
        source: lithos_gotmpl_core::Error,
    },

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}")]
    #[diagnostic(help("Check the TOML syntax in your config file"))]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unable to set up the parameter store client")]
    StoreSetup {
        #[source]
        source: std::io::Error,
    },
}

impl HydrateError {
    /// Find the parameter lookup failure that aborted a template, if any.
    ///
    /// Lookup errors raised inside a template come back wrapped by the
    /// template engine; this walks the source chain until it finds one of ours.
    pub fn lookup_error(&self) -> Option<&HydrateError> {
        if matches!(
            self,
            HydrateError::InvalidParameterName { .. }
                | HydrateError::ParameterNotFound { .. }
                | HydrateError::Remote { .. }
        ) {
            return Some(self);
        }

        let mut current = std::error::Error::source(self);
        while let Some(err) = current {
            if let Some(found) = err.downcast_ref::<HydrateError>() {
                return found.lookup_error();
            }
            current = err.source();
        }
        None
    }
}

pub type Result<T> = std::result::Result<T, HydrateError>;
