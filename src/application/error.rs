//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::application::export::ExportKind;
use crate::domain::DomainError;

/// Application errors wrap domain errors and add import/export context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("cannot import {source_name}: {message}")]
    ImportParse {
        source_name: String,
        message: String,
    },

    #[error("{kind} export failed: {message}")]
    ExportFailure { kind: ExportKind, message: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApplicationError {
    pub fn import_parse(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ImportParse {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn export_failure(kind: ExportKind, message: impl Into<String>) -> Self {
        Self::ExportFailure {
            kind,
            message: message.into(),
        }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
