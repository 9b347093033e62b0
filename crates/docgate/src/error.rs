//! Error types for docgate.
//!
//! Two layers exist on purpose:
//!
//! - [`DocGateError`] is the internal, fallible-plumbing error. System errors
//!   (`Io`) always bubble up unchanged; application errors (`Parsing`,
//!   `Validation`) are wrapped with context. This is the type propagated with
//!   `?` inside backends and helpers.
//! - [`ErrorKind`] is the caller-visible taxonomy. The dispatcher recovers
//!   every failure and converts it into a `ParseResult` carrying an
//!   [`ErrorKind`] plus a generic, pre-approved message. Backend error text
//!   (library internals, paths, versions) is logged but never placed in a
//!   value returned to the caller.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using `DocGateError`.
pub type Result<T> = std::result::Result<T, DocGateError>;

/// Internal error type for fallible operations inside the pipeline.
///
/// Nothing of this type crosses the dispatcher boundary: `DocumentParser`
/// converts every failure into a `ParseResult` with an [`ErrorKind`].
#[derive(Debug, Error)]
pub enum DocGateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parsing error: {message}")]
    Parsing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl DocGateError {
    /// Create a Parsing error.
    pub fn parsing<S: Into<String>>(message: S) -> Self {
        Self::Parsing {
            message: message.into(),
            source: None,
        }
    }

    /// Create a Parsing error with source.
    pub fn parsing_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Parsing {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a Validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            source: None,
        }
    }
}

/// Caller-visible failure taxonomy for the intake pipeline.
///
/// Every rejected or failed document maps to exactly one kind. The serialized
/// form uses snake_case tags so transport layers can switch on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Filename extension is not in the supported set.
    UnsupportedFormat,
    /// Declared MIME type does not belong to the extension-derived format.
    MimeExtensionMismatch,
    /// Buffer exceeds the configured size ceiling.
    FileTooLarge,
    /// Declared MIME type rejected by a per-call allow-list override.
    DisallowedMimeType,
    /// Magic bytes do not match the detected format.
    InvalidSignature,
    /// Extraction did not settle within the configured deadline.
    ExtractionTimeout,
    /// The extraction backend failed; details are logged, not returned.
    ExtractionFailure,
    /// A batch entry was not a recognizable file object.
    StructurallyInvalidInput,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            ErrorKind::UnsupportedFormat => "unsupported_format",
            ErrorKind::MimeExtensionMismatch => "mime_extension_mismatch",
            ErrorKind::FileTooLarge => "file_too_large",
            ErrorKind::DisallowedMimeType => "disallowed_mime_type",
            ErrorKind::InvalidSignature => "invalid_signature",
            ErrorKind::ExtractionTimeout => "extraction_timeout",
            ErrorKind::ExtractionFailure => "extraction_failure",
            ErrorKind::StructurallyInvalidInput => "structurally_invalid_input",
        };
        f.write_str(tag)
    }
}
