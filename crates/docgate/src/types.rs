//! Data model for the intake pipeline.
//!
//! Every type here is constructed once per invocation and never mutated after
//! the pipeline hands it back. There is no shared state between concurrent
//! parse invocations: a candidate, its buffer, and its options are exclusively
//! owned by the call that receives them.

use crate::error::ErrorKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Default per-file size ceiling: 10 MiB.
pub const DEFAULT_MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Default wall-clock extraction bound: 30 seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Hard cap on candidates per batch call.
///
/// The transport layer enforces this before invoking the coordinator; the
/// coordinator re-checks it as a caller-contract assertion.
pub const MAX_FILES_PER_BATCH: usize = 5;

/// An uploaded document as received from the transport layer.
///
/// Raw bytes plus the metadata the client *claims* about them. Nothing in
/// this struct is trusted until the policy checks pass.
#[derive(Debug, Clone)]
pub struct UploadCandidate {
    /// Raw file contents.
    pub bytes: Vec<u8>,
    /// MIME type declared by the uploader (untrusted).
    pub declared_mime_type: String,
    /// Filename declared by the uploader (untrusted); the extension drives
    /// format detection.
    pub filename: String,
}

impl UploadCandidate {
    pub fn new(bytes: Vec<u8>, declared_mime_type: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            bytes,
            declared_mime_type: declared_mime_type.into(),
            filename: filename.into(),
        }
    }
}

/// A raw multipart field as decoded by the transport layer.
///
/// Batch input is allowed to contain entries that are not complete file parts
/// (missing bytes or filename). Those are recorded as
/// [`ErrorKind::StructurallyInvalidInput`] without ever reaching a backend.
#[derive(Debug, Clone, Default)]
pub struct RawUpload {
    pub filename: Option<String>,
    pub declared_mime_type: Option<String>,
    pub bytes: Option<Vec<u8>>,
}

impl RawUpload {
    /// Build a well-formed upload entry.
    pub fn file(bytes: Vec<u8>, declared_mime_type: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            filename: Some(filename.into()),
            declared_mime_type: Some(declared_mime_type.into()),
            bytes: Some(bytes),
        }
    }

    /// Convert into an [`UploadCandidate`] if all required parts are present.
    ///
    /// A missing declared MIME type is tolerated and recorded as an empty
    /// string: the policy checker rejects it with a precise kind, which is
    /// more useful to callers than a structural error.
    pub fn into_candidate(self) -> Option<UploadCandidate> {
        match (self.bytes, self.filename) {
            (Some(bytes), Some(filename)) => Some(UploadCandidate {
                bytes,
                declared_mime_type: self.declared_mime_type.unwrap_or_default(),
                filename,
            }),
            _ => None,
        }
    }
}

/// Per-call configuration for the pipeline.
///
/// Immutable for the duration of one call; the pipeline only ever holds a
/// read reference. Deserializable so transport layers can accept it over the
/// wire or from config files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Per-file size ceiling in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: usize,

    /// Wall-clock bound for one extraction, in milliseconds on the wire.
    #[serde(default = "default_timeout", with = "duration_millis")]
    pub timeout: Duration,

    /// Optional per-call tightening of the declared-MIME allow-list.
    ///
    /// When set, the declared MIME type must appear here *in addition to*
    /// passing the canonical per-format allow-list. This can only narrow what
    /// is accepted, never widen it.
    #[serde(default)]
    pub allowed_mime_types: Option<Vec<String>>,

    /// Maximum concurrent extractions in batch operations (None = num_cpus * 2).
    #[serde(default)]
    pub max_concurrent_extractions: Option<usize>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            timeout: DEFAULT_TIMEOUT,
            allowed_mime_types: None,
            max_concurrent_extractions: None,
        }
    }
}

fn default_max_file_size() -> usize {
    DEFAULT_MAX_FILE_SIZE
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

/// Diagnostic metadata attached to a parse result.
///
/// Typed fields for the common diagnostics plus a flattened open mapping for
/// anything format-specific a backend wants to surface.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Metadata {
    /// Page count reported by the backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<usize>,

    /// Document info dictionary (title, author, producer...) when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_info: Option<HashMap<String, String>>,

    /// Conversion warnings from the backend, capped by the bounded extractor.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<String>,

    /// Additional custom fields.
    #[serde(flatten)]
    pub additional: HashMap<String, serde_json::Value>,
}

/// A terminal failure recorded in a [`ParseResult`].
///
/// `message` is always one of the generic, pre-approved messages for the
/// kind; backend internals never appear here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl ParseFailure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Outcome of parsing one document.
///
/// Exactly one of `text` (non-empty success) or `error` is authoritative:
/// the caller trusts `text` iff `error` is `None`. A successful result always
/// corresponds to a buffer that passed both the declared-MIME allow-list and
/// the byte-signature check for its detected format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseResult {
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ParseFailure>,
}

impl ParseResult {
    /// Successful result carrying extracted text and diagnostics.
    pub fn success(text: String, metadata: Metadata) -> Self {
        Self {
            text,
            metadata,
            error: None,
        }
    }

    /// Terminal failure result.
    pub fn failure(failure: ParseFailure) -> Self {
        Self {
            text: String::new(),
            metadata: Metadata::default(),
            error: Some(failure),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-file outcome inside a batch response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEntry {
    pub filename: String,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ParseFailure>,
}

impl BatchEntry {
    pub fn from_result(filename: String, result: ParseResult) -> Self {
        match result.error {
            None => Self {
                filename,
                succeeded: true,
                text: Some(result.text),
                metadata: Some(result.metadata),
                error: None,
            },
            Some(failure) => Self {
                filename,
                succeeded: false,
                text: None,
                metadata: None,
                error: Some(failure),
            },
        }
    }
}

/// Aggregate classification of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOutcome {
    AllFailed,
    Partial,
    AllSucceeded,
}

/// Ordered batch response.
///
/// `results` is aligned 1:1 with the input order; failures are interspersed,
/// never dropped. `succeeded` is true iff at least one entry succeeded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub succeeded: bool,
    pub outcome: BatchOutcome,
    pub results: Vec<BatchEntry>,
}

impl BatchResult {
    /// Classify and wrap a list of per-file entries.
    pub fn from_entries(results: Vec<BatchEntry>) -> Self {
        let successes = results.iter().filter(|e| e.succeeded).count();
        let outcome = if successes == 0 {
            BatchOutcome::AllFailed
        } else if successes == results.len() {
            BatchOutcome::AllSucceeded
        } else {
            BatchOutcome::Partial
        };
        Self {
            succeeded: successes > 0,
            outcome,
            results,
        }
    }
}
