//! Docgate - secure document-intake pipeline.
//!
//! Docgate accepts untrusted uploaded documents (PDF, DOCX) and extracts
//! plain text from them while defending the host process against malformed,
//! oversized, mislabeled, or maliciously crafted input. Text is only ever
//! returned for a buffer that passed the declared-MIME allow-list and the
//! byte-signature check for its detected format, and extraction always runs
//! under a wall-clock bound.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use docgate::{DocumentParser, ParseOptions, UploadCandidate};
//!
//! # async fn example() {
//! let parser = DocumentParser::new();
//! let candidate = UploadCandidate::new(
//!     std::fs::read("report.pdf").unwrap(),
//!     "application/pdf",
//!     "report.pdf",
//! );
//!
//! let result = parser.parse(&candidate, &ParseOptions::default()).await;
//! if result.succeeded() {
//!     println!("Extracted: {}", result.text);
//! }
//! # }
//! ```
//!
//! # Architecture
//!
//! - `core::signature` - magic-number validation (pure, leaf)
//! - `core::policy` - size ceiling, allow-lists, extension/MIME/signature
//!   cross-consistency, evaluated cheapest-first
//! - `core::bounded` - backend invocation raced against a deadline, with
//!   non-leaking error normalization and a diagnostic-volume cap
//! - `core::parser` - the no-throw dispatcher routing buffers by format
//! - `core::batch` - per-file-isolated batch coordination
//! - `backends` - the black-box decoders (lopdf, zip + quick-xml) behind the
//!   [`ExtractionBackend`] trait

#![deny(unsafe_code)]

pub mod backends;
pub mod core;
pub mod error;
pub mod types;

pub use backends::{BackendOutput, DocxBackend, ExtractionBackend, PdfBackend};
pub use crate::core::mime::{
    ALLOWED_DOCX_MIME_TYPES, ALLOWED_PDF_MIME_TYPES, DOCX_MIME_TYPE, DocumentFormat, LEGACY_WORD_MIME_TYPE,
    PDF_MIME_TYPE,
};
pub use crate::core::parser::DocumentParser;
pub use crate::core::signature::has_valid_signature;
pub use error::{DocGateError, ErrorKind, Result};
pub use types::{
    BatchEntry, BatchOutcome, BatchResult, DEFAULT_MAX_FILE_SIZE, DEFAULT_TIMEOUT, MAX_FILES_PER_BATCH, Metadata,
    ParseFailure, ParseOptions, ParseResult, RawUpload, UploadCandidate,
};
