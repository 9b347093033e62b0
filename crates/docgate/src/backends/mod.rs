//! Format-specific extraction backends.
//!
//! A backend is an opaque capability: it accepts a validated buffer and
//! returns raw text plus backend-specific diagnostics, or fails. The pipeline
//! treats backends as black boxes - it never interprets their errors beyond
//! logging them, and it bounds their execution and diagnostic volume in
//! [`crate::core::bounded`].

mod docx;
mod pdf;

pub use docx::DocxBackend;
pub use pdf::PdfBackend;

use crate::core::mime::DocumentFormat;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Raw output of one backend invocation, before bounding.
#[derive(Debug, Clone, Default)]
pub struct BackendOutput {
    /// Extracted plain text.
    pub text: String,
    /// Page count, when the format has a notion of pages.
    pub page_count: Option<usize>,
    /// Document info dictionary (title, author, producer...).
    pub document_info: Option<HashMap<String, String>>,
    /// Conversion warnings. May be arbitrarily long for hostile input; the
    /// bounded extractor caps it before attaching to metadata.
    pub warnings: Vec<String>,
}

/// Contract between the pipeline and a format decoder.
///
/// Implementations must be `Send + Sync`; one instance is shared across all
/// concurrent parse invocations. CPU-heavy decoding belongs in
/// `spawn_blocking` so the timeout race in the bounded extractor can settle
/// at the deadline.
#[async_trait]
pub trait ExtractionBackend: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// The format this backend decodes.
    fn format(&self) -> DocumentFormat;

    /// Decode `content` into text and diagnostics.
    ///
    /// Errors are treated as opaque by the caller: they are logged with full
    /// detail and surfaced to users as a generic extraction failure.
    async fn extract(&self, content: &[u8]) -> Result<BackendOutput>;
}
