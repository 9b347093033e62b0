//! Document dispatcher.
//!
//! [`DocumentParser`] is the single entry point between an untrusted upload
//! and a trusted text result: policy checks first, then bounded extraction
//! with the backend for the detected format. Its central contract is that it
//! never raises to its caller - every failure path terminates in a
//! [`ParseResult`] carrying an error kind, so one malformed document cannot
//! destabilize a caller processing many.

use crate::backends::{DocxBackend, ExtractionBackend, PdfBackend};
use crate::core::bounded::extract_bounded;
use crate::core::mime::DocumentFormat;
use crate::core::policy::check_candidate;
use crate::types::{ParseOptions, ParseResult, RawUpload, UploadCandidate};
use once_cell::sync::Lazy;
use std::sync::Arc;

/// Global Tokio runtime for the synchronous wrappers.
///
/// Lazily initialized on first use and shared across all sync calls. Runtime
/// creation only fails on resource exhaustion, at which point nothing else
/// would work either, so the `expect` fails fast.
static GLOBAL_RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create global Tokio runtime - system may be out of resources")
});

/// Routes validated buffers to the backend for their detected format.
///
/// One instance is cheap to clone and safe to share across concurrent
/// invocations; it holds no per-call state.
#[derive(Clone)]
pub struct DocumentParser {
    pdf_backend: Arc<dyn ExtractionBackend>,
    docx_backend: Arc<dyn ExtractionBackend>,
}

impl Default for DocumentParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentParser {
    /// Parser wired to the real lopdf and zip/quick-xml backends.
    pub fn new() -> Self {
        Self {
            pdf_backend: Arc::new(PdfBackend::new()),
            docx_backend: Arc::new(DocxBackend::new()),
        }
    }

    /// Parser with injected backends. Intended for tests and embedders that
    /// supply their own decoders behind the backend contract.
    pub fn with_backends(pdf_backend: Arc<dyn ExtractionBackend>, docx_backend: Arc<dyn ExtractionBackend>) -> Self {
        Self {
            pdf_backend,
            docx_backend,
        }
    }

    fn backend_for(&self, format: DocumentFormat) -> &dyn ExtractionBackend {
        match format {
            DocumentFormat::Pdf => self.pdf_backend.as_ref(),
            DocumentFormat::Docx => self.docx_backend.as_ref(),
        }
    }

    /// Parse one upload candidate.
    ///
    /// Never returns an error: rejections and backend failures come back as a
    /// [`ParseResult`] with `error` set. A result with `error == None` is
    /// guaranteed to come from a buffer that passed the declared-MIME
    /// allow-list and the byte-signature check for its detected format.
    pub async fn parse(&self, candidate: &UploadCandidate, options: &ParseOptions) -> ParseResult {
        let format = match check_candidate(candidate, options) {
            Ok(format) => format,
            Err(failure) => {
                tracing::debug!(
                    filename = %candidate.filename,
                    kind = %failure.kind,
                    "candidate rejected by policy"
                );
                return ParseResult::failure(failure);
            }
        };

        tracing::debug!(
            filename = %candidate.filename,
            format = %format,
            size_bytes = candidate.bytes.len(),
            "candidate accepted; dispatching to backend"
        );

        match extract_bounded(self.backend_for(format), &candidate.bytes, options.timeout).await {
            Ok((text, metadata)) => ParseResult::success(text, metadata),
            Err(failure) => ParseResult::failure(failure),
        }
    }

    /// Parse a batch of raw uploads. See [`crate::core::batch::parse_batch`].
    pub async fn parse_batch(
        &self,
        uploads: Vec<RawUpload>,
        options: &ParseOptions,
    ) -> crate::error::Result<crate::types::BatchResult> {
        crate::core::batch::parse_batch(self, uploads, options).await
    }

    /// Synchronous wrapper for [`DocumentParser::parse`].
    ///
    /// Blocks on the shared global runtime; for async code call `parse`
    /// directly.
    pub fn parse_sync(&self, candidate: &UploadCandidate, options: &ParseOptions) -> ParseResult {
        GLOBAL_RUNTIME.block_on(self.parse(candidate, options))
    }

    /// Synchronous wrapper for [`DocumentParser::parse_batch`].
    pub fn parse_batch_sync(
        &self,
        uploads: Vec<RawUpload>,
        options: &ParseOptions,
    ) -> crate::error::Result<crate::types::BatchResult> {
        GLOBAL_RUNTIME.block_on(self.parse_batch(uploads, options))
    }
}
