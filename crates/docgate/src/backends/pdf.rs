//! PDF extraction backend built on lopdf.

use crate::backends::{BackendOutput, ExtractionBackend};
use crate::core::mime::DocumentFormat;
use crate::error::{DocGateError, Result};
use async_trait::async_trait;
use lopdf::{Document, Object};
use std::collections::HashMap;

/// Decodes PDF buffers with lopdf.
///
/// Decoding runs inside `spawn_blocking`: lopdf is synchronous and a hostile
/// document can keep it busy, so the work must not occupy an async worker
/// thread while the bounded extractor races it against the deadline.
pub struct PdfBackend;

impl Default for PdfBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ExtractionBackend for PdfBackend {
    fn name(&self) -> &str {
        "pdf-lopdf"
    }

    fn format(&self) -> DocumentFormat {
        DocumentFormat::Pdf
    }

    async fn extract(&self, content: &[u8]) -> Result<BackendOutput> {
        let bytes = content.to_vec();
        tokio::task::spawn_blocking(move || extract_sync(&bytes))
            .await
            .map_err(|e| DocGateError::parsing(format!("PDF extraction task failed: {}", e)))?
    }
}

fn extract_sync(bytes: &[u8]) -> Result<BackendOutput> {
    let doc = Document::load_mem(bytes).map_err(|e| DocGateError::parsing_with_source("failed to load PDF document", e))?;

    if doc.is_encrypted() {
        return Err(DocGateError::parsing("PDF document is password protected"));
    }

    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    let mut text = String::new();
    let mut warnings = Vec::new();

    for page in &page_numbers {
        match doc.extract_text(&[*page]) {
            Ok(page_text) => {
                if !text.is_empty() {
                    text.push('\n');
                }
                text.push_str(page_text.trim_end());
            }
            Err(e) => {
                tracing::debug!(page, error = %e, "page text extraction failed");
                warnings.push(format!("no extractable text on page {}", page));
            }
        }
    }

    Ok(BackendOutput {
        text,
        page_count: Some(page_numbers.len()),
        document_info: read_document_info(&doc),
        warnings,
    })
}

/// Read the trailer Info dictionary, keeping only printable string values.
fn read_document_info(doc: &Document) -> Option<HashMap<String, String>> {
    let info_ref = doc.trailer.get(b"Info").ok()?.as_reference().ok()?;
    let dict = doc.get_dictionary(info_ref).ok()?;

    let mut info = HashMap::new();
    for (key, value) in dict.iter() {
        if let Object::String(bytes, _) = value {
            let key = String::from_utf8_lossy(key).to_string();
            info.insert(key, String::from_utf8_lossy(bytes).to_string());
        }
    }

    if info.is_empty() { None } else { Some(info) }
}
