//! DOCX extraction backend built on zip + quick-xml.
//!
//! A DOCX file is a ZIP container; the body text lives in
//! `word/document.xml`. Extraction streams that XML and collects the contents
//! of `w:t` runs, mapping paragraphs and explicit breaks to newlines and tabs.
//! Core document properties are read from `docProps/core.xml` when present.

use crate::backends::{BackendOutput, ExtractionBackend};
use crate::core::mime::DocumentFormat;
use crate::error::{DocGateError, Result};
use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// Decodes DOCX buffers by streaming the document XML.
///
/// Like the PDF backend, decoding runs inside `spawn_blocking` so the bounded
/// extractor's deadline race can settle on time.
pub struct DocxBackend;

impl Default for DocxBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DocxBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ExtractionBackend for DocxBackend {
    fn name(&self) -> &str {
        "docx-zip"
    }

    fn format(&self) -> DocumentFormat {
        DocumentFormat::Docx
    }

    async fn extract(&self, content: &[u8]) -> Result<BackendOutput> {
        let bytes = content.to_vec();
        tokio::task::spawn_blocking(move || extract_sync(&bytes))
            .await
            .map_err(|e| DocGateError::parsing(format!("DOCX extraction task failed: {}", e)))?
    }
}

fn extract_sync(bytes: &[u8]) -> Result<BackendOutput> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| DocGateError::parsing_with_source("failed to open DOCX as ZIP", e))?;

    let document_xml = read_archive_entry(&mut archive, "word/document.xml")?
        .ok_or_else(|| DocGateError::parsing("DOCX container has no word/document.xml"))?;

    let mut warnings = Vec::new();
    let text = extract_body_text(&document_xml, &mut warnings)?;

    let document_info = match read_archive_entry(&mut archive, "docProps/core.xml") {
        Ok(Some(core_xml)) => read_core_properties(&core_xml),
        Ok(None) => None,
        Err(e) => {
            tracing::debug!(error = %e, "failed to read docProps/core.xml");
            warnings.push("document properties could not be read".to_string());
            None
        }
    };

    Ok(BackendOutput {
        text,
        page_count: None,
        document_info,
        warnings,
    })
}

/// Read one archive entry as UTF-8, or `None` if the entry is absent.
fn read_archive_entry(archive: &mut ZipArchive<Cursor<&[u8]>>, name: &str) -> Result<Option<String>> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(DocGateError::parsing_with_source(format!("failed to open {}", name), e)),
    };

    let mut content = String::new();
    entry
        .read_to_string(&mut content)
        .map_err(|e| DocGateError::parsing_with_source(format!("failed to read {}", name), e))?;
    Ok(Some(content))
}

/// Stream `word/document.xml`, collecting run text.
///
/// Only text inside `w:t` elements is body text; everything else in the XML
/// is formatting. Paragraph ends and explicit `w:br` become newlines,
/// `w:tab` becomes a tab.
fn extract_body_text(xml: &str, warnings: &mut Vec<String>) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"t" => in_run_text = true,
                b"tab" => text.push('\t'),
                b"br" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" => text.push('\t'),
                b"br" => text.push('\n'),
                _ => {}
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_run_text = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_run_text => match t.unescape() {
                Ok(s) => text.push_str(&s),
                Err(e) => {
                    tracing::debug!(error = %e, "run text could not be unescaped");
                    warnings.push("a text run could not be decoded and was skipped".to_string());
                }
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(DocGateError::parsing_with_source("malformed word/document.xml", e)),
        }
    }

    // Paragraph mapping leaves one trailing newline on non-empty documents.
    if text.ends_with('\n') {
        text.pop();
    }

    Ok(text)
}

/// Pull title/creator/modified-by out of `docProps/core.xml`.
///
/// Best effort: a malformed properties part yields `None` rather than
/// failing the extraction.
fn read_core_properties(xml: &str) -> Option<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    let mut info = HashMap::new();
    let mut current: Option<&'static str> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                current = match e.local_name().as_ref() {
                    b"title" => Some("title"),
                    b"creator" => Some("creator"),
                    b"lastModifiedBy" => Some("last_modified_by"),
                    _ => None,
                };
            }
            Ok(Event::Text(t)) => {
                if let (Some(field), Ok(value)) = (current, t.unescape()) {
                    if !value.trim().is_empty() {
                        info.insert(field.to_string(), value.into_owned());
                    }
                }
            }
            Ok(Event::End(_)) => current = None,
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(_) => return None,
        }
    }

    if info.is_empty() { None } else { Some(info) }
}
