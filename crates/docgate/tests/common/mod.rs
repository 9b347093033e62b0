//! Shared fixtures and stub backends for the integration suites.
#![allow(dead_code)]

use async_trait::async_trait;
use docgate::{BackendOutput, DocGateError, DocumentFormat, ExtractionBackend};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::io::{Cursor, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// What a [`StubBackend`] does when invoked.
pub enum StubBehavior {
    /// Return the given text.
    Text(&'static str),
    /// Fail with a backend-internal error message.
    Fail,
    /// Never settle.
    Hang,
    /// Return text with the given number of warnings attached.
    Warnings(&'static str, usize),
}

/// Deterministic backend stub that records invocations.
pub struct StubBackend {
    pub format: DocumentFormat,
    pub behavior: StubBehavior,
    pub invocations: AtomicUsize,
}

impl StubBackend {
    pub fn new(format: DocumentFormat, behavior: StubBehavior) -> Self {
        Self {
            format,
            behavior,
            invocations: AtomicUsize::new(0),
        }
    }

    pub fn invocation_count(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExtractionBackend for StubBackend {
    fn name(&self) -> &str {
        "stub"
    }

    fn format(&self) -> DocumentFormat {
        self.format
    }

    async fn extract(&self, _content: &[u8]) -> docgate::Result<BackendOutput> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            StubBehavior::Text(text) => Ok(BackendOutput {
                text: text.to_string(),
                ..Default::default()
            }),
            StubBehavior::Fail => Err(DocGateError::parsing("stub backend internal failure at /private/path")),
            StubBehavior::Hang => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            StubBehavior::Warnings(text, count) => Ok(BackendOutput {
                text: text.to_string(),
                warnings: (0..*count).map(|i| format!("conversion warning {}", i)).collect(),
                ..Default::default()
            }),
        }
    }
}

/// Build a minimal but valid in-memory DOCX with the given paragraphs.
pub fn minimal_docx(paragraphs: &[&str]) -> Vec<u8> {
    let mut body = String::new();
    for text in paragraphs {
        body.push_str("<w:p><w:r><w:t xml:space=\"preserve\">");
        body.push_str(&xml_escape(text));
        body.push_str("</w:t></w:r></w:p>");
    }
    let document_xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{}</w:body></w:document>",
        body
    );

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    writer
        .start_file("[Content_Types].xml", options)
        .expect("start content types");
    writer
        .write_all(
            br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#,
        )
        .expect("write content types");

    writer.start_file("word/document.xml", options).expect("start document");
    writer.write_all(document_xml.as_bytes()).expect("write document");

    writer.finish().expect("finish zip").into_inner()
}

/// Build a minimal single-page PDF containing `text`, using lopdf itself.
pub fn minimal_pdf(text: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 48.into()]),
            Operation::new("Td", vec![100.into(), 600.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().expect("encode content")));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("save pdf");
    bytes
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
