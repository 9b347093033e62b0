//! Supported formats and declared-MIME allow-lists.
//!
//! Format detection is driven by the filename extension; the declared MIME
//! type is then checked against one canonical allow-list per format. The
//! legacy Word MIME type (`application/msword`) is accepted for DOCX because
//! some clients still declare it for `.docx` uploads.

pub const PDF_MIME_TYPE: &str = "application/pdf";
pub const DOCX_MIME_TYPE: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const LEGACY_WORD_MIME_TYPE: &str = "application/msword";

/// Declared MIME types accepted for PDF uploads.
pub const ALLOWED_PDF_MIME_TYPES: &[&str] = &[PDF_MIME_TYPE];

/// Declared MIME types accepted for DOCX uploads.
pub const ALLOWED_DOCX_MIME_TYPES: &[&str] = &[DOCX_MIME_TYPE, LEGACY_WORD_MIME_TYPE];

/// Document formats the pipeline knows how to validate and extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Detect the format from a filename extension (case-insensitive).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    /// Detect the format from a full filename.
    pub fn from_filename(filename: &str) -> Option<Self> {
        Self::from_extension(extension_of(filename)?)
    }

    /// The canonical declared-MIME allow-list for this format.
    pub fn allowed_mime_types(&self) -> &'static [&'static str] {
        match self {
            Self::Pdf => ALLOWED_PDF_MIME_TYPES,
            Self::Docx => ALLOWED_DOCX_MIME_TYPES,
        }
    }

    /// Canonical MIME type for this format.
    pub fn canonical_mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => PDF_MIME_TYPE,
            Self::Docx => DOCX_MIME_TYPE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The extension of a filename, without the dot.
///
/// `None` when the filename has no dot or ends with one.
pub fn extension_of(filename: &str) -> Option<&str> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty() { None } else { Some(ext) }
}
