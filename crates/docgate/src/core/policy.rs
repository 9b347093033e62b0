//! Upload policy checks.
//!
//! Evaluates a candidate against the intake policy in a fixed short-circuit
//! order: extension, declared-MIME consistency, size ceiling, per-call
//! allow-list override, byte signature. The cheap metadata-only checks run
//! first; the signature scan is the only check that touches file content.

use crate::core::mime::DocumentFormat;
use crate::core::signature::has_valid_signature;
use crate::error::ErrorKind;
use crate::types::{ParseFailure, ParseOptions, UploadCandidate};

/// Run all policy checks against a candidate.
///
/// Returns the detected format on "proceed", or the terminal failure for the
/// first check that rejects. Extraction must never be attempted for a
/// candidate this function rejected.
pub fn check_candidate(candidate: &UploadCandidate, options: &ParseOptions) -> Result<DocumentFormat, ParseFailure> {
    // 1. Extension must map to a supported format.
    let format = match DocumentFormat::from_filename(&candidate.filename) {
        Some(format) => format,
        None => {
            let extension = crate::core::mime::extension_of(&candidate.filename).unwrap_or("");
            return Err(ParseFailure::new(
                ErrorKind::UnsupportedFormat,
                format!(
                    "Unsupported file extension: {}. Only PDF and DOCX are supported.",
                    extension
                ),
            ));
        }
    };

    // 2. Declared MIME must belong to the extension-derived format.
    if !format
        .allowed_mime_types()
        .contains(&candidate.declared_mime_type.as_str())
    {
        return Err(ParseFailure::new(
            ErrorKind::MimeExtensionMismatch,
            format!("Declared MIME type does not match the {} file extension.", format),
        ));
    }

    // 3. Size ceiling.
    if candidate.bytes.len() > options.max_file_size {
        return Err(ParseFailure::new(
            ErrorKind::FileTooLarge,
            format!("File size exceeds limit of {} bytes.", options.max_file_size),
        ));
    }

    // 4. Per-call allow-list override, tightening only.
    if let Some(allowed) = &options.allowed_mime_types {
        if !allowed.iter().any(|m| m == &candidate.declared_mime_type) {
            return Err(ParseFailure::new(
                ErrorKind::DisallowedMimeType,
                "Declared MIME type is not allowed for this request.".to_string(),
            ));
        }
    }

    // 5. Magic bytes, the only content-touching check.
    if !has_valid_signature(&candidate.bytes, format) {
        return Err(ParseFailure::new(
            ErrorKind::InvalidSignature,
            format!("Invalid {} file signature. File may be corrupted or spoofed.", format),
        ));
    }

    Ok(format)
}
