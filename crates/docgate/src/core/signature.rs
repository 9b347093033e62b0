//! Byte-signature (magic number) validation.
//!
//! A necessary but not sufficient check: it rejects trivial spoofing (wrong
//! extension or MIME paired with arbitrary bytes) without attempting to
//! validate container structure. DOCX containers are ZIP archives, so the
//! DOCX check only asserts "is a ZIP", not "is a valid Office document".

use crate::core::mime::DocumentFormat;

/// ASCII `%PDF`.
const PDF_MAGIC: [u8; 4] = [0x25, 0x50, 0x44, 0x46];

/// ZIP local-file-header marker `PK`.
const ZIP_MAGIC: [u8; 2] = [0x50, 0x4B];

/// Minimum buffer length required to inspect any signature.
const MIN_SIGNATURE_LEN: usize = 4;

/// Check whether `buffer` starts with the magic bytes for `format`.
///
/// Buffers shorter than 4 bytes are always invalid: there is not enough data
/// to inspect, regardless of format. Pure classification, no side effects.
pub fn has_valid_signature(buffer: &[u8], format: DocumentFormat) -> bool {
    if buffer.len() < MIN_SIGNATURE_LEN {
        return false;
    }

    match format {
        DocumentFormat::Pdf => buffer[..4] == PDF_MAGIC,
        DocumentFormat::Docx => buffer[..2] == ZIP_MAGIC,
    }
}
