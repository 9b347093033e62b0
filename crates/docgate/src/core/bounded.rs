//! Bounded-execution extraction.
//!
//! Races a backend invocation against a wall-clock deadline and normalizes
//! every backend failure into a caller-safe [`ParseFailure`]. The deadline is
//! a forced resumption, not a cooperative cancellation: when the timer fires
//! first, the backend task is abandoned and its resources are reclaimed by
//! ordinary runtime mechanisms, not by this module.

use crate::backends::{BackendOutput, ExtractionBackend};
use crate::error::ErrorKind;
use crate::types::{Metadata, ParseFailure};
use std::time::Duration;

/// Maximum number of backend warnings attached to result metadata.
///
/// Hostile input can provoke pathological warning volumes; the cap bounds
/// memory regardless of what the backend emits.
pub const MAX_WARNINGS: usize = 10;

/// Uncapped warning count above which the input is logged as suspicious.
pub const SUSPICIOUS_WARNING_COUNT: usize = 100;

/// Generic message for timed-out extractions.
const TIMEOUT_MESSAGE: &str = "Document parsing timed out.";

/// Invoke `backend` on `content` under `timeout`.
///
/// Whichever settles first wins: the backend's output, or the deadline. The
/// caller is guaranteed to be unblocked once the deadline passes, though the
/// backend's blocking work is not preempted at the OS level.
///
/// Backend errors are logged with full detail and replaced by a generic
/// per-format message; the original error text never reaches the caller.
pub async fn extract_bounded(
    backend: &dyn ExtractionBackend,
    content: &[u8],
    timeout: Duration,
) -> Result<(String, Metadata), ParseFailure> {
    let output = match tokio::time::timeout(timeout, backend.extract(content)).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            tracing::warn!(
                backend = backend.name(),
                format = %backend.format(),
                error = %e,
                "extraction backend failed"
            );
            return Err(ParseFailure::new(
                ErrorKind::ExtractionFailure,
                format!(
                    "Failed to parse {}. The file may be corrupted, password-protected, or too complex.",
                    backend.format().as_str().to_uppercase()
                ),
            ));
        }
        Err(_elapsed) => {
            tracing::warn!(
                backend = backend.name(),
                timeout_ms = timeout.as_millis() as u64,
                "extraction exceeded deadline; abandoning backend task"
            );
            return Err(ParseFailure::new(ErrorKind::ExtractionTimeout, TIMEOUT_MESSAGE));
        }
    };

    Ok(bound_output(backend, output))
}

/// Cap diagnostics and assemble result metadata.
fn bound_output(backend: &dyn ExtractionBackend, output: BackendOutput) -> (String, Metadata) {
    let mut warnings = output.warnings;

    if warnings.len() > SUSPICIOUS_WARNING_COUNT {
        tracing::warn!(
            backend = backend.name(),
            warning_count = warnings.len(),
            "excessive conversion warnings; input may be hostile"
        );
    }
    warnings.truncate(MAX_WARNINGS);

    let metadata = Metadata {
        page_count: output.page_count,
        document_info: output.document_info,
        warnings,
        ..Default::default()
    };

    (output.text, metadata)
}
