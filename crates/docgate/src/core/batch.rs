//! Batch coordination.
//!
//! Applies the dispatcher to each file in a multi-file request with fully
//! isolated per-file failures: one file's rejection, backend error, timeout,
//! or even panic never aborts the batch or disturbs the ordered result list.

use crate::core::parser::DocumentParser;
use crate::error::{DocGateError, ErrorKind, Result};
use crate::types::{BatchEntry, BatchResult, ParseFailure, ParseOptions, ParseResult, RawUpload, MAX_FILES_PER_BATCH};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Filename recorded for entries that did not carry one.
const UNKNOWN_FILENAME: &str = "unknown";

/// Parse every upload in `uploads`, preserving input order.
///
/// The only `Err` paths are caller-contract violations - an empty batch or
/// more than [`MAX_FILES_PER_BATCH`] entries - which the transport layer is
/// expected to have rejected already. Everything that goes wrong with an
/// individual file is recorded in that file's [`BatchEntry`].
pub async fn parse_batch(
    parser: &DocumentParser,
    uploads: Vec<RawUpload>,
    options: &ParseOptions,
) -> Result<BatchResult> {
    if uploads.is_empty() {
        return Err(DocGateError::validation("no files provided"));
    }
    if uploads.len() > MAX_FILES_PER_BATCH {
        return Err(DocGateError::validation(format!(
            "too many files: {} exceeds the maximum of {} per request",
            uploads.len(),
            MAX_FILES_PER_BATCH
        )));
    }

    let options = Arc::new(options.clone());
    let max_concurrent = options.max_concurrent_extractions.unwrap_or_else(|| num_cpus::get() * 2);
    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));

    let mut tasks = JoinSet::new();
    let mut entries: Vec<Option<BatchEntry>> = (0..uploads.len()).map(|_| None).collect();
    let mut filenames: Vec<String> = Vec::with_capacity(entries.len());

    for (index, upload) in uploads.into_iter().enumerate() {
        let filename = upload.filename.clone().unwrap_or_else(|| UNKNOWN_FILENAME.to_string());
        filenames.push(filename.clone());

        // Structurally invalid entries are settled without a task (and
        // without ever invoking the dispatcher).
        let candidate = match upload.into_candidate() {
            Some(candidate) => candidate,
            None => {
                entries[index] = Some(BatchEntry::from_result(
                    filename,
                    ParseResult::failure(ParseFailure::new(
                        ErrorKind::StructurallyInvalidInput,
                        "Invalid file object.",
                    )),
                ));
                continue;
            }
        };

        let parser = parser.clone();
        let options = Arc::clone(&options);
        let semaphore = Arc::clone(&semaphore);

        tasks.spawn(async move {
            // Semaphore closed only if dropped, which cannot happen while
            // tasks hold a clone.
            let _permit = semaphore.acquire().await.expect("batch semaphore closed");
            let result = parser.parse(&candidate, &options).await;
            (index, filename, result)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, filename, result)) => {
                entries[index] = Some(BatchEntry::from_result(filename, result));
            }
            Err(join_err) => {
                // A panicking backend must cost only its own file, but the
                // JoinError does not carry our index. Settle the gap slots
                // after the loop; log here for the operator.
                tracing::error!(error = %join_err, "batch parse task panicked");
            }
        }
    }

    // Any slot left unsettled belongs to a panicked task.
    let entries = entries
        .into_iter()
        .zip(filenames)
        .map(|(slot, filename)| {
            slot.unwrap_or_else(|| {
                BatchEntry::from_result(
                    filename,
                    ParseResult::failure(ParseFailure::new(
                        ErrorKind::ExtractionFailure,
                        "Internal error during document processing.",
                    )),
                )
            })
        })
        .collect();

    Ok(BatchResult::from_entries(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::{BackendOutput, ExtractionBackend};
    use crate::core::mime::{DocumentFormat, DOCX_MIME_TYPE, PDF_MIME_TYPE};
    use crate::types::BatchOutcome;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct EchoBackend {
        format: DocumentFormat,
    }

    #[async_trait]
    impl ExtractionBackend for EchoBackend {
        fn name(&self) -> &str {
            "echo"
        }

        fn format(&self) -> DocumentFormat {
            self.format
        }

        async fn extract(&self, content: &[u8]) -> crate::error::Result<BackendOutput> {
            Ok(BackendOutput {
                text: format!("{} bytes", content.len()),
                ..Default::default()
            })
        }
    }

    fn echo_parser() -> DocumentParser {
        DocumentParser::with_backends(
            Arc::new(EchoBackend {
                format: DocumentFormat::Pdf,
            }),
            Arc::new(EchoBackend {
                format: DocumentFormat::Docx,
            }),
        )
    }

    fn pdf_upload(name: &str) -> RawUpload {
        RawUpload::file(b"%PDF-1.7 body".to_vec(), PDF_MIME_TYPE, name)
    }

    #[tokio::test]
    async fn test_empty_batch_rejected() {
        let result = parse_batch(&echo_parser(), vec![], &ParseOptions::default()).await;
        assert!(matches!(result.unwrap_err(), DocGateError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_over_cap_rejected() {
        let uploads = (0..MAX_FILES_PER_BATCH + 1).map(|i| pdf_upload(&format!("f{}.pdf", i))).collect();
        let result = parse_batch(&echo_parser(), uploads, &ParseOptions::default()).await;
        assert!(matches!(result.unwrap_err(), DocGateError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_order_preserved_with_mixed_entries() {
        let uploads = vec![
            pdf_upload("first.pdf"),
            RawUpload::default(), // structurally invalid
            RawUpload::file(b"PK\x03\x04 zip".to_vec(), DOCX_MIME_TYPE, "third.docx"),
            RawUpload::file(vec![0u8; 16], PDF_MIME_TYPE, "fourth.pdf"), // bad signature
        ];

        let batch = parse_batch(&echo_parser(), uploads, &ParseOptions::default())
            .await
            .unwrap();

        assert_eq!(batch.results.len(), 4);
        assert_eq!(batch.results[0].filename, "first.pdf");
        assert_eq!(batch.results[1].filename, "unknown");
        assert_eq!(batch.results[2].filename, "third.docx");
        assert_eq!(batch.results[3].filename, "fourth.pdf");

        assert!(batch.results[0].succeeded);
        assert_eq!(
            batch.results[1].error.as_ref().unwrap().kind,
            ErrorKind::StructurallyInvalidInput
        );
        assert!(batch.results[2].succeeded);
        assert_eq!(
            batch.results[3].error.as_ref().unwrap().kind,
            ErrorKind::InvalidSignature
        );

        assert!(batch.succeeded);
        assert_eq!(batch.outcome, BatchOutcome::Partial);
    }

    #[tokio::test]
    async fn test_all_failed_classification() {
        let uploads = vec![RawUpload::default(), RawUpload::file(vec![1, 2, 3], "text/plain", "a.txt")];
        let batch = parse_batch(&echo_parser(), uploads, &ParseOptions::default())
            .await
            .unwrap();

        assert!(!batch.succeeded);
        assert_eq!(batch.outcome, BatchOutcome::AllFailed);
        assert_eq!(batch.results.len(), 2);
    }

    #[tokio::test]
    async fn test_all_succeeded_classification() {
        let uploads = vec![pdf_upload("a.pdf"), pdf_upload("b.pdf")];
        let batch = parse_batch(&echo_parser(), uploads, &ParseOptions::default())
            .await
            .unwrap();

        assert!(batch.succeeded);
        assert_eq!(batch.outcome, BatchOutcome::AllSucceeded);
    }

    #[tokio::test]
    async fn test_concurrency_limit_of_one_still_completes() {
        let options = ParseOptions {
            max_concurrent_extractions: Some(1),
            ..Default::default()
        };
        let uploads = vec![pdf_upload("a.pdf"), pdf_upload("b.pdf"), pdf_upload("c.pdf")];
        let batch = parse_batch(&echo_parser(), uploads, &options).await.unwrap();
        assert_eq!(batch.results.len(), 3);
        assert_eq!(batch.outcome, BatchOutcome::AllSucceeded);
    }

    #[tokio::test]
    async fn test_panicking_backend_isolated() {
        struct PanickingBackend;

        #[async_trait]
        impl ExtractionBackend for PanickingBackend {
            fn name(&self) -> &str {
                "panicking"
            }

            fn format(&self) -> DocumentFormat {
                DocumentFormat::Pdf
            }

            async fn extract(&self, _content: &[u8]) -> crate::error::Result<BackendOutput> {
                panic!("decoder blew up");
            }
        }

        let parser = DocumentParser::with_backends(
            Arc::new(PanickingBackend),
            Arc::new(EchoBackend {
                format: DocumentFormat::Docx,
            }),
        );

        let uploads = vec![
            pdf_upload("boom.pdf"),
            RawUpload::file(b"PK\x03\x04 zip".to_vec(), DOCX_MIME_TYPE, "fine.docx"),
        ];

        let batch = parse_batch(&parser, uploads, &ParseOptions::default()).await.unwrap();

        assert_eq!(batch.results.len(), 2);
        // The docx entry must survive the pdf backend's panic, and the
        // panicked entry keeps its slot and filename.
        assert_eq!(batch.results[0].filename, "boom.pdf");
        assert!(!batch.results[0].succeeded);
        assert_eq!(
            batch.results[0].error.as_ref().unwrap().kind,
            ErrorKind::ExtractionFailure
        );
        assert_eq!(batch.results[1].filename, "fine.docx");
        assert!(batch.results[1].succeeded);
        assert_eq!(batch.outcome, BatchOutcome::Partial);
    }
}
