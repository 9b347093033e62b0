//! Command-line front end for the docgate intake pipeline.
//!
//! Reads local files, runs them through the same validation and bounded
//! extraction an upload endpoint would, and prints the batch result as JSON.
//! Exit status is non-zero when every file failed.

use anyhow::Context;
use clap::Parser;
use docgate::{DocumentParser, ParseOptions, RawUpload, MAX_FILES_PER_BATCH};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "docgate",
    version,
    about = "Validate untrusted PDF/DOCX files and extract their text"
)]
struct Cli {
    /// Files to parse (at most 5 per invocation).
    #[arg(required = true, num_args = 1..)]
    files: Vec<PathBuf>,

    /// Per-file size ceiling in bytes.
    #[arg(long, default_value_t = docgate::DEFAULT_MAX_FILE_SIZE)]
    max_file_size: usize,

    /// Extraction deadline per file, in milliseconds.
    #[arg(long, default_value_t = 30_000)]
    timeout_ms: u64,

    /// Declared MIME type override; guessed from the extension when omitted.
    #[arg(long)]
    mime_type: Option<String>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.files.len() > MAX_FILES_PER_BATCH {
        anyhow::bail!(
            "too many files: {} exceeds the maximum of {} per invocation",
            cli.files.len(),
            MAX_FILES_PER_BATCH
        );
    }

    let options = ParseOptions {
        max_file_size: cli.max_file_size,
        timeout: Duration::from_millis(cli.timeout_ms),
        ..Default::default()
    };

    let mut uploads = Vec::with_capacity(cli.files.len());
    for path in &cli.files {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let declared_mime = match &cli.mime_type {
            Some(mime) => mime.clone(),
            None => mime_guess::from_path(path).first_or_octet_stream().essence_str().to_string(),
        };

        tracing::debug!(file = %path.display(), mime = %declared_mime, size = bytes.len(), "queued");
        uploads.push(RawUpload::file(bytes, declared_mime, filename));
    }

    let parser = DocumentParser::new();
    let batch = parser.parse_batch(uploads, &options).await?;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&batch)?
    } else {
        serde_json::to_string(&batch)?
    };
    println!("{}", json);

    if !batch.succeeded {
        std::process::exit(1);
    }
    Ok(())
}
