//! Batch processing command for multiple visura files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use visura_core::{ExtractionResponse, VisuraExtractor};

use super::config::load_config;
use super::process::{csv_row, format_response, read_input, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for input PDFs (e.g. "visure/*.pdf")
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    response: Option<ExtractionResponse>,
    error: Option<String>,
    processing_time_ms: u64,
}

impl FileResult {
    fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            ext.eq_ignore_ascii_case("pdf")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let extractor = Arc::new(VisuraExtractor::from_config(&config)?);
    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));

    let handles: Vec<_> = files
        .into_iter()
        .map(|path| {
            let extractor = Arc::clone(&extractor);
            let semaphore = Arc::clone(&semaphore);
            tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await?;
                let result =
                    tokio::task::spawn_blocking(move || process_single_file(path, &extractor))
                        .await?;
                Ok::<_, anyhow::Error>(result)
            })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    let mut handles = handles.into_iter();
    while let Some(handle) = handles.next() {
        let result = handle.await??;
        overall_pb.inc(1);

        if let Some(message) = &result.error {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), message);
            } else {
                overall_pb.abandon();
                // Queued files must not keep running after the command fails.
                for pending in handles.by_ref() {
                    pending.abort();
                }
                error!("Failed to process {}: {}", result.path.display(), message);
                anyhow::bail!("Processing failed for {}: {}", result.path.display(), message);
            }
        }

        results.push(result);
    }

    overall_pb.finish_with_message("Complete");

    if let Some(output_dir) = &args.output_dir {
        for result in &results {
            if let Some(response) = &result.response {
                write_output(output_dir, &result.path, response, args.format)?;
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let (successful, failed): (Vec<&FileResult>, Vec<&FileResult>) =
        results.iter().partition(|r| r.is_success());

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn process_single_file(path: PathBuf, extractor: &VisuraExtractor) -> FileResult {
    let file_start = Instant::now();

    let outcome = read_input(&path, None).map(|input| extractor.extract(&input));
    let processing_time_ms = file_start.elapsed().as_millis() as u64;

    match outcome {
        Ok(response) => {
            let error = response
                .error
                .as_ref()
                .map(|e| format!("{}: {}", e.code, e.message));
            FileResult {
                path,
                response: Some(response),
                error,
                processing_time_ms,
            }
        }
        Err(e) => FileResult {
            path,
            response: None,
            error: Some(e.to_string()),
            processing_time_ms,
        },
    }
}

fn write_output(
    output_dir: &Path,
    source: &Path,
    response: &ExtractionResponse,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let output_name = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("visura");
    let output_path = output_dir.join(format!("{}.{}", output_name, format.extension()));

    fs::write(&output_path, format_response(response, format)?)?;
    debug!("Wrote output to {}", output_path.display());
    Ok(())
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "success",
        "partita_iva",
        "codice_ateco",
        "oggetto_sociale",
        "confidence",
        "method",
        "processing_time_ms",
        "error_code",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        let [success, piva, ateco, oggetto, confidence, method, _, code] = match &result.response {
            Some(response) => csv_row(response),
            None => Default::default(),
        };
        let success = if result.response.is_some() { success } else { "false".to_string() };

        wtr.write_record([
            filename,
            &success,
            &piva,
            &ateco,
            &oggetto,
            &confidence,
            &method,
            &result.processing_time_ms.to_string(),
            &code,
            result.error.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
