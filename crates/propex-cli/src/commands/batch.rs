//! Batch command - extract fields from many documents at once.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use futures_util::stream::{self, StreamExt};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use propex_core::acquisition::{mime_type_for_path, AcquisitionPipeline, MIME_PDF, MIME_TEXT};
use propex_core::error::ExtractionError;
use propex_core::extraction::{DocumentExtractor, FieldExtractor};
use propex_core::models::fields::{
    BatchDocument, BatchResponse, BatchResult, DocumentType, ExtractedFields, FieldName,
};

use super::load_config;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern of PDF or text files
    #[arg(required_unless_present = "manifest", conflicts_with = "manifest")]
    pattern: Option<String>,

    /// JSON manifest of documents (`[{id, text, doc_type}]` or `{"documents": [...]}`)
    #[arg(short, long)]
    manifest: Option<PathBuf>,

    /// Document type for files matched by the pattern
    #[arg(short, long, default_value = "general")]
    doc_type: DocumentType,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of documents processed concurrently
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Time limit per document in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Also write a per-document summary CSV
    #[arg(long)]
    summary: Option<PathBuf>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Manifest {
    List(Vec<Value>),
    Wrapped { documents: Vec<Value> },
}

impl Manifest {
    fn into_entries(self) -> Vec<Value> {
        match self {
            Manifest::List(documents) | Manifest::Wrapped { documents } => documents,
        }
    }
}

/// Where a job's text comes from.
enum Source {
    Text(String),
    File(PathBuf),
    /// A manifest entry that could not be read.
    Rejected(ExtractionError),
}

struct Job {
    id: Value,
    source: Source,
    doc_type: DocumentType,
}

/// Result of one job, with timing for the summary.
struct Outcome {
    result: BatchResult,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let jobs = match (&args.manifest, &args.pattern) {
        (Some(manifest), _) => manifest_jobs(manifest)?,
        (None, Some(pattern)) => file_jobs(pattern, args.doc_type)?,
        (None, None) => anyhow::bail!("Either a file pattern or --manifest is required"),
    };

    let workers = args.jobs.unwrap_or(config.batch.jobs).max(1);
    let timeout = Duration::from_millis(args.timeout_ms.unwrap_or(config.batch.document_timeout_ms));

    eprintln!(
        "{} Processing {} documents with {} workers",
        style("ℹ").blue(),
        jobs.len(),
        workers
    );

    let pb = ProgressBar::new(jobs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents")?
            .progress_chars("=>-"),
    );

    let extractor = Arc::new(FieldExtractor::from_config(&config.extraction));
    let pipeline = Arc::new(AcquisitionPipeline::new(&config.acquisition));

    let outcomes: Vec<Outcome> = stream::iter(jobs)
        .map(|job| {
            let extractor = Arc::clone(&extractor);
            let pipeline = Arc::clone(&pipeline);
            let pb = pb.clone();
            async move {
                let outcome = run_job(job, extractor, pipeline, timeout).await;
                pb.inc(1);
                outcome
            }
        })
        .buffered(workers)
        .collect()
        .await;

    pb.finish_and_clear();

    if let Some(summary_path) = &args.summary {
        write_summary(summary_path, &outcomes)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let response = BatchResponse {
        results: outcomes.into_iter().map(|o| o.result).collect(),
    };
    let output = serde_json::to_string_pretty(&response)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    let failed: Vec<&BatchResult> = response.results.iter().filter(|r| !r.is_success()).collect();

    eprintln!(
        "{} Processed {} documents in {:?}",
        style("✓").green(),
        response.results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(response.results.len() - failed.len()).green(),
        style(failed.len()).red()
    );
    for result in &failed {
        eprintln!(
            "  - {}: {}",
            result.id,
            result.error.as_deref().unwrap_or("unknown error")
        );
    }

    Ok(())
}

fn manifest_jobs(path: &Path) -> anyhow::Result<Vec<Job>> {
    let content = fs::read_to_string(path)?;
    let manifest: Manifest = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Invalid manifest {}: {}", path.display(), e))?;

    Ok(manifest
        .into_entries()
        .iter()
        .map(|entry| match BatchDocument::from_value(entry) {
            Ok(doc) => Job {
                id: doc.id,
                source: Source::Text(doc.text),
                doc_type: doc.doc_type,
            },
            Err(e) => Job {
                id: BatchDocument::entry_id(entry),
                source: Source::Rejected(e),
                doc_type: DocumentType::default(),
            },
        })
        .collect())
}

fn file_jobs(pattern: &str, doc_type: DocumentType) -> anyhow::Result<Vec<Job>> {
    let files: Vec<PathBuf> = glob(pattern)?
        .filter_map(|r| r.ok())
        .filter(|p| matches!(mime_type_for_path(p), MIME_PDF | MIME_TEXT))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", pattern);
    }

    Ok(files
        .into_iter()
        .map(|path| Job {
            id: Value::String(
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string()),
            ),
            source: Source::File(path),
            doc_type,
        })
        .collect())
}

async fn run_job(
    job: Job,
    extractor: Arc<FieldExtractor>,
    pipeline: Arc<AcquisitionPipeline>,
    timeout: Duration,
) -> Outcome {
    let start = Instant::now();
    let id = job.id.clone();

    // A timed-out blocking task cannot be cancelled. It keeps its thread
    // until it finishes or the runtime shuts down, and its result is dropped.
    let task = tokio::task::spawn_blocking(move || process_job(job, &extractor, &pipeline));

    let result = match tokio::time::timeout(timeout, task).await {
        Ok(Ok(Ok(fields))) => BatchResult::success(id, fields),
        Ok(Ok(Err(e))) => {
            warn!("Document {} failed: {}", id, e);
            BatchResult::failure(id, e)
        }
        Ok(Err(e)) => {
            warn!("Document {} crashed: {}", id, e);
            BatchResult::failure(id, format!("unexpected failure: {}", e))
        }
        Err(_) => {
            warn!("Document {} timed out", id);
            BatchResult::failure(id, format!("timed out after {}ms", timeout.as_millis()))
        }
    };

    let processing_time_ms = start.elapsed().as_millis() as u64;
    debug!("Document {} done in {}ms", result.id, processing_time_ms);

    Outcome {
        result,
        processing_time_ms,
    }
}

fn process_job(
    job: Job,
    extractor: &FieldExtractor,
    pipeline: &AcquisitionPipeline,
) -> anyhow::Result<ExtractedFields> {
    let text = match job.source {
        Source::Text(text) => text,
        Source::File(path) => pipeline.acquire_file(&path)?.text,
        Source::Rejected(e) => return Err(e.into()),
    };

    let result = extractor.extract_guarded(&text, job.doc_type)?;
    Ok(result.fields)
}

fn write_summary(path: &Path, outcomes: &[Outcome]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "id",
        "status",
        "field_count",
        "infrastructure_score",
        "processing_time_ms",
        "error",
    ])?;

    for outcome in outcomes {
        let result = &outcome.result;
        let id = match &result.id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let status = if result.is_success() { "success" } else { "error" };
        let score = result
            .fields
            .get(FieldName::InfrastructureScore)
            .map(|v| v.to_string())
            .unwrap_or_default();

        let field_count = result.fields.len().to_string();
        let time_ms = outcome.processing_time_ms.to_string();

        wtr.write_record([
            id.as_str(),
            status,
            field_count.as_str(),
            score.as_str(),
            time_ms.as_str(),
            result.error.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
