//! Extract command - pull fields from a single document.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use propex_core::acquisition::{AcquiredText, AcquisitionPipeline, MIME_TEXT};
use propex_core::extraction::{DocumentExtractor, FieldExtractor};
use propex_core::models::fields::{DocumentType, ExtractionResult};

use super::load_config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (PDF or text), or `-` for stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Document type: general, mls, inspection or deed
    #[arg(short, long, default_value = "general")]
    doc_type: DocumentType,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Year the building age is measured against (default: current year)
    #[arg(long)]
    reference_year: Option<i32>,

    /// Show per-field confidence scores
    #[arg(long)]
    show_confidence: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per field
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);

    pb.set_message("Reading document...");
    let pipeline = AcquisitionPipeline::new(&config.acquisition);
    let acquired = acquire(&args.input, &pipeline)?;
    debug!(
        "Acquired {} pages at confidence {:.2}",
        acquired.page_count, acquired.confidence
    );

    pb.set_message("Extracting fields...");
    let mut extractor = FieldExtractor::from_config(&config.extraction);
    if let Some(year) = args.reference_year {
        extractor = extractor.with_reference_year(year);
    }
    let result = extractor.extract(&acquired.text, args.doc_type)?;

    pb.finish_and_clear();

    for warning in &result.warnings {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }

    let output = format_result(&result, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_confidence {
        eprintln!();
        for (field, confidence) in result.confidence.iter() {
            eprintln!(
                "{} {}: {:.0}%",
                style("ℹ").blue(),
                field,
                confidence * 100.0
            );
        }
        eprintln!(
            "{} Processing time: {}ms",
            style("ℹ").blue(),
            result.processing_time_ms
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn acquire(input: &Path, pipeline: &AcquisitionPipeline) -> anyhow::Result<AcquiredText> {
    if input.as_os_str() == "-" {
        info!("Reading document from stdin");
        let mut data = Vec::new();
        std::io::stdin().read_to_end(&mut data)?;
        return Ok(pipeline.acquire(&data, MIME_TEXT)?);
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    info!("Processing file: {}", input.display());
    Ok(pipeline.acquire_file(input)?)
}

pub fn format_result(result: &ExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["field", "value", "confidence"])?;

    for (field, value) in result.fields.iter() {
        let confidence = result
            .confidence
            .get(*field)
            .map(|c| format!("{:.2}", c))
            .unwrap_or_default();
        let value = value.to_string();
        wtr.write_record([field.as_str(), value.as_str(), confidence.as_str()])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ExtractionResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Document type: {}\n", result.doc_type));
    output.push('\n');

    output.push_str("Fields:\n");
    let width = result
        .fields
        .keys()
        .map(|f| f.as_str().len())
        .max()
        .unwrap_or(0);
    for (field, value) in result.fields.iter() {
        // Multi-line values (legal descriptions) are indented under their key
        let value = value.to_string().replace('\n', &format!("\n  {:width$}  ", ""));
        output.push_str(&format!("  {:width$}  {}\n", field.as_str(), value));
    }

    if !result.warnings.is_empty() {
        output.push_str("\nWarnings:\n");
        for warning in &result.warnings {
            output.push_str(&format!("  - {}\n", warning));
        }
    }

    output
}
