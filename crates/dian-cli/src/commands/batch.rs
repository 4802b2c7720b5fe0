//! Batch processing command for multiple invoice files.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use dian_core::diagnostics::Diagnostics;
use dian_core::models::collection::ResultCollection;
use dian_core::models::config::DianConfig;
use dian_core::Pipeline;

use super::export::{write_collection, ExportFormat};
use super::{is_input_file, load_config, KindArg};

/// Label recorded for files whose type could not be determined.
const UNKNOWN_KIND: &str = "Desconocido";

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input directory or glob pattern
    #[arg(required = true)]
    input: String,

    /// Document type of every file
    #[arg(short = 't', long = "type", value_enum, default_value = "auto")]
    kind: KindArg,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Output format of the bucket files
    #[arg(short, long, value_enum, default_value = "csv")]
    format: ExportFormat,

    /// Stop at the first document that fails
    #[arg(long)]
    fail_fast: bool,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let files = collect_files(&args.input)?;

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    // Extraction is synchronous; keep it off the async runtime
    let collection = {
        let config = config.clone();
        let kind = args.kind;
        let fail_fast = args.fail_fast;
        let pb = pb.clone();
        tokio::task::spawn_blocking(move || process_files(&files, kind, fail_fast, &config, &pb))
            .await?
    };

    pb.finish_with_message("Complete");

    let written = write_collection(&args.output_dir, &collection, args.format, &config.export)?;

    // Print summary
    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        collection.processed_count() + collection.failure_count(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(collection.processed_count()).green(),
        style(collection.failure_count()).red()
    );

    for path in &written {
        println!("   {} {}", style("→").cyan(), path.display());
    }

    if !collection.failures().is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for failure in collection.failures() {
            println!("  - {}: {}", failure.file, failure.message);
        }
    }

    if args.fail_fast && collection.failure_count() > 0 {
        anyhow::bail!("Processing stopped at the first failure");
    }

    Ok(())
}

/// Expand the input into document files: a directory is scanned for PDFs
/// and page dumps, anything else is taken as a glob pattern.
fn collect_files(input: &str) -> anyhow::Result<Vec<PathBuf>> {
    let pattern = if Path::new(input).is_dir() {
        format!("{}/*", input.trim_end_matches('/'))
    } else {
        input.to_string()
    };

    let mut files: Vec<PathBuf> = glob(&pattern)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file() && is_input_file(p))
        .collect();
    files.sort();
    Ok(files)
}

fn process_files(
    files: &[PathBuf],
    kind: KindArg,
    fail_fast: bool,
    config: &DianConfig,
    pb: &ProgressBar,
) -> ResultCollection {
    let pipeline = Pipeline::with_config(config);
    let mut collection = ResultCollection::new();

    for path in files {
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();
        pb.set_message(name.clone());

        let failures_before = collection.failure_count();
        let mut diagnostics = Diagnostics::new();
        let outcome = pipeline.process_file(kind.kind(), path, &mut diagnostics);

        match outcome.kind {
            Some(kind) => collection.record(
                &name,
                kind,
                outcome.output,
                outcome.inventory,
                &diagnostics,
            ),
            None => {
                let message = diagnostics
                    .last_fatal()
                    .map(|d| d.message.clone())
                    .unwrap_or_else(|| "document type not recognized".to_string());
                collection.record_failure(&name, UNKNOWN_KIND, message);
            }
        }

        let failed = collection.failure_count() > failures_before;
        if failed {
            warn!("Failed to process {}", path.display());
        } else {
            debug!(
                "Processed {} ({} warnings)",
                path.display(),
                diagnostics.warnings().count()
            );
        }

        pb.inc(1);

        if failed && fail_fast {
            break;
        }
    }

    collection
}
