//! Process command - extract the accounting rows of a single document.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::{debug, info};

use dian_core::diagnostics::{Diagnostic, Diagnostics};
use dian_core::models::invoice::format_money;
use dian_core::{DocumentKind, InventoryItem, OutputRow, Pipeline};

use super::export::{render, to_csv, ExportFormat};
use super::{load_config, KindArg};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or JSON page dump)
    #[arg(required = true)]
    input: PathBuf,

    /// Document type
    #[arg(short = 't', long = "type", value_enum, default_value = "auto")]
    kind: KindArg,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Print the inventory items of a purchase invoice instead of its rows
    #[arg(long)]
    inventory: bool,

    /// Report warnings recorded during extraction
    #[arg(long)]
    show_warnings: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

/// JSON report of one processed document.
#[derive(Serialize)]
struct ProcessReport<'a> {
    file: String,
    document_type: DocumentKind,
    rows: &'a [OutputRow],
    discounts: &'a [OutputRow],
    #[serde(skip_serializing_if = "Option::is_none")]
    inventory: Option<&'a [InventoryItem]>,
    diagnostics: &'a [Diagnostic],
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    config.extraction.extract_inventory = args.inventory;

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pipeline = Pipeline::with_config(&config);
    let mut diagnostics = Diagnostics::new();
    let outcome = pipeline.process_file(args.kind.kind(), &args.input, &mut diagnostics);

    let (Some(kind), Some(output)) = (outcome.kind, outcome.output) else {
        let message = diagnostics
            .last_fatal()
            .map(|d| d.message.clone())
            .unwrap_or_else(|| "document could not be processed".to_string());
        anyhow::bail!("Failed to process {}: {}", args.input.display(), message);
    };

    if args.inventory && kind != DocumentKind::PurchaseInvoice {
        anyhow::bail!("Inventory is only extracted from purchase invoices, got {}", kind);
    }

    let inventory = outcome.inventory.unwrap_or_default();
    let rendered = if args.inventory {
        match args.format {
            OutputFormat::Json => render(&inventory, ExportFormat::Json, &config.export)?,
            OutputFormat::Csv => to_csv(&inventory, config.export.delimiter)?,
            OutputFormat::Text => format_inventory_text(&inventory),
        }
    } else {
        match args.format {
            OutputFormat::Json => {
                let report = ProcessReport {
                    file: args.input.display().to_string(),
                    document_type: kind,
                    rows: output.rows(),
                    discounts: output.discounts(),
                    inventory: None,
                    diagnostics: diagnostics.entries(),
                };
                serde_json::to_string_pretty(&report)?
            }
            OutputFormat::Csv => {
                let rows: Vec<OutputRow> = output
                    .rows()
                    .iter()
                    .chain(output.discounts())
                    .cloned()
                    .collect();
                to_csv(&rows, config.export.delimiter)?
            }
            OutputFormat::Text => format_text(kind, output.rows(), output.discounts()),
        }
    };

    // Write output
    if let Some(output_path) = &args.output {
        fs::write(output_path, &rendered)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", rendered);
    }

    if args.show_warnings {
        let warnings: Vec<_> = diagnostics.warnings().collect();
        if !warnings.is_empty() {
            eprintln!("{}", style("Warnings:").yellow());
            for warning in warnings {
                eprintln!("  - [{}] {}", warning.operation, warning.message);
            }
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_text(kind: DocumentKind, rows: &[OutputRow], discounts: &[OutputRow]) -> String {
    let mut output = String::new();

    output.push_str(&format!("Document: {}\n", kind));
    if let Some(first) = rows.first().or(discounts.first()) {
        output.push_str(&format!("Party: {}\n", first.party_name));
        output.push_str(&format!("NIT: {}\n", first.tax_id));
        output.push_str(&format!("Invoice: {}\n", first.invoice_number));
        output.push_str(&format!("Date: {}\n", first.date));
        output.push('\n');

        output.push_str("Taxes:\n");
        output.push_str(&format!("  IVA:         {}\n", format_money(first.total_vat)));
        output.push_str(&format!("  INC:         {}\n", format_money(first.total_inc)));
        output.push_str(&format!("  Rete Fuente: {}\n", format_money(first.withholding_source)));
        output.push_str(&format!("  Rete IVA:    {}\n", format_money(first.withholding_vat)));
        output.push_str(&format!("  Rete ICA:    {}\n", format_money(first.withholding_ica)));
        output.push('\n');
    }

    output.push_str("Bases by VAT rate:\n");
    if rows.is_empty() {
        output.push_str("  (no line items)\n");
    }
    for row in rows {
        output.push_str(&format!(
            "  {:>6}%  [{:>3}]  {}\n",
            row.vat_percent,
            row.vat_indicator,
            format_money(row.taxable_base)
        ));
    }

    for row in discounts {
        output.push_str(&format!(
            "\nDiscount ({}): {}\n",
            row.vat_indicator,
            format_money(row.taxable_base)
        ));
    }

    output
}

fn format_inventory_text(items: &[InventoryItem]) -> String {
    let mut output = String::new();
    for item in items {
        output.push_str(&format!(
            "{:>3}  {:<12} {:<40} {:>6} x {:>12}  IVA {}%\n",
            item.sequence,
            item.code,
            item.description,
            item.quantity.normalize(),
            format_money(item.unit_price),
            item.vat_percent.normalize(),
        ));
    }
    output
}
