//! Process command - extract data from a single invoice.

use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Utc;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use invparse_core::export;
use invparse_core::invoice::rules::format_amount;
use invparse_core::models::invoice::InvoiceRecord;
use invparse_core::{IngestionPort, InvoiceSource};

use super::{ingestion, load_config};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input text file, or "-" for stdin
    #[arg(required_unless_present = "text", conflicts_with = "text")]
    input: Option<PathBuf>,

    /// Invoice text given inline instead of a file
    #[arg(short, long)]
    text: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
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

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let source = read_source(&args)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Extracting invoice data...");

    let record = ingestion(&config).ingest(source, Utc::now()).await;
    pb.finish_and_clear();
    let record = record?;

    let output = format_record(&record, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        print!("{}", output);
        if !output.ends_with('\n') {
            println!();
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn read_source(args: &ProcessArgs) -> anyhow::Result<InvoiceSource> {
    if let Some(text) = &args.text {
        return Ok(InvoiceSource::Text(text.clone()));
    }

    match args.input.as_deref() {
        Some(path) if path.as_os_str() == "-" => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            info!("Read {} bytes from stdin", text.len());
            Ok(InvoiceSource::Text(text))
        }
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Input file not found: {}", path.display());
            }
            info!("Processing file: {}", path.display());
            Ok(file_source(path)?)
        }
        None => anyhow::bail!("Provide an input file or --text"),
    }
}

/// Read a file into an ingestion source named after its file name.
pub fn file_source(path: &std::path::Path) -> std::io::Result<InvoiceSource> {
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();
    Ok(InvoiceSource::file(name, None, fs::read(path)?))
}

/// Render one record in the requested format.
pub fn format_record(record: &InvoiceRecord, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(record)?,
        OutputFormat::Csv => export::to_csv(std::slice::from_ref(record))?,
        OutputFormat::Text => format_record_text(record),
    })
}

fn format_record_text(record: &InvoiceRecord) -> String {
    let currency = record.currency.code();
    let mut output = String::new();

    output.push_str(&format!("Vendor:  {}\n", record.vendor));
    output.push_str(&format!("Invoice: {}\n", record.invoice_number));
    output.push_str(&format!("Date:    {}\n", record.date));
    output.push('\n');

    if !record.line_items.is_empty() {
        output.push_str("Line items:\n");
        for item in &record.line_items {
            output.push_str(&format!(
                "  {:<40} {:>12} {}\n",
                item.description,
                format_amount(item.amount),
                currency
            ));
        }
        output.push('\n');
    }

    output.push_str(&format!("Total:   {} {}\n", format_amount(record.total), currency));
    output
}
