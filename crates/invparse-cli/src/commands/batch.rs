//! Batch command - extract many invoices into one ledger.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use chrono::Utc;
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use invparse_core::export::{self, ExportFormat};
use invparse_core::invoice::rules::format_amount;
use invparse_core::models::invoice::InvoiceRecord;
use invparse_core::{IngestionPort, InvoiceLedger, LedgerStats, SortDirection, SortField};

use super::process::file_source;
use super::{ingestion, load_config};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching invoice text files
    #[arg(required = true)]
    input: String,

    /// Directory for invoices.csv and invoices.json
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Only export invoices whose vendor or number contains this term
    #[arg(short, long)]
    search: Option<String>,

    /// Order of exported invoices (default: processing order)
    #[arg(long, value_enum)]
    sort: Option<SortKey>,

    /// Sort in descending order
    #[arg(long, requires = "sort")]
    desc: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum SortKey {
    Vendor,
    Number,
    Date,
    Total,
}

impl From<SortKey> for SortField {
    fn from(key: SortKey) -> Self {
        match key {
            SortKey::Vendor => SortField::Vendor,
            SortKey::Number => SortField::InvoiceNumber,
            SortKey::Date => SortField::Date,
            SortKey::Total => SortField::Total,
        }
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let port = ingestion(&config);

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    fs::create_dir_all(&args.output_dir)?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut ledger = InvoiceLedger::new();
    let mut failed: Vec<(PathBuf, String)> = Vec::new();

    for path in files {
        let result = match file_source(&path) {
            Ok(source) => port.ingest(source, Utc::now()).await.map_err(anyhow::Error::from),
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(record) => {
                debug!("Extracted {} from {}", record.invoice_number, path.display());
                ledger.push(record);
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    failed.push((path, error_msg));
                } else {
                    pb.abandon();
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    let selected = select(&ledger, &args);
    for format in [ExportFormat::Csv, ExportFormat::Json] {
        let path = args.output_dir.join(format.file_name());
        fs::write(&path, export::export(&selected, format)?)?;
        println!("{} Wrote {}", style("✓").green(), path.display());
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        ledger.len() + failed.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(ledger.len()).green(),
        style(failed.len()).red()
    );

    let unknown_vendor = ledger.iter().filter(|r| !r.has_known_vendor()).count();
    if unknown_vendor > 0 {
        println!(
            "   {} without a recognised vendor",
            style(unknown_vendor).yellow()
        );
    }

    print_stats(&ledger.stats(Utc::now().date_naive()));

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for (path, error) in &failed {
            println!("  - {}: {}", path.display(), error);
        }
    }

    Ok(())
}

/// Records to export, after the optional search filter and sort.
fn select(ledger: &InvoiceLedger, args: &BatchArgs) -> Vec<InvoiceRecord> {
    let filtered: InvoiceLedger = match &args.search {
        Some(term) => ledger.search(term).into_iter().cloned().collect(),
        None => ledger.clone(),
    };

    match args.sort {
        Some(key) => {
            let direction = if args.desc {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            filtered
                .sorted(key.into(), direction)
                .into_iter()
                .cloned()
                .collect()
        }
        None => filtered.records().to_vec(),
    }
}

fn print_stats(stats: &LedgerStats) {
    println!();
    println!("{}", style("Summary:").bold());
    println!("  Invoices:    {}", stats.invoice_count);
    println!("  Total:       {}", format_amount(stats.total_amount));
    println!("  This month:  {}", stats.this_month_count);

    if !stats.top_vendors.is_empty() {
        println!();
        println!("{}", style("Top vendors:").bold());
        for vendor in &stats.top_vendors {
            println!("  {:<32} {:>14}", vendor.vendor, format_amount(vendor.total));
        }
    }

    if !stats.monthly_totals.is_empty() {
        println!();
        println!("{}", style("By month:").bold());
        for month in &stats.monthly_totals {
            println!("  {:<32} {:>14}", month.month, format_amount(month.total));
        }
    }
}
