//! Export command - convert a saved JSON export to CSV.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use invparse_core::export;

/// Arguments for the export command.
#[derive(Args)]
pub struct ExportArgs {
    /// JSON file previously written by `batch` or `process -f json`
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: ExportArgs) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let content = fs::read_to_string(&args.input)?;
    let records = match serde_json::from_str::<serde_json::Value>(&content)? {
        serde_json::Value::Array(_) => export::from_json(&content)?,
        // A single record, as written by `process -f json`
        value => vec![serde_json::from_value(value)?],
    };
    info!("Loaded {} invoices from {}", records.len(), args.input.display());

    let csv = export::to_csv(&records)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &csv)?;
        println!(
            "{} Exported {} invoices to {}",
            style("✓").green(),
            records.len(),
            output_path.display()
        );
    } else {
        print!("{}", csv);
    }

    Ok(())
}
