//! CSV and JSON exports of invoice collections.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::invoice::InvoiceRecord;

/// Header row of the CSV export.
pub const CSV_HEADER: [&str; 5] = ["Vendor", "Invoice No", "Date", "Currency", "Total"];

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// File name used when downloading or writing an export.
    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "invoices.csv",
            ExportFormat::Json => "invoices.json",
        }
    }

    /// MIME type of the export.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }
}

/// Render records as CSV, one row per record in collection order.
///
/// Fields containing separators or quotes are quoted.
pub fn to_csv(records: &[InvoiceRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(CSV_HEADER)?;

    for record in records {
        let date = record.date.to_string();
        let total = record.total.to_string();
        wtr.write_record([
            record.vendor.as_str(),
            record.invoice_number.as_str(),
            date.as_str(),
            record.currency.code(),
            total.as_str(),
        ])?;
    }

    let data = wtr
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    String::from_utf8(data).map_err(|e| std::io::Error::other(e.to_string()).into())
}

/// Render records as a pretty-printed JSON array, line items included.
pub fn to_json(records: &[InvoiceRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Parse a JSON array produced by [`to_json`].
pub fn from_json(content: &str) -> Result<Vec<InvoiceRecord>> {
    Ok(serde_json::from_str(content)?)
}

/// Render records in the given format.
pub fn export(records: &[InvoiceRecord], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Csv => to_csv(records),
        ExportFormat::Json => to_json(records),
    }
}
