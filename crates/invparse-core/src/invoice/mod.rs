//! Invoice field extraction module.

mod parser;
pub mod rules;

pub use parser::{ExtractionResult, TextInvoiceParser};

use chrono::{DateTime, Utc};

use crate::models::invoice::InvoiceRecord;

/// Trait for invoice extractors.
///
/// Extraction is total: every field that cannot be resolved degrades to its
/// fallback value instead of producing an error.
pub trait InvoiceExtractor {
    /// Extract an invoice record using `now` for ids, timestamps and fallbacks.
    fn extract_at(&self, text: &str, now: DateTime<Utc>) -> InvoiceRecord;

    /// Extract an invoice record at the current wall-clock time.
    fn extract(&self, text: &str) -> InvoiceRecord {
        self.extract_at(text, Utc::now())
    }
}
