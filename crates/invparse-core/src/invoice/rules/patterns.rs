//! Common regex patterns for invoice text extraction.
//!
//! Label patterns are case-insensitive and the first match in document order
//! wins. `[:\s]` separators may span line breaks.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Vendor: rest of the line after "from", "vendor" or "company"
    pub static ref VENDOR: Regex = Regex::new(
        r"(?i)(?:from|vendor|company)[:\s]+([^\n\r]+)"
    ).unwrap();

    // Invoice number: alphanumerics and hyphens after "invoice", "inv" or "#"
    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)(?:invoice|inv|#)[:\s#]*([A-Z0-9\-]+)"
    ).unwrap();

    // Labeled numeric date with "/" or "-" separators
    pub static ref LABELED_DATE: Regex = Regex::new(
        r"(?i)(?:date|dated)[:\s]+([0-9]{1,2})[/\-]([0-9]{1,2})[/\-]([0-9]{4})"
    ).unwrap();

    // Labeled total, optional dollar sign, digits with "," grouping
    pub static ref TOTAL_AMOUNT: Regex = Regex::new(
        r"(?i)(?:total|amount|sum)[:\s]*\$?([0-9,]+\.?[0-9]*)"
    ).unwrap();

    // First currency marker anywhere in the text. Codes are matched in
    // upper case only so that words like "Europe" are not markers.
    pub static ref CURRENCY_MARKER: Regex = Regex::new(
        r"\$|USD|EUR|GBP"
    ).unwrap();

    // Monetary amount inside a single line
    pub static ref LINE_AMOUNT: Regex = Regex::new(
        r"\$?([0-9,]+\.?[0-9]+)"
    ).unwrap();
}
