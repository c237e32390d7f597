//! Label-anchored text fields: vendor and invoice number.

use regex::Regex;

use super::patterns::{INVOICE_NUMBER, VENDOR};
use super::{ExtractionMatch, FieldExtractor};

/// Extracts the text captured by group 1 of a label pattern, trimmed.
///
/// A match whose value trims to nothing counts as no match.
fn labeled_value(pattern: &Regex, text: &str) -> Option<ExtractionMatch<String>> {
    let caps = pattern.captures(text)?;
    let full_match = caps.get(0)?;
    let value = caps[1].trim();
    if value.is_empty() {
        return None;
    }
    Some(
        ExtractionMatch::new(value.to_string(), full_match.as_str())
            .with_position(full_match.start(), full_match.end()),
    )
}

fn labeled_values(pattern: &Regex, text: &str) -> Vec<ExtractionMatch<String>> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| {
            let full_match = caps.get(0)?;
            let value = caps[1].trim();
            (!value.is_empty()).then(|| {
                ExtractionMatch::new(value.to_string(), full_match.as_str())
                    .with_position(full_match.start(), full_match.end())
            })
        })
        .collect()
}

/// Vendor name extractor (`From:`, `Vendor:`, `Company:`).
#[derive(Debug, Default, Clone, Copy)]
pub struct VendorExtractor;

impl VendorExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for VendorExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        labeled_value(&VENDOR, text)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        labeled_values(&VENDOR, text)
    }
}

/// Invoice number extractor (`Invoice`, `Inv`, `#`).
#[derive(Debug, Default, Clone, Copy)]
pub struct InvoiceNumberExtractor;

impl InvoiceNumberExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for InvoiceNumberExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        labeled_value(&INVOICE_NUMBER, text)
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        labeled_values(&INVOICE_NUMBER, text)
    }
}

/// Extract the vendor name from invoice text.
pub fn extract_vendor(text: &str) -> Option<String> {
    VendorExtractor::new().extract(text).map(|m| m.value)
}

/// Extract the invoice number from invoice text.
pub fn extract_invoice_number(text: &str) -> Option<String> {
    InvoiceNumberExtractor::new().extract(text).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_vendor_labels() {
        assert_eq!(extract_vendor("From: Acme Corp"), Some("Acme Corp".to_string()));
        assert_eq!(extract_vendor("VENDOR  Globex Ltd  \n"), Some("Globex Ltd".to_string()));
        assert_eq!(extract_vendor("company:Initech\r\nmore"), Some("Initech".to_string()));
        assert_eq!(extract_vendor("Nothing labeled here"), None);
    }

    #[test]
    fn test_vendor_label_can_precede_value_on_next_line() {
        assert_eq!(extract_vendor("From:\nAcme Corp"), Some("Acme Corp".to_string()));
    }

    #[test]
    fn test_vendor_first_match_wins() {
        let text = "Vendor: First Co\nCompany: Second Co";
        assert_eq!(extract_vendor(text), Some("First Co".to_string()));
        assert_eq!(VendorExtractor::new().extract_all(text).len(), 2);
    }

    #[test]
    fn test_invoice_number() {
        assert_eq!(
            extract_invoice_number("Invoice #: INV-2024-001"),
            Some("INV-2024-001".to_string())
        );
        assert_eq!(extract_invoice_number("inv 42"), Some("42".to_string()));
        assert_eq!(extract_invoice_number("# A-7 due"), Some("A-7".to_string()));
    }

    #[test]
    fn test_invoice_number_stops_at_other_characters() {
        assert_eq!(
            extract_invoice_number("Invoice: FV/001/2024"),
            Some("FV".to_string())
        );
    }

    #[test]
    fn test_invoice_number_missing() {
        assert_eq!(extract_invoice_number("Receipt for services"), None);
    }

    #[test]
    fn test_match_position() {
        let m = VendorExtractor::new().extract("x\nFrom: Acme").unwrap();
        assert_eq!(m.position, Some((2, 12)));
        assert_eq!(m.source, "From: Acme");
    }
}
