//! Rule-based field extractors for free-form invoice text.

pub mod amounts;
pub mod currency;
pub mod dates;
pub mod labels;
pub mod patterns;

pub use amounts::{
    extract_line_items, format_amount, parse_amount, ExtractedLine, LineItemExtractor,
    TotalExtractor,
};
pub use currency::{detect_currency, CurrencyExtractor, CurrencyPolicy};
pub use dates::{extract_date, DateExtractor, DateOrder};
pub use labels::{extract_invoice_number, extract_vendor, InvoiceNumberExtractor, VendorExtractor};
pub use patterns::*;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text. The first match in document order wins.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// An extracted value together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte range of the full match in the source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
