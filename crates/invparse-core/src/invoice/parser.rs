//! Rule-based parser turning free-form invoice text into an [`InvoiceRecord`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::config::ExtractionConfig;
use crate::models::invoice::{sum_amounts, InvoiceRecord, LineItem, UNKNOWN_VENDOR};

use super::rules::{
    amounts::LineItemExtractor,
    currency::{detect_currency, CurrencyPolicy},
    dates::{DateExtractor, DateOrder},
    labels::{InvoiceNumberExtractor, VendorExtractor},
    patterns::{INVOICE_NUMBER, LABELED_DATE},
    FieldExtractor, TotalExtractor,
};
use super::InvoiceExtractor;

/// Result of invoice extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted invoice record.
    pub record: InvoiceRecord,
    /// One entry per field that fell back to its default.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Regex-driven invoice text parser.
#[derive(Debug, Clone, Default)]
pub struct TextInvoiceParser {
    config: ExtractionConfig,
}

impl TextInvoiceParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser from extraction configuration.
    pub fn from_config(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Set how labeled dates are read.
    pub fn with_date_order(mut self, order: DateOrder) -> Self {
        self.config.date_order = order;
        self
    }

    /// Set the currency policy.
    pub fn with_currency_policy(mut self, policy: CurrencyPolicy) -> Self {
        self.config.currency_policy = policy;
        self
    }

    /// Set the minimum line length for line items.
    pub fn with_min_line_length(mut self, length: usize) -> Self {
        self.config.min_line_length = length;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Parse invoice text at the current time.
    pub fn parse(&self, text: &str) -> ExtractionResult {
        self.parse_at(text, Utc::now())
    }

    /// Parse invoice text, using `now` for the id-independent fallbacks
    /// (invoice number, date) and the creation timestamp.
    pub fn parse_at(&self, text: &str, now: DateTime<Utc>) -> ExtractionResult {
        let started = Utc::now();
        let mut warnings = Vec::new();

        info!("Parsing invoice from {} characters of text", text.len());

        let id = Uuid::new_v4().to_string();

        let vendor = VendorExtractor::new()
            .extract(text)
            .map(|m| m.value)
            .unwrap_or_else(|| {
                warnings.push("Could not extract vendor".to_string());
                UNKNOWN_VENDOR.to_string()
            });

        let invoice_number = InvoiceNumberExtractor::new()
            .extract(text)
            .map(|m| m.value)
            .unwrap_or_else(|| {
                warnings.push("Could not extract invoice number".to_string());
                format!("INV-{}", now.timestamp_millis())
            });

        let date = DateExtractor::new()
            .with_order(self.config.date_order)
            .extract(text)
            .map(|m| m.value)
            .unwrap_or_else(|| {
                warnings.push("Could not extract date".to_string());
                now.date_naive()
            });

        let marker = detect_currency(text);
        let currency = self.config.currency_policy.resolve(&marker);
        debug!("Currency marker {:?} resolved to {}", marker, currency);

        let identifiers = identifier_spans(text);
        let line_items: Vec<LineItem> = LineItemExtractor::new()
            .with_min_line_length(self.config.min_line_length)
            .extract_lines(text)
            .into_iter()
            .filter(|line| {
                let (start, end) = line.amount_span;
                !identifiers.iter().any(|&(s, e)| s <= start && end <= e)
            })
            .map(|line| LineItem {
                id: LineItem::id_for_line(line.line_index),
                invoice_id: id.clone(),
                description: line.description,
                amount: line.amount,
            })
            .collect();
        if line_items.is_empty() {
            warnings.push("Could not extract line items".to_string());
        }

        let total: Decimal = match TotalExtractor::new().extract(text) {
            Some(m) => m.value,
            None => {
                warnings.push("Could not extract total, using line item sum".to_string());
                sum_amounts(&line_items)
            }
        };

        let record = InvoiceRecord {
            id,
            vendor,
            invoice_number,
            date,
            currency,
            total,
            raw_text: text.to_string(),
            line_items,
            created_at: now,
        };

        debug!(
            "Extracted invoice {} from {} with {} line items, total {}",
            record.invoice_number,
            record.vendor,
            record.line_items.len(),
            record.total
        );

        ExtractionResult {
            record,
            warnings,
            processing_time_ms: (Utc::now() - started).num_milliseconds().max(0) as u64,
        }
    }
}

/// Byte ranges of the first invoice number and labeled date values.
/// A line whose amount falls inside one of them is quoting an identifier
/// or a date, not a price.
fn identifier_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::with_capacity(2);

    if let Some(number) = INVOICE_NUMBER.captures(text).and_then(|c| c.get(1)) {
        spans.push((number.start(), number.end()));
    }
    if let Some(caps) = LABELED_DATE.captures(text) {
        if let (Some(first), Some(year)) = (caps.get(1), caps.get(3)) {
            spans.push((first.start(), year.end()));
        }
    }

    spans
}

impl InvoiceExtractor for TextInvoiceParser {
    fn extract_at(&self, text: &str, now: DateTime<Utc>) -> InvoiceRecord {
        self.parse_at(text, now).record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    use crate::models::invoice::Currency;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    const ACME: &str = "From: Acme Corp\nInvoice #: INV-2024-001\nDate: 03/15/2024\nConsulting services $1,200.00\nTotal: $1,200.00";

    #[test]
    fn test_parse_basic_invoice() {
        let parser = TextInvoiceParser::new();
        let result = parser.parse_at(ACME, now());
        let record = result.record;

        assert_eq!(record.vendor, "Acme Corp");
        assert_eq!(record.invoice_number, "INV-2024-001");
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(record.currency, Currency::Usd);
        assert_eq!(record.total, dec("1200.00"));
        assert_eq!(record.raw_text, ACME);
        assert_eq!(record.created_at, now());

        assert_eq!(record.line_items.len(), 1);
        assert_eq!(record.line_items[0].description, "Consulting services");
        assert_eq!(record.line_items[0].amount, dec("1200.00"));
        assert_eq!(record.line_items[0].id, "item-3");
        assert_eq!(record.line_items[0].invoice_id, record.id);

        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_no_labels_uses_fallbacks() {
        let parser = TextInvoiceParser::new();
        let result = parser.parse_at("hello world", now());
        let record = result.record;

        assert_eq!(record.vendor, UNKNOWN_VENDOR);
        assert_eq!(record.invoice_number, format!("INV-{}", now().timestamp_millis()));
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(record.total, Decimal::ZERO);
        assert!(record.line_items.is_empty());
        assert_eq!(result.warnings.len(), 5);
    }

    #[test]
    fn test_total_falls_back_to_line_sum() {
        let text = "Design work          $500.25\nHosting, one year    $240.50";
        let record = TextInvoiceParser::new().extract_at(text, now());

        assert_eq!(record.line_items.len(), 2);
        assert_eq!(record.total, dec("740.75"));
        assert_eq!(record.total, record.line_items_total());
    }

    #[test]
    fn test_line_items_follow_input_order() {
        let text = "Zeta service fee   $30.00\nAlpha service fee  $10.00\nMid service fee    $20.00";
        let record = TextInvoiceParser::new().extract_at(text, now());

        let descriptions: Vec<&str> = record
            .line_items
            .iter()
            .map(|i| i.description.as_str())
            .collect();
        assert_eq!(
            descriptions,
            vec!["Zeta service fee", "Alpha service fee", "Mid service fee"]
        );
        let ids: Vec<&str> = record.line_items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["item-0", "item-1", "item-2"]);
    }

    #[test]
    fn test_invalid_date_falls_back_to_today() {
        let record = TextInvoiceParser::new().extract_at("Date: 31/12/2024", now());
        assert_eq!(record.date, now().date_naive());

        let record = TextInvoiceParser::new()
            .with_date_order(DateOrder::DayFirst)
            .extract_at("Date: 31/12/2024", now());
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn test_currency_policy() {
        let text = "Vendor: Contoso\nWidgets shipped EUR 45.00";

        let record = TextInvoiceParser::new().extract_at(text, now());
        assert_eq!(record.currency, Currency::Usd);

        let record = TextInvoiceParser::new()
            .with_currency_policy(CurrencyPolicy::Detected)
            .extract_at(text, now());
        assert_eq!(record.currency, Currency::Eur);
    }

    #[test]
    fn test_header_label_lines_are_not_items() {
        let text = "Invoice #: 2024-77 for services\nDated: 04/02/2024 paid\nPrinter toner        $89.99";
        let record = TextInvoiceParser::new().extract_at(text, now());

        assert_eq!(record.invoice_number, "2024-77");
        assert_eq!(record.line_items.len(), 1);
        assert_eq!(record.line_items[0].description, "Printer toner");
        assert_eq!(record.total, dec("89.99"));
    }

    #[test]
    fn test_label_words_inside_items_keep_the_item() {
        let record = TextInvoiceParser::new().extract_at(
            "Software licence from Contoso  $1,500.00\nSupport plan           $300.00",
            now(),
        );
        assert_eq!(record.line_items.len(), 2);
        assert_eq!(record.line_items[0].amount, dec("1500.00"));
        assert_eq!(record.total, dec("1800.00"));

        let record = TextInvoiceParser::new().extract_at(
            "Inventory audit, 3 days   $900.00\nDelivery fee          $25.00",
            now(),
        );
        assert_eq!(record.line_items.len(), 2);
        assert_eq!(record.line_items[0].description, "Inventory audit, 3 days");
        assert_eq!(record.total, dec("925.00"));
    }

    #[test]
    fn test_items_next_to_real_headers() {
        let text = "Vendor: Contoso\nInvoice #: INV-9\nShipping from warehouse   $12.00\nWidget #4 cleaning kit    $45.00\nCompany-branded mugs      $80.00\nUpdated pricing sheet     $20.00\nTotal: $157.00";
        let record = TextInvoiceParser::new().extract_at(text, now());

        assert_eq!(record.invoice_number, "INV-9");
        let descriptions: Vec<&str> = record
            .line_items
            .iter()
            .map(|i| i.description.as_str())
            .collect();
        assert_eq!(
            descriptions,
            vec![
                "Shipping from warehouse",
                "Widget #4 cleaning kit",
                "Company-branded mugs",
                "Updated pricing sheet"
            ]
        );
        assert_eq!(record.total, dec("157.00"));
    }

    #[test]
    fn test_ids_are_unique() {
        let parser = TextInvoiceParser::new();
        let a = parser.extract_at(ACME, now());
        let b = parser.extract_at(ACME, now());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_amounts_never_negative() {
        let text = "Refund adjustment -$50.00 applied\nTotal: -20";
        let record = TextInvoiceParser::new().extract_at(text, now());

        assert!(record.total >= Decimal::ZERO);
        assert!(record.line_items.iter().all(|i| i.amount >= Decimal::ZERO));
    }

    #[test]
    fn test_min_line_length_from_config() {
        let config = ExtractionConfig {
            min_line_length: 3,
            ..ExtractionConfig::default()
        };
        let record = TextInvoiceParser::from_config(config).extract_at("Tea $12.50", now());
        assert_eq!(record.line_items.len(), 1);
    }
}
