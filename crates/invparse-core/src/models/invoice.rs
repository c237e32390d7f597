//! Invoice record models produced by the text extractor.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Vendor name used when no vendor label is found.
pub const UNKNOWN_VENDOR: &str = "Unknown Vendor";

/// A structured invoice extracted from free-form text.
///
/// Records are immutable once extracted; hosts only ever append them to a
/// collection. JSON keys follow the dashboard's export format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    /// Opaque unique identifier.
    pub id: String,

    /// Vendor (issuer) name.
    pub vendor: String,

    /// Invoice number/identifier.
    #[serde(rename = "invoiceNo")]
    pub invoice_number: String,

    /// Invoice date (YYYY-MM-DD).
    pub date: NaiveDate,

    /// Currency of all amounts.
    pub currency: Currency,

    /// Invoice total.
    pub total: Decimal,

    /// Original input text, verbatim.
    pub raw_text: String,

    /// Line items in source order.
    pub line_items: Vec<LineItem>,

    /// Extraction timestamp.
    pub created_at: DateTime<Utc>,
}

/// A single description/amount pair taken from one line of the source text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Identifier derived from the source line index (`item-<n>`).
    pub id: String,

    /// Id of the owning record.
    pub invoice_id: String,

    /// Line text with the amount removed.
    pub description: String,

    /// Line amount.
    pub amount: Decimal,
}

impl LineItem {
    /// Build the identifier for the item found on line `index` (0-based).
    pub fn id_for_line(index: usize) -> String {
        format!("item-{}", index)
    }
}

/// Supported invoice currencies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US dollar.
    #[default]
    Usd,
    /// Euro.
    Eur,
    /// Pound sterling.
    Gbp,
}

impl Currency {
    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
        }
    }

    /// Map a detected currency marker (`$`, `USD`, `EUR`, `GBP`) to a currency.
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker.trim().to_uppercase().as_str() {
            "$" | "USD" => Some(Currency::Usd),
            "EUR" => Some(Currency::Eur),
            "GBP" => Some(Currency::Gbp),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl InvoiceRecord {
    /// Sum of all line-item amounts.
    pub fn line_items_total(&self) -> Decimal {
        sum_amounts(&self.line_items)
    }

    /// Whether the vendor label was resolved.
    pub fn has_known_vendor(&self) -> bool {
        self.vendor != UNKNOWN_VENDOR
    }
}

/// Sum the amounts of a slice of line items.
pub fn sum_amounts(items: &[LineItem]) -> Decimal {
    items.iter().map(|i| i.amount).sum()
}
