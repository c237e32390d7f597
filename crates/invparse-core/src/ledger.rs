//! Append-only in-memory collection of extracted invoices.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::invoice::InvoiceRecord;
use crate::models::session::month_key;

/// Maximum number of vendors reported in [`LedgerStats::top_vendors`].
pub const TOP_VENDOR_LIMIT: usize = 8;

/// Field used to order ledger records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Vendor,
    InvoiceNumber,
    #[default]
    Date,
    Total,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

/// Spend attributed to one vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorTotal {
    pub vendor: String,
    pub total: Decimal,
}

/// Spend in one calendar month (`YYYY-MM`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    pub month: String,
    pub total: Decimal,
}

/// Aggregates shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerStats {
    pub invoice_count: usize,
    pub total_amount: Decimal,
    /// Invoices dated in the same month and year as the reference day.
    pub this_month_count: usize,
    /// Per-vendor totals, largest first, capped at [`TOP_VENDOR_LIMIT`].
    pub top_vendors: Vec<VendorTotal>,
    /// Per-month totals in chronological order.
    pub monthly_totals: Vec<MonthlyTotal>,
}

/// Append-only list of invoice records.
///
/// Records can be added but never modified or removed individually; the only
/// way to drop them is to discard the whole ledger.
#[derive(Debug, Clone, Default)]
pub struct InvoiceLedger {
    records: Vec<InvoiceRecord>,
}

impl InvoiceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    pub fn push(&mut self, record: InvoiceRecord) {
        self.records.push(record);
    }

    /// All records in insertion order.
    pub fn records(&self) -> &[InvoiceRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &InvoiceRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records whose vendor or invoice number contains `term` (any case).
    pub fn search(&self, term: &str) -> Vec<&InvoiceRecord> {
        let needle = term.to_lowercase();
        self.records
            .iter()
            .filter(|r| {
                r.vendor.to_lowercase().contains(&needle)
                    || r.invoice_number.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Records ordered by `field`. Ties keep insertion order.
    pub fn sorted(&self, field: SortField, direction: SortDirection) -> Vec<&InvoiceRecord> {
        let mut sorted: Vec<&InvoiceRecord> = self.records.iter().collect();
        sorted.sort_by(|a, b| {
            let ordering = compare(a, b, field);
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
        sorted
    }

    /// Dashboard aggregates relative to `today`.
    pub fn stats(&self, today: NaiveDate) -> LedgerStats {
        let total_amount: Decimal = self.records.iter().map(|r| r.total).sum();

        let this_month_count = self
            .records
            .iter()
            .filter(|r| r.date.year() == today.year() && r.date.month() == today.month())
            .count();

        let mut by_vendor: BTreeMap<&str, Decimal> = BTreeMap::new();
        let mut by_month: BTreeMap<String, Decimal> = BTreeMap::new();
        for record in &self.records {
            *by_vendor.entry(record.vendor.as_str()).or_default() += record.total;
            *by_month.entry(month_key(record.date)).or_default() += record.total;
        }

        let mut top_vendors: Vec<VendorTotal> = by_vendor
            .into_iter()
            .map(|(vendor, total)| VendorTotal {
                vendor: vendor.to_string(),
                total,
            })
            .collect();
        top_vendors.sort_by(|a, b| b.total.cmp(&a.total));
        top_vendors.truncate(TOP_VENDOR_LIMIT);

        let monthly_totals = by_month
            .into_iter()
            .map(|(month, total)| MonthlyTotal { month, total })
            .collect();

        LedgerStats {
            invoice_count: self.records.len(),
            total_amount,
            this_month_count,
            top_vendors,
            monthly_totals,
        }
    }
}

impl Extend<InvoiceRecord> for InvoiceLedger {
    fn extend<T: IntoIterator<Item = InvoiceRecord>>(&mut self, iter: T) {
        self.records.extend(iter);
    }
}

impl FromIterator<InvoiceRecord> for InvoiceLedger {
    fn from_iter<T: IntoIterator<Item = InvoiceRecord>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

fn compare(a: &InvoiceRecord, b: &InvoiceRecord, field: SortField) -> Ordering {
    match field {
        SortField::Vendor => a.vendor.cmp(&b.vendor),
        SortField::InvoiceNumber => a.invoice_number.cmp(&b.invoice_number),
        SortField::Date => a.date.cmp(&b.date),
        SortField::Total => a.total.cmp(&b.total),
    }
}
