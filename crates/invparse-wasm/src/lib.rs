//! WASM bindings for invoice text parsing.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.
//! Records cross the boundary as plain objects with camelCase keys; amounts
//! are decimal strings.

use chrono::NaiveDate;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use invparse_core::export::{self, ExportFormat};
use invparse_core::invoice::rules::{format_amount as format_decimal, parse_amount};
use invparse_core::models::invoice::InvoiceRecord;
use invparse_core::{
    CurrencyPolicy, DateOrder, InvoiceLedger, SortDirection, SortField, TextInvoiceParser,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn records_from_js(records: JsValue) -> Result<Vec<InvoiceRecord>, JsValue> {
    serde_wasm_bindgen::from_value(records).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Today in the host's local time zone.
fn local_today() -> Option<NaiveDate> {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(
        now.get_full_year() as i32,
        now.get_month() + 1,
        now.get_date(),
    )
}

fn parse_day(day: Option<String>) -> Result<NaiveDate, JsValue> {
    match day {
        Some(day) => day
            .parse()
            .map_err(|_| JsValue::from_str(&format!("invalid date: {}", day))),
        None => local_today().ok_or_else(|| JsValue::from_str("invalid local date")),
    }
}

/// Extract invoice data from text with default settings.
///
/// Never fails on odd text: missing fields fall back to defaults.
#[wasm_bindgen]
pub fn extract_invoice_from_text(text: &str) -> Result<JsValue, JsValue> {
    let result = TextInvoiceParser::new().parse(text);
    to_js(&result.record)
}

/// Render an array of records as CSV.
#[wasm_bindgen]
pub fn export_csv(records: JsValue) -> Result<String, JsValue> {
    let records = records_from_js(records)?;
    export::to_csv(&records).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Render an array of records as pretty-printed JSON.
#[wasm_bindgen]
pub fn export_json(records: JsValue) -> Result<String, JsValue> {
    let records = records_from_js(records)?;
    export::to_json(&records).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Export ready for download: `{ fileName, mimeType, content }`.
///
/// `format` is `"csv"` or `"json"`.
#[wasm_bindgen]
pub fn export_file(records: JsValue, format: &str) -> Result<JsValue, JsValue> {
    let format: ExportFormat = serde_wasm_bindgen::from_value(JsValue::from_str(format))
        .map_err(|_| JsValue::from_str(&format!("unknown export format: {}", format)))?;
    let records = records_from_js(records)?;
    let content =
        export::export(&records, format).map_err(|e| JsValue::from_str(&e.to_string()))?;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct ExportFile {
        file_name: &'static str,
        mime_type: &'static str,
        content: String,
    }

    to_js(&ExportFile {
        file_name: format.file_name(),
        mime_type: format.mime_type(),
        content,
    })
}

/// Dashboard statistics for an array of records.
///
/// `today` is a `YYYY-MM-DD` string; the local date is used when omitted.
#[wasm_bindgen]
pub fn ledger_stats(records: JsValue, today: Option<String>) -> Result<JsValue, JsValue> {
    let ledger: InvoiceLedger = records_from_js(records)?.into_iter().collect();
    to_js(&ledger.stats(parse_day(today)?))
}

/// Format a decimal amount string with thousands separators ("1,234.56").
#[wasm_bindgen]
pub fn format_amount(amount: &str) -> Option<String> {
    parse_amount(amount).map(format_decimal)
}

/// Invoice extractor class for browser use.
#[wasm_bindgen]
pub struct InvoiceExtractor {
    parser: TextInvoiceParser,
}

#[wasm_bindgen]
impl InvoiceExtractor {
    /// Create a new invoice extractor.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            parser: TextInvoiceParser::new(),
        }
    }

    /// Read labeled dates as day/month/year instead of month/day/year.
    #[wasm_bindgen]
    pub fn set_day_first(&mut self, day_first: bool) {
        let order = if day_first {
            DateOrder::DayFirst
        } else {
            DateOrder::MonthFirst
        };
        self.parser = self.parser.clone().with_date_order(order);
    }

    /// Map `EUR`/`GBP` markers to their currency instead of always USD.
    #[wasm_bindgen]
    pub fn set_detect_currency(&mut self, detect: bool) {
        let policy = if detect {
            CurrencyPolicy::Detected
        } else {
            CurrencyPolicy::AlwaysUsd
        };
        self.parser = self.parser.clone().with_currency_policy(policy);
    }

    #[wasm_bindgen]
    pub fn set_min_line_length(&mut self, length: usize) {
        self.parser = self.parser.clone().with_min_line_length(length);
    }

    /// Extract invoice from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        let result = self.parser.parse(text);
        for warning in &result.warnings {
            web_sys::console::debug_1(&JsValue::from_str(warning));
        }
        to_js(&result.record)
    }

    /// Get extraction result with metadata.
    #[wasm_bindgen]
    pub fn extract_with_metadata(&self, text: &str) -> Result<JsValue, JsValue> {
        let result = self.parser.parse(text);

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct ExtractResult {
            record: InvoiceRecord,
            warnings: Vec<String>,
            processing_time_ms: u64,
        }

        to_js(&ExtractResult {
            record: result.record,
            warnings: result.warnings,
            processing_time_ms: result.processing_time_ms,
        })
    }
}

impl Default for InvoiceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// In-memory invoice ledger for the dashboard.
#[wasm_bindgen(js_name = InvoiceLedger)]
#[derive(Default)]
pub struct InvoiceLedgerJs {
    ledger: InvoiceLedger,
}

#[wasm_bindgen(js_class = InvoiceLedger)]
impl InvoiceLedgerJs {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record produced by `extract`.
    #[wasm_bindgen]
    pub fn push(&mut self, record: JsValue) -> Result<(), JsValue> {
        let record: InvoiceRecord =
            serde_wasm_bindgen::from_value(record).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.ledger.push(record);
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.ledger.len()
    }

    /// All records in insertion order.
    #[wasm_bindgen]
    pub fn records(&self) -> Result<JsValue, JsValue> {
        to_js(&self.ledger.records())
    }

    /// Records whose vendor or invoice number contains `term`, any case.
    #[wasm_bindgen]
    pub fn search(&self, term: &str) -> Result<JsValue, JsValue> {
        to_js(&self.ledger.search(term))
    }

    /// Records sorted by `vendor`, `invoice_number`, `date` or `total`.
    #[wasm_bindgen]
    pub fn sorted(&self, field: &str, descending: bool) -> Result<JsValue, JsValue> {
        let field: SortField = serde_wasm_bindgen::from_value(JsValue::from_str(field))
            .map_err(|_| JsValue::from_str(&format!("unknown sort field: {}", field)))?;
        let direction = if descending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        to_js(&self.ledger.sorted(field, direction))
    }

    /// Dashboard statistics; `today` defaults to the local date.
    #[wasm_bindgen]
    pub fn stats(&self, today: Option<String>) -> Result<JsValue, JsValue> {
        to_js(&self.ledger.stats(parse_day(today)?))
    }

    #[wasm_bindgen]
    pub fn to_csv(&self) -> Result<String, JsValue> {
        export::to_csv(self.ledger.records()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen]
    pub fn to_json(&self) -> Result<String, JsValue> {
        export::to_json(self.ledger.records()).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
