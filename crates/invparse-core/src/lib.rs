//! Core library for invoice text parsing.
//!
//! This crate provides:
//! - Rule-based field extraction (vendor, invoice number, date, currency,
//!   total, line items) from free-form invoice text
//! - An append-only invoice ledger with search, sorting and dashboard stats
//! - CSV and JSON exports
//! - Simulated auth/ingestion ports and application state (feature `native`)

pub mod error;
pub mod export;
pub mod invoice;
pub mod ledger;
pub mod models;
#[cfg(feature = "native")]
pub mod service;

pub use error::{AuthError, IngestionError, InvparseError, Result, SessionError};
pub use export::{ExportFormat, to_csv, to_json};
pub use invoice::rules::{CurrencyPolicy, DateOrder};
pub use invoice::{ExtractionResult, InvoiceExtractor, TextInvoiceParser};
pub use ledger::{InvoiceLedger, LedgerStats, SortDirection, SortField};
pub use models::config::InvparseConfig;
pub use models::invoice::{Currency, InvoiceRecord, LineItem};
pub use models::session::{Plan, Session, Theme, UsageLimit, User};
#[cfg(feature = "native")]
pub use service::{AppState, AuthPort, IngestionPort, InvoiceSource, LocalIngestion, MockAuth};
