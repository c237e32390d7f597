//! Host-side services: simulated authentication, invoice ingestion and the
//! application state that ties them to the ledger.

pub mod auth;
pub mod ingest;
pub mod state;

pub use auth::{AuthPort, MockAuth, DEMO_USER_ID, DEMO_USER_NAME};
pub use ingest::{IngestionPort, InvoiceSource, LocalIngestion};
pub use state::AppState;
