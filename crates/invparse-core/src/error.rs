//! Error types for the invparse-core library.
//!
//! Field extraction itself is total and never returns an error; these types
//! cover everything around it (ingestion, sessions, exports, configuration).

use thiserror::Error;

/// Main error type for the invparse library.
#[derive(Error, Debug)]
pub enum InvparseError {
    /// Ingestion error.
    #[error("ingestion error: {0}")]
    Ingestion(#[from] IngestionError),

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Session/app state error.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writer error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while turning a source into text for the extractor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IngestionError {
    /// The file is neither `text/plain` nor named `*.txt`.
    #[error("unsupported file: {name}")]
    UnsupportedFile { name: String },

    /// The file bytes are not valid UTF-8.
    #[error("file {name} is not valid UTF-8 text")]
    InvalidEncoding { name: String },

    /// The text is empty or whitespace only.
    #[error("no invoice text provided")]
    EmptyInput,
}

/// Errors from the authentication port.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Malformed email or empty password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Signup without a display name.
    #[error("name must not be empty")]
    MissingName,
}

/// Errors related to application state transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Operation requires a signed-in user.
    #[error("not signed in")]
    NotSignedIn,

    /// Monthly quota of the user's plan is used up.
    #[error("monthly limit of {limit} invoices reached for {month}")]
    QuotaExceeded { limit: u32, month: String },
}

/// Result type for the invparse library.
pub type Result<T> = std::result::Result<T, InvparseError>;
