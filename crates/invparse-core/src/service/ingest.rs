//! Turning uploaded files or pasted text into invoice records.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::{IngestionError, Result};
use crate::invoice::TextInvoiceParser;
use crate::models::config::{ExtractionConfig, IngestionConfig};
use crate::models::invoice::InvoiceRecord;

/// Something the user handed over for parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvoiceSource {
    /// Pasted text.
    Text(String),
    /// An uploaded file.
    File {
        name: String,
        mime: Option<String>,
        bytes: Vec<u8>,
    },
}

impl InvoiceSource {
    /// Build a file source, guessing nothing about its type.
    pub fn file(name: impl Into<String>, mime: Option<&str>, bytes: Vec<u8>) -> Self {
        InvoiceSource::File {
            name: name.into(),
            mime: mime.map(str::to_string),
            bytes,
        }
    }

    /// Validate the source and return its text.
    pub fn into_text(self, config: &IngestionConfig) -> std::result::Result<String, IngestionError> {
        let text = match self {
            InvoiceSource::Text(text) => text,
            InvoiceSource::File { name, mime, bytes } => {
                if !is_accepted_file(&name, mime.as_deref(), config) {
                    return Err(IngestionError::UnsupportedFile { name });
                }
                String::from_utf8(bytes).map_err(|_| IngestionError::InvalidEncoding { name })?
            }
        };

        if text.trim().is_empty() {
            return Err(IngestionError::EmptyInput);
        }
        Ok(text)
    }
}

/// A file is accepted by MIME type or, failing that, by extension.
fn is_accepted_file(name: &str, mime: Option<&str>, config: &IngestionConfig) -> bool {
    if let Some(mime) = mime {
        if config
            .accepted_mime_types
            .iter()
            .any(|m| m.eq_ignore_ascii_case(mime))
        {
            return true;
        }
    }

    name.rsplit_once('.')
        .map(|(_, ext)| {
            config
                .accepted_extensions
                .iter()
                .any(|e| e.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Parsing backend.
#[async_trait]
pub trait IngestionPort: Send + Sync {
    /// Turn a source into a record created at `now`.
    async fn ingest(&self, source: InvoiceSource, now: DateTime<Utc>) -> Result<InvoiceRecord>;
}

/// Runs the text parser in-process after a simulated processing delay.
#[derive(Debug, Clone, Default)]
pub struct LocalIngestion {
    parser: TextInvoiceParser,
    config: IngestionConfig,
}

impl LocalIngestion {
    pub fn new(extraction: ExtractionConfig, ingestion: IngestionConfig) -> Self {
        Self {
            parser: TextInvoiceParser::from_config(extraction),
            config: ingestion,
        }
    }

    /// Default parser without the simulated delay.
    pub fn immediate() -> Self {
        Self::new(ExtractionConfig::default(), IngestionConfig::immediate())
    }

    pub fn parser(&self) -> &TextInvoiceParser {
        &self.parser
    }
}

#[async_trait]
impl IngestionPort for LocalIngestion {
    async fn ingest(&self, source: InvoiceSource, now: DateTime<Utc>) -> Result<InvoiceRecord> {
        let text = source.into_text(&self.config).inspect_err(|e| {
            warn!("Rejected invoice source: {}", e);
        })?;

        if self.config.simulated_delay_ms > 0 {
            debug!("Simulating {} ms of processing", self.config.simulated_delay_ms);
            tokio::time::sleep(Duration::from_millis(self.config.simulated_delay_ms)).await;
        }

        let result = self.parser.parse_at(&text, now);
        for warning in &result.warnings {
            debug!("{}", warning);
        }
        info!(
            "Ingested invoice {} in {} ms",
            result.record.invoice_number, result.processing_time_ms
        );

        Ok(result.record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvparseError;
    use pretty_assertions::assert_eq;

    const TEXT: &str = "From: Acme Corp\nInvoice #: INV-2024-001\nDate: 03/15/2024\nConsulting services $1,200.00\nTotal: $1,200.00";

    #[tokio::test]
    async fn test_ingest_text() {
        let record = LocalIngestion::immediate()
            .ingest(InvoiceSource::Text(TEXT.to_string()), Utc::now())
            .await
            .unwrap();
        assert_eq!(record.vendor, "Acme Corp");
        assert_eq!(record.line_items.len(), 1);
    }

    #[tokio::test]
    async fn test_ingest_txt_file_without_mime() {
        let source = InvoiceSource::file("march.TXT", None, TEXT.as_bytes().to_vec());
        let record = LocalIngestion::immediate()
            .ingest(source, Utc::now())
            .await
            .unwrap();
        assert_eq!(record.invoice_number, "INV-2024-001");
    }

    #[tokio::test]
    async fn test_ingest_plain_text_mime() {
        let source = InvoiceSource::file("upload", Some("text/plain"), TEXT.as_bytes().to_vec());
        assert!(LocalIngestion::immediate().ingest(source, Utc::now()).await.is_ok());
    }

    #[tokio::test]
    async fn test_rejects_non_text_files() {
        let source = InvoiceSource::file("scan.pdf", Some("application/pdf"), vec![0x25, 0x50]);
        let err = LocalIngestion::immediate()
            .ingest(source, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            InvparseError::Ingestion(IngestionError::UnsupportedFile { ref name }) if name == "scan.pdf"
        ));
    }

    #[tokio::test]
    async fn test_rejects_invalid_utf8() {
        let source = InvoiceSource::file("bad.txt", None, vec![0xff, 0xfe, 0x00]);
        let err = LocalIngestion::immediate()
            .ingest(source, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            InvparseError::Ingestion(IngestionError::InvalidEncoding { .. })
        ));
    }

    #[tokio::test]
    async fn test_rejects_blank_input() {
        let err = LocalIngestion::immediate()
            .ingest(InvoiceSource::Text("  \n\t".to_string()), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, InvparseError::Ingestion(IngestionError::EmptyInput)));
    }
}
