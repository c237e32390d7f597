//! Configuration structures for extraction and the host surfaces.

use serde::{Deserialize, Serialize};

use crate::invoice::rules::{CurrencyPolicy, DateOrder};

/// Main configuration for invparse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvparseConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Ingestion and simulated backend configuration.
    pub ingestion: IngestionConfig,

    /// Plan limits.
    pub plans: PlanConfig,
}

/// Invoice extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// How the two numeric components of a labeled date are read.
    pub date_order: DateOrder,

    /// How the detected currency marker becomes the record currency.
    pub currency_policy: CurrencyPolicy,

    /// Lines must be longer than this (in characters) to become line items.
    pub min_line_length: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            date_order: DateOrder::MonthFirst,
            currency_policy: CurrencyPolicy::AlwaysUsd,
            min_line_length: 10,
        }
    }
}

/// Ingestion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// Artificial latency before a submitted invoice is processed.
    pub simulated_delay_ms: u64,

    /// Artificial latency of login/signup.
    pub auth_delay_ms: u64,

    /// File extensions accepted as invoice text (lowercase, no dot).
    pub accepted_extensions: Vec<String>,

    /// MIME types accepted as invoice text.
    pub accepted_mime_types: Vec<String>,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            simulated_delay_ms: 2000,
            auth_delay_ms: 1000,
            accepted_extensions: vec!["txt".to_string()],
            accepted_mime_types: vec!["text/plain".to_string()],
        }
    }
}

impl IngestionConfig {
    /// Configuration with all artificial delays disabled.
    pub fn immediate() -> Self {
        Self {
            simulated_delay_ms: 0,
            auth_delay_ms: 0,
            ..Self::default()
        }
    }
}

/// Plan limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// Invoices a Free user may parse per calendar month.
    pub free_monthly_limit: u32,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            free_monthly_limit: 10,
        }
    }
}

impl InvparseConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string. Missing sections use defaults.
    pub fn from_json(content: &str) -> Result<Self, std::io::Error> {
        serde_json::from_str(content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config =
            InvparseConfig::from_json(r#"{"extraction": {"date_order": "day_first"}}"#).unwrap();

        assert_eq!(config.extraction.date_order, DateOrder::DayFirst);
        assert_eq!(config.extraction.currency_policy, CurrencyPolicy::AlwaysUsd);
        assert_eq!(config.extraction.min_line_length, 10);
        assert_eq!(config.ingestion.simulated_delay_ms, 2000);
        assert_eq!(config.plans.free_monthly_limit, 10);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let err = InvparseConfig::from_json("{not json").unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_immediate_ingestion() {
        let config = IngestionConfig::immediate();
        assert_eq!(config.simulated_delay_ms, 0);
        assert_eq!(config.auth_delay_ms, 0);
        assert_eq!(config.accepted_extensions, vec!["txt".to_string()]);
    }
}
