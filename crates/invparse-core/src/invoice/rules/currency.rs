//! Currency marker detection and the policy that turns it into a currency.

use serde::{Deserialize, Serialize};

use super::patterns::CURRENCY_MARKER;
use super::{ExtractionMatch, FieldExtractor};
use crate::models::invoice::Currency;

/// Marker assumed when the text contains none.
pub const DEFAULT_CURRENCY_MARKER: &str = "$";

/// How a detected currency marker becomes the record's currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrencyPolicy {
    /// Every record is USD regardless of the marker found.
    #[default]
    AlwaysUsd,
    /// `$`/`USD` map to USD, `EUR` to EUR, `GBP` to GBP.
    Detected,
}

impl CurrencyPolicy {
    /// Resolve the record currency from the detected marker.
    pub fn resolve(&self, marker: &str) -> Currency {
        match self {
            CurrencyPolicy::AlwaysUsd => Currency::Usd,
            CurrencyPolicy::Detected => Currency::from_marker(marker).unwrap_or_default(),
        }
    }
}

/// Finds currency markers (`$`, `USD`, `EUR`, `GBP`) anywhere in the text.
#[derive(Debug, Default, Clone, Copy)]
pub struct CurrencyExtractor;

impl CurrencyExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for CurrencyExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let m = CURRENCY_MARKER.find(text)?;
        Some(ExtractionMatch::new(m.as_str().to_string(), m.as_str()).with_position(m.start(), m.end()))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        CURRENCY_MARKER
            .find_iter(text)
            .map(|m| {
                ExtractionMatch::new(m.as_str().to_string(), m.as_str())
                    .with_position(m.start(), m.end())
            })
            .collect()
    }
}

/// The first currency marker in the text, or `$` when there is none.
pub fn detect_currency(text: &str) -> String {
    CurrencyExtractor::new()
        .extract(text)
        .map(|m| m.value)
        .unwrap_or_else(|| DEFAULT_CURRENCY_MARKER.to_string())
}
