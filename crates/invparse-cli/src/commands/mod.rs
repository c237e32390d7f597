//! Subcommands of the `invparse` binary.

pub mod batch;
pub mod config;
pub mod export;
pub mod process;

use std::path::{Path, PathBuf};

use invparse_core::models::config::{IngestionConfig, InvparseConfig};
use invparse_core::LocalIngestion;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("invparse")
        .join("config.json")
}

/// Resolve the configuration file: the explicit path, otherwise the default one.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load configuration. An explicit path must exist; a missing default file
/// means defaults.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<InvparseConfig> {
    if let Some(path) = explicit {
        return Ok(InvparseConfig::from_file(Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        Ok(InvparseConfig::from_file(&path)?)
    } else {
        Ok(InvparseConfig::default())
    }
}

/// Ingestion for terminal use: file acceptance rules from the config, no
/// simulated latency.
pub fn ingestion(config: &InvparseConfig) -> LocalIngestion {
    LocalIngestion::new(
        config.extraction.clone(),
        IngestionConfig {
            simulated_delay_ms: 0,
            auth_delay_ms: 0,
            ..config.ingestion.clone()
        },
    )
}
