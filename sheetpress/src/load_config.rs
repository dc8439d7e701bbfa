/// `load_config` module: Loads a static YAML config file into the typed configuration used by the CLI.
///
/// This module is the only place where the YAML file is parsed and mapped to strongly-typed structs.
///
/// # Responsibilities
/// - Parse the user-supplied YAML configuration into type-safe Rust structs
/// - Fill in defaults for the blog layout and polling cadence when they are omitted
/// - Keep secrets out of the file: the Sheets API key is named here (by env var) and read later
/// - Fail with clear diagnostics for the CLI and tests.
///
/// # Errors
/// All errors in this module use `anyhow::Error` for context-rich diagnostics, and are surfaced at the CLI boundary.
use anyhow::Result;
use serde::Deserialize;
use sheetpress_core::config::Config;
use std::fs;
use std::path::Path;
use tracing::{error, info};

use crate::sheets::{DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL};

#[derive(Debug, Deserialize)]
pub struct CliConfig {
    pub sheet: SheetSection,
    #[serde(flatten)]
    pub core: Config,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SheetSection {
    pub spreadsheet_id: String,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Loads a static YAML config file (no secrets).
/// Returns the config for use by the CLI.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let config: CliConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    if config.sheet.spreadsheet_id.trim().is_empty() {
        error!(config_path = ?path_ref, "sheet.spreadsheet_id is empty");
        return Err(anyhow::anyhow!(
            "Invalid config {:?}: sheet.spreadsheet_id must not be empty",
            path_ref
        ));
    }

    config.core.trace_loaded();
    Ok(config)
}
