//! Application configuration for CrowdMint.
//!
//! User config lives at `~/.crowdmint/crowdmint.toml`. Host applications
//! override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CrowdMintError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "crowdmint.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".crowdmint";

// ---------------------------------------------------------------------------
// Config structs (matching crowdmint.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Registry endpoint settings.
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Aggregation settings.
    #[serde(default)]
    pub aggregate: AggregateConfig,
}

/// `[registry]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// JSON-RPC endpoint URL. Unset means live data is unavailable.
    #[serde(default)]
    pub rpc_url: Option<String>,

    /// Address of the deployed campaign registry contract.
    #[serde(default)]
    pub contract_address: Option<String>,

    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl RegistryConfig {
    /// Whether live registry access is possible: both an RPC endpoint and a
    /// contract address must be present and non-empty. When this is false
    /// the aggregator serves the fallback dataset.
    pub fn is_configured(&self) -> bool {
        let has = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        has(&self.rpc_url) && has(&self.contract_address)
    }
}

fn default_timeout_secs() -> u64 {
    10
}

/// `[aggregate]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateConfig {
    /// Maximum concurrent registry fetches per aggregation cycle.
    #[serde(default = "default_concurrency")]
    pub concurrency: u32,

    /// Per-fetch deadline in seconds; 0 disables the deadline.
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            call_timeout_secs: default_call_timeout_secs(),
        }
    }
}

fn default_concurrency() -> u32 {
    8
}
fn default_call_timeout_secs() -> u64 {
    10
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.crowdmint/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CrowdMintError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.crowdmint/crowdmint.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CrowdMintError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| CrowdMintError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| CrowdMintError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| CrowdMintError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| CrowdMintError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("timeout_secs"));
        assert!(toml_str.contains("concurrency"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.aggregate.concurrency, 8);
        assert_eq!(parsed.registry.timeout_secs, 10);
        assert!(parsed.registry.rpc_url.is_none());
    }

    #[test]
    fn registry_section_parses() {
        let toml_str = r#"
[registry]
rpc_url = "https://rpc.example.com"
contract_address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"

[aggregate]
concurrency = 2
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert!(config.registry.is_configured());
        assert_eq!(config.aggregate.concurrency, 2);
        // Unspecified fields fall back to defaults
        assert_eq!(config.aggregate.call_timeout_secs, 10);
    }

    #[test]
    fn unconfigured_registry_detected() {
        let mut config = AppConfig::default();
        assert!(!config.registry.is_configured());

        config.registry.rpc_url = Some("https://rpc.example.com".into());
        assert!(!config.registry.is_configured());

        // Empty strings count as missing, matching an unset env var upstream
        config.registry.contract_address = Some("".into());
        assert!(!config.registry.is_configured());

        config.registry.contract_address = Some("0x5FbDB2315678afecb367f032d93F642f64180aa3".into());
        assert!(config.registry.is_configured());
    }
}
