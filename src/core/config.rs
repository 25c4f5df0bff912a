//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.flightdeck/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FlightdeckConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub backend: BackendConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub greeting: Option<String>,
    pub typing_period_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    pub base_url: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8001";
pub const DEFAULT_TYPING_PERIOD_MS: u64 = 350;
pub const DEFAULT_GREETING: &str = "Hello! I'm your flight assistant. How can I help?";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub greeting: String,
    pub typing_period_ms: u64,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.flightdeck/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".flightdeck").join("config.toml"))
}

/// Load config from `~/.flightdeck/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `FlightdeckConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<FlightdeckConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(FlightdeckConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(FlightdeckConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: FlightdeckConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# Flightdeck Configuration
# All settings are optional — defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [backend]
# base_url = "http://127.0.0.1:8001"  # Or set FLIGHTDECK_BASE_URL env var

# [general]
# greeting = "Hello! I'm your flight assistant. How can I help?"
# typing_period_ms = 350              # Dot animation frame period
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env
/// vars → CLI. `cli_base_url` comes from the `--base-url` flag.
pub fn resolve(config: &FlightdeckConfig, cli_base_url: Option<&str>) -> ResolvedConfig {
    let base_url = cli_base_url
        .map(|s| s.to_string())
        .or_else(|| std::env::var("FLIGHTDECK_BASE_URL").ok())
        .or_else(|| config.backend.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    ResolvedConfig {
        // Trailing slashes would double up when joining paths
        base_url: base_url.trim_end_matches('/').to_string(),
        greeting: config
            .general
            .greeting
            .clone()
            .unwrap_or_else(|| DEFAULT_GREETING.to_string()),
        typing_period_ms: config
            .general
            .typing_period_ms
            .unwrap_or(DEFAULT_TYPING_PERIOD_MS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = FlightdeckConfig::default();
        let resolved = resolve(&config, None);
        assert_eq!(resolved.base_url, DEFAULT_BASE_URL);
        assert_eq!(resolved.typing_period_ms, DEFAULT_TYPING_PERIOD_MS);
        assert_eq!(resolved.greeting, DEFAULT_GREETING);
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = FlightdeckConfig {
            general: GeneralConfig {
                greeting: Some("Namaste!".to_string()),
                typing_period_ms: Some(200),
            },
            backend: BackendConfig {
                base_url: Some("http://10.0.0.5:9000/".to_string()),
            },
        };
        let resolved = resolve(&config, None);
        assert_eq!(resolved.base_url, "http://10.0.0.5:9000");
        assert_eq!(resolved.greeting, "Namaste!");
        assert_eq!(resolved.typing_period_ms, 200);
    }

    #[test]
    fn test_resolve_cli_base_url_wins() {
        let config = FlightdeckConfig {
            backend: BackendConfig {
                base_url: Some("http://from-config:8001".to_string()),
            },
            ..Default::default()
        };
        let resolved = resolve(&config, Some("http://from-cli:8001"));
        assert_eq!(resolved.base_url, "http://from-cli:8001");
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing — everything else stays default
        let toml_str = r#"
[backend]
base_url = "http://192.168.1.20:8001"
"#;
        let config: FlightdeckConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.backend.base_url.as_deref(),
            Some("http://192.168.1.20:8001")
        );
        assert!(config.general.greeting.is_none());
        assert!(config.general.typing_period_ms.is_none());
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[general]
greeting = "Welcome aboard."
typing_period_ms = 500

[backend]
base_url = "http://127.0.0.1:8001"
"#;
        let config: FlightdeckConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.greeting.as_deref(), Some("Welcome aboard."));
        assert_eq!(config.general.typing_period_ms, Some(500));
    }
}
