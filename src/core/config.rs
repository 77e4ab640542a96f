//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.jotter/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use simplelog::LevelFilter;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct JotterConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub log_level: LevelFilter,
}

/// Values given on the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
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

/// Returns the path to `~/.jotter/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".jotter").join("config.toml"))
}

/// Load config from `~/.jotter/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `JotterConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<JotterConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(JotterConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(JotterConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: JotterConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# Jotter Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# log_level = "debug"                # "off", "error", "warn", "info", "debug", "trace"

# [api]
# base_url = "http://localhost:3001" # Or set JOTTER_API_URL env var
# timeout_secs = 10                  # Or set JOTTER_TIMEOUT_SECS env var
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

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &JotterConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| std::env::var("JOTTER_API_URL").ok())
        .or_else(|| config.api.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Timeout: CLI → env → config → default
    let timeout_secs = cli
        .timeout_secs
        .and_then(|secs| nonzero_timeout("--timeout", secs))
        .or_else(env_timeout_secs)
        .or_else(|| {
            config
                .api
                .timeout_secs
                .and_then(|secs| nonzero_timeout("config timeout_secs", secs))
        })
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    // Log level: env → config → default
    let log_level = std::env::var("JOTTER_LOG")
        .ok()
        .or_else(|| config.general.log_level.clone())
        .and_then(|level| parse_level(&level))
        .unwrap_or(DEFAULT_LOG_LEVEL);

    ResolvedConfig {
        base_url,
        timeout: Duration::from_secs(timeout_secs),
        log_level,
    }
}

fn env_timeout_secs() -> Option<u64> {
    let raw = std::env::var("JOTTER_TIMEOUT_SECS").ok()?;
    match raw.trim().parse() {
        Ok(secs) => nonzero_timeout("JOTTER_TIMEOUT_SECS", secs),
        Err(e) => {
            warn!("Ignoring JOTTER_TIMEOUT_SECS={:?}: {}", raw, e);
            None
        }
    }
}

/// Zero counts as unset, so the next layer applies.
fn nonzero_timeout(source: &str, secs: u64) -> Option<u64> {
    if secs == 0 {
        warn!("Ignoring {} of 0 seconds", source);
        return None;
    }
    Some(secs)
}

fn parse_level(level: &str) -> Option<LevelFilter> {
    match level.parse() {
        Ok(filter) => Some(filter),
        Err(_) => {
            warn!("Unknown log level {:?}, using default", level);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_empty() {
        let config = JotterConfig::default();
        assert!(config.api.base_url.is_none());
        assert!(config.api.timeout_secs.is_none());
        assert!(config.general.log_level.is_none());
    }

    #[test]
    fn test_resolve_cli_wins_over_config() {
        let config = JotterConfig {
            api: ApiConfig {
                base_url: Some("http://from-config:9000".to_string()),
                timeout_secs: Some(30),
            },
            ..Default::default()
        };
        let cli = CliOverrides {
            base_url: Some("http://from-cli:8000".to_string()),
            timeout_secs: Some(2),
        };
        let resolved = resolve(&config, &cli);
        assert_eq!(resolved.base_url, "http://from-cli:8000");
        assert_eq!(resolved.timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_zero_timeout_is_ignored() {
        assert_eq!(nonzero_timeout("--timeout", 0), None);
        assert_eq!(nonzero_timeout("--timeout", 4), Some(4));

        let config = JotterConfig {
            api: ApiConfig {
                base_url: None,
                timeout_secs: Some(0),
            },
            ..Default::default()
        };
        let cli = CliOverrides {
            base_url: None,
            timeout_secs: Some(0),
        };
        let resolved = resolve(&config, &cli);
        assert_ne!(resolved.timeout, Duration::ZERO);
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[general]
log_level = "warn"

[api]
base_url = "http://notes.internal:3001"
timeout_secs = 5
"#;
        let config: JotterConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level.as_deref(), Some("warn"));
        assert_eq!(
            config.api.base_url.as_deref(),
            Some("http://notes.internal:3001")
        );
        assert_eq!(config.api.timeout_secs, Some(5));
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing; everything else stays default
        let toml_str = r#"
[api]
timeout_secs = 3
"#;
        let config: JotterConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.timeout_secs, Some(3));
        assert!(config.api.base_url.is_none());
        assert!(config.general.log_level.is_none());
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let err = toml::from_str::<JotterConfig>("[api]\ntimeout_secs = \"soon\"").unwrap_err();
        assert!(ConfigError::Parse(err).to_string().starts_with("config parse error"));
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("warn"), Some(LevelFilter::Warn));
        assert_eq!(parse_level("TRACE"), Some(LevelFilter::Trace));
        assert_eq!(parse_level("loud"), None);
    }
}
