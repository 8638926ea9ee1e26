//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$ALGEBRAIX_FETCH_CONFIG` (environment variable)
//! 2. `~/.config/algebraix-fetch/config.toml` (Linux/macOS)
//!    `%APPDATA%\algebraix-fetch\config.toml` (Windows)
//! 3. Built-in defaults

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Browser launch settings.
    pub browser: BrowserConfig,
    /// Download target settings.
    pub download: DownloadConfig,
    /// Identities table settings.
    pub roster: RosterConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
    /// Override cache directory for logs.
    pub cache_dir: Option<PathBuf>,
}

/// Browser launch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// URL of the inbox to open.
    pub inbox_url: String,
    /// Explicit Chrome/Chromium binary path; auto-detected when unset.
    pub chrome_binary: Option<PathBuf>,
    /// Run the browser without a visible window.
    pub headless: bool,
    /// Wait for Enter after the browser opens, so a login can be completed
    /// by hand before traversal starts.
    pub pause_for_login: bool,
}

/// Download target settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Downloads root; the per-sender tree is created beneath it.
    /// Defaults to the platform downloads directory.
    pub root: Option<PathBuf>,
}

/// Identities table settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Path to the identities TOML file.
    pub path: Option<PathBuf>,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            cache_dir: None,
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            inbox_url: "https://c1-liceodelvalle.algebraix.com/".to_string(),
            chrome_binary: None,
            headless: false,
            pause_for_login: false,
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self { root: None }
    }
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self { path: None }
    }
}

// ── Load / save ─────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config() -> Config {
    if let Some(path) = config_file_path() {
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<Config>(&contents) {
                    Ok(cfg) => {
                        tracing::info!(path = %path.display(), "Loaded config");
                        return cfg;
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Failed to parse config, using defaults"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to read config file, using defaults"
                    );
                }
            }
        }
    }
    Config::default()
}

/// Save configuration to the standard location.
pub fn save_config(config: &Config) -> anyhow::Result<()> {
    let path = config_file_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config file path"))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(&path, contents)?;
    tracing::info!(path = %path.display(), "Saved config");
    Ok(())
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    // 1. Environment variable override
    if let Ok(env_path) = std::env::var("ALGEBRAIX_FETCH_CONFIG") {
        return Some(PathBuf::from(env_path));
    }

    // 2. Standard config directory
    dirs::config_dir().map(|d| d.join("algebraix-fetch").join("config.toml"))
}

/// Return the cache directory for logs.
pub fn cache_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("algebraix-fetch")
}

/// Return the log file path.
pub fn log_file_path(config: &Config) -> PathBuf {
    cache_dir(config).join("algebraix-fetch.log")
}

/// Resolve the downloads root: config override, else the platform
/// downloads directory.
pub fn downloads_root(config: &Config) -> Option<PathBuf> {
    config
        .download
        .root
        .clone()
        .or_else(dirs::download_dir)
}

/// Resolve the identities file path: config override, else
/// `roster.toml` next to the config file.
pub fn roster_path(config: &Config) -> Option<PathBuf> {
    config.roster.path.clone().or_else(|| {
        dirs::config_dir().map(|d| d.join("algebraix-fetch").join("roster.toml"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.general.log_level, "warn");
        assert!(cfg.browser.inbox_url.starts_with("https://"));
        assert!(!cfg.browser.headless);
        assert!(cfg.download.root.is_none());
    }

    #[test]
    fn test_serialize_deserialize_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).expect("serialize");
        let parsed: Config = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.general.log_level, cfg.general.log_level);
        assert_eq!(parsed.browser.inbox_url, cfg.browser.inbox_url);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let partial = r#"
[browser]
headless = true

[download]
root = "/tmp/downloads"
"#;
        let cfg: Config = toml::from_str(partial).expect("parse partial");
        assert!(cfg.browser.headless);
        assert_eq!(cfg.download.root, Some(PathBuf::from("/tmp/downloads")));
        // Other fields use defaults
        assert_eq!(cfg.general.log_level, "warn");
        assert!(cfg.browser.inbox_url.starts_with("https://"));
    }

    #[test]
    fn test_downloads_root_prefers_config() {
        let mut cfg = Config::default();
        cfg.download.root = Some(PathBuf::from("/data/inbox"));
        assert_eq!(downloads_root(&cfg), Some(PathBuf::from("/data/inbox")));
    }
}
