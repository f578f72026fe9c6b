//! Configuration file support for ganshift.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/ganshift/config.toml` (lowest priority)
//! - Project-local: `.ganshift.toml` (searched up the directory tree)
//! - CLI flags (highest priority, applied by the commands)

use std::path::{Path, PathBuf};

use ganshift_core::Direction;
use serde::Deserialize;
use tracing::{debug, info};

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Checkpoint storage settings.
    pub models: ModelsConfig,
    /// Web shell settings.
    pub server: ServerConfig,
    /// Translation settings.
    pub translate: TranslateConfig,
}

/// Checkpoint storage configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Custom artifacts directory path.
    pub dir: Option<PathBuf>,
}

/// Web shell configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (default 127.0.0.1).
    pub host: Option<String>,
    /// Bind port (default 8080).
    pub port: Option<u16>,
}

/// Translation configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    /// Routing: "forward" or "reverse".
    pub direction: Option<String>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Missing files are silently ignored. Invalid values are reported as
    /// warnings before any network or model work starts.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        if let Err(e) = config.validate() {
            eprintln!("warning: {e}");
        }

        config
    }

    /// Resolved direction, falling back to the demo route.
    pub fn direction(&self) -> Direction {
        self.translate
            .direction
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), String> {
        if let Some(ref d) = self.translate.direction {
            d.parse::<Direction>()
                .map(|_| ())
                .map_err(|e| format!("translate.direction: {e}"))?;
        }
        if self.server.port == Some(0) {
            return Err("server.port must be nonzero".to_string());
        }
        Ok(())
    }

    /// Merge another config into this one; `other` wins where present.
    fn merge(&mut self, other: Self) {
        self.models.dir = other.models.dir.or_else(|| self.models.dir.take());
        self.server.host = other.server.host.or_else(|| self.server.host.take());
        self.server.port = other.server.port.or(self.server.port);
        self.translate.direction = other
            .translate
            .direction
            .or_else(|| self.translate.direction.take());
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ganshift").join("config.toml"))
}

/// Find project-local config by searching up from the current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(".ganshift.toml");
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}
