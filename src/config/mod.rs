//! Configuration system for sysglance

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Global application configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub refresh: RefreshConfig,
    pub display: DisplayConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("sysglance").join("config.toml"))
    }

    /// An explicit path must exist; the default location is optional.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RefreshConfig {
    /// Delay before each refresh, counted from when the previous frame landed
    pub interval_ms: u64,
    /// CPU busy-time sampling window
    pub cpu_sample_ms: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_ms: 50,
            cpu_sample_ms: 1000,
        }
    }
}

impl RefreshConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }

    /// The provider raises this to whatever minimum the OS backend needs.
    pub fn cpu_sample(&self) -> Duration {
        Duration::from_millis(self.cpu_sample_ms)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    pub theme: String,
    pub bar_width: u16,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: "candy".to_string(),
            bar_width: crate::ui::widgets::progress::DEFAULT_WIDTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[refresh]\ninterval_ms = 250\n\n[display]\ntheme = \"nord\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.refresh.interval_ms, 250);
        assert_eq!(config.refresh.cpu_sample_ms, 1000);
        assert_eq!(config.display.theme, "nord");
        assert_eq!(config.display.bar_width, 40);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::resolve(Some(&missing)).is_err());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[refresh]\ninterval_ms = \"soon\"").unwrap();
        let err = Config::load(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("parsing config"));
    }

    #[test]
    fn test_zero_interval_has_a_floor() {
        let refresh = RefreshConfig {
            interval_ms: 0,
            cpu_sample_ms: 0,
        };
        assert_eq!(refresh.interval(), Duration::from_millis(1));
        assert_eq!(refresh.cpu_sample(), Duration::ZERO);
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.refresh.interval(), Duration::from_millis(50));
        assert_eq!(config.refresh.cpu_sample(), Duration::from_secs(1));
        assert_eq!(config.display.theme, "candy");
    }
}
