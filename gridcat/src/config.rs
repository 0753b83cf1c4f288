// ABOUTME: Configuration file loading, validation, and hierarchical merging for gridcat
// ABOUTME: Supports TOML config files in XDG locations, the working directory, and an explicit path

use crate::constants::{canonical_protocol, config_files, defaults, protocols};
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub recursive: Option<bool>,
    #[serde(default)]
    pub max_images: Option<usize>,
    #[serde(default, deserialize_with = "validate_protocol")]
    pub protocol: Option<String>,
    #[serde(default, deserialize_with = "validate_watch")]
    pub watch: Option<String>,
    #[serde(default)]
    pub thumbnail_max_px: Option<u32>,
    #[serde(default)]
    pub fallback_columns: Option<u16>,
    #[serde(default)]
    pub fallback_rows: Option<u16>,
    #[serde(default)]
    pub report_skipped: Option<bool>,
}

/// When to keep running and redraw on terminal resize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatchMode {
    /// Watch only when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl FromStr for WatchMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(WatchMode::Auto),
            "always" => Ok(WatchMode::Always),
            "never" => Ok(WatchMode::Never),
            other => Err(anyhow!(
                "Invalid watch mode '{}'. Must be one of: auto, always, never",
                other
            )),
        }
    }
}

impl WatchMode {
    pub fn should_watch(self, stdout_is_terminal: bool) -> bool {
        match self {
            WatchMode::Auto => stdout_is_terminal,
            WatchMode::Always => true,
            WatchMode::Never => false,
        }
    }
}

impl Config {
    /// Load configuration from standard locations, then `extra` on top
    pub fn load(extra: Option<&Path>) -> Result<Self> {
        let config = Self::load_from_paths(&Self::get_config_paths())?;

        match extra {
            Some(path) => {
                let explicit = Self::load_from_file(path)?;
                let merged = config.merge(explicit);
                merged.validate()?;
                Ok(merged)
            }
            None => Ok(config),
        }
    }

    /// Load configuration from paths ordered lowest precedence first.
    /// Missing files are skipped; files that exist but fail to parse are errors.
    pub fn load_from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut config = Config::default();

        for path in paths {
            let path = path.as_ref();
            if !path.is_file() {
                continue;
            }
            log::debug!("Loading config from {}", path.display());
            config = config.merge(Self::load_from_file(path)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a single file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content).with_context(|| {
            format!(
                "Failed to parse TOML config file: {}",
                path.as_ref().display()
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Standard config file paths, lowest precedence first
    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. User config directory
        if let Some(home_dir) = dirs::home_dir() {
            paths.push(
                home_dir
                    .join(".config")
                    .join(config_files::APP_DIR)
                    .join(config_files::FILE_NAME),
            );
        }

        // 2. XDG config home
        if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME") {
            let path = PathBuf::from(config_home)
                .join(config_files::APP_DIR)
                .join(config_files::FILE_NAME);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }

        // 3. Project-specific config
        if let Ok(current_dir) = std::env::current_dir() {
            paths.push(current_dir.join(config_files::PROJECT_FILE));
        }

        paths
    }

    /// Merge this config with another, giving precedence to the other config
    pub fn merge(self, other: Config) -> Config {
        Config {
            recursive: other.recursive.or(self.recursive),
            max_images: other.max_images.or(self.max_images),
            protocol: other.protocol.or(self.protocol),
            watch: other.watch.or(self.watch),
            thumbnail_max_px: other.thumbnail_max_px.or(self.thumbnail_max_px),
            fallback_columns: other.fallback_columns.or(self.fallback_columns),
            fallback_rows: other.fallback_rows.or(self.fallback_rows),
            report_skipped: other.report_skipped.or(self.report_skipped),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.thumbnail_max_px == Some(0) {
            return Err(anyhow!("thumbnail_max_px must be greater than zero"));
        }
        if self.fallback_columns == Some(0) || self.fallback_rows == Some(0) {
            return Err(anyhow!("fallback_columns and fallback_rows must be greater than zero"));
        }
        Ok(())
    }

    pub fn watch_mode(&self) -> WatchMode {
        self.watch
            .as_deref()
            .and_then(|w| w.parse().ok())
            .unwrap_or_default()
    }

    pub fn thumbnail_max_px(&self) -> u32 {
        self.thumbnail_max_px.unwrap_or(defaults::THUMBNAIL_MAX_PX)
    }

    pub fn fallback_columns(&self) -> u16 {
        self.fallback_columns.unwrap_or(defaults::FALLBACK_COLUMNS)
    }

    pub fn fallback_rows(&self) -> u16 {
        self.fallback_rows.unwrap_or(defaults::FALLBACK_ROWS)
    }
}

// Custom deserializer for protocol validation
fn validate_protocol<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value: Option<String> = Option::deserialize(deserializer)?;

    match value {
        Some(protocol) => match canonical_protocol(&protocol) {
            Some(canonical) => Ok(Some(canonical.to_string())),
            None => Err(D::Error::custom(format!(
                "Invalid protocol '{}'. Must be one of: {}",
                protocol,
                protocols::ALL.join(", ")
            ))),
        },
        None => Ok(None),
    }
}

// Custom deserializer for watch mode validation
fn validate_watch<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value: Option<String> = Option::deserialize(deserializer)?;

    match value {
        Some(watch) => watch
            .parse::<WatchMode>()
            .map(|_| Some(watch.trim().to_lowercase()))
            .map_err(|e| D::Error::custom(e.to_string())),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.recursive.is_none());
        assert_eq!(config.thumbnail_max_px(), 512);
        assert_eq!(config.watch_mode(), WatchMode::Auto);
        assert_eq!((config.fallback_columns(), config.fallback_rows()), (80, 24));
    }

    #[test]
    fn test_merge_configs() {
        let base = Config {
            recursive: Some(true),
            max_images: Some(10),
            ..Default::default()
        };

        let override_config = Config {
            max_images: Some(3),
            protocol: Some("kitty".to_string()),
            ..Default::default()
        };

        let merged = base.merge(override_config);
        assert_eq!(merged.recursive, Some(true));
        assert_eq!(merged.max_images, Some(3));
        assert_eq!(merged.protocol, Some("kitty".to_string()));
    }

    #[test]
    fn test_watch_mode_parsing() {
        assert_eq!("always".parse::<WatchMode>().unwrap(), WatchMode::Always);
        assert_eq!(" Never ".parse::<WatchMode>().unwrap(), WatchMode::Never);
        assert!("sometimes".parse::<WatchMode>().is_err());

        assert!(WatchMode::Auto.should_watch(true));
        assert!(!WatchMode::Auto.should_watch(false));
        assert!(WatchMode::Always.should_watch(false));
        assert!(!WatchMode::Never.should_watch(true));
    }

    #[test]
    fn test_protocol_alias_is_canonicalized() {
        let config: Config = toml::from_str(r#"protocol = "iTerm""#).unwrap();
        assert_eq!(config.protocol, Some("iterm2".to_string()));
    }

    #[test]
    fn test_zero_thumbnail_is_rejected() {
        let config = Config {
            thumbnail_max_px: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
