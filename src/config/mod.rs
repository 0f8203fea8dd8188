//! User configuration for the `expand` command.
//!
//! The configuration file is optional. It sets the default time zone used by
//! `date` and `now` options that name no zone, and stores named templates that
//! `expand render --name` can refer to.
//!
//! # Location
//!
//! The first of these that applies is used:
//!
//! 1. the `--config <PATH>` command-line flag
//! 2. the `EXPANDER_CONFIG` environment variable
//! 3. `~/.expander/config.toml`
//!
//! An explicitly named file must exist. A missing default file yields an empty
//! configuration.
//!
//! # Format
//!
//! ```toml
//! default_zone = "UTC"
//!
//! [templates]
//! query = "?a=b{?}&c={}{?}&e={}"
//! stamp = "{now(yyyy-MM-dd HH:mm)}"
//! ```

mod parser;

pub use parser::parse_config;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::{CONFIG_DIR, CONFIG_ENV_VAR, CONFIG_FILE};
use crate::core::ExpandError;
use crate::expander::Expander;
use crate::format::TimeZone;

/// Contents of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExpanderConfig {
    /// Zone identifier for date options without an explicit zone
    pub default_zone: Option<String>,

    /// Named templates
    pub templates: BTreeMap<String, String>,
}

impl ExpanderConfig {
    /// Load the configuration, trying the explicit path, then
    /// `EXPANDER_CONFIG`, then the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file is missing, or if the chosen
    /// file cannot be read or parsed.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let from_env =
            std::env::var_os(CONFIG_ENV_VAR).filter(|v| !v.is_empty()).map(PathBuf::from);
        Self::load_with_fallback(path.or(from_env))
    }

    /// Load from `path` if given, otherwise from the default location.
    ///
    /// # Errors
    ///
    /// See [`ExpanderConfig::load`].
    pub fn load_with_fallback(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from(&path);
        }

        match Self::default_path() {
            Ok(path) if path.exists() => Self::load_from(&path),
            Ok(path) => {
                debug!(path = %path.display(), "no configuration file, using defaults");
                Ok(Self::default())
            }
            Err(e) => {
                debug!("{e:#}, using default configuration");
                Ok(Self::default())
            }
        }
    }

    /// Load from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading configuration");
        parse_config(path)
    }

    /// `~/.expander/config.toml`
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Unable to determine home directory")?;
        Ok(home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Look up a named template.
    ///
    /// # Errors
    ///
    /// [`ExpandError::TemplateNotFound`] if no template has that name.
    pub fn template(&self, name: &str) -> Result<&str, ExpandError> {
        self.templates.get(name).map(String::as_str).ok_or_else(|| ExpandError::TemplateNotFound {
            name: name.to_string(),
        })
    }

    /// The configured default zone, or the system zone when none is set.
    ///
    /// # Errors
    ///
    /// [`ExpandError::ConfigError`] if `default_zone` is not a recognized zone.
    pub fn zone(&self) -> Result<TimeZone, ExpandError> {
        match self.default_zone.as_deref() {
            None | Some("") => Ok(TimeZone::Local),
            Some(id) => TimeZone::from_id(id).map_err(|e| ExpandError::ConfigError {
                message: format!("default_zone: {e}"),
            }),
        }
    }

    /// An [`Expander`] using the configured default zone.
    ///
    /// # Errors
    ///
    /// See [`ExpanderConfig::zone`].
    pub fn expander(&self) -> Result<Expander, ExpandError> {
        Ok(Expander::new().with_default_zone(self.zone()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ExpanderConfig::default();
        assert!(config.default_zone.is_none());
        assert!(config.templates.is_empty());
        assert_eq!(config.zone().unwrap(), TimeZone::Local);
    }

    #[test]
    fn test_load_explicit_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "default_zone = \"UTC\"\n[templates]\ngreet = \"hi {}\"\n").unwrap();

        let config = ExpanderConfig::load_with_fallback(Some(path)).unwrap();
        assert_eq!(config.template("greet").unwrap(), "hi {}");
        assert_eq!(config.zone().unwrap(), TimeZone::utc());
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let temp = TempDir::new().unwrap();
        let result = ExpanderConfig::load_with_fallback(Some(temp.path().join("missing.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "default_zon = \"UTC\"\n").unwrap();
        assert!(ExpanderConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_template_not_found() {
        let err = ExpanderConfig::default().template("nope").unwrap_err();
        assert_eq!(
            err,
            ExpandError::TemplateNotFound {
                name: "nope".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_default_zone() {
        let config = ExpanderConfig {
            default_zone: Some("Mars/Olympus".to_string()),
            ..Default::default()
        };
        assert!(matches!(config.zone(), Err(ExpandError::ConfigError { .. })));
        assert!(config.expander().is_err());
    }

    #[test]
    fn test_expander_uses_configured_zone() {
        let config = ExpanderConfig {
            default_zone: Some("+05:30".to_string()),
            ..Default::default()
        };
        let out = config.expander().unwrap().expand("{date(HH:mm)}", &crate::params![0_i64]).unwrap();
        assert_eq!(out, "05:30");
    }

    #[test]
    fn test_region_default_zone() {
        let config = ExpanderConfig {
            default_zone: Some("America/New_York".to_string()),
            ..Default::default()
        };
        // 2020-05-05T16:52Z falls in daylight-saving time
        let millis = crate::test_utils::FIXTURE_MILLIS;
        let out = config.expander().unwrap().expand("{date(HH:mm z)}", &crate::params![millis]).unwrap();
        assert_eq!(out, "12:52 EDT");
    }

    #[test]
    fn test_default_path_location() {
        if let Ok(path) = ExpanderConfig::default_path() {
            assert!(path.ends_with(".expander/config.toml"));
        }
    }
}
