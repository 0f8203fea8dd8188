//! TOML file parsing with path context.
//!
//! Errors carry the file path and whether reading or parsing failed:
//!
//! ```text
//! Failed to parse config file: /home/me/.expander/config.toml
//! Caused by:
//!     invalid type: integer `3`, expected a string
//! ```

use anyhow::{Context, Result};
use std::path::Path;

/// Read `path` and deserialize it as TOML.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid TOML, or does not
/// match the shape of `T`.
///
/// # Examples
///
/// ```rust,no_run
/// use expander::config::{ExpanderConfig, parse_config};
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// let config: ExpanderConfig = parse_config(Path::new("config.toml"))?;
/// println!("{} templates", config.templates.len());
/// # Ok(())
/// # }
/// ```
pub fn parse_config<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: T = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}
