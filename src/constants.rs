//! Constants shared by the engine, configuration and command-line front end.

/// Date pattern used by `date` and `now` when no pattern is given or the
/// pattern resolves to empty text.
pub const DEFAULT_DATE_PATTERN: &str = "yyyy-MM-dd'T'HH:mm:ss.SSSX";

/// Environment variable naming an alternative configuration file.
pub const CONFIG_ENV_VAR: &str = "EXPANDER_CONFIG";

/// Directory under the home directory holding the configuration file.
pub const CONFIG_DIR: &str = ".expander";

/// File name of the configuration file.
pub const CONFIG_FILE: &str = "config.toml";
