//! Command-line interface for the `expand` binary.
//!
//! # Available Commands
//!
//! - `render` - expand a template with parameters and print the result
//! - `tokens` - print the tokens a template is scanned into
//!
//! # Global Options
//!
//! | Option            | Effect                                          |
//! |-------------------|-------------------------------------------------|
//! | `-v, --verbose`   | debug logging on stderr                         |
//! | `-q, --quiet`     | no logging, errors only                         |
//! | `-c, --config`    | configuration file instead of the default path  |
//!
//! `RUST_LOG` overrides the level chosen by `--verbose`/`--quiet`.
//!
//! # Examples
//!
//! ```bash
//! expand render 'Hello, {trim,upper}!' '  world '
//! expand --config ./team.toml render --name query d f
//! expand -v tokens '{[/(\w+)@/1]}'
//! ```

mod common;
pub mod params;
mod render;
mod tokens;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use common::{CommandContext, TemplateSource};
pub use render::RenderCommand;
pub use tokens::TokensCommand;

/// Settings derived from global flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Logging level for the tracing subscriber; `None` disables logging
    pub log_level: Option<String>,

    /// Configuration file given with `--config`
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Default configuration: `info` logging, default config file.
    #[must_use]
    pub fn new() -> Self {
        Self {
            log_level: Some("info".to_string()),
            config_path: None,
        }
    }
}

/// Template expansion from the command line.
#[derive(Parser, Debug)]
#[command(name = "expand", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    ///
    /// Equivalent to `RUST_LOG=debug`. Mutually exclusive with `--quiet`.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Print nothing but the result and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file
    ///
    /// Overrides `EXPANDER_CONFIG` and `~/.expander/config.toml`.
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Expand a template and print the result
    Render(RenderCommand),

    /// Show how a template is split into tokens
    Tokens(TokensCommand),
}

impl Cli {
    /// Execute the selected command with settings from the global flags.
    pub fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config)
    }

    /// Derive [`CliConfig`] from the global flags.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("info".to_string())
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    /// Execute the selected command with explicit settings.
    pub fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Render(cmd) => cmd.execute(config.config_path),
            Commands::Tokens(cmd) => cmd.execute(config.config_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        assert!(Cli::try_parse_from(["expand", "--help"]).is_err());
        assert!(Cli::try_parse_from(["expand"]).is_err());

        let cli = Cli::try_parse_from(["expand", "render", "a{}b", "x"]).unwrap();
        assert!(matches!(cli.command, Commands::Render(_)));

        let cli = Cli::try_parse_from(["expand", "tokens", "{}"]).unwrap();
        assert!(matches!(cli.command, Commands::Tokens(_)));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["expand", "render", "{}", "-v", "-c", "cfg.toml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("cfg.toml")));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["expand", "-v", "-q", "render", "{}"]).is_err());
    }

    #[test]
    fn test_file_conflicts_with_name() {
        let result = Cli::try_parse_from(["expand", "render", "--file", "t.txt", "--name", "q"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_build_config() {
        let cli = Cli::try_parse_from(["expand", "render", "{}"]).unwrap();
        assert_eq!(cli.build_config(), CliConfig::new());

        let cli = Cli::try_parse_from(["expand", "--verbose", "render", "{}"]).unwrap();
        assert_eq!(cli.build_config().log_level.as_deref(), Some("debug"));

        let cli = Cli::try_parse_from(["expand", "--quiet", "--config", "x.toml", "render", "{}"])
            .unwrap();
        let config = cli.build_config();
        assert_eq!(config.log_level, None);
        assert_eq!(config.config_path, Some(PathBuf::from("x.toml")));
    }

    #[test]
    fn test_clap_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
