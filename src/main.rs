//! `expand` CLI entry point
//!
//! Parses arguments, installs logging on stderr, runs the command and reports
//! failures with suggestions:
//! - `render` - expand a template with parameters
//! - `tokens` - show how a template is scanned

use anyhow::Result;
use clap::Parser;
use expander::cli::{self, CliConfig};
use expander::core::user_friendly_error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let config = cli.build_config();
    init_logging(&config);

    match cli.execute_with_config(config) {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}

/// `RUST_LOG` wins over the level picked by `--verbose`/`--quiet`.
fn init_logging(config: &CliConfig) {
    let filter = match (EnvFilter::try_from_default_env(), &config.log_level) {
        (Ok(filter), _) => filter,
        (Err(_), Some(level)) => EnvFilter::new(format!("expander={level}")),
        (Err(_), None) => return,
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(true))
        .try_init();
}
