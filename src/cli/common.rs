//! Common pieces shared by CLI commands

use anyhow::{Context, Result, bail};
use clap::Args;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::ExpanderConfig;

/// Where a command takes its template from, besides the command line.
#[derive(Args, Debug, Clone, Default)]
pub struct TemplateSource {
    /// Read the template from a file (`-` for standard input)
    #[arg(short, long, value_name = "PATH", conflicts_with = "name")]
    pub file: Option<PathBuf>,

    /// Use a named template from the configuration file
    #[arg(short, long, value_name = "NAME")]
    pub name: Option<String>,
}

impl TemplateSource {
    /// Whether the template comes from `--file` or `--name`.
    #[must_use]
    pub const fn is_external(&self) -> bool {
        self.file.is_some() || self.name.is_some()
    }

    /// Split positional arguments into the template and what remains.
    ///
    /// With `--file` or `--name` every positional argument is left over;
    /// otherwise the first one is the template itself.
    ///
    /// # Errors
    ///
    /// Returns an error if no template is given, or if the file or named
    /// template cannot be loaded.
    pub fn resolve<'a>(
        &self,
        args: &'a [String],
        config: &ExpanderConfig,
    ) -> Result<(String, &'a [String])> {
        if let Some(path) = &self.file {
            return Ok((read_template(path)?, args));
        }
        if let Some(name) = &self.name {
            debug!(name, "using configured template");
            return Ok((config.template(name)?.to_string(), args));
        }
        match args.split_first() {
            Some((template, rest)) => Ok((template.clone(), rest)),
            None => bail!("No template given; pass it as an argument, with --file or with --name"),
        }
    }
}

/// Configuration and template source for one command invocation.
#[derive(Debug)]
pub struct CommandContext {
    /// Loaded configuration file, or defaults
    pub config: ExpanderConfig,
}

impl CommandContext {
    /// Load the configuration from `config_path`, `EXPANDER_CONFIG` or the
    /// default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let config = ExpanderConfig::load(config_path).context("Failed to load configuration")?;
        Ok(Self {
            config,
        })
    }
}

fn read_template(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut template = String::new();
        std::io::stdin()
            .read_to_string(&mut template)
            .context("Failed to read template from standard input")?;
        return Ok(template);
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read template file: {}", path.display()))
}
