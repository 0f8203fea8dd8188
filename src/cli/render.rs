//! Expand a template and print the result.
//!
//! # Examples
//!
//! ```bash
//! # Inline template, positional parameters
//! expand render 'a{}b{}c' 0 1                       # a0b1c
//!
//! # Typed parameters
//! expand render '{%05.1f} {%x}' float:3.14159 int:255
//!
//! # Parameters from JSON
//! expand render '{}|{}|{}' --json '["x", 4, null]'
//!
//! # Named template from ~/.expander/config.toml
//! expand render --name query d f
//!
//! # Template on standard input
//! echo 'today is {now(EEEE)}' | expand render --file -
//! ```

use anyhow::{Context, Result};
use clap::Args;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

use super::common::{CommandContext, TemplateSource};
use super::params::{params_from_json, parse_params};
use crate::format::TimeZone;

/// Command to expand a template.
#[derive(Args, Debug)]
pub struct RenderCommand {
    /// The template, followed by its parameters
    ///
    /// When the template comes from `--file` or `--name`, every argument is a
    /// parameter. Prefix parameters with `int:`, `float:`, `instant:`,
    /// `millis:`, `str:` or use `null:` for typed values. Put arguments that
    /// start with `-` after `--`.
    #[arg(value_name = "TEMPLATE|PARAM")]
    args: Vec<String>,

    #[command(flatten)]
    source: TemplateSource,

    /// Additional parameters as a JSON array, appended after positional ones
    #[arg(short, long, value_name = "ARRAY")]
    json: Option<String>,

    /// Default time zone for date options, overriding the configuration
    #[arg(short, long, value_name = "ZONE")]
    zone: Option<String>,

    /// Do not print a trailing newline
    #[arg(long)]
    no_newline: bool,
}

impl RenderCommand {
    /// Execute the render command.
    pub fn execute(self, config_path: Option<PathBuf>) -> Result<()> {
        let context = CommandContext::load(config_path)?;
        let output = self.render(&context)?;

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(output.as_bytes())?;
        if !self.no_newline {
            stdout.write_all(b"\n")?;
        }
        stdout.flush()?;
        Ok(())
    }

    fn render(&self, context: &CommandContext) -> Result<String> {
        let (template, rest) = self.source.resolve(&self.args, &context.config)?;

        let mut params = parse_params(rest)?;
        if let Some(json) = &self.json {
            params.extend(params_from_json(json).context("Failed to parse --json parameters")?);
        }

        let mut expander = context.config.expander()?;
        if let Some(zone) = &self.zone {
            expander = expander.with_default_zone(TimeZone::from_id(zone)?);
        }

        debug!(params = params.len(), zone = %expander.default_zone(), "rendering");
        Ok(expander.expand(&template, &params)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExpanderConfig;
    use crate::core::ExpandError;
    use crate::test_utils::{FIXTURE_MILLIS, init_test_logging};

    fn command(args: &[&str]) -> RenderCommand {
        RenderCommand {
            args: args.iter().map(ToString::to_string).collect(),
            source: TemplateSource::default(),
            json: None,
            zone: None,
            no_newline: false,
        }
    }

    fn context() -> CommandContext {
        let mut config = ExpanderConfig::default();
        config.default_zone = Some("UTC".to_string());
        config.templates.insert("query".to_string(), "?a=b{?}&c={}{?}&e={}".to_string());
        CommandContext {
            config,
        }
    }

    #[test]
    fn test_render_inline() {
        init_test_logging(None);
        assert_eq!(command(&["a{}b{}c", "0", "1"]).render(&context()).unwrap(), "a0b1c");
    }

    #[test]
    fn test_render_typed_and_json_params() {
        let mut cmd = command(&["{%03d}|{}|{}|{}", "int:7"]);
        cmd.json = Some(r#"["x", 2.5, null]"#.to_string());
        assert_eq!(cmd.render(&context()).unwrap(), "007|x|2.5|");
    }

    #[test]
    fn test_render_named_template() {
        let mut cmd = command(&["", "f"]);
        cmd.source.name = Some("query".to_string());
        assert_eq!(cmd.render(&context()).unwrap(), "?a=b&e=f");
    }

    #[test]
    fn test_zone_override() {
        let millis = format!("int:{FIXTURE_MILLIS}");
        let cmd = command(&["{date(HH:mm)}", &millis]);
        assert_eq!(cmd.render(&context()).unwrap(), "16:52");

        let mut cmd = command(&["{date(HH:mm)}", &millis]);
        cmd.zone = Some("EST".to_string());
        assert_eq!(cmd.render(&context()).unwrap(), "11:52");

        let mut cmd = command(&["{date(HH:mm)}", &millis]);
        cmd.zone = Some("Asia/Tokyo".to_string());
        assert_eq!(cmd.render(&context()).unwrap(), "01:52");
    }

    #[test]
    fn test_render_errors() {
        let err = command(&["{%d}", "abc"]).render(&context()).unwrap_err();
        assert!(matches!(err.downcast_ref::<ExpandError>(), Some(ExpandError::FormatMismatch { .. })));

        let mut cmd = command(&["{}"]);
        cmd.zone = Some("Mars".to_string());
        let err = cmd.render(&context()).unwrap_err();
        assert!(matches!(err.downcast_ref::<ExpandError>(), Some(ExpandError::UnknownTimeZone { .. })));

        let err = command(&["{}", "int:x"]).render(&context()).unwrap_err();
        assert!(matches!(err.downcast_ref::<ExpandError>(), Some(ExpandError::InvalidParameter { .. })));
    }
}
