//! Show how a template is split into tokens.
//!
//! Useful for checking why a token was copied as text instead of expanded:
//!
//! ```bash
//! $ expand tokens 'a{?}{[1,x]}{trim}'
//! literal "a"
//! conditional-open
//! literal "{[1,x]}"
//! replacement {trim} escape=0 base=Next operators=1
//! ```

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::common::{CommandContext, TemplateSource};
use crate::expander::Scanner;

/// Command to list the tokens of a template.
#[derive(Args, Debug)]
pub struct TokensCommand {
    /// The template (omit with --file or --name)
    #[arg(value_name = "TEMPLATE")]
    template: Option<String>,

    #[command(flatten)]
    source: TemplateSource,
}

impl TokensCommand {
    /// Execute the tokens command.
    pub fn execute(self, config_path: Option<PathBuf>) -> Result<()> {
        let context = CommandContext::load(config_path)?;
        for line in self.lines(&context)? {
            println!("{line}");
        }
        Ok(())
    }

    fn lines(&self, context: &CommandContext) -> Result<Vec<String>> {
        let args: Vec<String> = self.template.iter().cloned().collect();
        let (template, rest) = self.source.resolve(&args, &context.config)?;
        if !rest.is_empty() {
            anyhow::bail!("Unexpected template argument alongside --file or --name");
        }
        Ok(Scanner::new(&template).map(|token| token.to_string()).collect())
    }
}
