//! Prompts shown when the command line leaves something out.
//!
//! Only used on an attended terminal; scripted runs fall back to defaults
//! or fail with a usage error.

use std::io::{self, Write};

use anyhow::Result;
use console::style;
use dialoguer::{Input, Select, theme::ColorfulTheme};

use ocm_core::types::{AssetKind, Scope};
use ocm_core::validation::validate_asset_name;

const SCOPE_ITEMS: [&str; 2] = [
    "Local    - This project (.opencode/)",
    "Global   - All projects (~/.config/opencode/)",
];

/// Map a selection index from [`SCOPE_ITEMS`] to a scope.
pub fn scope_from_selection(index: usize) -> Scope {
    match index {
        1 => Scope::Global,
        _ => Scope::Local,
    }
}

pub struct Prompter<W: Write = io::Stdout> {
    writer: W,
    theme: ColorfulTheme,
}

impl Prompter<io::Stdout> {
    pub fn new() -> Self {
        Self {
            writer: io::stdout(),
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for Prompter<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Prompter<W> {
    #[cfg(test)]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            theme: ColorfulTheme::default(),
        }
    }

    pub fn prompt_scope(&mut self) -> Result<Scope> {
        let selection = Select::with_theme(&self.theme)
            .with_prompt("Where should OCM operate?")
            .items(&SCOPE_ITEMS)
            .default(0)
            .interact()?;

        let scope = scope_from_selection(selection);
        self.print_scope(scope)?;
        Ok(scope)
    }

    /// Ask for an asset name until it passes validation.
    pub fn prompt_name(&self, kind: AssetKind) -> Result<String> {
        let name: String = Input::with_theme(&self.theme)
            .with_prompt(format!("{} name", kind))
            .validate_with(|input: &String| -> Result<(), String> {
                validate_asset_name(input.trim()).map_err(|e| e.to_string())
            })
            .interact_text()?;

        Ok(name.trim().to_string())
    }

    fn print_scope(&mut self, scope: Scope) -> Result<()> {
        writeln!(
            self.writer,
            "  Using {} scope",
            style(scope.as_str()).green().bold()
        )?;
        Ok(())
    }
}
