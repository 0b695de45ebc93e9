//! Operator-facing output and questions
//!
//! Three message categories: informational (cyan), warning (yellow) and
//! fatal (red). Logs go through tracing; these lines are for the operator.

use std::io::{self, IsTerminal};

use dialoguer::Confirm;
use dialoguer::console::style;
use dialoguer::theme::ColorfulTheme;
use tracing::warn;

use crate::config::Confirmation;
use crate::error::{BootstrapError, Severity};

pub fn info(message: impl AsRef<str>) {
    println!("{} {}", style("info").cyan().bold(), message.as_ref());
}

pub fn warning(message: impl AsRef<str>) {
    eprintln!("{} {}", style("warning").yellow().bold(), message.as_ref());
}

pub fn fatal(message: impl AsRef<str>) {
    eprintln!("{} {}", style("error").red().bold(), message.as_ref());
}

/// Print an error under its severity's category
pub fn report(error: &BootstrapError) {
    match error.severity() {
        Severity::Info => info(error.to_string()),
        Severity::Warning => warning(error.to_string()),
        Severity::Fatal => fatal(error.to_string()),
    }
}

/// Yes/no prompt on the terminal; answers "no" when there is no terminal
#[derive(Debug, Default)]
pub struct TerminalConfirmation;

impl Confirmation for TerminalConfirmation {
    fn confirm(&self, message: &str) -> bool {
        if !io::stdin().is_terminal() {
            warning("no terminal to confirm on; pass --force to overwrite");
            return false;
        }
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(message)
            .default(false)
            .interact()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Confirmation prompt failed");
                false
            })
    }
}
