//! Prompts built on top of a [`TerminalIO`].
//!
//! Prompts keep asking until they get a usable answer. End of input is the
//! only way out without one and surfaces as [`InputError::PromptCancelled`],
//! so a closed stdin can never spin a prompt forever.

use std::sync::Arc;

use console::style;

use crate::terminal::{RealTerminal, TerminalIO};
use crate::InputError;

const RETRY: &str = "Please try again:";

/// Asks the user for input on a terminal.
#[derive(Clone)]
pub struct Prompter {
    terminal: Arc<dyn TerminalIO>,
}

impl std::fmt::Debug for Prompter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Prompter").finish_non_exhaustive()
    }
}

impl Default for Prompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter {
    /// Prompts on the process's own terminal.
    pub fn new() -> Self {
        Self {
            terminal: Arc::new(RealTerminal),
        }
    }

    /// Prompts on a custom terminal, typically a
    /// [`MockTerminal`](crate::MockTerminal) in tests.
    pub fn with_terminal<T: TerminalIO + 'static>(terminal: T) -> Self {
        Self {
            terminal: Arc::new(terminal),
        }
    }

    /// Whether stdin is an interactive terminal.
    pub fn is_interactive(&self) -> bool {
        self.terminal.is_terminal()
    }

    fn write(&self, text: &str) -> Result<(), InputError> {
        self.terminal
            .write_prompt(text)
            .map_err(InputError::PromptFailed)
    }

    fn retry(&self, message: &str) -> Result<(), InputError> {
        self.write(&format!("{} ", style(message).yellow()))
    }

    /// Reads one line of input.
    ///
    /// Returns `Ok(None)` when the line is empty after trimming.
    pub fn read(&self) -> Result<Option<String>, InputError> {
        let line = self
            .terminal
            .read_line()
            .map_err(InputError::PromptFailed)?;

        // Nothing read at all: end of input.
        if line.is_empty() {
            return Err(InputError::PromptCancelled);
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            Ok(None)
        } else {
            Ok(Some(trimmed.to_string()))
        }
    }

    /// Reads until `parse` accepts a line.
    ///
    /// Empty lines and rejected answers print a retry hint; a rejection's
    /// message is shown before the hint.
    pub fn read_parsed<T, F>(&self, parse: F) -> Result<T, InputError>
    where
        F: Fn(&str) -> Result<T, String>,
    {
        loop {
            let Some(input) = self.read()? else {
                self.retry(RETRY)?;
                continue;
            };

            match parse(&input) {
                Ok(value) => return Ok(value),
                Err(reason) => {
                    self.write(&format!("{}\n", reason))?;
                    self.retry(RETRY)?;
                }
            }
        }
    }

    /// Shows `message` and then behaves like [`read_parsed`](Self::read_parsed).
    pub fn read_with_message<T, F>(&self, message: &str, parse: F) -> Result<T, InputError>
    where
        F: Fn(&str) -> Result<T, String>,
    {
        self.write(&format!("{} ", style(format!("{}:", message)).bold().magenta()))?;
        self.read_parsed(parse)
    }

    /// Asks a yes/no question.
    ///
    /// Accepts `y`/`yes`/`n`/`no` in any case. An empty answer takes the
    /// default when there is one and asks again otherwise. The suffix shows
    /// the default:
    /// - `None`: `[y/n]`
    /// - `Some(true)`: `[Y/n]`
    /// - `Some(false)`: `[y/N]`
    pub fn confirm(&self, message: &str, default: Option<bool>) -> Result<bool, InputError> {
        let suffix = match default {
            None => "[y/n]",
            Some(true) => "[Y/n]",
            Some(false) => "[y/N]",
        };

        self.write(&format!("{} {} ", style(message).bold().magenta(), suffix))?;

        loop {
            let answer = self.read()?.map(|input| input.to_lowercase());

            match (answer.as_deref(), default) {
                (Some("y" | "yes"), _) => return Ok(true),
                (Some("n" | "no"), _) => return Ok(false),
                (None, Some(default)) => return Ok(default),
                _ => self.retry(&format!("Please enter yes or no. {}:", suffix))?,
            }
        }
    }

    /// Asks the user to pick one of `options` by number.
    ///
    /// With a default, an empty answer selects it; the default does not have
    /// to be one of the options.
    pub fn select<S: AsRef<str>>(
        &self,
        options: &[S],
        default: Option<&str>,
        message: &str,
    ) -> Result<String, InputError> {
        if options.is_empty() && default.is_none() {
            return Err(InputError::NoOptions);
        }

        self.write(&format!("{}\n", style(message).bold().magenta()))?;

        for (position, option) in options.iter().enumerate() {
            let number = format!("{})", position + 1);
            let option = option.as_ref();
            if Some(option) == default {
                self.write(&format!(
                    "{} {} {}\n",
                    style(number).blue().bold(),
                    option,
                    style("(Default)").dim()
                ))?;
            } else {
                self.write(&format!("{} {}\n", style(number).blue(), option))?;
            }
        }

        let hint = match default {
            Some(default) => format!(
                "Select an option. Press ENTER for default value ({}):",
                style(default).italic()
            ),
            None => "Select an option:".to_string(),
        };
        self.write(&format!("{} ", style(hint).blue()))?;

        loop {
            let Some(input) = self.read()? else {
                match default {
                    Some(default) => return Ok(default.to_string()),
                    None => {
                        self.retry("You have to select an option:")?;
                        continue;
                    }
                }
            };

            let chosen = input
                .parse::<usize>()
                .ok()
                .and_then(|number| number.checked_sub(1))
                .and_then(|index| options.get(index));

            if let Some(option) = chosen {
                return Ok(option.as_ref().to_string());
            }

            let range = format!("Please select an option between 1 and {}", options.len());
            match default {
                Some(default) => self.retry(&format!(
                    "{}, or press ENTER for default value ({}):",
                    range, default
                ))?,
                None => self.retry(&format!("{}:", range))?,
            }
        }
    }
}
