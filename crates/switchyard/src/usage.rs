//! Usage text for a command at a given position in the command tree.
//!
//! [`render_usage`] is a pure function of the command, the command path and
//! a [`UsageTheme`]. The output has up to four sections:
//!
//! ```text
//! NAME
//!   remote - Manage remotes
//!
//! USAGE
//!   git remote [options] <command> [name]
//!   name - Remote to show
//!
//! SUBCOMMANDS
//!   add - Add a remote
//!
//! OPTIONS
//!   -v, --verbose
//!     Show remote URLs
//!
//!   -h, --help
//!     Show usage description
//! ```
//!
//! SUBCOMMANDS only appears when the command has any. The implicit help
//! switch is always listed, between the flags and the options.

use console::Style;
use once_cell::sync::Lazy;

use crate::command::Command;

const INDENT: &str = "  ";

static DEFAULT_THEME: Lazy<UsageTheme> = Lazy::new(UsageTheme::styled);

/// Styles applied to the parts of usage text and error reports.
#[derive(Debug, Clone)]
pub struct UsageTheme {
    /// Section headers (`NAME`, `USAGE`, ...).
    pub header: Style,
    /// Summaries of commands, parameters and options.
    pub summary: Style,
    /// The `[options]` marker in the usage line.
    pub options: Style,
    /// Parameter names and `<command>`.
    pub parameter: Style,
    /// Subcommand names.
    pub subcommand: Style,
    /// Error messages.
    pub error: Style,
}

impl UsageTheme {
    /// Bold headers, dimmed summaries, colored placeholders.
    pub fn styled() -> Self {
        Self {
            header: Style::new().bold(),
            summary: Style::new().dim(),
            options: Style::new().magenta(),
            parameter: Style::new().blue(),
            subcommand: Style::new().underlined(),
            error: Style::new().red(),
        }
    }

    /// No styling at all.
    pub fn plain() -> Self {
        Self {
            header: Style::new(),
            summary: Style::new(),
            options: Style::new(),
            parameter: Style::new(),
            subcommand: Style::new(),
            error: Style::new(),
        }
    }
}

impl Default for UsageTheme {
    fn default() -> Self {
        DEFAULT_THEME.clone()
    }
}

/// Renders the usage of `command`, reached through `path` (executable name
/// first). The result has no trailing newline.
pub fn render_usage<S: AsRef<str>>(command: &Command, path: &[S], theme: &UsageTheme) -> String {
    let path: Vec<&str> = path.iter().map(AsRef::as_ref).collect();
    let name = path.last().copied().unwrap_or_default();

    let mut sections = vec![section(
        theme,
        "NAME",
        vec![format!(
            "{}{} - {}",
            INDENT,
            name,
            theme.summary.apply_to(command.summary())
        )],
    )];

    sections.push(section(theme, "USAGE", usage_lines(command, &path, theme)));

    if command.has_subcommands() {
        let lines = command
            .subcommands()
            .map(|(name, subcommand)| {
                format!(
                    "{}{} - {}",
                    INDENT,
                    theme.subcommand.apply_to(name),
                    theme.summary.apply_to(subcommand.summary())
                )
            })
            .collect();
        sections.push(section(theme, "SUBCOMMANDS", lines));
    }

    sections.push(options_section(command, theme));

    sections.join("\n\n")
}

fn section(theme: &UsageTheme, title: &str, lines: Vec<String>) -> String {
    let mut text = theme.header.apply_to(title).to_string();
    for line in lines {
        text.push('\n');
        text.push_str(&line);
    }
    text
}

fn usage_lines(command: &Command, path: &[&str], theme: &UsageTheme) -> Vec<String> {
    let mut synopsis = format!(
        "{}{} {}",
        INDENT,
        path.join(" "),
        theme.options.apply_to("[options]")
    );

    if command.has_subcommands() {
        synopsis.push(' ');
        synopsis.push_str(&theme.parameter.apply_to("<command>").to_string());
    }
    for parameter in command.parameters() {
        let placeholder = format!("[{}]", parameter.name());
        synopsis.push(' ');
        synopsis.push_str(&theme.parameter.apply_to(placeholder).to_string());
    }
    if let Some(variadic) = command.variadic_parameter() {
        let placeholder = format!("[{}...]", variadic.name());
        synopsis.push(' ');
        synopsis.push_str(&theme.parameter.apply_to(placeholder).to_string());
    }

    let described = command
        .parameters()
        .iter()
        .chain(command.variadic_parameter())
        .map(|parameter| {
            format!(
                "{}{} - {}",
                INDENT,
                theme.parameter.apply_to(parameter.name()),
                theme.summary.apply_to(parameter.summary())
            )
        });

    std::iter::once(synopsis).chain(described).collect()
}

fn options_section(command: &Command, theme: &UsageTheme) -> String {
    let entry = |names: String, summary: &str| {
        format!(
            "{}{}\n{}{}{}",
            INDENT,
            names,
            INDENT,
            INDENT,
            theme.summary.apply_to(summary)
        )
    };

    let mut entries: Vec<String> = command
        .flags()
        .iter()
        .map(|flag| entry(flag.to_string(), flag.summary()))
        .collect();

    entries.push(entry("-h, --help".to_string(), "Show usage description"));

    entries.extend(command.options().iter().map(|option| {
        entry(
            format!("{} <{}>", option.name(), option.placeholder_text()),
            option.summary(),
        )
    }));

    format!(
        "{}\n{}",
        theme.header.apply_to("OPTIONS"),
        entries.join("\n\n")
    )
}
