//! Argument resolution and dispatch.
//!
//! Resolution walks the active tokens once per command level. Only tokens
//! after the level's boundary (the index of the token that selected the
//! command, 0 for the root) are looked at. For each token:
//!
//! - **Parameter**: skipped when the token before it is an option of this
//!   command, since it is that option's value. Otherwise, directly after the
//!   boundary, a subcommand name enters that subcommand. Otherwise the value
//!   binds to the first unbound fixed parameter, then to the variadic
//!   parameter, else it is unexpected.
//! - **Long / short option**: `--help` and `-h` print usage and stop. An
//!   option takes the next token as its value, which must be a parameter. A
//!   flag is set. Anything else is unexpected.
//! - **Option set** (`-abc`): every character but the last must be a flag.
//!   The last one is looked up as an option first, then as a flag.
//!
//! Entering a subcommand pushes a frame on the command path and restarts the
//! walk at the new boundary. Nothing can have been bound at the parent level
//! by then, since a subcommand is only recognized directly after its parent's
//! name. When the walk ends, the handler of the current command runs.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::argument::{find_long, find_short, Flag, Opt, HELP_LONG, HELP_SHORT};
use crate::command::{Command, Outcome};
use crate::context::{CommandFrame, Context, Parameters};
use crate::error::{CommandError, RunError};
use crate::token::{Token, TokenKind, Tokens};
use crate::usage::render_usage;

/// What one level's walk ended with.
#[derive(Debug, PartialEq, Eq)]
enum Step {
    /// All tokens of the level were consumed.
    Finished,
    /// A subcommand was named at `index`.
    Enter { name: String, index: usize },
    /// `--help` or `-h` was given.
    Help,
}

/// Where the walk writes its bindings.
struct Bindings<'a> {
    flags: &'a mut HashSet<Flag>,
    options: &'a mut HashMap<Opt, String>,
    parameters: &'a mut Parameters,
}

pub(crate) fn dispatch(root: &Command, ctx: &mut Context) -> Result<Outcome, RunError> {
    let mut command = root;

    loop {
        match walk(command, ctx)? {
            Step::Finished => break,
            Step::Help => {
                debug!(command = ctx.current_command().name(), "help requested");
                let usage = render_usage(command, &ctx.command_names(), ctx.theme());
                ctx.print(usage);
                return Ok(Outcome::HelpRequested);
            }
            Step::Enter { name, index } => {
                debug!(subcommand = %name, index, "entering subcommand");
                // walk only reports names it found in this command.
                let Some(subcommand) = command.subcommand_named(&name) else {
                    return Err(CommandError::UnexpectedArgument(name).into());
                };
                ctx.command_path.push(CommandFrame::new(name, index));
                command = subcommand;
            }
        }
    }

    match command.handler_ref() {
        Some(handler) => {
            debug!(command = ctx.current_command().name(), "running handler");
            handler.handle(ctx)?;
        }
        None => {
            debug!(
                command = ctx.current_command().name(),
                "no handler, printing usage"
            );
            let usage = render_usage(command, &ctx.command_names(), ctx.theme());
            ctx.print(usage);
        }
    }

    Ok(Outcome::Completed)
}

fn walk(command: &Command, ctx: &mut Context) -> Result<Step, CommandError> {
    let boundary = ctx.boundary();
    let tokens = &ctx.tokens;
    let mut bindings = Bindings {
        flags: &mut ctx.flags,
        options: &mut ctx.options,
        parameters: &mut ctx.parameters,
    };

    for token in tokens.active().iter().filter(|token| token.index() > boundary) {
        let index = token.index();

        match token.kind() {
            TokenKind::Parameter(value) => {
                if is_option_value(command, tokens, boundary, index) {
                    trace!(index, value = %value, "consumed as option value");
                    continue;
                }
                if index == boundary + 1 && command.subcommand_named(value).is_some() {
                    return Ok(Step::Enter {
                        name: value.clone(),
                        index,
                    });
                }
                bind_positional(command, &mut bindings, value)?;
            }
            TokenKind::LongOption(name) => {
                if name == HELP_LONG {
                    return Ok(Step::Help);
                }
                if let Some(option) = find_long(command.options(), name) {
                    bind_option(option, tokens, index, &mut bindings)?;
                } else if let Some(flag) = find_long(command.flags(), name) {
                    set_flag(flag, &mut bindings);
                } else {
                    return Err(CommandError::UnexpectedArgument(name.clone()));
                }
            }
            TokenKind::ShortOption(short) => {
                if *short == HELP_SHORT {
                    return Ok(Step::Help);
                }
                resolve_short(command, *short, tokens, index, &mut bindings)?;
            }
            TokenKind::OptionSet(shorts) => {
                let Some((last, leading)) = shorts.split_last() else {
                    continue;
                };
                for short in leading {
                    match find_short(command.flags(), *short) {
                        Some(flag) => set_flag(flag, &mut bindings),
                        None => return Err(CommandError::UnexpectedArgument(short.to_string())),
                    }
                }
                resolve_short(command, *last, tokens, index, &mut bindings)?;
            }
        }
    }

    Ok(Step::Finished)
}

/// Whether the parameter at `index` directly follows an option of `command`
/// and therefore is that option's value. The token at `boundary` names the
/// command itself and is never an option.
fn is_option_value(command: &Command, tokens: &Tokens, boundary: usize, index: usize) -> bool {
    if index <= boundary + 1 {
        return false;
    }
    let options = command.options();
    match tokens.before(index).map(Token::kind) {
        Some(TokenKind::LongOption(name)) => find_long(options, name).is_some(),
        Some(TokenKind::ShortOption(short)) => find_short(options, *short).is_some(),
        Some(TokenKind::OptionSet(shorts)) => shorts
            .last()
            .is_some_and(|short| find_short(options, *short).is_some()),
        _ => false,
    }
}

/// Resolves a short name against options first, then flags.
fn resolve_short(
    command: &Command,
    short: char,
    tokens: &Tokens,
    index: usize,
    bindings: &mut Bindings<'_>,
) -> Result<(), CommandError> {
    if let Some(option) = find_short(command.options(), short) {
        bind_option(option, tokens, index, bindings)
    } else if let Some(flag) = find_short(command.flags(), short) {
        set_flag(flag, bindings);
        Ok(())
    } else {
        Err(CommandError::UnexpectedArgument(short.to_string()))
    }
}

fn bind_option(
    option: &Opt,
    tokens: &Tokens,
    index: usize,
    bindings: &mut Bindings<'_>,
) -> Result<(), CommandError> {
    let value = tokens
        .after(index)
        .and_then(Token::parameter)
        .ok_or_else(|| CommandError::MissingOperand(option.clone()))?;

    trace!(option = %option, value, "option bound");
    bindings.options.insert(option.clone(), value.to_string());
    Ok(())
}

fn set_flag(flag: &Flag, bindings: &mut Bindings<'_>) {
    trace!(flag = %flag, "flag set");
    bindings.flags.insert(flag.clone());
}

fn bind_positional(
    command: &Command,
    bindings: &mut Bindings<'_>,
    value: &str,
) -> Result<(), CommandError> {
    let unbound = command
        .parameters()
        .iter()
        .find(|parameter| !bindings.parameters.has_value(parameter));

    if let Some(parameter) = unbound {
        trace!(parameter = %parameter, value, "parameter bound");
        bindings.parameters.bind(parameter, value);
        Ok(())
    } else if let Some(variadic) = command.variadic_parameter() {
        trace!(parameter = %variadic, value, "variadic value added");
        bindings.parameters.push_variadic(value);
        Ok(())
    } else {
        Err(CommandError::UnexpectedArgument(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Flag, Opt, Parameter};

    fn walk_args(command: &Command, args: &[&str]) -> (Result<Step, CommandError>, Context) {
        let mut ctx = Context::new(args.iter().copied()).unwrap();
        let step = walk(command, &mut ctx);
        (step, ctx)
    }

    #[test]
    fn finishes_without_arguments() {
        let (step, ctx) = walk_args(&Command::new(""), &["tool"]);
        assert_eq!(step.unwrap(), Step::Finished);
        assert!(ctx.flags().is_empty());
    }

    #[test]
    fn reports_subcommand_at_boundary() {
        let command = Command::new("").subcommand("sub", Command::new(""));
        let (step, _) = walk_args(&command, &["tool", "sub", "x"]);
        assert_eq!(
            step.unwrap(),
            Step::Enter {
                name: "sub".into(),
                index: 1
            }
        );
    }

    #[test]
    fn help_stops_the_walk() {
        let flag = Flag::short('v', "");
        let command = Command::new("").flag(flag.clone());
        let (step, ctx) = walk_args(&command, &["tool", "-v", "--help", "--bogus"]);
        assert_eq!(step.unwrap(), Step::Help);
        assert!(ctx.is_set(&flag));
    }

    #[test]
    fn option_value_wins_over_subcommand() {
        let output = Opt::short('o', "");
        let command = Command::new("")
            .option(output.clone())
            .subcommand("sub", Command::new(""));
        let (step, ctx) = walk_args(&command, &["tool", "-o", "sub"]);
        assert_eq!(step.unwrap(), Step::Finished);
        assert_eq!(ctx.option_str(&output), Some("sub"));
    }

    #[test]
    fn value_after_a_flag_is_positional() {
        let command = Command::new("")
            .flag(Flag::long("force", ""))
            .parameter(Parameter::new("file", ""));
        let (step, ctx) = walk_args(&command, &["tool", "--force", "a.txt"]);
        assert_eq!(step.unwrap(), Step::Finished);
        assert_eq!(
            ctx.parameters().raw(&Parameter::new("file", "")),
            Some("a.txt")
        );
    }

    #[test]
    fn option_followed_by_option_is_missing_operand() {
        let command = Command::new("")
            .option(Opt::long("name", ""))
            .flag(Flag::long("dry-run", ""));
        let (step, _) = walk_args(&command, &["tool", "--name", "--dry-run"]);
        assert!(matches!(step, Err(CommandError::MissingOperand(_))));
    }

    #[test]
    fn dashed_executable_name_is_not_an_option() {
        let file = Parameter::new("file", "");
        let command = Command::new("")
            .option(Opt::short('l', ""))
            .parameter(file.clone());
        let (step, ctx) = walk_args(&command, &["-tool", "input.txt"]);
        assert_eq!(step.unwrap(), Step::Finished);
        assert_eq!(ctx.parameters().raw(&file), Some("input.txt"));
    }

    #[test]
    fn unknown_character_in_set() {
        let command = Command::new("").flag(Flag::short('a', ""));
        let (step, _) = walk_args(&command, &["tool", "-ax"]);
        assert!(matches!(step, Err(CommandError::UnexpectedArgument(c)) if c == "x"));

        let (step, _) = walk_args(&command, &["tool", "-xa"]);
        assert!(matches!(step, Err(CommandError::UnexpectedArgument(c)) if c == "x"));
    }

    #[test]
    fn option_inside_a_set_must_be_last() {
        let command = Command::new("")
            .flag(Flag::short('a', ""))
            .option(Opt::short('o', ""));
        let (step, _) = walk_args(&command, &["tool", "-oa", "x"]);
        assert!(matches!(step, Err(CommandError::UnexpectedArgument(c)) if c == "o"));
    }
}
