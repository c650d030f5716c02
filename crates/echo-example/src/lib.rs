//! `yecho`: prints messages, runs commands and asks questions.
//!
//! The command tree lives here so tests can drive it with a captured
//! [`Context`]; `main.rs` only sets up logging and runs it.
//!
//! ```text
//! yecho say [-v] [-u] [-n <n>] [message] [words...]
//! yecho exec [-d <path>] == program args...
//! yecho pick [choices...]
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use switchyard::{Command, CommandError, Context, Flag, HandlerResult, Opt, Parameter};

/// More lines than this need confirmation.
pub const CONFIRM_ABOVE: usize = 10;

pub fn app() -> Command {
    Command::new("Print messages and run commands")
        .subcommand("say", say())
        .subcommand("exec", exec())
        .subcommand("pick", pick())
}

fn say() -> Command {
    let verbose = Flag::both("verbose", 'v', "Report what is printed on standard error");
    let upper = Flag::both("upper", 'u', "Print in upper case");
    let count = Opt::both("count", 'n', "Print the message n times").placeholder("n");
    let message = Parameter::new("message", "Message to print");
    let words = Parameter::new("words", "More words appended to the message");

    Command::new("Print a message")
        .flag(verbose.clone())
        .flag(upper.clone())
        .option(count.clone())
        .parameter(message.clone())
        .variadic(words)
        .handler(move |ctx| {
            let mut text: String = ctx.required(&message)?;
            for word in ctx.variadic_values::<String>()? {
                text.push(' ');
                text.push_str(&word);
            }
            if ctx.is_set(&upper) {
                text = text.to_uppercase();
            }

            let times: usize = ctx.option(&count)?.unwrap_or(1);
            if times == 0 {
                return Ok(());
            }
            if times > CONFIRM_ABOVE && !ctx.confirm_or(&format!("Print {} lines?", times), false)? {
                tracing::info!(times, "declined");
                return Ok(());
            }

            if ctx.is_set(&verbose) {
                ctx.error(format!("printing {} line(s)", times));
            }
            ctx.print_items(std::iter::repeat(&text).take(times), "\n", "\n");
            Ok(())
        })
}

fn exec() -> Command {
    let dir = Opt::both("dir", 'd', "Directory to run in").placeholder("path");

    Command::new("Run the command given after ==")
        .option(dir.clone())
        .handler(move |ctx| run_passthrough(ctx, &dir))
}

fn run_passthrough(ctx: &mut Context, dir: &Opt) -> HandlerResult {
    if let Some(path) = ctx.option::<PathBuf>(dir)? {
        ctx.set_current_dir(path)?;
    }

    let Some((program, args)) = ctx.passthrough().split_first() else {
        return Err(CommandError::invalid_usage("nothing to run, pass a command after ==").into());
    };

    tracing::info!(program = %program, "running");
    let result = ctx
        .run(program, args.iter().cloned())
        .with_context(|| format!("failed to run {}", program))?;
    if !result.stdout().is_empty() {
        ctx.print(result.stdout());
    }
    if !result.stderr().is_empty() {
        ctx.error(result.stderr());
    }
    Ok(())
}

fn pick() -> Command {
    let choices = Parameter::new("choices", "Options to choose from");

    Command::new("Ask the user to pick one of the choices")
        .variadic(choices)
        .handler(|ctx| {
            let choices: Vec<String> = ctx.variadic_values()?;
            let default = choices.first().cloned();
            let picked = ctx.select(choices.as_slice(), default.as_deref(), "Pick one:")?;
            ctx.print(picked);
            Ok(())
        })
}
