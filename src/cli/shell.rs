use std::{
    borrow::Cow,
    io::{self, BufRead},
};

use colored::Colorize;
use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use tracing::{debug, warn};

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::io as cli_io;

const SCRIPT_ENV: &str = "BITTRIP_CLI_SCRIPT";

/// Runs the shell, reading commands from stdin when `BITTRIP_CLI_SCRIPT` is set.
pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    debug!(?mode, "shell started");

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context, io::stdin().lock()),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::from_context(context)));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    cli_io::print_info("Welcome to BitTrip. Type `help` to list commands.");

    while context.running {
        let input = match editor.readline(&context.prompt()) {
            Ok(input) => input,
            Err(ReadlineError::Interrupted) if context.confirm_exit()? => break,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => {
                cli_io::print_info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        };

        if !input.trim().is_empty() {
            editor.add_history_entry(input.trim()).ok();
        }
        if execute(context, &input)? == LoopControl::Exit {
            break;
        }
    }

    Ok(())
}

/// Runs every line of `input` in order. A failing command is reported with
/// its line number and the script carries on.
fn run_script(context: &mut ShellContext, input: impl BufRead) -> Result<(), CliError> {
    for (number, line) in input.lines().enumerate() {
        let line = line?;
        match handle_line(context, &line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => {
                warn!(line = number + 1, error = %err, "script command failed");
                cli_io::print_warning(format!("line {}: {}", number + 1, line.trim()));
                context.report_error(err)?;
            }
        }
        if !context.running {
            break;
        }
    }
    Ok(())
}

fn execute(context: &mut ShellContext, line: &str) -> Result<LoopControl, CliError> {
    match handle_line(context, line) {
        Ok(control) => Ok(control),
        Err(err) => {
            context.report_error(err)?;
            Ok(LoopControl::Continue)
        }
    }
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let command = match CommandLine::parse(line) {
        Ok(Some(command)) => command,
        Ok(None) => return Ok(LoopControl::Continue),
        Err(err) => {
            cli_io::print_warning(format!("Could not read `{}`: {}", line.trim(), err));
            return Ok(LoopControl::Continue);
        }
    };

    let control = context.dispatch(&command.name(), command.raw_name(), &command.args())?;
    if control == LoopControl::Exit {
        context.running = false;
    }
    Ok(control)
}

/// A tokenized shell line: the command word followed by its arguments.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct CommandLine {
    tokens: Vec<String>,
}

impl CommandLine {
    /// Splits `input` with shell quoting rules. Blank lines and `#` comments
    /// yield `None`.
    pub(crate) fn parse(input: &str) -> Result<Option<Self>, shell_words::ParseError> {
        let tokens = shell_words::split(input)?;
        match tokens.first() {
            None => Ok(None),
            Some(first) if first.starts_with('#') => Ok(None),
            Some(_) => Ok(Some(Self { tokens })),
        }
    }

    pub(crate) fn raw_name(&self) -> &str {
        &self.tokens[0]
    }

    pub(crate) fn name(&self) -> String {
        self.raw_name().to_lowercase()
    }

    pub(crate) fn args(&self) -> Vec<&str> {
        self.tokens[1..].iter().map(String::as_str).collect()
    }
}

/// Completion, usage hints, and quote checking for the interactive editor.
struct CommandHelper {
    /// `(name, usage)` pairs sorted by name.
    commands: Vec<(String, &'static str)>,
}

impl CommandHelper {
    fn from_context(context: &ShellContext) -> Self {
        Self::new(
            context
                .registry
                .list()
                .into_iter()
                .map(|entry| (entry.name, entry.usage)),
        )
    }

    fn new(entries: impl IntoIterator<Item = (&'static str, &'static str)>) -> Self {
        let mut commands: Vec<(String, &'static str)> = entries
            .into_iter()
            .map(|(name, usage)| (name.to_ascii_lowercase(), usage))
            .collect();
        commands.sort();
        commands.dedup_by(|a, b| a.0 == b.0);
        Self { commands }
    }

    fn candidates(&self, needle: &str) -> Vec<Pair> {
        self.commands
            .iter()
            .filter(|(name, _)| name.starts_with(needle))
            .map(|(name, _)| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect()
    }

    /// The argument part of a command's usage, shown once its name is typed.
    fn usage_hint(&self, line: &str) -> Option<String> {
        let name = line.strip_suffix(' ')?.trim_start().to_ascii_lowercase();
        if name.contains(char::is_whitespace) {
            return None;
        }
        self.commands
            .iter()
            .find(|(command, _)| *command == name)
            .and_then(|(command, usage)| usage.strip_prefix(command.as_str()))
            .map(|rest| rest.trim_start().to_string())
            .filter(|rest| !rest.is_empty())
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);

        // Arguments are free text; only the command word completes.
        let candidates = if prefix[..start].trim().is_empty() {
            self.candidates(&prefix[start..].to_ascii_lowercase())
        } else {
            Vec::new()
        };
        Ok((start, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &ReadlineContext<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        self.usage_hint(line)
    }
}

impl Highlighter for CommandHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(hint.dimmed().to_string())
    }
}

impl Validator for CommandHelper {
    fn validate(&self, ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        match shell_words::split(ctx.input()) {
            Ok(_) => Ok(ValidationResult::Valid(None)),
            Err(_) => Ok(ValidationResult::Invalid(Some(
                "  (unbalanced quotes)".to_string(),
            ))),
        }
    }
}
