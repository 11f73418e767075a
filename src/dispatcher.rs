use crate::command::{Command, CommandDef, Context, ExitCode, Registry};
use crate::help::print_help;
use crate::resolver::{self, Cursor};
use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{BufRead, Write};

/// Marker printed before each line is read.
const PROMPT: &str = ">> ";

/// The interactive command loop driver.
///
/// A `Dispatcher` owns the root command registry and a cooperative running
/// flag. Commands are registered with [`add_command`](Dispatcher::add_command)
/// (leaves and subtrees alike), then [`run`](Dispatcher::run) drives the loop
/// over caller-provided streams, or [`repl`](Dispatcher::repl) over an
/// interactive `rustyline` prompt with history.
///
/// Example
/// ```
/// use cli_commands::Dispatcher;
/// use cli_commands::command::{CommandDef, Context};
/// use std::io::Write;
///
/// let mut cli = Dispatcher::new();
/// cli.add_exit();
/// cli.add_command(
///     "greet",
///     "greets the argument",
///     CommandDef::action(|ctx: &mut Context, rest: &str| {
///         writeln!(ctx.out, "hello {rest}")?;
///         Ok(())
///     }),
/// );
///
/// let mut out: Vec<u8> = Vec::new();
/// let code = cli.run(&b"greet world\n"[..], &mut out).unwrap();
/// assert_eq!(code, 0);
/// assert_eq!(String::from_utf8(out).unwrap(), ">> hello world\n\n>> ");
/// ```
pub struct Dispatcher {
    commands: Registry,
    running: bool,
}

impl Dispatcher {
    /// Create a dispatcher with an empty registry, ready to run.
    pub fn new() -> Self {
        Self {
            commands: Registry::new(),
            running: true,
        }
    }

    /// Register a command under `name` at the root of the tree.
    ///
    /// `def` is either a leaf ([`CommandDef::action`]) or a nested subtree
    /// ([`CommandDef::group`], or a plain `Vec<NamedCommand>`). Registering a
    /// name twice replaces the earlier node: the last registration wins.
    pub fn add_command(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        def: impl Into<CommandDef>,
    ) {
        self.commands
            .insert(name.into(), Command::new(description, def));
    }

    /// Register the built-in `help` command, which prints the recursive
    /// listing of the whole tree. An ordinary registration; a caller may
    /// override it by registering another `help`.
    pub fn add_help(&mut self) {
        self.add_command(
            "help",
            "Prints this message",
            CommandDef::action(|ctx: &mut Context, _rest: &str| {
                let commands = ctx.commands;
                print_help(ctx.out, commands, 0)?;
                Ok(())
            }),
        );
    }

    /// Register the built-in `exit` command, which ends the run loop at the
    /// next iteration boundary. An ordinary registration, like `help`.
    pub fn add_exit(&mut self) {
        self.add_command(
            "exit",
            "Exits the program",
            CommandDef::action(|ctx: &mut Context, _rest: &str| {
                ctx.stop();
                Ok(())
            }),
        );
    }

    /// Drive the dispatch loop over the given streams until `exit` is run or
    /// the input is exhausted (both are normal termination).
    ///
    /// Each iteration prints the prompt, reads one line, resolves it against
    /// the command tree and reports unresolved lines, then prints a trailing
    /// blank line. Returns the exit code, 0 on normal termination.
    pub fn run(&mut self, input: impl BufRead, mut output: impl Write) -> Result<ExitCode> {
        let mut lines = input.lines();
        while self.running {
            write!(output, "{PROMPT}")?;
            output.flush()?;

            let Some(line) = lines.next() else { break };
            self.dispatch_line(&line?, &mut output)?;
        }
        Ok(0)
    }

    /// Interactive variant of [`run`](Dispatcher::run): reads lines with a
    /// `rustyline` editor (history included) and writes to stdout.
    /// Ctrl-C and Ctrl-D end the loop like exhausted input.
    pub fn repl(&mut self) -> Result<ExitCode> {
        let mut rl = DefaultEditor::new()?;
        let mut out = std::io::stdout();
        while self.running {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    rl.add_history_entry(line.as_str())?;
                    self.dispatch_line(&line, &mut out)?;
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            }
        }
        Ok(0)
    }

    /// Resolve one line against the root registry and report the outcome.
    ///
    /// A failed resolution prints the unknown-command message with the
    /// partial path; a failed action prints the action's error text. Either
    /// way the loop goes on, so only stream errors propagate.
    fn dispatch_line(&mut self, line: &str, out: &mut dyn Write) -> Result<()> {
        let mut cursor = Cursor::new(line);
        let resolved = {
            let mut ctx = Context {
                out: &mut *out,
                commands: &self.commands,
                running: &mut self.running,
            };
            resolver::resolve(&self.commands, &mut cursor, &mut ctx)
        };
        match resolved {
            Ok(true) => {}
            Ok(false) => {
                writeln!(out, "Unknown command '{}'.", cursor.path())?;
                writeln!(out, "For usage enter 'help'.")?;
            }
            Err(err) => writeln!(out, "{err}")?,
        }
        writeln!(out)?;
        Ok(())
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
