use crate::command::{CommandFactory, ExitCode, Streams};
use crate::env::Environment;
use crate::lexer::CommandLine;
use anyhow::Context;
use std::io::{BufRead, Write};
use tracing::debug;

/// Prompt printed before every read.
pub const PROMPT: &str = "$ ";

/// Factory allows creating instances of ExecutableCommand.
///
/// Only support commands defined in this crate — BuiltinCommand and ExternalCommand.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// A minimal interactive interpreter for builtins and external programs.
///
/// The interpreter maintains an [`Environment`] and a list of [`CommandFactory`]
/// objects that are queried in order for every line. See [`Default`] for the
/// factories included out of the box.
///
/// Example
/// ```
/// use myshell::{Interpreter, MemWriter, Streams};
/// let mut sh = Interpreter::default();
/// let out = MemWriter::new();
/// let streams = Streams::new(Box::new(out.clone()), Box::new(MemWriter::new()));
/// let code = sh.eval("echo hello  world", streams).unwrap();
/// assert_eq!(code, 0);
/// assert_eq!(out.contents(), "hello  world\n");
/// ```
pub struct Interpreter {
    env: Environment,
    commands: Vec<Box<dyn CommandFactory>>,
}

impl Interpreter {
    /// Create a new interpreter with a custom set of command factories.
    pub fn new(commands: Vec<Box<dyn CommandFactory>>) -> Self {
        Self::with_env(Environment::new(), commands)
    }

    /// Create an interpreter that runs against a prepared environment.
    pub fn with_env(env: Environment, commands: Vec<Box<dyn CommandFactory>>) -> Self {
        Self { env, commands }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// Dispatch a single input line.
    ///
    /// Blank lines do nothing. A line nobody recognizes is reported on the
    /// error stream as `<line>: command not found`. Returns the exit status of
    /// whatever ran; it is informational only and never becomes the shell's
    /// own status.
    pub fn eval(&mut self, line: &str, mut streams: Streams) -> anyhow::Result<ExitCode> {
        let line = CommandLine::parse(line);
        if line.is_empty() {
            return Ok(0);
        }

        for factory in &self.commands {
            if let Some(cmd) = factory.try_create(&self.env, &line) {
                debug!(command = line.name(), "dispatching");
                return cmd.execute(streams, &mut self.env);
            }
        }

        debug!(command = line.name(), "command not found");
        writeln!(streams.stderr, "{}: command not found", line.raw())?;
        Ok(127)
    }

    /// Read-Eval-Print Loop.
    ///
    /// Prints [`PROMPT`] to `prompt`, reads one line from `input` and
    /// dispatches it with fresh streams from `streams`, until end-of-input or
    /// `exit`. Returns the status the process should exit with. Bytes that are
    /// not valid UTF-8 are replaced with U+FFFD. Read failures other than
    /// end-of-input are returned as errors.
    pub fn repl<R, W, F>(&mut self, mut input: R, mut prompt: W, mut streams: F) -> anyhow::Result<ExitCode>
    where
        R: BufRead,
        W: Write,
        F: FnMut() -> Streams,
    {
        let mut buf = Vec::new();
        loop {
            write!(prompt, "{PROMPT}")?;
            prompt.flush()?;

            buf.clear();
            let read = input.read_until(b'\n', &mut buf).context("failed to read input")?;
            if read == 0 {
                // Keep the terminal tidy after ^D.
                writeln!(prompt)?;
                prompt.flush()?;
                return Ok(0);
            }

            // Invalid UTF-8 must not end the session.
            let line = String::from_utf8_lossy(&buf);
            if let Err(e) = self.eval(&line, streams()) {
                debug!(error = %e, "command failed");
                let mut err = streams().stderr;
                writeln!(err, "{e:#}")?;
            }

            if self.env.should_exit {
                return Ok(self.env.exit_code);
            }
        }
    }
}

impl Default for Interpreter {
    /// Create an interpreter with the default set of commands:
    /// - built-ins: `cd`, `echo`, `exit`, `pwd`, `type`
    /// - external command launcher
    fn default() -> Self {
        use crate::builtin::*;
        use crate::external::ExternalCommand;
        Self::new(vec![
            Box::new(Factory::<Cd>::default()),
            Box::new(Factory::<Echo>::default()),
            Box::new(Factory::<Exit>::default()),
            Box::new(Factory::<Pwd>::default()),
            Box::new(Factory::<Type>::default()),
            Box::new(Factory::<ExternalCommand>::default()),
        ])
    }
}
