use crate::env::Environment;
use crate::lexer::CommandLine;
use anyhow::Result;
use std::io::Write;
use std::process::Stdio;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
pub type ExitCode = i32;

/// Abstraction over a writable output stream that can also be converted into
/// a [`Stdio`] handle for spawning external processes.
///
/// A blanket implementation exists for any type that implements `Write` and
/// `Into<Stdio>` (e.g. `std::io::Stdout` or `std::io::Stderr`).
pub trait Stdout: Write {
    /// Convert this output into a [`Stdio`] handle suitable for `std::process::Command`.
    fn stdio(self: Box<Self>) -> Stdio;
}

impl<T: Write + Into<Stdio>> Stdout for T {
    fn stdio(self: Box<Self>) -> Stdio {
        (*self).into()
    }
}

/// Output streams handed to a single command.
///
/// Standard input is never redirected: external programs always inherit the
/// interpreter's own, and no builtin reads it.
pub struct Streams {
    pub stdout: Box<dyn Stdout>,
    pub stderr: Box<dyn Stdout>,
}

impl Streams {
    pub fn new(stdout: Box<dyn Stdout>, stderr: Box<dyn Stdout>) -> Self {
        Self { stdout, stderr }
    }

    /// The interpreter's own standard output and error.
    pub fn inherit() -> Self {
        Self::new(Box::new(std::io::stdout()), Box::new(std::io::stderr()))
    }
}

/// Object-safe trait for any command that can be executed by the shell.
///
/// This is implemented by built-ins via a blanket impl and by external commands.
pub trait ExecutableCommand {
    /// Executes the command, returning its exit status.
    fn execute(self: Box<Self>, streams: Streams, env: &mut Environment) -> Result<ExitCode>;
}

/// Factory that tries to create a command from a tokenized line.
///
/// Returns `None` when the factory doesn't recognize the command name.
/// Implementations can use the environment to resolve executables (e.g., using PATH).
pub trait CommandFactory {
    /// Attempt to create a command instance for `line`, which is never empty.
    fn try_create(
        &self,
        env: &Environment,
        line: &CommandLine<'_>,
    ) -> Option<Box<dyn ExecutableCommand>>;
}
