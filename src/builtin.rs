use crate::command::{CommandFactory, ExecutableCommand, ExitCode, Streams};
use crate::env::Environment;
use crate::error::BuiltinError;
use crate::external::find_command_path;
use crate::interpreter::Factory;
use crate::lexer::CommandLine;
use anyhow::Result;
use argh::FromArgs;
use std::env;
use std::fs;
use std::io::{ErrorKind, Write};
use tracing::debug;

/// Names of every builtin, used for membership queries by `type`.
///
/// Must stay sorted: lookups use binary search.
pub const BUILTIN_NAMES: [&str; 5] = ["cd", "echo", "exit", "pwd", "type"];

/// Whether `name` is implemented inside the shell.
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_NAMES.binary_search(&name).is_ok()
}

/// Built-in commands known to the shell at compile time.
///
/// Builtins run in-process without spawning a child. Most of them parse their
/// arguments with [`argh`] through [`parse_args`]; argument and execution
/// errors are printed to the error stream and never stop the interpreter.
pub(crate) trait BuiltinCommand: Sized {
    /// Canonical name of the command, e.g. "echo" or "cd".
    fn name() -> &'static str;

    /// Build the command from a line whose first token is [`Self::name`].
    fn parse(line: &CommandLine<'_>) -> Result<Self, BuiltinError>;

    /// Executes the command using the provided output stream and environment.
    ///
    /// Return value should follow shell conventions: 0 for success, non-zero for error.
    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode>;
}

/// Parse the arguments of `line` into `T`.
///
/// A `--` goes first so that every token, including ones like `-5` or
/// `--help`, reaches the builtin as a plain positional argument. With options
/// ended and every positional optional, the only way argh can reject the line
/// is a surplus positional.
pub(crate) fn parse_args<T: BuiltinCommand + FromArgs>(line: &CommandLine<'_>) -> Result<T, BuiltinError> {
    let mut args = Vec::with_capacity(line.args().len() + 1);
    args.push("--");
    args.extend_from_slice(line.args());
    T::from_args(&[T::name()], &args).map_err(|early| {
        debug!(builtin = T::name(), output = early.output.trim_end(), "rejected arguments");
        BuiltinError::TooManyArguments(T::name())
    })
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(self: Box<Self>, mut streams: Streams, env: &mut Environment) -> Result<ExitCode> {
        debug!(builtin = T::name(), "running builtin");
        match BuiltinCommand::execute(*self, &mut streams.stdout, env) {
            Ok(x) => Ok(x),
            Err(e) => {
                writeln!(streams.stderr, "{e}")?;
                Ok(1)
            }
        }
    }
}

/// A builtin line whose arguments were rejected before anything ran.
struct InvalidArgs(BuiltinError);

impl ExecutableCommand for InvalidArgs {
    fn execute(self: Box<Self>, mut streams: Streams, _env: &mut Environment) -> Result<ExitCode> {
        writeln!(streams.stderr, "{}", self.0)?;
        Ok(1)
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(
        &self,
        _env: &Environment,
        line: &CommandLine<'_>,
    ) -> Option<Box<dyn ExecutableCommand>> {
        if line.name()? != T::name() {
            return None;
        }
        Some(match T::parse(line) {
            Ok(cmd) => Box::new(cmd),
            Err(e) => Box::new(InvalidArgs(e)),
        })
    }
}

#[derive(FromArgs)]
/// Exit the shell, optionally with a status code.
pub struct Exit {
    #[argh(positional)]
    /// exit status as a base-10 integer; defaults to 0.
    pub code: Option<String>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn parse(line: &CommandLine<'_>) -> Result<Self, BuiltinError> {
        parse_args(line)
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let code = match self.code {
            None => 0,
            Some(arg) => match arg.parse::<i64>() {
                Ok(code) => code as ExitCode,
                Err(source) => return Err(BuiltinError::InvalidExitCode { arg, source }.into()),
            },
        };
        env.request_exit(code);
        Ok(code)
    }
}

/// Write the rest of the command line to standard output.
///
/// Spacing between words is kept exactly as typed: only the `echo` token and
/// one separating space are dropped.
pub struct Echo {
    pub text: String,
}

impl BuiltinCommand for Echo {
    fn name() -> &'static str {
        "echo"
    }

    fn parse(line: &CommandLine<'_>) -> Result<Self, BuiltinError> {
        Ok(Echo {
            text: line.echo_text().to_owned(),
        })
    }

    fn execute(self, stdout: &mut dyn Write, _env: &mut Environment) -> Result<ExitCode> {
        writeln!(stdout, "{}", self.text)?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Print the current working directory to standard output.
pub struct Pwd {}

impl BuiltinCommand for Pwd {
    fn name() -> &'static str {
        "pwd"
    }

    fn parse(line: &CommandLine<'_>) -> Result<Self, BuiltinError> {
        parse_args(line)
    }

    fn execute(self, stdout: &mut dyn Write, _env: &mut Environment) -> Result<ExitCode> {
        let dir = env::current_dir().map_err(BuiltinError::CurrentDir)?;
        writeln!(stdout, "{}", dir.to_string_lossy())?;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Change the current working directory.
/// If no target is provided, or the target is `~`, changes to the directory
/// specified by the HOME environment variable.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to; absolute or relative to the current directory.
    pub target: Option<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn parse(line: &CommandLine<'_>) -> Result<Self, BuiltinError> {
        parse_args(line)
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let target = match self.target.filter(|t| t != "~") {
            Some(t) => t,
            None => env
                .get_var("HOME")
                .filter(|home| !home.is_empty())
                .ok_or(BuiltinError::HomeNotSet)?,
        };

        let new_dir = env.current_dir.join(&target);
        match fs::metadata(&new_dir) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(BuiltinError::NotADirectory(target).into()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(BuiltinError::NoSuchFileOrDirectory(target).into());
            }
            Err(source) => {
                return Err(BuiltinError::Io {
                    command: "cd",
                    path: target,
                    source,
                }
                .into());
            }
        }

        env::set_current_dir(&new_dir).map_err(|source| BuiltinError::Io {
            command: "cd",
            path: target.clone(),
            source,
        })?;
        env.current_dir = env::current_dir().unwrap_or(new_dir);
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Describe how a command name would be interpreted.
pub struct Type {
    #[argh(positional)]
    /// command name to look up.
    pub name: Option<String>,
}

impl BuiltinCommand for Type {
    fn name() -> &'static str {
        "type"
    }

    fn parse(line: &CommandLine<'_>) -> Result<Self, BuiltinError> {
        parse_args(line)
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        let name = self.name.ok_or(BuiltinError::TooFewArguments("type"))?;

        if is_builtin(&name) {
            writeln!(stdout, "{name} is a shell builtin")?;
            return Ok(0);
        }
        let search_path = env.get_var("PATH");
        match find_command_path(search_path.as_deref(), &env.current_dir, &name) {
            Some(path) => {
                writeln!(stdout, "{name} is {}", path.display())?;
                Ok(0)
            }
            None => {
                writeln!(stdout, "{name}: not found")?;
                Ok(1)
            }
        }
    }
}
