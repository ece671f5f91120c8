//! A small interactive command interpreter.
//!
//! Each input line is split on spaces and dispatched either to a builtin
//! (`cd`, `echo`, `exit`, `pwd`, `type`) implemented in-process, or to an
//! external program found on `PATH` and run with the interpreter's own
//! standard streams. There is no quoting, expansion, redirection or job
//! control.
//!
//! The main entry point is [`Interpreter`]: [`Interpreter::repl`] drives the
//! prompt/read/dispatch loop and [`Interpreter::eval`] runs a single line.
//! The public modules [`command`] and [`env`] expose the traits and the
//! execution context used to plug in additional commands.

mod builtin;
pub mod command;
pub mod env;
pub mod error;
mod external;
mod interpreter;
mod io_adapters;
pub mod lexer;

pub use builtin::{BUILTIN_NAMES, is_builtin};
pub use command::{ExitCode, Streams};
pub use external::{find_command_path, find_in_path};
pub use interpreter::{Interpreter, PROMPT};
pub use io_adapters::MemWriter;
