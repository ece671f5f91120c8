use std::io;
use std::num::ParseIntError;
use thiserror::Error;

/// Recoverable failures reported by builtins.
///
/// Each variant renders as a single diagnostic line prefixed with the name of
/// the builtin that produced it. None of them stop the interpreter.
#[derive(Debug, Error)]
pub enum BuiltinError {
    #[error("{0}: too many arguments")]
    TooManyArguments(&'static str),
    #[error("{0}: too few arguments")]
    TooFewArguments(&'static str),
    #[error("exit: could not parse exit code from '{arg}': {source}")]
    InvalidExitCode { arg: String, source: ParseIntError },
    #[error("cd: {0}: No such file or directory")]
    NoSuchFileOrDirectory(String),
    #[error("cd: not a directory: {0}")]
    NotADirectory(String),
    #[error("cd: HOME not set")]
    HomeNotSet,
    #[error("pwd: {0}")]
    CurrentDir(io::Error),
    #[error("{command}: {path}: {source}")]
    Io {
        command: &'static str,
        path: String,
        source: io::Error,
    },
}
