use std::collections::HashMap;
use std::env as stdenv;
use std::path::PathBuf;

/// Mutable view of the process state that commands run against.
///
/// The environment contains:
/// - `vars`: variables set by the shell itself. Lookups fall back to the live
///   process environment, so `PATH` and `HOME` are always read fresh.
/// - `current_dir`: the working directory, kept in sync with the process by `cd`.
/// - `should_exit`: set by `exit`; the REPL stops after the current line.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Variable overrides, consulted before the process environment.
    pub vars: HashMap<String, String>,
    /// The current working directory for command execution.
    pub current_dir: PathBuf,
    /// When set to true, indicates that an interactive loop should exit.
    pub should_exit: bool,
    /// Status to exit with once `should_exit` is set.
    pub exit_code: i32,
}

impl Environment {
    /// Capture the current working directory of the process.
    ///
    /// No variables are copied: reads go straight to the process environment
    /// unless overridden with [`Environment::set_var`].
    pub fn new() -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            vars: HashMap::new(),
            current_dir,
            should_exit: false,
            exit_code: 0,
        }
    }

    /// Get the value of an environment variable.
    ///
    /// Looks up the key in `self.vars` first, falling back to `std::env::var`.
    pub fn get_var(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .cloned()
            .or_else(|| stdenv::var(key).ok())
    }

    /// Set or override a variable for this shell and the programs it starts.
    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }

    /// Ask the interactive loop to stop with `code`.
    pub fn request_exit(&mut self, code: i32) {
        self.should_exit = true;
        self.exit_code = code;
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
