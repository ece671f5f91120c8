use myshell::{Interpreter, Streams};
use std::io;
use std::process;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    // Diagnostics go to stderr so they never mix with command output.
    // RUST_LOG overrides the default level.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let mut shell = Interpreter::default();
    match shell.repl(io::stdin().lock(), io::stdout(), Streams::inherit) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}
