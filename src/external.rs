use crate::command::{CommandFactory, ExecutableCommand, ExitCode, Streams};
use crate::env::Environment;
use crate::interpreter::Factory;
use crate::lexer::CommandLine;
use anyhow::{Context, Result};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tracing::{debug, warn};

/// Command that is not a builtin.
pub struct ExternalCommand {
    name: OsString,
    path: PathBuf,
    args: Vec<OsString>,
}

impl ExternalCommand {
    pub fn new(name: OsString, path: PathBuf, args: Vec<OsString>) -> Self {
        Self { name, path, args }
    }
}

impl CommandFactory for Factory<ExternalCommand> {
    fn try_create(
        &self,
        env: &Environment,
        line: &CommandLine<'_>,
    ) -> Option<Box<dyn ExecutableCommand>> {
        let name = line.name()?;
        let search_path = env.get_var("PATH");
        let path = find_command_path(search_path.as_deref(), &env.current_dir, name)?;
        Some(Box::new(ExternalCommand::new(
            name.into(),
            path,
            line.args().iter().map(OsString::from).collect(),
        )))
    }
}

impl ExecutableCommand for ExternalCommand {
    fn execute(self: Box<Self>, streams: Streams, env: &mut Environment) -> Result<ExitCode> {
        let mut cmd = std::process::Command::new(&self.path);
        set_arg0(&mut cmd, &self.name);
        cmd.args(&self.args)
            .stdin(Stdio::inherit())
            .stdout(streams.stdout.stdio())
            .stderr(streams.stderr.stdio())
            .envs(env.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .current_dir(&env.current_dir);

        // Anything buffered on our side must land before the child writes.
        std::io::stdout().flush()?;

        debug!(path = %self.path.display(), args = ?self.args, "spawning external command");
        let mut child = cmd
            .spawn()
            .with_context(|| self.name.to_string_lossy().into_owned())?;
        let exit_status = child.wait()?;
        let code = match exit_status.code() {
            Some(x) => x,
            None => terminated_by_signal(exit_status),
        };
        debug!(path = %self.path.display(), code, "external command finished");
        Ok(code)
    }
}

#[cfg(unix)]
fn set_arg0(cmd: &mut std::process::Command, name: &OsStr) {
    use std::os::unix::process::CommandExt;
    cmd.arg0(name);
}

#[cfg(not(unix))]
fn set_arg0(_cmd: &mut std::process::Command, _name: &OsStr) {}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> i32 {
    -1
}

/// Resolve a command name to an absolute path the way the shell runs it.
///
/// Every name is looked up in `search_path` with [`find_in_path`], including
/// names that contain `/`; those never match a directory entry. An empty name
/// or an unset search path finds nothing.
pub fn find_command_path(search_path: Option<&str>, cwd: &Path, name: &str) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }
    find_in_path(search_path?, cwd, OsStr::new(name))
}

/// Search the colon-separated `search_path` for an entry named exactly `cmd`.
///
/// Candidates are tried in order and the first match wins. Relative and empty
/// candidates are resolved against `cwd`. Missing candidates and candidates
/// that are not directories are skipped, and so are directories that cannot
/// be listed: one unreadable entry must not hide the ones after it.
pub fn find_in_path(search_path: &str, cwd: &Path, cmd: &OsStr) -> Option<PathBuf> {
    for candidate in search_path.split(':') {
        let dir = match std::path::absolute(cwd.join(candidate)) {
            Ok(dir) => dir,
            Err(e) => {
                warn!(candidate, error = %e, "couldn't convert search path entry to an absolute path");
                continue;
            }
        };

        match fs::metadata(&dir) {
            Ok(meta) if meta.is_dir() => {}
            _ => continue,
        }

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "skipping unreadable search path entry");
                continue;
            }
        };
        if let Some(entry) = entries.flatten().find(|entry| entry.file_name() == cmd) {
            return Some(dir.join(entry.file_name()));
        }
    }
    None
}
