//! End-to-end tests that drive the `myshell` binary over its standard streams.

use std::fs;
use std::io::Write;
use std::process::{Command, Output, Stdio};

/// Feed `input` to a fresh shell and collect everything it printed.
fn run_shell(input: impl AsRef<[u8]>, configure: impl FnOnce(&mut Command)) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_myshell"));
    cmd.env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    configure(&mut cmd);

    let mut child = cmd.spawn().expect("failed to start myshell");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_ref())
        .expect("failed to write input");
    child.wait_with_output().expect("failed to wait for myshell")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn eof_exits_cleanly() {
    let output = run_shell("", |_| {});
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "$ \n");
}

#[test]
fn blank_lines_just_prompt_again() {
    let output = run_shell("\n   \n", |_| {});
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "$ $ $ \n");
    assert!(stderr(&output).is_empty());
}

#[test]
fn bare_exit_is_success() {
    let output = run_shell("exit\necho unreachable\n", |_| {});
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "$ ");
}

#[test]
fn exit_with_status() {
    let output = run_shell("exit 42\n", |_| {});
    assert_eq!(output.status.code(), Some(42));
}

#[test]
fn bad_exit_keeps_running() {
    let output = run_shell("exit abc\nexit 1 2\necho alive\n", |_| {});
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "$ $ $ alive\n$ \n");
    let err = stderr(&output);
    assert!(err.contains("exit: could not parse exit code from 'abc'"), "{err}");
    assert!(err.contains("exit: too many arguments"), "{err}");
}

#[test]
fn echo_keeps_spacing() {
    let output = run_shell("echo   hello   world\n", |_| {});
    assert_eq!(stdout(&output), "$   hello   world\n$ \n");
}

#[test]
fn unknown_command_reports_whole_line() {
    let output = run_shell("nonexistent_cmd_xyz a  b\n", |cmd| {
        cmd.env("PATH", "/definitely/not/here");
    });
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        stderr(&output),
        "nonexistent_cmd_xyz a  b: command not found\n"
    );
}

#[test]
fn cd_and_pwd() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("file.txt"), "x").unwrap();
    let sub = fs::canonicalize(dir.path().join("sub")).unwrap();

    let output = run_shell("cd missing\ncd file.txt\ncd sub\npwd\n", |cmd| {
        cmd.current_dir(dir.path());
    });

    assert_eq!(stdout(&output), format!("$ $ $ $ {}\n$ \n", sub.display()));
    assert_eq!(
        stderr(&output),
        "cd: missing: No such file or directory\ncd: not a directory: file.txt\n"
    );
}

#[test]
fn bare_cd_goes_home() {
    let home = tempfile::tempdir().unwrap();
    let canonical_home = fs::canonicalize(home.path()).unwrap();

    let output = run_shell("cd\npwd\n", |cmd| {
        cmd.env("HOME", home.path()).current_dir("/");
    });

    assert_eq!(
        stdout(&output),
        format!("$ $ {}\n$ \n", canonical_home.display())
    );
}

#[test]
fn type_reports_builtins_programs_and_misses() {
    let bin = tempfile::tempdir().unwrap();
    fs::write(bin.path().join("frobnicate"), "").unwrap();
    let expected = bin.path().join("frobnicate");

    let output = run_shell(
        "type cd\ntype frobnicate\ntype nonexistent_cmd_xyz\n",
        |cmd| {
            cmd.env("PATH", bin.path());
        },
    );

    assert_eq!(
        stdout(&output),
        format!(
            "$ cd is a shell builtin\n$ frobnicate is {}\n$ nonexistent_cmd_xyz: not found\n$ \n",
            expected.display()
        )
    );
}

#[cfg(unix)]
#[test]
fn runs_external_programs_with_arguments() {
    use std::os::unix::fs::PermissionsExt;

    let bin = tempfile::tempdir().unwrap();
    let script = bin.path().join("greet");
    fs::write(&script, "#!/bin/sh\necho \"hi $1 from $0\"\nexit 3\n").unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let path = format!("{}:/bin:/usr/bin", bin.path().display());
    let output = run_shell("greet there\necho after\n", |cmd| {
        cmd.env("PATH", &path);
    });

    // The child's status never becomes the shell's.
    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert!(out.contains("hi there from"), "{out}");
    assert!(out.contains("after\n"), "{out}");
}

#[test]
fn relative_search_path_entries_use_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("tools")).unwrap();
    fs::write(dir.path().join("tools").join("thing"), "").unwrap();
    let expected = fs::canonicalize(dir.path())
        .unwrap()
        .join("tools")
        .join("thing");

    let output = run_shell("type thing\n", |cmd| {
        cmd.env("PATH", "tools").current_dir(fs::canonicalize(dir.path()).unwrap());
    });

    assert_eq!(
        stdout(&output),
        format!("$ thing is {}\n$ \n", expected.display())
    );
}

#[test]
fn invalid_utf8_input_does_not_end_the_session() {
    let output = run_shell(&b"echo caf\xe9\necho still alive\n"[..], |_| {});
    assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
    assert!(stdout(&output).contains("still alive\n"), "{}", stdout(&output));
    assert!(stderr(&output).is_empty(), "{}", stderr(&output));
}

#[test]
fn slash_names_go_through_the_search_path() {
    let output = run_shell("type /bin/true\n/bin/echo ran\n", |cmd| {
        cmd.env("PATH", "/definitely/not/here");
    });
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "$ /bin/true: not found\n$ $ \n");
    assert_eq!(stderr(&output), "/bin/echo ran: command not found\n");
}
