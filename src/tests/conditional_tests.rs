use std::env;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

use super::{shell, shell_with_env};
use crate::executor::snapshot_env;

#[test]
fn test_and_does_not_short_circuit() {
    let (mut executor, out, err) = shell();
    executor.execute_line("false && echo hi");

    assert_eq!(out.contents(), "hi\n");
    assert!(err.contents().starts_with("Error executing false"));
}

#[test]
fn test_or_runs_every_segment() {
    let (mut executor, out, _) = shell();
    executor.execute_line("echo a || echo b");
    assert_eq!(out.contents(), "a\nb\n");
}

#[test]
fn test_mixed_operators_run_in_order() {
    let (mut executor, out, _) = shell();
    executor.execute_line("echo a && echo b || echo c && echo d");
    assert_eq!(out.contents(), "a\nb\nc\nd\n");
}

#[test]
fn test_echo_output() {
    let (mut executor, out, err) = shell();
    executor.execute_line("echo a b c");
    executor.execute_line("echo    spaced     out");
    assert_eq!(out.contents(), "a b c\nspaced out\n");
    assert_eq!(err.contents(), "");
}

#[test]
fn test_variable_expansion() {
    let mut env = snapshot_env();
    env.insert("GREETING".to_string(), "hello".to_string());
    let (mut executor, out, _) = shell_with_env(env);

    executor.execute_line("echo $GREETING world && echo $GREETINGS");
    assert_eq!(out.contents(), "hello world\nhelloS\n");
}

#[test]
fn test_unknown_command_is_not_fatal() {
    let (mut executor, out, err) = shell();
    executor.execute_line("no-such-command-xyz --flag && echo still here");
    assert_eq!(err.contents(), "no-such-command-xyz: command not found\n");
    assert_eq!(out.contents(), "still here\n");
}

#[test]
fn test_empty_segments_are_noops() {
    let (mut executor, out, err) = shell();
    executor.execute_line("&& echo x ||");
    assert_eq!(out.contents(), "x\n");
    assert_eq!(err.contents(), "");
}

#[test]
fn test_kill_reports_bad_pid() {
    let (mut executor, _, err) = shell();
    executor.execute_line("kill nope && kill");
    assert_eq!(err.contents(), "kill: invalid pid: nope\nkill: usage: kill <pid>\n");
}

/// Puts the working directory back when dropped, even on a failed assert.
struct RestoreCwd(PathBuf);

impl Drop for RestoreCwd {
    fn drop(&mut self) {
        let _ = env::set_current_dir(&self.0);
    }
}

// The only test that moves the working directory.
#[test]
fn test_cd_and_pwd() {
    let home = tempdir().unwrap();
    let _restore = RestoreCwd(env::current_dir().unwrap());
    let home_path = fs::canonicalize(home.path()).unwrap();
    fs::create_dir(home_path.join("sub")).unwrap();

    let mut vars = snapshot_env();
    vars.insert("HOME".to_string(), home_path.display().to_string());
    vars.insert("SUBDIR".to_string(), "sub".to_string());
    let (mut executor, out, err) = shell_with_env(vars);

    executor.execute_line("cd && pwd");
    executor.execute_line("cd $SUBDIR && pwd");
    executor.execute_line("cd /definitely/not/here && pwd");

    let expected = format!(
        "{home}\n{home}/sub\n{home}/sub\n",
        home = home_path.display()
    );
    assert_eq!(out.contents(), expected);
    assert_eq!(env::current_dir().unwrap(), home_path.join("sub"));
    assert!(err.contents().starts_with("cd: /definitely/not/here:"));
}
