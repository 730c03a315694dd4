use std::env as stdenv;
use std::io::Write;
use std::process::Command;

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;

use crate::expand::expand_vars;
use crate::types::{EnvMap, ExecuteResult, ShellError};

pub const BUILTINS: [&str; 5] = ["cd", "pwd", "echo", "kill", "ps"];

pub fn is_builtin(cmd: &str) -> bool {
    BUILTINS.contains(&cmd)
}

/// Runs a builtin. Regular output goes to `out`; failures come back as
/// errors for the caller to report.
pub fn execute_builtin(
    name: &str,
    args: &[&str],
    env: &EnvMap,
    out: &mut dyn Write,
) -> ExecuteResult<()> {
    match name {
        "cd" => change_dir(args, env),
        "pwd" => {
            let cwd = stdenv::current_dir().map_err(ShellError::CurrentDir)?;
            writeln!(out, "{}", cwd.display())?;
            Ok(())
        }
        "echo" => {
            writeln!(out, "{}", args.join(" "))?;
            Ok(())
        }
        "kill" => kill(args),
        "ps" => {
            let output = Command::new("ps")
                .arg("aux")
                .output()
                .map_err(ShellError::ProcessList)?;
            if !output.status.success() {
                return Err(ShellError::ExitFailure {
                    command: "ps".to_string(),
                    status: output.status,
                });
            }
            out.write_all(&output.stdout)?;
            Ok(())
        }
        _ => Err(ShellError::CommandNotFound(name.to_string())),
    }
}

fn change_dir(args: &[&str], env: &EnvMap) -> ExecuteResult<()> {
    let target = match args.first() {
        Some(path) => path.to_string(),
        None => env.get("HOME").cloned().unwrap_or_default(),
    };
    let path = expand_vars(&target, env);

    stdenv::set_current_dir(&path).map_err(|source| ShellError::ChangeDir { path, source })
}

fn kill(args: &[&str]) -> ExecuteResult<()> {
    let arg = args.first().ok_or(ShellError::KillUsage)?;
    let pid: i32 = arg
        .parse()
        .map_err(|_| ShellError::InvalidPid(arg.to_string()))?;
    // 0 and negative values address process groups, not a single process.
    if pid <= 0 {
        return Err(ShellError::InvalidPid(arg.to_string()));
    }

    signal::kill(Pid::from_raw(pid), Signal::SIGTERM).map_err(|errno| ShellError::Nix {
        errno,
        context: format!("kill {}", pid),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Stdio;

    fn run(name: &str, args: &[&str]) -> (ExecuteResult<()>, String) {
        let mut out = Vec::new();
        let result = execute_builtin(name, args, &EnvMap::new(), &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_builtin_table() {
        for name in ["cd", "pwd", "echo", "kill", "ps"] {
            assert!(is_builtin(name));
        }
        assert!(!is_builtin("ls"));
        assert!(!is_builtin("exit"));
    }

    #[test]
    fn test_echo() {
        assert_eq!(run("echo", &["a", "b", "c"]).1, "a b c\n");
        assert_eq!(run("echo", &[]).1, "\n");
        assert_eq!(run("echo", &["-n", "\\t"]).1, "-n \\t\n");
    }

    #[test]
    fn test_kill_errors() {
        assert!(matches!(run("kill", &[]).0, Err(ShellError::KillUsage)));
        let (result, _) = run("kill", &["abc"]);
        assert_eq!(result.unwrap_err().to_string(), "kill: invalid pid: abc");
        assert!(matches!(run("kill", &["-1"]).0, Err(ShellError::InvalidPid(_))));
    }

    #[test]
    fn test_kill_terminates_process() {
        let mut child = Command::new("sleep")
            .arg("30")
            .stdout(Stdio::null())
            .spawn()
            .unwrap();
        let pid = child.id().to_string();
        let (result, out) = run("kill", &[pid.as_str()]);
        assert!(result.is_ok());
        assert!(out.is_empty());

        let status = child.wait().unwrap();
        use std::os::unix::process::ExitStatusExt;
        assert_eq!(status.signal(), Some(libc::SIGTERM));
    }

    #[test]
    fn test_kill_missing_process() {
        // Above any pid_max the kernel accepts.
        let pid = i32::MAX.to_string();
        let (result, _) = run("kill", &[pid.as_str()]);
        let err = result.unwrap_err();
        assert!(matches!(err, ShellError::Nix { errno: nix::errno::Errno::ESRCH, .. }));
        assert!(err.to_string().starts_with(&format!("kill {}", pid)));
    }

    #[test]
    fn test_ps_prints_listing() {
        let (result, out) = run("ps", &[]);
        assert!(result.is_ok());
        let header = out.lines().next().unwrap();
        assert!(header.contains("PID"));
        assert!(out.lines().count() > 1);
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn test_unknown_builtin() {
        assert!(matches!(run("ls", &[]).0, Err(ShellError::CommandNotFound(_))));
    }
}
