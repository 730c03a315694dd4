use std::io;
use std::process::ExitStatus;
use thiserror::Error;

/// Environment snapshot used for `$NAME` expansion, `PATH` lookup and `cd`.
pub type EnvMap = std::collections::HashMap<String, String>;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("cannot open input file {path}: {source}")]
    InputRedirect { path: String, source: io::Error },
    #[error("cannot open output file {path}: {source}")]
    OutputRedirect { path: String, source: io::Error },
    #[error("{0}: command not found")]
    CommandNotFound(String),
    #[error("Error executing {command}: {source}")]
    Spawn { command: String, source: io::Error },
    #[error("Error executing {command}: {status}")]
    ExitFailure { command: String, status: ExitStatus },
    #[error("Error creating pipe: {0}")]
    Pipe(io::Error),
    #[error("cd: {path}: {source}")]
    ChangeDir { path: String, source: io::Error },
    #[error("pwd: {0}")]
    CurrentDir(io::Error),
    #[error("kill: usage: kill <pid>")]
    KillUsage,
    #[error("kill: invalid pid: {0}")]
    InvalidPid(String),
    #[error("{context}: {errno}")]
    Nix {
        errno: nix::errno::Errno,
        context: String,
    },
    #[error("ps: {0}")]
    ProcessList(io::Error),
}

pub type ExecuteResult<T = ()> = Result<T, ShellError>;
