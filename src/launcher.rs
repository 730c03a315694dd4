use std::os::unix::process::CommandExt;
use std::process::{Child, Command, ExitStatus, Stdio};

use os_pipe::{PipeReader, PipeWriter};

use crate::redirection::RedirectHandles;
use crate::types::{EnvMap, ExecuteResult, ShellError};
use crate::utils::resolve_in_env;

/// One running external process.
#[derive(Debug)]
pub struct ProcessHandle {
    pub name: String,
    child: Child,
}

impl ProcessHandle {
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    pub fn wait(mut self) -> ExecuteResult<ExitStatus> {
        let status = self.child.wait().map_err(|source| ShellError::Spawn {
            command: self.name.clone(),
            source,
        })?;
        log::debug!("{} (pid {}) finished: {}", self.name, self.id(), status);
        Ok(status)
    }
}

fn build_command(name: &str, args: &[&str], env: &EnvMap) -> ExecuteResult<Command> {
    let path = resolve_in_env(name, env).ok_or_else(|| ShellError::CommandNotFound(name.to_string()))?;
    let mut cmd = Command::new(path);
    cmd.arg0(name).args(args);
    Ok(cmd)
}

/// Starts `name`. stdin/stdout are moved into the child; the parent's copies
/// are closed when this returns, on success and on failure alike.
pub fn spawn(
    name: &str,
    args: &[&str],
    stdin: Stdio,
    stdout: Stdio,
    env: &EnvMap,
) -> ExecuteResult<ProcessHandle> {
    let mut cmd = build_command(name, args, env)?;
    let child = cmd
        .stdin(stdin)
        .stdout(stdout)
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|source| ShellError::Spawn {
            command: name.to_string(),
            source,
        })?;
    let handle = ProcessHandle {
        name: name.to_string(),
        child,
    };
    log::debug!("started {} as pid {}", handle.name, handle.id());
    Ok(handle)
}

/// Runs one external command with its redirect files and waits for it.
///
/// Inherited streams stand in for any direction without a file. A non-zero
/// exit is returned as [`ShellError::ExitFailure`].
pub fn run_single(
    name: &str,
    args: &[&str],
    handles: RedirectHandles,
    env: &EnvMap,
) -> ExecuteResult<ExitStatus> {
    let stdin = handles.input.map(Stdio::from).unwrap_or_else(Stdio::inherit);
    let stdout = handles.output.map(Stdio::from).unwrap_or_else(Stdio::inherit);

    let status = spawn(name, args, stdin, stdout, env)?.wait()?;
    if status.success() {
        Ok(status)
    } else {
        Err(ShellError::ExitFailure {
            command: name.to_string(),
            status,
        })
    }
}

/// N-1 unidirectional pipes for an N-stage pipeline.
///
/// Pipe `i` carries stage `i`'s output to stage `i + 1`. Ends are taken out
/// as they are handed to children; [`PipeSet::release`] closes whatever is
/// left and may be called any number of times.
#[derive(Debug, Default)]
pub struct PipeSet {
    ends: Vec<(Option<PipeReader>, Option<PipeWriter>)>,
}

impl PipeSet {
    pub fn new(count: usize) -> ExecuteResult<Self> {
        let mut ends = Vec::with_capacity(count);
        for _ in 0..count {
            // Pipes created so far are dropped with `ends` on error.
            let (reader, writer) = os_pipe::pipe().map_err(ShellError::Pipe)?;
            ends.push((Some(reader), Some(writer)));
        }
        Ok(Self { ends })
    }

    pub fn len(&self) -> usize {
        self.ends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }

    pub fn take_reader(&mut self, index: usize) -> Option<PipeReader> {
        self.ends.get_mut(index).and_then(|(reader, _)| reader.take())
    }

    pub fn take_writer(&mut self, index: usize) -> Option<PipeWriter> {
        self.ends.get_mut(index).and_then(|(_, writer)| writer.take())
    }

    /// Closes every end still held and returns how many were closed.
    /// Close errors are discarded.
    pub fn release(&mut self) -> usize {
        let mut closed = 0;
        for (reader, writer) in &mut self.ends {
            closed += usize::from(reader.take().is_some());
            closed += usize::from(writer.take().is_some());
        }
        if closed > 0 {
            log::trace!("released {} pipe ends", closed);
        }
        closed
    }
}

impl Drop for PipeSet {
    fn drop(&mut self) {
        self.release();
    }
}

/// Runs every stage as an external process, each stage's stdout feeding the
/// next one's stdin. Redirects are not applied on this path.
///
/// Stages are started in order. Empty stages are skipped. The first start
/// failure stops launching; processes already started are still waited for,
/// in start order, and the failure is returned afterwards. Exit codes are
/// ignored.
pub fn run_pipeline(stages: &[String], env: &EnvMap) -> ExecuteResult<()> {
    let Some(last) = stages.len().checked_sub(1) else {
        return Ok(());
    };
    let mut pipes = PipeSet::new(last)?;
    if !pipes.is_empty() {
        log::trace!("{} stages over {} pipes", stages.len(), pipes.len());
    }
    let mut running = Vec::with_capacity(stages.len());
    let mut failure = None;

    for (i, stage) in stages.iter().enumerate() {
        let words: Vec<&str> = stage.split_whitespace().collect();
        let Some((name, args)) = words.split_first() else {
            log::debug!("skipping empty pipeline stage {}", i);
            continue;
        };

        let stdin = match i {
            0 => None,
            _ => pipes.take_reader(i - 1).map(Stdio::from),
        };
        let stdout = if i < last {
            pipes.take_writer(i).map(Stdio::from)
        } else {
            None
        };

        match spawn(
            name,
            args,
            stdin.unwrap_or_else(Stdio::inherit),
            stdout.unwrap_or_else(Stdio::inherit),
            env,
        ) {
            Ok(handle) => running.push(handle),
            Err(e) => {
                failure = Some(e);
                break;
            }
        }
    }

    // Ends no child received would keep its neighbours from seeing EOF.
    pipes.release();

    for handle in running {
        let name = handle.name.clone();
        match handle.wait() {
            Ok(status) if !status.success() => log::debug!("{} exited with {}", name, status),
            Ok(_) => {}
            Err(e) => log::warn!("{}", e),
        }
    }

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
