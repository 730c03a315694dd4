use std::io::{self, Write};

use crate::builtins::{execute_builtin, is_builtin};
use crate::expand::expand_vars;
use crate::launcher::{run_pipeline, run_single};
use crate::parser::split_conditionals;
use crate::redirection::{open_redirects, parse_redirects};
use crate::types::{EnvMap, ExecuteResult, ShellError};
use crate::utils::resolve_in_env;

/// Copies the host environment, skipping entries that are not valid UTF-8.
pub fn snapshot_env() -> EnvMap {
    std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect()
}

/// Executes input lines one at a time.
///
/// Builtins write to `out`; every error is reported as one line on `err`
/// and never stops the caller. External processes always use the real
/// standard streams unless redirected.
pub struct Executor {
    env: EnvMap,
    out: Box<dyn Write>,
    err: Box<dyn Write>,
}

impl Executor {
    pub fn new(env: EnvMap) -> Self {
        Self::with_streams(env, Box::new(io::stdout()), Box::new(io::stderr()))
    }

    pub fn with_streams(env: EnvMap, out: Box<dyn Write>, err: Box<dyn Write>) -> Self {
        Self { env, out, err }
    }

    pub fn env(&self) -> &EnvMap {
        &self.env
    }

    /// Expands, splits and runs one line. Every segment runs, whatever the
    /// outcome of the one before it.
    pub fn execute_line(&mut self, line: &str) {
        let line = expand_vars(line, &self.env);

        for segment in split_conditionals(&line) {
            log::debug!("segment {:?} ({:?})", segment.text, segment.join);
            if !segment.gate {
                continue;
            }

            let result = if segment.is_pipeline() {
                run_pipeline(&segment.stages, &self.env)
            } else {
                match segment.stages.first() {
                    Some(stage) => self.execute_stage(stage),
                    None => Ok(()),
                }
            };

            if let Err(e) = result {
                self.report(&e);
            }
        }
    }

    /// Single-stage path: redirects apply, builtins run in-process.
    fn execute_stage(&mut self, text: &str) -> ExecuteResult<()> {
        let stage = parse_redirects(text);
        let words = stage.words();
        let Some((name, args)) = words.split_first() else {
            return Ok(());
        };

        if stage.has_unparsed_redirect() {
            // Ambiguous redirects leave the whole text as the command name.
            // It is resolved first so an unknown name touches no file.
            if resolve_in_env(&stage.command, &self.env).is_none() {
                return Err(ShellError::CommandNotFound(stage.command.clone()));
            }
            let handles = open_redirects(&stage.redirects)?;
            return run_single(&stage.command, &[], handles, &self.env).map(|_| ());
        }

        let handles = open_redirects(&stage.redirects)?;

        if is_builtin(name) {
            let result = match handles.output {
                Some(mut file) => execute_builtin(name, args, &self.env, &mut file),
                None => execute_builtin(name, args, &self.env, self.out.as_mut()),
            };
            self.out.flush()?;
            return result;
        }

        run_single(name, args, handles, &self.env).map(|_| ())
    }

    fn report(&mut self, error: &ShellError) {
        log::debug!("command failed: {:?}", error);
        if let Err(e) = writeln!(self.err, "{}", error).and_then(|_| self.err.flush()) {
            log::warn!("could not report error: {}", e);
        }
    }
}
