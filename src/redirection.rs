use std::fs::{File, OpenOptions};
use std::os::unix::fs::OpenOptionsExt;

use crate::ast::{RedirectSpec, Stage};
use crate::types::{ExecuteResult, ShellError};

/// rw-r--r--
const OUTPUT_MODE: u32 = (libc::S_IRUSR | libc::S_IWUSR | libc::S_IRGRP | libc::S_IROTH) as u32;

/// Extracts at most one `<` and one `>`/`>>` target from a stage.
///
/// A direction whose symbol appears more than once is left untouched, with
/// its text kept in the command. Input is detected before output; when the
/// output redirect follows the input one (`cmd < in > out`) it is taken from
/// the input part.
pub fn parse_redirects(text: &str) -> Stage {
    let mut command = text.trim().to_string();
    let mut redirects = RedirectSpec::default();

    if let Some((left, right)) = split_single(&command, '<') {
        redirects.input = non_empty(right);
        command = left.trim().to_string();
    }

    if let Some((left, path, append)) = split_output(&command) {
        command = left;
        redirects.output = non_empty(&path);
        redirects.append = append;
    } else if let Some(input) = redirects.input.clone() {
        if let Some((left, path, append)) = split_output(&input) {
            redirects.input = non_empty(&left);
            redirects.output = non_empty(&path);
            redirects.append = append;
        }
    }

    if !redirects.is_empty() {
        log::debug!("redirects for {:?}: {:?}", command, redirects);
    }
    Stage { command, redirects }
}

fn split_single(text: &str, symbol: char) -> Option<(&str, &str)> {
    if text.matches(symbol).count() == 1 {
        text.split_once(symbol)
    } else {
        None
    }
}

// ">>" counts as one operator; any further '>' makes the output ambiguous.
fn split_output(text: &str) -> Option<(String, String, bool)> {
    let (left, right) = text.split_once('>')?;
    let (right, append) = match right.strip_prefix('>') {
        Some(rest) => (rest, true),
        None => (right, false),
    };
    if right.contains('>') {
        return None;
    }
    Some((left.trim().to_string(), right.trim().to_string(), append))
}

fn non_empty(path: &str) -> Option<String> {
    let path = path.trim();
    (!path.is_empty()).then(|| path.to_string())
}

/// Files opened for one stage. Dropping the value closes them.
#[derive(Debug, Default)]
pub struct RedirectHandles {
    pub input: Option<File>,
    pub output: Option<File>,
}

/// Opens the targets named by `spec`. If the output cannot be opened, the
/// already opened input is closed before the error is returned.
pub fn open_redirects(spec: &RedirectSpec) -> ExecuteResult<RedirectHandles> {
    let mut handles = RedirectHandles::default();

    if let Some(path) = &spec.input {
        let file = File::open(path).map_err(|source| ShellError::InputRedirect {
            path: path.clone(),
            source,
        })?;
        handles.input = Some(file);
    }

    if let Some(path) = &spec.output {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .append(spec.append)
            .truncate(!spec.append)
            .mode(OUTPUT_MODE)
            .open(path)
            .map_err(|source| ShellError::OutputRedirect {
                path: path.clone(),
                source,
            })?;
        handles.output = Some(file);
    }

    Ok(handles)
}
