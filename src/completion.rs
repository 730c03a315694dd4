use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use rustyline::{
    Helper,
    completion::Completer as RustylineCompleter,
    highlight::Highlighter,
    hint::Hinter,
    validate::Validator,
    completion::Pair,
    Context,
    Result,
};
use crate::builtins::BUILTINS;

/// Tab completion: command names in first-word position, paths elsewhere.
pub struct Completer {
    commands: Vec<String>,
}

impl Completer {
    pub fn new(paths: &str) -> Self {
        Self {
            commands: Self::find_commands(paths),
        }
    }

    fn find_commands(paths: &str) -> Vec<String> {
        let mut commands: Vec<String> = BUILTINS.iter().map(|&cmd| cmd.to_string()).collect();

        for dir in paths.split(':').filter(|d| !d.is_empty()) {
            let Ok(entries) = fs::read_dir(dir) else {
                continue;
            };
            for entry in entries.filter_map(|r| r.ok()) {
                let executable = entry
                    .metadata()
                    .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
                    .unwrap_or(false);
                if let (true, Some(name)) = (executable, entry.file_name().to_str()) {
                    commands.push(name.to_string());
                }
            }
        }

        commands.sort();
        commands.dedup();
        commands
    }

    /// Candidates for the word ending at the end of `line`.
    pub fn complete(&self, line: &str) -> Vec<String> {
        let word = line.rsplit(char::is_whitespace).next().unwrap_or("");
        let command_position = line[..line.len() - word.len()]
            .trim_end()
            .rsplit(|c| c == '|' || c == '&')
            .next()
            .map_or(true, |before| before.trim().is_empty());

        if command_position {
            self.complete_command(word)
        } else {
            complete_path(word)
        }
    }

    fn complete_command(&self, prefix: &str) -> Vec<String> {
        self.commands.iter()
            .filter(|cmd| cmd.starts_with(prefix))
            .cloned()
            .collect()
    }
}

fn complete_path(prefix: &str) -> Vec<String> {
    let (dir, name_prefix) = match prefix.rfind('/') {
        Some(i) => (PathBuf::from(&prefix[..=i]), &prefix[i + 1..]),
        None => (PathBuf::new(), prefix),
    };
    let read_from: &Path = if dir.as_os_str().is_empty() { Path::new(".") } else { &dir };

    let mut completions = Vec::new();
    if let Ok(entries) = fs::read_dir(read_from) {
        for entry in entries.filter_map(|r| r.ok()) {
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if !name.starts_with(name_prefix) {
                continue;
            }
            let mut candidate = format!("{}{}", dir.display(), name);
            if entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
                candidate.push('/');
            }
            completions.push(candidate);
        }
    }
    completions.sort();
    completions
}

impl Helper for Completer {}

impl RustylineCompleter for Completer {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> Result<(usize, Vec<Pair>)> {
        let start = line[..pos].rfind(char::is_whitespace).map_or(0, |i| i + 1);

        let pairs: Vec<Pair> = Completer::complete(self, &line[..pos])
            .into_iter()
            .map(|s| Pair {
                display: s.clone(),
                replacement: s,
            })
            .collect();

        Ok((start, pairs))
    }
}

impl Highlighter for Completer {}
impl Hinter for Completer {
    type Hint = String;
}
impl Validator for Completer {}
