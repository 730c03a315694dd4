use crate::types::EnvMap;

/// Replaces every `$NAME` occurrence for every entry of `env`.
///
/// Purely textual: no word boundary check, so `$HOME` also rewrites the
/// prefix of `$HOMEX`. Entries are visited in map iteration order, which is
/// unspecified; overlapping names may therefore expand differently between
/// runs.
pub fn expand_vars(input: &str, env: &EnvMap) -> String {
    if !input.contains('$') {
        return input.to_string();
    }

    let mut line = input.to_string();
    for (name, value) in env {
        let placeholder = format!("${}", name);
        if line.contains(&placeholder) {
            line = line.replace(&placeholder, value);
        }
    }
    line
}
