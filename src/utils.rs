use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use crate::types::EnvMap;

/// Resolves a command name to an executable path.
///
/// Names containing a slash are taken as paths; anything else is looked up
/// in each directory of `paths` (colon separated).
pub fn search_cmd(cmd: &str, paths: &str) -> Option<PathBuf> {
    let cmd = cmd.trim();

    if cmd.contains('/') {
        let path = Path::new(cmd);
        return is_executable(path).then(|| path.to_path_buf());
    }

    paths
        .split(':')
        .filter(|dir| !dir.is_empty())
        .map(|dir| Path::new(dir).join(cmd))
        .find(|candidate| is_executable(candidate))
}

/// Same as [`search_cmd`], reading `PATH` from the environment snapshot.
pub fn resolve_in_env(cmd: &str, env: &EnvMap) -> Option<PathBuf> {
    let paths = env.get("PATH").map(String::as_str).unwrap_or_default();
    search_cmd(cmd, paths)
}

fn is_executable(path: &Path) -> bool {
    match path.metadata() {
        Ok(metadata) => metadata.is_file() && metadata.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_search_in_path_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("mytool");
        fs::write(&tool, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();

        let paths = format!("/nonexistent::{}", dir.path().display());
        assert_eq!(search_cmd("mytool", &paths), Some(tool));
        assert_eq!(search_cmd("othertool", &paths), None);
    }

    #[test]
    fn test_skips_non_executable() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        fs::write(&data, "x").unwrap();
        fs::set_permissions(&data, fs::Permissions::from_mode(0o644)).unwrap();
        assert_eq!(search_cmd("data", dir.path().to_str().unwrap()), None);
    }

    #[test]
    fn test_slash_names_bypass_path() {
        assert_eq!(search_cmd("/bin/sh", ""), Some(PathBuf::from("/bin/sh")));
        assert_eq!(search_cmd("./definitely/not/here", "/bin"), None);
    }

    #[test]
    fn test_missing_path_var() {
        assert_eq!(resolve_in_env("sh", &EnvMap::new()), None);
    }
}
