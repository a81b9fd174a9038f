// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::env;
use std::path::{Path, PathBuf};

/// Strategy for resolving an executable name, injectable so validation can be tested
pub type FindExecutable = fn(&str) -> Option<PathBuf>;

/// Resolve `name` the way a shell would.
///
/// Names containing a path separator are checked directly, everything else is searched for
/// on `PATH`.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }

    let candidate = Path::new(name);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|dir| dir.join(name))
        .find(|path| is_executable(path))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::tempdir;

    #[test]
    fn test_finds_shell_on_path() {
        assert!(find_executable("sh").is_some());
        assert!(find_executable("zkforge-definitely-not-installed").is_none());
        assert!(find_executable("").is_none());
    }

    #[test]
    fn test_explicit_path_needs_exec_bit() {
        let temp = tempdir().unwrap();
        let tool = temp.path().join("prover");
        fs::write(&tool, "#!/bin/sh\n").unwrap();

        let name = tool.to_string_lossy().to_string();
        assert!(find_executable(&name).is_none());

        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(find_executable(&name), Some(tool));
    }
}
