// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::path::{Path, PathBuf};

use path_clean::clean;

/// Name of the configuration file searched for from the working directory upwards
pub const DEFAULT_CONFIG_NAME: &str = "zkforge.config.yaml";

/// Prefix for environment overrides. Nested keys are split on `__`, eg.
/// `ZKFORGE_BUILD__TARGET_PLATFORM=arm64`
pub const ENV_PREFIX: &str = "ZKFORGE_";

pub type FindInParent = fn(&Path, &str) -> Option<PathBuf>;

/// Walk from `path` towards the filesystem root returning the first `filename` found
pub fn find_in_parent(path: &Path, filename: &str) -> Option<PathBuf> {
    let mut current = path.to_path_buf();

    loop {
        let file_path = current.join(filename);
        if file_path.is_file() {
            return Some(file_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Work out which configuration file applies.
///
/// A file passed on the command line always wins and is returned even if it does not exist so
/// that loading can report it. Otherwise the nearest `filename` above `cwd` is used. `None`
/// means the run uses defaults and environment overrides only.
pub fn resolve_config_path(
    find_in_parent: FindInParent,
    cwd: &Path,
    filename: &str,
    cli_file: Option<&Path>,
) -> Option<PathBuf> {
    if let Some(cli_file) = cli_file {
        if cli_file.is_absolute() {
            return Some(clean(cli_file));
        }
        return Some(clean(cwd.join(cli_file)));
    }

    find_in_parent(cwd, filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    fn not_found(_: &Path, _: &str) -> Option<PathBuf> {
        None
    }

    fn found(_: &Path, _: &str) -> Option<PathBuf> {
        Some(PathBuf::from("/foo/zkforge.config.yaml"))
    }

    #[test]
    fn test_resolve_cli() {
        let path = resolve_config_path(
            found, // overridden by the cli argument
            Path::new("/foo/bar"),
            DEFAULT_CONFIG_NAME,
            Some(Path::new("/my/absolute/conf.yaml")),
        );
        assert_eq!(path, Some(PathBuf::from("/my/absolute/conf.yaml")));

        let path = resolve_config_path(
            found,
            Path::new("/foo/bar"),
            DEFAULT_CONFIG_NAME,
            Some(Path::new("../conf.yaml")),
        );
        assert_eq!(path, Some(PathBuf::from("/foo/conf.yaml")));
    }

    #[test]
    fn test_resolve_search() {
        let path = resolve_config_path(found, Path::new("/foo/bar"), DEFAULT_CONFIG_NAME, None);
        assert_eq!(path, Some(PathBuf::from("/foo/zkforge.config.yaml")));

        let path = resolve_config_path(not_found, Path::new("/foo/bar"), DEFAULT_CONFIG_NAME, None);
        assert_eq!(path, None);
    }

    #[test]
    fn test_find_in_parent() -> Result<()> {
        let temp = tempdir()?;
        let nested = temp.path().join("a").join("b");
        fs::create_dir_all(&nested)?;
        fs::write(temp.path().join(DEFAULT_CONFIG_NAME), "tools: {}\n")?;

        let found = find_in_parent(&nested, DEFAULT_CONFIG_NAME);
        assert_eq!(found, Some(temp.path().join(DEFAULT_CONFIG_NAME)));
        assert_eq!(find_in_parent(&nested, "missing.yaml"), None);
        Ok(())
    }
}
