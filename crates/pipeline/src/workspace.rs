// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

const EPHEMERAL_PREFIX: &str = "zkforge-";

/// Directory every artifact of a run is written to.
///
/// An ephemeral workspace owns its directory and removes it when dropped, whichever way the
/// run ends. A persistent workspace is never removed so cached keys survive between runs.
#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
    temp: Option<TempDir>,
}

impl Workspace {
    /// Use `output_dir` when given, creating it if needed, otherwise allocate a fresh temp dir
    pub fn resolve(output_dir: Option<&Path>) -> io::Result<Self> {
        match output_dir {
            Some(dir) => Self::persistent(dir),
            None => Self::ephemeral(),
        }
    }

    pub fn persistent(dir: &Path) -> io::Result<Self> {
        std::fs::create_dir_all(dir)?;
        let path = dir.canonicalize()?;
        info!("using output directory {}", path.display());
        Ok(Self { path, temp: None })
    }

    pub fn ephemeral() -> io::Result<Self> {
        let temp = tempfile::Builder::new()
            .prefix(EPHEMERAL_PREFIX)
            .tempdir()?;
        let path = temp.path().to_path_buf();
        info!("using temporary directory {}", path.display());
        Ok(Self {
            path,
            temp: Some(temp),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_ephemeral(&self) -> bool {
        self.temp.is_some()
    }

    /// Release the workspace now, reporting any failure to remove an ephemeral directory.
    /// Dropping does the same but swallows the error.
    pub fn close(mut self) -> io::Result<()> {
        match self.temp.take() {
            Some(temp) => {
                debug!("removing {}", self.path.display());
                match temp.close() {
                    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                    other => other,
                }
            }
            None => Ok(()),
        }
    }
}
