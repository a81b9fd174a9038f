// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::digest::CacheKey;
use std::path::{Path, PathBuf};

/// Where every artifact of a circuit lives inside a workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactLayout {
    root: PathBuf,
    name: String,
}

impl ArtifactLayout {
    pub fn new(root: &Path, name: &str) -> Self {
        Self {
            root: root.to_path_buf(),
            name: name.to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `<name>_cpp/<name>.cpp` as emitted by `circom --c`
    pub fn native_source(&self) -> PathBuf {
        self.root
            .join(format!("{}_cpp", self.name))
            .join(format!("{}.cpp", self.name))
    }

    pub fn constraints(&self) -> PathBuf {
        self.file(".r1cs")
    }

    pub fn build_dir(&self) -> PathBuf {
        self.root.join(format!("build_{}", self.name))
    }

    pub fn install_prefix(&self) -> PathBuf {
        self.root.join("package")
    }

    /// Witness calculator installed by the native build
    pub fn executable(&self) -> PathBuf {
        let exe = format!("{}{}", self.name, std::env::consts::EXE_SUFFIX);
        self.install_prefix().join("bin").join(exe)
    }

    pub fn witness(&self) -> PathBuf {
        self.file(".wtns")
    }

    pub fn proof(&self) -> PathBuf {
        self.file("_proof.json")
    }

    pub fn public_signals(&self) -> PathBuf {
        self.file("_public.json")
    }

    /// Key paths addressed by the constraint digest
    pub fn keys(&self, key: &CacheKey) -> KeyPaths {
        let stem = format!("{}_{}", self.name, key);
        KeyPaths {
            proving_key: self.root.join(format!("{}.zkey", stem)),
            pending_key: self.root.join(format!("{}_0000.zkey", stem)),
            staged_proving_key: self.root.join(format!("{}_staged.zkey", stem)),
            verification_key: self.root.join(format!("{}_vk.json", stem)),
            staged_verification_key: self.root.join(format!("{}_vk_staged.json", stem)),
        }
    }

    fn file(&self, suffix: &str) -> PathBuf {
        self.root.join(format!("{}{}", self.name, suffix))
    }
}

/// Cached key locations for one constraint digest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPaths {
    /// Final proving key, its presence is the cache hit
    pub proving_key: PathBuf,
    /// Setup output before the contribution. Never mistaken for `proving_key`.
    pub pending_key: PathBuf,
    /// Contribution output, renamed onto `proving_key` once complete
    pub staged_proving_key: PathBuf,
    pub verification_key: PathBuf,
    /// Export output, renamed onto `verification_key` once complete
    pub staged_verification_key: PathBuf,
}
