// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::digest::CacheKey;
use crate::workspace::Workspace;
use std::fmt;
use std::path::PathBuf;

/// What a run produced
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub workspace: PathBuf,
    pub ephemeral: bool,
    pub native_source: Option<PathBuf>,
    pub constraints: Option<PathBuf>,
    pub executable: Option<PathBuf>,
    pub witness: Option<PathBuf>,
    pub proof: Option<ProofReport>,
}

/// Outcome of the proof cascade
#[derive(Debug, Clone, PartialEq)]
pub struct ProofReport {
    pub cache_key: CacheKey,
    pub proving_key: PathBuf,
    /// The proving key already existed and setup was skipped
    pub proving_key_cached: bool,
    pub verification_key: PathBuf,
    pub verification_key_cached: bool,
    pub proof: PathBuf,
    pub public_signals: PathBuf,
}

impl RunReport {
    pub fn new(workspace: &Workspace) -> Self {
        Self {
            workspace: workspace.path().to_path_buf(),
            ephemeral: workspace.is_ephemeral(),
            native_source: None,
            constraints: None,
            executable: None,
            witness: None,
            proof: None,
        }
    }
}

fn cached(hit: bool) -> &'static str {
    if hit {
        "reused"
    } else {
        "generated"
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let note = if self.ephemeral {
            " (temporary, removed on exit)"
        } else {
            ""
        };
        writeln!(f, "Output directory: {}{}", self.workspace.display(), note)?;

        for (label, path) in [
            ("Native source", &self.native_source),
            ("Constraints", &self.constraints),
            ("Witness calculator", &self.executable),
            ("Witness", &self.witness),
        ] {
            if let Some(path) = path {
                writeln!(f, "  {}: {}", label, path.display())?;
            }
        }

        if let Some(proof) = &self.proof {
            writeln!(f, "  Constraint digest: {}", proof.cache_key)?;
            writeln!(
                f,
                "  Proving key ({}): {}",
                cached(proof.proving_key_cached),
                proof.proving_key.display()
            )?;
            writeln!(
                f,
                "  Verification key ({}): {}",
                cached(proof.verification_key_cached),
                proof.verification_key.display()
            )?;
            writeln!(f, "  Proof: {}", proof.proof.display())?;
            writeln!(f, "  Public signals: {}", proof.public_signals.display())?;
            writeln!(f, "Proof verified")?;
        }
        Ok(())
    }
}
