// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::digest::CacheKey;
use crate::error::PipelineError;
use crate::layout::{ArtifactLayout, KeyPaths};
use crate::pipeline::{tool_failed, Pipeline, Stage};
use crate::report::ProofReport;
use rand::rngs::OsRng;
use rand::RngCore;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, warn};
use zkf_toolchain::{ToolCommand, ToolOutput, ToolRunner};

impl<R: ToolRunner> Pipeline<R> {
    /// Groth16 cascade: proving key (cached by constraint digest), proof, verification key
    /// (same cache key) and verification.
    pub(crate) async fn prove(
        &self,
        ptau: &Path,
        layout: &ArtifactLayout,
    ) -> Result<ProofReport, PipelineError> {
        let constraints = layout.constraints();
        let cache_key = CacheKey::of_file(&constraints).await?;
        info!("constraint digest {}", cache_key);

        let keys = layout.keys(&cache_key);
        let proving_key_cached = self.ensure_proving_key(&constraints, ptau, &keys).await?;

        let proof = layout.proof();
        let public_signals = layout.public_signals();
        let prove = ToolCommand::new(&self.config.tools.prover)
            .arg(&keys.proving_key)
            .arg(layout.witness())
            .arg(&proof)
            .arg(&public_signals);
        self.invoke(Stage::Prove, prove).await?;

        let verification_key_cached = self.ensure_verification_key(&keys).await?;
        self.verify(&keys.verification_key, &public_signals, &proof)
            .await?;

        Ok(ProofReport {
            cache_key,
            proving_key: keys.proving_key,
            proving_key_cached,
            verification_key: keys.verification_key,
            verification_key_cached,
            proof,
            public_signals,
        })
    }

    /// Returns `true` when an existing key was reused
    async fn ensure_proving_key(
        &self,
        constraints: &Path,
        ptau: &Path,
        keys: &KeyPaths,
    ) -> Result<bool, PipelineError> {
        if fs::try_exists(&keys.proving_key).await? {
            info!(
                "reusing cached proving key {}",
                keys.proving_key.display()
            );
            return Ok(true);
        }

        info!(
            "no cached proving key, generating {}",
            keys.proving_key.display()
        );
        discard(&keys.pending_key).await;
        discard(&keys.staged_proving_key).await;

        let snarkjs = &self.config.tools.snarkjs;
        let setup = ToolCommand::new(snarkjs)
            .args(["groth16", "setup"])
            .arg(constraints)
            .arg(ptau)
            .arg(&keys.pending_key);
        if let Err(e) = self.invoke(Stage::Setup, setup).await {
            discard(&keys.pending_key).await;
            return Err(e);
        }

        let entropy = entropy(self.config.setup.entropy_bytes);
        let contribute = ToolCommand::new(snarkjs)
            .args(["zkey", "contribute"])
            .arg(&keys.pending_key)
            .arg(&keys.staged_proving_key)
            .arg(format!("--name={}", self.config.setup.contributor))
            .arg(format!("-e={}", entropy));
        let contributed = self.invoke(Stage::Contribute, contribute).await;
        discard(&keys.pending_key).await;

        if let Err(e) = contributed {
            discard(&keys.staged_proving_key).await;
            return Err(e);
        }

        self.publish(Stage::Contribute, &keys.staged_proving_key, &keys.proving_key)
            .await?;
        Ok(false)
    }

    /// Returns `true` when an existing key was reused
    async fn ensure_verification_key(&self, keys: &KeyPaths) -> Result<bool, PipelineError> {
        if fs::try_exists(&keys.verification_key).await? {
            info!(
                "reusing cached verification key {}",
                keys.verification_key.display()
            );
            return Ok(true);
        }
        discard(&keys.staged_verification_key).await;

        let export = ToolCommand::new(&self.config.tools.snarkjs)
            .args(["zkey", "export", "verificationkey"])
            .arg(&keys.proving_key)
            .arg(&keys.staged_verification_key);
        if let Err(e) = self.invoke(Stage::ExportVerificationKey, export).await {
            discard(&keys.staged_verification_key).await;
            return Err(e);
        }

        self.publish(
            Stage::ExportVerificationKey,
            &keys.staged_verification_key,
            &keys.verification_key,
        )
        .await?;
        Ok(false)
    }

    /// Move a finished key onto its cache path. An interrupted tool leaves at most a staged file.
    async fn publish(
        &self,
        stage: Stage,
        staged: &Path,
        cached: &Path,
    ) -> Result<(), PipelineError> {
        self.expect_artifact(stage, staged).await?;
        fs::rename(staged, cached).await?;
        debug!("cached {}", cached.display());
        Ok(())
    }

    async fn verify(
        &self,
        verification_key: &Path,
        public_signals: &Path,
        proof: &Path,
    ) -> Result<(), PipelineError> {
        let command = ToolCommand::new(&self.config.tools.snarkjs)
            .args(["groth16", "verify"])
            .arg(verification_key)
            .arg(public_signals)
            .arg(proof);
        info!("{}: {}", Stage::Verify, command.program());
        debug!("{}", command);

        let output = self.runner.run(&command).await?;
        if output.success() {
            info!("proof verified");
            return Ok(());
        }

        if reports_invalid_proof(&output) {
            warn!("verifier rejected {}", proof.display());
            return Err(PipelineError::ProofRejected {
                proof: proof.to_path_buf(),
            });
        }

        Err(tool_failed(Stage::Verify, &command, output))
    }
}

/// snarkjs prints `Invalid proof` when it ran fine but the proof does not check out
fn reports_invalid_proof(output: &ToolOutput) -> bool {
    [&output.stdout, &output.stderr]
        .iter()
        .any(|s| s.to_lowercase().contains("invalid proof"))
}

fn entropy(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    OsRng.fill_bytes(&mut buf);
    hex::encode(buf)
}

async fn discard(path: &Path) {
    match fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("could not remove {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entropy_is_hex_of_requested_size() {
        let a = entropy(32);
        let b = entropy(32);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_rejection_detection() {
        let rejected = ToolOutput {
            code: Some(1),
            stdout: "[ERROR] snarkJS: Invalid proof\n".to_string(),
            stderr: String::new(),
        };
        assert!(reports_invalid_proof(&rejected));

        let crashed = ToolOutput {
            code: Some(1),
            stdout: String::new(),
            stderr: "Error: ENOENT: no such file or directory".to_string(),
        };
        assert!(!reports_invalid_proof(&crashed));
    }
}
