// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::pipeline::Stage;
use std::path::PathBuf;
use thiserror::Error;
use zkf_toolchain::ToolchainError;

/// Problems with the invocation itself, found before any tool runs
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Circuit '{}' must have a .{extension} extension", .path.display())]
    WrongExtension { path: PathBuf, extension: &'static str },

    #[error("Circuit file '{}' does not exist", .0.display())]
    CircuitNotFound(PathBuf),

    #[error("Input file '{}' does not exist", .0.display())]
    InputNotFound(PathBuf),

    #[error("Trusted setup file '{}' does not exist", .0.display())]
    PtauNotFound(PathBuf),

    #[error("-p requires an input file. Pass one with -i <input.json>")]
    PtauRequiresInput,

    #[error("Required executable '{0}' was not found on PATH")]
    MissingExecutable(String),
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{stage} failed: `{program}` exited with {}{}", describe_code(.code), describe_stderr(.stderr))]
    ToolFailed {
        stage: Stage,
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Proof verification failed: {} was rejected", .proof.display())]
    ProofRejected { proof: PathBuf },

    #[error("{stage} did not produce the expected file '{}'", .path.display())]
    MissingArtifact { stage: Stage, path: PathBuf },

    #[error(transparent)]
    Toolchain(#[from] ToolchainError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PipelineError {
    /// Process exit status for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Validation(_) => 2,
            _ => 1,
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

fn describe_stderr(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!("\n{}", stderr)
    }
}
