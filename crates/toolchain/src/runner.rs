// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::command::{ToolCommand, ToolOutput};
use crate::error::ToolchainError;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, trace};

/// The boundary to every external executable. Pipeline stages only talk to tools through this.
#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Run the command to completion. A non-zero exit is reported in the output, not as an error.
    async fn run(&self, command: &ToolCommand) -> Result<ToolOutput, ToolchainError>;
}

/// Runs tools as child processes, capturing their output.
///
/// Children are killed if the returned future is dropped, so cancelling a run does not leave
/// a compiler or prover running against a workspace that is about to be removed.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ToolRunner for ProcessRunner {
    async fn run(&self, command: &ToolCommand) -> Result<ToolOutput, ToolchainError> {
        debug!("running: {}", command);

        let output = Command::new(command.program())
            .args(command.get_args())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| match source.kind() {
                std::io::ErrorKind::NotFound => {
                    ToolchainError::NotFound(command.program().to_string())
                }
                _ => ToolchainError::Spawn {
                    program: command.program().to_string(),
                    source,
                },
            })?;

        let output = ToolOutput::from(output);
        trace!(code = ?output.code, "stdout: {}", output.stdout);
        if !output.stderr.is_empty() {
            trace!(code = ?output.code, "stderr: {}", output.stderr);
        }
        Ok(output)
    }
}
