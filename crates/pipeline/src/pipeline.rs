// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::error::PipelineError;
use crate::layout::ArtifactLayout;
use crate::report::RunReport;
use crate::request::InvocationRequest;
use crate::workspace::Workspace;
use std::fmt;
use std::path::Path;
use tracing::{debug, info, instrument};
use zkf_config::ToolchainConfig;
use zkf_toolchain::{ToolCommand, ToolOutput, ToolRunner};

/// Individual tool invocations, used to attribute failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Compile,
    Configure,
    Build,
    Install,
    Witness,
    Setup,
    Contribute,
    Prove,
    ExportVerificationKey,
    Verify,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Compile => "compile",
            Stage::Configure => "configure",
            Stage::Build => "build",
            Stage::Install => "install",
            Stage::Witness => "witness generation",
            Stage::Setup => "groth16 setup",
            Stage::Contribute => "zkey contribution",
            Stage::Prove => "proof generation",
            Stage::ExportVerificationKey => "verification key export",
            Stage::Verify => "proof verification",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drives the compile → native build → witness → proof sequence through a [`ToolRunner`].
pub struct Pipeline<R: ToolRunner> {
    pub(crate) runner: R,
    pub(crate) config: ToolchainConfig,
}

impl<R: ToolRunner> Pipeline<R> {
    pub fn new(runner: R, config: ToolchainConfig) -> Self {
        Self { runner, config }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn config(&self) -> &ToolchainConfig {
        &self.config
    }

    /// Run every stage the request asks for. The first failure aborts the run.
    #[instrument(skip_all, fields(circuit = %request.name()))]
    pub async fn run(
        &self,
        request: &InvocationRequest,
        workspace: &Workspace,
    ) -> Result<RunReport, PipelineError> {
        let layout = ArtifactLayout::new(workspace.path(), request.name());
        let mut report = RunReport::new(workspace);

        self.compile(request, &layout).await?;
        report.native_source = Some(layout.native_source());
        if request.wants_proof() {
            report.constraints = Some(layout.constraints());
        }

        let executable = self.build_native(&layout).await?;
        report.executable = Some(executable.clone());

        let Some(input) = request.input() else {
            info!("no input given, stopping after build");
            return Ok(report);
        };
        report.witness = Some(self.generate_witness(&executable, input, &layout).await?);

        let Some(ptau) = request.ptau() else {
            info!("no trusted setup given, stopping after witness");
            return Ok(report);
        };
        report.proof = Some(self.prove(ptau, &layout).await?);

        Ok(report)
    }

    /// Run a tool and turn a non-zero exit into [`PipelineError::ToolFailed`]
    pub(crate) async fn invoke(
        &self,
        stage: Stage,
        command: ToolCommand,
    ) -> Result<ToolOutput, PipelineError> {
        info!("{}: {}", stage, command.program());
        debug!("{}", command);

        let output = self.runner.run(&command).await?;
        if !output.success() {
            return Err(tool_failed(stage, &command, output));
        }
        Ok(output)
    }

    pub(crate) async fn expect_artifact(
        &self,
        stage: Stage,
        path: &Path,
    ) -> Result<(), PipelineError> {
        if !tokio::fs::try_exists(path).await? {
            return Err(PipelineError::MissingArtifact {
                stage,
                path: path.to_path_buf(),
            });
        }
        Ok(())
    }
}

pub(crate) fn tool_failed(stage: Stage, command: &ToolCommand, output: ToolOutput) -> PipelineError {
    let stderr = if output.stderr.trim().is_empty() {
        output.stdout
    } else {
        output.stderr
    };
    PipelineError::ToolFailed {
        stage,
        program: command.program().to_string(),
        code: output.code,
        stderr,
    }
}
