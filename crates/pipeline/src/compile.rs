// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::error::PipelineError;
use crate::layout::ArtifactLayout;
use crate::pipeline::{Pipeline, Stage};
use crate::request::InvocationRequest;
use zkf_toolchain::{ToolCommand, ToolRunner};

impl<R: ToolRunner> Pipeline<R> {
    /// Compile the circuit to C++ and, when a proof is wanted, to an r1cs constraint system
    pub(crate) async fn compile(
        &self,
        request: &InvocationRequest,
        layout: &ArtifactLayout,
    ) -> Result<(), PipelineError> {
        let command = compile_command(&self.config.tools.compiler, request, layout);
        self.invoke(Stage::Compile, command).await?;

        self.expect_artifact(Stage::Compile, &layout.native_source())
            .await?;
        if request.wants_proof() {
            self.expect_artifact(Stage::Compile, &layout.constraints())
                .await?;
        }
        Ok(())
    }
}

pub(crate) fn compile_command(
    compiler: &str,
    request: &InvocationRequest,
    layout: &ArtifactLayout,
) -> ToolCommand {
    let mut command = ToolCommand::new(compiler).arg("--c");
    if request.wants_proof() {
        command = command.arg("--r1cs");
    }
    for include in request.includes() {
        command = command.arg("-l").arg(include);
    }
    command
        .arg("-o")
        .arg(layout.root())
        .arg(request.circuit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::InvocationArgs;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;
    use zkf_config::ToolsConfig;

    fn all_tools(_: &str) -> Option<PathBuf> {
        Some(PathBuf::from("/bin/true"))
    }

    #[test]
    fn test_command_shape() {
        let temp = tempdir().unwrap();
        let circuit = temp.path().join("main.circom");
        let input = temp.path().join("input.json");
        let ptau = temp.path().join("pot.ptau");
        for f in [&circuit, &input, &ptau] {
            fs::write(f, b"").unwrap();
        }
        let layout = ArtifactLayout::new(Path::new("/ws"), "main");

        let mut args = InvocationArgs::new(&circuit);
        args.includes = vec![PathBuf::from("node_modules"), PathBuf::from("lib")];
        let request = args
            .clone()
            .validate(&ToolsConfig::default(), all_tools)
            .unwrap();
        let command = compile_command("circom", &request, &layout);
        assert_eq!(
            command.args_lossy(),
            vec![
                "--c".to_string(),
                "-l".to_string(),
                "node_modules".to_string(),
                "-l".to_string(),
                "lib".to_string(),
                "-o".to_string(),
                "/ws".to_string(),
                circuit.to_string_lossy().to_string(),
            ]
        );

        args.input = Some(input);
        args.ptau = Some(ptau);
        let request = args.validate(&ToolsConfig::default(), all_tools).unwrap();
        let command = compile_command("circom", &request, &layout);
        assert_eq!(command.args_lossy()[..2], ["--c", "--r1cs"]);
    }
}
