// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::error::PipelineError;
use crate::layout::ArtifactLayout;
use crate::pipeline::{Pipeline, Stage};
use std::path::{Path, PathBuf};
use zkf_toolchain::{ToolCommand, ToolRunner};

impl<R: ToolRunner> Pipeline<R> {
    /// Run the installed witness calculator over the input document
    pub(crate) async fn generate_witness(
        &self,
        executable: &Path,
        input: &Path,
        layout: &ArtifactLayout,
    ) -> Result<PathBuf, PipelineError> {
        let witness = layout.witness();
        let command = ToolCommand::new(executable.to_string_lossy())
            .arg(input)
            .arg(&witness);
        self.invoke(Stage::Witness, command).await?;
        self.expect_artifact(Stage::Witness, &witness).await?;
        Ok(witness)
    }
}
