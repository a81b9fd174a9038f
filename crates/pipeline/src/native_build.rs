// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::error::PipelineError;
use crate::layout::ArtifactLayout;
use crate::pipeline::{Pipeline, Stage};
use std::ffi::OsString;
use std::path::PathBuf;
use std::thread;
use tracing::{debug, info};
use zkf_config::BuildConfig;
use zkf_toolchain::{ToolCommand, ToolRunner};

/// Degree of parallelism handed to the native build
pub fn parallel_jobs(build: &BuildConfig) -> usize {
    if let Some(jobs) = build.jobs {
        return jobs.max(1);
    }
    match thread::available_parallelism() {
        Ok(n) => n.get(),
        Err(e) => {
            debug!(
                "could not detect cpu count ({}), using {}",
                e, build.default_jobs
            );
            build.default_jobs.max(1)
        }
    }
}

impl<R: ToolRunner> Pipeline<R> {
    /// Configure, build and install the witness calculator. Always rebuilds.
    pub(crate) async fn build_native(
        &self,
        layout: &ArtifactLayout,
    ) -> Result<PathBuf, PipelineError> {
        let cmake = &self.config.tools.cmake;
        let build_dir = layout.build_dir();

        let configure = ToolCommand::new(cmake).args(self.configure_args(layout));
        self.invoke(Stage::Configure, configure).await?;

        let jobs = parallel_jobs(&self.config.build);
        let build = ToolCommand::new(cmake)
            .arg("--build")
            .arg(&build_dir)
            .arg("--parallel")
            .arg(jobs.to_string());
        self.invoke(Stage::Build, build).await?;

        let install = ToolCommand::new(cmake).arg("--install").arg(&build_dir);
        self.invoke(Stage::Install, install).await?;

        let executable = layout.executable();
        self.expect_artifact(Stage::Install, &executable).await?;
        info!("installed {}", executable.display());
        Ok(executable)
    }

    fn configure_args(&self, layout: &ArtifactLayout) -> Vec<OsString> {
        let build = &self.config.build;
        let mut args: Vec<OsString> = vec![
            "-S".into(),
            self.config.build_source_dir().into(),
            "-B".into(),
            layout.build_dir().into(),
            define("CMAKE_BUILD_TYPE", build.build_type.as_str()),
            define("CMAKE_INSTALL_PREFIX", layout.install_prefix()),
            define("CIRCUIT_SOURCE", layout.native_source()),
        ];
        if let Some(platform) = build.target_platform.as_deref() {
            args.push(define("TARGET_PLATFORM", platform));
        }
        args
    }
}

fn define(name: &str, value: impl Into<OsString>) -> OsString {
    let mut arg = OsString::from(format!("-D{}=", name));
    arg.push(value.into());
    arg
}
