// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::helpers::shutdown::{
    termination_signal, until_terminated, Interrupted, INTERRUPTED_EXIT_CODE,
};
use anyhow::Result;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use tracing::{info, instrument, Level};
use zkf_config::load_config;
use zkf_pipeline::{InvocationArgs, Pipeline, PipelineError, Workspace};
use zkf_toolchain::{find_executable, ProcessRunner};

#[derive(Parser, Debug)]
#[command(name = "zkforge")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_SHA"), ")"))]
#[command(
    about = "Compile a circom circuit, build its witness calculator and optionally prove and verify a witness",
    long_about = None
)]
pub struct Cli {
    /// Circuit source file (.circom)
    #[arg(value_name = "CIRCUIT")]
    circuit: PathBuf,

    /// Add a directory to the compiler's include search path. May be repeated.
    #[arg(short = 'l', value_name = "PATH", action = ArgAction::Append)]
    includes: Vec<PathBuf>,

    /// Keep all artifacts in this directory. Without it a temporary directory is used and removed on exit.
    #[arg(short = 'o', value_name = "DIR")]
    output: Option<PathBuf>,

    /// Input document used to calculate a witness
    #[arg(short = 'i', value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Powers of tau file. Generates (or reuses) the proving key, proves the witness and verifies the proof. Requires -i.
    #[arg(short = 'p', value_name = "PTAU")]
    ptau: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Indicate error levels by adding additional `-v` arguments. Eg. `zkforge -vvv` will give you
    /// trace level output
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Silence all output. This argument cannot be used alongside `-v`
    #[arg(short, long, action = ArgAction::SetTrue, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        if self.quiet {
            Level::ERROR
        } else {
            match self.verbose {
                0 => Level::WARN,  //
                1 => Level::INFO,  // -v
                2 => Level::DEBUG, // -vv
                _ => Level::TRACE, // -vvv
            }
        }
    }

    pub fn invocation(&self) -> InvocationArgs {
        InvocationArgs {
            circuit: self.circuit.clone(),
            includes: self.includes.clone(),
            output_dir: self.output.clone(),
            input: self.input.clone(),
            ptau: self.ptau.clone(),
        }
    }

    #[instrument(skip_all)]
    pub async fn execute(self) -> Result<()> {
        let config = load_config(self.config.as_deref())?;
        if let Some(file) = config.config_file() {
            info!("Config loaded from: {}", file.display());
        }

        let request = self
            .invocation()
            .validate(&config.tools, find_executable)
            .map_err(PipelineError::from)?;

        let workspace = Workspace::resolve(request.output_dir()).map_err(PipelineError::from)?;
        let pipeline = Pipeline::new(ProcessRunner::new(), config);

        // The pipeline is dropped, killing any running tool, before the workspace goes away
        let outcome = until_terminated(
            async {
                pipeline
                    .run(&request, &workspace)
                    .await
                    .map_err(anyhow::Error::from)
            },
            termination_signal(),
        )
        .await;

        if let Err(e) = workspace.close() {
            tracing::warn!("could not remove temporary directory: {}", e);
        }

        let report = outcome?;
        if !self.quiet {
            print!("{}", report);
        }
        Ok(())
    }
}

/// Map a failed run to the process exit status
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(e) = err.downcast_ref::<PipelineError>() {
        return e.exit_code();
    }
    if err.downcast_ref::<Interrupted>().is_some() {
        return INTERRUPTED_EXIT_CODE;
    }
    1
}
