// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::error::ValidationError;
use std::path::{Path, PathBuf};
use tracing::debug;
use zkf_config::ToolsConfig;
use zkf_toolchain::FindExecutable;

pub const CIRCUIT_EXTENSION: &str = "circom";

/// Arguments as parsed from the command line, not yet checked against the filesystem
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvocationArgs {
    /// Circuit source file
    pub circuit: PathBuf,
    /// Include paths for the compiler in the order given
    pub includes: Vec<PathBuf>,
    /// Persistent output directory, an ephemeral one is used when absent
    pub output_dir: Option<PathBuf>,
    /// Input document for witness generation
    pub input: Option<PathBuf>,
    /// Powers of tau file enabling the proof cascade
    pub ptau: Option<PathBuf>,
}

impl InvocationArgs {
    pub fn new(circuit: impl Into<PathBuf>) -> Self {
        Self {
            circuit: circuit.into(),
            ..Default::default()
        }
    }

    /// Check every precondition that does not require running a tool.
    ///
    /// Nothing is written to disk. When a trusted setup file is given the proof tools named in
    /// `tools` must resolve through `find_executable` up front rather than failing late.
    pub fn validate(
        self,
        tools: &ToolsConfig,
        find_executable: FindExecutable,
    ) -> Result<InvocationRequest, ValidationError> {
        let name = circuit_name(&self.circuit)?;

        if !self.circuit.is_file() {
            return Err(ValidationError::CircuitNotFound(self.circuit));
        }

        if let Some(input) = self.input.as_ref() {
            if !input.is_file() {
                return Err(ValidationError::InputNotFound(input.clone()));
            }
        }

        if let Some(ptau) = self.ptau.as_ref() {
            if self.input.is_none() {
                return Err(ValidationError::PtauRequiresInput);
            }
            if !ptau.is_file() {
                return Err(ValidationError::PtauNotFound(ptau.clone()));
            }
            for tool in [&tools.snarkjs, &tools.prover] {
                match find_executable(tool) {
                    Some(path) => debug!("found {} at {}", tool, path.display()),
                    None => return Err(ValidationError::MissingExecutable(tool.clone())),
                }
            }
        }

        Ok(InvocationRequest { args: self, name })
    }
}

/// A request that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationRequest {
    args: InvocationArgs,
    name: String,
}

impl InvocationRequest {
    pub fn circuit(&self) -> &Path {
        &self.args.circuit
    }

    /// Circuit base name without its extension, used to name every artifact
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn includes(&self) -> &[PathBuf] {
        &self.args.includes
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.args.output_dir.as_deref()
    }

    pub fn input(&self) -> Option<&Path> {
        self.args.input.as_deref()
    }

    pub fn ptau(&self) -> Option<&Path> {
        self.args.ptau.as_deref()
    }

    /// Whether the compiler must also emit the constraint system
    pub fn wants_proof(&self) -> bool {
        self.args.ptau.is_some()
    }
}

fn circuit_name(circuit: &Path) -> Result<String, ValidationError> {
    let wrong_extension = || ValidationError::WrongExtension {
        path: circuit.to_path_buf(),
        extension: CIRCUIT_EXTENSION,
    };

    if circuit.extension().and_then(|e| e.to_str()) != Some(CIRCUIT_EXTENSION) {
        return Err(wrong_extension());
    }

    circuit
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(wrong_extension)
}
