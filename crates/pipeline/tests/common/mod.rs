// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

#![allow(dead_code)]

use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;
use zkf_config::{ToolchainConfig, ToolsConfig};
use zkf_pipeline::{InvocationArgs, InvocationRequest, Pipeline};
use zkf_toolchain::{ToolCommand, ToolOutput, ToolRunner, ToolchainError};

/// How the fake verifier answers
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    Accept,
    Reject,
    Crash,
}

/// Stands in for circom, cmake, snarkjs, the prover and the built witness calculator.
///
/// Every call is recorded and each tool writes the files the real one would so the pipeline's
/// existence checks behave as in production.
pub struct FakeToolchain {
    calls: Mutex<Vec<ToolCommand>>,
    r1cs: Mutex<Vec<u8>>,
    verdict: Mutex<Verdict>,
    fail_on: Mutex<Option<String>>,
    hang_on: Mutex<Option<String>>,
}

impl FakeToolchain {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(vec![]),
            r1cs: Mutex::new(b"r1cs v1".to_vec()),
            verdict: Mutex::new(Verdict::Accept),
            fail_on: Mutex::new(None),
            hang_on: Mutex::new(None),
        }
    }

    /// Content the compiler writes as the constraint system, and therefore its digest
    pub fn set_constraints(&self, content: &[u8]) {
        *self.r1cs.lock().unwrap() = content.to_vec();
    }

    pub fn set_verdict(&self, verdict: Verdict) {
        *self.verdict.lock().unwrap() = verdict;
    }

    /// Make any command whose rendering contains `needle` exit with status 1
    pub fn fail_on(&self, needle: Option<&str>) {
        *self.fail_on.lock().unwrap() = needle.map(str::to_string);
    }

    /// Make any command whose rendering contains `needle` write its output and then never exit,
    /// like a tool still running when the run is cancelled
    pub fn hang_on(&self, needle: Option<&str>) {
        *self.hang_on.lock().unwrap() = needle.map(str::to_string);
    }

    pub fn calls(&self) -> Vec<ToolCommand> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded commands whose rendering contains `needle`
    pub fn count(&self, needle: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.to_string().contains(needle))
            .count()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn simulate(&self, program: &str, args: &[String]) -> ToolOutput {
        let arg = |i: usize| PathBuf::from(&args[i]);
        match program {
            "circom" => {
                let out = args
                    .iter()
                    .position(|a| a == "-o")
                    .map(|i| arg(i + 1))
                    .expect("circom called without -o");
                let circuit = PathBuf::from(args.last().expect("circom called without circuit"));
                let name = circuit.file_stem().unwrap().to_string_lossy().to_string();
                touch(
                    &out.join(format!("{}_cpp", name))
                        .join(format!("{}.cpp", name)),
                    b"// generated",
                );
                if args.iter().any(|a| a == "--r1cs") {
                    let content = self.r1cs.lock().unwrap().clone();
                    touch(&out.join(format!("{}.r1cs", name)), &content);
                }
            }
            "cmake" => {
                if args[0] == "--install" {
                    let build_dir = arg(1);
                    let name = build_dir
                        .file_name()
                        .unwrap()
                        .to_string_lossy()
                        .trim_start_matches("build_")
                        .to_string();
                    let exe = format!("{}{}", name, std::env::consts::EXE_SUFFIX);
                    touch(
                        &build_dir.parent().unwrap().join("package").join("bin").join(exe),
                        b"\x7fELF",
                    );
                }
            }
            "snarkjs" => match (args[0].as_str(), args[1].as_str()) {
                ("groth16", "setup") => touch(&arg(4), b"zkey 0000"),
                ("zkey", "contribute") => touch(&arg(3), b"zkey final"),
                ("zkey", "export") => touch(&arg(4), b"{\"protocol\":\"groth16\"}"),
                ("groth16", "verify") => {
                    return match *self.verdict.lock().unwrap() {
                        Verdict::Accept => ToolOutput {
                            code: Some(0),
                            stdout: "[INFO]  snarkJS: OK!\n".to_string(),
                            stderr: String::new(),
                        },
                        Verdict::Reject => ToolOutput {
                            code: Some(1),
                            stdout: "[ERROR] snarkJS: Invalid proof\n".to_string(),
                            stderr: String::new(),
                        },
                        Verdict::Crash => ToolOutput {
                            code: Some(1),
                            stdout: String::new(),
                            stderr: "Error: ENOENT: no such file or directory\n".to_string(),
                        },
                    }
                }
                other => panic!("unexpected snarkjs call {:?}", other),
            },
            "prover" => {
                touch(&arg(2), b"{\"pi_a\":[]}");
                touch(&arg(3), b"[\"33\"]");
            }
            // the installed witness calculator
            _ => touch(&arg(1), b"wtns"),
        }
        ToolOutput::with_code(0)
    }
}

#[async_trait]
impl ToolRunner for FakeToolchain {
    async fn run(&self, command: &ToolCommand) -> Result<ToolOutput, ToolchainError> {
        self.calls.lock().unwrap().push(command.clone());

        if let Some(needle) = self.fail_on.lock().unwrap().as_deref() {
            if command.to_string().contains(needle) {
                return Ok(ToolOutput {
                    code: Some(1),
                    stdout: String::new(),
                    stderr: format!("{} blew up", command.program()),
                });
            }
        }

        let output = self.simulate(command.program(), &command.args_lossy());

        let hangs = self
            .hang_on
            .lock()
            .unwrap()
            .as_deref()
            .is_some_and(|needle| command.to_string().contains(needle));
        if hangs {
            std::future::pending::<()>().await;
        }

        Ok(output)
    }
}

fn touch(path: &Path, content: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn every_tool(name: &str) -> Option<PathBuf> {
    Some(PathBuf::from("/usr/local/bin").join(name))
}

/// A circuit project on disk: `multiplier.circom`, `input.json` and `pot12.ptau`
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("multiplier.circom"), b"pragma circom 2.1.6;");
        touch(&dir.path().join("input.json"), b"{\"a\": 3, \"b\": 11}");
        touch(&dir.path().join("pot12.ptau"), b"ptau");
        Self { dir }
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.path().join(file)
    }

    pub fn args(&self) -> InvocationArgs {
        InvocationArgs::new(self.path("multiplier.circom"))
    }

    pub fn request(&self, input: bool, ptau: bool) -> InvocationRequest {
        let mut args = self.args();
        if input {
            args.input = Some(self.path("input.json"));
        }
        if ptau {
            args.ptau = Some(self.path("pot12.ptau"));
        }
        args.validate(&ToolsConfig::default(), every_tool).unwrap()
    }

    pub fn out_dir(&self) -> PathBuf {
        self.path("out")
    }
}

pub fn fake_pipeline() -> Pipeline<FakeToolchain> {
    Pipeline::new(FakeToolchain::new(), ToolchainConfig::default())
}
