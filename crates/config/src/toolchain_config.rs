// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::load_config::{find_in_parent, resolve_config_path, DEFAULT_CONFIG_NAME, ENV_PREFIX};
use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use path_clean::clean;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Names (or paths) of the external executables the pipeline drives
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct ToolsConfig {
    /// Circuit compiler
    pub compiler: String,
    /// Native build system used to build the witness calculator
    pub cmake: String,
    /// Proof system CLI used for setup, key export and verification
    pub snarkjs: String,
    /// Native prover binary
    pub prover: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            compiler: "circom".to_string(),
            cmake: "cmake".to_string(),
            snarkjs: "snarkjs".to_string(),
            prover: "prover".to_string(),
        }
    }
}

/// Settings for the native witness calculator build
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// CMake project that wraps the generated circuit source. Defaults to the working directory.
    /// Relative paths are resolved against the directory holding the configuration file.
    pub source_dir: Option<PathBuf>,
    /// Passed through as `CMAKE_BUILD_TYPE`
    pub build_type: String,
    /// Passed through as `TARGET_PLATFORM` when set
    pub target_platform: Option<String>,
    /// Pin the build parallelism instead of detecting it
    pub jobs: Option<usize>,
    /// Parallelism used when the CPU count cannot be detected
    pub default_jobs: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source_dir: None,
            build_type: "Release".to_string(),
            target_platform: None,
            jobs: None,
            default_jobs: 4,
        }
    }
}

/// Settings for proving key generation
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct SetupConfig {
    /// Number of random bytes hex encoded into the contribution entropy
    pub entropy_bytes: usize,
    /// Name recorded with the key contribution
    pub contributor: String,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            entropy_bytes: 32,
            contributor: "zkforge".to_string(),
        }
    }
}

/// The config actually used throughout the app
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ToolchainConfig {
    pub tools: ToolsConfig,
    pub build: BuildConfig,
    pub setup: SetupConfig,
    /// File the configuration was read from if any
    #[serde(skip)]
    config_file: Option<PathBuf>,
}

impl ToolchainConfig {
    /// Layer defaults, the optional yaml file and `ZKFORGE_` environment variables
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(ToolchainConfig::default()));

        if let Some(file) = config_file {
            if !file.is_file() {
                bail!("Configuration file not found: {}", file.display());
            }
            figment = figment.merge(Yaml::file(file));
        }

        let mut config: ToolchainConfig = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Could not parse configuration")?;

        if let Some(file) = config_file {
            if let Some(dir) = file.parent() {
                config.anchor_paths(dir);
            }
            config.config_file = Some(file.to_path_buf());
        }

        Ok(config)
    }

    /// Get the config file path
    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Directory handed to the native build as its project source
    pub fn build_source_dir(&self) -> PathBuf {
        self.build
            .source_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn anchor_paths(&mut self, base: &Path) {
        if let Some(dir) = self.build.source_dir.as_ref() {
            if dir.is_relative() {
                self.build.source_dir = Some(clean(base.join(dir)));
            }
        }
    }
}

/// Load configuration for the current working directory honouring an explicit `--config` file
pub fn load_config(cli_file: Option<&Path>) -> Result<ToolchainConfig> {
    let cwd = env::current_dir()?;
    let resolved = resolve_config_path(find_in_parent, &cwd, DEFAULT_CONFIG_NAME, cli_file);
    match resolved.as_deref() {
        Some(file) => debug!("loading configuration from {}", file.display()),
        None => debug!("no {} found, using defaults", DEFAULT_CONFIG_NAME),
    }
    ToolchainConfig::load(resolved.as_deref())
}
