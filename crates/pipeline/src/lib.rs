// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod compile;
mod digest;
mod error;
mod layout;
mod native_build;
mod pipeline;
mod proof;
mod report;
mod request;
mod witness;
mod workspace;

pub use digest::CacheKey;
pub use error::{PipelineError, ValidationError};
pub use layout::{ArtifactLayout, KeyPaths};
pub use native_build::parallel_jobs;
pub use pipeline::{Pipeline, Stage};
pub use report::{ProofReport, RunReport};
pub use request::{InvocationArgs, InvocationRequest, CIRCUIT_EXTENSION};
pub use workspace::Workspace;
