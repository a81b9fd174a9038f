// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod command;
mod error;
mod lookup;
mod runner;

pub use command::{ToolCommand, ToolOutput};
pub use error::ToolchainError;
pub use lookup::{find_executable, FindExecutable};
pub use runner::{ProcessRunner, ToolRunner};
