// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

pub mod load_config;
mod toolchain_config;

pub use load_config::{find_in_parent, resolve_config_path, DEFAULT_CONFIG_NAME, ENV_PREFIX};
pub use toolchain_config::*;
