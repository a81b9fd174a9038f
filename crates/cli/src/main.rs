// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use clap::Parser;
use cli::Cli;
use tracing::debug;

mod cli;
pub mod helpers;

#[tokio::main]
pub async fn main() {
    let cli = Cli::parse();
    helpers::telemetry::setup_tracing(cli.log_level());
    debug!("zkforge {} ({})", env!("CARGO_PKG_VERSION"), env!("GIT_SHA"));

    // Execute the cli
    if let Err(err) = cli.execute().await {
        eprintln!("Error: {:#}", err);
        std::process::exit(cli::exit_code(&err));
    }
}
