// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::Result;
use std::fmt;
use std::future::Future;
use tokio::signal;
use tracing::warn;

/// Exit status used when a run is cut short by a signal
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Returned when the run was stopped by a termination signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interrupted(pub &'static str);

impl fmt::Display for Interrupted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Interrupted by {}", self.0)
    }
}

impl std::error::Error for Interrupted {}

/// Drive `work` to completion unless `signal` resolves first.
///
/// On a signal `work` is dropped before this returns, which kills any tool it was waiting on.
pub async fn until_terminated<T, W, S>(work: W, signal: S) -> Result<T>
where
    W: Future<Output = Result<T>>,
    S: Future<Output = &'static str>,
{
    tokio::select! {
        outcome = work => outcome,
        name = signal => {
            warn!("{} received, stopping", name);
            Err(Interrupted(name).into())
        }
    }
}

/// Resolves with the name of the first termination signal received: SIGINT, SIGTERM, SIGHUP
/// or SIGQUIT.
///
/// If a listener cannot be installed it never resolves for that signal, the run then simply
/// cannot be interrupted that way.
pub async fn termination_signal() -> &'static str {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => "SIGINT",
            Err(e) => {
                warn!("could not listen for SIGINT: {}", e);
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let others = async {
        use tokio::signal::unix::SignalKind;
        tokio::select! {
            name = unix_signal(SignalKind::terminate(), "SIGTERM") => name,
            name = unix_signal(SignalKind::hangup(), "SIGHUP") => name,
            name = unix_signal(SignalKind::quit(), "SIGQUIT") => name,
        }
    };

    #[cfg(not(unix))]
    let others = std::future::pending::<&'static str>();

    tokio::select! {
        name = ctrl_c => name,
        name = others => name,
    }
}

#[cfg(unix)]
async fn unix_signal(kind: signal::unix::SignalKind, name: &'static str) -> &'static str {
    match signal::unix::signal(kind) {
        Ok(mut stream) => {
            stream.recv().await;
            name
        }
        Err(e) => {
            warn!("could not listen for {}: {}", name, e);
            std::future::pending().await
        }
    }
}
