//! Command execution helpers
//!
//! Every host-facing command times itself and logs one structured
//! `command_execution_*` event. These wrappers keep that boilerplate out of
//! the command bodies.

use std::future::Future;
use std::time::Instant;

use daytrace_domain::Result as DomainResult;
use tracing::debug;

use crate::utils::logging::{error_label, log_command_execution};

/// Run a fallible command, logging its duration and outcome.
pub async fn execute_logged<F, Fut, T>(command_name: &str, command_fn: F) -> DomainResult<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = DomainResult<T>>,
{
    let start = Instant::now();
    let result = command_fn().await;

    if let Err(err) = &result {
        debug!(command = command_name, error_type = error_label(err), "command failed");
    }
    log_command_execution(command_name, start.elapsed(), result.is_ok());

    result
}

/// Run a command whose failures fall back to `default`.
///
/// Used by the read-side cache commands, which never surface an error to the
/// host.
pub async fn execute_with_default<F, Fut, T>(command_name: &str, default: T, command_fn: F) -> T
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = DomainResult<T>>,
{
    execute_logged(command_name, command_fn).await.unwrap_or(default)
}

/// Run a command and convert its error to the message shown to the host.
pub async fn execute_with_string_error<F, Fut, T>(
    command_name: &str,
    command_fn: F,
) -> Result<T, String>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = DomainResult<T>>,
{
    execute_logged(command_name, command_fn).await.map_err(|e| e.to_string())
}
