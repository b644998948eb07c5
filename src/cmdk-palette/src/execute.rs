//! Command invocation.
//!
//! Synchronous actions run inline. Asynchronous actions are spawned on the
//! current tokio runtime and not awaited. Errors returned by either kind are
//! logged and go no further.

use tokio::task::JoinHandle;

use crate::command::{CommandAction, CommandItem};
use crate::error::{PaletteError, Result};

/// What happened when a command was invoked.
#[derive(Debug)]
pub enum Invocation {
    /// Synchronous action returned `Ok`
    Completed,
    /// Synchronous action returned an error (already logged)
    Failed,
    /// Asynchronous action is running in the background
    Spawned(JoinHandle<()>),
}

/// Runs `item`'s action.
pub fn invoke(item: &CommandItem) -> Result<Invocation> {
    match &item.action {
        CommandAction::Sync(action) => {
            tracing::debug!(command = %item.id, "running command");
            match action() {
                Ok(()) => Ok(Invocation::Completed),
                Err(err) => {
                    tracing::warn!(command = %item.id, error = %err, "command failed");
                    Ok(Invocation::Failed)
                }
            }
        }
        CommandAction::Async(action) => {
            let handle = tokio::runtime::Handle::try_current()
                .map_err(|_| PaletteError::NoRuntime(item.id.clone()))?;

            tracing::debug!(command = %item.id, "spawning command");
            let id = item.id.clone();
            let future = action();
            Ok(Invocation::Spawned(handle.spawn(async move {
                if let Err(err) = future.await {
                    tracing::warn!(command = %id, error = %err, "command failed");
                }
            })))
        }
    }
}
