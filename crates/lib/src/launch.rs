//! The process-launch collaborator.
//!
//! The translation core never spawns processes on its own: it hands a
//! complete [`BuildInvocation`] to a [`ProcessLauncher`] and receives back
//! a cancellable [`ProcessHandle`]. The launcher is passed in explicitly
//! wherever a build is run, so hosts can substitute their own execution
//! machinery.

use std::path::Path;
use std::process::ExitStatus;

use thiserror::Error;
use tokio::process::{Child, Command};
use tracing::{debug, info};

use crate::invocation::BuildInvocation;

/// Errors from spawning or controlling the build process.
#[derive(Debug, Error)]
pub enum LaunchError {
  /// The invocation carried no arguments at all.
  #[error("invocation has an empty command vector")]
  EmptyCommand,

  /// The entry-point executable could not be started.
  #[error("failed to spawn '{program}': {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },

  /// I/O error while waiting on or signalling the process.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

/// Launches a prepared invocation and returns a cancellable handle.
pub trait ProcessLauncher {
  fn launch(&self, invocation: &BuildInvocation) -> Result<ProcessHandle, LaunchError>;
}

/// Default launcher: spawns the invocation with `tokio::process`.
///
/// Stdio is inherited so build output streams straight through to the
/// caller. The invocation's environment is applied on top of the parent
/// environment rather than replacing it; the entry point itself (and
/// `WSLENV` forwarding) depends on the host environment being present.
#[derive(Debug, Clone, Copy, Default)]
pub struct WslLauncher;

impl ProcessLauncher for WslLauncher {
  fn launch(&self, invocation: &BuildInvocation) -> Result<ProcessHandle, LaunchError> {
    let (program, args) = invocation
      .cmd
      .split_first()
      .ok_or(LaunchError::EmptyCommand)?;

    info!(cmd = %invocation.cmd.join(" "), "launching build");

    let mut command = Command::new(program);
    command.args(args);
    for (name, value) in &invocation.env {
      command.env(name, value);
    }

    // The subsystem-side working directory usually has no meaning to the
    // host (the assembler embeds a `cd` for that); apply it only when it
    // also exists as a host path.
    if let Some(dir) = invocation
      .working_dir
      .as_deref()
      .filter(|dir| Path::new(dir).is_dir())
    {
      command.current_dir(dir);
    }

    debug!(program = %program, env_vars = invocation.env.len(), "spawning process");

    let child = command.spawn().map_err(|source| LaunchError::Spawn {
      program: program.clone(),
      source,
    })?;

    Ok(ProcessHandle { child })
  }
}

/// A running build process.
pub struct ProcessHandle {
  child: Child,
}

impl ProcessHandle {
  /// OS process id, while the process is still running.
  pub fn id(&self) -> Option<u32> {
    self.child.id()
  }

  /// Wait for the process to finish.
  pub async fn wait(&mut self) -> Result<ExitStatus, LaunchError> {
    Ok(self.child.wait().await?)
  }

  /// Kill the process in response to a cancellation request.
  pub async fn cancel(&mut self) -> Result<(), LaunchError> {
    info!(pid = ?self.child.id(), "cancelling build");
    Ok(self.child.kill().await?)
  }
}
