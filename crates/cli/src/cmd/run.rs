//! Implementation of the `wslrun run` command.
//!
//! Loads a build definition, resolves it into an invocation, launches the
//! process, and waits for it to finish. When the definition's `cancel`
//! value asks for it (`{"kill": true}`), Ctrl-C kills the child instead of
//! only interrupting the CLI.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use wslrun_lib::launch::{ProcessLauncher, WslLauncher};
use wslrun_lib::BuildInvocation;

use crate::cmd::{build_vars, load_definition};
use crate::output;

pub fn cmd_run(definition: &Path, set: &[String]) -> Result<()> {
  let def = load_definition(definition)?;
  let vars = build_vars(set)?;
  let (invocation, _) = def.resolve(vars)?;

  let kill_on_interrupt = def
    .cancel
    .as_ref()
    .and_then(|cancel| cancel.get("kill"))
    .and_then(serde_json::Value::as_bool)
    .unwrap_or(false);

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  rt.block_on(run_build(invocation, kill_on_interrupt))
}

async fn run_build(invocation: BuildInvocation, kill_on_interrupt: bool) -> Result<()> {
  let started = Instant::now();
  let mut handle = WslLauncher.launch(&invocation)?;

  let outcome = if kill_on_interrupt {
    tokio::select! {
      status = handle.wait() => Some(status),
      _ = tokio::signal::ctrl_c() => None,
    }
  } else {
    Some(handle.wait().await)
  };

  let Some(status) = outcome else {
    handle.cancel().await?;
    output::print_warning("Build cancelled");
    std::process::exit(130);
  };

  let status = status?;
  let elapsed = output::format_duration(started.elapsed());

  if status.success() {
    output::print_success(&format!("Finished in {elapsed}"));
    Ok(())
  } else {
    output::print_error(&format!(
      "Build failed with exit code {:?} after {elapsed}",
      status.code()
    ));
    std::process::exit(status.code().unwrap_or(1));
  }
}
