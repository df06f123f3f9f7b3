//! Implementation of the `wslrun resolve` command.
//!
//! Dry-run counterpart to `run`: prints the assembled command, working
//! directory, and both environment mappings without launching anything.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use wslrun_lib::BuildInvocation;

use crate::cmd::{build_vars, load_definition};
use crate::output::{self, OutputFormat, symbols};

#[derive(Serialize)]
struct Resolved<'a> {
  invocation: &'a BuildInvocation,
  host_env: &'a BTreeMap<String, String>,
}

pub fn cmd_resolve(definition: &Path, set: &[String], format: OutputFormat) -> Result<()> {
  let def = load_definition(definition)?;
  let vars = build_vars(set)?;
  let (invocation, resolved) = def.resolve(vars)?;

  if format.is_json() {
    return output::print_json(&Resolved {
      invocation: &invocation,
      host_env: &resolved.host,
    });
  }

  output::print_heading("Command");
  println!("  {}", invocation.cmd.join(" "));

  if let Some(dir) = &invocation.working_dir {
    output::print_heading("Working directory");
    println!("  {dir}");
  }

  if !invocation.env.is_empty() {
    output::print_heading("Subsystem environment");
    for (name, value) in &invocation.env {
      output::print_stat(name, value);
    }
  }

  if !resolved.host.is_empty() {
    output::print_heading("Host environment");
    for (name, value) in &resolved.host {
      output::print_stat(name, value);
    }
  }

  println!();
  println!("{} dry run, nothing launched", symbols::ARROW);
  Ok(())
}
