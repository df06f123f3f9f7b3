//! Assembly of the final process invocation.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::consts::WSL_ENTRY_POINT;
use crate::path;
use crate::vars::VarSet;

/// The fully resolved unit handed to the process-launch collaborator.
///
/// Created once per build trigger and owned by the caller until handed
/// off; never reused across invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildInvocation {
  /// Final argument vector, entry-point wrapping included.
  pub cmd: Vec<String>,

  /// Subsystem-side working directory, when one was configured.
  pub working_dir: Option<String>,

  /// Subsystem-side environment mapping.
  pub env: BTreeMap<String, String>,
}

/// Compose the argument vector, working directory, and environment.
///
/// Every command argument and the working directory receive `$variable`
/// substitution against the full variable set. The working directory is
/// then normalized to subsystem syntax, so both `$folder` and
/// `$unix_folder` spellings work.
///
/// Commands that do not already start with the subsystem entry point are
/// wrapped with it. A configured working directory is applied with an
/// embedded `cd <dir> ;` inside the subsystem rather than at spawn time:
/// a spawn-time working directory cannot name a path inside the
/// subsystem's own filesystem.
pub fn assemble(
  cmd: &[String],
  working_dir: Option<&str>,
  env: BTreeMap<String, String>,
  vars: &VarSet,
) -> BuildInvocation {
  let args: Vec<String> = cmd.iter().map(|arg| vars.expand(arg)).collect();

  let working_dir = working_dir
    .map(|dir| path::to_unix(&vars.expand(dir)))
    .filter(|dir| !dir.is_empty());

  let cmd = if is_entry_point(args.first()) {
    args
  } else {
    let mut wrapped = vec![WSL_ENTRY_POINT.to_string()];
    if let Some(dir) = &working_dir {
      wrapped.extend(["cd".to_string(), dir.clone(), ";".to_string()]);
    }
    wrapped.extend(args);
    wrapped
  };

  BuildInvocation {
    cmd,
    working_dir,
    env,
  }
}

/// True when the first argument already names the subsystem entry point.
fn is_entry_point(first: Option<&String>) -> bool {
  first.is_some_and(|arg| {
    arg.eq_ignore_ascii_case(WSL_ENTRY_POINT)
      || arg.eq_ignore_ascii_case(&format!("{WSL_ENTRY_POINT}.exe"))
  })
}
