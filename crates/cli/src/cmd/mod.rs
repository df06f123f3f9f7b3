use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::debug;

use wslrun_lib::{BuildDefinition, VarSet};

mod resolve;
mod run;

pub use resolve::cmd_resolve;
pub use run::cmd_run;

/// Load and parse a build-definition file.
pub(crate) fn load_definition(path: &Path) -> Result<BuildDefinition> {
  let json = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read definition file {}", path.display()))?;
  let definition = BuildDefinition::from_json(&json)
    .with_context(|| format!("Failed to parse definition file {}", path.display()))?;
  debug!(path = %path.display(), "definition loaded");
  Ok(definition)
}

/// Build the variable set from repeated `--set NAME=VALUE` arguments.
///
/// Stands in for the editor's variable extraction; `platform` defaults to
/// `windows` when not supplied.
pub(crate) fn build_vars(pairs: &[String]) -> Result<VarSet> {
  let mut vars = VarSet::new();
  vars.insert("platform", "windows");
  for pair in pairs {
    let Some((name, value)) = pair.split_once('=') else {
      bail!("Invalid --set value '{pair}', expected NAME=VALUE");
    };
    vars.insert(name, value);
  }
  Ok(vars)
}
