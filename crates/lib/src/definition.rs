//! The `wsl_exec` build-definition surface.
//!
//! A build definition is one target entry of the host editor's
//! build-system document. The keys mirror the stock `exec` target with a
//! `wsl_` prefix: `wsl_cmd` replaces `cmd`, `wsl_working_dir` replaces
//! `working_dir`, `wsl_env` replaces `env`. The optional `cancel` value is
//! not interpreted here; it is forwarded to whoever owns the spawned
//! process.

use serde::Deserialize;

use crate::consts::TARGET;
use crate::env::{EnvSpec, ResolvedEnvironment};
use crate::error::ConfigError;
use crate::invocation::{self, BuildInvocation};
use crate::vars::VarSet;

/// One parsed build-definition entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildDefinition {
  /// Build-target selector; when present it must name this system.
  pub target: Option<String>,

  /// Command argument vector, executed through the subsystem.
  pub wsl_cmd: Option<Vec<String>>,

  /// Working directory, subsystem-side after substitution.
  pub wsl_working_dir: Option<String>,

  /// Raw environment specification, names optionally flag-suffixed.
  #[serde(default)]
  pub wsl_env: EnvSpec,

  /// Opaque cancellation description, forwarded unmodified.
  #[serde(default)]
  pub cancel: Option<serde_json::Value>,
}

impl BuildDefinition {
  /// Parse a definition from its JSON document.
  pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
    serde_json::from_str(json)
  }

  /// Check the definition is complete enough to prepare an invocation.
  ///
  /// Returns the command vector on success. Runs before any translation
  /// step so a broken definition surfaces to the user without side
  /// effects.
  pub fn validate(&self) -> Result<&[String], ConfigError> {
    if let Some(target) = &self.target {
      if target != TARGET {
        return Err(ConfigError::WrongTarget(target.clone()));
      }
    }
    let cmd = self.wsl_cmd.as_deref().ok_or(ConfigError::MissingCommand)?;
    if cmd.is_empty() {
      return Err(ConfigError::EmptyCommand);
    }
    Ok(cmd)
  }

  /// Run the full translation pipeline: derive `unix_*` variables, encode
  /// the environment, and assemble the invocation.
  ///
  /// `vars` holds the editor-extracted build variables (plus any
  /// host-custom additions); it is taken by value because the derived
  /// `unix_*` entries are added to it.
  pub fn resolve(
    &self,
    mut vars: VarSet,
  ) -> Result<(BuildInvocation, ResolvedEnvironment), ConfigError> {
    let cmd = self.validate()?;

    vars.add_unix_variants();
    let resolved = self.wsl_env.encode(&vars);
    let invocation = invocation::assemble(
      cmd,
      self.wsl_working_dir.as_deref(),
      resolved.subsystem.clone(),
      &vars,
    );

    Ok((invocation, resolved))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_cmd_is_fatal() {
    let def = BuildDefinition::from_json(r#"{"target": "wsl_exec"}"#).unwrap();
    assert_eq!(def.validate(), Err(ConfigError::MissingCommand));
    assert!(def.resolve(VarSet::new()).is_err());
  }

  #[test]
  fn empty_cmd_is_fatal() {
    let def = BuildDefinition::from_json(r#"{"wsl_cmd": []}"#).unwrap();
    assert_eq!(def.validate(), Err(ConfigError::EmptyCommand));
  }

  #[test]
  fn wrong_target_is_fatal() {
    let def =
      BuildDefinition::from_json(r#"{"target": "exec", "wsl_cmd": ["true"]}"#).unwrap();
    assert_eq!(def.validate(), Err(ConfigError::WrongTarget("exec".to_string())));
  }

  #[test]
  fn absent_target_is_accepted() {
    let def = BuildDefinition::from_json(r#"{"wsl_cmd": ["true"]}"#).unwrap();
    assert!(def.validate().is_ok());
  }

  #[test]
  fn unknown_keys_are_ignored() {
    // The editor hands the whole target entry over, including keys owned
    // by other machinery ("name", "selector", ...).
    let def = BuildDefinition::from_json(
      r#"{"name": "Run Specs", "target": "wsl_exec", "wsl_cmd": ["make"]}"#,
    )
    .unwrap();
    assert!(def.validate().is_ok());
  }

  #[test]
  fn cancel_value_is_carried_verbatim() {
    let def = BuildDefinition::from_json(
      r#"{"wsl_cmd": ["make"], "cancel": {"kill": true}}"#,
    )
    .unwrap();
    assert_eq!(def.cancel, Some(serde_json::json!({"kill": true})));
  }

  #[test]
  fn resolve_runs_the_whole_pipeline() {
    let def = BuildDefinition::from_json(
      r#"{
        "target": "wsl_exec",
        "wsl_cmd": ["bundle", "exec", "rake", "spec"],
        "wsl_env": {"SPEC/p": "$file"},
        "wsl_working_dir": "$unix_folder"
      }"#,
    )
    .unwrap();

    let mut vars = VarSet::new();
    vars.insert("file", "C:\\proj\\a_spec.rb");
    vars.insert("folder", "C:\\proj");

    let (invocation, resolved) = def.resolve(vars).unwrap();
    assert_eq!(resolved.subsystem["SPEC"], "/mnt/c/proj/a_spec.rb");
    assert_eq!(invocation.working_dir.as_deref(), Some("/mnt/c/proj"));
    assert_eq!(invocation.env["SPEC"], "/mnt/c/proj/a_spec.rb");
  }
}
