//! Error types for build-definition validation.

use thiserror::Error;

/// Fatal configuration errors, surfaced before any process is prepared.
///
/// Everything else in this crate degrades gracefully: a path that cannot be
/// translated or a variable that cannot be resolved is passed through (or
/// emptied) with a warning, on the principle that a best-effort translation
/// is more useful than a blocked build.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
  /// The definition selects a different build target.
  #[error("definition targets '{0}', expected 'wsl_exec'")]
  WrongTarget(String),

  /// `wsl_cmd` is missing from the definition.
  #[error("definition has no 'wsl_cmd'")]
  MissingCommand,

  /// `wsl_cmd` is present but empty.
  #[error("'wsl_cmd' must contain at least one argument")]
  EmptyCommand,
}
