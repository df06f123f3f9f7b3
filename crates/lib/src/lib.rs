//! wslrun-lib: Core types and logic for wslrun
//!
//! This crate translates editor build definitions into WSL process
//! invocations:
//! - `path`: Windows <-> POSIX path syntax conversion
//! - `vars`: build variables, their `unix_*` counterparts, and `$var` expansion
//! - `env`: the `/p` `/l` `/u` `/w` flag grammar and two-sided environment encoding
//! - `definition`: the `wsl_exec` build-definition format
//! - `invocation`: assembly of the final command, working directory, and environment
//! - `launch`: the process-launch collaborator interface and its tokio implementation

pub mod consts;
pub mod definition;
pub mod env;
pub mod error;
pub mod invocation;
pub mod launch;
pub mod path;
pub mod vars;

pub use definition::BuildDefinition;
pub use env::{ConversionFlag, EnvKey, EnvSpec, ResolvedEnvironment};
pub use error::ConfigError;
pub use invocation::BuildInvocation;
pub use launch::{LaunchError, ProcessHandle, ProcessLauncher, WslLauncher};
pub use path::PathSyntax;
pub use vars::VarSet;
