//! Shared constants for the build-target surface.

/// The `target` value that selects this build system.
pub const TARGET: &str = "wsl_exec";

/// Entry-point executable used to enter the subsystem.
pub const WSL_ENTRY_POINT: &str = "wsl";

/// Prefix under which Windows drives are mounted inside the subsystem.
pub const MOUNT_PREFIX: &str = "/mnt/";

/// UNC host under which the subsystem's own filesystem is exposed to Windows.
pub const WSL_UNC_HOST: &str = "wsl.localhost";

/// Variable Windows uses to decide which environment variables cross the
/// subsystem boundary and how their values are converted.
pub const WSLENV: &str = "WSLENV";

/// Path-valued build variables that receive a `unix_`-prefixed counterpart.
pub const TRANSLATED_VARS: &[&str] = &[
  "file",
  "file_path",
  "folder",
  "packages",
  "project",
  "project_path",
];
