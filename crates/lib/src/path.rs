//! Windows <-> POSIX path syntax conversion.
//!
//! Conversion is purely syntactic: no filesystem access, no existence
//! checks. A value that carries no recognizable prefix is returned
//! unchanged, so callers can apply conversion unconditionally and still
//! hand already-converted or relative paths through intact.

use crate::consts::{MOUNT_PREFIX, WSL_UNC_HOST};

/// The syntax family a path value is written in.
///
/// Detection is heuristic: a value starting with `/` is POSIX, everything
/// else is treated as Windows. This is the documented contract for
/// bidirectional conversion; values are never tagged by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSyntax {
  Windows,
  Posix,
}

impl PathSyntax {
  /// Sniff the syntax family of a path value.
  pub fn detect(value: &str) -> Self {
    if value.starts_with('/') {
      PathSyntax::Posix
    } else {
      PathSyntax::Windows
    }
  }

  /// Delimiter separating entries of a list-valued variable in this syntax.
  pub fn list_delimiter(self) -> char {
    match self {
      PathSyntax::Windows => ';',
      PathSyntax::Posix => ':',
    }
  }
}

/// Convert a Windows path to its in-subsystem POSIX form.
///
/// Two prefix families are recognized:
/// - `X:\...` becomes `/mnt/x/...` (drive lowercased, separators flipped)
/// - `\\wsl.localhost\<distro>\...` is the subsystem's own filesystem seen
///   from Windows; the UNC prefix is stripped and the remainder flipped
///
/// Anything else is returned unchanged.
pub fn to_unix(path: &str) -> String {
  try_to_unix(path).unwrap_or_else(|| path.to_string())
}

/// Convert a POSIX mount path back to Windows drive syntax.
///
/// `/mnt/x/...` becomes `X:\...` (drive uppercased, separators flipped).
/// Paths outside the drive mounts have no Windows spelling and are
/// returned unchanged.
pub fn to_windows(path: &str) -> String {
  try_to_windows(path).unwrap_or_else(|| path.to_string())
}

/// Windows -> POSIX, or `None` when the value has no recognizable prefix.
pub fn try_to_unix(path: &str) -> Option<String> {
  if let Some(unc_rest) = strip_wsl_unc(path) {
    return Some(unc_rest.replace('\\', "/"));
  }

  let mut chars = path.chars();
  let drive = chars.next()?;
  let colon = chars.next()?;
  if !drive.is_ascii_alphabetic() || colon != ':' {
    return None;
  }
  let rest = chars.as_str();
  if !rest.is_empty() && !rest.starts_with(['\\', '/']) {
    // Drive-relative ("C:foo") has no fixed mount-point spelling.
    return None;
  }
  let rest = rest.trim_start_matches(['\\', '/']);
  Some(format!(
    "{}{}/{}",
    MOUNT_PREFIX,
    drive.to_ascii_lowercase(),
    rest.replace('\\', "/")
  ))
}

/// POSIX mount path -> Windows, or `None` when the value is not under a
/// drive mount.
pub fn try_to_windows(path: &str) -> Option<String> {
  let rest = path.strip_prefix(MOUNT_PREFIX)?;
  let mut chars = rest.chars();
  let drive = chars.next()?;
  if !drive.is_ascii_alphabetic() {
    return None;
  }
  let rest = chars.as_str();
  if !rest.is_empty() && !rest.starts_with('/') {
    // "/mnt/cache" is a directory named "cache", not drive C.
    return None;
  }
  let rest = rest.trim_start_matches('/');
  Some(format!(
    "{}:\\{}",
    drive.to_ascii_uppercase(),
    rest.replace('/', "\\")
  ))
}

/// Strip the `\\wsl.localhost\<distro>` prefix, returning the in-subsystem
/// remainder (still backslash-separated).
fn strip_wsl_unc(path: &str) -> Option<&str> {
  let rest = path.strip_prefix("\\\\")?;
  let (host, rest) = rest.split_once('\\')?;
  if !host.eq_ignore_ascii_case(WSL_UNC_HOST) {
    return None;
  }
  // Skip the distro name; what follows is an absolute subsystem path.
  match rest.find('\\') {
    Some(idx) => Some(&rest[idx..]),
    None => Some("\\"),
  }
}
