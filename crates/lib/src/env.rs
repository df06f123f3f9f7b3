//! Environment variable encoding across the subsystem boundary.
//!
//! Variable names in a build definition's `wsl_env` map may carry a
//! two-character conversion flag suffix that controls how the value is
//! treated on each side of the boundary:
//!
//! - `/p` — the value is a single path, translated between Windows and
//!   subsystem syntax
//! - `/l` — the value is a list of paths; colon-delimited in the
//!   subsystem, semicolon-delimited on Windows
//! - `/u` — the value is only set when invoking the subsystem from
//!   Windows (host side only)
//! - `/w` — the value crosses the boundary verbatim, explicitly opting
//!   out of automatic conversion
//!
//! The suffix is parsed once at definition-load time into an [`EnvKey`];
//! nothing downstream re-parses names. Encoding produces two mappings, one
//! for the subsystem-side process and one for any Windows-side process
//! reading the same logical variables back.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::consts::WSLENV;
use crate::path::{self, PathSyntax};
use crate::vars::VarSet;

/// How a variable's value converts between Windows and subsystem syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionFlag {
  /// `/p` — single path, converted between syntaxes.
  PathSingle,
  /// `/l` — path list, split, converted per segment, rejoined.
  PathList,
  /// `/u` — host side only.
  WindowsOnly,
  /// `/w` — passed through verbatim on both sides.
  NoAutoConvert,
}

impl ConversionFlag {
  fn from_suffix(suffix: char) -> Option<Self> {
    match suffix {
      'p' => Some(ConversionFlag::PathSingle),
      'l' => Some(ConversionFlag::PathList),
      'u' => Some(ConversionFlag::WindowsOnly),
      'w' => Some(ConversionFlag::NoAutoConvert),
      _ => None,
    }
  }

  pub fn suffix(self) -> char {
    match self {
      ConversionFlag::PathSingle => 'p',
      ConversionFlag::PathList => 'l',
      ConversionFlag::WindowsOnly => 'u',
      ConversionFlag::NoAutoConvert => 'w',
    }
  }
}

/// A parsed environment variable name: the bare name plus its optional
/// conversion flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvKey {
  pub name: String,
  pub flag: Option<ConversionFlag>,
}

impl EnvKey {
  /// Parse a raw map key, splitting off a trailing conversion flag.
  ///
  /// At most one flag is recognized; a suffix that is not one of the four
  /// flags (or a name that would become empty) is kept as literal name
  /// characters.
  pub fn parse(raw: &str) -> Self {
    let bytes = raw.as_bytes();
    if bytes.len() >= 3 && bytes[bytes.len() - 2] == b'/' {
      if let Some(flag) = ConversionFlag::from_suffix(bytes[bytes.len() - 1] as char) {
        return Self {
          name: raw[..raw.len() - 2].to_string(),
          flag: Some(flag),
        };
      }
    }
    Self {
      name: raw.to_string(),
      flag: None,
    }
  }
}

impl fmt::Display for EnvKey {
  /// The key as authored, flag suffix included.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.flag {
      Some(flag) => write!(f, "{}/{}", self.name, flag.suffix()),
      None => f.write_str(&self.name),
    }
  }
}

/// One `wsl_env` entry: parsed key plus the raw (unexpanded) value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvEntry {
  pub key: EnvKey,
  pub value: String,
}

/// The raw environment specification, in declaration order.
///
/// Order matters: when the same bare name is declared more than once, the
/// last declaration determines the variable's disposition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSpec {
  entries: Vec<EnvEntry>,
}

impl EnvSpec {
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// The `WSLENV` value for this spec: the keys as authored, flag
  /// suffixes included, joined with `:` in declaration order. This is the
  /// list Windows consults when forwarding variables into the subsystem.
  pub fn wslenv_value(&self) -> String {
    self
      .entries
      .iter()
      .map(|entry| entry.key.to_string())
      .collect::<Vec<_>>()
      .join(":")
  }

  /// Produce the two environment mappings.
  ///
  /// Each entry's value is first expanded against `vars`, then transformed
  /// per its flag. Encoding never fails: a value that cannot be converted
  /// passes through unchanged with a warning. The host mapping
  /// additionally carries [`WSLENV`].
  pub fn encode(&self, vars: &VarSet) -> ResolvedEnvironment {
    let mut resolved = ResolvedEnvironment::default();

    for entry in &self.entries {
      let name = &entry.key.name;
      let value = vars.expand(&entry.value);

      // A later declaration of the same bare name resets the earlier
      // one's disposition entirely, whichever side(s) it populated.
      resolved.subsystem.remove(name);
      resolved.host.remove(name);

      match entry.key.flag {
        None | Some(ConversionFlag::NoAutoConvert) => {
          resolved.subsystem.insert(name.clone(), value.clone());
          resolved.host.insert(name.clone(), value);
        }
        Some(ConversionFlag::WindowsOnly) => {
          resolved.host.insert(name.clone(), value);
        }
        Some(ConversionFlag::PathSingle) => {
          let (subsystem, host) = convert_single(&value);
          resolved.subsystem.insert(name.clone(), subsystem);
          resolved.host.insert(name.clone(), host);
        }
        Some(ConversionFlag::PathList) => {
          let (subsystem, host) = convert_list(&value);
          resolved.subsystem.insert(name.clone(), subsystem);
          resolved.host.insert(name.clone(), host);
        }
      }
    }

    if !self.is_empty() {
      resolved.host.insert(WSLENV.to_string(), self.wslenv_value());
    }

    resolved
  }
}

impl<'de> Deserialize<'de> for EnvSpec {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    struct SpecVisitor;

    impl<'de> Visitor<'de> for SpecVisitor {
      type Value = EnvSpec;

      fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of environment variable names to values")
      }

      fn visit_map<A>(self, mut map: A) -> Result<EnvSpec, A::Error>
      where
        A: MapAccess<'de>,
      {
        // Visiting the map directly keeps document order, which a plain
        // BTreeMap-backed deserialize would sort away.
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((raw, value)) = map.next_entry::<String, String>()? {
          entries.push(EnvEntry {
            key: EnvKey::parse(&raw),
            value,
          });
        }
        Ok(EnvSpec { entries })
      }
    }

    deserializer.deserialize_map(SpecVisitor)
  }
}

/// The two final environment mappings, keyed by bare variable name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedEnvironment {
  /// Variables for the subsystem-side process.
  pub subsystem: BTreeMap<String, String>,
  /// Variables for a Windows-side process reading the same logical set.
  pub host: BTreeMap<String, String>,
}

/// Convert one path value for both sides, sniffing its source syntax.
fn convert_single(value: &str) -> (String, String) {
  if value.is_empty() {
    return (String::new(), String::new());
  }
  match PathSyntax::detect(value) {
    PathSyntax::Windows => match path::try_to_unix(value) {
      Some(unix) => (unix, value.to_string()),
      None => {
        warn!(value = %value, "path not convertible, passing through unchanged");
        (value.to_string(), value.to_string())
      }
    },
    PathSyntax::Posix => match path::try_to_windows(value) {
      Some(windows) => (value.to_string(), windows),
      None => {
        warn!(value = %value, "path has no Windows spelling, passing through unchanged");
        (value.to_string(), value.to_string())
      }
    },
  }
}

/// Convert a path list for both sides.
///
/// The list is split on the delimiter of its detected syntax, each segment
/// converted independently (empty segments stay empty), and rejoined with
/// the target side's delimiter.
fn convert_list(value: &str) -> (String, String) {
  let delimiter = PathSyntax::detect(value).list_delimiter();

  let mut subsystem_parts = Vec::new();
  let mut host_parts = Vec::new();
  for segment in value.split(delimiter) {
    let (subsystem, host) = convert_single(segment);
    subsystem_parts.push(subsystem);
    host_parts.push(host);
  }

  (subsystem_parts.join(":"), host_parts.join(";"))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn spec(json: &str) -> EnvSpec {
    serde_json::from_str(json).unwrap()
  }

  fn vars() -> VarSet {
    let mut vars = VarSet::new();
    vars.insert("file", "C:\\proj\\a_spec.rb");
    vars.insert("folder", "C:\\proj");
    vars.add_unix_variants();
    vars
  }

  #[test]
  fn key_parse_recognizes_flags() {
    let key = EnvKey::parse("MY_PATH/p");
    assert_eq!(key.name, "MY_PATH");
    assert_eq!(key.flag, Some(ConversionFlag::PathSingle));

    assert_eq!(EnvKey::parse("L/l").flag, Some(ConversionFlag::PathList));
    assert_eq!(EnvKey::parse("U/u").flag, Some(ConversionFlag::WindowsOnly));
    assert_eq!(EnvKey::parse("W/w").flag, Some(ConversionFlag::NoAutoConvert));
  }

  #[test]
  fn key_parse_unknown_suffix_is_literal() {
    let key = EnvKey::parse("NAME/x");
    assert_eq!(key.name, "NAME/x");
    assert_eq!(key.flag, None);
  }

  #[test]
  fn key_parse_bare_slash_suffix_is_literal() {
    let key = EnvKey::parse("/p");
    assert_eq!(key.name, "/p");
    assert_eq!(key.flag, None);
  }

  #[test]
  fn key_display_round_trips() {
    assert_eq!(EnvKey::parse("MY_PATH/p").to_string(), "MY_PATH/p");
    assert_eq!(EnvKey::parse("PLAIN").to_string(), "PLAIN");
  }

  #[test]
  fn unflagged_value_identical_on_both_sides() {
    let resolved = spec(r#"{"PLAIN": "untranslated"}"#).encode(&VarSet::new());
    assert_eq!(resolved.subsystem["PLAIN"], "untranslated");
    assert_eq!(resolved.host["PLAIN"], "untranslated");
  }

  #[test]
  fn path_flag_converts_windows_value_for_subsystem() {
    let resolved = spec(r#"{"SPEC/p": "$file"}"#).encode(&vars());
    assert_eq!(resolved.subsystem["SPEC"], "/mnt/c/proj/a_spec.rb");
    assert_eq!(resolved.host["SPEC"], "C:\\proj\\a_spec.rb");
  }

  #[test]
  fn path_flag_converts_posix_value_for_host() {
    let resolved = spec(r#"{"SPEC/p": "/mnt/d/tools"}"#).encode(&VarSet::new());
    assert_eq!(resolved.subsystem["SPEC"], "/mnt/d/tools");
    assert_eq!(resolved.host["SPEC"], "D:\\tools");
  }

  #[test]
  fn path_flag_fallback_passes_through() {
    let resolved = spec(r#"{"HOME_DIR/p": "/home/me"}"#).encode(&VarSet::new());
    assert_eq!(resolved.subsystem["HOME_DIR"], "/home/me");
    assert_eq!(resolved.host["HOME_DIR"], "/home/me");
  }

  #[test]
  fn list_flag_windows_to_subsystem() {
    let resolved = spec(r#"{"LIST/l": "C:\\a;D:\\b"}"#).encode(&VarSet::new());
    assert_eq!(resolved.subsystem["LIST"], "/mnt/c/a:/mnt/d/b");
    assert_eq!(resolved.host["LIST"], "C:\\a;D:\\b");
  }

  #[test]
  fn list_flag_posix_to_host() {
    let resolved = spec(r#"{"LIST/l": "/mnt/c/a:/mnt/d/b"}"#).encode(&VarSet::new());
    assert_eq!(resolved.host["LIST"], "C:\\a;D:\\b");
    assert_eq!(resolved.subsystem["LIST"], "/mnt/c/a:/mnt/d/b");
  }

  #[test]
  fn list_flag_empty_segment_stays_empty() {
    let resolved = spec(r#"{"LIST/l": "C:\\a;;D:\\b"}"#).encode(&VarSet::new());
    assert_eq!(resolved.subsystem["LIST"], "/mnt/c/a::/mnt/d/b");
  }

  #[test]
  fn windows_only_flag_never_reaches_subsystem() {
    let resolved = spec(r#"{"UNIX/u": "~/"}"#).encode(&VarSet::new());
    assert!(!resolved.subsystem.contains_key("UNIX"));
    assert_eq!(resolved.host["UNIX"], "~/");
  }

  #[test]
  fn no_auto_convert_flag_keeps_value_verbatim() {
    let resolved = spec(r#"{"WIN/w": "C:\\Users\\me"}"#).encode(&VarSet::new());
    assert_eq!(resolved.subsystem["WIN"], "C:\\Users\\me");
    assert_eq!(resolved.host["WIN"], "C:\\Users\\me");
  }

  #[test]
  fn later_declaration_wins() {
    let resolved =
      spec(r#"{"P/p": "C:\\first", "P/w": "second"}"#).encode(&VarSet::new());
    assert_eq!(resolved.subsystem["P"], "second");
    assert_eq!(resolved.host["P"], "second");
  }

  #[test]
  fn later_windows_only_declaration_clears_subsystem_side() {
    let resolved = spec(r#"{"P": "both", "P/u": "host only"}"#).encode(&VarSet::new());
    assert!(!resolved.subsystem.contains_key("P"));
    assert_eq!(resolved.host["P"], "host only");
  }

  #[test]
  fn values_are_expanded_before_conversion() {
    let resolved = spec(r#"{"WHERE/p": "$folder\\sub"}"#).encode(&vars());
    assert_eq!(resolved.subsystem["WHERE"], "/mnt/c/proj/sub");
  }

  #[test]
  fn wslenv_lists_keys_as_authored() {
    let spec = spec(r#"{"PLAIN": "x", "PATH/p": "C:\\bin", "LIST/l": "C:\\a"}"#);
    assert_eq!(spec.wslenv_value(), "PLAIN:PATH/p:LIST/l");

    let resolved = spec.encode(&VarSet::new());
    assert_eq!(resolved.host["WSLENV"], "PLAIN:PATH/p:LIST/l");
  }

  #[test]
  fn empty_spec_sets_no_wslenv() {
    let resolved = spec("{}").encode(&VarSet::new());
    assert!(resolved.host.is_empty());
    assert!(resolved.subsystem.is_empty());
  }
}
