//! Build variables and textual `$variable` expansion.
//!
//! The host editor extracts variables such as `$file` and `$folder` when a
//! build is triggered. This module holds that set, derives the `unix_*`
//! counterparts with subsystem path syntax, and performs the textual
//! substitution applied to command arguments, working directories, and
//! environment values.
//!
//! # Substitution
//!
//! Both `$name` and `${name}` forms are recognized. A reference to a name
//! that is not in the set substitutes to the empty string (with a warning);
//! a `$` not followed by an identifier or `{` passes through unchanged, so
//! shell text like `echo $?` survives expansion.

use std::collections::BTreeMap;

use tracing::warn;

use crate::consts::TRANSLATED_VARS;
use crate::path;

/// The set of variables available for substitution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VarSet {
  vars: BTreeMap<String, String>,
}

impl VarSet {
  pub fn new() -> Self {
    Self::default()
  }

  /// Insert or replace a variable.
  pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
    self.vars.insert(name.into(), value.into());
  }

  pub fn get(&self, name: &str) -> Option<&str> {
    self.vars.get(name).map(String::as_str)
  }

  /// Derive `unix_*` counterparts for the path-valued build variables.
  ///
  /// Each variable in the fixed translated set that is present and
  /// non-empty gains a `unix_`-prefixed sibling with its value converted
  /// to subsystem path syntax. The originals are left untouched so both
  /// spellings stay available for mixed Windows/Linux command lines.
  pub fn add_unix_variants(&mut self) {
    for &name in TRANSLATED_VARS {
      let Some(value) = self.vars.get(name) else {
        continue;
      };
      if value.is_empty() {
        continue;
      }
      let unix = path::to_unix(value);
      self.vars.insert(format!("unix_{name}"), unix);
    }
  }

  /// Expand all `$name` / `${name}` references in `input`.
  pub fn expand(&self, input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
      if ch != '$' {
        out.push(ch);
        continue;
      }

      match chars.peek() {
        Some('{') => {
          chars.next();
          let mut name = String::new();
          let mut closed = false;
          for c in chars.by_ref() {
            if c == '}' {
              closed = true;
              break;
            }
            name.push(c);
          }
          if closed {
            out.push_str(self.lookup(&name));
          } else {
            // Unclosed brace: keep the text as written.
            out.push_str("${");
            out.push_str(&name);
          }
        }
        Some(&c) if c.is_ascii_alphabetic() || c == '_' => {
          let mut name = String::new();
          while let Some(&c) = chars.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
              name.push(c);
              chars.next();
            } else {
              break;
            }
          }
          out.push_str(self.lookup(&name));
        }
        _ => out.push('$'),
      }
    }

    out
  }

  fn lookup(&self, name: &str) -> &str {
    match self.vars.get(name) {
      Some(value) => value,
      None => {
        warn!(name = %name, "undefined variable, substituting empty string");
        ""
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn editor_vars() -> VarSet {
    let mut vars = VarSet::new();
    vars.insert("file", "C:\\proj\\a_spec.rb");
    vars.insert("file_path", "C:\\proj");
    vars.insert("file_name", "a_spec.rb");
    vars.insert("folder", "C:\\proj");
    vars.insert("platform", "windows");
    vars
  }

  #[test]
  fn unix_variants_are_added_alongside_originals() {
    let mut vars = editor_vars();
    vars.add_unix_variants();

    assert_eq!(vars.get("unix_file"), Some("/mnt/c/proj/a_spec.rb"));
    assert_eq!(vars.get("unix_folder"), Some("/mnt/c/proj"));
    // Originals stay available for Windows commands running inside WSL.
    assert_eq!(vars.get("file"), Some("C:\\proj\\a_spec.rb"));
  }

  #[test]
  fn non_path_vars_get_no_variant() {
    let mut vars = editor_vars();
    vars.add_unix_variants();

    assert_eq!(vars.get("unix_file_name"), None);
    assert_eq!(vars.get("unix_platform"), None);
  }

  #[test]
  fn absent_and_empty_vars_are_skipped() {
    let mut vars = VarSet::new();
    vars.insert("project", "");
    vars.add_unix_variants();

    assert_eq!(vars.get("unix_project"), None);
    assert_eq!(vars.get("unix_packages"), None);
  }

  #[test]
  fn expands_plain_reference() {
    let vars = editor_vars();
    assert_eq!(vars.expand("$file"), "C:\\proj\\a_spec.rb");
  }

  #[test]
  fn expands_braced_reference() {
    let vars = editor_vars();
    assert_eq!(vars.expand("${file_name}.bak"), "a_spec.rb.bak");
  }

  #[test]
  fn longest_identifier_wins() {
    let vars = editor_vars();
    // "$file_name" must not resolve as "$file" + "_name".
    assert_eq!(vars.expand("$file_name"), "a_spec.rb");
  }

  #[test]
  fn unknown_reference_becomes_empty() {
    let vars = editor_vars();
    assert_eq!(vars.expand("pre-$nonexistent-post"), "pre--post");
  }

  #[test]
  fn shell_text_passes_through() {
    let vars = VarSet::new();
    assert_eq!(vars.expand("echo $? $1 $$"), "echo $? $1 $$");
    assert_eq!(vars.expand("costs $5"), "costs $5");
    assert_eq!(vars.expand("trailing $"), "trailing $");
  }

  #[test]
  fn unclosed_brace_is_literal() {
    let vars = editor_vars();
    assert_eq!(vars.expand("${file"), "${file");
  }

  #[test]
  fn adjacent_references() {
    let mut vars = VarSet::new();
    vars.insert("a", "foo");
    vars.insert("b", "bar");
    assert_eq!(vars.expand("$a$b"), "foobar");
  }
}
