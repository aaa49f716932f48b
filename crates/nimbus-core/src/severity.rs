//! Solar-flare severity classes and ranking.
//!
//! Flare intensity is reported as a letter class with a numeric sub-grade
//! (e.g. `M5.2`). Only the letter matters for ranking here. The upstream
//! provider does not expose the class as a structured field, so
//! [`parse_flare_class`] scrapes it out of the free-text event body; if that
//! ever changes, the parser is the single place to replace.

use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A flare class letter. Ordering follows intensity: `C < M < X`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Severity {
  C,
  M,
  X,
}

impl Severity {
  /// Ordinal rank: C=1, M=2, X=3.
  pub fn level(&self) -> u8 {
    match self {
      Self::C => 1,
      Self::M => 2,
      Self::X => 3,
    }
  }

  /// `true` if `self` ranks at or above `minimum`.
  pub fn meets(&self, minimum: Severity) -> bool {
    self.level() >= minimum.level()
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::C => "C",
      Self::M => "M",
      Self::X => "X",
    }
  }
}

impl fmt::Display for Severity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Severity {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "C" | "c" => Ok(Self::C),
      "M" | "m" => Ok(Self::M),
      "X" | "x" => Ok(Self::X),
      other => Err(Error::UnknownSeverity(other.to_string())),
    }
  }
}

// ─── Free-text extraction ────────────────────────────────────────────────────

/// Matches a class letter immediately followed by a sub-grade digit,
/// e.g. `M5` inside "...with a peak class of M5.2 observed...".
static FLARE_CLASS: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"[CMX]\d").expect("valid flare-class regex"));

/// Extract the severity letter from a free-text event body.
///
/// Returns `None` when no class is present or the letter is outside the
/// ranked set; callers treat that as not meeting any minimum (fail closed).
pub fn parse_flare_class(body: &str) -> Option<Severity> {
  let m = FLARE_CLASS.find(body)?;
  match &m.as_str()[..1] {
    "C" => Some(Severity::C),
    "M" => Some(Severity::M),
    "X" => Some(Severity::X),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ranking_is_c_m_x() {
    assert!(Severity::M.meets(Severity::C));
    assert!(Severity::M.meets(Severity::M));
    assert!(!Severity::M.meets(Severity::X));
    assert!(Severity::X.meets(Severity::C));
    assert!(!Severity::C.meets(Severity::M));
  }

  #[test]
  fn parses_class_from_body_text() {
    let body = "Solar flare detected, peak class M5.2 at 2024-01-03T12:00Z.";
    assert_eq!(parse_flare_class(body), Some(Severity::M));
  }

  #[test]
  fn first_match_wins() {
    let body = "X1 flare following yesterday's C3 event";
    assert_eq!(parse_flare_class(body), Some(Severity::X));
  }

  #[test]
  fn no_class_yields_none() {
    assert_eq!(parse_flare_class("geomagnetic storm watch in effect"), None);
    // A bare letter with no sub-grade digit is not a class.
    assert_eq!(parse_flare_class("M class possible"), None);
    assert_eq!(parse_flare_class(""), None);
  }
}
