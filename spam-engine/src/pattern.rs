//! Build a safe compiled matcher from a user-supplied pattern string.
//!
//! Malformed or oversized patterns never fail a run: the builder returns an
//! explicit rejection that the caller surfaces as a warning.

use regex::{Regex, RegexBuilder};

/// Longest accepted pattern, in characters. Guards against pathological
/// patterns supplied through action configuration.
pub const MAX_PATTERN_LEN: usize = 200;

/// A compiled user pattern: a case-aware text matcher plus its source form.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
  regex: Regex,
  source: String,
}

impl CompiledPattern {
  pub fn is_match(&self, text: &str) -> bool {
    self.regex.is_match(text)
  }

  /// The trimmed input the matcher was built from.
  pub fn source(&self) -> &str {
    &self.source
  }
}

/// Outcome of building a pattern. `Rejected` is a warning for the caller,
/// never an error.
#[derive(Debug, Clone)]
pub enum PatternBuild {
  /// No pattern configured (empty or whitespace-only input).
  Unset,
  Ready(CompiledPattern),
  Rejected { pattern: String, reason: String },
}

impl PatternBuild {
  /// Degrade to an optional matcher. A rejection yields no matcher plus the
  /// warning text describing why.
  pub fn into_matcher(self) -> (Option<CompiledPattern>, Option<String>) {
    match self {
      Self::Ready(p) => (Some(p), None),
      Self::Unset => (None, None),
      Self::Rejected { pattern, reason } => (
        None,
        Some(format!("ignoring custom pattern '{}': {}", pattern, reason)),
      ),
    }
  }
}

/// Build a matcher from raw user input.
///
/// A `/<body>/<flags>` form selects explicit flags; anything else is matched
/// case-insensitively as-is.
pub fn build_pattern(raw: &str) -> PatternBuild {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return PatternBuild::Unset;
  }
  if trimmed.chars().count() > MAX_PATTERN_LEN {
    return PatternBuild::Rejected {
      pattern: trimmed.to_string(),
      reason: format!("pattern exceeds {} characters", MAX_PATTERN_LEN),
    };
  }

  let (body, flags) = match split_delimited(trimmed) {
    Some((body, flags)) => (body, Some(flags)),
    None => (trimmed, None),
  };

  let mut builder = RegexBuilder::new(body);
  match flags {
    // No delimiter form: case-insensitive by default.
    None => {
      builder.case_insensitive(true);
    }
    Some(flags) => {
      for flag in flags.chars() {
        match flag {
          'i' => {
            builder.case_insensitive(true);
          }
          'm' => {
            builder.multi_line(true);
          }
          's' => {
            builder.dot_matches_new_line(true);
          }
          'x' => {
            builder.ignore_whitespace(true);
          }
          // JS-only flags with no meaning here; accepted so existing
          // action configs keep working.
          'g' | 'u' | 'y' => {}
          other => {
            return PatternBuild::Rejected {
              pattern: trimmed.to_string(),
              reason: format!("unsupported flag '{}'", other),
            };
          }
        }
      }
    }
  }

  match builder.build() {
    Ok(regex) => PatternBuild::Ready(CompiledPattern {
      regex,
      source: trimmed.to_string(),
    }),
    Err(e) => PatternBuild::Rejected {
      pattern: trimmed.to_string(),
      reason: e.to_string(),
    },
  }
}

/// Split a `/<body>/<flags>` form. Flags must be word characters only;
/// anything else means the slashes are part of the pattern itself.
fn split_delimited(s: &str) -> Option<(&str, &str)> {
  let rest = s.strip_prefix('/')?;
  let idx = rest.rfind('/')?;
  let (body, flags) = (&rest[..idx], &rest[idx + 1..]);
  if !flags.is_empty() && !flags.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
    return None;
  }
  Some((body, flags))
}
