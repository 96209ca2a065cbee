//! Action configuration read from `INPUT_*` environment variables, with
//! action-level defaults. Invalid values fall back to defaults rather than
//! failing the run.

use std::env;

use crate::error::ActionError;

/// Comment posted on flagged PRs when no custom message is configured.
pub const DEFAULT_COMMENT: &str = "This PR looks low-effort (e.g., README tweak). Please take \
another pass and use our contribution guide for context. Hacktoberfest tips: \
https://hacktoberfest.com/participation/#spam";

const DEFAULT_MIN_SCORE: u32 = 2;
const DEFAULT_NEWBIE_THRESHOLD: u32 = 5;

/// Tunable inputs for one run.
#[derive(Debug, Clone)]
pub struct ActionConfig {
  /// Minimum score at which moderation actions trigger.
  pub min_score: u32,
  /// Label applied to flagged PRs.
  pub label_name: String,
  /// Comment posted on flagged PRs.
  pub comment_message: String,
  /// Close flagged PRs outright.
  pub close_spam: bool,
  /// Public-repo count below which an author counts as new.
  pub newbie_threshold: u32,
  /// Raw custom pattern; compiled by the engine's pattern builder.
  pub custom_pattern: Option<String>,
  pub enable_readme_only: bool,
  pub enable_contributor_regex: bool,
  pub enable_generic_body: bool,
  pub enable_new_contributor: bool,
  pub enable_custom_regex: bool,
}

impl Default for ActionConfig {
  fn default() -> Self {
    Self {
      min_score: DEFAULT_MIN_SCORE,
      label_name: "spam".to_string(),
      comment_message: DEFAULT_COMMENT.to_string(),
      close_spam: false,
      newbie_threshold: DEFAULT_NEWBIE_THRESHOLD,
      custom_pattern: None,
      enable_readme_only: true,
      enable_contributor_regex: true,
      enable_generic_body: true,
      enable_new_contributor: true,
      enable_custom_regex: true,
    }
  }
}

impl ActionConfig {
  /// Read configuration from the Actions runner environment.
  pub fn from_env() -> Self {
    let defaults = Self::default();
    Self {
      min_score: positive_int(input("min-score"), defaults.min_score),
      label_name: input("label-name").unwrap_or(defaults.label_name),
      comment_message: input("comment-message").unwrap_or(defaults.comment_message),
      close_spam: parse_boolean(input("close-spam").as_deref(), false),
      newbie_threshold: positive_int(
        input("new-contributor-threshold"),
        defaults.newbie_threshold,
      ),
      custom_pattern: input("custom-regex"),
      enable_readme_only: parse_boolean(input("enable-readme-only").as_deref(), true),
      enable_contributor_regex: parse_boolean(input("enable-contributor-regex").as_deref(), true),
      enable_generic_body: parse_boolean(input("enable-generic-body").as_deref(), true),
      enable_new_contributor: parse_boolean(input("enable-new-contributor").as_deref(), true),
      enable_custom_regex: parse_boolean(input("enable-custom-regex").as_deref(), true),
    }
  }
}

/// Look up an action input. Empty values read as unset.
pub(crate) fn input(name: &str) -> Option<String> {
  env::var(input_key(name)).ok().filter(|v| !v.is_empty())
}

/// An input the run cannot proceed without.
pub fn required_input(name: &'static str) -> Result<String, ActionError> {
  input(name).ok_or(ActionError::MissingInput(name))
}

/// The runner exposes inputs as `INPUT_<NAME>`, uppercased, spaces to
/// underscores. Hyphens pass through unchanged.
fn input_key(name: &str) -> String {
  format!("INPUT_{}", name.to_uppercase().replace(' ', "_"))
}

/// Loose boolean parsing: `true|1|yes|on` (any case) is true; any other
/// non-empty value is false; unset falls back to the default.
pub fn parse_boolean(value: Option<&str>, default: bool) -> bool {
  match value {
    Some(v) => matches!(
      v.trim().to_ascii_lowercase().as_str(),
      "true" | "1" | "yes" | "on"
    ),
    None => default,
  }
}

/// Parse a positive integer; anything else falls back to the default.
fn positive_int(value: Option<String>, default: u32) -> u32 {
  value
    .and_then(|v| v.trim().parse::<u32>().ok())
    .filter(|&n| n > 0)
    .unwrap_or(default)
}
