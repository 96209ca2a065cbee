//! Core types for the spam engine (JSON contracts + internal models).

use serde::{Deserialize, Serialize};

use crate::pattern::{self, CompiledPattern};
use crate::signals;

// ---------------------------------------------------------------------------
// File + signal types
// ---------------------------------------------------------------------------

/// One file touched by the pull request. `patch` is absent when the platform
/// omits diff content (binary files, oversized diffs).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FileChange {
  pub filename: String,
  #[serde(default)]
  pub patch: Option<String>,
}

/// Evaluation signals derived once per pull request and shared across rules.
/// Immutable for the duration of scoring.
#[derive(Debug, Clone)]
pub struct PullRequestSignals {
  pub changed_files: Vec<FileChange>,
  /// Newline-joined concatenation of all present patches, in file order.
  pub diff_text: String,
  /// Newline-joined title then body.
  pub body_text: String,
  /// Precomputed by the caller; the engine does no profile lookups.
  pub author_is_newbie: bool,
}

// ---------------------------------------------------------------------------
// Rule configuration
// ---------------------------------------------------------------------------

/// Independent rule toggles plus the optional compiled custom matcher.
/// A disabled rule is never evaluated, regardless of its inputs.
#[derive(Debug, Clone)]
pub struct RuleConfig {
  pub enable_readme_only: bool,
  pub enable_contributor_regex: bool,
  pub enable_generic_body: bool,
  pub enable_new_contributor: bool,
  pub enable_custom_regex: bool,
  pub custom_pattern: Option<CompiledPattern>,
}

impl Default for RuleConfig {
  fn default() -> Self {
    Self {
      enable_readme_only: true,
      enable_contributor_regex: true,
      enable_generic_body: true,
      enable_new_contributor: true,
      enable_custom_regex: true,
      custom_pattern: None,
    }
  }
}

// ---------------------------------------------------------------------------
// Rules + evaluation result
// ---------------------------------------------------------------------------

/// The fixed rule set, in evaluation (and output) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
  ReadmeOnly,
  ContributorRegex,
  GenericBody,
  NewContributor,
  CustomRegex,
}

impl Rule {
  pub const ALL: [Rule; 5] = [
    Rule::ReadmeOnly,
    Rule::ContributorRegex,
    Rule::GenericBody,
    Rule::NewContributor,
    Rule::CustomRegex,
  ];

  /// The wire identifier, as published in outputs and logs.
  pub fn name(self) -> &'static str {
    match self {
      Self::ReadmeOnly => "readme-only",
      Self::ContributorRegex => "contributor-regex",
      Self::GenericBody => "generic-body",
      Self::NewContributor => "new-contributor",
      Self::CustomRegex => "custom-regex",
    }
  }
}

/// Outcome of one rule during an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleOutcome {
  Matched,
  NoMatch,
  /// Toggle was off; the rule was not evaluated at all.
  Disabled,
  /// Rule was enabled but its prerequisite is absent (no usable custom matcher).
  Unavailable,
}

/// One trace entry per rule, in definition order.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RuleTrace {
  pub rule: Rule,
  pub outcome: RuleOutcome,
}

/// Result of one engine run. `score` always equals `matched_rules.len()`.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
  pub score: u32,
  /// Matched rules in definition order, no duplicates.
  pub matched_rules: Vec<Rule>,
  /// Per-rule outcomes for the caller's logging; not part of the wire output.
  #[serde(skip)]
  pub trace: Vec<RuleTrace>,
}

impl Evaluation {
  pub fn matched_rule_names(&self) -> Vec<&'static str> {
    self.matched_rules.iter().map(|r| r.name()).collect()
  }
}

// ---------------------------------------------------------------------------
// Binary stdin/stdout contract
// ---------------------------------------------------------------------------

/// Stdin input for the engine binary: raw PR data plus rule configuration.
/// Unknown fields are silently ignored.
#[derive(Debug, Deserialize)]
pub struct Input {
  pub files: Vec<FileChange>,
  #[serde(default)]
  pub title: Option<String>,
  #[serde(default)]
  pub body: Option<String>,
  #[serde(default)]
  pub author_is_newbie: bool,
  /// Raw custom pattern; compiled through the pattern builder.
  #[serde(default)]
  pub custom_pattern: Option<String>,
  #[serde(default = "enabled")]
  pub enable_readme_only: bool,
  #[serde(default = "enabled")]
  pub enable_contributor_regex: bool,
  #[serde(default = "enabled")]
  pub enable_generic_body: bool,
  #[serde(default = "enabled")]
  pub enable_new_contributor: bool,
  #[serde(default = "enabled")]
  pub enable_custom_regex: bool,
}

fn enabled() -> bool {
  true
}

impl Input {
  /// Shape the evaluation signals from the raw PR data.
  pub fn signals(&self) -> PullRequestSignals {
    PullRequestSignals {
      diff_text: signals::concat_diff(&self.files),
      body_text: signals::concat_body(self.title.as_deref(), self.body.as_deref()),
      changed_files: self.files.clone(),
      author_is_newbie: self.author_is_newbie,
    }
  }

  /// Build the rule config. A rejected custom pattern degrades to no matcher;
  /// the rejection reason comes back as a warning for the caller to surface.
  pub fn rule_config(&self) -> (RuleConfig, Option<String>) {
    let (custom_pattern, warning) =
      pattern::build_pattern(self.custom_pattern.as_deref().unwrap_or_default()).into_matcher();
    (
      RuleConfig {
        enable_readme_only: self.enable_readme_only,
        enable_contributor_regex: self.enable_contributor_regex,
        enable_generic_body: self.enable_generic_body,
        enable_new_contributor: self.enable_new_contributor,
        enable_custom_regex: self.enable_custom_regex,
        custom_pattern,
      },
      warning,
    )
  }
}

/// Stdout output for the engine binary.
#[derive(Debug, Serialize)]
pub struct Output {
  pub score: u32,
  pub matched_rules: Vec<Rule>,
}
