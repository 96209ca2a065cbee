//! The five spam heuristics and the evaluation loop.

use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};

use crate::types::{
  Evaluation, FileChange, PullRequestSignals, Rule, RuleConfig, RuleOutcome, RuleTrace,
};

/// Added line shaped like a contributor-list entry: `+`, optional list marker,
/// optional bracketed display name, then a username-like token (word
/// characters/hyphens, 2-40 chars, optionally `@`-prefixed).
fn contributor_line() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    RegexBuilder::new(r"^\+\s*(?:[-*]\s*)?(?:\[[^\]\r\n]+\]\s*)?\(?@?[\w-]{2,40}")
      .case_insensitive(true)
      .multi_line(true)
      .build()
      .expect("contributor pattern compiles")
  })
}

/// Low-effort phrases commonly seen in drive-by PR titles and bodies.
const GENERIC_PHRASES: [&str; 9] = [
  r"fixed typo",
  r"minor (change|fix)",
  r"added my name",
  r"add(?:ed)? me\b",
  r"update(?:d)? readme",
  r"docs update",
  r"test commit",
  r"hacktoberfest",
  r"contribution",
];

fn generic_phrases() -> &'static Vec<Regex> {
  static RES: OnceLock<Vec<Regex>> = OnceLock::new();
  RES.get_or_init(|| {
    GENERIC_PHRASES
      .iter()
      .map(|p| {
        RegexBuilder::new(p)
          .case_insensitive(true)
          .build()
          .expect("generic phrase pattern compiles")
      })
      .collect()
  })
}

/// Exactly one file changed and it is the top-level README.
fn readme_only(files: &[FileChange]) -> bool {
  files.len() == 1 && files[0].filename.eq_ignore_ascii_case("readme.md")
}

fn adds_contributor(diff_text: &str) -> bool {
  contributor_line().is_match(diff_text)
}

fn generic_body(body_text: &str) -> bool {
  generic_phrases().iter().any(|re| re.is_match(body_text))
}

/// Evaluate all enabled rules against the signals.
///
/// Total and deterministic: never errors, never suspends, holds no state
/// across calls. `score` always equals `matched_rules.len()`; matched rules
/// appear in definition order with no duplicates. Disabled rules are skipped
/// absolutely, regardless of whether they would have matched.
pub fn evaluate(signals: &PullRequestSignals, config: &RuleConfig) -> Evaluation {
  let mut score = 0u32;
  let mut matched_rules = Vec::new();
  let mut trace = Vec::with_capacity(Rule::ALL.len());

  for rule in Rule::ALL {
    let outcome = match rule {
      Rule::ReadmeOnly if config.enable_readme_only => hit(readme_only(&signals.changed_files)),
      Rule::ContributorRegex if config.enable_contributor_regex => {
        hit(adds_contributor(&signals.diff_text))
      }
      Rule::GenericBody if config.enable_generic_body => hit(generic_body(&signals.body_text)),
      Rule::NewContributor if config.enable_new_contributor => hit(signals.author_is_newbie),
      Rule::CustomRegex if config.enable_custom_regex => match &config.custom_pattern {
        Some(p) => hit(p.is_match(&signals.diff_text) || p.is_match(&signals.body_text)),
        None => RuleOutcome::Unavailable,
      },
      _ => RuleOutcome::Disabled,
    };

    if outcome == RuleOutcome::Matched {
      score += 1;
      matched_rules.push(rule);
    }
    trace.push(RuleTrace { rule, outcome });
  }

  Evaluation {
    score,
    matched_rules,
    trace,
  }
}

fn hit(matched: bool) -> RuleOutcome {
  if matched {
    RuleOutcome::Matched
  } else {
    RuleOutcome::NoMatch
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::pattern::{build_pattern, PatternBuild};

  fn file(name: &str, patch: Option<&str>) -> FileChange {
    FileChange {
      filename: name.to_string(),
      patch: patch.map(str::to_string),
    }
  }

  fn signals_for(files: Vec<FileChange>, diff: &str, body: &str, newbie: bool) -> PullRequestSignals {
    PullRequestSignals {
      changed_files: files,
      diff_text: diff.to_string(),
      body_text: body.to_string(),
      author_is_newbie: newbie,
    }
  }

  #[test]
  fn readme_only_requires_exactly_one_readme() {
    assert!(readme_only(&[file("README.md", None)]));
    assert!(readme_only(&[file("ReadMe.MD", None)]));
    assert!(!readme_only(&[file("docs/README.md", None)]));
    assert!(!readme_only(&[file("src/lib.rs", None)]));
    // A second file, however trivial, clears the rule.
    assert!(!readme_only(&[file("README.md", None), file(".gitignore", None)]));
    assert!(!readme_only(&[]));
  }

  #[test]
  fn contributor_line_shapes() {
    assert!(adds_contributor("+ * [Jane Doe](@janedoe) - Docs"));
    assert!(adds_contributor("+- [Sam](https://github.com/sam)"));
    assert!(adds_contributor("+ @janedoe joined"));
    assert!(adds_contributor("+ Added contributor entry"));
    assert!(adds_contributor("context line\n+ * octocat\nmore context"));

    // Removed or context lines never count.
    assert!(!adds_contributor("- * [Jane Doe](@janedoe)"));
    assert!(!adds_contributor(" + indented, not an added line"));
    assert!(!adds_contributor(""));
  }

  #[test]
  fn generic_body_phrases() {
    assert!(generic_body("Fixed Typo"));
    assert!(generic_body("this is a minor fix"));
    assert!(generic_body("Minor change to parser"));
    assert!(generic_body("I added my name"));
    assert!(generic_body("please add me to the list"));
    assert!(generic_body("Updated README"));
    assert!(generic_body("docs update"));
    assert!(generic_body("test commit"));
    assert!(generic_body("Please merge for Hacktoberfest"));
    assert!(generic_body("my first contribution"));

    assert!(!generic_body("Implemented feature"));
    assert!(!generic_body("Rework the scheduler to avoid starvation"));
  }

  #[test]
  fn score_equals_matched_rule_count() {
    let signals = signals_for(
      vec![file("README.md", Some("+ Added contributor entry"))],
      "+ Added contributor entry",
      "Fixed typo\nPlease merge for Hacktoberfest",
      true,
    );
    let evaluation = evaluate(&signals, &RuleConfig::default());
    assert_eq!(evaluation.score as usize, evaluation.matched_rules.len());
    assert_eq!(evaluation.score, 4);
    assert_eq!(
      evaluation.matched_rules,
      vec![
        Rule::ReadmeOnly,
        Rule::ContributorRegex,
        Rule::GenericBody,
        Rule::NewContributor
      ]
    );
  }

  #[test]
  fn disabled_rules_never_match() {
    let signals = signals_for(
      vec![file("README.md", Some("+ Added contributor entry"))],
      "+ Added contributor entry",
      "Fixed typo for Hacktoberfest",
      true,
    );
    let config = RuleConfig {
      enable_readme_only: false,
      enable_contributor_regex: false,
      enable_generic_body: false,
      enable_new_contributor: false,
      enable_custom_regex: false,
      custom_pattern: None,
    };
    let evaluation = evaluate(&signals, &config);
    assert_eq!(evaluation.score, 0);
    assert!(evaluation.matched_rules.is_empty());
    assert!(evaluation
      .trace
      .iter()
      .all(|t| t.outcome == RuleOutcome::Disabled));
  }

  #[test]
  fn single_disabled_toggle_is_absolute() {
    let signals = signals_for(
      vec![file("README.md", Some("+ Added contributor entry"))],
      "+ Added contributor entry",
      "Fixed typo",
      true,
    );
    let config = RuleConfig {
      enable_contributor_regex: false,
      ..RuleConfig::default()
    };
    let evaluation = evaluate(&signals, &config);
    assert!(!evaluation.matched_rules.contains(&Rule::ContributorRegex));
    assert_eq!(evaluation.score, 3);
  }

  #[test]
  fn custom_rule_without_matcher_is_unavailable() {
    let signals = signals_for(vec![], "", "anything", false);
    let evaluation = evaluate(&signals, &RuleConfig::default());
    let custom = evaluation
      .trace
      .iter()
      .find(|t| t.rule == Rule::CustomRegex)
      .unwrap();
    assert_eq!(custom.outcome, RuleOutcome::Unavailable);
    assert!(!evaluation.matched_rules.contains(&Rule::CustomRegex));
  }

  #[test]
  fn custom_rule_matches_diff_or_body() {
    let pattern = match build_pattern("joined") {
      PatternBuild::Ready(p) => p,
      other => panic!("unexpected {:?}", other),
    };
    let config = RuleConfig {
      custom_pattern: Some(pattern),
      ..RuleConfig::default()
    };

    let via_diff = signals_for(vec![], "+ @janedoe joined", "regular body", false);
    assert!(evaluate(&via_diff, &config)
      .matched_rules
      .contains(&Rule::CustomRegex));

    let via_body = signals_for(vec![], "+ code only", "I joined this repo", false);
    assert!(evaluate(&via_body, &config)
      .matched_rules
      .contains(&Rule::CustomRegex));

    let neither = signals_for(vec![], "+ code only", "regular body", false);
    assert!(!evaluate(&neither, &config)
      .matched_rules
      .contains(&Rule::CustomRegex));
  }

  #[test]
  fn trace_covers_every_rule_once() {
    let signals = signals_for(vec![], "", "", false);
    let evaluation = evaluate(&signals, &RuleConfig::default());
    assert_eq!(evaluation.trace.len(), Rule::ALL.len());
    for (entry, rule) in evaluation.trace.iter().zip(Rule::ALL) {
      assert_eq!(entry.rule, rule);
    }
  }
}
