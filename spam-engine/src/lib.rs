//! HacktoberSentinel Spam Engine — rule-based PR scoring; no AI, no DB, no network.
//! Used by the action binary as a library; also runs standalone on stdin/stdout.

mod pattern;
mod rules;
mod signals;
mod types;

pub use pattern::{build_pattern, CompiledPattern, PatternBuild, MAX_PATTERN_LEN};
pub use rules::evaluate;
pub use signals::{concat_body, concat_diff, is_newbie};
pub use types::{
  Evaluation, FileChange, Input, Output, PullRequestSignals, Rule, RuleConfig, RuleOutcome,
  RuleTrace,
};
