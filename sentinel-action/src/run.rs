//! Orchestration: gate the event, extract signals, score, moderate, publish.
//!
//! Signal extraction completes before the engine runs; moderation actions run
//! only after it returns, each with its own permission-failure recovery. All
//! rule logging happens here, after the engine call, keeping the engine pure.

use spam_engine::{
  build_pattern, concat_body, concat_diff, evaluate, is_newbie, Evaluation, FileChange,
  PullRequestSignals, RuleConfig, RuleOutcome,
};
use tracing::{debug, info, warn};

use crate::config::{self, ActionConfig};
use crate::error::ActionError;
use crate::event::{self, EventContext, PullRequest};
use crate::github::GithubClient;
use crate::outputs::Outputs;

/// What a completed run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
  /// Unsupported trigger event; nothing evaluated.
  Skipped,
  /// Evaluated below the threshold.
  NotFlagged,
  /// Evaluated at or above the threshold; moderation actions attempted.
  Flagged,
}

/// Full action flow from the runner environment. Any error is fatal; the
/// caller resets outputs before exiting.
pub async fn execute() -> Result<RunStatus, ActionError> {
  let event_name = event::trigger_event();
  if !event::is_supported_event(&event_name) {
    info!(event = %event_name, "event is unsupported, exiting");
    return Ok(RunStatus::Skipped);
  }

  let config = ActionConfig::from_env();
  let ctx = EventContext::from_env()?;
  let token = config::required_input("github-token")?;
  let client = GithubClient::new(token, ctx.owner.as_str(), ctx.repo.as_str());
  run(&config, &ctx, &client).await
}

/// Score one pull request and act on the result.
pub async fn run(
  config: &ActionConfig,
  ctx: &EventContext,
  client: &GithubClient,
) -> Result<RunStatus, ActionError> {
  let pr = ctx.pull_request.as_ref().ok_or(ActionError::MissingPayload)?;
  info!(
    number = pr.number,
    owner = %ctx.owner,
    repo = %ctx.repo,
    "evaluating pull request"
  );

  let signals = extract_signals(config, pr, client).await?;
  let (rule_config, pattern_warning) = build_rule_config(config);
  if let Some(warning) = pattern_warning {
    warn!("{}", warning);
  }

  let evaluation = evaluate(&signals, &rule_config);
  log_trace(&evaluation);
  info!(
    score = evaluation.score,
    threshold = config.min_score,
    "spam score"
  );

  let flagged = evaluation.score >= config.min_score;
  if flagged {
    moderate(config, pr, client).await?;
  } else {
    info!("pull request not flagged");
  }

  Outputs {
    flagged,
    score: evaluation.score,
    matched_rules: evaluation.matched_rule_names().join(","),
  }
  .publish()?;

  Ok(if flagged {
    RunStatus::Flagged
  } else {
    RunStatus::NotFlagged
  })
}

/// Assemble the four evaluation signals from the platform.
async fn extract_signals(
  config: &ActionConfig,
  pr: &PullRequest,
  client: &GithubClient,
) -> Result<PullRequestSignals, ActionError> {
  let changed_files: Vec<FileChange> = client
    .list_pull_files(pr.number)
    .await?
    .into_iter()
    .map(|f| FileChange {
      filename: f.filename,
      patch: f.patch,
    })
    .collect();

  let diff_text = concat_diff(&changed_files);
  let body_text = concat_body(pr.title.as_deref(), pr.body.as_deref());

  // Profile lookup only when the rule can use it; a failed lookup never
  // counts against the PR (fail open).
  let author_is_newbie = if config.enable_new_contributor {
    match client.get_user(&pr.user.login).await {
      Ok(profile) => is_newbie(profile.public_repos, config.newbie_threshold),
      Err(e) => {
        warn!(author = %pr.user.login, error = %e, "author lookup failed, treating as established");
        false
      }
    }
  } else {
    false
  };

  Ok(PullRequestSignals {
    changed_files,
    diff_text,
    body_text,
    author_is_newbie,
  })
}

fn build_rule_config(config: &ActionConfig) -> (RuleConfig, Option<String>) {
  let (custom_pattern, warning) =
    build_pattern(config.custom_pattern.as_deref().unwrap_or_default()).into_matcher();
  (
    RuleConfig {
      enable_readme_only: config.enable_readme_only,
      enable_contributor_regex: config.enable_contributor_regex,
      enable_generic_body: config.enable_generic_body,
      enable_new_contributor: config.enable_new_contributor,
      enable_custom_regex: config.enable_custom_regex,
      custom_pattern,
    },
    warning,
  )
}

fn log_trace(evaluation: &Evaluation) {
  for entry in &evaluation.trace {
    match entry.outcome {
      RuleOutcome::Matched => info!(rule = entry.rule.name(), "rule matched"),
      RuleOutcome::NoMatch => info!(rule = entry.rule.name(), "rule did not match"),
      RuleOutcome::Unavailable => {
        debug!(rule = entry.rule.name(), "rule enabled but no usable matcher")
      }
      RuleOutcome::Disabled => {}
    }
  }
}

/// Apply moderation actions. Each action recovers from permission errors on
/// its own, so one missing scope does not block the others; any other error
/// is fatal.
async fn moderate(
  config: &ActionConfig,
  pr: &PullRequest,
  client: &GithubClient,
) -> Result<(), ActionError> {
  let labeled = async {
    client.ensure_label(&config.label_name).await?;
    client.add_label(pr.number, &config.label_name).await
  }
  .await;
  allow_missing_permission("labeling", "issues: write", labeled)?;

  let commented = client.create_comment(pr.number, &config.comment_message).await;
  allow_missing_permission("commenting", "issues: write", commented)?;

  if config.close_spam {
    match client.close_pull(pr.number).await {
      Ok(()) => info!("pull request closed at spam threshold"),
      Err(e) if e.is_permission_denied() => {
        warn!(error = %e, "cannot close the pull request, grant the 'pull-requests: write' scope");
      }
      Err(e) => return Err(e),
    }
  }

  Ok(())
}

/// Swallow permission errors with a remediation hint; propagate everything else.
fn allow_missing_permission(
  action: &str,
  scope: &str,
  result: Result<(), ActionError>,
) -> Result<(), ActionError> {
  match result {
    Err(e) if e.is_permission_denied() => {
      warn!(action, error = %e, "missing permission, grant the '{}' scope to enable this action", scope);
      Ok(())
    }
    other => other,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn permission_errors_are_swallowed_with_a_warning() {
    let denied = Err(ActionError::api("POST", "/x", 403, "forbidden"));
    assert!(allow_missing_permission("labeling", "issues: write", denied).is_ok());

    let broken = Err(ActionError::api("POST", "/x", 500, "boom"));
    assert!(allow_missing_permission("labeling", "issues: write", broken).is_err());

    assert!(allow_missing_permission("labeling", "issues: write", Ok(())).is_ok());
  }

  #[test]
  fn rejected_custom_pattern_degrades_to_none() {
    let config = ActionConfig {
      custom_pattern: Some("(unclosed".to_string()),
      ..ActionConfig::default()
    };
    let (rule_config, warning) = build_rule_config(&config);
    assert!(rule_config.custom_pattern.is_none());
    assert!(warning.unwrap().contains("(unclosed"));
  }

  #[test]
  fn oversized_custom_pattern_degrades_to_none() {
    let config = ActionConfig {
      custom_pattern: Some("a".repeat(201)),
      ..ActionConfig::default()
    };
    let (rule_config, warning) = build_rule_config(&config);
    assert!(rule_config.custom_pattern.is_none());
    assert!(warning.unwrap().contains("200"));
  }
}
