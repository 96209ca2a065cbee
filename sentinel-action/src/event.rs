//! GitHub event context: what triggered the run and the pull request payload.

use std::env;
use std::fs;

use serde::Deserialize;

use crate::error::ActionError;

/// Author of the pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct Author {
  pub login: String,
}

/// The slice of the pull_request payload the sentinel needs.
/// Unknown fields are silently ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
  pub number: u64,
  #[serde(default)]
  pub title: Option<String>,
  #[serde(default)]
  pub body: Option<String>,
  pub user: Author,
}

#[derive(Debug, Clone, Deserialize)]
struct EventPayload {
  #[serde(default)]
  pull_request: Option<PullRequest>,
}

/// Repository coordinates plus the parsed payload.
#[derive(Debug, Clone)]
pub struct EventContext {
  pub owner: String,
  pub repo: String,
  pub pull_request: Option<PullRequest>,
}

impl EventContext {
  /// Read the event context from the runner environment.
  pub fn from_env() -> Result<Self, ActionError> {
    let repository = env::var("GITHUB_REPOSITORY")
      .map_err(|_| ActionError::Env("GITHUB_REPOSITORY is not set".into()))?;
    let (owner, repo) = repository.split_once('/').ok_or_else(|| {
      ActionError::Env(format!("GITHUB_REPOSITORY '{}' is not owner/repo", repository))
    })?;

    let pull_request = match env::var("GITHUB_EVENT_PATH") {
      Ok(path) => parse_payload(&fs::read_to_string(path)?)?,
      Err(_) => None,
    };

    Ok(Self {
      owner: owner.to_string(),
      repo: repo.to_string(),
      pull_request,
    })
  }
}

/// Name of the event that triggered this run.
pub fn trigger_event() -> String {
  env::var("GITHUB_EVENT_NAME").unwrap_or_default()
}

/// Only pull request events are scored.
pub fn is_supported_event(name: &str) -> bool {
  matches!(name, "pull_request" | "pull_request_target")
}

fn parse_payload(raw: &str) -> Result<Option<PullRequest>, ActionError> {
  let payload: EventPayload = serde_json::from_str(raw)?;
  Ok(payload.pull_request)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_pull_request_events_are_supported() {
    assert!(is_supported_event("pull_request"));
    assert!(is_supported_event("pull_request_target"));
    assert!(!is_supported_event("push"));
    assert!(!is_supported_event("issue_comment"));
    assert!(!is_supported_event(""));
  }

  #[test]
  fn payload_parsing_extracts_the_pull_request() {
    let raw = r#"{
      "action": "opened",
      "number": 17,
      "pull_request": {
        "number": 17,
        "title": "Fixed typo",
        "body": "Please merge for Hacktoberfest",
        "user": {"login": "octonewb"},
        "draft": false
      },
      "repository": {"full_name": "octo/repo"}
    }"#;
    let pr = parse_payload(raw).unwrap().unwrap();
    assert_eq!(pr.number, 17);
    assert_eq!(pr.title.as_deref(), Some("Fixed typo"));
    assert_eq!(pr.user.login, "octonewb");
  }

  #[test]
  fn payload_without_pull_request_is_none() {
    let raw = r#"{"action": "opened", "issue": {"number": 3}}"#;
    assert!(parse_payload(raw).unwrap().is_none());
  }

  #[test]
  fn absent_optional_fields_read_as_none() {
    let raw = r#"{"pull_request": {"number": 2, "user": {"login": "x"}, "body": null}}"#;
    let pr = parse_payload(raw).unwrap().unwrap();
    assert!(pr.title.is_none());
    assert!(pr.body.is_none());
  }
}
