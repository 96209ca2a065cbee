//! Minimal GitHub REST client for the surface the sentinel needs: changed
//! files, author profile, and the moderation endpoints.

use reqwest::{Client, Method, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::error::ActionError;

const PER_PAGE: usize = 100;

/// One changed file from `GET /pulls/{n}/files`. `patch` is absent for
/// binary or oversized diffs.
#[derive(Debug, Clone, Deserialize)]
pub struct PullFile {
  pub filename: String,
  #[serde(default)]
  pub patch: Option<String>,
}

/// The slice of a user profile the newbie signal needs.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
  #[serde(default)]
  pub public_repos: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
  #[serde(default)]
  message: Option<String>,
}

pub struct GithubClient {
  http: Client,
  base_url: String,
  token: String,
  owner: String,
  repo: String,
}

impl GithubClient {
  /// Honors `GITHUB_API_URL` so GHES runners keep working.
  pub fn new(token: impl Into<String>, owner: impl Into<String>, repo: impl Into<String>) -> Self {
    Self {
      http: Client::new(),
      base_url: std::env::var("GITHUB_API_URL")
        .unwrap_or_else(|_| "https://api.github.com".to_string()),
      token: token.into(),
      owner: owner.into(),
      repo: repo.into(),
    }
  }

  async fn send(
    &self,
    method: Method,
    path: &str,
    body: Option<serde_json::Value>,
  ) -> Result<Response, ActionError> {
    let url = format!("{}{}", self.base_url, path);
    let mut request = self
      .http
      .request(method.clone(), &url)
      .header("Accept", "application/vnd.github+json")
      .header("User-Agent", "hacktober-sentinel")
      .bearer_auth(&self.token);
    if let Some(body) = body {
      request = request.json(&body);
    }

    let response = request.send().await?;
    if response.status().is_success() {
      return Ok(response);
    }

    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiMessage>(&text)
      .ok()
      .and_then(|m| m.message)
      .unwrap_or(text);
    Err(ActionError::api(method.to_string(), path, status, message))
  }

  /// All changed files of a pull request, across every page.
  pub async fn list_pull_files(&self, number: u64) -> Result<Vec<PullFile>, ActionError> {
    let mut files = Vec::new();
    let mut page = 1u32;
    loop {
      let path = format!(
        "/repos/{}/{}/pulls/{}/files?per_page={}&page={}",
        self.owner, self.repo, number, PER_PAGE, page
      );
      let batch: Vec<PullFile> = self.send(Method::GET, &path, None).await?.json().await?;
      let last_page = batch.len() < PER_PAGE;
      files.extend(batch);
      if last_page {
        return Ok(files);
      }
      page += 1;
    }
  }

  pub async fn get_user(&self, login: &str) -> Result<UserProfile, ActionError> {
    let path = format!("/users/{}", login);
    Ok(self.send(Method::GET, &path, None).await?.json().await?)
  }

  /// Make sure the label exists, creating it on 404.
  pub async fn ensure_label(&self, name: &str) -> Result<(), ActionError> {
    let path = format!("/repos/{}/{}/labels/{}", self.owner, self.repo, name);
    match self.send(Method::GET, &path, None).await {
      Ok(_) => Ok(()),
      Err(e) if e.is_not_found() => {
        info!(label = name, "label not found, creating it");
        let path = format!("/repos/{}/{}/labels", self.owner, self.repo);
        self
          .send(
            Method::POST,
            &path,
            Some(json!({
              "name": name,
              "color": "B60205",
              "description": "Flagged by HacktoberSentinel as potential spam.",
            })),
          )
          .await?;
        Ok(())
      }
      Err(e) => Err(e),
    }
  }

  pub async fn add_label(&self, number: u64, name: &str) -> Result<(), ActionError> {
    let path = format!("/repos/{}/{}/issues/{}/labels", self.owner, self.repo, number);
    self
      .send(Method::POST, &path, Some(json!({ "labels": [name] })))
      .await?;
    Ok(())
  }

  pub async fn create_comment(&self, number: u64, body: &str) -> Result<(), ActionError> {
    let path = format!(
      "/repos/{}/{}/issues/{}/comments",
      self.owner, self.repo, number
    );
    self
      .send(Method::POST, &path, Some(json!({ "body": body })))
      .await?;
    Ok(())
  }

  pub async fn close_pull(&self, number: u64) -> Result<(), ActionError> {
    let path = format!("/repos/{}/{}/pulls/{}", self.owner, self.repo, number);
    self
      .send(Method::PATCH, &path, Some(json!({ "state": "closed" })))
      .await?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn pull_file_tolerates_missing_patch() {
    let json = r#"[
      {"filename": "README.md", "patch": "+ hello", "status": "modified"},
      {"filename": "logo.png", "status": "added"}
    ]"#;
    let files: Vec<PullFile> = serde_json::from_str(json).unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].patch.as_deref(), Some("+ hello"));
    assert!(files[1].patch.is_none());
  }

  #[test]
  fn user_profile_tolerates_missing_repo_count() {
    let with: UserProfile = serde_json::from_str(r#"{"login": "a", "public_repos": 12}"#).unwrap();
    assert_eq!(with.public_repos, Some(12));
    let without: UserProfile = serde_json::from_str(r#"{"login": "a"}"#).unwrap();
    assert!(without.public_repos.is_none());
  }
}
