//! Structured error types for the action shell.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActionError {
  #[error("missing required input '{0}'")]
  MissingInput(&'static str),

  #[error("no pull request payload found")]
  MissingPayload,

  #[error("env: {0}")]
  Env(String),

  #[error("io: {0}")]
  Io(#[from] std::io::Error),

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),

  #[error("http: {0}")]
  Http(#[from] reqwest::Error),

  #[error("github api: {method} {path}: {status}: {message}")]
  Api {
    method: String,
    path: String,
    status: u16,
    message: String,
  },
}

impl ActionError {
  pub fn api(
    method: impl Into<String>,
    path: impl Into<String>,
    status: u16,
    message: impl Into<String>,
  ) -> Self {
    Self::Api {
      method: method.into(),
      path: path.into(),
      status,
      message: message.into(),
    }
  }

  /// The token lacks a scope, or the installation cannot act on the resource.
  /// Moderation actions recover from these per action instead of failing the run.
  pub fn is_permission_denied(&self) -> bool {
    matches!(self, Self::Api { status: 401 | 403, .. })
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::Api { status: 404, .. })
  }
}
