//! Step outputs written to the runner's `GITHUB_OUTPUT` file.

use std::env;
use std::fs::OpenOptions;
use std::io::Write;

use tracing::info;

use crate::error::ActionError;

/// The three outputs every completed run publishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outputs {
  pub flagged: bool,
  pub score: u32,
  /// Comma-joined rule identifiers, empty when nothing matched.
  pub matched_rules: String,
}

impl Outputs {
  /// The forced outputs for a failed run: never flagged, score zero.
  pub fn reset() -> Self {
    Self {
      flagged: false,
      score: 0,
      matched_rules: String::new(),
    }
  }

  /// `name=value` lines in the GITHUB_OUTPUT format.
  pub fn render(&self) -> String {
    format!(
      "flagged={}\nscore={}\nmatched-rules={}\n",
      self.flagged, self.score, self.matched_rules
    )
  }

  /// Append to the runner's output file. Logs the values instead when the
  /// file is not configured (local runs).
  pub fn publish(&self) -> Result<(), ActionError> {
    match env::var("GITHUB_OUTPUT") {
      Ok(path) => {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(self.render().as_bytes())?;
        Ok(())
      }
      Err(_) => {
        info!(
          flagged = self.flagged,
          score = self.score,
          matched_rules = %self.matched_rules,
          "GITHUB_OUTPUT not set, skipping step outputs"
        );
        Ok(())
      }
    }
  }
}
