//! Binary entrypoint for the HacktoberSentinel action.

use sentinel_action::{execute, Outputs, RunStatus};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    )
    .with_target(false)
    .init();

  match execute().await {
    Ok(RunStatus::Skipped) => {}
    Ok(status) => info!(?status, "run complete"),
    Err(e) => {
      error!("action failed: {}", e);
      // Failed runs must still publish the not-flagged outputs.
      if let Err(out_err) = Outputs::reset().publish() {
        error!("could not reset outputs: {}", out_err);
      }
      std::process::exit(1);
    }
  }
}
