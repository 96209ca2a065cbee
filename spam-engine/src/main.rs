//! Binary entrypoint: read one JSON object from stdin, write one to stdout.

use std::io::{self, Read, Write};

use spam_engine::{evaluate, Input, Output};

fn main() {
  if let Err(e) = run_binary() {
    let _ = writeln!(io::stderr(), "spam-engine error: {}", e);
    std::process::exit(1);
  }
}

fn run_binary() -> Result<(), Box<dyn std::error::Error>> {
  let mut raw = String::new();
  io::stdin().lock().read_to_string(&mut raw)?;
  let input: Input = serde_json::from_str(&raw)?;

  let (config, pattern_warning) = input.rule_config();
  if let Some(warning) = pattern_warning {
    eprintln!("spam-engine: {}", warning);
  }

  let evaluation = evaluate(&input.signals(), &config);
  let out = Output {
    score: evaluation.score,
    matched_rules: evaluation.matched_rules,
  };
  let json = serde_json::to_vec(&out)?;
  io::stdout().write_all(&json)?;
  Ok(())
}
