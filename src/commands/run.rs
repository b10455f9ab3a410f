//! Execute the release pipeline from a configuration file

use crate::core::config::ReleaseConfig;
use crate::core::error::{ReleaseResult, ResultExt};
use crate::core::identity::StdioPrompt;
use crate::core::pipeline::{Pipeline, ReleaseOutcome};
use std::fs;
use std::path::{Path, PathBuf};

/// Load the config, apply CLI overrides, and run the pipeline
pub fn run_release(
  config_path: Option<PathBuf>,
  version: Option<String>,
  no_push: bool,
  work_dir: Option<PathBuf>,
  verbose: bool,
) -> ReleaseResult<()> {
  let config_path = config_path.unwrap_or_else(|| PathBuf::from("relpack.toml"));
  let mut config = ReleaseConfig::load(&config_path)?;

  if let Some(version) = version {
    config.version = Some(version);
  }
  if config.version.is_none() {
    // Same fallback the config documents: the project's own manifest
    config.version = package_json_version(Path::new("package.json"))?;
  }
  if no_push {
    config.push = false;
  }
  if let Some(work_dir) = work_dir {
    config.work_dir = work_dir;
  }

  let mut prompt = StdioPrompt;
  let outcome = Pipeline::new(&config, &mut prompt, verbose).run()?;

  println!();
  match outcome {
    ReleaseOutcome::Released { commit, tag, pushed } => {
      println!("🎉 Release complete");
      println!("   Commit: {}", commit);
      println!("   Tag:    {}", tag);
      if !pushed {
        println!("   Push:   skipped");
      }
    }
    ReleaseOutcome::NothingToCommit => {
      println!("ℹ️  No release created: working tree unchanged");
    }
  }

  Ok(())
}

/// Read the `version` field from a package.json, if the file exists
fn package_json_version(path: &Path) -> ReleaseResult<Option<String>> {
  if !path.exists() {
    return Ok(None);
  }
  let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
  let manifest: serde_json::Value =
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
  Ok(manifest.get("version").and_then(|v| v.as_str()).map(String::from))
}
