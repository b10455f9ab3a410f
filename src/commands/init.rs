//! Initialize a relpack configuration file

use crate::core::config::SAMPLE_CONFIG;
use crate::core::error::{ReleaseError, ReleaseResult, ResultExt};
use std::fs;
use std::path::Path;

/// Write a commented sample relpack.toml into the current directory
pub fn run_init(force: bool) -> ReleaseResult<()> {
  let path = Path::new("relpack.toml");

  if path.exists() && !force {
    return Err(ReleaseError::with_help(
      "relpack.toml already exists",
      "Use --force to overwrite the existing configuration.",
    ));
  }

  fs::write(path, SAMPLE_CONFIG).context("Failed to write relpack.toml")?;

  println!("✅ Wrote relpack.toml");
  println!("💡 Edit repository, version, and [[files]], then run `relpack run`");
  Ok(())
}
