//! Tests for `relpack init` and config discovery

use crate::helpers::*;
use tempfile::TempDir;

#[test]
fn test_init_writes_parseable_sample_config() {
  let dir = TempDir::new().unwrap();

  let output = run_relpack(dir.path(), &["init"]).unwrap();
  assert_success(&output);

  let config = std::fs::read_to_string(dir.path().join("relpack.toml")).unwrap();
  let parsed: toml::Value = toml::from_str(&config).unwrap();
  assert!(parsed.get("repository").is_some());
  assert!(parsed.get("work_dir").is_some());
}

#[test]
fn test_init_refuses_to_overwrite_without_force() {
  let dir = TempDir::new().unwrap();
  std::fs::write(dir.path().join("relpack.toml"), "# hand edited\n").unwrap();

  let output = run_relpack(dir.path(), &["init"]).unwrap();
  assert!(!output.status.success());
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("already exists"));

  // Existing file untouched
  let config = std::fs::read_to_string(dir.path().join("relpack.toml")).unwrap();
  assert_eq!(config, "# hand edited\n");
}

#[test]
fn test_init_force_overwrites() {
  let dir = TempDir::new().unwrap();
  std::fs::write(dir.path().join("relpack.toml"), "# hand edited\n").unwrap();

  let output = run_relpack(dir.path(), &["init", "--force"]).unwrap();
  assert_success(&output);

  let config = std::fs::read_to_string(dir.path().join("relpack.toml")).unwrap();
  assert!(config.contains("repository"));
}

#[test]
fn test_run_without_config_fails_with_hint() {
  let dir = TempDir::new().unwrap();

  let output = run_relpack(dir.path(), &["run"]).unwrap();
  assert!(!output.status.success());
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("No relpack configuration"));
  assert!(stderr.contains("relpack init"));
}
