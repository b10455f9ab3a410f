//! End-to-end release pipeline scenarios

use crate::helpers::*;

fn config_body(remote: &TestRemote, extra: &str) -> String {
  format!(
    r#"
work_dir = "{}"
repository = "{}"
branch = "main"
version = "1.2.0"
committer_name = "Release Bot"
committer_email = "release@example.com"
{}
"#,
    remote.work_dir.display(),
    remote.remote.display(),
    extra
  )
}

#[test]
fn test_release_creates_commit_and_tag_without_push() {
  let remote = TestRemote::new(&[
    ("HISTORY.md", "# History\n"),
    ("package.json", "{\"name\": \"dist\", \"version\": \"0.9.0\"}"),
  ])
  .unwrap();
  let artifact = remote.write_artifact("README.md", "release notes\n").unwrap();

  remote
    .write_config(&config_body(
      &remote,
      &format!(
        r#"
push = false

[[files]]
src = "{}"
dest = "README.md"
"#,
        artifact.display()
      ),
    ))
    .unwrap();

  let output = run_relpack(&remote.root, &["run"]).unwrap();
  assert_success(&output);

  // Commit message is the rendered template, with exactly one parent
  assert_eq!(remote.head_message(&remote.work_dir).unwrap(), "v1.2.0");

  // Annotated tag at the new commit
  assert_eq!(remote.tags(&remote.work_dir).unwrap(), vec!["v1.2.0"]);
  assert_eq!(remote.tag_object_type(&remote.work_dir, "v1.2.0").unwrap(), "tag");

  // Copied artifact and bumped manifest are in the commit
  assert_eq!(
    remote.file_at_head(&remote.work_dir, "README.md").unwrap(),
    "release notes\n"
  );
  assert!(
    remote
      .file_at_head(&remote.work_dir, "package.json")
      .unwrap()
      .contains("\"version\": \"1.2.0\"")
  );

  // Push disabled: remote untouched
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("Push disabled"));
  assert!(remote.tags(&remote.remote).unwrap().is_empty());
  assert_ne!(
    remote.head_sha(&remote.remote).unwrap(),
    remote.head_sha(&remote.work_dir).unwrap()
  );
}

#[test]
fn test_release_pushes_branch_and_tag_together() {
  let remote = TestRemote::new(&[("HISTORY.md", "# History\n")]).unwrap();
  let artifact = remote.write_artifact("README.md", "pushed notes\n").unwrap();

  remote
    .write_config(&config_body(
      &remote,
      &format!(
        r#"
push = true

[[files]]
src = "{}"
dest = "README.md"
"#,
        artifact.display()
      ),
    ))
    .unwrap();

  let output = run_relpack(&remote.root, &["run"]).unwrap();
  assert_success(&output);

  // Both refs arrived: branch head and annotated tag
  assert_eq!(
    remote.head_sha(&remote.remote).unwrap(),
    remote.head_sha(&remote.work_dir).unwrap()
  );
  assert_eq!(remote.tags(&remote.remote).unwrap(), vec!["v1.2.0"]);
  assert_eq!(remote.tag_object_type(&remote.remote, "v1.2.0").unwrap(), "tag");
}

#[test]
fn test_unchanged_tree_terminates_with_nothing_to_commit() {
  // No manifests in the remote and no copy instructions: the clone stays
  // byte-identical
  let remote = TestRemote::new(&[("HISTORY.md", "# History\n")]).unwrap();
  remote.write_config(&config_body(&remote, "push = true\n")).unwrap();

  let output = run_relpack(&remote.root, &["run"]).unwrap();
  assert_success(&output);

  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("Nothing to commit"));

  // Zero commit/tag/push operations happened
  assert_eq!(
    remote.head_sha(&remote.work_dir).unwrap(),
    remote.head_sha(&remote.remote).unwrap()
  );
  assert!(remote.tags(&remote.work_dir).unwrap().is_empty());
  assert!(remote.tags(&remote.remote).unwrap().is_empty());
}

#[test]
fn test_missing_identity_is_prompted_for() {
  let remote = TestRemote::new(&[("HISTORY.md", "# History\n")]).unwrap();
  let artifact = remote.write_artifact("README.md", "prompted\n").unwrap();

  // No committer_name/committer_email in the config
  remote
    .write_config(&format!(
      r#"
work_dir = "{}"
repository = "{}"
branch = "main"
version = "1.2.0"
push = false

[[files]]
src = "{}"
dest = "README.md"
"#,
      remote.work_dir.display(),
      remote.remote.display(),
      artifact.display()
    ))
    .unwrap();

  let output = run_relpack_with_stdin(&remote.root, &["run"], "Prompted User\nprompted@example.com\n").unwrap();
  assert_success(&output);

  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("Committer name"));
  assert!(stdout.contains("Committer email"));

  assert_eq!(
    remote.head_author(&remote.work_dir).unwrap(),
    "Prompted User <prompted@example.com>"
  );
  assert_eq!(remote.head_message(&remote.work_dir).unwrap(), "v1.2.0");
}

#[test]
fn test_version_falls_back_to_package_json() {
  let remote = TestRemote::new(&[("HISTORY.md", "# History\n")]).unwrap();
  let artifact = remote.write_artifact("README.md", "fallback\n").unwrap();
  remote
    .write_artifact("package.json", "{\"name\": \"project\", \"version\": \"2.5.0\"}")
    .unwrap();

  // No version in the config: resolved from ./package.json in the cwd
  remote
    .write_config(&format!(
      r#"
work_dir = "{}"
repository = "{}"
branch = "main"
push = false
committer_name = "Release Bot"
committer_email = "release@example.com"

[[files]]
src = "{}"
dest = "README.md"
"#,
      remote.work_dir.display(),
      remote.remote.display(),
      artifact.display()
    ))
    .unwrap();

  let output = run_relpack(&remote.root, &["run"]).unwrap();
  assert_success(&output);

  assert_eq!(remote.head_message(&remote.work_dir).unwrap(), "v2.5.0");
  assert_eq!(remote.tags(&remote.work_dir).unwrap(), vec!["v2.5.0"]);
}

#[test]
fn test_custom_templates_and_version_flag() {
  let remote = TestRemote::new(&[("HISTORY.md", "# History\n")]).unwrap();
  let artifact = remote.write_artifact("README.md", "templated\n").unwrap();

  remote
    .write_config(&format!(
      r#"
work_dir = "{}"
repository = "{}"
branch = "main"
push = false
committer_name = "Release Bot"
committer_email = "release@example.com"
commit_message = "chore: release %VERSION%"
tag_name = "release-%VERSION%"
tag_message = "Cut %VERSION%"

[[files]]
src = "{}"
dest = "README.md"
"#,
      remote.work_dir.display(),
      remote.remote.display(),
      artifact.display()
    ))
    .unwrap();

  // --version overrides whatever the config would resolve
  let output = run_relpack(&remote.root, &["run", "--version", "3.0.0"]).unwrap();
  assert_success(&output);

  assert_eq!(remote.head_message(&remote.work_dir).unwrap(), "chore: release 3.0.0");
  assert_eq!(remote.tags(&remote.work_dir).unwrap(), vec!["release-3.0.0"]);
}

#[test]
fn test_no_push_flag_overrides_config() {
  let remote = TestRemote::new(&[("HISTORY.md", "# History\n")]).unwrap();
  let artifact = remote.write_artifact("README.md", "held back\n").unwrap();

  remote
    .write_config(&config_body(
      &remote,
      &format!(
        r#"
push = true

[[files]]
src = "{}"
dest = "README.md"
"#,
        artifact.display()
      ),
    ))
    .unwrap();

  let output = run_relpack(&remote.root, &["run", "--no-push"]).unwrap();
  assert_success(&output);

  assert_eq!(remote.tags(&remote.work_dir).unwrap(), vec!["v1.2.0"]);
  assert!(remote.tags(&remote.remote).unwrap().is_empty());
}

#[test]
fn test_leftover_work_dir_is_refused() {
  let remote = TestRemote::new(&[("HISTORY.md", "# History\n")]).unwrap();
  std::fs::create_dir_all(&remote.work_dir).unwrap();
  std::fs::write(remote.work_dir.join("stale"), "leftover").unwrap();

  remote.write_config(&config_body(&remote, "push = false\n")).unwrap();

  let output = run_relpack(&remote.root, &["run"]).unwrap();
  assert!(!output.status.success());
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("not empty"));
}
