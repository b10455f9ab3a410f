//! The release transaction pipeline
//!
//! Strictly linear: clone → mutate workspace → resolve identity → commit →
//! tag → push. Each stage consumes the previous stage's output; the first
//! failure aborts the remaining stages. There is no rollback; the clone is
//! ephemeral and the next run starts from a fresh one.

use crate::core::config::{ReleaseConfig, substitute_version};
use crate::core::error::{ConfigError, ReleaseError, ReleaseResult, ResultExt};
use crate::core::identity::{Prompt, resolve_identity};
use crate::core::vcs::{CredentialProvider, WorkingRepository};
use crate::core::workspace::{CopyOptions, bump_manifests, materialize};
use std::fs;

/// Completion signal of one pipeline run
///
/// "Nothing to commit" is a normal completion path, not an error: the clone
/// matched the artifacts exactly, so no commit, tag, or push happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
  /// A commit and tag were created (and pushed, unless push is disabled)
  Released { commit: String, tag: String, pushed: bool },
  /// The working tree was unchanged after mutation
  NothingToCommit,
}

/// Sequences the release stages over one immutable configuration
pub struct Pipeline<'a> {
  config: &'a ReleaseConfig,
  prompt: &'a mut dyn Prompt,
  verbose: bool,
}

impl<'a> Pipeline<'a> {
  pub fn new(config: &'a ReleaseConfig, prompt: &'a mut dyn Prompt, verbose: bool) -> Self {
    Self {
      config,
      prompt,
      verbose,
    }
  }

  /// Run the pipeline to completion or first failure
  pub fn run(&mut self) -> ReleaseResult<ReleaseOutcome> {
    let config = self.config;
    config.validate()?;
    let version = config.version()?.to_string();
    let provider = CredentialProvider::new(config.certificate_policy);

    // Pre-run cleanup of work_dir is the caller's job; refuse leftovers
    // instead of cloning into them
    if config.work_dir.exists() && fs::read_dir(&config.work_dir)?.next().is_some() {
      return Err(ReleaseError::Config(ConfigError::WorkDirNotEmpty {
        path: config.work_dir.clone(),
      }));
    }

    println!("📦 Cloning {} into {}", config.repository, config.work_dir.display());
    let repo = WorkingRepository::clone_branch(&config.repository, &config.work_dir, &config.branch, &provider)?;

    let opts = CopyOptions {
      preserve_timestamps: config.preserve_timestamps,
      mode: config.file_mode.as_ref().map(|m| m.resolve()).transpose()?.flatten(),
      verbose: self.verbose,
    };
    let tally =
      materialize(&config.files, repo.work_tree(), opts).context("Workspace mutation failed")?;
    if let Some(summary) = tally.summary() {
      println!("   {}", summary);
    }
    bump_manifests(repo.work_tree(), &version, config.json_indent, self.verbose)
      .context("Manifest version bump failed")?;

    let identity = resolve_identity(
      config.committer_name.as_deref(),
      config.committer_email.as_deref(),
      self.prompt,
    )?;

    if repo.changed_paths()? == 0 {
      println!("ℹ️  Nothing to commit");
      return Ok(ReleaseOutcome::NothingToCommit);
    }

    let message = substitute_version(&config.commit_message, &version);
    let commit = repo.commit_all(&identity, &message, self.verbose)?;
    println!("✅ Created commit {}", commit);

    let tag_name = substitute_version(&config.tag_name, &version);
    let tag_message = substitute_version(&config.tag_message, &version);
    repo.create_tag(commit, &tag_name, &tag_message, &identity)?;
    println!("🏷️  Created tag {}", tag_name);

    let pushed = if config.push {
      println!(
        "📤 Pushing {} and {} to {}",
        config.branch, tag_name, config.push_remote
      );
      repo.push_release(&config.push_remote, &tag_name, &provider)?;
      println!("✅ Pushed to {}", config.push_remote);
      true
    } else {
      println!("⚠️  Push disabled, remember to push manually if necessary");
      false
    };

    Ok(ReleaseOutcome::Released {
      commit: commit.to_string(),
      tag: tag_name,
      pushed,
    })
  }
}
