//! Working repository handle built on libgit2
//!
//! One `WorkingRepository` per release run: created by the clone stage,
//! mutated by the workspace stage, then committed, tagged, and pushed. The
//! clone directory is never removed here; pre-run cleanup is the caller's
//! responsibility.

use crate::core::error::{GitError, ReleaseError, ReleaseResult};
use crate::core::identity::Identity;
use crate::core::vcs::CredentialProvider;
use git2::{
  FetchOptions, IndexAddOption, ObjectType, Oid, PushOptions, Repository, Signature, StatusOptions,
  build::RepoBuilder,
};
use std::path::{Path, PathBuf};

/// The on-disk clone plus its libgit2 handle, bound to one branch
pub struct WorkingRepository {
  repo: Repository,
  work_tree: PathBuf,
  branch: String,
}

impl WorkingRepository {
  /// Clone `branch` of `url` into `work_dir`
  ///
  /// A full clone with HEAD at the branch tip. Transport, authentication,
  /// and filesystem errors are all fatal; there is no shallow or
  /// alternate-branch fallback.
  pub fn clone_branch(
    url: &str,
    work_dir: &Path,
    branch: &str,
    provider: &CredentialProvider,
  ) -> ReleaseResult<Self> {
    let mut fetch = FetchOptions::new();
    fetch.remote_callbacks(provider.callbacks());

    let repo = RepoBuilder::new()
      .branch(branch)
      .fetch_options(fetch)
      .clone(url, work_dir)
      .map_err(|e| {
        ReleaseError::Git(GitError::CloneFailed {
          url: url.to_string(),
          reason: e.message().to_string(),
        })
      })?;

    let work_tree = repo
      .workdir()
      .ok_or_else(|| ReleaseError::message("Cloned repository has no working directory"))?
      .to_path_buf();

    Ok(Self {
      repo,
      work_tree,
      branch: branch.to_string(),
    })
  }

  /// Path of the clone's working tree
  pub fn work_tree(&self) -> &Path {
    &self.work_tree
  }

  /// Count of changed paths relative to HEAD, untracked files included
  pub fn changed_paths(&self) -> ReleaseResult<usize> {
    let mut opts = StatusOptions::new();
    opts.include_untracked(true).recurse_untracked_dirs(true);
    let statuses = self.repo.statuses(Some(&mut opts))?;
    Ok(statuses.len())
  }

  /// Stage everything and commit on top of the current HEAD
  ///
  /// The new commit's sole parent is the branch tip from clone time; HEAD
  /// advances to it. Callers check `changed_paths` first, committing an
  /// unchanged tree is not an error here, just pointless.
  pub fn commit_all(&self, identity: &Identity, message: &str, verbose: bool) -> ReleaseResult<Oid> {
    let mut index = self.repo.index()?;
    // Force-reload so staging sees the mutated working tree
    index.read(true)?;

    index.add_all(
      ["*"].iter(),
      IndexAddOption::DEFAULT,
      Some(&mut |path: &Path, _pathspec: &[u8]| {
        if verbose {
          println!("   Staging {}", path.display());
        }
        0
      }),
    )?;
    index.write()?;

    let tree_id = index.write_tree()?;
    let tree = self.repo.find_tree(tree_id)?;
    let parent = self.repo.head()?.peel_to_commit()?;
    let signature = Signature::now(&identity.name, &identity.email)?;

    let commit = self
      .repo
      .commit(Some("HEAD"), &signature, &signature, message, &tree, &[&parent])?;

    Ok(commit)
  }

  /// Create an annotated tag pointing at `commit`
  ///
  /// Never forced: a name collision is fatal and aborts before any push.
  pub fn create_tag(&self, commit: Oid, name: &str, message: &str, identity: &Identity) -> ReleaseResult<Oid> {
    let target = self.repo.find_object(commit, Some(ObjectType::Commit))?;
    let tagger = Signature::now(&identity.name, &identity.email)?;

    self.repo.tag(name, &target, &tagger, message, false).map_err(|e| {
      ReleaseError::Git(GitError::TagFailed {
        tag: name.to_string(),
        reason: e.message().to_string(),
      })
    })
  }

  /// Push the tag ref and the branch head ref together, in one push
  pub fn push_release(&self, remote_name: &str, tag_name: &str, provider: &CredentialProvider) -> ReleaseResult<()> {
    let mut remote = self.repo.find_remote(remote_name).map_err(|e| {
      ReleaseError::Git(GitError::PushFailed {
        remote: remote_name.to_string(),
        reason: e.message().to_string(),
      })
    })?;

    let mut callbacks = provider.callbacks();
    // Per-ref rejections (e.g. non-fast-forward) arrive here, not as a
    // push() error
    callbacks.push_update_reference(|refname, status| match status {
      Some(reason) => Err(git2::Error::from_str(&format!("{} rejected: {}", refname, reason))),
      None => Ok(()),
    });

    let mut opts = PushOptions::new();
    opts.remote_callbacks(callbacks);

    let refspecs = [
      format!("refs/tags/{0}:refs/tags/{0}", tag_name),
      format!("refs/heads/{0}:refs/heads/{0}", self.branch),
    ];

    remote.push(&refspecs, Some(&mut opts)).map_err(|e| {
      ReleaseError::Git(GitError::PushFailed {
        remote: remote_name.to_string(),
        reason: e.message().to_string(),
      })
    })
  }
}
