//! Release configuration (relpack.toml) parsing and validation
//!
//! The configuration is resolved once per invocation and immutable afterward.
//! Defaults mirror the conventional release layout: commit/tag templates with
//! a `%VERSION%` placeholder, `origin` as the push remote, push enabled.

use crate::core::error::{ConfigError, ReleaseError, ReleaseResult, ResultExt};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Placeholder substituted verbatim in commit/tag templates
pub const VERSION_PLACEHOLDER: &str = "%VERSION%";

/// Manifest files whose `version` field gets bumped in the clone
pub const MANIFEST_FILES: [&str; 2] = ["bower.json", "package.json"];

/// Configuration for one release run, loaded from relpack.toml
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReleaseConfig {
  /// Ephemeral clone directory; must be absent or empty before the run
  pub work_dir: PathBuf,

  /// Remote repository URL (ssh, https, or a local path)
  pub repository: String,

  /// Branch to clone and push
  #[serde(default = "default_branch")]
  pub branch: String,

  /// Remote name to push to
  #[serde(default = "default_push_remote")]
  pub push_remote: String,

  /// Whether to push the new branch head and tag
  #[serde(default = "default_true")]
  pub push: bool,

  /// Release version; may instead come from --version or ./package.json
  pub version: Option<String>,

  /// Commit message template
  #[serde(default = "default_commit_message")]
  pub commit_message: String,

  /// Tag name template
  #[serde(default = "default_tag_name")]
  pub tag_name: String,

  /// Tag message template
  #[serde(default = "default_tag_message")]
  pub tag_message: String,

  /// Committer name; prompted for interactively when absent
  pub committer_name: Option<String>,

  /// Committer email; prompted for interactively when absent
  pub committer_email: Option<String>,

  /// Indentation width for rewritten JSON manifests
  #[serde(default = "default_json_indent")]
  pub json_indent: usize,

  /// Synchronize copied file/directory timestamps to their sources
  #[serde(default)]
  pub preserve_timestamps: bool,

  /// Permission mode applied to copied files
  pub file_mode: Option<FileMode>,

  /// TLS certificate validation policy for clone/push
  #[serde(default)]
  pub certificate_policy: CertificatePolicy,

  /// Ordered file copy instructions, destinations relative to the clone root
  #[serde(default)]
  pub files: Vec<CopyInstruction>,
}

/// One file or directory to materialize into the clone
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CopyInstruction {
  /// Source path in the project checkout
  pub src: PathBuf,

  /// Destination path relative to the clone root
  pub dest: PathBuf,

  /// Whether this entry designates a directory to create
  #[serde(default)]
  pub dir: bool,
}

/// Permission mode for copied files
///
/// `true` copies the source file's mode; an octal string like `"644"` sets an
/// explicit mode; `false` (or omitting the field) leaves modes alone.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FileMode {
  Source(bool),
  Octal(String),
}

/// Resolved permission mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeSpec {
  /// Copy the source file's mode bits
  FromSource,
  /// Explicit mode bits
  Bits(u32),
}

impl FileMode {
  /// Resolve to mode bits, or None when disabled
  pub fn resolve(&self) -> ReleaseResult<Option<ModeSpec>> {
    match self {
      FileMode::Source(true) => Ok(Some(ModeSpec::FromSource)),
      FileMode::Source(false) => Ok(None),
      FileMode::Octal(s) => {
        let bits = u32::from_str_radix(s, 8)
          .map_err(|_| ReleaseError::Config(ConfigError::InvalidMode { value: s.clone() }))?;
        Ok(Some(ModeSpec::Bits(bits)))
      }
    }
  }
}

/// TLS certificate validation policy for remote operations
///
/// The permissive default works around broken certificate chains on some
/// platforms; `verify` defers to libgit2's standard validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CertificatePolicy {
  #[default]
  AcceptAll,
  Verify,
}

impl ReleaseConfig {
  /// Load config from a relpack.toml file
  pub fn load(path: &Path) -> ReleaseResult<Self> {
    if !path.exists() {
      return Err(ReleaseError::Config(ConfigError::NotFound {
        path: path.to_path_buf(),
      }));
    }
    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: ReleaseConfig =
      toml::from_str(&content).with_context(|| format!("Failed to parse config from {}", path.display()))?;
    Ok(config)
  }

  /// Validate required fields before any stage runs
  pub fn validate(&self) -> ReleaseResult<()> {
    if self.repository.trim().is_empty() {
      return Err(ReleaseError::Config(ConfigError::MissingField {
        field: "repository".to_string(),
      }));
    }
    if self.work_dir.as_os_str().is_empty() {
      return Err(ReleaseError::Config(ConfigError::MissingField {
        field: "work_dir".to_string(),
      }));
    }
    if self.version.is_none() {
      return Err(ReleaseError::Config(ConfigError::MissingField {
        field: "version".to_string(),
      }));
    }
    if self.branch.trim().is_empty() {
      return Err(ReleaseError::Config(ConfigError::MissingField {
        field: "branch".to_string(),
      }));
    }
    // Surface a bad mode string here instead of mid-copy
    if let Some(mode) = &self.file_mode {
      mode.resolve()?;
    }
    Ok(())
  }

  /// The resolved version; callers run `validate()` first
  pub fn version(&self) -> ReleaseResult<&str> {
    self.version.as_deref().ok_or_else(|| {
      ReleaseError::Config(ConfigError::MissingField {
        field: "version".to_string(),
      })
    })
  }
}

/// Substitute the `%VERSION%` placeholder into a template, verbatim
pub fn substitute_version(template: &str, version: &str) -> String {
  template.replace(VERSION_PLACEHOLDER, version)
}

fn default_branch() -> String {
  "master".to_string()
}

fn default_push_remote() -> String {
  "origin".to_string()
}

fn default_true() -> bool {
  true
}

fn default_commit_message() -> String {
  "v%VERSION%".to_string()
}

fn default_tag_name() -> String {
  "v%VERSION%".to_string()
}

fn default_tag_message() -> String {
  "Release v%VERSION%".to_string()
}

fn default_json_indent() -> usize {
  2
}

/// Sample configuration written by `relpack init`
pub const SAMPLE_CONFIG: &str = r#"# relpack configuration
#
# Clones `repository` into `work_dir`, copies the files below into the clone,
# bumps the version in package.json/bower.json, commits, tags, and pushes.
# Clean up work_dir before each run; relpack refuses a non-empty one.

work_dir = "tmp/release"
repository = "git@github.com:example/example-dist.git"
branch = "master"
push_remote = "origin"
push = true

# Omit to fall back to --version or ./package.json
version = "1.0.0"

commit_message = "v%VERSION%"
tag_name = "v%VERSION%"
tag_message = "Release v%VERSION%"

# Leave unset to be prompted interactively
committer_name = "Release Bot"
committer_email = "release@example.com"

json_indent = 2
preserve_timestamps = false
# file_mode = "644"          # or true to copy the source file's mode
# certificate_policy = "verify"

[[files]]
src = "README.md"
dest = "README.md"

# [[files]]
# src = "dist"
# dest = "dist"
# dir = true
"#;
