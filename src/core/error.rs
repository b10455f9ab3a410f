//! Error types for relpack with contextual messages and exit codes
//!
//! A release run either succeeds, terminates early with nothing to commit,
//! or fails with exactly one of the errors below. Every error carries enough
//! context to identify the failing stage, and most carry a help suggestion.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for relpack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing files)
  User = 1,
  /// System error (git, network, I/O)
  System = 2,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for relpack
#[derive(Debug)]
pub enum ReleaseError {
  /// Configuration errors, surfaced before any stage runs
  Config(ConfigError),

  /// Git operation errors (clone, commit, tag, push)
  Git(GitError),

  /// I/O errors (file copies, manifest rewrites)
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },

  /// Another error wrapped with stage context; category and exit code come
  /// from the wrapped error
  Context { context: String, source: Box<ReleaseError> },
}

impl ReleaseError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ReleaseError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ReleaseError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ReleaseError::Message { message, context, help } => ReleaseError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      ReleaseError::Context { context, source } => ReleaseError::Context {
        context: format!("{}\n{}", ctx_str, context),
        source,
      },
      other => ReleaseError::Context {
        context: ctx_str,
        source: Box::new(other),
      },
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ReleaseError::Config(_) => ExitCode::User,
      ReleaseError::Git(_) => ExitCode::System,
      ReleaseError::Io(_) => ExitCode::System,
      ReleaseError::Message { .. } => ExitCode::User,
      ReleaseError::Context { source, .. } => source.exit_code(),
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ReleaseError::Config(e) => e.help_message(),
      ReleaseError::Git(e) => e.help_message(),
      ReleaseError::Message { help, .. } => help.clone(),
      ReleaseError::Context { source, .. } => source.help_message(),
      _ => None,
    }
  }
}

impl fmt::Display for ReleaseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseError::Config(e) => write!(f, "{}", e),
      ReleaseError::Git(e) => write!(f, "{}", e),
      ReleaseError::Io(e) => write!(f, "I/O error: {}", e),
      ReleaseError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
      ReleaseError::Context { context, source } => {
        write!(f, "{}\n{}", context, source)
      }
    }
  }
}

impl std::error::Error for ReleaseError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ReleaseError::Io(e) => Some(e),
      ReleaseError::Context { source, .. } => Some(&**source),
      _ => None,
    }
  }
}

impl From<io::Error> for ReleaseError {
  fn from(err: io::Error) -> Self {
    ReleaseError::Io(err)
  }
}

impl From<String> for ReleaseError {
  fn from(msg: String) -> Self {
    ReleaseError::message(msg)
  }
}

impl From<&str> for ReleaseError {
  fn from(msg: &str) -> Self {
    ReleaseError::message(msg)
  }
}

impl From<git2::Error> for ReleaseError {
  fn from(err: git2::Error) -> Self {
    ReleaseError::Git(GitError::Object {
      message: err.message().to_string(),
    })
  }
}

impl From<toml::de::Error> for ReleaseError {
  fn from(err: toml::de::Error) -> Self {
    ReleaseError::message(format!("TOML parse error: {}", err))
  }
}

impl From<serde_json::Error> for ReleaseError {
  fn from(err: serde_json::Error) -> Self {
    ReleaseError::message(format!("JSON error: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for ReleaseError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    ReleaseError::message(format!("UTF-8 conversion error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// relpack.toml not found
  NotFound { path: PathBuf },

  /// Missing required field
  MissingField { field: String },

  /// Invalid file permission mode
  InvalidMode { value: String },

  /// Work directory already exists and is non-empty
  WorkDirNotEmpty { path: PathBuf },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => Some("Run `relpack init` to create a configuration file.".to_string()),
      ConfigError::MissingField { field } if field == "version" => {
        Some("Set `version` in relpack.toml, pass --version, or add a version to ./package.json.".to_string())
      }
      ConfigError::InvalidMode { .. } => {
        Some("Use `file_mode = true` to copy the source mode, or an octal string like \"644\".".to_string())
      }
      ConfigError::WorkDirNotEmpty { path } => Some(format!(
        "Remove the previous working directory first: rm -rf {}",
        path.display()
      )),
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { path } => {
        write!(f, "No relpack configuration found.\nExpected file: {}", path.display())
      }
      ConfigError::MissingField { field } => {
        write!(f, "Missing required field in config: {}", field)
      }
      ConfigError::InvalidMode { value } => {
        write!(f, "Invalid file_mode in config: {}", value)
      }
      ConfigError::WorkDirNotEmpty { path } => {
        write!(f, "Working directory is not empty: {}", path.display())
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Clone failed (transport, auth, or filesystem)
  CloneFailed { url: String, reason: String },

  /// Tag creation failed (collision, bad target)
  TagFailed { tag: String, reason: String },

  /// Push failed (auth, network, non-fast-forward rejection)
  PushFailed { remote: String, reason: String },

  /// Index/tree/commit object operation failed
  Object { message: String },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::CloneFailed { reason, .. } => {
        if reason.contains("authentication") || reason.contains("credentials") {
          Some("relpack authenticates via a running ssh-agent. Check `ssh-add -l` lists a key with access.".to_string())
        } else {
          None
        }
      }
      GitError::TagFailed { tag, reason } if reason.contains("exists") => {
        Some(format!("Tag '{}' already exists on the branch. Bump the version or delete the tag.", tag))
      }
      GitError::PushFailed { reason, .. } => {
        if reason.contains("fast-forward") {
          Some("The remote branch has moved since the clone. Re-run the release against the new tip.".to_string())
        } else {
          Some("Push manually from the working directory if the network is flaky.".to_string())
        }
      }
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CloneFailed { url, reason } => {
        write!(f, "Clone of {} failed: {}", url, reason)
      }
      GitError::TagFailed { tag, reason } => {
        write!(f, "Creating tag '{}' failed: {}", tag, reason)
      }
      GitError::PushFailed { remote, reason } => {
        write!(f, "Push to '{}' failed: {}", remote, reason)
      }
      GitError::Object { message } => {
        write!(f, "Git operation failed: {}", message)
      }
    }
  }
}

/// Result type alias for relpack
pub type ReleaseResult<T> = Result<T, ReleaseError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ReleaseResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ReleaseError>,
{
  fn context(self, ctx: impl Into<String>) -> ReleaseResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ReleaseResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ReleaseError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
