//! Committer identity resolution
//!
//! A commit needs a name and an email. When either is missing from the
//! configuration, the pipeline stops and asks on the interactive channel,
//! name first, then email. There is no timeout: an unattended run with an
//! incomplete identity blocks until input arrives, so automated callers must
//! pre-supply both fields.

use crate::core::error::{ReleaseError, ReleaseResult, ResultExt};
use std::io::{BufRead, Write};

/// Resolved committer name and email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
  pub name: String,
  pub email: String,
}

/// Interactive channel for missing identity values
///
/// A trait seam so tests can script answers instead of reading stdin.
pub trait Prompt {
  /// Ask one question and block until a line of input arrives
  fn ask(&mut self, question: &str) -> ReleaseResult<String>;
}

/// Prompt backed by stdin/stdout
pub struct StdioPrompt;

impl Prompt for StdioPrompt {
  fn ask(&mut self, question: &str) -> ReleaseResult<String> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write!(out, "{}: ", question).context("Failed to write prompt")?;
    out.flush().context("Failed to flush prompt")?;

    let stdin = std::io::stdin();
    let mut answer = String::new();
    stdin
      .lock()
      .read_line(&mut answer)
      .context("Failed to read prompt answer")?;
    Ok(answer.trim_end_matches(['\r', '\n']).to_string())
  }
}

/// Resolve the committer identity, prompting for whichever field is missing
///
/// Returns immediately when both are configured. Otherwise announces what is
/// missing and asks for name first, then email, blocking on each.
pub fn resolve_identity(
  name: Option<&str>,
  email: Option<&str>,
  prompt: &mut dyn Prompt,
) -> ReleaseResult<Identity> {
  if let (Some(name), Some(email)) = (name, email) {
    return Ok(Identity {
      name: name.to_string(),
      email: email.to_string(),
    });
  }

  println!("⚠️  Committer name or email missing, please enter:");

  let name = match name {
    Some(name) => name.to_string(),
    None => prompt.ask("- Committer name")?,
  };
  let email = match email {
    Some(email) => email.to_string(),
    None => prompt.ask("- Committer email")?,
  };

  if name.is_empty() {
    return Err(ReleaseError::message("Committer name cannot be empty"));
  }
  if email.is_empty() {
    return Err(ReleaseError::message("Committer email cannot be empty"));
  }

  Ok(Identity { name, email })
}
