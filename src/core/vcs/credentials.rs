//! Authentication and certificate trust for remote operations
//!
//! Credentials come from a running ssh-agent; there is no key-file or
//! password fallback, and no retry; a credential failure surfaces as a
//! fatal transport error from the clone or push that triggered it. Local
//! filesystem remotes never hit these callbacks.

use crate::core::config::CertificatePolicy;
use git2::{CertificateCheckStatus, Cred, RemoteCallbacks};

/// Supplies transport credentials and certificate trust decisions
#[derive(Debug, Clone, Copy)]
pub struct CredentialProvider {
  policy: CertificatePolicy,
}

impl CredentialProvider {
  pub fn new(policy: CertificatePolicy) -> Self {
    Self { policy }
  }

  /// Build the remote callbacks attached to every clone and push
  pub fn callbacks(&self) -> RemoteCallbacks<'static> {
    let policy = self.policy;
    let mut callbacks = RemoteCallbacks::new();

    callbacks.credentials(|_url, username_from_url, _allowed| {
      Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"))
    });

    callbacks.certificate_check(move |_cert, _hostname| match policy {
      // Escape hatch for platforms with broken certificate chains
      CertificatePolicy::AcceptAll => Ok(CertificateCheckStatus::CertificateOk),
      CertificatePolicy::Verify => Ok(CertificateCheckStatus::CertificatePassthrough),
    });

    callbacks
  }
}

impl Default for CredentialProvider {
  fn default() -> Self {
    Self::new(CertificatePolicy::default())
  }
}
