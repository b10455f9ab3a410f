//! Git operations for the release pipeline
//!
//! - **credentials**: ssh-agent authentication and TLS certificate policy
//! - **git**: the working repository handle (clone, status, commit, tag, push)

pub mod credentials;
pub mod git;

pub use credentials::CredentialProvider;
pub use git::WorkingRepository;
