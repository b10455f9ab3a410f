//! Core engine for the release pipeline
//!
//! - **config**: Release configuration (relpack.toml) parsing and validation
//! - **error**: Error types with contextual help messages and exit codes
//! - **identity**: Committer identity resolution with interactive prompts
//! - **pipeline**: The clone → mutate → commit → tag → push transaction
//! - **workspace**: Artifact materialization and manifest version bumps
//! - **vcs**: Git operations (clone, status, commit, tag, push) and credentials

pub mod config;
pub mod error;
pub mod identity;
pub mod pipeline;
pub mod vcs;
pub mod workspace;
