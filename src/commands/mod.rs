//! CLI commands for relpack
//!
//! - **init**: Write a commented sample relpack.toml
//! - **run**: Execute the release pipeline from a configuration file

pub mod init;
pub mod run;

pub use init::run_init;
pub use run::run_release;
