mod commands;
mod core;

use clap::{Parser, Subcommand};
use crate::core::error::print_error;
use std::path::PathBuf;

/// Package a release into a distribution repo: clone, copy, bump, commit, tag, push
#[derive(Parser)]
#[command(name = "relpack")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Write a commented sample relpack.toml
  Init {
    /// Overwrite an existing relpack.toml
    #[arg(long)]
    force: bool,
  },

  /// Run the release pipeline from a configuration file
  Run {
    /// Path to the configuration file (default: ./relpack.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Release version, overrides the config file
    #[arg(long)]
    version: Option<String>,
    /// Create the commit and tag but skip the push
    #[arg(long)]
    no_push: bool,
    /// Ephemeral clone directory, overrides the config file
    #[arg(long)]
    work_dir: Option<PathBuf>,
    /// Log each copied file and staged path
    #[arg(short, long)]
    verbose: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  use anstyle::{AnsiColor, Color, Style};

  let heading = Style::new().bold().underline().fg_color(Some(Color::Ansi(AnsiColor::Cyan)));
  let error = Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::Red)));

  clap::builder::Styles::styled()
    .usage(heading)
    .header(heading)
    .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
    .invalid(error)
    .error(error)
    .valid(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::Green))))
    .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();

  let result = match cli.command {
    Commands::Init { force } => commands::run_init(force),
    Commands::Run {
      config,
      version,
      no_push,
      work_dir,
      verbose,
    } => commands::run_release(config, version, no_push, work_dir, verbose),
  };

  if let Err(error) = result {
    print_error(&error);
    std::process::exit(error.exit_code().as_i32());
  }
}
