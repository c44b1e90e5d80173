//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `build`: extract messages, rewrite sources, write catalogs
//! - `merge`: update a translated PO catalog from a POT template
//! - `init`: write a default `.msgkeyrc.json`

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Build(cmd)) => cmd.verbose,
            Some(Command::Merge(cmd)) => cmd.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

#[derive(Debug, Args)]
pub struct BuildCommand {
    /// Source code root directory (overrides config file)
    #[arg(long)]
    pub source_root: Option<PathBuf>,

    /// Directory for rewritten sources (overrides config file)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Directory for dictionaries and catalogs (overrides config file)
    #[arg(long)]
    pub locales_dir: Option<PathBuf>,

    /// Production build: never emit debug markers (also set by NODE_ENV=production)
    #[arg(long)]
    pub production: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct MergeCommand {
    /// Existing translated catalog (.po)
    pub old: PathBuf,

    /// Freshly generated template (.pot)
    pub new: PathBuf,

    /// Write the result here instead of overwriting OLD
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract messages, rewrite call sites and write catalogs
    Build(BuildCommand),
    /// Merge a translated catalog with a new template
    Merge(MergeCommand),
    /// Initialize a new .msgkeyrc.json configuration file
    Init,
}
