use std::path::PathBuf;

use crate::cli::exit_status::ExitStatus;

#[derive(Debug)]
pub enum CommandSummary {
    Build(BuildSummary),
    Merge(MergeSummary),
    Init(InitSummary),
}

/// A source file skipped because it could not be read or parsed.
#[derive(Debug, Clone)]
pub struct ParseFailure {
    pub file_path: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct BuildSummary {
    pub files_scanned: usize,
    /// Files with at least one rewritten message.
    pub files_transformed: usize,
    /// Rewritten call sites.
    pub messages: usize,
    /// Distinct catalog entries.
    pub unique_messages: usize,
    /// Message functions skipped by an opt-out tag.
    pub excluded: usize,
    /// Ids present in the previous source dictionary but not in this build.
    pub removed_ids: usize,
    /// Files written, in write order.
    pub written: Vec<PathBuf>,
    pub parse_failures: Vec<ParseFailure>,
    /// PO output was skipped because the format is unavailable.
    pub catalog_skipped: bool,
}

#[derive(Debug)]
pub struct MergeSummary {
    pub output: PathBuf,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
}

/// Result of running msgkey commands
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
    /// Number of files that failed to parse.
    pub parse_error_count: usize,
}

impl CommandResult {
    pub fn new(summary: CommandSummary) -> Self {
        let parse_error_count = match &summary {
            CommandSummary::Build(build) => build.parse_failures.len(),
            CommandSummary::Merge(_) | CommandSummary::Init(_) => 0,
        };
        Self {
            summary,
            parse_error_count,
        }
    }

    /// Completed work with skipped files (or a refused init) is a failure,
    /// not an error.
    pub fn exit_status(&self) -> ExitStatus {
        match &self.summary {
            CommandSummary::Init(init) if !init.created => ExitStatus::Failure,
            _ if self.parse_error_count > 0 => ExitStatus::Failure,
            _ => ExitStatus::Success,
        }
    }
}
