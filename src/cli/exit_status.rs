use std::process::ExitCode;

/// Exit status for CLI commands.
///
/// - `Success` (0): every artifact was written
/// - `Failure` (1): the command finished but some input was skipped
///   (unparsable sources, an existing config on `init`)
/// - `Error` (2): the command aborted (bad config, unreadable catalog, I/O)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    /// Finished with skipped input.
    Failure,
    /// Aborted before finishing.
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
