use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use time::OffsetDateTime;

use super::{CommandResult, CommandSummary, MergeSummary};
use crate::catalog;
use crate::cli::args::MergeCommand;

fn require_file(path: &Path, what: &str) -> Result<()> {
    let meta =
        fs::metadata(path).with_context(|| format!("Failed to read {what}: {}", path.display()))?;
    if !meta.is_file() {
        bail!("Failed to read {what}: {} is not a file", path.display());
    }
    Ok(())
}

/// Merge OLD with NEW and write the result to OUTPUT (or back to OLD).
///
/// Fails when the catalog format is unavailable.
pub fn merge(cmd: MergeCommand) -> Result<CommandResult> {
    require_file(&cmd.old, "catalog")?;
    require_file(&cmd.new, "template")?;

    let output = cmd.output.unwrap_or_else(|| cmd.old.clone());
    catalog::merge_catalogs(&cmd.old, &cmd.new, &output, OffsetDateTime::now_utc()).with_context(
        || {
            format!(
                "Failed to merge {} with {}",
                cmd.old.display(),
                cmd.new.display()
            )
        },
    )?;

    Ok(CommandResult::new(CommandSummary::Merge(MergeSummary {
        output,
    })))
}
