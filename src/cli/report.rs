//! Report formatting and printing.
//!
//! Kept apart from the commands so msgkey can be used as a library.

use std::io::{self, Write};

use colored::Colorize;

use super::commands::{
    BuildSummary, CommandResult, CommandSummary, InitSummary, MergeSummary, ParseFailure,
};
use crate::config::CONFIG_FILE_NAME;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

fn plural(count: usize, one: &str, many: &str) -> String {
    format!("{} {}", count, if count == 1 { one } else { many })
}

pub fn print(result: &CommandResult, verbose: bool) {
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    match &result.summary {
        CommandSummary::Build(summary) => {
            print_build_to(summary, verbose, &mut stdout);
            print_parse_failures_to(&summary.parse_failures, verbose, &mut stderr);
        }
        CommandSummary::Merge(summary) => print_merge_to(summary, &mut stdout),
        CommandSummary::Init(summary) => print_init_to(summary, &mut stdout, &mut stderr),
    }
}

fn print_build_to<W: Write>(summary: &BuildSummary, verbose: bool, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Extracted {} ({} unique) from {}",
            plural(summary.messages, "message", "messages"),
            summary.unique_messages,
            plural(summary.files_transformed, "file", "files"),
        )
        .green()
    );

    let mut details = vec![format!(
        "{} scanned",
        plural(summary.files_scanned, "file", "files")
    )];
    if summary.excluded > 0 {
        details.push(format!("{} opted out", summary.excluded));
    }
    if summary.removed_ids > 0 {
        details.push(format!(
            "{} no longer used",
            plural(summary.removed_ids, "message", "messages")
        ));
    }
    let _ = writeln!(writer, "  {}", details.join(", ").dimmed());

    if verbose {
        for path in &summary.written {
            let _ = writeln!(writer, "  {} {}", "wrote".cyan(), path.display());
        }
    }

    if summary.catalog_skipped {
        let _ = writeln!(
            writer,
            "{} PO catalog support is not available, wrote JSON dictionaries only",
            "warning:".bold().yellow()
        );
    }
}

fn print_parse_failures_to<W: Write>(failures: &[ParseFailure], verbose: bool, writer: &mut W) {
    if failures.is_empty() {
        return;
    }
    if verbose {
        for failure in failures {
            let _ = writeln!(
                writer,
                "{} {}: {}",
                FAILURE_MARK.red(),
                failure.file_path.bold(),
                failure.message
            );
        }
    } else {
        let _ = writeln!(
            writer,
            "{} {} could not be parsed (use {} for details)",
            "warning:".bold().yellow(),
            plural(failures.len(), "file", "files"),
            "-v".cyan()
        );
    }
}

fn print_merge_to<W: Write>(summary: &MergeSummary, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!("Merged catalog written to {}", summary.output.display()).green()
    );
}

fn print_init_to<W: Write, E: Write>(summary: &InitSummary, writer: &mut W, errors: &mut E) {
    if summary.created {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    } else {
        let _ = writeln!(
            errors,
            "{} {} already exists",
            "error:".bold().red(),
            CONFIG_FILE_NAME
        );
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn render(f: impl FnOnce(&mut Vec<u8>)) -> String {
        colored::control::set_override(false);
        let mut out = Vec::new();
        f(&mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_build_summary() {
        let summary = BuildSummary {
            files_scanned: 4,
            files_transformed: 1,
            messages: 3,
            unique_messages: 2,
            excluded: 1,
            written: vec![PathBuf::from("locales/en.json")],
            ..Default::default()
        };
        let text = render(|out| print_build_to(&summary, true, out));
        assert_eq!(
            text,
            "✓ Extracted 3 messages (2 unique) from 1 file\n  4 files scanned, 1 opted out\n  wrote locales/en.json\n"
        );
    }

    #[test]
    fn test_parse_failures_short_and_verbose() {
        let failures = vec![ParseFailure {
            file_path: "src/broken.ts".to_string(),
            message: "line 2: Expected '}'".to_string(),
        }];
        let short = render(|out| print_parse_failures_to(&failures, false, out));
        assert_eq!(
            short,
            "warning: 1 file could not be parsed (use -v for details)\n"
        );

        let long = render(|out| print_parse_failures_to(&failures, true, out));
        assert_eq!(long, "✘ src/broken.ts: line 2: Expected '}'\n");
    }
}
