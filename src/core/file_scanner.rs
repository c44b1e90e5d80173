//! Source file discovery for a build.

use std::{
    collections::BTreeSet,
    path::{Component, Path, PathBuf},
};

use glob::{Pattern, glob};
use walkdir::WalkDir;

use crate::config::TEST_FILE_PATTERNS;

/// Extensions of files that may contain message functions.
pub const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"];

fn has_wildcard(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// `./src/gen` and `src/gen` name the same directory.
fn normalized(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Paths a build never looks at, relative to the source root.
///
/// A wildcard pattern is matched as a glob; any other pattern skips that
/// path and everything below it.
#[derive(Debug, Default)]
pub struct SourceFilter {
    prefixes: Vec<PathBuf>,
    globs: Vec<Pattern>,
}

impl SourceFilter {
    pub fn new(ignores: &[String], ignore_test_files: bool) -> Self {
        let mut filter = Self::default();
        for ignore in ignores {
            if !has_wildcard(ignore) {
                filter.prefixes.push(normalized(Path::new(ignore)));
                continue;
            }
            match Pattern::new(ignore) {
                Ok(pattern) => filter.globs.push(pattern),
                Err(e) => tracing::warn!(pattern = %ignore, "invalid ignore pattern: {}", e),
            }
        }
        if ignore_test_files {
            filter.globs.extend(
                TEST_FILE_PATTERNS
                    .iter()
                    .filter_map(|p| Pattern::new(p).ok()),
            );
        }
        filter
    }

    pub fn skips(&self, relative: &Path) -> bool {
        let relative = normalized(relative);
        self.prefixes
            .iter()
            .any(|prefix| relative.starts_with(prefix))
            || self.globs.iter().any(|glob| glob.matches_path(&relative))
    }
}

/// Directories the walk starts from: `root` itself, or each include
/// (a directory or a glob over directories) under it.
fn walk_roots(root: &Path, includes: &[String]) -> Vec<PathBuf> {
    if includes.is_empty() {
        return vec![root.to_path_buf()];
    }
    let mut roots = Vec::new();
    for include in includes {
        let path = root.join(include);
        if has_wildcard(include) {
            match glob(&path.to_string_lossy()) {
                Ok(entries) => roots.extend(entries.flatten().filter(|entry| entry.is_dir())),
                Err(e) => tracing::warn!(pattern = %include, "invalid include pattern: {}", e),
            }
        } else if path.exists() {
            roots.push(path);
        } else {
            tracing::warn!(path = %path.display(), "include path does not exist");
        }
    }
    roots
}

/// Source files under `root`, in path order.
///
/// Skipped directories are not descended into.
pub fn scan_files(root: &Path, includes: &[String], filter: &SourceFilter) -> BTreeSet<PathBuf> {
    let relative = |path: &Path| path.strip_prefix(root).unwrap_or(path).to_path_buf();

    let mut files = BTreeSet::new();
    for start in walk_roots(root, includes) {
        let walk = WalkDir::new(start)
            .into_iter()
            .filter_entry(|entry| !filter.skips(&relative(entry.path())));
        for entry in walk {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("cannot access path: {}", e);
                    continue;
                }
            };
            if entry.file_type().is_file() && is_source_file(entry.path()) {
                files.insert(entry.into_path());
            }
        }
    }
    files
}

/// Script sources, excluding `.d.ts` declaration files.
pub fn is_source_file(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    if !SOURCE_EXTENSIONS.contains(&ext) {
        return false;
    }
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    !stem.ends_with(".d")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::{TempDir, tempdir};

    use super::*;

    /// A project tree with empty files at the given relative paths.
    fn project(files: &[&str]) -> TempDir {
        let dir = tempdir().unwrap();
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }
        dir
    }

    fn scan(dir: &TempDir, includes: &[&str], filter: &SourceFilter) -> Vec<String> {
        let includes: Vec<String> = includes.iter().map(|s| s.to_string()).collect();
        scan_files(dir.path(), &includes, filter)
            .iter()
            .map(|path| {
                path.strip_prefix(dir.path())
                    .unwrap()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect()
    }

    #[test]
    fn test_finds_script_sources_in_order() {
        let dir = project(&[
            "src/toolbar.ts",
            "src/app.tsx",
            "src/legacy.mjs",
            "src/types.d.ts",
            "src/theme.css",
        ]);
        let files = scan(&dir, &["src"], &SourceFilter::default());
        assert_eq!(
            files,
            vec!["src/app.tsx", "src/legacy.mjs", "src/toolbar.ts"]
        );
    }

    #[test]
    fn test_literal_ignore_prunes_directory() {
        let dir = project(&["src/app.tsx", "src/generated/messages.ts", "lib/util.ts"]);
        let filter = SourceFilter::new(&["./src/generated".to_string()], false);
        assert_eq!(scan(&dir, &["src"], &filter), vec!["src/app.tsx"]);
    }

    #[test]
    fn test_glob_ignore_matches_relative_paths() {
        let dir = project(&["src/app.tsx", "src/node_modules/lib/index.ts"]);
        let filter = SourceFilter::new(&["**/node_modules/**".to_string()], false);
        assert_eq!(scan(&dir, &[], &filter), vec!["src/app.tsx"]);
    }

    #[test]
    fn test_glob_include_selects_directories() {
        let dir = project(&[
            "src/features/auth/messages.ts",
            "src/features/billing/messages.ts",
            "src/main.ts",
        ]);
        let files = scan(&dir, &["src/features/*"], &SourceFilter::default());
        assert_eq!(
            files,
            vec![
                "src/features/auth/messages.ts",
                "src/features/billing/messages.ts"
            ]
        );
    }

    #[test]
    fn test_missing_include_finds_nothing() {
        let dir = project(&["app/main.ts"]);
        assert!(scan(&dir, &["src"], &SourceFilter::default()).is_empty());
    }

    #[test]
    fn test_test_files_skipped_on_request() {
        let dir = project(&[
            "src/app.tsx",
            "src/app.test.tsx",
            "src/utils.spec.ts",
            "src/__tests__/helper.ts",
        ]);
        assert_eq!(
            scan(&dir, &["src"], &SourceFilter::new(&[], true)),
            vec!["src/app.tsx"]
        );
        assert_eq!(
            scan(&dir, &["src"], &SourceFilter::new(&[], false)).len(),
            4
        );
    }

    #[test]
    fn test_is_source_file() {
        assert!(is_source_file(Path::new("app.tsx")));
        assert!(is_source_file(Path::new("app.cts")));
        assert!(!is_source_file(Path::new("app.d.ts")));
        assert!(!is_source_file(Path::new("data.json")));
        assert!(!is_source_file(Path::new("README")));
    }
}
