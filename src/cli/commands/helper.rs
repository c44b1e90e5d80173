use std::path::{Path, PathBuf};

pub use crate::output::write_artifact;

/// A command-line override wins over the config value; relative config
/// values are resolved against the config file's directory.
pub fn resolve_dir(cli: Option<&Path>, config_value: &str, base_dir: &Path) -> PathBuf {
    match cli {
        Some(path) => path.to_path_buf(),
        None => base_dir.join(config_value),
    }
}

/// `path` relative to `root`, with `/` separators, for references and output
/// locations.
pub fn relative_path(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
