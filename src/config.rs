use std::{
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::catalog::{DEFAULT_INDENT_SPACES, DEFAULT_PROJECT_ID_VERSION, SerializeOptions};
use crate::core::key::{DEFAULT_HASH_LENGTH, MAX_HASH_LENGTH};
use crate::core::options::{
    ArgMode, DEFAULT_IMPORT_SOURCE, DEFAULT_TRANSLATE_FUNCTION, TransformOptions,
};

pub const CONFIG_FILE_NAME: &str = ".msgkeyrc.json";

pub const TEST_FILE_PATTERNS: &[&str] = &[
    "**/*.test.tsx",
    "**/*.test.ts",
    "**/*.test.jsx",
    "**/*.test.js",
    "**/*.spec.tsx",
    "**/*.spec.ts",
    "**/*.spec.jsx",
    "**/*.spec.js",
    "**/__tests__/**",
];

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap());

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_source_root")]
    pub source_root: String,
    #[serde(default = "default_includes")]
    pub includes: Vec<String>,
    #[serde(default)]
    pub ignores: Vec<String>,
    #[serde(default = "default_true")]
    pub ignore_test_files: bool,
    /// Where rewritten sources go. Without it, `build` only writes catalogs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<String>,
    #[serde(default = "default_locales_dir")]
    pub locales_dir: String,
    #[serde(default = "default_source_locale")]
    pub source_locale: String,
    /// Target locales that get a `.po` catalog and a compiled dictionary.
    #[serde(default)]
    pub locales: Vec<String>,
    #[serde(default = "default_hash_length")]
    pub hash_length: usize,
    #[serde(default)]
    pub arg_mode: ArgMode,
    #[serde(default)]
    pub include_default_text: bool,
    #[serde(default)]
    pub debug: bool,
    #[serde(default = "default_true")]
    pub normalize: bool,
    #[serde(default = "default_translate_function")]
    pub translate_function: String,
    #[serde(default = "default_import_source")]
    pub import_source: String,
    #[serde(default = "default_project_id_version")]
    pub project_id_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_level_key: Option<String>,
    #[serde(default = "default_indent_spaces")]
    pub indent_spaces: usize,
    /// PO/POT output: `true` requires it, `false` disables it, unset uses it
    /// when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<bool>,
    #[serde(default = "default_true")]
    pub fallback_to_source: bool,
}

fn default_source_root() -> String {
    "./".to_string()
}

fn default_includes() -> Vec<String> {
    vec!["src".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_locales_dir() -> String {
    "./locales".to_string()
}

fn default_source_locale() -> String {
    "en".to_string()
}

fn default_hash_length() -> usize {
    DEFAULT_HASH_LENGTH
}

fn default_translate_function() -> String {
    DEFAULT_TRANSLATE_FUNCTION.to_string()
}

fn default_import_source() -> String {
    DEFAULT_IMPORT_SOURCE.to_string()
}

fn default_project_id_version() -> String {
    DEFAULT_PROJECT_ID_VERSION.to_string()
}

fn default_indent_spaces() -> usize {
    DEFAULT_INDENT_SPACES
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_root: default_source_root(),
            includes: default_includes(),
            ignores: Vec::new(),
            ignore_test_files: true,
            out_dir: None,
            locales_dir: default_locales_dir(),
            source_locale: default_source_locale(),
            locales: Vec::new(),
            hash_length: default_hash_length(),
            arg_mode: ArgMode::default(),
            include_default_text: false,
            debug: false,
            normalize: true,
            translate_function: default_translate_function(),
            import_source: default_import_source(),
            project_id_version: default_project_id_version(),
            top_level_key: None,
            indent_spaces: default_indent_spaces(),
            catalog: None,
            fallback_to_source: true,
        }
    }
}

impl Config {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        // Patterns without wildcards are literal directory paths
        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        if self.hash_length > MAX_HASH_LENGTH {
            bail!(
                "'hashLength' must be at most {} (got {})",
                MAX_HASH_LENGTH,
                self.hash_length
            );
        }
        if !IDENTIFIER.is_match(&self.translate_function) {
            bail!(
                "'translateFunction' must be a JavaScript identifier (got \"{}\")",
                self.translate_function
            );
        }
        if self.import_source.trim().is_empty() {
            bail!("'importSource' must not be empty");
        }
        if self.source_locale.trim().is_empty() {
            bail!("'sourceLocale' must not be empty");
        }

        Ok(())
    }

    pub fn transform_options(&self, production: bool) -> TransformOptions {
        TransformOptions {
            hash_length: self.hash_length,
            arg_mode: self.arg_mode,
            include_default_text: self.include_default_text,
            debug: self.debug,
            production,
            normalize: self.normalize,
            translate_function: self.translate_function.clone(),
            import_source: self.import_source.clone(),
        }
    }

    pub fn serialize_options(&self) -> SerializeOptions {
        SerializeOptions {
            top_level_key: self.top_level_key.clone(),
            indent_spaces: self.indent_spaces,
            project_id_version: self.project_id_version.clone(),
        }
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
    /// Directory relative paths in the config are resolved against.
    pub base_dir: PathBuf,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            config.validate()?;
            let base_dir = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| start_dir.to_path_buf());
            Ok(ConfigLoadResult {
                config,
                from_file: true,
                base_dir,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
            base_dir: start_dir.to_path_buf(),
        }),
    }
}
