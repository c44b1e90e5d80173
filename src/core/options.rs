use std::fmt;

use serde::{Deserialize, Serialize};

use super::key::DEFAULT_HASH_LENGTH;

pub const DEFAULT_TRANSLATE_FUNCTION: &str = "translate";
pub const DEFAULT_IMPORT_SOURCE: &str = "@msgkey/runtime";

/// How runtime arguments are passed to the translate function.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgMode {
    /// `{ name, count }`
    #[default]
    Named,
    /// `{ "0": name, "1": count }`
    Indexed,
}

impl fmt::Display for ArgMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgMode::Named => write!(f, "named"),
            ArgMode::Indexed => write!(f, "indexed"),
        }
    }
}

/// Options for key derivation and call-site rewriting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOptions {
    /// Key length in hex digits; clamped to `4..=40`.
    pub hash_length: usize,
    pub arg_mode: ArgMode,
    /// Pass the original text as `defaultValue`.
    pub include_default_text: bool,
    /// Wrap rewritten calls in a visible marker. Ignored when `production` is set.
    pub debug: bool,
    pub production: bool,
    /// Normalize whitespace and placeholder padding before hashing.
    pub normalize: bool,
    pub translate_function: String,
    pub import_source: String,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            hash_length: DEFAULT_HASH_LENGTH,
            arg_mode: ArgMode::Named,
            include_default_text: false,
            debug: false,
            production: false,
            normalize: true,
            translate_function: DEFAULT_TRANSLATE_FUNCTION.to_string(),
            import_source: DEFAULT_IMPORT_SOURCE.to_string(),
        }
    }
}

impl TransformOptions {
    /// Debug markers are never emitted in production builds.
    pub fn debug_enabled(&self) -> bool {
        self.debug && !self.production
    }
}
