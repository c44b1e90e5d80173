//! Persisted catalogs.
//!
//! - `json`: flat `id → text` dictionaries
//! - `po`: gettext PO/POT reading and writing (`polib`)
//! - `template`: POT template generated from a build's store
//! - `merge`: updates a translated catalog from a new template
//! - `compile`: per-locale runtime dictionaries
//!
//! PO support is compiled with the `catalog` feature (on by default). The
//! functions below are always present; without the feature the PO-based
//! ones return [`crate::Error::CatalogFormatUnavailable`].

use std::{collections::BTreeMap, path::Path};

use time::OffsetDateTime;

use crate::core::store::CatalogStore;
use crate::error::Result;
use crate::output::write_artifact;

#[cfg(feature = "catalog")]
pub mod compile;
pub mod json;
#[cfg(feature = "catalog")]
pub mod merge;
#[cfg(feature = "catalog")]
pub mod po;
#[cfg(feature = "catalog")]
pub mod template;

pub use json::parse_json_dictionary;

pub const DEFAULT_PROJECT_ID_VERSION: &str = "PACKAGE VERSION";
pub const DEFAULT_INDENT_SPACES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    /// Flat `id → text` JSON.
    Json,
    /// gettext POT template.
    Catalog,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Nest the JSON dictionary under this key.
    pub top_level_key: Option<String>,
    /// JSON indentation; `0` writes compact JSON.
    pub indent_spaces: usize,
    /// `Project-Id-Version` of generated templates.
    pub project_id_version: String,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            top_level_key: None,
            indent_spaces: DEFAULT_INDENT_SPACES,
            project_id_version: DEFAULT_PROJECT_ID_VERSION.to_string(),
        }
    }
}

/// Whether PO/POT support was compiled in.
pub const fn catalog_supported() -> bool {
    cfg!(feature = "catalog")
}

/// Serialize the store in `format` to `path`.
pub fn serialize(
    store: &CatalogStore,
    format: CatalogFormat,
    options: &SerializeOptions,
    path: &Path,
) -> Result<()> {
    match format {
        CatalogFormat::Json => write_json_dictionary(&json::store_dictionary(store), options, path),
        CatalogFormat::Catalog => serialize_template(store, options, path),
    }
}

/// Write a dictionary (e.g. from [`compile_dictionary`]) as JSON.
pub fn write_json_dictionary(
    dictionary: &BTreeMap<String, String>,
    options: &SerializeOptions,
    path: &Path,
) -> Result<()> {
    write_artifact(
        "dictionary",
        path,
        &json::write_dictionary(dictionary, options)?,
    )
}

#[cfg(feature = "catalog")]
fn serialize_template(store: &CatalogStore, options: &SerializeOptions, path: &Path) -> Result<()> {
    po::write_catalog(
        "template",
        &template::template_catalog(store, options),
        path,
    )
}

#[cfg(not(feature = "catalog"))]
fn serialize_template(
    _store: &CatalogStore,
    _options: &SerializeOptions,
    _path: &Path,
) -> Result<()> {
    Err(crate::error::Error::CatalogFormatUnavailable)
}

/// Merge the catalog at `old` with the template at `new` into `output`.
///
/// See [`merge::merge`] for the rules.
#[cfg(feature = "catalog")]
pub fn merge_catalogs(
    old: &Path,
    new: &Path,
    output: &Path,
    revised_at: OffsetDateTime,
) -> Result<()> {
    let merged = merge::merge(&po::read_catalog(old)?, &po::read_catalog(new)?, revised_at)?;
    po::write_catalog("catalog", &merged, output)
}

#[cfg(not(feature = "catalog"))]
pub fn merge_catalogs(
    _old: &Path,
    _new: &Path,
    _output: &Path,
    _revised_at: OffsetDateTime,
) -> Result<()> {
    Err(crate::error::Error::CatalogFormatUnavailable)
}

/// Start a locale catalog at `output`: the template with its `Language` set.
#[cfg(feature = "catalog")]
pub fn init_catalog(template: &Path, locale: &str, output: &Path) -> Result<()> {
    let mut catalog = po::read_catalog(template)?;
    catalog.metadata.language = locale.to_string();
    po::write_catalog("catalog", &catalog, output)
}

#[cfg(not(feature = "catalog"))]
pub fn init_catalog(_template: &Path, _locale: &str, _output: &Path) -> Result<()> {
    Err(crate::error::Error::CatalogFormatUnavailable)
}

/// Per-locale runtime dictionary from the translated catalog at `catalog`.
#[cfg(feature = "catalog")]
pub fn compile_dictionary(
    store: &CatalogStore,
    catalog: &Path,
    fallback_to_source: bool,
) -> Result<BTreeMap<String, String>> {
    let catalog = po::read_catalog(catalog)?;
    Ok(compile::compile(store, &catalog, fallback_to_source))
}

#[cfg(not(feature = "catalog"))]
pub fn compile_dictionary(
    _store: &CatalogStore,
    _catalog: &Path,
    _fallback_to_source: bool,
) -> Result<BTreeMap<String, String>> {
    Err(crate::error::Error::CatalogFormatUnavailable)
}
