//! Flat JSON dictionaries (`id → text`).

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value, ser::PrettyFormatter};

use super::SerializeOptions;
use crate::core::store::CatalogStore;
use crate::error::{Error, Result};

/// Source dictionary of a build: every entry's id mapped to its source text.
pub fn store_dictionary(store: &CatalogStore) -> BTreeMap<String, String> {
    store
        .all()
        .map(|entry| (entry.id.to_string(), entry.source.to_string()))
        .collect()
}

/// Render a dictionary, nested under `top_level_key` when configured.
///
/// Keys are written in sorted order. `indent_spaces == 0` writes compact
/// JSON; otherwise pretty-printed with a trailing newline.
pub fn write_dictionary(
    dictionary: &BTreeMap<String, String>,
    options: &SerializeOptions,
) -> Result<Vec<u8>> {
    let flat: Map<String, Value> = dictionary
        .iter()
        .map(|(id, text)| (id.clone(), Value::String(text.clone())))
        .collect();

    let root = match options.top_level_key.as_deref() {
        Some(key) if !key.is_empty() => {
            let mut wrapper = Map::new();
            wrapper.insert(key.to_string(), Value::Object(flat));
            Value::Object(wrapper)
        }
        _ => Value::Object(flat),
    };

    if options.indent_spaces == 0 {
        return Ok(serde_json::to_vec(&root)?);
    }

    let indent = vec![b' '; options.indent_spaces];
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(&indent));
    root.serialize(&mut serializer)?;
    out.push(b'\n');
    Ok(out)
}

/// Read a flat dictionary written by [`write_dictionary`].
///
/// With `top_level_key` set, the entries are read from that member. Every
/// value must be a string.
pub fn parse_json_dictionary(
    bytes: &[u8],
    top_level_key: Option<&str>,
) -> Result<BTreeMap<String, String>> {
    let value: Value = serde_json::from_slice(bytes)?;
    let Value::Object(root) = value else {
        return Err(Error::InvalidDictionary(
            "root must be an object".to_string(),
        ));
    };

    let entries = match top_level_key.filter(|key| !key.is_empty()) {
        Some(key) => match root.get(key) {
            Some(Value::Object(inner)) => inner.clone(),
            Some(_) => {
                return Err(Error::InvalidDictionary(format!(
                    "\"{key}\" must be an object"
                )));
            }
            None => Map::new(),
        },
        None => root,
    };

    entries
        .into_iter()
        .map(|(id, value)| match value {
            Value::String(text) => Ok((id, text)),
            other => Err(Error::InvalidDictionary(format!(
                "value of \"{id}\" must be a string, found {other}"
            ))),
        })
        .collect()
}
