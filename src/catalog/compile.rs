use std::collections::{BTreeMap, HashMap};

use polib::catalog::Catalog;

use super::po::{MessageKey, is_obsolete, message_key, translation};
use crate::core::store::CatalogStore;

/// Runtime dictionary for one locale: `id → translated text`.
///
/// Store entries are matched with catalog records by `(context, source)`.
/// Obsolete, fuzzy, plural and untranslated records do not count as
/// translations; those ids map to the source text when `fallback_to_source`
/// is set and are left out otherwise.
pub fn compile(
    store: &CatalogStore,
    catalog: &Catalog,
    fallback_to_source: bool,
) -> BTreeMap<String, String> {
    let translations: HashMap<MessageKey<'_>, &str> = catalog
        .messages()
        .filter(|record| !is_obsolete(*record) && !record.flags().is_fuzzy())
        .filter_map(|record| Some((message_key(record), translation(record)?)))
        .collect();

    let mut dictionary = BTreeMap::new();
    for entry in store.all() {
        match translations.get(&(entry.context.as_deref(), &*entry.source)) {
            Some(text) => {
                dictionary.insert(entry.id.to_string(), text.to_string());
            }
            None if fallback_to_source => {
                dictionary.insert(entry.id.to_string(), entry.source.to_string());
            }
            None => {}
        }
    }
    dictionary
}
