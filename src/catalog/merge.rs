//! Catalog update: bring a translated catalog in line with a new template.

use std::collections::{HashMap, HashSet, hash_map::Entry};

use polib::{catalog::Catalog, message::MessageView, metadata::CatalogMetadata};
use time::OffsetDateTime;
use time::macros::format_description;

use super::po::{MessageKey, RecordParts, is_obsolete, message_key, rebuild, with_obsolete};
use crate::error::Result;

/// `PO-Revision-Date` format, e.g. `2026-10-19 14:05+0000`.
pub fn format_revision_date(at: OffsetDateTime) -> Result<String> {
    let format = format_description!(
        "[year]-[month]-[day] [hour]:[minute][offset_hour sign:mandatory][offset_minute]"
    );
    Ok(at.format(&format)?)
}

/// Field-wise copy; polib 0.2 does not implement `Clone` for metadata.
fn clone_metadata(m: &CatalogMetadata) -> CatalogMetadata {
    let mut copy = CatalogMetadata {
        project_id_version: m.project_id_version.clone(),
        pot_creation_date: m.pot_creation_date.clone(),
        po_revision_date: m.po_revision_date.clone(),
        last_translator: m.last_translator.clone(),
        language_team: m.language_team.clone(),
        mime_version: m.mime_version.clone(),
        content_type: m.content_type.clone(),
        content_transfer_encoding: m.content_transfer_encoding.clone(),
        language: m.language.clone(),
        ..CatalogMetadata::default()
    };
    copy.plural_rules.nplurals = m.plural_rules.nplurals;
    copy.plural_rules.expr = m.plural_rules.expr.clone();
    copy
}

fn prefer_new(new: &str, old: &str) -> String {
    if new.is_empty() { old } else { new }.to_string()
}

/// Old records by key. An active record wins over an obsolete one with the
/// same key; otherwise the first one wins.
pub fn index_records<'a>(
    records: impl IntoIterator<Item = &'a dyn MessageView>,
) -> HashMap<MessageKey<'a>, &'a dyn MessageView> {
    let mut index: HashMap<MessageKey<'a>, &'a dyn MessageView> = HashMap::new();
    for record in records {
        match index.entry(message_key(record)) {
            Entry::Occupied(mut slot) => {
                if is_obsolete(*slot.get()) && !is_obsolete(record) {
                    slot.insert(record);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
        }
    }
    index
}

/// Merge `old` (translated) with `new` (template).
///
/// - records in both keep the old translation and flags; comments and
///   references come from `new` when it has them
/// - records only in `new` are added untranslated
/// - records only in `old` are kept and flagged obsolete
///
/// The result lists `new`'s records in template order, then the obsolete
/// ones in their old order. The header is `old`'s with `PO-Revision-Date`
/// set to `revised_at` and `Content-Type` taken from `new`.
pub fn merge(old: &Catalog, new: &Catalog, revised_at: OffsetDateTime) -> Result<Catalog> {
    let mut metadata = clone_metadata(&old.metadata);
    metadata.po_revision_date = format_revision_date(revised_at)?;
    if !new.metadata.content_type.is_empty() {
        metadata.content_type = new.metadata.content_type.clone();
    }
    let mut merged = Catalog::new(metadata);

    let old_index = index_records(old.messages());
    let mut current: HashSet<MessageKey<'_>> = HashSet::new();
    for fresh in new.messages() {
        let key = message_key(fresh);
        if is_obsolete(fresh) || !current.insert(key) {
            continue;
        }
        let parts = match old_index.get(&key) {
            Some(existing) => RecordParts {
                comments: prefer_new(fresh.comments(), existing.comments()),
                source: prefer_new(fresh.source(), existing.source()),
                flags: with_obsolete(existing.flags(), false),
                msgstr: existing.msgstr().ok().map(str::to_string),
                msgstr_plural: existing.msgstr_plural().ok().cloned(),
            },
            None => RecordParts {
                comments: fresh.comments().to_string(),
                source: fresh.source().to_string(),
                flags: with_obsolete(fresh.flags(), false),
                msgstr: None,
                msgstr_plural: None,
            },
        };
        merged.append_or_update(rebuild(fresh, parts));
    }

    for stale in old.messages() {
        let key = message_key(stale);
        if current.contains(&key) {
            continue;
        }
        // Only the record the index chose for this key survives
        let Some(chosen) = old_index.get(&key) else {
            continue;
        };
        if !std::ptr::addr_eq(*chosen, stale) {
            continue;
        }
        merged.append_or_update(rebuild(
            stale,
            RecordParts {
                comments: stale.comments().to_string(),
                source: stale.source().to_string(),
                flags: with_obsolete(stale.flags(), true),
                msgstr: stale.msgstr().ok().map(str::to_string),
                msgstr_plural: stale.msgstr_plural().ok().cloned(),
            },
        ));
    }

    Ok(merged)
}
