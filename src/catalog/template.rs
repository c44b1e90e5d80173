use std::collections::HashSet;

use polib::{catalog::Catalog, message::Message, metadata::CatalogMetadata};

use super::SerializeOptions;
use crate::core::store::{CatalogStore, MessageEntry};

pub const CONTENT_TYPE: &str = "text/plain; charset=UTF-8";

/// Header of a freshly generated template.
pub fn template_metadata(project_id_version: &str) -> CatalogMetadata {
    let mut metadata = CatalogMetadata::new();
    metadata.project_id_version = project_id_version.to_string();
    metadata.mime_version = "1.0".to_string();
    metadata.content_type = CONTENT_TYPE.to_string();
    metadata.content_transfer_encoding = "8bit".to_string();
    metadata.language = String::new();
    metadata
}

/// Translator notes of an entry: descriptions, then one line per parameter.
fn extracted_comments(entry: &MessageEntry) -> Vec<String> {
    let mut comments = entry.comments.clone();
    for (index, param) in entry.parameters.iter().flatten().enumerate() {
        let mut line = format!("{index} {}: {}", param.name, param.ty);
        if let Some(description) = &param.description {
            line.push_str(" - ");
            line.push_str(description);
        }
        comments.push(line);
    }
    comments
}

fn template_message(entry: &MessageEntry) -> Message {
    let references: Vec<String> = entry.refs.iter().map(ToString::to_string).collect();
    let mut builder = Message::build_singular();
    builder
        .with_comments(extracted_comments(entry).join("\n"))
        .with_source(references.join("\n"))
        .with_msgid(entry.source.to_string())
        .with_msgstr(String::new());
    if let Some(context) = &entry.context {
        builder.with_msgctxt(context.to_string());
    }
    builder.done()
}

/// Build the POT template for everything in `store`, in id order.
pub fn template_catalog(store: &CatalogStore, options: &SerializeOptions) -> Catalog {
    let mut catalog = Catalog::new(template_metadata(&options.project_id_version));
    let mut seen = HashSet::new();
    for entry in store
        .all()
        .filter(|entry| seen.insert((entry.context.clone(), entry.source.clone())))
    {
        catalog.append_or_update(template_message(entry));
    }
    catalog
}
