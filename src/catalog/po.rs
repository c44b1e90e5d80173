//! gettext PO/POT files on top of `polib`.
//!
//! Records are matched on `(msgctxt, msgid)`. A record whose message left
//! the source is kept with the `obsolete` flag instead of being dropped.

use std::path::Path;

use polib::{
    catalog::Catalog,
    message::{Message, MessageFlags, MessageView},
    po_file,
};

use crate::error::{Error, Result};
use crate::output::{ensure_parent, write_error};

/// Flag carried by records whose message no longer appears in source.
pub const OBSOLETE_FLAG: &str = "obsolete";

/// `(msgctxt, msgid)`; an empty `msgctxt` means no context.
pub type MessageKey<'a> = (Option<&'a str>, &'a str);

pub fn message_key(message: &dyn MessageView) -> MessageKey<'_> {
    let context = message.msgctxt();
    ((!context.is_empty()).then_some(context), message.msgid())
}

pub fn is_obsolete(message: &dyn MessageView) -> bool {
    message.flags().contains(OBSOLETE_FLAG)
}

/// Non-empty translation of a singular record.
pub fn translation(message: &dyn MessageView) -> Option<&str> {
    message.msgstr().ok().filter(|text| !text.is_empty())
}

/// Copy of `flags` with `obsolete` set or cleared.
pub fn with_obsolete(flags: &MessageFlags, obsolete: bool) -> MessageFlags {
    let mut flags = flags.clone();
    if obsolete {
        if !flags.contains(OBSOLETE_FLAG) {
            flags.add_flag(OBSOLETE_FLAG);
        }
    } else {
        flags.remove_flag(OBSOLETE_FLAG);
    }
    flags
}

/// Parts of a record the merge decides on; identity and plural shape come
/// from the message being copied.
pub struct RecordParts {
    pub comments: String,
    pub source: String,
    pub flags: MessageFlags,
    pub msgstr: Option<String>,
    pub msgstr_plural: Option<Vec<String>>,
}

/// Build a record with `message`'s identity and the given parts.
pub fn rebuild(message: &dyn MessageView, parts: RecordParts) -> Message {
    let mut builder = if message.is_plural() {
        Message::build_plural()
    } else {
        Message::build_singular()
    };
    builder
        .with_comments(parts.comments)
        .with_source(parts.source)
        .with_flags(parts.flags)
        .with_msgctxt(message.msgctxt().to_string())
        .with_msgid(message.msgid().to_string());
    if message.is_plural() {
        let plural = message.msgid_plural().unwrap_or_default().to_string();
        builder.with_msgid_plural(plural).with_msgstr_plural(
            parts
                .msgstr_plural
                .unwrap_or_else(|| vec![String::new(); 2]),
        );
    } else {
        builder.with_msgstr(parts.msgstr.unwrap_or_default());
    }
    builder.done()
}

/// Read a PO or POT file.
pub fn read_catalog(path: &Path) -> Result<Catalog> {
    po_file::parse(path).map_err(|err| Error::corrupt_catalog(path, err.to_string()))
}

/// Write a PO or POT file, creating parent directories on demand.
pub fn write_catalog(artifact: &str, catalog: &Catalog, path: &Path) -> Result<()> {
    ensure_parent(path)
        .and_then(|()| po_file::write(catalog, path))
        .map_err(|source| write_error(artifact, path, source))?;
    tracing::debug!(artifact, path = %path.display(), "wrote");
    Ok(())
}
