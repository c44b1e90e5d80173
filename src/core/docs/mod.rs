//! Documentation comments attached to message functions.
//!
//! - `comment`: structured JSDoc parser (context, params, opt-out)
//! - `metadata`: merges parsed docs with the function signature

pub mod comment;
pub mod metadata;

pub use comment::{DocComment, DocParam, DocTag};
pub use metadata::{MessageMetadata, SignatureParam, extract_metadata};

use swc_common::BytePos;

use crate::core::parsers::ExtractedComments;

/// JSDoc blocks attached at each position, in the order given.
///
/// Repeated positions are read once.
pub fn doc_comments_at(comments: &ExtractedComments, positions: &[BytePos]) -> Vec<DocComment> {
    let mut visited: Vec<BytePos> = Vec::with_capacity(positions.len());
    let mut docs = Vec::new();
    for &pos in positions {
        if visited.contains(&pos) {
            continue;
        }
        visited.push(pos);
        docs.extend(
            comments
                .leading_at(pos)
                .iter()
                .filter_map(DocComment::from_comment),
        );
    }
    docs
}
