//! Source file parsing (swc, TypeScript syntax).

pub mod source;

pub use source::{ExtractedComments, ParsedSource, parse_source};
