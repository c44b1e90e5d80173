//! Message detection and call-site rewriting.
//!
//! - `classifier`: finds message functions in a parsed module
//! - `rewrite`: builds the text edits (calls and runtime import)
//! - `transform`: per-file driver that records messages and applies edits

pub mod classifier;
pub mod rewrite;
pub mod transform;

pub use classifier::{ClassifyResult, MessageCandidate, MessageClassifier};
pub use transform::{TransformOutput, transform, transform_parsed};
