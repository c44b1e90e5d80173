//! Extraction engine.
//!
//! Files flow through `parsers` (swc AST), `scan` (detect, record, rewrite)
//! and end up in the `store`, keyed by ids from `key`.
//!
//! ## Module Structure
//!
//! - `context`: per-build state (`BuildContext`) and the `MessageRecorder` seam
//! - `docs`: JSDoc metadata (context, parameters, opt-out)
//! - `file_scanner`: source file discovery
//! - `intern`: string pool shared by keys and catalog entries
//! - `key`: content-addressed key derivation with collision handling
//! - `options`: transform options
//! - `parsers`: swc parsing
//! - `scan`: message detection and rewriting
//! - `store`: the in-memory message catalog

pub mod context;
pub mod docs;
pub mod file_scanner;
pub mod intern;
pub mod key;
pub mod options;
pub mod parsers;
pub mod scan;
pub mod store;

pub use context::{BuildContext, MessageRecorder, RecordedMessage};
pub use options::{ArgMode, TransformOptions};
pub use scan::{TransformOutput, transform};
pub use store::{CatalogStore, MessageEntry, ParameterMeta, SourceRef};
