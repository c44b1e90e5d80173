//! msgkey - content-addressed message extraction for TypeScript
//!
//! msgkey finds message functions in TypeScript sources (functions whose
//! body is a single string literal), derives a stable short id for each
//! message from its text and context, rewrites the function to call the
//! runtime `translate` helper, and writes translation catalogs.
//!
//! ## Module Structure
//!
//! - `core`: key derivation, string pool, message store and the source transform
//! - `catalog`: JSON dictionaries, PO/POT catalogs, merging and compilation
//! - `config`: `.msgkeyrc.json` loading and validation
//! - `cli`: command-line interface layer
//! - `error`: library error type
//! - `output`: artifact writing

pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod output;

pub use error::{Error, Result};
