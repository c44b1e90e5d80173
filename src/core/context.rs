//! Build-scoped state.
//!
//! A [`BuildContext`] is created at the start of a build and owns the string
//! pool, the key deriver and the catalog store. The scanner never touches it
//! directly; it goes through the [`MessageRecorder`] seam, so a traversal is
//! pure apart from that one call.

use std::sync::{Arc, Mutex, PoisonError};

use super::{
    intern::StringPool,
    key::{KeyDeriver, normalize_text},
    options::TransformOptions,
    store::{CatalogStore, Observation, ParameterMeta, SourceRef},
};
use crate::error::Result;

/// A matched message, as handed from the scanner to the recorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedMessage {
    /// Literal text, verbatim.
    pub text: String,
    pub context: Option<String>,
    pub source_ref: SourceRef,
    pub notes: Vec<String>,
    pub parameters: Vec<ParameterMeta>,
}

/// Receives matched messages and assigns their keys.
pub trait MessageRecorder {
    fn record(&mut self, message: RecordedMessage) -> Result<Arc<str>>;
}

#[derive(Debug)]
pub struct BuildContext {
    pool: StringPool,
    deriver: KeyDeriver,
    store: CatalogStore,
    normalize: bool,
}

impl BuildContext {
    pub fn new(options: &TransformOptions) -> Self {
        Self {
            pool: StringPool::new(),
            deriver: KeyDeriver::new(options.hash_length),
            store: CatalogStore::new(),
            normalize: options.normalize,
        }
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn into_store(self) -> CatalogStore {
        self.store
    }

    /// Reset all build-scoped state for a new build.
    pub fn clear(&mut self) {
        self.pool.clear();
        self.deriver.clear();
        self.store.clear();
    }
}

impl MessageRecorder for BuildContext {
    fn record(&mut self, message: RecordedMessage) -> Result<Arc<str>> {
        let RecordedMessage {
            text,
            context,
            source_ref,
            notes,
            parameters,
        } = message;

        let source = self.pool.intern(&text);
        let hashed = if self.normalize {
            self.pool.intern(&normalize_text(&text))
        } else {
            Arc::clone(&source)
        };
        let context = context.as_deref().map(|c| self.pool.intern(c));

        let id = self.deriver.derive(hashed, context.clone())?;
        tracing::debug!(id = %id, at = %source_ref, "recorded message");

        self.store.add(
            Arc::clone(&id),
            Observation {
                source,
                context,
                source_ref,
                comments: notes,
                parameters: Some(parameters),
            },
        );
        Ok(id)
    }
}

/// Serializes recording when files are transformed from several threads.
impl MessageRecorder for &Mutex<BuildContext> {
    fn record(&mut self, message: RecordedMessage) -> Result<Arc<str>> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(message)
    }
}
