//! Build-scoped catalog accumulator.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    sync::Arc,
};

/// Where a message was found in source.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceRef {
    /// Path relative to the source root, forward slashes.
    pub file_path: String,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub col: usize,
}

impl SourceRef {
    pub fn new(file_path: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            col,
        }
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file_path, self.line, self.col)
    }
}

/// One parameter of a message function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterMeta {
    pub name: String,
    /// Declared type as written in source (`any` when undeclared).
    pub ty: String,
    pub description: Option<String>,
}

impl ParameterMeta {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// One catalog row, keyed by its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEntry {
    pub id: Arc<str>,
    pub source: Arc<str>,
    pub context: Option<Arc<str>>,
    pub refs: BTreeSet<SourceRef>,
    /// Translator notes, deduplicated, in first-seen order.
    pub comments: Vec<String>,
    /// Parameters of the most recent occurrence.
    pub parameters: Option<Vec<ParameterMeta>>,
}

/// Everything observed about one message occurrence.
#[derive(Debug, Clone)]
pub struct Observation {
    pub source: Arc<str>,
    pub context: Option<Arc<str>>,
    pub source_ref: SourceRef,
    pub comments: Vec<String>,
    pub parameters: Option<Vec<ParameterMeta>>,
}

/// Message entries of one build, ordered by id.
#[derive(Debug, Default)]
pub struct CatalogStore {
    entries: BTreeMap<Arc<str>, MessageEntry>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an occurrence under `id`.
    ///
    /// A new id creates an entry. A known id unions refs and comments and
    /// overwrites source, context and parameters with the latest values.
    pub fn add(&mut self, id: Arc<str>, observation: Observation) {
        let Observation {
            source,
            context,
            source_ref,
            comments,
            parameters,
        } = observation;

        let entry = self
            .entries
            .entry(Arc::clone(&id))
            .or_insert_with(|| MessageEntry {
                id,
                source: Arc::clone(&source),
                context: context.clone(),
                refs: BTreeSet::new(),
                comments: Vec::new(),
                parameters: None,
            });

        entry.source = source;
        entry.context = context;
        entry.refs.insert(source_ref);
        for comment in comments {
            if !entry.comments.contains(&comment) {
                entry.comments.push(comment);
            }
        }
        entry.parameters = parameters;
    }

    /// All entries, sorted by id.
    pub fn all(&self) -> impl Iterator<Item = &MessageEntry> {
        self.entries.values()
    }

    pub fn get(&self, id: &str) -> Option<&MessageEntry> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
