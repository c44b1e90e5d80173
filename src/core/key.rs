//! Deterministic message keys.
//!
//! A key is a lowercase hex prefix of the SHA-1 digest of the message text,
//! with the optional context folded into the digest input after a `0x04`
//! separator byte. Short-hash collisions inside one build are resolved by
//! chaining: the colliding candidate is appended to the digest input and the
//! key grows by one hex digit until a free slot is found.

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, LazyLock},
};

use regex::Regex;
use sha1::{Digest, Sha1};

use crate::error::{Error, Result};

/// Shortest key ever produced, regardless of configuration.
pub const MIN_HASH_LENGTH: usize = 4;

/// Hex length of a full SHA-1 digest; collision chaining stops here.
pub const MAX_HASH_LENGTH: usize = 40;

pub const DEFAULT_HASH_LENGTH: usize = 10;

/// Separator between text and context in the digest input (gettext's EOT).
const CONTEXT_SEPARATOR: u8 = 0x04;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static DOUBLE_BRACE_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([^{}]*?)\s*\}\}").unwrap());
static SINGLE_BRACE_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\s*([^{}]*?)\s*\}").unwrap());

pub fn clamp_hash_length(length: usize) -> usize {
    length.clamp(MIN_HASH_LENGTH, MAX_HASH_LENGTH)
}

/// Compute the key for `text`/`context` with no collision state.
///
/// A shorter `length` always yields a prefix of a longer one.
///
/// ```
/// use msgkey::core::key::hash_key;
///
/// assert_eq!(hash_key("Hello, World!", None, 10), "0a0a9f2a67");
/// assert!(hash_key("Save", None, 15).starts_with(&hash_key("Save", None, 6)));
/// ```
pub fn hash_key(text: &str, context: Option<&str>, length: usize) -> String {
    salted_hash(text, context, "", length)
}

fn salted_hash(text: &str, context: Option<&str>, salt: &str, length: usize) -> String {
    let mut hasher = Sha1::new();
    hasher.update(text.as_bytes());
    if let Some(context) = context {
        hasher.update([CONTEXT_SEPARATOR]);
        hasher.update(context.as_bytes());
    }
    hasher.update(salt.as_bytes());
    let mut digest = format!("{:x}", hasher.finalize());
    digest.truncate(clamp_hash_length(length));
    digest
}

/// Normalize message text so cosmetic source edits keep the same key.
///
/// Line endings are unified, whitespace runs collapse to one space, the
/// result is trimmed, and placeholder braces lose their inner padding
/// (`{{ name }}` becomes `{{name}}`).
pub fn normalize_text(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    let collapsed = WHITESPACE_RUN.replace_all(&unified, " ");
    let tightened = DOUBLE_BRACE_PLACEHOLDER.replace_all(collapsed.trim(), "{{${1}}}");
    SINGLE_BRACE_PLACEHOLDER
        .replace_all(&tightened, "{${1}}")
        .into_owned()
}

/// Lookup key for the collision maps. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeKey {
    pub text: Arc<str>,
    pub context: Option<Arc<str>>,
}

impl CompositeKey {
    pub fn new(text: Arc<str>, context: Option<Arc<str>>) -> Self {
        Self { text, context }
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(context) => write!(f, "{}::{}", self.text, context),
            None => write!(f, "{}", self.text),
        }
    }
}

/// Assigns keys for one build and remembers them.
#[derive(Debug)]
pub struct KeyDeriver {
    hash_length: usize,
    /// id → composite key that owns it
    seen: HashMap<Arc<str>, CompositeKey>,
    /// composite key → id
    reverse: HashMap<CompositeKey, Arc<str>>,
}

impl KeyDeriver {
    pub fn new(hash_length: usize) -> Self {
        Self {
            hash_length: clamp_hash_length(hash_length),
            seen: HashMap::new(),
            reverse: HashMap::new(),
        }
    }

    pub fn hash_length(&self) -> usize {
        self.hash_length
    }

    /// Key for `text` (already normalized if normalization is on) and `context`.
    ///
    /// Repeated calls with the same pair return the same key. Distinct pairs
    /// never share a key; the second pair to land on a taken key is chained
    /// to a longer one.
    ///
    /// # Errors
    /// [`Error::CollisionExhausted`] if no free key exists up to
    /// [`MAX_HASH_LENGTH`] digits.
    pub fn derive(&mut self, text: Arc<str>, context: Option<Arc<str>>) -> Result<Arc<str>> {
        let key = CompositeKey::new(text, context);
        if let Some(id) = self.reverse.get(&key) {
            return Ok(Arc::clone(id));
        }

        let mut length = self.hash_length;
        let mut salt = String::new();
        let mut candidate = salted_hash(&key.text, key.context.as_deref(), &salt, length);

        while self
            .seen
            .get(candidate.as_str())
            .is_some_and(|owner| *owner != key)
        {
            if length >= MAX_HASH_LENGTH {
                return Err(Error::CollisionExhausted {
                    key: key.to_string(),
                    max_length: MAX_HASH_LENGTH,
                });
            }
            tracing::debug!(key = %key, candidate = %candidate, "key collision, chaining");
            salt.push_str(&candidate);
            length += 1;
            candidate = salted_hash(&key.text, key.context.as_deref(), &salt, length);
        }

        let id: Arc<str> = Arc::from(candidate);
        self.seen.insert(Arc::clone(&id), key.clone());
        self.reverse.insert(key, Arc::clone(&id));
        Ok(id)
    }

    /// Number of distinct composite keys seen.
    pub fn len(&self) -> usize {
        self.reverse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reverse.is_empty()
    }

    pub fn clear(&mut self) {
        self.seen.clear();
        self.reverse.clear();
    }
}
