//! Render context types.
//!
//! A [`RequestContext`] is the string-keyed value map a render call sees.
//! The session builds one base context per request (memoized) and derives
//! a fresh merged copy per render call; merges never touch the memoized
//! base. Keys collide by precedence: call-specific entity data wins over
//! the memoized base, which wins over extensibility-hook defaults. The
//! precedence is enforced purely by merge order, with no priority
//! bookkeeping.
//!
//! [`ContextValue`] is the tagged value type. It serializes untagged so a
//! template engine sees natural shapes (a post is an object, an id is a
//! number, a collection is an array).

pub mod convert;

pub use convert::{ArgValue, TemplateArgs, convert_args};

use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{CartRef, CommerceEntity, ContentId, PostCollection, Term};
use crate::product::ProductPost;

/// A value stored in a render context.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContextValue {
    /// An adapted content item.
    Post(ProductPost),
    /// A commerce entity.
    Product(CommerceEntity),
    /// A taxonomy term wrapper.
    Term(Term),
    /// An ordered collection of content items.
    Posts(PostCollection),
    /// The cart snapshot.
    Cart(CartRef),
    /// A bare content identity.
    Id(ContentId),
    /// Plain text.
    Text(String),
    /// A nested namespace of converted values.
    Args(BTreeMap<String, ContextValue>),
    /// Any other scalar or structured argument.
    Json(serde_json::Value),
}

/// String-keyed value map handed to render calls.
///
/// Iteration and serialization order is the key order, which keeps
/// rendered output deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RequestContext {
    entries: BTreeMap<String, ContextValue>,
}

impl RequestContext {
    /// An empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any existing value under `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: ContextValue) {
        self.entries.insert(key.into(), value);
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.entries.get(key)
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Merge `other` into `self`; keys from `other` win collisions.
    pub fn merge(&mut self, other: BTreeMap<String, ContextValue>) {
        self.entries.extend(other);
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContextValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the context is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, ContextValue)> for RequestContext {
    fn from_iter<I: IntoIterator<Item = (String, ContextValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
