//! Shared data models for the shopfront bridge.
//!
//! These are the types that cross module boundaries: content items and
//! their identities, commerce entities with their category and attribute
//! data, taxonomy terms in both raw-record and domain-wrapper form, the
//! read-only cart snapshot, and the ordered [`PostCollection`] that the
//! cursor iterates.
//!
//! Raw collaborator data is classified exactly once, at the boundary where
//! it enters the bridge: a [`ContentItem`] carries its [`ContentKind`] tag
//! and a [`TermRecord`] is distinct from the [`Term`] wrapper handed to
//! templates. Internal logic matches on these tags and never re-inspects
//! shapes.
//!
//! Everything reachable from a render context derives [`serde::Serialize`]
//! so a template host can feed the merged context straight into an engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque identity of a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(pub u64);

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identity of a taxonomy term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermId(pub u64);

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Content type tag, resolved once when raw data enters the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// A purchasable product page.
    Product,
    /// An ordinary page.
    Page,
    /// Any other registered content type.
    #[serde(untagged)]
    Other(String),
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Product => write!(f, "product"),
            Self::Page => write!(f, "page"),
            Self::Other(tag) => write!(f, "{tag}"),
        }
    }
}

/// An individually addressable piece of display content.
///
/// Immutable once loaded; the request lifecycle owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Identity of the item.
    pub id: ContentId,
    /// Content type tag.
    pub kind: ContentKind,
    /// URL slug.
    pub slug: String,
    /// Display name.
    pub title: String,
}

impl ContentItem {
    /// Whether the item's type tag marks it as a product.
    pub fn is_product(&self) -> bool {
        self.kind == ContentKind::Product
    }
}

/// A single commerce attribute on an entity.
///
/// Attributes are either backed by a taxonomy (their values are terms,
/// resolved through the commerce collaborator) or carry a plain option
/// list inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductAttribute {
    /// Taxonomy-backed attribute; `taxonomy` is the full attribute name
    /// (e.g. `pa_color`).
    Taxonomy {
        /// Taxonomy the attribute's terms live in.
        taxonomy: String,
    },
    /// Plain attribute with an inline option list.
    Options(Vec<String>),
}

/// The commerce plugin's representation of a purchasable product.
///
/// Associated one-to-one with a [`ContentItem`] whose kind is
/// [`ContentKind::Product`]; the association may be absent, in which case
/// commerce-derived accessors degrade to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommerceEntity {
    /// Identity of the backing content item.
    pub id: ContentId,
    /// Assigned category term ids, in storage order.
    pub category_ids: Vec<TermId>,
    /// Attribute map, keyed by full attribute name (e.g. `pa_color`).
    #[serde(default)]
    pub attributes: BTreeMap<String, ProductAttribute>,
}

/// A raw taxonomy term record as returned by the collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermRecord {
    /// Identity of the term.
    pub id: TermId,
    /// Taxonomy the term belongs to.
    pub taxonomy: String,
    /// URL slug.
    pub slug: String,
    /// Display name.
    pub name: String,
}

/// A taxonomy classification value in the form templates consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    /// Identity of the term.
    pub id: TermId,
    /// Taxonomy the term belongs to.
    pub taxonomy: String,
    /// URL slug.
    pub slug: String,
    /// Display name.
    pub name: String,
}

impl Term {
    /// Wrap a raw term record.
    pub fn from_record(record: TermRecord) -> Self {
        Self {
            id: record.id,
            taxonomy: record.taxonomy,
            slug: record.slug,
            name: record.name,
        }
    }
}

impl From<TermRecord> for Term {
    fn from(record: TermRecord) -> Self {
        Self::from_record(record)
    }
}

/// Read-only snapshot of the cart state.
///
/// Passed through to render contexts untouched; the bridge never mutates
/// or interprets it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartRef {
    /// Number of items currently in the cart.
    pub item_count: u32,
    /// Formatted cart total.
    pub total: String,
}

/// An ordered collection of content items.
///
/// The collection owns its items; iteration with lifecycle side effects
/// goes through [`PostCollection::cursor`], which only borrows them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostCollection {
    items: Vec<ContentItem>,
}

impl PostCollection {
    /// Create a collection from an ordered item list.
    pub fn new(items: Vec<ContentItem>) -> Self {
        Self { items }
    }

    /// Items in order.
    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    /// Item identities in order.
    pub fn ids(&self) -> Vec<ContentId> {
        self.items.iter().map(|item| item.id).collect()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Cursor over the collection that drives setup/teardown side effects
    /// through `session` as it advances.
    pub fn cursor<'a>(&'a self, session: &'a crate::session::Session) -> crate::cursor::PostsCursor<'a> {
        crate::cursor::PostsCursor::new(session, &self.items)
    }
}

impl FromIterator<ContentItem> for PostCollection {
    fn from_iter<I: IntoIterator<Item = ContentItem>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
