//! Product adapters: content items joined with their commerce entity.
//!
//! A [`ProductPost`] owns exactly one [`ContentItem`] and at most one
//! [`CommerceEntity`]. Building one resolves the entity through the
//! commerce collaborator (for product-kind items) and passes the result
//! through the `product` filter chain, so themes can substitute the
//! entity before it is stored.
//!
//! Commerce-derived accessors never fail: a missing association, an empty
//! category list, or an unknown attribute slug all come back as `None`. A
//! taxonomy attribute that resolves to zero terms is `Some` of an empty
//! sequence - the attribute exists, it just has no values.
//!
//! Which adapter a content kind gets is decided by the
//! [`AdapterRegistry`], resolved once per item at adaptation time.

use serde::Serialize;
use std::collections::HashMap;

use crate::constants::{ATTRIBUTE_PREFIX, BEFORE_SHOP_LOOP, SHOP_LOOP};
use crate::models::{
    CommerceEntity, ContentId, ContentItem, ContentKind, ProductAttribute, Term, TermRecord,
};
use crate::platform::PageKind;
use crate::session::Session;

/// A content item adapted for rendering, with its commerce association
/// resolved.
///
/// Serializes with the item's fields inlined, so templates address
/// `post.title` and `post.entity.id` directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPost {
    #[serde(flatten)]
    item: ContentItem,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity: Option<CommerceEntity>,
}

/// Resolved values of a commerce attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Taxonomy-backed attribute, terms wrapped for template use.
    Terms(Vec<Term>),
    /// Taxonomy-backed attribute, raw term records.
    RawTerms(Vec<TermRecord>),
    /// Plain attribute option list.
    Options(Vec<String>),
}

impl ProductPost {
    /// Adapt an item, resolving its commerce entity when the type tag
    /// calls for one.
    ///
    /// The resolved entity (present or not) runs through the session's
    /// `product` filter chain before being stored.
    pub fn build(session: &Session, item: ContentItem) -> Self {
        let entity = if item.is_product() {
            let entity = session.platform().commerce().entity(item.id);
            if entity.is_none() {
                tracing::warn!(item = %item.id, "product item has no commerce entity");
            }
            entity
        } else {
            None
        };

        let entity = session.extensions().product.apply(entity);

        Self { item, entity }
    }

    /// Adapt an item without touching commerce data.
    pub fn plain(item: ContentItem) -> Self {
        Self { item, entity: None }
    }

    /// The wrapped content item.
    pub fn item(&self) -> &ContentItem {
        &self.item
    }

    /// Identity of the wrapped content item.
    pub fn id(&self) -> ContentId {
        self.item.id
    }

    /// The associated commerce entity, when one resolved.
    pub fn entity(&self) -> Option<&CommerceEntity> {
        self.entity.as_ref()
    }

    /// Whether a commerce entity is attached.
    pub fn is_product(&self) -> bool {
        self.entity.is_some()
    }

    /// Install this post as the session's current entity and fire
    /// per-item loop notifications when due.
    ///
    /// Idempotent: re-running setup while this post is already current is
    /// a no-op, so nested re-entrant fix-ups converge instead of
    /// re-firing notifications.
    pub fn setup(&self, session: &Session) {
        if session.current_entity_id() == Some(self.item.id) {
            tracing::trace!(item = %self.item.id, "setup skipped, already current");
            return;
        }

        tracing::trace!(item = %self.item.id, "setup");
        session.install_current(self.clone());

        if session.platform().route().page_kind() != PageKind::Detail
            && session.extensions().notifications.fired(BEFORE_SHOP_LOOP) > 0
        {
            session
                .extensions()
                .notifications
                .emit_for(SHOP_LOOP, Some(self.item.id));
        }
    }

    /// Symmetric cleanup: release the current-entity slot.
    pub fn teardown(&self, session: &Session) {
        tracing::trace!(item = %self.item.id, "teardown");
        session.clear_current();
    }

    /// First assigned product category, resolved to a [`Term`].
    ///
    /// `None` when no entity is attached, no categories are assigned, or
    /// the term record cannot be loaded.
    pub fn category(&self, session: &Session) -> Option<Term> {
        let entity = self.entity.as_ref()?;
        let first = entity.category_ids.first()?;

        session
            .platform()
            .content()
            .term(*first)
            .map(Term::from_record)
    }

    /// Look up a commerce attribute by slug (the stored key is the slug
    /// with the attribute prefix, e.g. `color` → `pa_color`).
    ///
    /// Taxonomy-backed attributes resolve their terms through the
    /// commerce collaborator and wrap them as [`Term`]s unless
    /// `convert_terms` is false. Plain attributes return their option
    /// list. `None` when no entity is attached or the slug is unknown.
    pub fn attribute(
        &self,
        session: &Session,
        slug: &str,
        convert_terms: bool,
    ) -> Option<AttributeValue> {
        let entity = self.entity.as_ref()?;
        let key = format!("{ATTRIBUTE_PREFIX}{slug}");
        let attribute = entity.attributes.get(&key)?;

        match attribute {
            ProductAttribute::Taxonomy { taxonomy } => {
                let records = session
                    .platform()
                    .commerce()
                    .attribute_terms(entity.id, taxonomy);

                if convert_terms {
                    Some(AttributeValue::Terms(
                        records.into_iter().map(Term::from_record).collect(),
                    ))
                } else {
                    Some(AttributeValue::RawTerms(records))
                }
            }
            ProductAttribute::Options(options) => {
                Some(AttributeValue::Options(options.clone()))
            }
        }
    }
}

/// Factory signature for adapting one content item.
pub type AdapterFactory = fn(&Session, ContentItem) -> ProductPost;

/// Registry mapping content kinds to adapter factories.
///
/// Resolved once per item at adaptation time. The default registry sends
/// product items through [`ProductPost::build`] and everything else
/// through [`ProductPost::plain`]; callers can register their own factory
/// per kind without changing any call site.
pub struct AdapterRegistry {
    factories: HashMap<ContentKind, AdapterFactory>,
    fallback: AdapterFactory,
}

impl AdapterRegistry {
    /// Registry with the standard product/plain split.
    pub fn new() -> Self {
        let mut factories: HashMap<ContentKind, AdapterFactory> = HashMap::new();
        factories.insert(ContentKind::Product, ProductPost::build);

        Self {
            factories,
            fallback: |_, item| ProductPost::plain(item),
        }
    }

    /// Use `factory` for items tagged `kind`.
    pub fn register(&mut self, kind: ContentKind, factory: AdapterFactory) {
        self.factories.insert(kind, factory);
    }

    /// Replace the factory used for unregistered kinds.
    pub fn set_fallback(&mut self, factory: AdapterFactory) {
        self.fallback = factory;
    }

    /// Adapt one item through the factory registered for its kind.
    pub fn adapt(&self, session: &Session, item: ContentItem) -> ProductPost {
        let factory = self
            .factories
            .get(&item.kind)
            .copied()
            .unwrap_or(self.fallback);
        factory(session, item)
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("kinds", &self.factories.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
