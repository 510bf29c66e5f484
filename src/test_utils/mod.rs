//! Test fixtures for the shopfront bridge.
//!
//! In-memory implementations of every collaborator trait, plus builders
//! for the model types tests construct over and over. Available to unit
//! tests and, through the `test-utils` feature, to integration tests and
//! downstream crates writing their own platform tests.

use anyhow::{Result, anyhow};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use crate::context::RequestContext;
use crate::models::{
    CartRef, CommerceEntity, ContentId, ContentItem, ContentKind, ProductAttribute, TermId,
    TermRecord,
};
use crate::platform::{
    CommerceSource, ContentSource, PageKind, Platform, RouteState, TemplateHost,
};

/// Build a product-kind content item.
pub fn product_item(id: u64, slug: &str) -> ContentItem {
    ContentItem {
        id: ContentId(id),
        kind: ContentKind::Product,
        slug: slug.to_string(),
        title: title_case(slug),
    }
}

/// Build a page-kind content item.
pub fn page_item(id: u64, slug: &str) -> ContentItem {
    ContentItem {
        id: ContentId(id),
        kind: ContentKind::Page,
        slug: slug.to_string(),
        title: title_case(slug),
    }
}

/// Build a commerce entity with category assignments.
pub fn entity(id: u64, category_ids: &[u64]) -> CommerceEntity {
    CommerceEntity {
        id: ContentId(id),
        category_ids: category_ids.iter().copied().map(TermId).collect(),
        attributes: BTreeMap::new(),
    }
}

/// Build a raw term record.
pub fn term_record(id: u64, taxonomy: &str, slug: &str) -> TermRecord {
    TermRecord {
        id: TermId(id),
        taxonomy: taxonomy.to_string(),
        slug: slug.to_string(),
        name: title_case(slug),
    }
}

fn title_case(slug: &str) -> String {
    let mut chars = slug.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// In-memory content store.
#[derive(Debug, Default)]
pub struct MemoryContent {
    items: HashMap<ContentId, ContentItem>,
    terms: HashMap<TermId, TermRecord>,
}

impl MemoryContent {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a content item.
    pub fn with_item(mut self, item: ContentItem) -> Self {
        self.items.insert(item.id, item);
        self
    }

    /// Add a term record.
    pub fn with_term(mut self, term: TermRecord) -> Self {
        self.terms.insert(term.id, term);
        self
    }
}

impl ContentSource for MemoryContent {
    fn item(&self, id: ContentId) -> Option<ContentItem> {
        self.items.get(&id).cloned()
    }

    fn term(&self, id: TermId) -> Option<TermRecord> {
        self.terms.get(&id).cloned()
    }
}

/// In-memory commerce store.
#[derive(Debug, Default)]
pub struct MemoryCommerce {
    entities: HashMap<ContentId, CommerceEntity>,
    attribute_terms: HashMap<(ContentId, String), Vec<TermRecord>>,
    cart: CartRef,
}

impl MemoryCommerce {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity.
    pub fn with_entity(mut self, entity: CommerceEntity) -> Self {
        self.entities.insert(entity.id, entity);
        self
    }

    /// Add a taxonomy-backed attribute to an already-added entity and
    /// register the terms it resolves to.
    pub fn with_attribute_terms(
        mut self,
        entity_id: u64,
        attribute: &str,
        terms: Vec<TermRecord>,
    ) -> Self {
        if let Some(entity) = self.entities.get_mut(&ContentId(entity_id)) {
            entity.attributes.insert(
                attribute.to_string(),
                ProductAttribute::Taxonomy {
                    taxonomy: attribute.to_string(),
                },
            );
        }
        self.attribute_terms
            .insert((ContentId(entity_id), attribute.to_string()), terms);
        self
    }

    /// Add an option-list attribute to an already-added entity.
    pub fn with_attribute_options(
        mut self,
        entity_id: u64,
        attribute: &str,
        options: &[&str],
    ) -> Self {
        if let Some(entity) = self.entities.get_mut(&ContentId(entity_id)) {
            entity.attributes.insert(
                attribute.to_string(),
                ProductAttribute::Options(options.iter().map(|o| o.to_string()).collect()),
            );
        }
        self
    }

    /// Set the cart snapshot.
    pub fn with_cart(mut self, cart: CartRef) -> Self {
        self.cart = cart;
        self
    }
}

impl CommerceSource for MemoryCommerce {
    fn entity(&self, id: ContentId) -> Option<CommerceEntity> {
        self.entities.get(&id).cloned()
    }

    fn attribute_terms(&self, entity: ContentId, attribute: &str) -> Vec<TermRecord> {
        self.attribute_terms
            .get(&(entity, attribute.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    fn cart(&self) -> CartRef {
        self.cart.clone()
    }
}

/// Fixed routing state for one simulated request.
#[derive(Debug)]
pub struct FixedRoute {
    /// Page kind being served.
    pub kind: PageKind,
    /// Queried content item, for singular views.
    pub item: Option<ContentId>,
    /// Queried term, for listing views.
    pub term: Option<TermRecord>,
    /// The designated shop landing page.
    pub shop_page: Option<ContentId>,
    /// Listing page title.
    pub title: Option<String>,
}

impl FixedRoute {
    /// A route of the given kind with nothing queried.
    pub fn new(kind: PageKind) -> Self {
        Self {
            kind,
            item: None,
            term: None,
            shop_page: None,
            title: None,
        }
    }

    /// A singular product detail route for `item`.
    pub fn detail(item: u64) -> Self {
        Self {
            item: Some(ContentId(item)),
            ..Self::new(PageKind::Detail)
        }
    }

    /// A taxonomy listing route for `term`.
    pub fn listing(term: TermRecord) -> Self {
        Self {
            term: Some(term),
            ..Self::new(PageKind::Listing)
        }
    }

    /// Set the queried item.
    pub fn with_item(mut self, item: u64) -> Self {
        self.item = Some(ContentId(item));
        self
    }

    /// Set the shop landing page.
    pub fn with_shop_page(mut self, item: u64) -> Self {
        self.shop_page = Some(ContentId(item));
        self
    }

    /// Set the listing title.
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }
}

impl RouteState for FixedRoute {
    fn page_kind(&self) -> PageKind {
        self.kind
    }

    fn queried_term(&self) -> Option<TermRecord> {
        self.term.clone()
    }

    fn queried_item(&self) -> Option<ContentId> {
        self.item
    }

    fn shop_page(&self) -> Option<ContentId> {
        self.shop_page
    }

    fn page_title(&self) -> Option<String> {
        self.title.clone()
    }
}

/// Shared log of render calls, readable after the host moved into a
/// [`Platform`].
#[derive(Debug, Clone, Default)]
pub struct RenderLog(Rc<RefCell<Vec<(String, RequestContext)>>>);

impl RenderLog {
    /// Every render call so far, in order.
    pub fn calls(&self) -> Vec<(String, RequestContext)> {
        self.0.borrow().clone()
    }

    /// Number of render calls so far.
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Whether nothing has rendered yet.
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

/// In-memory template host that records every render call.
///
/// Rendering returns the template's stored body; tests keep the
/// [`RenderLog`] handle to see which templates ran and with which
/// context.
#[derive(Debug, Default)]
pub struct MemoryHost {
    templates: BTreeMap<String, String>,
    rendered: RenderLog,
}

impl MemoryHost {
    /// Host with no templates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template under `name` with a fixed rendered body.
    pub fn with_template(mut self, name: &str, body: &str) -> Self {
        self.templates.insert(name.to_string(), body.to_string());
        self
    }

    /// Handle to the render log, kept valid after the host moves into a
    /// [`Platform`].
    pub fn render_log(&self) -> RenderLog {
        self.rendered.clone()
    }
}

impl TemplateHost for MemoryHost {
    fn locate(&self, relative_name: &str) -> Option<String> {
        self.templates
            .contains_key(relative_name)
            .then(|| relative_name.to_string())
    }

    fn render(&self, name: &str, context: &RequestContext) -> Result<String> {
        let body = self
            .templates
            .get(name)
            .ok_or_else(|| anyhow!("unknown template '{name}'"))?;

        self.rendered
            .0
            .borrow_mut()
            .push((name.to_string(), context.clone()));

        Ok(body.clone())
    }
}

/// Assemble a [`Platform`] from fixture stores.
pub fn platform(
    content: MemoryContent,
    commerce: MemoryCommerce,
    route: FixedRoute,
    host: MemoryHost,
) -> Platform {
    Platform::new(content, commerce, route, host)
}
