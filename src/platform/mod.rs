//! Collaborator boundary for the shopfront bridge.
//!
//! The bridge orchestrates *which* renderer runs and *what* transient
//! state it sees; everything durable lives behind the traits in this
//! module. The CMS provides routing state ([`RouteState`]) and content
//! lookups ([`ContentSource`]), the commerce plugin provides entity and
//! taxonomy data plus the cart snapshot ([`CommerceSource`]), and the
//! template engine provides file existence and rendering
//! ([`TemplateHost`]).
//!
//! Lookup misses are `None`/empty results, never errors; only
//! [`TemplateHost::render`] may fail hard, and such failures propagate to
//! the bridge's caller unchanged.
//!
//! [`Platform`] aggregates one implementation of each trait; a
//! [`crate::session::Session`] owns a `Platform` for the request lifetime.

mod tera_host;

pub use tera_host::TeraHost;

use anyhow::Result;

use crate::context::RequestContext;
use crate::models::{CartRef, CommerceEntity, ContentId, ContentItem, TermId, TermRecord};

/// What kind of page the current request resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// Singular product detail view.
    Detail,
    /// Archive/listing view for the commerce taxonomy.
    Listing,
    /// The designated shop landing page.
    ShopLanding,
    /// Anything else.
    Other,
}

/// CMS content lookups.
pub trait ContentSource {
    /// Load a content item by identity.
    fn item(&self, id: ContentId) -> Option<ContentItem>;

    /// Load a raw taxonomy term record by identity.
    fn term(&self, id: TermId) -> Option<TermRecord>;
}

/// Commerce data access.
pub trait CommerceSource {
    /// Look up the commerce entity associated with a content item.
    fn entity(&self, id: ContentId) -> Option<CommerceEntity>;

    /// Resolve the term records behind a taxonomy-backed attribute, in the
    /// taxonomy's order.
    fn attribute_terms(&self, entity: ContentId, attribute: &str) -> Vec<TermRecord>;

    /// Read-only snapshot of the current cart.
    fn cart(&self) -> CartRef;
}

/// CMS routing and query state for the current request.
pub trait RouteState {
    /// The kind of page being served.
    fn page_kind(&self) -> PageKind;

    /// The queried taxonomy term on listing views.
    fn queried_term(&self) -> Option<TermRecord>;

    /// The queried content item on singular views.
    fn queried_item(&self) -> Option<ContentId>;

    /// The content item designated as the shop landing page.
    fn shop_page(&self) -> Option<ContentId>;

    /// Display title for listing views.
    fn page_title(&self) -> Option<String> {
        None
    }
}

/// Template engine file system and renderer.
pub trait TemplateHost {
    /// Check whether a template exists under `relative_name` and return
    /// the name to render it by. `None` means "no override" and callers
    /// fall back to the default template.
    fn locate(&self, relative_name: &str) -> Option<String>;

    /// Render a located template with the given context.
    ///
    /// # Errors
    ///
    /// Engine failures surface here and propagate to the bridge's caller
    /// without additional wrapping.
    fn render(&self, name: &str, context: &RequestContext) -> Result<String>;
}

/// One implementation of each collaborator, owned for the request
/// lifetime.
pub struct Platform {
    content: Box<dyn ContentSource>,
    commerce: Box<dyn CommerceSource>,
    route: Box<dyn RouteState>,
    templates: Box<dyn TemplateHost>,
}

impl Platform {
    /// Assemble a platform from collaborator implementations.
    pub fn new(
        content: impl ContentSource + 'static,
        commerce: impl CommerceSource + 'static,
        route: impl RouteState + 'static,
        templates: impl TemplateHost + 'static,
    ) -> Self {
        Self {
            content: Box::new(content),
            commerce: Box::new(commerce),
            route: Box::new(route),
            templates: Box::new(templates),
        }
    }

    /// CMS content lookups.
    pub fn content(&self) -> &dyn ContentSource {
        self.content.as_ref()
    }

    /// Commerce data access.
    pub fn commerce(&self) -> &dyn CommerceSource {
        self.commerce.as_ref()
    }

    /// Routing and query state.
    pub fn route(&self) -> &dyn RouteState {
        self.route.as_ref()
    }

    /// Template engine access.
    pub fn templates(&self) -> &dyn TemplateHost {
        self.templates.as_ref()
    }
}

impl std::fmt::Debug for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platform").finish_non_exhaustive()
    }
}
