//! Shopfront - template overrides and render-context management for
//! storefront themes.
//!
//! A storefront plugin resolves its views by logical template name
//! (`single-product.php`) and renders them with plain default templates.
//! Shopfront sits between the plugin and a Twig-style template engine:
//! it intercepts each resolution, checks the theme for an override file,
//! and - when one exists - builds a merged render context and renders
//! the override instead, reporting back a sentinel so the plugin skips
//! its own rendering. When no override exists, the plugin's default path
//! comes back untouched and everything behaves as if the bridge were
//! absent.
//!
//! Alongside resolution, the bridge keeps the per-request "current
//! entity" state consistent: iterating a product collection installs and
//! releases the active product around every position and brackets the
//! pass with `loop_start`/`loop_end` notifications. When a nested render
//! overwrites the slot, the context builder repairs it.
//!
//! # Architecture
//!
//! - [`session`] - per-request [`Session`](session::Session): owns the
//!   collaborators, the memoized base context, the current-entity slot,
//!   and the entry points (`intercept_template`, `render_default`).
//! - [`resolver`] - logical-name → override-file resolution and the
//!   route-based candidate lists.
//! - [`context`] - the [`RequestContext`](context::RequestContext) value
//!   map, merge precedence, and argument conversion.
//! - [`product`] - content items adapted with their commerce entity;
//!   adapter selection through a per-kind registry.
//! - [`cursor`] - collection iteration with strictly alternating
//!   setup/teardown side effects.
//! - [`hooks`] - typed extension points: filter chains and the
//!   lifecycle notification bus.
//! - [`platform`] - collaborator traits (content, commerce, routing,
//!   template engine) plus the Tera-backed host.
//! - [`models`] - shared data model; [`config`] - settings;
//!   [`core`] - error taxonomy.
//!
//! # Example
//!
//! ```no_run
//! use shopfront::config::Settings;
//! use shopfront::context::TemplateArgs;
//! use shopfront::platform::{Platform, TeraHost};
//! use shopfront::resolver::TemplateDecision;
//! use shopfront::session::Session;
//!
//! # use shopfront::models::{CartRef, CommerceEntity, ContentId, ContentItem, TermId, TermRecord};
//! # use shopfront::platform::{CommerceSource, ContentSource, PageKind, RouteState};
//! # struct Cms;
//! # impl ContentSource for Cms {
//! #     fn item(&self, _: ContentId) -> Option<ContentItem> { None }
//! #     fn term(&self, _: TermId) -> Option<TermRecord> { None }
//! # }
//! # struct Store;
//! # impl CommerceSource for Store {
//! #     fn entity(&self, _: ContentId) -> Option<CommerceEntity> { None }
//! #     fn attribute_terms(&self, _: ContentId, _: &str) -> Vec<TermRecord> { Vec::new() }
//! #     fn cart(&self) -> CartRef { CartRef::default() }
//! # }
//! # struct Route;
//! # impl RouteState for Route {
//! #     fn page_kind(&self) -> PageKind { PageKind::Other }
//! #     fn queried_term(&self) -> Option<TermRecord> { None }
//! #     fn queried_item(&self) -> Option<ContentId> { None }
//! #     fn shop_page(&self) -> Option<ContentId> { None }
//! # }
//! # fn main() -> anyhow::Result<()> {
//! let host = TeraHost::from_dir("theme/views")?;
//! let platform = Platform::new(Cms, Store, Route, host);
//! let session = Session::new(platform, Settings::default());
//!
//! match session.intercept_template(
//!     "plugin/templates/single-product.php",
//!     "single-product.php",
//!     &TemplateArgs::new(),
//! )? {
//!     TemplateDecision::Rendered(output) => print!("{output}"),
//!     TemplateDecision::Default(path) => {
//!         // No override; let the plugin render `path` itself.
//!         let _ = path;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod context;
pub mod core;
pub mod cursor;
pub mod hooks;
pub mod models;
pub mod platform;
pub mod product;
pub mod resolver;
pub mod session;

// test_utils is available to both unit tests and integration tests.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
