//! Per-request session state and the bridge's entry points.
//!
//! A [`Session`] lives exactly as long as one request. It owns the
//! collaborator [`Platform`], the extension registry, the adapter
//! registry, the memoized base context, and the current-entity slot:
//! state that would otherwise live in process-wide globals, held here as
//! an explicit object passed down the call chain instead.
//!
//! Execution is single-threaded and cooperative; the only hazards are
//! re-entrancy hazards, where a render triggers another resolution or
//! iteration before the outer one completes. The current-entity slot is a
//! flat cell used with stack discipline: every adapter setup is paired
//! with a teardown before control returns, and
//! [`Session::call_context`]'s fix-up step restores the intended entity
//! after a nested resolution temporarily overwrote it.
//!
//! # Entry points
//!
//! - [`Session::intercept_template`] and
//!   [`Session::intercept_template_part`] handle the "resolve template"
//!   events: find an override, render it, and report a
//!   [`TemplateDecision`] telling the caller whether to skip its own
//!   rendering.
//! - [`Session::render_default`] - render the best matching override for
//!   the current route from an ordered candidate list, for themes that
//!   route every storefront view through one template file.
//! - [`Session::ensure_current_entity`] - repair an empty current-entity
//!   slot before the main content renders.

use anyhow::Result;
use once_cell::unsync::OnceCell;
use std::cell::RefCell;

use crate::config::Settings;
use crate::constants::{
    KEY_ARGS, KEY_CART, KEY_POST, KEY_POST_ID, KEY_PRODUCT, KEY_TERM, KEY_TITLE,
};
use crate::context::{ContextValue, RequestContext, TemplateArgs, convert_args};
use crate::core::BridgeError;
use crate::hooks::Extensions;
use crate::models::{ContentId, ContentItem, Term};
use crate::platform::{PageKind, Platform};
use crate::product::{AdapterRegistry, ProductPost};
use crate::resolver::{TemplateDecision, TemplateResolver};

/// All state the bridge keeps for one request.
pub struct Session {
    platform: Platform,
    settings: Settings,
    resolver: TemplateResolver,
    extensions: Extensions,
    adapters: AdapterRegistry,
    base: OnceCell<RequestContext>,
    current: RefCell<Option<ProductPost>>,
}

impl Session {
    /// Create a session over `platform` with the given settings and the
    /// default adapter registry.
    pub fn new(platform: Platform, settings: Settings) -> Self {
        let resolver = TemplateResolver::new(&settings.subfolder);

        Self {
            platform,
            settings,
            resolver,
            extensions: Extensions::new(),
            adapters: AdapterRegistry::new(),
            base: OnceCell::new(),
            current: RefCell::new(None),
        }
    }

    /// The collaborator platform.
    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// The session's settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The template resolver configured for this session.
    pub fn resolver(&self) -> &TemplateResolver {
        &self.resolver
    }

    /// The extension registry.
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Mutable extension registry, for registering transformers and
    /// listeners before the request is processed.
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    /// Mutable adapter registry, for substituting adapter factories.
    pub fn adapters_mut(&mut self) -> &mut AdapterRegistry {
        &mut self.adapters
    }

    /// Adapt a content item through the registered factory for its kind.
    pub fn adapt(&self, item: ContentItem) -> ProductPost {
        self.adapters.adapt(self, item)
    }

    // ---- current-entity slot -------------------------------------------

    /// The entity currently being rendered, if any.
    pub fn current_product(&self) -> Option<ProductPost> {
        self.current.borrow().clone()
    }

    /// Identity of the current entity's content item, if any.
    pub fn current_entity_id(&self) -> Option<ContentId> {
        self.current.borrow().as_ref().map(ProductPost::id)
    }

    pub(crate) fn install_current(&self, post: ProductPost) {
        *self.current.borrow_mut() = Some(post);
    }

    pub(crate) fn clear_current(&self) {
        *self.current.borrow_mut() = None;
    }

    /// If the current-entity slot is empty and the queried item adapts to
    /// a product, set it up.
    ///
    /// On singular product pages the slot is installed when the template
    /// loads, but rendering unrelated items in between clears it; calling
    /// this before the main content renders repairs the slot. No-op when
    /// the slot is occupied.
    pub fn ensure_current_entity(&self) {
        if self.current.borrow().is_some() {
            return;
        }

        let Some(id) = self.platform.route().queried_item() else {
            return;
        };
        let Some(item) = self.platform.content().item(id) else {
            return;
        };

        let post = self.adapt(item);
        if post.is_product() {
            tracing::debug!(item = %post.id(), "restoring current entity from queried item");
            post.setup(self);
        }
    }

    // ---- context assembly ----------------------------------------------

    /// The memoized base context for this request.
    ///
    /// Computed on first access and reused until [`Session::reset`];
    /// callers receive a shared reference and merge into their own copy.
    pub fn base_context(&self) -> &RequestContext {
        self.base.get_or_init(|| self.compute_base_context())
    }

    fn compute_base_context(&self) -> RequestContext {
        tracing::debug!("computing base request context");

        let route = self.platform.route();
        let mut context = RequestContext::new();

        match route.page_kind() {
            PageKind::Detail => {
                if let Some(item) = route.queried_item().and_then(|id| self.platform.content().item(id)) {
                    context.insert(KEY_POST, ContextValue::Post(self.adapt(item)));
                }
            }
            PageKind::ShopLanding => {
                if let Some(item) = route.shop_page().and_then(|id| self.platform.content().item(id)) {
                    context.insert(KEY_POST, ContextValue::Post(self.adapt(item)));
                }
            }
            PageKind::Listing => {
                if let Some(record) = route.queried_term() {
                    context.insert(KEY_TERM, ContextValue::Term(Term::from_record(record)));
                }
            }
            PageKind::Other => {}
        }

        context.insert(KEY_CART, ContextValue::Cart(self.platform.commerce().cart()));

        self.extensions.context.apply(context)
    }

    /// Build the merged context for one render call.
    ///
    /// Starts from a copy of the memoized base, adds the converted `args`
    /// under the argument namespace, and - when the current-entity slot is
    /// occupied - the entity itself, its id, and the content item
    /// re-resolved by the entity's identity, so the rendered item always
    /// matches the entity actually active even if the base's cached item
    /// is stale. Call-specific keys win every collision.
    pub fn call_context(&self, args: &TemplateArgs) -> RequestContext {
        let mut context = self.base_context().clone();
        context.insert(KEY_ARGS, ContextValue::Args(convert_args(self, args)));

        if let Some(current) = self.current_product() {
            if let Some(entity) = current.entity().cloned() {
                let entity_id = entity.id;
                context.insert(KEY_PRODUCT, ContextValue::Product(entity));
                context.insert(KEY_POST_ID, ContextValue::Id(entity_id));

                if let Some(item) = self.platform.content().item(entity_id) {
                    context.insert(KEY_POST, ContextValue::Post(self.adapt(item)));
                }
            }
        }

        let context = self.extensions.template_context.apply(context);

        // Building the base context may have run the wrong entity's setup
        // as a side effect; re-running setup on the merged post restores
        // the intended singleton. Idempotent when nothing was overwritten.
        if let Some(ContextValue::Post(post)) = context.get(KEY_POST) {
            post.setup(self);
        }

        context
    }

    // ---- template interception -----------------------------------------

    /// Handle a "resolve template" event for a logical template name.
    ///
    /// Without an override, the caller's `default_path` comes back
    /// unchanged in [`TemplateDecision::Default`] and the surrounding
    /// system renders exactly as if the bridge were absent. With one, the
    /// override renders immediately and [`TemplateDecision::Rendered`]
    /// tells the caller to skip its own rendering.
    ///
    /// # Errors
    ///
    /// Only the template engine's own render failures, passed through
    /// unchanged.
    pub fn intercept_template(
        &self,
        default_path: &str,
        logical_name: &str,
        args: &TemplateArgs,
    ) -> Result<TemplateDecision> {
        let Some(found) = self.resolver.resolve(self.platform.templates(), logical_name) else {
            return Ok(TemplateDecision::Default(default_path.to_string()));
        };

        self.ensure_current_entity();
        let context = self.call_context(args);
        let output = self.platform.templates().render(&found, &context)?;

        Ok(TemplateDecision::Rendered(output))
    }

    /// Handle a "resolve template part" event for a slug/variant pair.
    ///
    /// Same contract as [`Session::intercept_template`].
    pub fn intercept_template_part(
        &self,
        default_path: &str,
        slug: &str,
        variant: &str,
        args: &TemplateArgs,
    ) -> Result<TemplateDecision> {
        let Some(found) = self
            .resolver
            .resolve_part(self.platform.templates(), slug, variant)
        else {
            return Ok(TemplateDecision::Default(default_path.to_string()));
        };

        self.ensure_current_entity();
        let context = self.call_context(args);
        let output = self.platform.templates().render(&found, &context)?;

        Ok(TemplateDecision::Rendered(output))
    }

    /// Render the first existing override from the candidate list for the
    /// current route, merging `extra` over the base context.
    ///
    /// Mimics the storefront plugin's own template-loader ordering:
    /// singular views try a per-slug override before the generic names,
    /// archive views try term-specific names first. On a singular view
    /// the resolved post's setup runs before rendering (in loops the
    /// cursor does this); archive views get the route's page title.
    ///
    /// # Errors
    ///
    /// [`BridgeError::TemplateNotFound`] when no candidate exists,
    /// [`BridgeError::NothingQueried`] on routes without storefront
    /// content, and engine render failures passed through unchanged.
    pub fn render_default(&self, extra: &TemplateArgs) -> Result<String> {
        let route = self.platform.route();
        let mut context = self.base_context().clone();
        context.merge(convert_args(self, extra));

        let candidates = match route.page_kind() {
            PageKind::Detail => {
                let slug = match context.get(KEY_POST) {
                    Some(ContextValue::Post(post)) => {
                        post.setup(self);
                        Some(post.item().slug.clone())
                    }
                    _ => None,
                };
                self.resolver.singular_candidates(slug.as_deref())
            }
            PageKind::Listing | PageKind::ShopLanding => {
                if let Some(title) = route.page_title() {
                    context.insert(KEY_TITLE, ContextValue::Text(title));
                }
                self.resolver.archive_candidates(route.queried_term().as_ref())
            }
            PageKind::Other => return Err(BridgeError::NothingQueried.into()),
        };

        for candidate in &candidates {
            if let Some(found) = self.platform.templates().locate(candidate) {
                tracing::debug!(template = %found, "rendering default override");
                return self.platform.templates().render(&found, &context);
            }
        }

        Err(BridgeError::TemplateNotFound { tried: candidates }.into())
    }

    /// Clear all per-request state: the memoized base context, the
    /// current-entity slot, and notification fired counts. Models the
    /// request boundary; nothing invalidates mid-request.
    pub fn reset(&mut self) {
        self.base.take();
        self.current.get_mut().take();
        self.extensions.notifications.reset_counts();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("settings", &self.settings)
            .field("base_computed", &self.base.get().is_some())
            .field("current", &self.current.borrow().as_ref().map(ProductPost::id))
            .finish_non_exhaustive()
    }
}
