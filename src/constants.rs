//! Named constants shared across the shopfront modules.
//!
//! This module collects notification names, context keys, and the naming
//! conventions used when translating logical template names into theme
//! override files. Defining them centrally keeps the string contracts
//! between the resolver, the context builder, and the lifecycle hooks in
//! one discoverable place.

/// Notification emitted when a collection cursor first touches position 0.
pub const LOOP_START: &str = "loop_start";

/// Notification emitted exactly once when a cursor leaves its last position.
pub const LOOP_END: &str = "loop_end";

/// Notification the surrounding theme fires before a shop listing loop begins.
///
/// The bridge never emits this itself; it only checks whether it has fired
/// to decide if per-item [`SHOP_LOOP`] notifications are due.
pub const BEFORE_SHOP_LOOP: &str = "before_shop_loop";

/// Per-item notification raised during a shop listing loop.
///
/// Fired from adapter setup whenever the route is not a product detail view
/// and [`BEFORE_SHOP_LOOP`] has already fired at least once.
pub const SHOP_LOOP: &str = "shop_loop";

/// Prefix commerce attributes carry in the entity's attribute map.
///
/// `attribute("color")` looks up the `pa_color` key.
pub const ATTRIBUTE_PREFIX: &str = "pa_";

/// File extension of the default (plugin-provided) templates.
pub const DEFAULT_TEMPLATE_EXT: &str = ".php";

/// File extension of theme override templates.
pub const TEMPLATE_EXT: &str = ".twig";

/// Default subfolder inside the theme's template directory that holds
/// storefront overrides.
pub const DEFAULT_SUBFOLDER: &str = "woocommerce";

/// Context key holding the converted per-call template arguments.
pub const KEY_ARGS: &str = "wc";

/// Context key holding the content item being rendered.
pub const KEY_POST: &str = "post";

/// Context key holding the id of the content item being rendered.
pub const KEY_POST_ID: &str = "post_id";

/// Context key holding the active commerce entity.
pub const KEY_PRODUCT: &str = "product";

/// Context key holding the queried taxonomy term on listing views.
pub const KEY_TERM: &str = "term";

/// Context key holding the cart snapshot.
pub const KEY_CART: &str = "cart";

/// Context key holding the page title on listing views.
pub const KEY_TITLE: &str = "title";
