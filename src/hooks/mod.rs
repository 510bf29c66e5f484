//! Typed extension registry for the shopfront bridge.
//!
//! Two kinds of extension points exist:
//!
//! - **Filters** ([`FilterChain`]): named data-shaping points that accept a
//!   chain of `T -> T` transformers. The bridge passes a value through the
//!   chain and uses whatever comes out the other end.
//! - **Notifications** ([`NotificationBus`]): named fire-and-forget
//!   lifecycle events with `Fn(&Notification)` listeners and a per-name
//!   fired counter. The counter is what lets adapter setup ask "has the
//!   `before_shop_loop` notification fired yet?" before raising the
//!   per-item `shop_loop` event.
//!
//! Registration order is preserved and is the only ordering guarantee.
//! Registration requires `&mut`; dispatch works through `&` so deeply
//! nested render code can emit without threading mutability around
//! (fired counters sit behind a [`RefCell`]; execution is single-threaded
//! by design).

use std::cell::RefCell;
use std::collections::HashMap;

use crate::models::ContentId;

/// An ordered chain of `T -> T` transformers attached to one extension
/// point.
pub struct FilterChain<T> {
    transformers: Vec<Box<dyn Fn(T) -> T>>,
}

impl<T> FilterChain<T> {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self {
            transformers: Vec::new(),
        }
    }

    /// Append a transformer. Transformers run in registration order.
    pub fn add(&mut self, transformer: impl Fn(T) -> T + 'static) {
        self.transformers.push(Box::new(transformer));
    }

    /// Pass `value` through every registered transformer in order.
    pub fn apply(&self, value: T) -> T {
        self.transformers
            .iter()
            .fold(value, |acc, transformer| transformer(acc))
    }

    /// Number of registered transformers.
    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    /// Whether the chain has no transformers.
    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }
}

impl<T> Default for FilterChain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for FilterChain<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterChain")
            .field("transformers", &self.transformers.len())
            .finish()
    }
}

/// Payload handed to notification listeners.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification<'a> {
    /// Name the notification was emitted under.
    pub name: &'a str,
    /// Content item in scope when one exists (e.g. the item whose setup
    /// raised the event). Loop boundary notifications carry `None`.
    pub item: Option<ContentId>,
}

type Listener = Box<dyn Fn(&Notification<'_>)>;

/// Fire-and-forget lifecycle notification bus.
///
/// Listeners are invoked in registration order; emitting a name nobody
/// listens to still counts as a fire. There is no return value and no
/// ordering guarantee beyond registration order.
#[derive(Default)]
pub struct NotificationBus {
    listeners: HashMap<String, Vec<Listener>>,
    fired: RefCell<HashMap<String, u64>>,
}

impl NotificationBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for `name`.
    pub fn on(&mut self, name: &str, listener: impl Fn(&Notification<'_>) + 'static) {
        self.listeners
            .entry(name.to_string())
            .or_default()
            .push(Box::new(listener));
    }

    /// Emit `name` with no item in scope.
    pub fn emit(&self, name: &str) {
        self.emit_for(name, None);
    }

    /// Emit `name`, recording the fire and invoking listeners in
    /// registration order.
    pub fn emit_for(&self, name: &str, item: Option<ContentId>) {
        *self.fired.borrow_mut().entry(name.to_string()).or_insert(0) += 1;
        tracing::trace!(notification = name, ?item, "emit");

        let notification = Notification { name, item };
        if let Some(listeners) = self.listeners.get(name) {
            for listener in listeners {
                listener(&notification);
            }
        }
    }

    /// How many times `name` has been emitted on this bus.
    pub fn fired(&self, name: &str) -> u64 {
        self.fired.borrow().get(name).copied().unwrap_or(0)
    }

    /// Forget all fired counts. Listeners stay registered.
    pub fn reset_counts(&mut self) {
        self.fired.borrow_mut().clear();
    }
}

impl std::fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationBus")
            .field("listener_names", &self.listeners.keys().collect::<Vec<_>>())
            .field("fired", &self.fired.borrow())
            .finish()
    }
}

/// The bridge's named extension points.
#[derive(Debug, Default)]
pub struct Extensions {
    /// Substitute or adjust the commerce entity resolved during adapter
    /// construction (runs before the entity is stored).
    pub product: FilterChain<Option<crate::models::CommerceEntity>>,
    /// Shape the base request context before it is memoized. Keys written
    /// here lose collisions against everything merged later.
    pub context: FilterChain<crate::context::RequestContext>,
    /// Shape the merged per-call context after the current-entity keys
    /// are written, right before the render runs.
    pub template_context: FilterChain<crate::context::RequestContext>,
    /// Lifecycle notification bus.
    pub notifications: NotificationBus,
}

impl Extensions {
    /// Create a registry with no transformers or listeners.
    pub fn new() -> Self {
        Self::default()
    }
}
