//! Cursor over a post collection with lifecycle side effects.
//!
//! Iterating storefront content is not a plain loop: each position needs
//! the current-entity slot installed before the item renders and released
//! before the next item starts, and the surrounding theme listens for
//! `loop_start`/`loop_end` notifications bracketing the whole pass.
//! [`PostsCursor`] owns that choreography.
//!
//! Guarantees:
//!
//! - `loop_start` fires exactly once, on the first access to position 0,
//!   no matter how many times [`PostsCursor::current`] is called there.
//! - setup and teardown strictly alternate; repeated `current()` at one
//!   position returns the same adapter without re-running setup.
//! - `loop_end` fires exactly once, when [`PostsCursor::advance`] leaves
//!   the last position - and never on an abandoned iteration.
//!
//! The cursor borrows its items and the session; it owns nothing beyond
//! the adapters it builds lazily per position.

use crate::constants::{LOOP_END, LOOP_START};
use crate::models::ContentItem;
use crate::product::ProductPost;
use crate::session::Session;

/// Where the cursor stands in its sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CursorState {
    NotStarted,
    InProgress(usize),
    Finished,
}

/// Iterator over content items that keeps the current-entity slot and
/// loop notifications consistent at every step.
pub struct PostsCursor<'a> {
    session: &'a Session,
    items: &'a [ContentItem],
    adapters: Vec<Option<ProductPost>>,
    state: CursorState,
    loop_started: bool,
    /// Position whose adapter is currently set up, if any. Drives the
    /// strict setup/teardown alternation.
    setup_at: Option<usize>,
}

impl<'a> PostsCursor<'a> {
    /// Create a cursor over `items`, driving side effects through
    /// `session`.
    pub fn new(session: &'a Session, items: &'a [ContentItem]) -> Self {
        Self {
            session,
            items,
            adapters: vec![None; items.len()],
            state: CursorState::NotStarted,
            loop_started: false,
            setup_at: None,
        }
    }

    /// Current position, when iteration is in progress.
    pub fn position(&self) -> Option<usize> {
        match self.state {
            CursorState::InProgress(pos) => Some(pos),
            _ => None,
        }
    }

    /// Whether the cursor has moved past its last position.
    pub fn is_finished(&self) -> bool {
        self.state == CursorState::Finished
    }

    /// Adapter for the current position.
    ///
    /// The first access to position 0 emits `loop_start`; the first
    /// access to any position builds the adapter and runs its setup.
    /// Further calls at the same position return the same adapter with no
    /// extra side effects. `None` once the cursor is finished, or for an
    /// empty collection (which never emits anything).
    pub fn current(&mut self) -> Option<&ProductPost> {
        let pos = match self.state {
            CursorState::Finished => return None,
            CursorState::InProgress(pos) => pos,
            CursorState::NotStarted => {
                if self.items.is_empty() {
                    self.state = CursorState::Finished;
                    return None;
                }
                self.state = CursorState::InProgress(0);
                0
            }
        };

        if pos == 0 && !self.loop_started {
            self.loop_started = true;
            self.session.extensions().notifications.emit(LOOP_START);
        }

        if self.adapters[pos].is_none() {
            let adapter = self.session.adapt(self.items[pos].clone());
            tracing::trace!(position = pos, item = %adapter.id(), "adapter built");
            self.adapters[pos] = Some(adapter);
        }

        let run_setup = self.setup_at != Some(pos);
        if run_setup {
            if let Some(adapter) = &self.adapters[pos] {
                adapter.setup(self.session);
            }
            self.setup_at = Some(pos);
        }

        self.adapters[pos].as_ref()
    }

    /// Tear down the current adapter and move forward.
    ///
    /// Teardown runs before the position changes. Leaving the last
    /// position emits `loop_end` and releases the session's stored query
    /// state, then the cursor finishes.
    pub fn advance(&mut self) {
        // Make sure the position being left was actually entered, so the
        // setup/teardown pairing holds even when callers advance without
        // reading.
        self.current();

        let CursorState::InProgress(pos) = self.state else {
            return;
        };

        if self.setup_at == Some(pos) {
            if let Some(adapter) = &self.adapters[pos] {
                adapter.teardown(self.session);
            }
            self.setup_at = None;
        }

        if pos + 1 == self.items.len() {
            self.session.extensions().notifications.emit(LOOP_END);
            self.session.clear_current();
            self.state = CursorState::Finished;
        } else {
            self.state = CursorState::InProgress(pos + 1);
        }
    }

    /// Drive a full iteration, calling `f` once per item with setup and
    /// teardown correctly paired around each call.
    pub fn for_each(mut self, mut f: impl FnMut(&ProductPost)) {
        while let Some(post) = self.current() {
            f(post);
            self.advance();
        }
    }
}

impl std::fmt::Debug for PostsCursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostsCursor")
            .field("len", &self.items.len())
            .field("state", &self.state)
            .field("loop_started", &self.loop_started)
            .finish_non_exhaustive()
    }
}
