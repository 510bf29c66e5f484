//! Error handling for the shopfront bridge.
//!
//! The bridge treats "not found" outcomes (missing override templates,
//! unknown attribute slugs, empty category lists) as ordinary sentinel
//! values, never as errors. [`BridgeError`] therefore only covers the few
//! failure modes the bridge itself originates. Failures raised by external
//! collaborators - the template engine, the data stores - are carried as
//! [`anyhow::Error`] and propagate to the caller unchanged, without any
//! additional wrapping.

use thiserror::Error;

/// Failures originated by the bridge itself.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// None of the candidate templates for the current route exist in the
    /// theme. Carries the full candidate list, in search order.
    #[error("no template found for the current view (tried: {})", .tried.join(", "))]
    TemplateNotFound {
        /// Candidate template names that were checked, in order.
        tried: Vec<String>,
    },

    /// The current route has no queried content to render a default
    /// template for (neither a singular item nor a listing term).
    #[error("current route carries no renderable content")]
    NothingQueried,
}
