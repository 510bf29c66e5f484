//! Conversion of raw template arguments into domain-typed context values.
//!
//! The storefront plugin hands template calls an argument map whose
//! values may be raw collaborator data: taxonomy term records, or ordered
//! sequences of commerce entities. Before a render call sees them, term
//! records become [`Term`] wrappers and entity sequences become
//! [`PostCollection`]s over the entities' backing content items
//! (re-resolved by identity, order preserved). Everything else passes
//! through untouched.
//!
//! Conversion never mutates the caller's map; it returns a new one.

use serde_json::Value;
use std::collections::BTreeMap;

use crate::context::ContextValue;
use crate::models::{CommerceEntity, ContentItem, PostCollection, Term, TermRecord};
use crate::session::Session;

/// A raw per-call template argument, classified at the boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// A raw taxonomy term record.
    Term(TermRecord),
    /// An ordered sequence of commerce entities.
    Entities(Vec<CommerceEntity>),
    /// An ordered sequence of content items.
    Items(Vec<ContentItem>),
    /// Any scalar or structured value.
    Scalar(Value),
}

impl From<Value> for ArgValue {
    fn from(value: Value) -> Self {
        Self::Scalar(value)
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::Scalar(Value::String(value.to_string()))
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        Self::Scalar(Value::Bool(value))
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        Self::Scalar(Value::from(value))
    }
}

/// The argument map a template call carries.
pub type TemplateArgs = BTreeMap<String, ArgValue>;

/// Convert every argument to its domain-typed context form.
///
/// Returns a new map; the input is never mutated.
pub fn convert_args(session: &Session, args: &TemplateArgs) -> BTreeMap<String, ContextValue> {
    args.iter()
        .map(|(key, value)| (key.clone(), convert_value(session, value)))
        .collect()
}

fn convert_value(session: &Session, value: &ArgValue) -> ContextValue {
    match value {
        ArgValue::Term(record) => ContextValue::Term(Term::from_record(record.clone())),
        ArgValue::Entities(entities) => {
            ContextValue::Posts(resolve_entity_items(session, entities))
        }
        ArgValue::Items(items) => ContextValue::Posts(PostCollection::new(items.clone())),
        ArgValue::Scalar(value) => ContextValue::Json(value.clone()),
    }
}

/// Re-resolve each commerce entity to its backing content item, keeping
/// order. Entities without a backing item are skipped.
fn resolve_entity_items(session: &Session, entities: &[CommerceEntity]) -> PostCollection {
    let mut items = Vec::with_capacity(entities.len());

    for entity in entities {
        match session.platform().content().item(entity.id) {
            Some(item) => items.push(item),
            None => {
                tracing::warn!(entity = %entity.id, "entity has no backing content item, skipped");
            }
        }
    }

    PostCollection::new(items)
}
