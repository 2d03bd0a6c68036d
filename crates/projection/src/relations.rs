use std::collections::HashMap;

use crate::record::Record;

/// A relation the caller explicitly fetched alongside the primary entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded {
    /// To-one relation; `None` when the stored reference is null.
    One(Option<Record>),
    /// To-many relation.
    Many(Vec<Record>),
    /// Only the cardinality of a to-many relation was fetched.
    Count(u64),
}

/// Explicit, typed set of pre-loaded relations for one projection call.
///
/// Field presence in the output is decided by membership here, never by
/// introspecting the entity itself: a relation that was not queried must not
/// appear in the representation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedRelations {
    inner: HashMap<String, Loaded>,
}

impl LoadedRelations {
    pub fn new() -> Self {
        Self::default()
    }

    /// The empty set: project attributes and computed fields only.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, relation: impl Into<String>, loaded: Loaded) -> &mut Self {
        self.inner.insert(relation.into(), loaded);
        self
    }

    pub fn with(mut self, relation: impl Into<String>, loaded: Loaded) -> Self {
        self.insert(relation, loaded);
        self
    }

    pub fn get(&self, relation: &str) -> Option<&Loaded> {
        self.inner.get(relation)
    }

    pub fn contains(&self, relation: &str) -> bool {
        self.inner.contains_key(relation)
    }
}
