use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::ProjectError;
use crate::record::Record;
use crate::relations::LoadedRelations;
use crate::rules::Projection;

/// Entity-type → projection lookup, owned by the application wiring.
#[derive(Debug, Default)]
pub struct ProjectorRegistry {
    inner: HashMap<&'static str, Projection>,
}

impl ProjectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a projection under its entity type name. Last write wins.
    pub fn register(&mut self, projection: Projection) -> &mut Self {
        self.inner.insert(projection.entity(), projection);
        self
    }

    pub fn with(mut self, projection: Projection) -> Self {
        self.register(projection);
        self
    }

    pub fn get(&self, entity: &str) -> Option<&Projection> {
        self.inner.get(entity)
    }

    pub fn project(
        &self,
        entity: &str,
        record: &Record,
        loaded: &LoadedRelations,
    ) -> Result<Map<String, Value>, ProjectError> {
        let projection = self
            .get(entity)
            .ok_or_else(|| ProjectError::UnknownEntity(entity.to_string()))?;
        projection.project(record, loaded)
    }
}
