use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ProjectError;

/// Attribute snapshot of a persisted entity, as handed to the projector.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    attributes: Map<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from any serializable read model.
    ///
    /// Fails when the value does not serialize to a JSON object (a record is
    /// an attribute map, not a scalar or sequence).
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, ProjectError> {
        match serde_json::to_value(value) {
            Ok(Value::Object(attributes)) => Ok(Self { attributes }),
            Ok(_) | Err(_) => Err(ProjectError::NotARecord),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.insert(key, value);
        self
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }
}

impl From<Map<String, Value>> for Record {
    fn from(attributes: Map<String, Value>) -> Self {
        Self { attributes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use serde_json::json;

    #[derive(Serialize)]
    struct Row {
        id: u64,
        name: String,
    }

    #[test]
    fn builds_from_serializable_struct() {
        let record = Record::from_serialize(&Row {
            id: 7,
            name: "Box A".to_string(),
        })
        .unwrap();
        assert_eq!(record.get("id"), Some(&json!(7)));
        assert_eq!(record.get("name"), Some(&json!("Box A")));
    }

    #[test]
    fn scalar_sources_are_rejected() {
        assert_eq!(
            Record::from_serialize(&42u32),
            Err(ProjectError::NotARecord)
        );
    }
}
