use thiserror::Error;

/// Projection failure.
///
/// These are programming errors surfaced to the projector's caller, never to
/// the end user: a projection that names a missing attribute or requires a
/// relation the handler did not load is mis-wired.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProjectError {
    /// A field rule requires a relation that was not supplied.
    #[error("projection '{entity}': field '{field}' requires a relation that was not loaded")]
    MissingRelation {
        entity: &'static str,
        field: &'static str,
    },

    /// An always-included attribute is absent from the record.
    #[error("projection '{entity}': attribute for field '{field}' is missing from the record")]
    MissingAttribute {
        entity: &'static str,
        field: &'static str,
    },

    /// A declared coercion did not apply to the stored value's shape.
    #[error("projection '{entity}': field '{field}' could not be coerced")]
    Coerce {
        entity: &'static str,
        field: &'static str,
    },

    /// A record was built from a value that does not serialize to an object.
    #[error("record source did not serialize to an object")]
    NotARecord,

    /// No projection is registered for the requested entity type.
    #[error("no projection registered for entity type '{0}'")]
    UnknownEntity(String),
}
