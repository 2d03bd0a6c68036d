//! `cashdesk-projection` — declarative entity-to-representation mapping.
//!
//! A [`Projection`] describes, per entity type, which attributes are always
//! included (with a declared coercion), which relation fields are included
//! only when that relation was explicitly pre-loaded, and which fields are
//! computed from other values. The engine renders a [`Record`] plus a typed
//! [`LoadedRelations`] set into a JSON-compatible map.
//!
//! The projector performs no IO: counts and related records are supplied by
//! the caller through the loaded-relation set.

pub mod error;
pub mod record;
pub mod registry;
pub mod relations;
pub mod rules;

pub use error::ProjectError;
pub use record::Record;
pub use registry::ProjectorRegistry;
pub use relations::{Loaded, LoadedRelations};
pub use rules::{Coerce, Computed, FieldRule, Projection};
