use axum::response::Response;
use serde_json::Value;

use cashdesk_core::EntityId;
use cashdesk_projection::{LoadedRelations, ProjectError, Record};

use crate::app::errors;
use crate::app::services::AppServices;

pub fn parse_entity_id(raw: &str, what: &'static str) -> Result<EntityId, Response> {
    raw.parse().map_err(|_| errors::invalid_id(what))
}

/// Project one record through the registry; failures become a generic 500.
pub fn project_item(
    services: &AppServices,
    entity: &str,
    record: Result<Record, ProjectError>,
    loaded: &LoadedRelations,
) -> Result<Value, Response> {
    let record = record.map_err(errors::projection_failure)?;
    services
        .registry()
        .project(entity, &record, loaded)
        .map(Value::Object)
        .map_err(errors::projection_failure)
}

/// Project a list of records without loaded relations.
pub fn project_items<T>(
    services: &AppServices,
    entity: &str,
    items: &[T],
    to_record: impl Fn(&T) -> Result<Record, ProjectError>,
) -> Result<Vec<Value>, Response> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        out.push(project_item(
            services,
            entity,
            to_record(item),
            &LoadedRelations::none(),
        )?);
    }
    Ok(out)
}

/// Convert a batch of read models into relation records for eager loading.
pub fn relation_records<T>(
    items: &[T],
    to_record: impl Fn(&T) -> Result<Record, ProjectError>,
) -> Result<Vec<Record>, Response> {
    items
        .iter()
        .map(&to_record)
        .collect::<Result<Vec<_>, _>>()
        .map_err(errors::projection_failure)
}
