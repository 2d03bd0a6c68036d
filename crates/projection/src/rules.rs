use chrono::DateTime;
use serde_json::{Map, Number, Value};

use crate::error::ProjectError;
use crate::record::Record;
use crate::relations::{Loaded, LoadedRelations};

/// Coercion applied to an always-included attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coerce {
    /// Copy verbatim.
    None,
    /// Stored 0/1 integer rendered as a JSON boolean.
    BoolFromInt,
    /// Numeric cast to an integer (fractional part truncated).
    Int,
    /// RFC3339 source timestamp rendered with a fixed chrono pattern.
    DateFormat(&'static str),
}

impl Coerce {
    fn apply(&self, value: &Value) -> Option<Value> {
        match self {
            Coerce::None => Some(value.clone()),
            Coerce::BoolFromInt => match value {
                Value::Bool(_) => Some(value.clone()),
                Value::Number(n) => n.as_i64().map(|i| Value::Bool(i != 0)),
                _ => None,
            },
            Coerce::Int => match value {
                Value::Number(n) => {
                    if let Some(i) = n.as_i64() {
                        Some(Value::Number(Number::from(i)))
                    } else {
                        n.as_f64().map(|f| Value::Number(Number::from(f as i64)))
                    }
                }
                _ => None,
            },
            Coerce::DateFormat(pattern) => match value {
                Value::String(s) => DateTime::parse_from_rfc3339(s)
                    .ok()
                    .map(|dt| Value::String(dt.format(pattern).to_string())),
                _ => None,
            },
        }
    }
}

/// A field derived from other included or related values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Computed {
    /// Path component of a stored absolute URL. Values that do not look like
    /// an absolute URL pass through raw.
    PathFromUrl { source: &'static str },

    /// Human-readable label resolved via a closed lookup table. An unmapped
    /// discriminator falls back to the raw discriminator value.
    Label {
        source: &'static str,
        table: &'static [(&'static str, &'static str)],
    },

    /// Count of a to-many relation. A pre-computed attribute wins when
    /// present and non-null; otherwise the loaded relation supplies it.
    CountOf {
        relation: &'static str,
        precomputed: Option<&'static str>,
    },
}

impl Computed {
    fn apply(
        &self,
        entity: &'static str,
        field: &'static str,
        record: &Record,
        loaded: &LoadedRelations,
    ) -> Result<Value, ProjectError> {
        match self {
            Computed::PathFromUrl { source } => {
                let value = record
                    .get(source)
                    .ok_or(ProjectError::MissingAttribute { entity, field })?;
                match value {
                    Value::String(s) => Ok(Value::String(
                        url_path(s).map(str::to_string).unwrap_or_else(|| s.clone()),
                    )),
                    other => Ok(other.clone()),
                }
            }
            Computed::Label { source, table } => {
                let value = record
                    .get(source)
                    .ok_or(ProjectError::MissingAttribute { entity, field })?;
                match value.as_str() {
                    Some(discriminator) => Ok(Value::String(
                        table
                            .iter()
                            .find(|(key, _)| *key == discriminator)
                            .map(|(_, label)| (*label).to_string())
                            .unwrap_or_else(|| discriminator.to_string()),
                    )),
                    None => Ok(value.clone()),
                }
            }
            Computed::CountOf {
                relation,
                precomputed,
            } => {
                if let Some(attr) = precomputed {
                    if let Some(value @ Value::Number(_)) = record.get(attr) {
                        return Ok(value.clone());
                    }
                }
                match loaded.get(relation) {
                    Some(Loaded::Count(n)) => Ok(Value::Number(Number::from(*n))),
                    Some(Loaded::Many(records)) => {
                        Ok(Value::Number(Number::from(records.len() as u64)))
                    }
                    _ => Err(ProjectError::MissingRelation { entity, field }),
                }
            }
        }
    }
}

/// Path component of an absolute URL, `None` when `value` has no scheme.
fn url_path(value: &str) -> Option<&str> {
    let rest = value.split_once("://")?.1;
    match rest.find('/') {
        Some(idx) => Some(&rest[idx..]),
        None => Some("/"),
    }
}

/// Rule for one output field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldRule {
    /// Always included; copied verbatim with a declared coercion.
    Attr {
        source: &'static str,
        coerce: Coerce,
    },

    /// Included only when the relation is in the loaded set. Absent relation
    /// means the key is omitted (not null); a loaded-but-null to-one relation
    /// renders as JSON null. `required` relations are always-project: missing
    /// them is a programming error.
    Relation {
        relation: &'static str,
        nested: Box<Projection>,
        required: bool,
    },

    /// Derived from other included or related values.
    Computed(Computed),
}

/// Declarative, per-entity-type projection: an ordered list of field rules.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    entity: &'static str,
    fields: Vec<(&'static str, FieldRule)>,
}

impl Projection {
    pub fn new(entity: &'static str) -> Self {
        Self {
            entity,
            fields: Vec::new(),
        }
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn field(mut self, name: &'static str, rule: FieldRule) -> Self {
        self.fields.push((name, rule));
        self
    }

    /// Attribute copied verbatim under its own name.
    pub fn attr(self, name: &'static str) -> Self {
        self.field(
            name,
            FieldRule::Attr {
                source: name,
                coerce: Coerce::None,
            },
        )
    }

    pub fn attr_coerced(self, name: &'static str, coerce: Coerce) -> Self {
        self.field(
            name,
            FieldRule::Attr {
                source: name,
                coerce,
            },
        )
    }

    /// Conditionally included relation (omitted when not loaded).
    pub fn relation(self, name: &'static str, nested: Projection) -> Self {
        self.field(
            name,
            FieldRule::Relation {
                relation: name,
                nested: Box::new(nested),
                required: false,
            },
        )
    }

    /// Always-project relation: missing it from the loaded set is fatal.
    pub fn required_relation(self, name: &'static str, nested: Projection) -> Self {
        self.field(
            name,
            FieldRule::Relation {
                relation: name,
                nested: Box::new(nested),
                required: true,
            },
        )
    }

    pub fn computed(self, name: &'static str, computed: Computed) -> Self {
        self.field(name, FieldRule::Computed(computed))
    }

    /// Render `record` (plus explicitly loaded relations) into an
    /// external-facing representation.
    pub fn project(
        &self,
        record: &Record,
        loaded: &LoadedRelations,
    ) -> Result<Map<String, Value>, ProjectError> {
        let mut out = Map::new();

        for (name, rule) in &self.fields {
            match rule {
                FieldRule::Attr { source, coerce } => {
                    let raw = record.get(source).ok_or(ProjectError::MissingAttribute {
                        entity: self.entity,
                        field: name,
                    })?;
                    let coerced = coerce.apply(raw).ok_or(ProjectError::Coerce {
                        entity: self.entity,
                        field: name,
                    })?;
                    out.insert((*name).to_string(), coerced);
                }
                FieldRule::Relation {
                    relation,
                    nested,
                    required,
                } => match loaded.get(relation) {
                    Some(Loaded::One(Some(rec))) => {
                        let projected = nested.project(rec, &LoadedRelations::none())?;
                        out.insert((*name).to_string(), Value::Object(projected));
                    }
                    Some(Loaded::One(None)) => {
                        out.insert((*name).to_string(), Value::Null);
                    }
                    Some(Loaded::Many(records)) => {
                        let mut items = Vec::with_capacity(records.len());
                        for rec in records {
                            items.push(Value::Object(
                                nested.project(rec, &LoadedRelations::none())?,
                            ));
                        }
                        out.insert((*name).to_string(), Value::Array(items));
                    }
                    // A bare count cannot render records.
                    Some(Loaded::Count(_)) | None => {
                        if *required {
                            return Err(ProjectError::MissingRelation {
                                entity: self.entity,
                                field: name,
                            });
                        }
                    }
                },
                FieldRule::Computed(computed) => {
                    let value = computed.apply(self.entity, name, record, loaded)?;
                    out.insert((*name).to_string(), value);
                }
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    const SOURCE_LABELS: &[(&str, &str)] = &[
        ("invoice_payment", "Invoice payment"),
        ("expense", "Expense"),
    ];

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => Record::from(map),
            _ => panic!("test record must be an object"),
        }
    }

    fn cashbox_projection() -> Projection {
        Projection::new("cashbox")
            .attr("id")
            .attr("name")
            .attr("balance")
            .attr_coerced("is_active", Coerce::BoolFromInt)
            .relation("entries", entry_projection())
    }

    fn entry_projection() -> Projection {
        Projection::new("ledger_entry")
            .attr("id")
            .attr("amount")
            .computed(
                "type_label",
                Computed::Label {
                    source: "source_type",
                    table: SOURCE_LABELS,
                },
            )
    }

    #[test]
    fn projects_attributes_with_boolean_coercion_and_no_relation_keys() {
        let rec = record(json!({
            "id": 7,
            "name": "Box A",
            "balance": 120.50,
            "is_active": 1,
        }));

        let out = cashbox_projection()
            .project(&rec, &LoadedRelations::none())
            .unwrap();

        assert_eq!(
            Value::Object(out),
            json!({"id": 7, "name": "Box A", "balance": 120.50, "is_active": true})
        );
    }

    #[test]
    fn unloaded_relation_is_omitted_not_null() {
        let rec = record(json!({"id": 1, "name": "Box", "balance": 0.0, "is_active": 0}));
        let out = cashbox_projection()
            .project(&rec, &LoadedRelations::none())
            .unwrap();
        assert!(!out.contains_key("entries"));
    }

    #[test]
    fn loaded_relation_projects_recursively() {
        let rec = record(json!({"id": 1, "name": "Box", "balance": 10.0, "is_active": 1}));
        let entries = Loaded::Many(vec![record(json!({
            "id": 2,
            "amount": 10.0,
            "source_type": "invoice_payment",
        }))]);
        let loaded = LoadedRelations::new().with("entries", entries);

        let out = cashbox_projection().project(&rec, &loaded).unwrap();
        assert_eq!(
            out.get("entries"),
            Some(&json!([
                {"id": 2, "amount": 10.0, "type_label": "Invoice payment"}
            ]))
        );
    }

    #[test]
    fn loaded_null_to_one_relation_renders_null() {
        let projection = Projection::new("payment")
            .attr("id")
            .relation("invoice", Projection::new("invoice").attr("id"));
        let rec = record(json!({"id": 3}));
        let loaded = LoadedRelations::new().with("invoice", Loaded::One(None));

        let out = projection.project(&rec, &loaded).unwrap();
        assert_eq!(out.get("invoice"), Some(&Value::Null));
    }

    #[test]
    fn unmapped_discriminator_falls_back_to_raw_value() {
        let rec = record(json!({"id": 9, "amount": 5.0, "source_type": "correction"}));
        let out = entry_projection()
            .project(&rec, &LoadedRelations::none())
            .unwrap();
        assert_eq!(out.get("type_label"), Some(&json!("correction")));
    }

    #[test]
    fn required_relation_missing_is_fatal() {
        let projection = Projection::new("payment")
            .attr("id")
            .required_relation("invoice", Projection::new("invoice").attr("id"));
        let rec = record(json!({"id": 3}));

        let err = projection
            .project(&rec, &LoadedRelations::none())
            .unwrap_err();
        assert_eq!(
            err,
            ProjectError::MissingRelation {
                entity: "payment",
                field: "invoice"
            }
        );
    }

    #[test]
    fn missing_attribute_is_fatal() {
        let projection = Projection::new("cashbox").attr("name");
        let rec = record(json!({"id": 1}));
        assert_eq!(
            projection.project(&rec, &LoadedRelations::none()),
            Err(ProjectError::MissingAttribute {
                entity: "cashbox",
                field: "name"
            })
        );
    }

    #[test]
    fn date_format_renders_fixed_pattern() {
        let projection =
            Projection::new("entry").attr_coerced("occurred_at", Coerce::DateFormat("%d/%m/%Y"));
        let rec = record(json!({"occurred_at": "2026-03-09T14:30:00Z"}));
        let out = projection.project(&rec, &LoadedRelations::none()).unwrap();
        assert_eq!(out.get("occurred_at"), Some(&json!("09/03/2026")));
    }

    #[test]
    fn non_numeric_bool_coercion_is_a_coerce_error() {
        let projection = Projection::new("cashbox").attr_coerced("is_active", Coerce::BoolFromInt);
        let rec = record(json!({"is_active": "yes"}));
        assert_eq!(
            projection.project(&rec, &LoadedRelations::none()),
            Err(ProjectError::Coerce {
                entity: "cashbox",
                field: "is_active"
            })
        );
    }

    #[test]
    fn int_coercion_truncates_floats() {
        let projection = Projection::new("invoice").attr_coerced("number", Coerce::Int);
        let rec = record(json!({"number": 42.9}));
        let out = projection.project(&rec, &LoadedRelations::none()).unwrap();
        assert_eq!(out.get("number"), Some(&json!(42)));
    }

    #[test]
    fn precomputed_count_wins_over_loaded_relation() {
        let projection = Projection::new("category").computed(
            "expense_count",
            Computed::CountOf {
                relation: "expenses",
                precomputed: Some("expense_count"),
            },
        );
        let rec = record(json!({"expense_count": 12}));
        let loaded = LoadedRelations::new().with("expenses", Loaded::Count(3));

        let out = projection.project(&rec, &loaded).unwrap();
        assert_eq!(out.get("expense_count"), Some(&json!(12)));
    }

    #[test]
    fn null_precomputed_count_falls_back_to_loaded_relation() {
        let projection = Projection::new("category").computed(
            "expense_count",
            Computed::CountOf {
                relation: "expenses",
                precomputed: Some("expense_count"),
            },
        );
        let rec = record(json!({"expense_count": null}));
        let loaded = LoadedRelations::new().with("expenses", Loaded::Count(3));

        let out = projection.project(&rec, &loaded).unwrap();
        assert_eq!(out.get("expense_count"), Some(&json!(3)));
    }

    #[test]
    fn count_without_precomputed_or_loaded_relation_is_fatal() {
        let projection = Projection::new("category").computed(
            "expense_count",
            Computed::CountOf {
                relation: "expenses",
                precomputed: Some("expense_count"),
            },
        );
        let rec = record(json!({"expense_count": null}));
        assert_eq!(
            projection.project(&rec, &LoadedRelations::none()),
            Err(ProjectError::MissingRelation {
                entity: "category",
                field: "expense_count"
            })
        );
    }

    #[test]
    fn path_from_url_extracts_path_component() {
        let projection = Projection::new("payment").computed(
            "receipt_path",
            Computed::PathFromUrl {
                source: "receipt_url",
            },
        );
        let rec = record(json!({"receipt_url": "https://files.example.com/receipts/2026/r-17.pdf"}));
        let out = projection.project(&rec, &LoadedRelations::none()).unwrap();
        assert_eq!(out.get("receipt_path"), Some(&json!("/receipts/2026/r-17.pdf")));
    }

    #[test]
    fn path_from_url_passes_non_urls_through_raw() {
        let projection = Projection::new("payment").computed(
            "receipt_path",
            Computed::PathFromUrl {
                source: "receipt_url",
            },
        );
        let rec = record(json!({"receipt_url": "receipts/local.pdf"}));
        let out = projection.project(&rec, &LoadedRelations::none()).unwrap();
        assert_eq!(out.get("receipt_path"), Some(&json!("receipts/local.pdf")));
    }

    #[test]
    fn path_from_url_with_no_path_renders_root() {
        let projection = Projection::new("payment").computed(
            "receipt_path",
            Computed::PathFromUrl {
                source: "receipt_url",
            },
        );
        let rec = record(json!({"receipt_url": "https://files.example.com"}));
        let out = projection.project(&rec, &LoadedRelations::none()).unwrap();
        assert_eq!(out.get("receipt_path"), Some(&json!("/")));
    }

    proptest! {
        /// Boolean coercion is total over stored integers: any integer value
        /// coerces without error, and only zero maps to false.
        #[test]
        fn bool_from_int_is_total_over_integers(stored in any::<i64>()) {
            let projection =
                Projection::new("cashbox").attr_coerced("is_active", Coerce::BoolFromInt);
            let rec = record(json!({"is_active": stored}));
            let out = projection.project(&rec, &LoadedRelations::none()).unwrap();
            prop_assert_eq!(out.get("is_active"), Some(&json!(stored != 0)));
        }

        /// Label resolution never fails: every discriminator string renders,
        /// mapped or raw.
        #[test]
        fn label_lookup_is_total_over_strings(discriminator in ".*") {
            let projection = Projection::new("entry").computed(
                "type_label",
                Computed::Label { source: "source_type", table: SOURCE_LABELS },
            );
            let rec = record(json!({"source_type": discriminator.clone()}));
            let out = projection.project(&rec, &LoadedRelations::none()).unwrap();
            let rendered = out.get("type_label").and_then(|v| v.as_str()).unwrap();
            let expected = SOURCE_LABELS
                .iter()
                .find(|(k, _)| *k == discriminator)
                .map(|(_, label)| *label)
                .unwrap_or(discriminator.as_str());
            prop_assert_eq!(rendered, expected);
        }
    }
}
