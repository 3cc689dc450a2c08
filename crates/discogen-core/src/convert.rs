//! Decides which schemas need wire ↔ runtime conversion.
//!
//! A schema is conversion-required when marshalling it between wire JSON and
//! its ergonomic runtime form does nontrivial work somewhere: formatted
//! strings (bytes, 64-bit integers, instants), or any reachable member that
//! does. Codecs are emitted for exactly the conversion-required schemas, so
//! this predicate is the single source of truth for codec existence.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::schema::{Items, Schema, SchemaMap, Shape};

/// Whether `schema` requires a serializer/deserializer pair.
///
/// Each call is an independent query: the ref-tracking state is fresh, so an
/// early answer for one schema can never poison another.
pub fn is_conversion_required(schemas: &SchemaMap, schema: &Schema) -> Result<bool> {
    let mut in_progress = HashSet::new();
    conversion_required(schemas, schema, &mut in_progress)
}

/// `in_progress` holds the refs currently being expanded on this query's
/// call stack. Hitting one again means the graph cycled back: the member is
/// classified conversion-required so the cycle participants get named codecs
/// that delegate to each other, and recursion stops. Refs are removed on the
/// way out, so a schema shared by two siblings (a diamond, not a cycle) is
/// re-examined on its own merits.
fn conversion_required(
    schemas: &SchemaMap,
    schema: &Schema,
    in_progress: &mut HashSet<String>,
) -> Result<bool> {
    match schema.shape()? {
        Shape::Any | Shape::Boolean | Shape::Integer | Shape::Number => Ok(false),
        Shape::String { format, .. } => Ok(format.is_some()),
        Shape::Array(items) => match items {
            Items::One(inner) => conversion_required(schemas, inner, in_progress),
            Items::Tuple(members) => {
                for member in members {
                    if conversion_required(schemas, member, in_progress)? {
                        return Err(Error::schema(format!(
                            "tuple-typed array items on schema `{}` cannot require conversion",
                            schema.id.as_deref().unwrap_or("<anonymous>")
                        )));
                    }
                }
                Ok(false)
            }
        },
        Shape::Object { properties, additional } => {
            let mut props_convert = false;
            if let Some(properties) = properties {
                for prop in properties.values() {
                    if prop.is_read_only() {
                        continue;
                    }
                    if conversion_required(schemas, prop, in_progress)? {
                        props_convert = true;
                    }
                }
            }
            let mut additional_convert = false;
            if let Some(additional) = additional {
                additional_convert = conversion_required(schemas, additional, in_progress)?;
            }
            if props_convert && additional_convert {
                return Err(Error::schema(format!(
                    "schema `{}` mixes conversion-requiring properties with \
                     conversion-requiring additionalProperties",
                    schema.id.as_deref().unwrap_or("<anonymous>")
                )));
            }
            Ok(props_convert || additional_convert)
        }
        Shape::Ref(name) => {
            if in_progress.contains(name) {
                return Ok(true);
            }
            let target = schemas
                .get(name)
                .ok_or_else(|| Error::schema(format!("unresolved $ref `{name}`")))?;
            in_progress.insert(name.to_string());
            let result = conversion_required(schemas, target, in_progress);
            in_progress.remove(name);
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(value: serde_json::Value) -> SchemaMap {
        serde_json::from_value(value).unwrap()
    }

    fn node(value: serde_json::Value) -> Schema {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_primitives_need_nothing() {
        let schemas = SchemaMap::new();
        for value in [
            json!({"type": "any"}),
            json!({"type": "boolean"}),
            json!({"type": "integer"}),
            json!({"type": "number"}),
            json!({"type": "string"}),
            json!({"type": "string", "enum": ["A", "B"]}),
        ] {
            assert!(!is_conversion_required(&schemas, &node(value)).unwrap());
        }
    }

    #[test]
    fn test_formatted_strings_convert() {
        let schemas = SchemaMap::new();
        for format in ["byte", "int64", "uint64", "date", "date-time", "google-datetime"] {
            let n = node(json!({"type": "string", "format": format}));
            assert!(is_conversion_required(&schemas, &n).unwrap(), "format {format}");
        }
        // Identity codecs, but still classified as conversion-required
        for format in ["google-duration", "google-fieldmask"] {
            let n = node(json!({"type": "string", "format": format}));
            assert!(is_conversion_required(&schemas, &n).unwrap(), "format {format}");
        }
    }

    #[test]
    fn test_object_scans_properties() {
        let schemas = SchemaMap::new();
        let plain = node(json!({"type": "object", "properties": {"a": {"type": "string"}}}));
        assert!(!is_conversion_required(&schemas, &plain).unwrap());
        let converting = node(json!({"type": "object", "properties": {
            "a": {"type": "string"},
            "b": {"type": "string", "format": "int64"}
        }}));
        assert!(is_conversion_required(&schemas, &converting).unwrap());
    }

    #[test]
    fn test_read_only_properties_are_skipped() {
        let schemas = SchemaMap::new();
        let n = node(json!({"type": "object", "properties": {
            "stamp": {"type": "string", "format": "date-time", "readOnly": true}
        }}));
        assert!(!is_conversion_required(&schemas, &n).unwrap());
    }

    #[test]
    fn test_ref_recurses_through_table() {
        let schemas = table(json!({
            "Wrapper": {"id": "Wrapper", "type": "object",
                        "properties": {"inner": {"$ref": "Inner"}}},
            "Inner": {"id": "Inner", "type": "object",
                      "properties": {"n": {"type": "string", "format": "uint64"}}},
            "Plain": {"id": "Plain", "type": "string"}
        }));
        assert!(is_conversion_required(&schemas, &schemas["Wrapper"]).unwrap());
        assert!(!is_conversion_required(&schemas, &node(json!({"$ref": "Plain"}))).unwrap());
    }

    #[test]
    fn test_unresolved_ref_is_fatal() {
        let schemas = SchemaMap::new();
        assert!(is_conversion_required(&schemas, &node(json!({"$ref": "Missing"}))).is_err());
    }

    #[test]
    fn test_self_cycle_terminates_and_converts() {
        let schemas = table(json!({
            "Node": {"id": "Node", "type": "object",
                     "properties": {"child": {"$ref": "Node"}}}
        }));
        assert!(is_conversion_required(&schemas, &schemas["Node"]).unwrap());
    }

    #[test]
    fn test_mutual_cycle_terminates() {
        let schemas = table(json!({
            "A": {"id": "A", "type": "object", "properties": {"b": {"$ref": "B"}}},
            "B": {"id": "B", "type": "object", "properties": {"a": {"$ref": "A"}}}
        }));
        assert!(is_conversion_required(&schemas, &schemas["A"]).unwrap());
        assert!(is_conversion_required(&schemas, &schemas["B"]).unwrap());
    }

    #[test]
    fn test_diamond_sharing_is_not_a_cycle() {
        let schemas = table(json!({
            "Top": {"id": "Top", "type": "object", "properties": {
                "left": {"$ref": "Leaf"},
                "right": {"$ref": "Leaf"}
            }},
            "Leaf": {"id": "Leaf", "type": "object",
                     "properties": {"s": {"type": "string"}}}
        }));
        assert!(!is_conversion_required(&schemas, &schemas["Top"]).unwrap());
    }

    #[test]
    fn test_queries_are_independent() {
        let schemas = table(json!({
            "Node": {"id": "Node", "type": "object",
                     "properties": {"child": {"$ref": "Node"}}},
            "Plain": {"id": "Plain", "type": "object",
                      "properties": {"s": {"type": "string"}}}
        }));
        assert!(is_conversion_required(&schemas, &schemas["Node"]).unwrap());
        // A later query must not observe state from the earlier one
        assert!(!is_conversion_required(&schemas, &schemas["Plain"]).unwrap());
    }

    #[test]
    fn test_mixed_map_and_properties_assertion() {
        let schemas = SchemaMap::new();
        let n = node(json!({"type": "object",
            "properties": {"a": {"type": "string", "format": "int64"}},
            "additionalProperties": {"type": "string", "format": "byte"}
        }));
        assert!(is_conversion_required(&schemas, &n).is_err());
    }

    #[test]
    fn test_tuple_items_with_conversion_is_fatal() {
        let schemas = SchemaMap::new();
        let n = node(json!({"type": "array",
            "items": [{"type": "string"}, {"type": "string", "format": "int64"}]}));
        assert!(is_conversion_required(&schemas, &n).is_err());
        let plain = node(json!({"type": "array",
            "items": [{"type": "string"}, {"type": "integer"}]}));
        assert!(!is_conversion_required(&schemas, &plain).unwrap());
    }
}
