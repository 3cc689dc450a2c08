//! TypeScript type expressions for Discovery type nodes.

use crate::error::Result;
use crate::naming::{escape_ts_string, property_key};
use crate::schema::{Items, Schema, Shape, StringFormat};

/// Print the TypeScript type for one Discovery node.
///
/// `$ref` nodes print the bare schema name; forward references are fine
/// because all type declarations land in the same module.
pub fn ts_type(schema: &Schema) -> Result<String> {
    let base = match schema.shape()? {
        Shape::Any => "any".to_string(),
        Shape::Boolean => "boolean".to_string(),
        Shape::Integer | Shape::Number => "number".to_string(),
        Shape::String { format, enum_values } => string_type(format, enum_values),
        Shape::Array(items) => array_type(items)?,
        Shape::Object { properties: Some(properties), .. } => {
            let mut fields = Vec::with_capacity(properties.len());
            for (name, prop) in properties {
                let marker = if prop.is_required() { "" } else { "?" };
                fields.push(format!("{}{marker}: {}", property_key(name), ts_type(prop)?));
            }
            if fields.is_empty() {
                "{ [key: string]: any }".to_string()
            } else {
                format!("{{ {} }}", fields.join("; "))
            }
        }
        Shape::Object { additional: Some(inner), .. } => {
            format!("{{ [key: string]: {} }}", ts_type(inner)?)
        }
        Shape::Object { .. } => "{ [key: string]: any }".to_string(),
        Shape::Ref(name) => name.to_string(),
    };
    if schema.is_repeated() {
        Ok(format!("{}[]", parenthesize(&base)))
    } else {
        Ok(base)
    }
}

fn string_type(format: Option<StringFormat>, enum_values: Option<&[String]>) -> String {
    if let Some(values) = enum_values {
        if !values.is_empty() {
            return values
                .iter()
                .map(|v| format!("\"{}\"", escape_ts_string(v)))
                .collect::<Vec<_>>()
                .join(" | ");
        }
    }
    match format {
        Some(StringFormat::Byte) => "Uint8Array".to_string(),
        Some(StringFormat::Int64) | Some(StringFormat::Uint64) => "bigint".to_string(),
        Some(StringFormat::Date)
        | Some(StringFormat::DateTime)
        | Some(StringFormat::GoogleDatetime) => "Date".to_string(),
        Some(StringFormat::GoogleDuration) => "number /* Duration */".to_string(),
        Some(StringFormat::GoogleFieldmask) => "string /* FieldMask */".to_string(),
        None => "string".to_string(),
    }
}

fn array_type(items: &Items) -> Result<String> {
    let element = match items {
        Items::One(inner) => ts_type(inner)?,
        // Tuple form is flattened to a homogeneous array over the union of
        // its member types.
        Items::Tuple(members) => {
            let mut parts = Vec::with_capacity(members.len());
            for member in members {
                parts.push(ts_type(member)?);
            }
            parts.join(" | ")
        }
    };
    Ok(format!("{}[]", parenthesize(&element)))
}

/// Array element positions need parentheses around anything that is not a
/// single bare identifier.
fn parenthesize(ty: &str) -> String {
    if ty.chars().all(|c| c.is_ascii_alphanumeric()) {
        ty.to_string()
    } else {
        format!("({ty})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn print(value: serde_json::Value) -> String {
        let schema: Schema = serde_json::from_value(value).unwrap();
        ts_type(&schema).unwrap()
    }

    #[test]
    fn test_primitives() {
        assert_eq!(print(json!({"type": "any"})), "any");
        assert_eq!(print(json!({"type": "boolean"})), "boolean");
        assert_eq!(print(json!({"type": "integer"})), "number");
        assert_eq!(print(json!({"type": "number"})), "number");
        assert_eq!(print(json!({"type": "string"})), "string");
    }

    #[test]
    fn test_string_formats() {
        assert_eq!(print(json!({"type": "string", "format": "byte"})), "Uint8Array");
        assert_eq!(print(json!({"type": "string", "format": "int64"})), "bigint");
        assert_eq!(print(json!({"type": "string", "format": "uint64"})), "bigint");
        assert_eq!(print(json!({"type": "string", "format": "date-time"})), "Date");
        assert_eq!(
            print(json!({"type": "string", "format": "google-duration"})),
            "number /* Duration */"
        );
        assert_eq!(
            print(json!({"type": "string", "format": "google-fieldmask"})),
            "string /* FieldMask */"
        );
    }

    #[test]
    fn test_enum_union() {
        assert_eq!(
            print(json!({"type": "string", "enum": ["ACTIVE", "DELETED"]})),
            "\"ACTIVE\" | \"DELETED\""
        );
    }

    #[test]
    fn test_arrays() {
        assert_eq!(print(json!({"type": "array", "items": {"type": "string"}})), "string[]");
        assert_eq!(
            print(json!({"type": "array", "items": {"type": "string", "enum": ["A", "B"]}})),
            "(\"A\" | \"B\")[]"
        );
        assert_eq!(
            print(json!({"type": "array", "items": [{"type": "string"}, {"type": "integer"}]})),
            "(string | number)[]"
        );
    }

    #[test]
    fn test_repeated_wraps_as_array() {
        assert_eq!(print(json!({"type": "string", "repeated": true})), "string[]");
        assert_eq!(
            print(json!({"type": "string", "format": "int64", "repeated": true})),
            "bigint[]"
        );
        assert_eq!(
            print(json!({"type": "string", "format": "google-duration", "repeated": true})),
            "(number /* Duration */)[]"
        );
    }

    #[test]
    fn test_objects() {
        assert_eq!(
            print(json!({"type": "object", "properties": {
                "name": {"type": "string"},
                "count": {"type": "integer", "required": true}
            }})),
            "{ count: number; name?: string }"
        );
        assert_eq!(
            print(json!({"type": "object", "additionalProperties": {"type": "number"}})),
            "{ [key: string]: number }"
        );
        assert_eq!(print(json!({"type": "object"})), "{ [key: string]: any }");
    }

    #[test]
    fn test_dotted_property_key_is_quoted() {
        assert_eq!(
            print(json!({"type": "object", "properties": {"a.b": {"type": "string"}}})),
            "{ \"a.b\"?: string }"
        );
    }

    #[test]
    fn test_ref_prints_bare_name() {
        assert_eq!(print(json!({"$ref": "Thing"})), "Thing");
    }
}
