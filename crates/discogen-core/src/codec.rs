//! Serializer/deserializer emission for conversion-requiring schemas.
//!
//! Each conversion-requiring schema `X` gets a matched pair of top-level
//! functions `serializeX` / `deserializeX`. Both are structural: they spread
//! the input and override exactly the members whose wire and runtime forms
//! differ. `$ref` members delegate by function name, which is what makes
//! cyclic schema graphs safe: the binding resolves at call time, after every
//! codec has been emitted.

use crate::convert::is_conversion_required;
use crate::error::{Error, Result};
use crate::naming::{escape_ts_string, property_key};
use crate::schema::{Items, Schema, SchemaMap, Shape, StringFormat};
use crate::writer::CodeWriter;

/// Which half of a codec pair is being emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// runtime → wire
    Serialize,
    /// wire → runtime
    Deserialize,
}

impl Direction {
    pub fn fn_prefix(self) -> &'static str {
        match self {
            Self::Serialize => "serialize",
            Self::Deserialize => "deserialize",
        }
    }
}

/// Tracks which base64 helpers the emitted codecs ended up needing.
/// Owned per generator instance; each helper is emitted at most once.
#[derive(Debug, Default)]
pub struct Prelude {
    pub needs_base64_encoder: bool,
    pub needs_base64_decoder: bool,
}

/// Emit the `serializeX` and `deserializeX` functions for schema `name`,
/// each preceded by a blank line.
pub fn emit_codecs(
    w: &mut CodeWriter,
    name: &str,
    schema: &Schema,
    schemas: &SchemaMap,
    prelude: &mut Prelude,
) -> Result<()> {
    for direction in [Direction::Serialize, Direction::Deserialize] {
        w.blank();
        emit_codec_fn(w, name, schema, schemas, direction, prelude)?;
    }
    Ok(())
}

fn emit_codec_fn(
    w: &mut CodeWriter,
    name: &str,
    schema: &Schema,
    schemas: &SchemaMap,
    direction: Direction,
    prelude: &mut Prelude,
) -> Result<()> {
    w.line(&format!("function {}{name}(data: any): {name} {{", direction.fn_prefix()));
    w.push();
    match schema.shape()? {
        Shape::Object { properties: Some(properties), .. } => {
            let mut overrides = Vec::new();
            for (prop_name, prop) in properties {
                if direction == Direction::Serialize && prop.is_read_only() {
                    continue;
                }
                if !is_conversion_required(schemas, prop)? {
                    continue;
                }
                let access = format!("data[\"{}\"]", escape_ts_string(prop_name));
                let expr = conversion_expr(prop, &access, direction, schemas, prelude)?;
                let key = property_key(prop_name);
                if prop.is_required() {
                    overrides.push(format!("{key}: {expr},"));
                } else {
                    overrides.push(format!("{key}: {access} !== undefined ? {expr} : undefined,"));
                }
            }
            w.line("return {");
            w.push();
            w.line("...data,");
            for line in overrides {
                w.line(&line);
            }
            w.pop();
            w.line("};");
        }
        Shape::Object { additional: Some(inner), .. } => {
            let expr = conversion_expr(inner, "v", direction, schemas, prelude)?;
            w.line("return Object.fromEntries(Object.entries(data).map(([k, v]: [string, any]) => ([");
            w.push();
            w.line("k,");
            w.line(&format!("{expr},"));
            w.pop();
            w.line("])));");
        }
        Shape::Array(Items::One(inner)) => {
            let expr = conversion_expr(inner, "item", direction, schemas, prelude)?;
            w.line(&format!("return data.map((item: any) => ({expr}));"));
        }
        Shape::Ref(target) => {
            w.line(&format!("return {}{target}(data);", direction.fn_prefix()));
        }
        Shape::String { .. } => {
            let expr = conversion_expr(schema, "data", direction, schemas, prelude)?;
            w.line(&format!("return {expr};"));
        }
        _ => {
            return Err(Error::schema(format!(
                "codec requested for schema `{name}` which has no convertible shape"
            )));
        }
    }
    w.pop();
    w.line("}");
    Ok(())
}

/// Build the expression converting `value` between wire and runtime form for
/// one type node. Nested containers recurse; `$ref` members delegate to the
/// referenced schema's codec by name. Also used by the method emitter for
/// request, response, and parameter conversion.
pub(crate) fn conversion_expr(
    schema: &Schema,
    value: &str,
    direction: Direction,
    schemas: &SchemaMap,
    prelude: &mut Prelude,
) -> Result<String> {
    if schema.is_repeated() {
        let mut element = schema.clone();
        element.repeated = None;
        let inner = conversion_expr(&element, "item", direction, schemas, prelude)?;
        return Ok(format!("{value}.map((item: any) => ({inner}))"));
    }
    match schema.shape()? {
        Shape::String { format: Some(format), .. } => {
            Ok(leaf_expr(format, value, direction, prelude))
        }
        Shape::Array(Items::One(inner)) => {
            let expr = conversion_expr(inner, "item", direction, schemas, prelude)?;
            Ok(format!("{value}.map((item: any) => ({expr}))"))
        }
        Shape::Array(Items::Tuple(_)) => Err(Error::schema(format!(
            "tuple-typed array items on schema `{}` have no codec",
            schema.id.as_deref().unwrap_or("<anonymous>")
        ))),
        Shape::Ref(name) => Ok(format!("{}{name}({value})", direction.fn_prefix())),
        Shape::Object { properties: Some(properties), .. } => {
            let mut overrides = Vec::new();
            for (prop_name, prop) in properties {
                if direction == Direction::Serialize && prop.is_read_only() {
                    continue;
                }
                if !is_conversion_required(schemas, prop)? {
                    continue;
                }
                let access = format!("{value}[\"{}\"]", escape_ts_string(prop_name));
                let expr = conversion_expr(prop, &access, direction, schemas, prelude)?;
                let key = property_key(prop_name);
                if prop.is_required() {
                    overrides.push(format!("{key}: {expr}"));
                } else {
                    overrides.push(format!("{key}: {access} !== undefined ? {expr} : undefined"));
                }
            }
            if overrides.is_empty() {
                Ok(value.to_string())
            } else {
                Ok(format!("{{ ...{value}, {} }}", overrides.join(", ")))
            }
        }
        Shape::Object { additional: Some(inner), .. } => {
            let expr = conversion_expr(inner, "v", direction, schemas, prelude)?;
            Ok(format!(
                "Object.fromEntries(Object.entries({value}).map(([k, v]: [string, any]) => ([k, {expr}])))"
            ))
        }
        // No conversion work: pass the value through
        _ => Ok(value.to_string()),
    }
}

fn leaf_expr(
    format: StringFormat,
    value: &str,
    direction: Direction,
    prelude: &mut Prelude,
) -> String {
    match (format, direction) {
        (StringFormat::Byte, Direction::Serialize) => {
            prelude.needs_base64_encoder = true;
            format!("encodeBase64({value})")
        }
        (StringFormat::Byte, Direction::Deserialize) => {
            prelude.needs_base64_decoder = true;
            format!("decodeBase64({value} as string)")
        }
        (StringFormat::Int64 | StringFormat::Uint64, Direction::Serialize) => {
            format!("String({value})")
        }
        (StringFormat::Int64 | StringFormat::Uint64, Direction::Deserialize) => {
            format!("BigInt({value})")
        }
        (
            StringFormat::Date | StringFormat::DateTime | StringFormat::GoogleDatetime,
            Direction::Serialize,
        ) => format!("{value}.toISOString()"),
        (
            StringFormat::Date | StringFormat::DateTime | StringFormat::GoogleDatetime,
            Direction::Deserialize,
        ) => format!("new Date({value})"),
        // Durations and field masks keep their wire form for now
        (StringFormat::GoogleDuration | StringFormat::GoogleFieldmask, _) => value.to_string(),
    }
}

const BASE64_ABC: &str = r#"const base64abc = [
  "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O",
  "P", "Q", "R", "S", "T", "U", "V", "W", "X", "Y", "Z", "a", "b", "c", "d",
  "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q", "r", "s",
  "t", "u", "v", "w", "x", "y", "z", "0", "1", "2", "3", "4", "5", "6", "7",
  "8", "9", "+", "/",
];
"#;

const BASE64_ENCODER: &str = r#"/**
 * CREDIT: https://gist.github.com/enepomnyaschih/72c423f727d395eeaa09697058238727
 * Encodes a given Uint8Array into RFC 4648 base64 representation.
 */
function encodeBase64(bytes: Uint8Array): string {
  let result = "";
  let i;
  const l = bytes.length;
  for (i = 2; i < l; i += 3) {
    result += base64abc[bytes[i - 2] >> 2];
    result += base64abc[((bytes[i - 2] & 0x03) << 4) | (bytes[i - 1] >> 4)];
    result += base64abc[((bytes[i - 1] & 0x0f) << 2) | (bytes[i] >> 6)];
    result += base64abc[bytes[i] & 0x3f];
  }
  if (i === l + 1) {
    // 1 octet yet to write
    result += base64abc[bytes[i - 2] >> 2];
    result += base64abc[(bytes[i - 2] & 0x03) << 4];
    result += "==";
  }
  if (i === l) {
    // 2 octets yet to write
    result += base64abc[bytes[i - 2] >> 2];
    result += base64abc[((bytes[i - 2] & 0x03) << 4) | (bytes[i - 1] >> 4)];
    result += base64abc[(bytes[i - 1] & 0x0f) << 2];
    result += "=";
  }
  return result;
}
"#;

const BASE64_DECODER: &str = r#"/**
 * Decodes a base64 string using the standard alphabet into a Uint8Array.
 */
function decodeBase64(b64: string): Uint8Array {
  const binString = atob(b64);
  const size = binString.length;
  const bytes = new Uint8Array(size);
  for (let i = 0; i < size; i++) {
    bytes[i] = binString.charCodeAt(i);
  }
  return bytes;
}
"#;

/// Append the base64 helpers that emitted codecs referenced, if any.
pub fn emit_base64_prelude(w: &mut CodeWriter, prelude: &Prelude) {
    if prelude.needs_base64_encoder {
        w.blank();
        w.raw(BASE64_ABC);
        w.blank();
        w.raw(BASE64_ENCODER);
    }
    if prelude.needs_base64_decoder {
        w.blank();
        w.raw(BASE64_DECODER);
    }
}
