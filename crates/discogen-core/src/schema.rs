//! Typed views over Discovery schema nodes.
//!
//! Discovery type nodes are open JSON objects; this module deserializes them
//! into a `Schema` struct and classifies each node into a `Shape`, the tagged
//! union the rest of the generator matches on. Classification is where the
//! unsupported-type and missing-items assertions live.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The schema table of one Discovery document, keyed by schema id.
pub type SchemaMap = BTreeMap<String, Schema>;

/// A single Discovery type node.
///
/// Every field is optional on the wire; which combination is populated decides
/// the node's [`Shape`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Schema {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub format: Option<String>,
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<String>>,
    pub items: Option<Box<Items>>,
    pub properties: Option<BTreeMap<String, Schema>>,
    pub additional_properties: Option<Box<Schema>>,
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    pub description: Option<String>,
    pub required: Option<bool>,
    pub read_only: Option<bool>,
    pub repeated: Option<bool>,
    /// Parameter nodes carry their binding site ("path" or "query").
    pub location: Option<String>,
}

/// `items` is usually a single node, but tuple form is accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Items {
    One(Schema),
    Tuple(Vec<Schema>),
}

/// String formats with dedicated runtime representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    /// Base64-encoded bytes (`Uint8Array` at runtime)
    Byte,
    /// 64-bit signed integer carried as a decimal string (`bigint` at runtime)
    Int64,
    /// 64-bit unsigned integer carried as a decimal string (`bigint` at runtime)
    Uint64,
    /// Calendar date (`Date` at runtime)
    Date,
    /// RFC 3339 timestamp (`Date` at runtime)
    DateTime,
    /// RFC 3339 timestamp, google flavor (`Date` at runtime)
    GoogleDatetime,
    /// Duration string; carried through unchanged
    GoogleDuration,
    /// Field mask string; carried through unchanged
    GoogleFieldmask,
}

impl StringFormat {
    /// Parse a Discovery `format` annotation. Formats outside the known set
    /// (e.g. `email`) have no dedicated runtime type and map to `None`.
    pub fn parse(format: &str) -> Option<Self> {
        match format {
            "byte" => Some(Self::Byte),
            "int64" => Some(Self::Int64),
            "uint64" => Some(Self::Uint64),
            "date" => Some(Self::Date),
            "date-time" => Some(Self::DateTime),
            "google-datetime" => Some(Self::GoogleDatetime),
            "google-duration" => Some(Self::GoogleDuration),
            "google-fieldmask" => Some(Self::GoogleFieldmask),
            _ => None,
        }
    }
}

/// Classified view of a [`Schema`] node.
#[derive(Debug, Clone, Copy)]
pub enum Shape<'a> {
    Any,
    Boolean,
    Integer,
    Number,
    String {
        format: Option<StringFormat>,
        enum_values: Option<&'a [String]>,
    },
    Array(&'a Items),
    Object {
        properties: Option<&'a BTreeMap<String, Schema>>,
        additional: Option<&'a Schema>,
    },
    Ref(&'a str),
}

impl Schema {
    /// Classify this node. `$ref` wins over everything else; an `object` tag
    /// (or untyped node carrying object members) becomes [`Shape::Object`].
    pub fn shape(&self) -> Result<Shape<'_>> {
        if let Some(reference) = &self.reference {
            return Ok(Shape::Ref(reference));
        }
        match self.kind.as_deref() {
            Some("any") => Ok(Shape::Any),
            Some("boolean") => Ok(Shape::Boolean),
            Some("integer") => Ok(Shape::Integer),
            Some("number") => Ok(Shape::Number),
            Some("string") => Ok(Shape::String {
                format: self.format.as_deref().and_then(StringFormat::parse),
                enum_values: self.enum_values.as_deref(),
            }),
            Some("array") => {
                let items = self.items.as_deref().ok_or_else(|| {
                    Error::schema(format!(
                        "array schema `{}` is missing items",
                        self.id.as_deref().unwrap_or("<anonymous>")
                    ))
                })?;
                Ok(Shape::Array(items))
            }
            Some("object") => Ok(Shape::Object {
                properties: self.properties.as_ref(),
                additional: self.additional_properties.as_deref(),
            }),
            None if self.properties.is_some() || self.additional_properties.is_some() => {
                Ok(Shape::Object {
                    properties: self.properties.as_ref(),
                    additional: self.additional_properties.as_deref(),
                })
            }
            other => Err(Error::schema(format!(
                "unsupported type tag `{}` on schema `{}`",
                other.unwrap_or("<none>"),
                self.id.as_deref().unwrap_or("<anonymous>")
            ))),
        }
    }

    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only.unwrap_or(false)
    }

    pub fn is_repeated(&self) -> bool {
        self.repeated.unwrap_or(false)
    }
}
