//! Flattening the nested resource tree into method records.
//!
//! Discovery documents nest methods under arbitrarily deep resource groups;
//! the generator wants a flat, deterministically ordered list. The resource
//! path prefix goes into the method identifiers, which is what keeps them
//! unique across the whole document.

use serde_json::Value as JsonValue;

use crate::error::{Error, Result};
use crate::naming::{camel_join, pascal_join};
use crate::schema::Schema;

/// One API method after resource-tree traversal.
#[derive(Debug, Clone)]
pub struct MethodRecord {
    pub http_method: String,
    pub path: String,
    pub request: Option<Schema>,
    pub response: Option<Schema>,
    /// Fully qualified camelCase identifier, e.g. `projectsLocationsGet`
    pub camel_name: String,
    /// Fully qualified PascalCase identifier, e.g. `ProjectsLocationsGet`
    pub pascal_name: String,
    /// Path-bound parameters, sorted by name; all required
    pub path_params: Vec<(String, Schema)>,
    /// Query-bound parameters, sorted by name
    pub query_params: Vec<(String, Schema)>,
    pub description: Option<String>,
}

/// Walk `resources` depth-first and return the method records sorted by
/// camelCase name. The ordering is observable in generated output, so it must
/// be stable for a given document.
pub fn flatten_resources(resources: &JsonValue) -> Result<Vec<MethodRecord>> {
    let mut records = Vec::new();
    let mut prefix = Vec::new();
    walk(resources, &mut prefix, &mut records)?;
    records.sort_by(|a, b| a.camel_name.cmp(&b.camel_name));
    Ok(records)
}

fn walk(
    resources: &JsonValue,
    prefix: &mut Vec<String>,
    out: &mut Vec<MethodRecord>,
) -> Result<()> {
    let Some(map) = resources.as_object() else {
        return Ok(());
    };
    for (resource_name, resource) in map {
        prefix.push(resource_name.clone());
        if let Some(methods) = resource.get("methods").and_then(JsonValue::as_object) {
            for (method_name, method) in methods {
                out.push(method_record(prefix, method_name, method)?);
            }
        }
        if let Some(children) = resource.get("resources") {
            walk(children, prefix, out)?;
        }
        prefix.pop();
    }
    Ok(())
}

fn method_record(prefix: &[String], name: &str, method: &JsonValue) -> Result<MethodRecord> {
    let mut segments: Vec<&str> = prefix.iter().map(String::as_str).collect();
    segments.push(name);
    let camel_name = camel_join(&segments);
    let pascal_name = pascal_join(&segments);

    let http_method = method
        .get("httpMethod")
        .and_then(JsonValue::as_str)
        .unwrap_or("GET")
        .to_string();
    let path = method
        .get("path")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| Error::schema(format!("method `{camel_name}` is missing path")))?
        .to_string();
    let description = method
        .get("description")
        .and_then(JsonValue::as_str)
        .map(String::from);
    let request = parse_schema(method.get("request"))?;
    let response = parse_schema(method.get("response"))?;

    let mut path_params = Vec::new();
    let mut query_params = Vec::new();
    if let Some(parameters) = method.get("parameters").and_then(JsonValue::as_object) {
        for (param_name, param) in parameters {
            let schema: Schema = serde_json::from_value(param.clone())?;
            match schema.location.as_deref() {
                Some("path") => {
                    if !schema.is_required() {
                        return Err(Error::schema(format!(
                            "path parameter `{param_name}` of method `{camel_name}` \
                             must be required"
                        )));
                    }
                    path_params.push((param_name.clone(), schema));
                }
                Some("query") => query_params.push((param_name.clone(), schema)),
                // Other locations (header, body annotations) are not bound here
                _ => {}
            }
        }
    }
    path_params.sort_by(|a, b| a.0.cmp(&b.0));
    query_params.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(MethodRecord {
        http_method,
        path,
        request,
        response,
        camel_name,
        pascal_name,
        path_params,
        query_params,
        description,
    })
}

fn parse_schema(value: Option<&JsonValue>) -> Result<Option<Schema>> {
    match value {
        None => Ok(None),
        Some(v) => Ok(Some(serde_json::from_value(v.clone())?)),
    }
}
