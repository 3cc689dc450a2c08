//! Method emission: one generated client function per method record.

use std::collections::BTreeMap;

use regex::Regex;

use crate::codec::{conversion_expr, Direction, Prelude};
use crate::convert::is_conversion_required;
use crate::error::{Error, Result};
use crate::flatten::MethodRecord;
use crate::naming::{escape_ts_string, member_expr};
use crate::schema::{Schema, SchemaMap};
use crate::types::ts_type;
use crate::writer::CodeWriter;

/// Insert a synthetic `<PascalName>Options` object schema for every method
/// with query parameters. Runs before the type and codec passes so the
/// options types sort into the output alongside the document's own schemas.
pub fn register_options_schemas(
    records: &[MethodRecord],
    schemas: &mut SchemaMap,
    class_name: &str,
) -> Result<()> {
    for record in records {
        if record.query_params.is_empty() {
            continue;
        }
        let name = format!("{}Options", record.pascal_name);
        if schemas.contains_key(&name) {
            return Err(Error::schema(format!(
                "synthetic options schema `{name}` collides with a document schema"
            )));
        }
        let mut properties = BTreeMap::new();
        for (param_name, schema) in &record.query_params {
            properties.insert(param_name.clone(), schema.clone());
        }
        schemas.insert(
            name.clone(),
            Schema {
                id: Some(name),
                kind: Some("object".to_string()),
                description: Some(format!(
                    "Additional options for {class_name}#{}.",
                    record.camel_name
                )),
                properties: Some(properties),
                ..Default::default()
            },
        );
    }
    Ok(())
}

/// Emit one method body at the current indentation (inside the primary
/// class). Assumes `register_options_schemas` already ran over `schemas`.
pub fn emit_method(
    w: &mut CodeWriter,
    record: &MethodRecord,
    schemas: &SchemaMap,
    prelude: &mut Prelude,
) -> Result<()> {
    let param_docs: Vec<(String, Option<String>)> = record
        .path_params
        .iter()
        .map(|(name, schema)| (name.clone(), schema.description.clone()))
        .collect();
    w.doc(record.description.as_deref(), &param_docs);

    let mut args = Vec::new();
    for (name, schema) in &record.path_params {
        args.push(format!("{name}: {}", ts_type(schema)?));
    }
    if let Some(request) = &record.request {
        args.push(format!("req: {}", ts_type(request)?));
    }
    if !record.query_params.is_empty() {
        args.push(format!("opts: {}Options = {{}}", record.pascal_name));
    }
    let return_type = match &record.response {
        Some(response) => ts_type(response)?,
        None => "void".to_string(),
    };
    w.line(&format!(
        "async {}({}): Promise<{return_type}> {{",
        record.camel_name,
        args.join(", ")
    ));
    w.push();

    // Runtime → wire conversion of every parameter that needs it, before any
    // of them reach the URL or the body.
    for (name, schema) in &record.path_params {
        if is_conversion_required(schemas, schema)? {
            let expr = conversion_expr(schema, name, Direction::Serialize, schemas, prelude)?;
            w.line(&format!("{name} = {expr};"));
        }
    }
    if let Some(request) = &record.request {
        if is_conversion_required(schemas, request)? {
            let expr = conversion_expr(request, "req", Direction::Serialize, schemas, prelude)?;
            w.line(&format!("req = {expr};"));
        }
    }
    if !record.query_params.is_empty() {
        let options_name = format!("{}Options", record.pascal_name);
        let options_schema = schemas.get(&options_name).ok_or_else(|| {
            Error::schema(format!("options schema `{options_name}` was not registered"))
        })?;
        if is_conversion_required(schemas, options_schema)? {
            w.line(&format!("opts = serialize{options_name}(opts);"));
        }
    }

    w.line(&format!(
        "const url = new URL(`${{this.#baseUrl}}{}`);",
        substitute_path_template(&record.path)
    ));
    for (name, schema) in &record.query_params {
        let access = member_expr("opts", name);
        w.line(&format!("if ({access} !== undefined) {{"));
        w.push();
        if schema.is_repeated() {
            w.line(&format!("for (const item of {access}) {{"));
            w.push();
            w.line(&format!(
                "url.searchParams.append(\"{}\", String(item));",
                escape_ts_string(name)
            ));
            w.pop();
            w.line("}");
        } else {
            w.line(&format!(
                "url.searchParams.append(\"{}\", String({access}));",
                escape_ts_string(name)
            ));
        }
        w.pop();
        w.line("}");
    }

    if record.request.is_some() {
        w.line("const body = JSON.stringify(req);");
    }
    let assign = if record.response.is_some() { "const data = " } else { "" };
    w.line(&format!("{assign}await request(url.href, {{"));
    w.push();
    w.line("client: this.#client,");
    w.line(&format!("method: \"{}\",", record.http_method));
    if record.request.is_some() {
        w.line("body,");
    }
    w.pop();
    w.line("});");

    if let Some(response) = &record.response {
        if is_conversion_required(schemas, response)? {
            let expr = conversion_expr(response, "data", Direction::Deserialize, schemas, prelude)?;
            w.line(&format!("return {expr};"));
        } else {
            w.line(&format!("return data as {return_type};"));
        }
    }

    w.pop();
    w.line("}");
    Ok(())
}

/// Rewrite `{name}` and `{+name}` tokens into template-literal interpolations.
/// The two token forms are equivalent here; encoding is the URL library's job.
fn substitute_path_template(path: &str) -> String {
    let token = Regex::new(r"\{\+?([^}]+)\}").unwrap();
    token
        .replace_all(path, |caps: &regex::Captures<'_>| format!("${{{}}}", &caps[1]))
        .into_owned()
}
