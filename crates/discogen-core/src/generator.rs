//! Assembles a complete TypeScript client module from one Discovery document.
//!
//! A `Generator` is built per request, produces one output string, and is
//! then discarded. It owns its writer buffer, its cloned schema table, and
//! its base64 prelude flags, so independent generations never interfere.

use tracing::debug;

use crate::codec::{emit_base64_prelude, emit_codecs, Prelude};
use crate::convert::is_conversion_required;
use crate::discovery::DiscoveryDocument;
use crate::error::{Error, Result};
use crate::flatten::{flatten_resources, MethodRecord};
use crate::methods::{emit_method, register_options_schemas};
use crate::naming::{primary_name, property_key};
use crate::schema::{Schema, SchemaMap, Shape};
use crate::types::ts_type;
use crate::writer::{wrap, CodeWriter};

/// The runtime module generated clients import `auth`, `CredentialsClient`,
/// `GoogleAuth`, and `request` from.
pub const RUNTIME_MODULE: &str = "/_/base@v1/mod.ts";

/// One-shot compiler from a Discovery document to TypeScript module text.
#[derive(Debug)]
pub struct Generator {
    class_name: String,
    title: String,
    description: Option<String>,
    documentation_link: Option<String>,
    base_url: String,
    self_url: String,
    records: Vec<MethodRecord>,
    schemas: SchemaMap,
}

impl Generator {
    /// Prepare a generator: assert the document fields generation depends on,
    /// flatten the resource tree, clone the schema table, and register the
    /// synthetic query-options schemas.
    pub fn new(doc: &DiscoveryDocument, self_url: &str) -> Result<Self> {
        let name = doc
            .name()
            .ok_or_else(|| Error::schema("Document is missing `name`"))?;
        let title = doc
            .title()
            .ok_or_else(|| Error::schema("Document is missing `title`"))?;
        let base_url = doc
            .base_url()
            .ok_or_else(|| Error::schema("Document is missing `rootUrl`"))?;

        let words: Vec<&str> = title.split(' ').collect();
        let class_name = primary_name(name, &words);

        let records = flatten_resources(doc.resources())?;
        let mut schemas = doc.schemas()?;
        register_options_schemas(&records, &mut schemas, &class_name)?;

        debug!(
            api = doc.id(),
            methods = records.len(),
            schemas = schemas.len(),
            "prepared generator"
        );

        Ok(Self {
            class_name,
            title: title.to_string(),
            description: doc.description().map(String::from),
            documentation_link: doc.documentation_link().map(String::from),
            base_url,
            self_url: self_url.to_string(),
            records,
            schemas,
        })
    }

    /// Produce the module text. Byte-identical for identical inputs.
    pub fn generate(&self) -> Result<String> {
        let mut w = CodeWriter::new();
        let mut prelude = Prelude::default();
        self.emit_header(&mut w);
        self.emit_class(&mut w, &mut prelude)?;
        self.emit_types(&mut w, &mut prelude)?;
        emit_base64_prelude(&mut w, &prelude);
        Ok(w.finish())
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    fn emit_header(&self, w: &mut CodeWriter) {
        w.line("// Copyright 2025 the Discogen authors. All rights reserved. MIT license.");
        w.line("/**");
        w.line(&format!(" * {} Client for TypeScript", self.title));
        if let Some(description) = &self.description {
            w.line(" *");
            for line in wrap(&description.replace("*/", "*\\/"), 77) {
                w.line(&format!(" * {line}"));
            }
        }
        w.line(" *");
        if let Some(link) = &self.documentation_link {
            w.line(&format!(" * Docs: {link}"));
        }
        w.line(&format!(" * Source: {}", self.self_url));
        w.line(" */");
        w.blank();
        w.line(&format!(
            "import {{ auth, CredentialsClient, GoogleAuth, request }} from \"{RUNTIME_MODULE}\";"
        ));
        w.line("export { auth, GoogleAuth };");
        w.line("export type { CredentialsClient };");
    }

    fn emit_class(&self, w: &mut CodeWriter, prelude: &mut Prelude) -> Result<()> {
        w.blank();
        w.line(&format!("export class {} {{", self.class_name));
        w.push();
        w.line("#client: CredentialsClient | undefined;");
        w.line("#baseUrl: string;");
        w.blank();
        w.line(&format!(
            "constructor(client?: CredentialsClient, baseUrl: string = \"{}\") {{",
            self.base_url
        ));
        w.push();
        w.line("this.#client = client;");
        w.line("this.#baseUrl = baseUrl;");
        w.pop();
        w.line("}");
        for record in &self.records {
            w.blank();
            emit_method(w, record, &self.schemas, prelude)?;
        }
        w.pop();
        w.line("}");
        Ok(())
    }

    /// Type declarations sorted by schema id, each followed by its codec pair
    /// when conversion is required.
    fn emit_types(&self, w: &mut CodeWriter, prelude: &mut Prelude) -> Result<()> {
        for (name, schema) in &self.schemas {
            w.blank();
            emit_type_decl(w, name, schema)?;
            if is_conversion_required(&self.schemas, schema)? {
                emit_codecs(w, name, schema, &self.schemas, prelude)?;
            }
        }
        Ok(())
    }
}

fn emit_type_decl(w: &mut CodeWriter, name: &str, schema: &Schema) -> Result<()> {
    w.doc(schema.description.as_deref(), &[]);
    match schema.shape()? {
        Shape::Object { properties: Some(properties), .. } => {
            w.line(&format!("export interface {name} {{"));
            w.push();
            for (prop_name, prop) in properties {
                w.doc(prop.description.as_deref(), &[]);
                let marker = if prop.is_required() { "" } else { "?" };
                w.line(&format!("{}{marker}: {};", property_key(prop_name), ts_type(prop)?));
            }
            w.pop();
            w.line("}");
        }
        _ => {
            w.line(&format!("export type {name} = {};", ts_type(schema)?));
        }
    }
    Ok(())
}
