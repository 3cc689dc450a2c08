//! Loading and querying Google Discovery documents.
//!
//! This module provides functionality for loading Discovery documents and
//! reading the fields the generator consumes. The raw JSON value is kept
//! intact; typed views are deserialized from it on demand.
//!
//! # Examples
//!
//! ```no_run
//! use discogen_core::discovery::DiscoveryDocument;
//! use discogen_core::error::Result;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! let doc = DiscoveryDocument::from_file("spanner.json").await?;
//! if let Some(title) = doc.title() {
//!     println!("API title: {}", title);
//! }
//! # Ok(())
//! # }
//! ```

// Internal imports (std, crate)
use std::path::Path;

use crate::error::{Error, Result};
use crate::schema::SchemaMap;

// External imports (alphabetized)
use serde_json::Value as JsonValue;
use tokio::fs;

/// A parsed Discovery document
#[derive(Debug, Clone)]
pub struct DiscoveryDocument {
    /// The raw JSON value of the document
    json: JsonValue,
}

impl DiscoveryDocument {
    pub fn new(json: JsonValue) -> Self {
        Self { json }
    }

    /// Load a Discovery document from a file or URL
    pub async fn from_file_or_url<P: AsRef<str>>(location: P) -> Result<Self> {
        let location = location.as_ref();
        if location.starts_with("http://") || location.starts_with("https://") {
            return Self::from_url(location).await;
        }
        Self::from_file(location).await
    }

    /// Load a Discovery document from a file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        Self::parse(&content).map_err(|e| {
            Error::discovery(format!(
                "Failed to parse Discovery document at {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Fetch a Discovery document from a URL
    pub async fn from_url(url: &str) -> Result<Self> {
        let response = reqwest::get(url).await.map_err(|e| {
            Error::discovery(format!("Failed to fetch Discovery document from {url}: {e}"))
        })?;

        if !response.status().is_success() {
            return Err(Error::discovery(format!(
                "Failed to fetch Discovery document from {url}: HTTP {}",
                response.status()
            )));
        }

        let content = response.text().await.map_err(|e| {
            Error::discovery(format!("Failed to read response from {url}: {e}"))
        })?;

        Self::parse(&content)
            .map_err(|e| Error::discovery(format!("Failed to parse Discovery document from {url}: {e}")))
    }

    /// Parse document content (Discovery documents are always JSON)
    pub fn parse(content: &str) -> Result<Self> {
        let json = serde_json::from_str(content)?;
        Ok(Self { json })
    }

    /// Get a reference to the raw JSON value
    pub fn as_json(&self) -> &JsonValue {
        &self.json
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.json.get(key)?.as_str()
    }

    pub fn id(&self) -> Option<&str> {
        self.str_field("id")
    }

    pub fn name(&self) -> Option<&str> {
        self.str_field("name")
    }

    pub fn version(&self) -> Option<&str> {
        self.str_field("version")
    }

    pub fn title(&self) -> Option<&str> {
        self.str_field("title")
    }

    pub fn description(&self) -> Option<&str> {
        self.str_field("description")
    }

    pub fn documentation_link(&self) -> Option<&str> {
        self.str_field("documentationLink")
    }

    pub fn root_url(&self) -> Option<&str> {
        self.str_field("rootUrl")
    }

    pub fn service_path(&self) -> Option<&str> {
        self.str_field("servicePath")
    }

    /// The base URL generated methods resolve paths against:
    /// `rootUrl` + `servicePath`
    pub fn base_url(&self) -> Option<String> {
        let root = self.root_url()?;
        Some(format!("{root}{}", self.service_path().unwrap_or("")))
    }

    /// The nested resource tree (`Null` when the document has none)
    pub fn resources(&self) -> &JsonValue {
        self.json.get("resources").unwrap_or(&JsonValue::Null)
    }

    /// Deserialize the document's schema table into typed nodes. The result
    /// is an independent copy: registering synthetic schemas in it never
    /// touches the document itself.
    pub fn schemas(&self) -> Result<SchemaMap> {
        match self.json.get("schemas") {
            None => Ok(SchemaMap::new()),
            Some(value) => {
                let map = value.as_object().ok_or_else(|| {
                    Error::discovery("Document field `schemas` is not an object")
                })?;
                let mut schemas = SchemaMap::new();
                for (name, schema) in map {
                    schemas.insert(name.clone(), serde_json::from_value(schema.clone())?);
                }
                Ok(schemas)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_from_file() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("discovery.json");
        let json_content = r#"
        {
            "id": "mini:v1",
            "name": "mini",
            "version": "v1",
            "title": "Mini API",
            "rootUrl": "https://mini.example.com/",
            "servicePath": "v1/"
        }
        "#;
        tokio::fs::write(&file_path, json_content).await?;

        let doc = DiscoveryDocument::from_file(&file_path).await?;
        assert_eq!(doc.name(), Some("mini"));
        assert_eq!(doc.title(), Some("Mini API"));
        assert_eq!(doc.base_url(), Some("https://mini.example.com/v1/".to_string()));

        Ok(())
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        assert!(DiscoveryDocument::parse("not json").is_err());
    }

    #[test]
    fn test_base_url_without_service_path() {
        let doc = DiscoveryDocument::new(json!({"rootUrl": "https://mini/"}));
        assert_eq!(doc.base_url(), Some("https://mini/".to_string()));
    }

    #[test]
    fn test_schemas_are_typed_and_detached() {
        let doc = DiscoveryDocument::new(json!({
            "schemas": {
                "Thing": {"id": "Thing", "type": "object",
                          "properties": {"n": {"type": "string", "format": "int64"}}}
            }
        }));
        let mut schemas = doc.schemas().unwrap();
        assert!(schemas.contains_key("Thing"));
        schemas.insert("Extra".to_string(), Default::default());
        // The document itself is untouched
        assert!(doc.as_json()["schemas"].get("Extra").is_none());
    }

    #[test]
    fn test_missing_schemas_table_is_empty() {
        let doc = DiscoveryDocument::new(json!({}));
        assert!(doc.schemas().unwrap().is_empty());
        assert!(doc.resources().is_null());
    }
}
