//! Weaviate class schema types and the schema ensurer.
//!
//! A class must exist before objects can be written into it. The ensurer
//! checks for the class and, when absent, creates it from either a
//! caller-supplied definition or [`default_schema`] — a text-vectorized
//! class with a fixed set of knowledge-base properties.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::WeaviateClient;

/// One property in a class definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: String,
    pub data_type: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Property {
    fn new(name: &str, data_type: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            data_type: vec![data_type.to_string()],
            description: Some(description.to_string()),
        }
    }
}

/// A class definition as accepted and returned by `/v1/schema`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSchema {
    pub class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vectorizer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_config: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Property>,
}

/// The names of the properties defined by [`default_schema`], in order.
///
/// Also used as the default selection set for semantic queries.
pub const DEFAULT_PROPERTY_NAMES: [&str; 7] = [
    "title",
    "content",
    "source_file",
    "category",
    "author",
    "created_at",
    "chunk_index",
];

/// The default knowledge-base schema for a class: text2vec-openai
/// vectorization plus title/content/source/category/author/date/chunk
/// properties.
pub fn default_schema(class_name: &str) -> ClassSchema {
    ClassSchema {
        class: class_name.to_string(),
        description: Some(format!(
            "Knowledge base documents for class {}",
            class_name
        )),
        vectorizer: Some("text2vec-openai".to_string()),
        module_config: Some(serde_json::json!({
            "text2vec-openai": {
                "model": "ada",
                "type": "text"
            }
        })),
        properties: vec![
            Property::new("title", "text", "Title of the document"),
            Property::new("content", "text", "Main content of the document"),
            Property::new("source_file", "text", "Source file path"),
            Property::new("category", "text", "Category or tag for the document"),
            Property::new("author", "text", "Author of the document"),
            Property::new("created_at", "date", "Creation date"),
            Property::new("chunk_index", "int", "Chunk index for split documents"),
        ],
    }
}

/// Guarantee that `class` exists before any documents are written.
///
/// Reuses an existing class as-is (no schema diffing); otherwise creates
/// it from `custom` or the default schema. A creation failure fails the
/// whole import.
pub async fn ensure_class(
    client: &WeaviateClient,
    class: &str,
    custom: Option<&ClassSchema>,
) -> Result<bool> {
    if client.class_exists(class).await {
        return Ok(false);
    }

    let schema = match custom {
        Some(s) => s.clone(),
        None => default_schema(class),
    };
    client.create_class(&schema).await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schema_properties() {
        let schema = default_schema("Document");
        assert_eq!(schema.class, "Document");
        assert_eq!(schema.vectorizer.as_deref(), Some("text2vec-openai"));

        let names: Vec<&str> = schema.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, DEFAULT_PROPERTY_NAMES);

        let created_at = schema
            .properties
            .iter()
            .find(|p| p.name == "created_at")
            .unwrap();
        assert_eq!(created_at.data_type, vec!["date"]);

        let chunk_index = schema
            .properties
            .iter()
            .find(|p| p.name == "chunk_index")
            .unwrap();
        assert_eq!(chunk_index.data_type, vec!["int"]);
    }

    #[test]
    fn test_schema_wire_names_are_camel_case() {
        let schema = default_schema("Document");
        let json = serde_json::to_value(&schema).unwrap();
        assert!(json.get("moduleConfig").is_some());
        assert_eq!(json["properties"][0]["dataType"][0], "text");
        // No snake_case leakage on the wire.
        assert!(json.get("module_config").is_none());
    }

    #[test]
    fn test_schema_roundtrip_from_api_json() {
        let raw = r#"{
            "class": "Article",
            "description": "News articles",
            "vectorizer": "text2vec-openai",
            "properties": [
                {"name": "headline", "dataType": ["text"], "description": "Headline"}
            ]
        }"#;
        let schema: ClassSchema = serde_json::from_str(raw).unwrap();
        assert_eq!(schema.class, "Article");
        assert_eq!(schema.properties[0].name, "headline");
        assert!(schema.module_config.is_none());
    }
}
