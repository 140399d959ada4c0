//! HTTP client for the Weaviate REST and GraphQL endpoints.
//!
//! All remote interaction goes through [`WeaviateClient`]:
//!
//! | Method | Endpoint |
//! |--------|----------|
//! | [`WeaviateClient::class_exists`] | `GET /v1/schema/{class}` |
//! | [`WeaviateClient::create_class`] | `POST /v1/schema` |
//! | [`WeaviateClient::create_object`] | `POST /v1/objects` |
//! | [`WeaviateClient::list_classes`] | `GET /v1/schema` |
//! | [`WeaviateClient::graphql`] | `POST /v1/graphql` |
//!
//! Calls are awaited to completion one at a time; nothing here retries.

use anyhow::{bail, Result};
use std::time::Duration;

use crate::config::WeaviateConfig;
use crate::models::Document;
use crate::schema::ClassSchema;

/// Client over the Weaviate HTTP API.
pub struct WeaviateClient {
    http: reqwest::Client,
    base_url: String,
}

impl WeaviateClient {
    /// Build a client from configuration. The timeout applies per request.
    pub fn new(config: &WeaviateConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check whether a class exists in the remote schema.
    ///
    /// A 200 response means "exists"; any other status or a transport
    /// failure is logged and treated as "does not exist".
    pub async fn class_exists(&self, class: &str) -> bool {
        let url = format!("{}/v1/schema/{}", self.base_url, class);
        match self.http.get(&url).send().await {
            Ok(response) => response.status().as_u16() == 200,
            Err(e) => {
                eprintln!("Error checking if class exists: {}", e);
                false
            }
        }
    }

    /// Create a class from a schema definition.
    ///
    /// Only HTTP 200 counts as success; any other status fails with the
    /// response body attached.
    pub async fn create_class(&self, schema: &ClassSchema) -> Result<()> {
        let url = format!("{}/v1/schema", self.base_url);
        let response = self.http.post(&url).json(schema).send().await?;

        let status = response.status();
        if status.as_u16() != 200 {
            let body = response.text().await.unwrap_or_default();
            bail!("Failed to create class: {} - {}", status.as_u16(), body);
        }

        Ok(())
    }

    /// Create one object in a class. Succeeds on HTTP 200 or 201; each
    /// call is attempted exactly once.
    pub async fn create_object(&self, class: &str, properties: &Document) -> Result<()> {
        let url = format!("{}/v1/objects", self.base_url);
        let body = serde_json::json!({
            "class": class,
            "properties": properties,
        });

        let response = self.http.post(&url).json(&body).send().await?;

        let status = response.status();
        if !matches!(status.as_u16(), 200 | 201) {
            let text = response.text().await.unwrap_or_default();
            bail!("Failed to create document: {} - {}", status.as_u16(), text);
        }

        Ok(())
    }

    /// Fetch all class definitions from the schema endpoint.
    pub async fn list_classes(&self) -> Result<Vec<ClassSchema>> {
        #[derive(serde::Deserialize)]
        struct SchemaListing {
            #[serde(default)]
            classes: Vec<ClassSchema>,
        }

        let url = format!("{}/v1/schema", self.base_url);
        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if status.as_u16() != 200 {
            let body = response.text().await.unwrap_or_default();
            bail!("Failed to list classes: {} - {}", status.as_u16(), body);
        }

        let listing: SchemaListing = response.json().await?;
        Ok(listing.classes)
    }

    /// POST a raw GraphQL query string.
    ///
    /// Returns the response untouched; callers own status handling and
    /// result normalization.
    pub async fn graphql(&self, query: &str) -> reqwest::Result<reqwest::Response> {
        let url = format!("{}/v1/graphql", self.base_url);
        self.http
            .post(&url)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await
    }

    /// Count objects in a class via an Aggregate query.
    pub async fn count_objects(&self, class: &str) -> Result<u64> {
        if !crate::query::is_graphql_identifier(class) {
            bail!("Invalid class name: '{}'", class);
        }

        let query = format!(
            "{{\n  Aggregate {{\n    {} {{\n      meta {{\n        count\n      }}\n    }}\n  }}\n}}",
            class
        );

        let response = self.graphql(&query).await?;
        let status = response.status();
        if status.as_u16() != 200 {
            let body = response.text().await.unwrap_or_default();
            bail!("Failed to count documents: {} - {}", status.as_u16(), body);
        }

        let result: serde_json::Value = response.json().await?;
        let count = result
            .pointer(&format!("/data/Aggregate/{}/0/meta/count", class))
            .and_then(|v| v.as_u64())
            .unwrap_or(0);

        Ok(count)
    }
}
