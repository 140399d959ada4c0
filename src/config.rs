use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub weaviate: WeaviateConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeaviateConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WeaviateConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_url() -> String {
    "http://localhost:8080".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct IngestConfig {
    #[serde(default = "default_class")]
    pub class: String,
    #[serde(default)]
    pub chunk_size: Option<usize>,
    #[serde(default = "default_text_column")]
    pub text_column: String,
    #[serde(default = "default_title_column")]
    pub title_column: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            class: default_class(),
            chunk_size: None,
            text_column: default_text_column(),
            title_column: default_title_column(),
        }
    }
}

fn default_class() -> String {
    "Document".to_string()
}
fn default_text_column() -> String {
    "content".to_string()
}
fn default_title_column() -> String {
    "title".to_string()
}

/// Load configuration from a TOML file.
///
/// When `explicit` is false and the file does not exist, built-in defaults
/// apply (the config file is optional). An explicitly passed path that is
/// missing is an error.
pub fn load_config(path: &Path, explicit: bool) -> Result<Config> {
    if !path.exists() && !explicit {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.weaviate.url.is_empty() {
        anyhow::bail!("weaviate.url must not be empty");
    }

    if config.weaviate.timeout_secs == 0 {
        anyhow::bail!("weaviate.timeout_secs must be > 0");
    }

    if config.ingest.chunk_size == Some(0) {
        anyhow::bail!("ingest.chunk_size must be > 0 when set");
    }

    if config.ingest.class.is_empty() {
        anyhow::bail!("ingest.class must not be empty");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_file_absent() {
        let config = load_config(Path::new("/nonexistent/wkb.toml"), false).unwrap();
        assert_eq!(config.weaviate.url, "http://localhost:8080");
        assert_eq!(config.weaviate.timeout_secs, 30);
        assert_eq!(config.ingest.class, "Document");
        assert_eq!(config.ingest.text_column, "content");
        assert_eq!(config.ingest.title_column, "title");
        assert_eq!(config.ingest.chunk_size, None);
    }

    #[test]
    fn test_explicit_missing_file_errors() {
        let result = load_config(Path::new("/nonexistent/wkb.toml"), true);
        assert!(result.is_err());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [weaviate]
            url = "http://weaviate.internal:8080"
            "#,
        )
        .unwrap();
        assert_eq!(config.weaviate.url, "http://weaviate.internal:8080");
        assert_eq!(config.weaviate.timeout_secs, 30);
        assert_eq!(config.ingest.class, "Document");
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wkb.toml");
        std::fs::write(&path, "[ingest]\nchunk_size = 0\n").unwrap();
        assert!(load_config(&path, false).is_err());
    }
}
