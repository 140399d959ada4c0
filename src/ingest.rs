//! Bulk file import into a Weaviate class (`wkb populate`).
//!
//! Coordinates the full import flow: load and transform the input file
//! into documents, ensure the target class exists, then write each
//! document independently. Loading is fully separated from writing, so
//! any parse or transform error aborts before the first network call;
//! once writing starts, a failed document is reported and counted but
//! never stops the batch.
//!
//! Dispatch is by file extension: `.json` (object or array of objects),
//! `.csv` (one document per row), `.txt`/`.md` (one document, or one per
//! chunk when a chunk size is set). Anything else is an error.

use anyhow::{bail, Context, Result};
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use std::path::Path;

use crate::chunk::split_into_chunks;
use crate::client::WeaviateClient;
use crate::models::{Document, ImportReport};
use crate::progress::{ImportEvent, ImportReporter};
use crate::schema::{ensure_class, ClassSchema};

/// Options controlling a populate run.
#[derive(Debug, Clone)]
pub struct PopulateOptions {
    /// Target class name.
    pub class: String,
    /// Split text files into chunks of at most this many characters.
    pub chunk_size: Option<usize>,
    /// CSV column copied into the canonical `content` property.
    pub text_column: String,
    /// CSV column copied into the canonical `title` property.
    pub title_column: String,
    /// Optional `category` property for text-derived documents.
    pub category: Option<String>,
    /// Optional `author` property for text-derived documents.
    pub author: Option<String>,
    /// Custom class schema used when the class must be created.
    pub schema: Option<ClassSchema>,
}

/// Load a file and transform it into documents without touching the
/// network. All errors here are fatal to the import.
pub fn load_documents(path: &Path, options: &PopulateOptions) -> Result<Vec<Document>> {
    if !path.exists() {
        bail!("File not found: {}", path.display());
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("json") => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            documents_from_json(&content)
        }
        Some("csv") => documents_from_csv(path, options),
        Some("txt") | Some("md") => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Ok(documents_from_text(path, &content, options))
        }
        Some(other) => bail!("Unsupported file format: .{}", other),
        None => bail!("Unsupported file format: {}", path.display()),
    }
}

/// A JSON input is one document or an array of documents; every element
/// must be an object.
fn documents_from_json(content: &str) -> Result<Vec<Document>> {
    let data: Value = serde_json::from_str(content).context("JSON parsing error")?;

    match data {
        Value::Object(map) => Ok(vec![map]),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(map) => Ok(map),
                other => bail!("JSON array element {} is not an object: {}", i, other),
            })
            .collect(),
        other => bail!("JSON input must be an object or array of objects, got: {}", other),
    }
}

/// One document per CSV data row. Every column is copied as a text
/// property; the configured text/title columns are additionally copied
/// into the canonical `content`/`title` keys.
fn documents_from_csv(path: &Path, options: &PopulateOptions) -> Result<Vec<Document>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let headers = reader.headers().context("CSV parsing error")?.clone();

    let mut documents = Vec::new();
    for record in reader.records() {
        let record = record.context("CSV parsing error")?;

        let mut doc = Document::new();
        for (header, field) in headers.iter().zip(record.iter()) {
            doc.insert(header.to_string(), Value::String(field.to_string()));
        }

        if let Some(text) = doc.get(&options.text_column).cloned() {
            doc.insert("content".to_string(), text);
        }
        if let Some(title) = doc.get(&options.title_column).cloned() {
            doc.insert("title".to_string(), title);
        }

        documents.push(doc);
    }

    Ok(documents)
}

/// A text file becomes a single document, or one document per chunk when
/// a chunk size is configured. Chunked documents carry a 1-based
/// `chunk_index` and a matching `"<basename> - Part <n>"` title.
fn documents_from_text(path: &Path, content: &str, options: &PopulateOptions) -> Vec<Document> {
    let basename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let source_file = path.display().to_string();

    let stamp = |doc: &mut Document| {
        doc.insert(
            "created_at".to_string(),
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
        );
        if let Some(category) = &options.category {
            doc.insert("category".to_string(), Value::String(category.clone()));
        }
        if let Some(author) = &options.author {
            doc.insert("author".to_string(), Value::String(author.clone()));
        }
    };

    match options.chunk_size {
        Some(size) => split_into_chunks(content, size)
            .into_iter()
            .enumerate()
            .map(|(i, chunk)| {
                let part = i as i64 + 1;
                let mut doc = Document::new();
                doc.insert(
                    "title".to_string(),
                    Value::String(format!("{} - Part {}", basename, part)),
                );
                doc.insert("content".to_string(), Value::String(chunk));
                doc.insert("source_file".to_string(), Value::String(source_file.clone()));
                doc.insert("chunk_index".to_string(), Value::from(part));
                stamp(&mut doc);
                doc
            })
            .collect(),
        None => {
            let mut doc = Document::new();
            doc.insert("title".to_string(), Value::String(basename));
            doc.insert("content".to_string(), Value::String(content.to_string()));
            doc.insert("source_file".to_string(), Value::String(source_file));
            stamp(&mut doc);
            vec![doc]
        }
    }
}

/// Write documents one at a time, reporting and counting each outcome.
/// A failed item never aborts the batch.
pub async fn write_documents(
    client: &WeaviateClient,
    class: &str,
    documents: &[Document],
    reporter: &dyn ImportReporter,
) -> ImportReport {
    let total = documents.len() as u64;
    let mut report = ImportReport {
        attempted: total,
        written: 0,
    };

    for (i, doc) in documents.iter().enumerate() {
        let n = i as u64 + 1;
        match client.create_object(class, doc).await {
            Ok(()) => {
                report.written += 1;
                reporter.report(ImportEvent::Written { n, total });
            }
            Err(e) => {
                reporter.report(ImportEvent::Failed {
                    n,
                    total,
                    error: &e.to_string(),
                });
            }
        }
    }

    report
}

/// CLI entry point for `wkb populate`.
pub async fn run_populate(
    client: &WeaviateClient,
    path: &Path,
    options: &PopulateOptions,
    reporter: &dyn ImportReporter,
) -> Result<()> {
    let documents = load_documents(path, options)?;

    let created = ensure_class(client, &options.class, options.schema.as_ref()).await?;

    let report = write_documents(client, &options.class, &documents, reporter).await;

    println!("populate {}", path.display());
    println!(
        "  class: {} ({})",
        options.class,
        if created { "created" } else { "existing" }
    );
    println!("  documents: {}", report.attempted);
    println!("  written: {}", report.written);
    println!("  failed: {}", report.failed());
    match client.count_objects(&options.class).await {
        Ok(count) => println!("  total in class: {}", count),
        Err(e) => eprintln!("Error counting documents: {}", e),
    }
    println!("ok");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn options() -> PopulateOptions {
        PopulateOptions {
            class: "Document".to_string(),
            chunk_size: None,
            text_column: "content".to_string(),
            title_column: "title".to_string(),
            category: None,
            author: None,
            schema: None,
        }
    }

    #[test]
    fn test_json_single_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        fs::write(&path, r#"{"title": "One", "content": "Body"}"#).unwrap();

        let docs = load_documents(&path, &options()).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["title"], "One");
    }

    #[test]
    fn test_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs.json");
        fs::write(
            &path,
            r#"[{"title": "A", "content": "a"}, {"title": "B", "content": "b"}]"#,
        )
        .unwrap();

        let docs = load_documents(&path, &options()).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1]["title"], "B");
    }

    #[test]
    fn test_json_parse_error_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();

        assert!(load_documents(&path, &options()).is_err());
    }

    #[test]
    fn test_json_non_object_element_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.json");
        fs::write(&path, r#"[{"title": "A"}, 42]"#).unwrap();

        assert!(load_documents(&path, &options()).is_err());
    }

    #[test]
    fn test_csv_rows_with_column_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        fs::write(
            &path,
            "headline,body,tag\nFirst,Alpha text,news\nSecond,Beta text,sport\n",
        )
        .unwrap();

        let mut opts = options();
        opts.text_column = "body".to_string();
        opts.title_column = "headline".to_string();

        let docs = load_documents(&path, &opts).unwrap();
        assert_eq!(docs.len(), 2);
        // Original columns survive alongside the canonical keys.
        assert_eq!(docs[0]["headline"], "First");
        assert_eq!(docs[0]["tag"], "news");
        assert_eq!(docs[0]["content"], "Alpha text");
        assert_eq!(docs[0]["title"], "First");
        assert_eq!(docs[1]["content"], "Beta text");
    }

    #[test]
    fn test_csv_without_mapped_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        fs::write(&path, "a,b\n1,2\n").unwrap();

        let docs = load_documents(&path, &options()).unwrap();
        assert_eq!(docs.len(), 1);
        assert!(docs[0].get("content").is_none());
        assert!(docs[0].get("title").is_none());
    }

    #[test]
    fn test_text_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        fs::write(&path, "All of the notes in one document.").unwrap();

        let docs = load_documents(&path, &options()).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["title"], "notes.md");
        assert_eq!(docs[0]["content"], "All of the notes in one document.");
        assert!(docs[0].get("source_file").is_some());
        assert!(docs[0].get("created_at").is_some());
        assert!(docs[0].get("chunk_index").is_none());
    }

    #[test]
    fn test_text_chunked_with_part_titles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("long.txt");
        fs::write(&path, "one two three four five six seven eight").unwrap();

        let mut opts = options();
        opts.chunk_size = Some(10);

        let docs = load_documents(&path, &opts).unwrap();
        assert!(docs.len() > 1);
        assert_eq!(docs[0]["title"], "long.txt - Part 1");
        assert_eq!(docs[0]["chunk_index"], 1);
        assert_eq!(docs[1]["title"], "long.txt - Part 2");
        assert_eq!(docs[1]["chunk_index"], 2);
    }

    #[test]
    fn test_text_empty_with_chunking_yields_no_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        fs::write(&path, "").unwrap();

        let mut opts = options();
        opts.chunk_size = Some(100);

        let docs = load_documents(&path, &opts).unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn test_category_and_author_applied_to_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "body").unwrap();

        let mut opts = options();
        opts.category = Some("runbooks".to_string());
        opts.author = Some("ops".to_string());

        let docs = load_documents(&path, &opts).unwrap();
        assert_eq!(docs[0]["category"], "runbooks");
        assert_eq!(docs[0]["author"], "ops");
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.xml");
        fs::write(&path, "<xml/>").unwrap();

        let err = load_documents(&path, &options()).unwrap_err();
        assert!(err.to_string().contains("Unsupported file format"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_documents(Path::new("/nonexistent/input.json"), &options()).unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }
}
