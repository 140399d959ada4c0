//! # Weaviate KB CLI (`wkb`)
//!
//! The `wkb` binary is the primary interface for Weaviate KB. It provides
//! commands for bulk document ingestion, schema inspection, and the MCP
//! stdio bridge.
//!
//! ## Usage
//!
//! ```bash
//! wkb [--config ./config/wkb.toml] [--url http://localhost:8080] <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `wkb populate <file>` | Import a JSON, CSV, or text file into a class |
//! | `wkb classes` | List classes in the remote schema |
//! | `wkb count <class>` | Count documents in a class |
//! | `wkb serve` | Start the MCP bridge on stdin/stdout |
//!
//! ## Examples
//!
//! ```bash
//! # Import an array of documents
//! wkb populate docs.json --class Document
//!
//! # Import a CSV with custom column mapping
//! wkb populate articles.csv --text-column body --title-column headline
//!
//! # Import a long text file in 500-character chunks
//! wkb populate notes.md --chunk-size 500 --category runbooks
//!
//! # Inspect the remote schema
//! wkb classes
//! wkb count Document
//!
//! # Serve the weaviate_query tool to an MCP client
//! wkb serve
//! ```

mod bridge;
mod chunk;
mod classes;
mod client;
mod config;
mod count;
mod ingest;
mod models;
mod progress;
mod query;
mod schema;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Weaviate KB — bulk document ingestion and an MCP stdio bridge for a
/// Weaviate vector database.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file; built-in defaults apply when the default path does not exist.
#[derive(Parser)]
#[command(
    name = "wkb",
    about = "Weaviate KB — bulk document ingestion and an MCP stdio bridge for Weaviate",
    version,
    long_about = "Weaviate KB imports JSON, CSV, and text files into a Weaviate class \
    (creating a default text-vectorized schema when the class is missing) and bridges \
    line-delimited JSON-RPC on stdin/stdout to the database's GraphQL endpoint for \
    MCP clients."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/wkb.toml`; when that default is absent,
    /// built-in defaults apply. An explicitly passed path must exist.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Weaviate base URL (overrides the config file).
    #[arg(long, global = true)]
    url: Option<String>,

    /// Per-document progress on stderr, even when stderr is not a TTY.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Import a file into a Weaviate class.
    ///
    /// Dispatches on the file extension: `.json` (an object or an array
    /// of objects), `.csv` (one document per row), `.txt`/`.md` (one
    /// document, or one per chunk with `--chunk-size`). The target class
    /// is created from the default knowledge-base schema when absent.
    Populate {
        /// Path to the input file (.json, .csv, .txt, .md).
        file: PathBuf,

        /// Target class name.
        #[arg(long)]
        class: Option<String>,

        /// Split text files into chunks of at most this many characters.
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Custom class schema (JSON file) used if the class must be created.
        #[arg(long)]
        schema: Option<PathBuf>,

        /// CSV column copied into the canonical `content` property.
        #[arg(long)]
        text_column: Option<String>,

        /// CSV column copied into the canonical `title` property.
        #[arg(long)]
        title_column: Option<String>,

        /// Category property applied to text-derived documents.
        #[arg(long)]
        category: Option<String>,

        /// Author property applied to text-derived documents.
        #[arg(long)]
        author: Option<String>,
    },

    /// List existing classes and their descriptions.
    Classes,

    /// Count documents in a class via an Aggregate query.
    Count {
        /// Class name to count.
        class: String,
    },

    /// Start the MCP bridge: line-delimited JSON-RPC on stdin/stdout.
    ///
    /// Exposes the single `weaviate_query` tool. The loop runs until
    /// stdin is exhausted.
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config_path, explicit) = match &cli.config {
        Some(path) => (path.clone(), true),
        None => (PathBuf::from("./config/wkb.toml"), false),
    };
    let mut cfg = config::load_config(&config_path, explicit)?;

    if let Some(url) = cli.url {
        cfg.weaviate.url = url;
    }

    let client = client::WeaviateClient::new(&cfg.weaviate)?;

    match cli.command {
        Commands::Populate {
            file,
            class,
            chunk_size,
            schema,
            text_column,
            title_column,
            category,
            author,
        } => {
            let custom_schema = match schema {
                Some(path) => {
                    let content = std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read schema file: {}", path.display()))?;
                    Some(
                        serde_json::from_str::<schema::ClassSchema>(&content)
                            .context("Failed to parse schema file")?,
                    )
                }
                None => None,
            };

            let options = ingest::PopulateOptions {
                class: class.unwrap_or(cfg.ingest.class),
                chunk_size: chunk_size.or(cfg.ingest.chunk_size),
                text_column: text_column.unwrap_or(cfg.ingest.text_column),
                title_column: title_column.unwrap_or(cfg.ingest.title_column),
                category,
                author,
                schema: custom_schema,
            };

            let reporter = progress::ReportMode::from_verbose(cli.verbose).reporter();
            ingest::run_populate(&client, &file, &options, reporter.as_ref()).await?;
        }
        Commands::Classes => {
            classes::run_classes(&client).await?;
        }
        Commands::Count { class } => {
            count::run_count(&client, &class).await?;
        }
        Commands::Serve => {
            bridge::run_bridge(&client).await?;
        }
    }

    Ok(())
}
