//! # Weaviate KB
//!
//! Bulk document ingestion and an MCP stdio bridge for a Weaviate vector
//! database.
//!
//! Two independent components share one [`client::WeaviateClient`] over
//! the Weaviate HTTP API:
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐
//! │ wkb populate │   │  wkb serve   │
//! │ file → docs  │   │ stdin JSON-  │
//! │ → objects    │   │ RPC → GraphQL│
//! └──────┬───────┘   └──────┬───────┘
//!        │                  │
//!        ▼                  ▼
//!   ┌─────────────────────────────┐
//!   │  Weaviate HTTP + GraphQL    │
//!   │  /v1/schema /v1/objects     │
//!   │  /v1/graphql                │
//!   └─────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! wkb populate docs.json --class Document   # ingest a JSON file
//! wkb populate notes.md --chunk-size 500    # chunked text import
//! wkb classes                               # list schema classes
//! wkb count Document                        # Aggregate count
//! wkb serve                                 # MCP bridge on stdio
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`client`] | Weaviate HTTP client |
//! | [`schema`] | Class schema types and the schema ensurer |
//! | [`chunk`] | Word-boundary text chunking |
//! | [`ingest`] | File import pipeline |
//! | [`query`] | GraphQL query builder and result normalization |
//! | [`bridge`] | JSON-RPC stdio bridge |
//! | [`progress`] | Per-document import reporting |

pub mod bridge;
pub mod chunk;
pub mod classes;
pub mod client;
pub mod config;
pub mod count;
pub mod ingest;
pub mod models;
pub mod progress;
pub mod query;
pub mod schema;
