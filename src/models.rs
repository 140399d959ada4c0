//! Core data types shared across the ingestion driver and protocol bridge.

use serde_json::{Map, Value};

/// A document is an open property mapping persisted as one Weaviate object.
///
/// Built transiently from an input record or text chunk and discarded once
/// the remote create-object call returns.
pub type Document = Map<String, Value>;

/// Aggregate outcome of a populate run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportReport {
    /// Documents produced from the input file.
    pub attempted: u64,
    /// Documents accepted by the remote database.
    pub written: u64,
}

impl ImportReport {
    pub fn failed(&self) -> u64 {
        self.attempted - self.written
    }
}
