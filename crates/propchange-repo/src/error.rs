// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error types for the server-side operations.

use thiserror::Error;

/// Failure reported by a content-store or persistence adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The addressed node does not exist.
    #[error("node not found: {0}")]
    NotFound(String),
    /// I/O error in a file-backed adapter.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// (De)serialization failure in a file-backed adapter.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Catch-all error variant.
    #[error("other: {0}")]
    Other(String),
}

/// Fatal outcome of a repair or accept request.
///
/// Per-node anomalies during a backfill are never errors; they are logged and
/// skipped.
#[derive(Debug, Error)]
pub enum RepairError {
    /// The node-type filter names a type the schema does not know.
    #[error("Node type \"{0}\" does not exist")]
    UnknownNodeType(String),
    /// The underlying store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
