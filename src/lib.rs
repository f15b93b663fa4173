//! # Isnad - Hadith Transmission-Chain Browser
//!
//! Browse hadith collections and the chains of narrators (isnad) that carried them.
//!
//! Isnad provides:
//! - Read-only SQLite query layer over `hadiths`, `rawis`, `hadith_chains` and `sources`
//! - An optional graph-database backend for multi-chain isnads
//! - Deterministic graph layouts for chain and teacher/student views
//! - Diacritic-insensitive in-memory search with pagination
//! - A server-rendered web frontend and static JSON exports

pub mod model;
pub mod storage;
pub mod backend;
pub mod layout;
pub mod search;
pub mod export;
pub mod text;
pub mod web;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use model::{Hadith, HadithKey, Narrator, ChainNarrator, HadithSummary};
pub use backend::{IsnadSource, HadithIsnad, Sanad, IsnadNarrator};
pub use layout::{GraphData, GraphNode, GraphLink};
pub use search::{SearchIndex, SearchQuery};
pub use storage::SqliteStore;

/// Result type alias for Isnad operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Isnad operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Template(#[from] tinytemplate::error::Error),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[cfg(feature = "neo4j")]
    #[error("Graph database error: {0}")]
    Graph(#[from] neo4rs::Error),
}

impl Error {
    /// Whether this error should be presented as a missing page rather than a failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}
