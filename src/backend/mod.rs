//! Isnad backends
//!
//! A hadith page needs the transmission chains (sanads) of one hadith. They come from either:
//! - the relational store, which holds exactly one chain per hadith
//! - a graph database (cargo feature `neo4j`), where a hadith may carry several chains
//! - a JSON Lines file of records exported from that graph database
//!
//! Both are reached through [`IsnadSource`] so the web layer does not care which is configured.

pub mod records;
#[cfg(feature = "neo4j")]
pub mod neo4j;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use crate::Result;
use crate::model::{ChainNarrator, HadithKey};
use crate::storage::SqliteStore;

pub use records::{parse_isnad_records, validate_isnad_record};

/// A narrator as it appears inside one chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsnadNarrator {
    /// Stable node id; the scholar index for the relational store
    pub id: String,
    pub name: String,
    pub grade: Option<String>,
}

impl From<&ChainNarrator> for IsnadNarrator {
    fn from(link: &ChainNarrator) -> Self {
        Self {
            id: link.narrator.scholar_indx.to_string(),
            name: link.narrator.name.clone(),
            grade: link.narrator.grade.clone(),
        }
    }
}

/// One transmission chain, earliest narrator first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sanad {
    pub sanad_no: String,
    pub narrators: Vec<IsnadNarrator>,
}

/// Every chain known for one hadith.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HadithIsnad {
    pub hadith_no: String,
    pub chains: Vec<Sanad>,
}

impl HadithIsnad {
    /// Wrap the single relational chain of a hadith as sanad number 1
    pub fn from_chain(hadith_no: impl Into<String>, chain: &[ChainNarrator]) -> Self {
        let narrators: Vec<IsnadNarrator> = chain.iter().map(IsnadNarrator::from).collect();
        let chains = if narrators.is_empty() {
            Vec::new()
        } else {
            vec![Sanad { sanad_no: "1".to_string(), narrators }]
        };
        Self { hadith_no: hadith_no.into(), chains }
    }

    pub fn is_empty(&self) -> bool {
        self.chains.iter().all(|c| c.narrators.is_empty())
    }
}

/// Where the chains of a hadith are read from.
#[async_trait]
pub trait IsnadSource: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Chains of one hadith, `None` when the backend knows nothing about it
    async fn isnad(&self, key: &HadithKey) -> Result<Option<HadithIsnad>>;
}

/// Chains read from `hadith_chains` through the shared store.
pub struct SqliteIsnadSource {
    store: Arc<Mutex<SqliteStore>>,
}

impl SqliteIsnadSource {
    pub fn new(store: Arc<Mutex<SqliteStore>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl IsnadSource for SqliteIsnadSource {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn isnad(&self, key: &HadithKey) -> Result<Option<HadithIsnad>> {
        let store = self.store.lock().await;
        let chain = store.get_chain_for_hadith(key)?;
        if chain.is_empty() {
            return Ok(None);
        }
        Ok(Some(HadithIsnad::from_chain(&key.hadith_no, &chain)))
    }
}

/// Chains held in memory, keyed by hadith number.
///
/// Like the graph database, records carry no source or chapter.
pub struct RecordsIsnadSource {
    records: HashMap<String, HadithIsnad>,
}

impl RecordsIsnadSource {
    pub fn from_records(records: Vec<HadithIsnad>) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.hadith_no.clone(), r)).collect(),
        }
    }

    /// Read a JSON Lines file; every line is validated before anything is served
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let lines: Vec<&str> = contents.lines().collect();
        Ok(Self::from_records(parse_isnad_records(&lines)?))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl IsnadSource for RecordsIsnadSource {
    fn name(&self) -> &'static str {
        "records"
    }

    async fn isnad(&self, key: &HadithKey) -> Result<Option<HadithIsnad>> {
        Ok(self.records.get(&key.hadith_no).filter(|r| !r.is_empty()).cloned())
    }
}
