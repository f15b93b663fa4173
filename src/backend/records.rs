//! Graph-database isnad records and their validation
//!
//! The graph query returns one record per hadith:
//!
//! ```text
//! { HadithNo, TransmissionChains: [ { SanadNo, Narrators: [ { NarratorID, NarratorName, NarratorGen } ] } ] }
//! ```
//!
//! Records are also accepted in the driver envelope (`keys`, `length`, `_fields`,
//! `_fieldLookup`) that JSON dumps of query results carry. Anything else is rejected
//! with [`Error::Schema`] before it reaches the layout code.

use serde::Deserialize;
use serde_json::Value;
use crate::{Error, Result};
use super::{HadithIsnad, IsnadNarrator, Sanad};

#[derive(Debug, Clone, Deserialize)]
pub struct GraphNarrator {
    #[serde(rename = "NarratorID")]
    pub narrator_id: String,
    #[serde(rename = "NarratorName")]
    pub narrator_name: String,
    #[serde(rename = "NarratorGen")]
    pub narrator_gen: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphChain {
    #[serde(rename = "SanadNo")]
    pub sanad_no: String,
    #[serde(rename = "Narrators")]
    pub narrators: Vec<GraphNarrator>,
}

#[derive(Debug, Deserialize)]
struct PlainRecord {
    #[serde(rename = "HadithNo")]
    hadith_no: String,
    #[serde(rename = "TransmissionChains")]
    transmission_chains: Vec<GraphChain>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct FieldLookup {
    #[serde(rename = "HadithNo")]
    hadith_no: u32,
    #[serde(rename = "TransmissionChains")]
    transmission_chains: u32,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct DriverRecord {
    keys: Vec<String>,
    length: f64,
    #[serde(rename = "_fields")]
    fields: (String, Vec<GraphChain>),
    #[serde(rename = "_fieldLookup")]
    field_lookup: FieldLookup,
}

impl From<GraphNarrator> for IsnadNarrator {
    fn from(n: GraphNarrator) -> Self {
        Self {
            id: n.narrator_id,
            name: n.narrator_name,
            grade: Some(n.narrator_gen),
        }
    }
}

/// Check typed graph rows against the isnad schema and convert them
///
/// Every chain needs at least one narrator, and every narrator an id and a name.
pub fn validate_chains(hadith_no: String, chains: Vec<GraphChain>) -> Result<HadithIsnad> {
    if hadith_no.trim().is_empty() {
        return Err(Error::Schema("isnad record without HadithNo".to_string()));
    }
    for chain in &chains {
        if chain.narrators.is_empty() {
            return Err(Error::Schema(format!(
                "hadith {hadith_no}: chain {} has no narrators",
                chain.sanad_no
            )));
        }
        if let Some(n) = chain
            .narrators
            .iter()
            .find(|n| n.narrator_id.trim().is_empty() || n.narrator_name.trim().is_empty())
        {
            return Err(Error::Schema(format!(
                "hadith {hadith_no}: chain {} has a narrator without id or name ({:?})",
                chain.sanad_no, n.narrator_id
            )));
        }
    }

    Ok(HadithIsnad {
        hadith_no,
        chains: chains
            .into_iter()
            .map(|c| Sanad {
                sanad_no: c.sanad_no,
                narrators: c.narrators.into_iter().map(IsnadNarrator::from).collect(),
            })
            .collect(),
    })
}

/// Check one record against the fixed isnad schema and convert it
pub fn validate_isnad_record(value: Value) -> Result<HadithIsnad> {
    let is_envelope = value.get("_fields").is_some();
    if is_envelope {
        let record: DriverRecord = serde_json::from_value(value)
            .map_err(|e| Error::Schema(format!("invalid isnad record: {e}")))?;
        let (hadith_no, chains) = record.fields;
        return validate_chains(hadith_no, chains);
    }

    let record: PlainRecord = serde_json::from_value(value)
        .map_err(|e| Error::Schema(format!("invalid isnad record: {e}")))?;
    validate_chains(record.hadith_no, record.transmission_chains)
}

/// Parse and validate a batch of JSON-encoded records; blank lines are skipped
pub fn parse_isnad_records<S: AsRef<str>>(json_strings: &[S]) -> Result<Vec<HadithIsnad>> {
    json_strings
        .iter()
        .map(AsRef::<str>::as_ref)
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            let value: Value = serde_json::from_str(s)?;
            validate_isnad_record(value)
        })
        .collect()
}
