//! Neo4j isnad backend
//!
//! Narrators are nodes; each sequential relationship carries `HadithNo` and `SanadNo`.

use async_trait::async_trait;
use neo4rs::{ConfigBuilder, Graph, query};
use crate::config::Neo4jConfig;
use crate::model::HadithKey;
use crate::{Error, Result};
use super::records::{GraphChain, validate_chains};
use super::{HadithIsnad, IsnadSource};

const ISNAD_BY_HADITH: &str = r#"
MATCH (n)-[r]->()
WHERE r.HadithNo = $hadithId
WITH r.HadithNo AS HadithNo, r.SanadNo AS SanadNo,
    collect({NarratorName: n.NarratorName, NarratorID: n.narID, NarratorGen: n.NarratorGen}) AS Narrators
ORDER BY HadithNo, SanadNo
WITH HadithNo, collect({SanadNo: SanadNo, Narrators: Narrators}) AS TransmissionChains
RETURN HadithNo, TransmissionChains
"#;


pub struct Neo4jIsnadSource {
    graph: Graph,
}

impl Neo4jIsnadSource {
    pub async fn connect(config: &Neo4jConfig) -> Result<Self> {
        let neo_config = ConfigBuilder::default()
            .uri(config.uri.as_str())
            .user(config.user.as_str())
            .password(config.password.as_str())
            .build()?;
        let graph = Graph::connect(neo_config).await?;
        tracing::info!("Connected to graph database at {}", config.uri);
        Ok(Self { graph })
    }
}

#[async_trait]
impl IsnadSource for Neo4jIsnadSource {
    fn name(&self) -> &'static str {
        "neo4j"
    }

    /// The graph is keyed by hadith number only; source and chapter are not consulted.
    async fn isnad(&self, key: &HadithKey) -> Result<Option<HadithIsnad>> {
        let mut rows = self
            .graph
            .execute(query(ISNAD_BY_HADITH).param("hadithId", key.hadith_no.as_str()))
            .await?;

        let Some(row) = rows.next().await? else {
            return Ok(None);
        };

        let hadith_no: String = row
            .get("HadithNo")
            .map_err(|e| Error::Schema(format!("HadithNo: {e}")))?;
        let chains: Vec<GraphChain> = row
            .get("TransmissionChains")
            .map_err(|e| Error::Schema(format!("TransmissionChains: {e}")))?;

        validate_chains(hadith_no, chains).map(Some)
    }
}
