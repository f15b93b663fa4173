use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::{Error, Result};

pub const DEFAULT_DATABASE: &str = "data/sqlite.db";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_EXPORT_DIR: &str = "public";
pub const DEFAULT_SOURCE: &str = "Sahih Bukhari";

/// Contents of `isnad.toml`; every field is optional
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct IsnadConfig {
    pub database: Option<String>,
    pub port: Option<u16>,
    pub sources: Option<Vec<String>>,
    pub export_dir: Option<String>,
    /// JSON Lines file of graph-database isnad records
    pub isnad_records: Option<String>,
    pub neo4j: Option<Neo4jConfig>,
}

/// Connection to the graph database backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Neo4jConfig {
    #[serde(default = "default_neo4j_uri")]
    pub uri: String,
    #[serde(default = "default_neo4j_user")]
    pub user: String,
    #[serde(default)]
    pub password: String,
}

fn default_neo4j_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_neo4j_user() -> String {
    "neo4j".to_string()
}

/// Configuration with defaults filled in
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub database: PathBuf,
    pub port: u16,
    /// Collections browsable on the web and included in `hadiths.json`
    pub sources: Vec<String>,
    pub export_dir: PathBuf,
    pub isnad_records: Option<PathBuf>,
    pub neo4j: Option<Neo4jConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        IsnadConfig::default().resolve()
    }
}

impl IsnadConfig {
    pub fn resolve(self) -> Settings {
        Settings {
            database: PathBuf::from(self.database.unwrap_or_else(|| DEFAULT_DATABASE.to_string())),
            port: self.port.unwrap_or(DEFAULT_PORT),
            sources: self
                .sources
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| vec![DEFAULT_SOURCE.to_string()]),
            export_dir: PathBuf::from(self.export_dir.unwrap_or_else(|| DEFAULT_EXPORT_DIR.to_string())),
            isnad_records: self.isnad_records.map(PathBuf::from),
            neo4j: self.neo4j,
        }
    }
}

impl Settings {
    pub fn is_configured_source(&self, source: &str) -> bool {
        self.sources.iter().any(|s| s == source)
    }

    /// Collection used where a page needs exactly one
    pub fn primary_source(&self) -> &str {
        self.sources.first().map(String::as_str).unwrap_or(DEFAULT_SOURCE)
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("isnad.toml")
}

/// Read the config file; `Ok(None)` when it does not exist
pub fn load_config(path: Option<&Path>) -> Result<Option<IsnadConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: IsnadConfig = toml::from_str(&contents)
        .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &IsnadConfig, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::Config(format!(
            "config already exists at {} (use --force to overwrite)",
            path.display()
        )));
    }

    let contents = toml::to_string_pretty(config).map_err(|e| Error::Config(e.to_string()))?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Create the parent directory of a file path if it is missing
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
