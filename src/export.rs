//! Static JSON exports
//!
//! - `hadiths.json`: explained hadiths of the configured sources, fetched by the search page
//! - `search_index.json`: every hadith with diacritics stripped from text and narrator

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use serde::Serialize;
use crate::Result;
use crate::config::ensure_parent_dir;
use crate::model::SearchRecord;
use crate::search::normalize_for_search;
use crate::storage::SqliteStore;

pub const HADITHS_FILE: &str = "hadiths.json";
pub const SEARCH_INDEX_FILE: &str = "search_index.json";

/// Files written by [`export_all`]
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub hadiths_path: PathBuf,
    pub hadiths: usize,
    pub search_index_path: PathBuf,
    pub search_index: usize,
}

/// Hadiths with an explanation from each source in turn, without row ids
pub fn hadith_records(store: &SqliteStore, sources: &[String]) -> Result<Vec<SearchRecord>> {
    let mut records = Vec::new();
    for source in sources {
        let rows = store.get_export_rows(Some(source), true)?;
        tracing::debug!("{} explained hadiths in {}", rows.len(), source);
        records.extend(rows.into_iter().map(|r| SearchRecord { id: None, ..r }));
    }
    Ok(records)
}

/// Every hadith with normalized text and narrator name
pub fn search_index_records(store: &SqliteStore) -> Result<Vec<SearchRecord>> {
    let records = store
        .get_export_rows(None, false)?
        .into_iter()
        .map(|r| SearchRecord {
            text_ar: normalize_for_search(&r.text_ar),
            narrator_name: r.narrator_name.as_deref().map(normalize_for_search),
            ..r
        })
        .collect();
    Ok(records)
}

/// Pretty JSON, Arabic left unescaped
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

pub fn export_hadiths(store: &SqliteStore, sources: &[String], out_dir: &Path) -> Result<(PathBuf, usize)> {
    let records = hadith_records(store, sources)?;
    let path = out_dir.join(HADITHS_FILE);
    write_json(&path, &records)?;
    tracing::info!("Exported {} hadiths to {}", records.len(), path.display());
    Ok((path, records.len()))
}

pub fn export_search_index(store: &SqliteStore, out_dir: &Path) -> Result<(PathBuf, usize)> {
    let records = search_index_records(store)?;
    let path = out_dir.join(SEARCH_INDEX_FILE);
    write_json(&path, &records)?;
    tracing::info!("Exported {} hadiths to {}", records.len(), path.display());
    Ok((path, records.len()))
}

pub fn export_all(store: &SqliteStore, sources: &[String], out_dir: &Path) -> Result<ExportSummary> {
    let (hadiths_path, hadiths) = export_hadiths(store, sources, out_dir)?;
    let (search_index_path, search_index) = export_search_index(store, out_dir)?;
    Ok(ExportSummary {
        hadiths_path,
        hadiths,
        search_index_path,
        search_index,
    })
}
