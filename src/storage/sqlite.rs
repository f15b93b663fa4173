//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, OpenFlags, OptionalExtension, Row, params};
use rusqlite::types::Value;
use crate::{Error, Result};
use crate::model::{
    ChainNarrator, Chapter, ChapterCount, Hadith, HadithKey, HadithSummary, Narrator,
    NarratorPair, NarratorSource, NarratorStats, RankedNarrator, SearchRecord,
};
use super::schema;

/// Narrator columns, in the order `narrator_from_row` reads them
const NARRATOR_COLUMNS: &str = "r.scholar_indx, r.name, r.full_name, r.grade, r.parents, \
     r.birth_date_hijri, r.birth_date_gregorian, r.death_date_hijri, r.death_date_gregorian, r.death_place";
const NARRATOR_WIDTH: usize = 10;

/// Hadith columns, in the order `hadith_from_row` reads them
const HADITH_COLUMNS: &str = "h.id, h.hadith_id, h.source, h.chapter_no, h.hadith_no, h.chapter, \
     h.text_ar, h.text_en, h.explanation";
const HADITH_WIDTH: usize = 9;

/// Orders hadith numbers numerically first (`"2"` before `"10"`), then by suffix
const HADITH_ORDER: &str = "h.chapter_no, CAST(h.hadith_no AS INTEGER), h.hadith_no";

/// Read-only access to the hadith database
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open an existing database file read-only
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(format!("database {}", path.display())));
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        tracing::debug!("Opened {} read-only", path.display());
        Ok(Self { conn })
    }

    /// Create (or open) a writable database file and make sure the schema exists
    pub fn create(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    /// Run a batch of SQL statements, e.g. a dump loaded by `isnad init --from`
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    // ========== Hadith Operations ==========

    /// First `limit` hadiths ordered by id
    pub fn get_hadiths(&self, limit: usize) -> Result<Vec<Hadith>> {
        let sql = format!("SELECT {HADITH_COLUMNS} FROM hadiths h ORDER BY h.id LIMIT ?1");
        let mut stmt = self.conn.prepare(&sql)?;
        let hadiths = stmt
            .query_map([limit as i64], |row| hadith_from_row(row, 0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(hadiths)
    }

    /// Every distinct (source, chapter_no, hadith_no) in the store
    pub fn get_all_hadith_keys(&self) -> Result<Vec<(String, i64, String)>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT source, chapter_no, hadith_no FROM hadiths ORDER BY source, chapter_no, hadith_no",
        )?;
        let keys = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(keys)
    }

    /// Get a hadith by source, chapter title and number
    pub fn get_hadith(&self, key: &HadithKey) -> Result<Option<Hadith>> {
        let sql = format!(
            "SELECT {HADITH_COLUMNS} FROM hadiths h WHERE h.source = ?1 AND h.chapter = ?2 AND h.hadith_no = ?3"
        );
        self.conn
            .query_row(&sql, params![key.source, key.chapter, key.hadith_no], |row| {
                hadith_from_row(row, 0)
            })
            .optional()
            .map_err(Into::into)
    }

    /// First hadith of a source carrying the printed number, in reading order
    pub fn get_hadith_by_number(&self, source: &str, hadith_no: &str) -> Result<Option<Hadith>> {
        let sql = format!(
            "SELECT {HADITH_COLUMNS} FROM hadiths h WHERE h.source = ?1 AND h.hadith_no = ?2 \
             ORDER BY h.chapter_no LIMIT 1"
        );
        self.conn
            .query_row(&sql, params![source, hadith_no], |row| hadith_from_row(row, 0))
            .optional()
            .map_err(Into::into)
    }

    /// Narrators of a hadith's chain, ordered by position. Empty for unknown hadiths.
    pub fn get_chain_for_hadith(&self, key: &HadithKey) -> Result<Vec<ChainNarrator>> {
        let sql = format!(
            r#"
            SELECT c.source, c.chapter_no, c.hadith_no, c.position, {NARRATOR_COLUMNS}
            FROM hadith_chains c
            JOIN rawis r ON c.scholar_indx = r.scholar_indx
            JOIN hadiths h ON c.source = h.source
                AND c.chapter_no = h.chapter_no
                AND c.hadith_no = h.hadith_no
            WHERE c.source = ?1 AND h.chapter = ?2 AND c.hadith_no = ?3
            ORDER BY c.position
            "#
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let chain = stmt
            .query_map(params![key.source, key.chapter, key.hadith_no], |row| {
                Ok(ChainNarrator {
                    source: row.get(0)?,
                    chapter_no: row.get(1)?,
                    hadith_no: row.get(2)?,
                    position: row.get(3)?,
                    narrator: narrator_from_row(row, 4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(chain)
    }

    /// Hadiths of a source with their first narrator
    pub fn get_hadiths_by_source(&self, source: &str, limit: usize) -> Result<Vec<HadithSummary>> {
        let sql = format!(
            r#"
            SELECT {HADITH_COLUMNS}, r.name AS narrator_name
            FROM hadiths h
            LEFT JOIN hadith_chains c ON h.source = c.source
                AND h.chapter_no = c.chapter_no
                AND h.hadith_no = c.hadith_no
                AND c.position = 1
            LEFT JOIN rawis r ON c.scholar_indx = r.scholar_indx
            WHERE h.source = ?1
            ORDER BY {HADITH_ORDER}
            LIMIT ?2
            "#
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let hadiths = stmt
            .query_map(params![source, limit as i64], summary_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(hadiths)
    }

    /// Hadiths of one chapter with their first narrator
    pub fn get_hadiths_by_chapter(&self, source: &str, chapter: &str) -> Result<Vec<HadithSummary>> {
        let sql = format!(
            r#"
            SELECT {HADITH_COLUMNS}, r.name AS narrator_name
            FROM hadiths h
            LEFT JOIN hadith_chains c ON h.source = c.source
                AND h.chapter_no = c.chapter_no
                AND h.hadith_no = c.hadith_no
                AND c.position = 1
            LEFT JOIN rawis r ON c.scholar_indx = r.scholar_indx
            WHERE h.source = ?1 AND h.chapter = ?2
            ORDER BY {HADITH_ORDER}
            "#
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let hadiths = stmt
            .query_map(params![source, chapter], summary_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(hadiths)
    }

    /// Chapters of a source with their hadith counts
    pub fn get_source_chapters(&self, source: &str) -> Result<Vec<Chapter>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT source, chapter, chapter_no, COUNT(*) AS count
            FROM hadiths
            WHERE source = ?1
            GROUP BY source, chapter, chapter_no
            ORDER BY chapter_no ASC
            "#,
        )?;
        let chapters = stmt
            .query_map([source], |row| {
                Ok(Chapter {
                    source: row.get(0)?,
                    chapter: row.get(1)?,
                    chapter_no: row.get(2)?,
                    count: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(chapters)
    }

    /// Hadiths in which `to` received directly from `from`.
    ///
    /// `source` of `None` searches every collection.
    pub fn get_hadiths_from_narrator_to_narrator(
        &self,
        from: &str,
        to: &str,
        source: Option<&str>,
        limit: usize,
    ) -> Result<Vec<HadithSummary>> {
        let sql = format!(
            r#"
            SELECT DISTINCT {HADITH_COLUMNS}, rf.name AS narrator_name
            FROM hadith_chains c1
            JOIN rawis r1 ON c1.scholar_indx = r1.scholar_indx
            JOIN hadith_chains c2 ON c1.source = c2.source
                AND c1.chapter_no = c2.chapter_no
                AND c1.hadith_no = c2.hadith_no
                AND c2.position = c1.position + 1
            JOIN rawis r2 ON c2.scholar_indx = r2.scholar_indx
            JOIN hadiths h ON h.source = c1.source
                AND h.chapter_no = c1.chapter_no
                AND h.hadith_no = c1.hadith_no
            LEFT JOIN hadith_chains cf ON cf.source = h.source
                AND cf.chapter_no = h.chapter_no
                AND cf.hadith_no = h.hadith_no
                AND cf.position = 1
            LEFT JOIN rawis rf ON cf.scholar_indx = rf.scholar_indx
            WHERE r1.name = ?1 AND r2.name = ?2 AND (?3 IS NULL OR c1.source = ?3)
            ORDER BY {HADITH_ORDER}
            LIMIT ?4
            "#
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let hadiths = stmt
            .query_map(params![from, to, source, limit as i64], summary_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(hadiths)
    }

    /// Rows for the static JSON exports.
    ///
    /// With `require_explanation` only hadiths carrying a non-empty explanation are returned.
    pub fn get_export_rows(&self, source: Option<&str>, require_explanation: bool) -> Result<Vec<SearchRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT h.id, h.source, h.chapter, h.chapter_no, h.hadith_no, h.text_ar, r.name AS narrator_name
            FROM hadiths h
            LEFT JOIN hadith_chains c ON h.source = c.source
                AND h.chapter_no = c.chapter_no
                AND h.hadith_no = c.hadith_no
                AND c.position = 1
            LEFT JOIN rawis r ON c.scholar_indx = r.scholar_indx
            WHERE (?1 IS NULL OR h.source = ?1)
                AND (?2 = 0 OR (h.explanation IS NOT NULL AND h.explanation != ''))
            ORDER BY h.source, h.chapter_no, CAST(h.hadith_no AS INTEGER), h.hadith_no
            "#,
        )?;
        let rows = stmt
            .query_map(params![source, require_explanation], |row| {
                Ok(SearchRecord {
                    id: row.get(0)?,
                    source: row.get(1)?,
                    chapter: row.get(2)?,
                    chapter_no: row.get(3)?,
                    hadith_no: row.get(4)?,
                    text_ar: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
                    narrator_name: row.get(6)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    // ========== Narrator Operations ==========

    /// All narrators
    pub fn get_narrators(&self) -> Result<Vec<Narrator>> {
        let sql = format!("SELECT {NARRATOR_COLUMNS} FROM rawis r ORDER BY r.scholar_indx");
        let mut stmt = self.conn.prepare(&sql)?;
        let narrators = stmt
            .query_map([], |row| narrator_from_row(row, 0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(narrators)
    }

    /// Narrators that appear in at least one chain of an existing hadith
    pub fn get_narrators_with_hadiths_only(&self) -> Result<Vec<Narrator>> {
        let sql = format!(
            r#"
            SELECT DISTINCT {NARRATOR_COLUMNS}
            FROM rawis r
            JOIN hadith_chains c ON r.scholar_indx = c.scholar_indx
            JOIN hadiths h ON c.source = h.source
                AND c.chapter_no = h.chapter_no
                AND c.hadith_no = h.hadith_no
            ORDER BY r.name
            "#
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let narrators = stmt
            .query_map([], |row| narrator_from_row(row, 0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(narrators)
    }

    /// Get a narrator by exact name
    pub fn get_narrator(&self, name: &str) -> Result<Option<Narrator>> {
        let sql = format!("SELECT {NARRATOR_COLUMNS} FROM rawis r WHERE r.name = ?1");
        self.conn
            .query_row(&sql, [name], |row| narrator_from_row(row, 0))
            .optional()
            .map_err(Into::into)
    }

    /// Biographical notes on a narrator, longest first
    pub fn get_narrator_info(&self, scholar_indx: i64) -> Result<Vec<NarratorSource>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, scholar_indx, book_source, content FROM sources
            WHERE scholar_indx = ?1
            ORDER BY LENGTH(content) DESC
            "#,
        )?;
        let notes = stmt
            .query_map([scholar_indx], |row| {
                Ok(NarratorSource {
                    id: row.get(0)?,
                    scholar_indx: row.get(1)?,
                    book_source: row.get(2)?,
                    content: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(notes)
    }

    /// Narrators who received hadiths from this narrator (next position in a chain)
    pub fn get_successors(&self, scholar_indx: i64, source: &str) -> Result<Vec<Narrator>> {
        self.adjacent_narrators(scholar_indx, source, "c1.position = c2.position - 1")
    }

    /// Narrators this narrator received hadiths from (previous position in a chain)
    pub fn get_predecessors(&self, scholar_indx: i64, source: &str) -> Result<Vec<Narrator>> {
        self.adjacent_narrators(scholar_indx, source, "c1.position = c2.position + 1")
    }

    fn adjacent_narrators(&self, scholar_indx: i64, source: &str, adjacency: &str) -> Result<Vec<Narrator>> {
        let sql = format!(
            r#"
            SELECT DISTINCT {NARRATOR_COLUMNS}
            FROM hadith_chains c1
            JOIN hadith_chains c2 ON
                c1.source = c2.source AND
                c1.chapter_no = c2.chapter_no AND
                c1.hadith_no = c2.hadith_no AND
                {adjacency}
            JOIN rawis r ON c2.scholar_indx = r.scholar_indx
            WHERE c1.scholar_indx = ?1
            AND c1.source = ?2
            ORDER BY r.name
            "#
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let narrators = stmt
            .query_map(params![scholar_indx, source], |row| narrator_from_row(row, 0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(narrators)
    }

    /// Names of every narrator in a source's chains
    pub fn get_narrators_in_source(&self, source: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT DISTINCT r.name
            FROM rawis r
            JOIN hadith_chains c ON r.scholar_indx = c.scholar_indx
            WHERE c.source = ?1
            ORDER BY r.name
            "#,
        )?;
        let names = stmt
            .query_map([source], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names)
    }

    /// Chapters in which a narrator appears, with distinct hadith counts
    pub fn narrated_about(&self, scholar_indx: i64, source: &str) -> Result<Vec<ChapterCount>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT h.source, h.chapter, COUNT(DISTINCT h.hadith_no) AS count
            FROM hadith_chains c
            JOIN hadiths h ON c.source = h.source
                AND c.chapter_no = h.chapter_no
                AND c.hadith_no = h.hadith_no
            WHERE c.scholar_indx = ?1
            AND c.source = ?2
            GROUP BY h.source, h.chapter, h.chapter_no
            ORDER BY h.source ASC, h.chapter_no ASC
            "#,
        )?;
        let chapters = stmt
            .query_map(params![scholar_indx, source], |row| {
                Ok(ChapterCount {
                    source: row.get(0)?,
                    chapter: row.get(1)?,
                    count: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(chapters)
    }

    /// Narrators matching `query` in name, grade or parents (substring match)
    pub fn search_narrators(&self, query: &str) -> Result<Vec<Narrator>> {
        let pattern = format!("%{}%", query);
        let sql = format!(
            r#"
            SELECT {NARRATOR_COLUMNS} FROM rawis r
            WHERE r.name LIKE ?1 OR r.grade LIKE ?1 OR r.parents LIKE ?1
            ORDER BY r.name
            "#
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let narrators = stmt
            .query_map([&pattern], |row| narrator_from_row(row, 0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(narrators)
    }

    /// Narrators of one grade, most prolific first
    pub fn get_narrators_by_grade(&self, grade: &str) -> Result<Vec<RankedNarrator>> {
        let sql = format!(
            r#"
            SELECT {NARRATOR_COLUMNS}, COUNT(h.id) AS hadith_count
            FROM rawis r
            LEFT JOIN hadith_chains c ON r.scholar_indx = c.scholar_indx
            LEFT JOIN hadiths h ON c.source = h.source
                AND c.chapter_no = h.chapter_no
                AND c.hadith_no = h.hadith_no
            WHERE r.grade = ?1
            GROUP BY r.scholar_indx
            ORDER BY hadith_count DESC, r.name
            "#
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let narrators = stmt
            .query_map([grade], ranked_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(narrators)
    }

    /// Narrators of one source, most prolific first
    pub fn get_narrators_with_hadiths(&self, source: &str) -> Result<Vec<RankedNarrator>> {
        let sql = format!(
            r#"
            SELECT {NARRATOR_COLUMNS}, COUNT(h.id) AS hadith_count
            FROM rawis r
            JOIN hadith_chains c ON r.scholar_indx = c.scholar_indx
            JOIN hadiths h ON c.source = h.source
                AND c.chapter_no = h.chapter_no
                AND c.hadith_no = h.hadith_no
            WHERE h.source = ?1
            GROUP BY r.scholar_indx
            ORDER BY hadith_count DESC, r.name
            "#
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let narrators = stmt
            .query_map([source], ranked_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(narrators)
    }

    /// Hadith count and sources for one narrator
    pub fn get_narrator_stats(&self, scholar_indx: i64) -> Result<Option<NarratorStats>> {
        let sql = format!(
            r#"
            SELECT {NARRATOR_COLUMNS}, COUNT(h.id) AS hadith_count, GROUP_CONCAT(DISTINCT h.source) AS sources
            FROM rawis r
            LEFT JOIN hadith_chains c ON r.scholar_indx = c.scholar_indx
            LEFT JOIN hadiths h ON c.source = h.source
                AND c.chapter_no = h.chapter_no
                AND c.hadith_no = h.hadith_no
            WHERE r.scholar_indx = ?1
            GROUP BY r.scholar_indx
            "#
        );
        self.conn
            .query_row(&sql, [scholar_indx], |row| {
                let sources: Option<String> = row.get(NARRATOR_WIDTH + 1)?;
                Ok(NarratorStats {
                    narrator: narrator_from_row(row, 0)?,
                    hadith_count: row.get(NARRATOR_WIDTH)?,
                    sources: sources
                        .map(|s| s.split(',').map(str::to_string).collect())
                        .unwrap_or_default(),
                })
            })
            .optional()
            .map_err(Into::into)
    }

    /// Every adjacent (from, to) narrator pair of a source with its hadith count
    pub fn get_narrator_pairs(&self, source: &str) -> Result<Vec<NarratorPair>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT r1.name AS from_narrator, r2.name AS to_narrator,
                COUNT(DISTINCT c1.chapter_no || '|' || c1.hadith_no) AS hadith_count
            FROM hadith_chains c1
            JOIN hadith_chains c2 ON c1.source = c2.source
                AND c1.chapter_no = c2.chapter_no
                AND c1.hadith_no = c2.hadith_no
                AND c2.position = c1.position + 1
            JOIN rawis r1 ON c1.scholar_indx = r1.scholar_indx
            JOIN rawis r2 ON c2.scholar_indx = r2.scholar_indx
            WHERE c1.source = ?1
            GROUP BY r1.scholar_indx, r2.scholar_indx
            ORDER BY hadith_count DESC, r1.name, r2.name
            "#,
        )?;
        let pairs = stmt
            .query_map([source], |row| {
                Ok(NarratorPair {
                    from_narrator: row.get(0)?,
                    to_narrator: row.get(1)?,
                    hadith_count: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(pairs)
    }

    // ========== Statistics ==========

    fn count(&self, table: &str) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            hadiths: self.count("hadiths")?,
            narrators: self.count("rawis")?,
            chain_links: self.count("hadith_chains")?,
            narrator_sources: self.count("sources")?,
        })
    }
}

/// Integer column that may have been written as REAL or TEXT by the import tooling
fn lenient_int(row: &Row, idx: usize) -> rusqlite::Result<Option<i64>> {
    Ok(match row.get::<_, Value>(idx)? {
        Value::Integer(i) => Some(i),
        Value::Real(f) if f.is_finite() => Some(f as i64),
        Value::Text(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn narrator_from_row(row: &Row, at: usize) -> rusqlite::Result<Narrator> {
    Ok(Narrator {
        scholar_indx: row.get(at)?,
        name: row.get::<_, Option<String>>(at + 1)?.unwrap_or_default(),
        full_name: row.get(at + 2)?,
        grade: row.get(at + 3)?,
        parents: row.get(at + 4)?,
        birth_date_hijri: lenient_int(row, at + 5)?,
        birth_date_gregorian: lenient_int(row, at + 6)?,
        death_date_hijri: lenient_int(row, at + 7)?,
        death_date_gregorian: lenient_int(row, at + 8)?,
        death_place: row.get(at + 9)?,
    })
}

fn hadith_from_row(row: &Row, at: usize) -> rusqlite::Result<Hadith> {
    Ok(Hadith {
        id: row.get(at)?,
        hadith_id: lenient_int(row, at + 1)?,
        source: row.get(at + 2)?,
        chapter_no: row.get(at + 3)?,
        hadith_no: row.get(at + 4)?,
        chapter: row.get::<_, Option<String>>(at + 5)?.unwrap_or_default(),
        text_ar: row.get::<_, Option<String>>(at + 6)?.unwrap_or_default(),
        text_en: row.get(at + 7)?,
        explanation: row.get(at + 8)?,
    })
}

fn summary_from_row(row: &Row) -> rusqlite::Result<HadithSummary> {
    Ok(HadithSummary {
        hadith: hadith_from_row(row, 0)?,
        narrator_name: row.get(HADITH_WIDTH)?,
    })
}

fn ranked_from_row(row: &Row) -> rusqlite::Result<RankedNarrator> {
    Ok(RankedNarrator {
        narrator: narrator_from_row(row, 0)?,
        hadith_count: row.get(NARRATOR_WIDTH)?,
    })
}

/// Database statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct DbStats {
    pub hadiths: usize,
    pub narrators: usize,
    pub chain_links: usize,
    pub narrator_sources: usize,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Hadiths: {}", self.hadiths)?;
        writeln!(f, "  Narrators: {}", self.narrators)?;
        writeln!(f, "  Chain links: {}", self.chain_links)?;
        writeln!(f, "  Narrator sources: {}", self.narrator_sources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::fixtures::{self, BUKHARI, REVELATION};

    fn store() -> SqliteStore {
        fixtures::seeded_store()
    }

    #[test]
    fn test_get_hadiths_has_expected_fields() {
        let store = store();
        let hadiths = store.get_hadiths(10).unwrap();
        assert!(!hadiths.is_empty());

        let hadith = &hadiths[0];
        assert_eq!(hadith.source, BUKHARI);
        assert_eq!(hadith.chapter, REVELATION);
        assert_eq!(hadith.chapter_no, 1);
        assert!(!hadith.text_ar.is_empty());
        assert!(hadith.text_en.is_some());
    }

    #[test]
    fn test_get_hadiths_sorted_and_consistent() {
        let store = store();
        let first = store.get_hadiths(10).unwrap();
        let second = store.get_hadiths(10).unwrap();
        assert_eq!(first, second);

        for pair in first.windows(2) {
            assert!(pair[1].id > pair[0].id);
        }
        assert_eq!(store.get_hadiths(2).unwrap().len(), 2);
    }

    #[test]
    fn test_get_hadith_round_trips_first_row() {
        let store = store();
        let sample = store.get_hadiths(1).unwrap().remove(0);

        let hadith = store.get_hadith(&sample.key()).unwrap().unwrap();
        assert_eq!(hadith, sample);
    }

    #[test]
    fn test_get_hadith_by_number() {
        let store = store();
        let hadith = store.get_hadith_by_number(BUKHARI, "8").unwrap().unwrap();
        assert_eq!(hadith.chapter, fixtures::BELIEF);
        assert!(store.get_hadith_by_number(BUKHARI, "999").unwrap().is_none());
        assert!(store.get_hadith_by_number("Sahih Muslim", "8").unwrap().is_none());
    }

    #[test]
    fn test_get_hadith_returns_none_for_unknown_key() {
        let store = store();
        let missing = HadithKey::new("invalid", "doesn't exist", "999");
        assert!(store.get_hadith(&missing).unwrap().is_none());
    }

    #[test]
    fn test_known_hadith_three() {
        let store = store();
        let hadith = store
            .get_hadith(&HadithKey::new(BUKHARI, REVELATION, "3"))
            .unwrap()
            .unwrap();
        assert_eq!(hadith.hadith_id, Some(3));
        assert_eq!(hadith.chapter_no, 1);
        assert!(hadith
            .text_en
            .as_deref()
            .unwrap()
            .contains("The commencement of the Divine Inspiration"));
        assert!(hadith.explanation.is_some());
    }

    #[test]
    fn test_chain_is_ordered_by_position() {
        let store = store();
        let chain = store
            .get_chain_for_hadith(&HadithKey::new(BUKHARI, REVELATION, "2"))
            .unwrap();
        assert_eq!(chain.len(), 5);

        let expected = [
            "أمّ المؤمنين عائشة بنت أبي بكر الصديق",
            "عروة بن الزبير",
            "هشام بن عروة",
            "مالك بن أنس بن مالك بن أبي عامر",
            "عبد الله بن يوسف التنيسي",
        ];
        for (idx, link) in chain.iter().enumerate() {
            assert_eq!(link.narrator.name, expected[idx]);
            assert_eq!(link.position, idx as i64 + 1);
            assert_eq!(link.source, BUKHARI);
            assert_eq!(link.hadith_no, "2");
        }
    }

    #[test]
    fn test_chain_empty_for_unknown_key() {
        let store = store();
        let chain = store
            .get_chain_for_hadith(&HadithKey::new("invalid", "doesn't exist", "999"))
            .unwrap();
        assert!(chain.is_empty());
    }

    #[test]
    fn test_hadiths_by_chapter_carry_first_narrator() {
        let store = store();
        let hadiths = store.get_hadiths_by_chapter(BUKHARI, REVELATION).unwrap();
        let numbers: Vec<_> = hadiths.iter().map(|h| h.hadith.hadith_no.as_str()).collect();
        assert_eq!(numbers, vec!["1", "2", "3", "10"]);

        let second = &hadiths[1];
        assert_eq!(
            second.narrator_name.as_deref(),
            Some("أمّ المؤمنين عائشة بنت أبي بكر الصديق")
        );
        // hadith 10 has no chain rows
        assert!(hadiths[3].narrator_name.is_none());
    }

    #[test]
    fn test_source_chapters_grouped() {
        let store = store();
        let chapters = store.get_source_chapters(BUKHARI).unwrap();
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].chapter, REVELATION);
        assert_eq!(chapters[0].count, 4);
        assert_eq!(chapters[1].chapter_no, 2);
        assert!(store.get_source_chapters("Unknown").unwrap().is_empty());
    }

    #[test]
    fn test_predecessors_and_successors() {
        let store = store();
        let urwa = store.get_narrator("عروة بن الزبير").unwrap().unwrap();

        let teachers = store.get_predecessors(urwa.scholar_indx, BUKHARI).unwrap();
        assert_eq!(teachers.len(), 1);
        assert_eq!(teachers[0].name, "أمّ المؤمنين عائشة بنت أبي بكر الصديق");

        let students = store.get_successors(urwa.scholar_indx, BUKHARI).unwrap();
        let names: Vec<_> = students.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["ابن شهاب الزهري", "هشام بن عروة"]);
    }

    #[test]
    fn test_narrated_about_counts_chapters() {
        let store = store();
        let aisha = store
            .get_narrator("أمّ المؤمنين عائشة بنت أبي بكر الصديق")
            .unwrap()
            .unwrap();
        let chapters = store.narrated_about(aisha.scholar_indx, BUKHARI).unwrap();
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].chapter, REVELATION);
        assert_eq!(chapters[0].count, 2);
    }

    #[test]
    fn test_search_narrators_matches_grade() {
        let store = store();
        let found = store.search_narrators("Comp.").unwrap();
        assert_eq!(found.len(), 2);
        assert!(store.search_narrators("zzz").unwrap().is_empty());
    }

    #[test]
    fn test_narrator_info_longest_first() {
        let store = store();
        let notes = store.get_narrator_info(1).unwrap();
        assert_eq!(notes.len(), 2);
        assert!(notes[0].content.as_ref().unwrap().len() >= notes[1].content.as_ref().unwrap().len());
    }

    #[test]
    fn test_narrator_stats() {
        let store = store();
        let stats = store.get_narrator_stats(2).unwrap().unwrap();
        assert_eq!(stats.narrator.name, "عروة بن الزبير");
        assert_eq!(stats.hadith_count, 2);
        assert_eq!(stats.sources, vec![BUKHARI.to_string()]);
        assert!(store.get_narrator_stats(9999).unwrap().is_none());
    }

    #[test]
    fn test_ranked_narrators() {
        let store = store();
        let ranked = store.get_narrators_with_hadiths(BUKHARI).unwrap();
        assert_eq!(ranked[0].narrator.name, "أمّ المؤمنين عائشة بنت أبي بكر الصديق");
        assert_eq!(ranked[0].hadith_count, 3);
        assert!(ranked.windows(2).all(|w| w[0].hadith_count >= w[1].hadith_count));

        let followers = store.get_narrators_by_grade("Follower(Tabi')").unwrap();
        assert_eq!(followers[0].narrator.name, "عروة بن الزبير");
    }

    #[test]
    fn test_narrators_with_hadiths_only_skips_unused() {
        let store = store();
        let all = store.get_narrators().unwrap();
        let used = store.get_narrators_with_hadiths_only().unwrap();
        assert!(used.len() < all.len());
        assert!(used.iter().all(|n| n.name != "راوٍ بلا أحاديث"));
    }

    #[test]
    fn test_narrator_pairs_have_positive_counts() {
        let store = store();
        let pairs = store.get_narrator_pairs(BUKHARI).unwrap();
        assert!(!pairs.is_empty());
        assert!(pairs.iter().all(|p| p.hadith_count > 0));

        let top = &pairs[0];
        assert_eq!(top.from_narrator, "أمّ المؤمنين عائشة بنت أبي بكر الصديق");
        assert_eq!(top.to_narrator, "عروة بن الزبير");
        assert_eq!(top.hadith_count, 2);
    }

    #[test]
    fn test_hadiths_from_narrator_to_narrator() {
        let store = store();
        let hadiths = store
            .get_hadiths_from_narrator_to_narrator(
                "أمّ المؤمنين عائشة بنت أبي بكر الصديق",
                "عروة بن الزبير",
                Some(BUKHARI),
                10,
            )
            .unwrap();
        assert_eq!(hadiths.len(), 2);
        for summary in &hadiths {
            assert_eq!(
                summary.narrator_name.as_deref(),
                Some("أمّ المؤمنين عائشة بنت أبي بكر الصديق")
            );
        }

        // reversed direction never matches
        let reversed = store
            .get_hadiths_from_narrator_to_narrator(
                "عروة بن الزبير",
                "أمّ المؤمنين عائشة بنت أبي بكر الصديق",
                None,
                10,
            )
            .unwrap();
        assert!(reversed.is_empty());
    }

    #[test]
    fn test_export_rows_filter_explanations() {
        let store = store();
        let all = store.get_export_rows(Some(BUKHARI), false).unwrap();
        let explained = store.get_export_rows(Some(BUKHARI), true).unwrap();
        assert_eq!(all.len(), 5);
        assert_eq!(explained.len(), 3);
    }

    #[test]
    fn test_narrator_dates_read() {
        let store = store();
        let malik = store
            .get_narrator("مالك بن أنس بن مالك بن أبي عامر")
            .unwrap()
            .unwrap();
        assert_eq!(malik.death_date_hijri, Some(179));
        assert_eq!(malik.birth_date_hijri, Some(93));
        assert_eq!(malik.death_place.as_deref(), Some("المدينة"));
    }

    #[test]
    fn test_lenient_int_accepts_real_and_text() {
        let store = store();
        let values = store
            .conn
            .query_row("SELECT 93.5, ' 179 ', NULL, 'unknown'", [], |row| {
                Ok([
                    lenient_int(row, 0)?,
                    lenient_int(row, 1)?,
                    lenient_int(row, 2)?,
                    lenient_int(row, 3)?,
                ])
            })
            .unwrap();
        assert_eq!(values, [Some(93), Some(179), None, None]);
    }

    #[test]
    fn test_stats() {
        let store = store();
        let stats = store.stats().unwrap();
        assert_eq!(stats.hadiths, 5);
        assert_eq!(stats.narrators, 8);
        assert!(stats.to_string().contains("Hadiths: 5"));
    }

    #[test]
    fn test_open_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = SqliteStore::open(&dir.path().join("missing.db")).err().unwrap();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_create_then_open_read_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("isnad.db");
        {
            let store = SqliteStore::create(&path).unwrap();
            store.execute_batch(fixtures::SEED_SQL).unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.stats().unwrap().hadiths, 5);
        assert!(store.execute_batch("DELETE FROM hadiths").is_err());
    }
}
