//! Storage Layer - SQLite-backed hadith store
//!
//! System of record is a pre-populated SQLite database with tables:
//! - hadiths(id, hadith_id, source, chapter_no, hadith_no, chapter, text_ar, text_en, explanation)
//! - rawis(scholar_indx, name, grade, parents, birth/death dates, death_place)
//! - hadith_chains(source, chapter_no, hadith_no, scholar_indx, position)
//! - sources(id, scholar_indx, book_source, content)

pub mod schema;
pub mod sqlite;

#[cfg(test)]
pub(crate) mod fixtures;

pub use sqlite::{SqliteStore, DbStats};
