//! Record types mirrored from the hadith store
//!
//! The dataset is pre-populated and read-only, so these are plain data carriers:
//! - `Hadith`: one row of `hadiths`
//! - `Narrator`: one row of `rawis`
//! - `ChainNarrator`: one `hadith_chains` link joined with its narrator
//! - derived read models used by listings and profiles

use serde::{Deserialize, Serialize};

/// Identifies a hadith the way the browser routes do: by source, chapter title and number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HadithKey {
    pub source: String,
    pub chapter: String,
    pub hadith_no: String,
}

impl HadithKey {
    pub fn new(source: impl Into<String>, chapter: impl Into<String>, hadith_no: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            chapter: chapter.into(),
            hadith_no: hadith_no.into(),
        }
    }
}

impl std::fmt::Display for HadithKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {} / {}", self.source, self.chapter, self.hadith_no)
    }
}

/// A hadith text with its location in a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hadith {
    pub id: i64,
    /// Numeric id within the source collection
    pub hadith_id: Option<i64>,
    pub source: String,
    pub chapter_no: i64,
    /// Hadith number as printed, may carry suffixes such as `12/a`
    pub hadith_no: String,
    pub chapter: String,
    pub text_ar: String,
    pub text_en: Option<String>,
    pub explanation: Option<String>,
}

impl Hadith {
    pub fn key(&self) -> HadithKey {
        HadithKey::new(&self.source, &self.chapter, &self.hadith_no)
    }

    pub fn has_explanation(&self) -> bool {
        self.explanation.as_deref().is_some_and(|e| !e.trim().is_empty())
    }
}

/// A narrator (rawi).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Narrator {
    pub scholar_indx: i64,
    pub name: String,
    pub full_name: Option<String>,
    pub grade: Option<String>,
    pub parents: Option<String>,
    pub birth_date_hijri: Option<i64>,
    pub birth_date_gregorian: Option<i64>,
    pub death_date_hijri: Option<i64>,
    pub death_date_gregorian: Option<i64>,
    pub death_place: Option<String>,
}

impl Narrator {
    pub fn grade_or_empty(&self) -> &str {
        self.grade.as_deref().unwrap_or("")
    }

    pub fn has_birth_date(&self) -> bool {
        self.birth_date_hijri.is_some() || self.birth_date_gregorian.is_some()
    }

    pub fn has_death_date(&self) -> bool {
        self.death_date_hijri.is_some() || self.death_date_gregorian.is_some()
    }
}

/// One position of a transmission chain, joined with the narrator at that position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainNarrator {
    pub source: String,
    pub chapter_no: i64,
    pub hadith_no: String,
    /// 1 is the narrator closest to the Prophet; `position + 1` received from `position`
    pub position: i64,
    #[serde(flatten)]
    pub narrator: Narrator,
}

/// A hadith with the name of the first narrator of its chain, as listed on index pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HadithSummary {
    #[serde(flatten)]
    pub hadith: Hadith,
    pub narrator_name: Option<String>,
}

/// A chapter of a source with the number of hadiths it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub source: String,
    pub chapter: String,
    pub chapter_no: i64,
    pub count: i64,
}

/// How many distinct hadiths a narrator appears in per chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterCount {
    pub source: String,
    pub chapter: String,
    pub count: i64,
}

/// Biographical note on a narrator (`sources` table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarratorSource {
    pub id: i64,
    pub scholar_indx: i64,
    pub book_source: Option<String>,
    pub content: Option<String>,
}

/// A narrator with the number of hadiths it appears in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedNarrator {
    #[serde(flatten)]
    pub narrator: Narrator,
    pub hadith_count: i64,
}

/// Aggregate figures for one narrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarratorStats {
    #[serde(flatten)]
    pub narrator: Narrator,
    pub hadith_count: i64,
    pub sources: Vec<String>,
}

/// Two narrators adjacent in at least one chain; `to_narrator` received from `from_narrator`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarratorPair {
    pub from_narrator: String,
    pub to_narrator: String,
    pub hadith_count: i64,
}

/// Row shape of the static JSON exports consumed by the search page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub source: String,
    pub chapter: String,
    pub chapter_no: i64,
    pub hadith_no: String,
    pub text_ar: String,
    pub narrator_name: Option<String>,
}

impl From<&HadithSummary> for SearchRecord {
    fn from(summary: &HadithSummary) -> Self {
        let h = &summary.hadith;
        Self {
            id: Some(h.id),
            source: h.source.clone(),
            chapter: h.chapter.clone(),
            chapter_no: h.chapter_no,
            hadith_no: h.hadith_no.clone(),
            text_ar: h.text_ar.clone(),
            narrator_name: summary.narrator_name.clone(),
        }
    }
}
