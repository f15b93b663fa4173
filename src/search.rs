//! In-memory hadith search
//!
//! The index is loaded once and never mutated. Queries are plain substring filters over
//! normalized text: no ranking, no tokenization.

use std::sync::LazyLock;
use regex::Regex;
use serde::{Deserialize, Serialize};
use crate::Result;
use crate::model::SearchRecord;
use crate::storage::SqliteStore;

/// Results per page
pub const PAGE_SIZE: usize = 30;

/// Arabic diacritics (tashkeel, Quranic marks) and bidirectional control characters
static DIACRITICS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("[\u{0610}-\u{061A}\u{064B}-\u{065F}\u{0670}\u{06D6}-\u{06ED}\u{200E}\u{200F}\u{202A}-\u{202E}\u{2066}-\u{2069}]")
        .expect("valid regex")
});
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

pub fn strip_diacritics(text: &str) -> String {
    DIACRITICS.replace_all(text, "").into_owned()
}

pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Form both the query and the haystack are compared in
pub fn normalize_for_search(text: &str) -> String {
    normalize_whitespace(&strip_diacritics(text))
}

/// Filters of one search request. Empty strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub text: Option<String>,
    pub source: Option<String>,
    pub chapter: Option<String>,
    pub narrator: Option<String>,
    pub page: usize,
}

impl SearchQuery {
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn chapter(mut self, chapter: impl Into<String>) -> Self {
        self.chapter = Some(chapter.into());
        self
    }

    pub fn narrator(mut self, narrator: impl Into<String>) -> Self {
        self.narrator = Some(narrator.into());
        self
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// One page of matches
#[derive(Debug, Clone, Serialize)]
pub struct SearchPage {
    pub results: Vec<SearchRecord>,
    pub total: usize,
    pub page: usize,
    pub has_more: bool,
}

struct Entry {
    record: SearchRecord,
    text: String,
    narrator: Option<String>,
}

/// Immutable search index over every hadith with its first narrator
pub struct SearchIndex {
    entries: Vec<Entry>,
}

impl SearchIndex {
    pub fn from_records(records: Vec<SearchRecord>) -> Self {
        let entries = records
            .into_iter()
            .map(|record| Entry {
                text: normalize_for_search(&record.text_ar),
                narrator: record.narrator_name.as_deref().map(normalize_for_search),
                record,
            })
            .collect();
        Self { entries }
    }

    /// Build the index from every hadith in the store
    pub fn load(store: &SqliteStore) -> Result<Self> {
        let records = store.get_export_rows(None, false)?;
        tracing::info!("Search index loaded with {} hadiths", records.len());
        Ok(Self::from_records(records))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct chapters of a source, in the order they first appear
    pub fn chapters(&self, source: &str) -> Vec<String> {
        let mut chapters: Vec<String> = Vec::new();
        for entry in self.entries.iter().filter(|e| e.record.source == source) {
            if !chapters.contains(&entry.record.chapter) {
                chapters.push(entry.record.chapter.clone());
            }
        }
        chapters
    }

    /// Apply source, chapter, narrator and text filters in that order and slice out one page
    pub fn search(&self, query: &SearchQuery) -> SearchPage {
        let source = non_empty(&query.source);
        let chapter = non_empty(&query.chapter);
        let narrator = non_empty(&query.narrator).map(normalize_for_search);
        let text = non_empty(&query.text).map(normalize_for_search);

        let filtered: Vec<&Entry> = self
            .entries
            .iter()
            .filter(|e| source.is_none_or(|s| e.record.source == s))
            .filter(|e| chapter.is_none_or(|c| e.record.chapter == c))
            .filter(|e| match &narrator {
                Some(n) => e.narrator.as_deref().is_some_and(|name| name.contains(n.as_str())),
                None => true,
            })
            .filter(|e| match &text {
                Some(t) => e.text.contains(t.as_str()),
                None => true,
            })
            .collect();

        let total = filtered.len();
        let start = query.page.saturating_mul(PAGE_SIZE).min(total);
        let end = start.saturating_add(PAGE_SIZE).min(total);
        tracing::debug!("Search matched {} hadiths, page {}", total, query.page);

        SearchPage {
            results: filtered[start..end].iter().map(|e| e.record.clone()).collect(),
            total,
            page: query.page,
            has_more: query.page.saturating_add(1).saturating_mul(PAGE_SIZE) < total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(source: &str, chapter: &str, hadith_no: usize, text: &str, narrator: Option<&str>) -> SearchRecord {
        SearchRecord {
            id: Some(hadith_no as i64),
            source: source.to_string(),
            chapter: chapter.to_string(),
            chapter_no: 1,
            hadith_no: hadith_no.to_string(),
            text_ar: text.to_string(),
            narrator_name: narrator.map(str::to_string),
        }
    }

    #[test]
    fn test_normalize_for_search() {
        assert_eq!(normalize_for_search("إِنَّمَا الأَعْمَالُ"), "إنما الأعمال");
        assert_eq!(normalize_for_search("  \u{200F}نص\t\n  آخر "), "نص آخر");
        assert_eq!(normalize_for_search(""), "");
    }

    #[test]
    fn test_text_match_ignores_diacritics() {
        let index = SearchIndex::from_records(vec![
            record("Sahih Bukhari", "بدء الوحي", 1, "إِنَّمَا الأَعْمَالُ بِالنِّيَّاتِ", None),
            record("Sahih Bukhari", "بدء الوحي", 2, "كيف يأتيك الوحي", None),
        ]);

        let page = index.search(&SearchQuery::default().text("الأعمال بالنيات"));
        assert_eq!(page.total, 1);
        assert_eq!(page.results[0].hadith_no, "1");

        // diacritics in the query are stripped as well
        let page = index.search(&SearchQuery::default().text("الْوَحْيُ"));
        assert_eq!(page.total, 1);
        assert_eq!(page.results[0].hadith_no, "2");
    }

    #[test]
    fn test_filters_combine() {
        let index = SearchIndex::from_records(vec![
            record("Sahih Bukhari", "الإيمان", 1, "نص", Some("أبو هريرة")),
            record("Sahih Bukhari", "العلم", 2, "نص", Some("أبو هريرة")),
            record("Sahih Muslim", "الإيمان", 3, "نص", Some("أبو هريرة")),
            record("Sahih Bukhari", "الإيمان", 4, "نص", None),
        ]);

        let query = SearchQuery::default()
            .source("Sahih Bukhari")
            .chapter("الإيمان")
            .narrator("هريرة");
        let page = index.search(&query);
        assert_eq!(page.total, 1);
        assert_eq!(page.results[0].hadith_no, "1");

        // blank filters are ignored
        let page = index.search(&SearchQuery::default().source("  ").text(""));
        assert_eq!(page.total, 4);
    }

    #[test]
    fn test_pagination() {
        let records = (0..65)
            .map(|i| record("Sahih Bukhari", "باب", i, "متن", None))
            .collect();
        let index = SearchIndex::from_records(records);

        let first = index.search(&SearchQuery::default());
        assert_eq!(first.results.len(), PAGE_SIZE);
        assert!(first.has_more);

        let third = index.search(&SearchQuery::default().page(2));
        assert_eq!(third.results.len(), 5);
        assert_eq!(third.results[0].hadith_no, "60");
        assert!(!third.has_more);

        let beyond = index.search(&SearchQuery::default().page(9));
        assert!(beyond.results.is_empty());
        assert_eq!(beyond.total, 65);
        assert!(!beyond.has_more);
    }

    #[test]
    fn test_huge_page_is_empty_without_more() {
        let records = (0..5).map(|i| record("Sahih Bukhari", "باب", i, "متن", None)).collect();
        let index = SearchIndex::from_records(records);

        let page = index.search(&SearchQuery::default().page(usize::MAX));
        assert!(page.results.is_empty());
        assert_eq!(page.total, 5);
        assert_eq!(page.page, usize::MAX);
        assert!(!page.has_more);
    }

    #[test]
    fn test_chapters_in_first_seen_order() {
        let index = SearchIndex::from_records(vec![
            record("Sahih Bukhari", "ب", 1, "", None),
            record("Sahih Bukhari", "أ", 2, "", None),
            record("Sahih Muslim", "ج", 3, "", None),
            record("Sahih Bukhari", "ب", 4, "", None),
        ]);
        assert_eq!(index.chapters("Sahih Bukhari"), vec!["ب", "أ"]);
        assert!(index.chapters("Sunan Ibn Majah").is_empty());
    }

    #[test]
    fn test_load_from_store() {
        let store = crate::storage::fixtures::seeded_store();
        let index = SearchIndex::load(&store).unwrap();
        assert_eq!(index.len(), 5);

        let page = index.search(&SearchQuery::default().narrator("عائشة"));
        assert_eq!(page.total, 3);
    }
}
