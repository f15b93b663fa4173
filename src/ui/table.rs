use tabled::{settings::Style, Table, Tabled};
use crate::model::{ChainNarrator, RankedNarrator, SearchRecord};
use crate::storage::DbStats;
use crate::text;

/// Hadith text shown per search row
const EXCERPT_CHARS: usize = 60;

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Tabled)]
struct ChainRow {
    #[tabled(rename = "#")]
    position: i64,
    #[tabled(rename = "Narrator")]
    name: String,
    #[tabled(rename = "Grade")]
    grade: String,
    #[tabled(rename = "Death (AH)")]
    death: String,
}

#[derive(Tabled)]
struct NarratorRow {
    #[tabled(rename = "Narrator")]
    name: String,
    #[tabled(rename = "Grade")]
    grade: String,
    #[tabled(rename = "Hadiths")]
    hadiths: i64,
}

#[derive(Tabled)]
struct SearchRow {
    #[tabled(rename = "Chapter")]
    chapter: String,
    #[tabled(rename = "No.")]
    hadith_no: String,
    #[tabled(rename = "Narrator")]
    narrator: String,
    #[tabled(rename = "Text")]
    excerpt: String,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        render(&self.rows)
    }
}

fn render<T: Tabled>(rows: &[T]) -> String {
    if rows.is_empty() {
        return String::new();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

fn or_dash(value: Option<String>) -> String {
    value.unwrap_or_else(|| "-".to_string())
}

pub fn stats_table(stats: &DbStats) -> String {
    let mut builder = TableBuilder::new();
    builder.add_row("Hadiths", &stats.hadiths.to_string());
    builder.add_row("Narrators", &stats.narrators.to_string());
    builder.add_row("Chain links", &stats.chain_links.to_string());
    builder.add_row("Narrator sources", &stats.narrator_sources.to_string());
    builder.build()
}

pub fn chain_table(chain: &[ChainNarrator]) -> String {
    let rows: Vec<ChainRow> = chain
        .iter()
        .map(|c| ChainRow {
            position: c.position,
            name: c.narrator.name.clone(),
            grade: or_dash(c.narrator.grade.as_deref().map(|g| text::arabic_grade(g).to_string())),
            death: or_dash(c.narrator.death_date_hijri.map(|d| d.to_string())),
        })
        .collect();
    render(&rows)
}

pub fn narrator_table(narrators: &[RankedNarrator]) -> String {
    let rows: Vec<NarratorRow> = narrators
        .iter()
        .map(|n| NarratorRow {
            name: n.narrator.name.clone(),
            grade: or_dash(n.narrator.grade.as_deref().map(|g| text::arabic_grade(g).to_string())),
            hadiths: n.hadith_count,
        })
        .collect();
    render(&rows)
}

pub fn search_table(records: &[SearchRecord]) -> String {
    let rows: Vec<SearchRow> = records
        .iter()
        .map(|r| {
            let mut excerpt: String = r.text_ar.chars().take(EXCERPT_CHARS).collect();
            if r.text_ar.chars().count() > EXCERPT_CHARS {
                excerpt.push('…');
            }
            SearchRow {
                chapter: text::clean_name(&r.chapter),
                hadith_no: r.hadith_no.clone(),
                narrator: or_dash(r.narrator_name.clone()),
                excerpt,
            }
        })
        .collect();
    render(&rows)
}
