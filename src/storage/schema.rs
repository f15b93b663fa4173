//! Database schema definitions
//!
//! The browser never writes to these tables at runtime; the statements exist so a fresh
//! database can be created by `isnad init` and so tests can build one in memory.

/// SQL to create the hadiths table
pub const CREATE_HADITHS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS hadiths (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    hadith_id INTEGER,
    source TEXT,
    chapter_no INTEGER,
    hadith_no TEXT,
    chapter TEXT,
    text_ar TEXT,
    text_en TEXT,
    explanation TEXT
)
"#;

/// SQL to create the rawis (narrators) table
pub const CREATE_RAWIS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS rawis (
    scholar_indx INTEGER PRIMARY KEY,
    name TEXT,
    full_name TEXT,
    grade TEXT,
    parents TEXT,
    birth_date_hijri INTEGER,
    birth_date_gregorian INTEGER,
    death_date_hijri INTEGER,
    death_date_gregorian INTEGER,
    death_place TEXT
)
"#;

/// SQL to create the hadith_chains table
/// One row per (hadith, position); position 1 is the earliest narrator
pub const CREATE_HADITH_CHAINS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS hadith_chains (
    source TEXT,
    chapter_no INTEGER,
    hadith_no TEXT,
    scholar_indx INTEGER,
    position INTEGER,
    FOREIGN KEY (scholar_indx) REFERENCES rawis(scholar_indx)
)
"#;

/// SQL to create the sources table (biographical notes per narrator)
pub const CREATE_SOURCES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS sources (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    scholar_indx INTEGER,
    book_source TEXT,
    content TEXT,
    FOREIGN KEY (scholar_indx) REFERENCES rawis(scholar_indx)
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_hadiths_hadith_id ON hadiths(hadith_id)",
    "CREATE INDEX IF NOT EXISTS idx_hadiths_source_chapter ON hadiths(source, chapter_no)",
    "CREATE INDEX IF NOT EXISTS idx_rawis_name ON rawis(name)",
    "CREATE INDEX IF NOT EXISTS idx_rawis_grade ON rawis(grade)",
    "CREATE INDEX IF NOT EXISTS idx_chains_hadith ON hadith_chains(source, chapter_no, hadith_no)",
    "CREATE INDEX IF NOT EXISTS idx_chains_scholar_pos ON hadith_chains(scholar_indx, position)",
    "CREATE INDEX IF NOT EXISTS idx_chains_source_scholar ON hadith_chains(source, scholar_indx)",
    "CREATE INDEX IF NOT EXISTS idx_sources_scholar ON sources(scholar_indx)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![
        CREATE_HADITHS_TABLE,
        CREATE_RAWIS_TABLE,
        CREATE_HADITH_CHAINS_TABLE,
        CREATE_SOURCES_TABLE,
    ];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
