//! Isnad CLI - browse hadith collections and their narrator chains

use std::path::{Path, PathBuf};
use std::sync::Arc;
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use isnad::backend::RecordsIsnadSource;
use isnad::config::{self, IsnadConfig, Settings};
use isnad::model::HadithKey;
use isnad::search::{SearchIndex, SearchQuery};
use isnad::storage::SqliteStore;
use isnad::text;
use isnad::ui::{self, Icons};
use isnad::web::{self, AppState};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "isnad")]
#[command(version)]
#[command(about = "Hadith transmission-chain browser - narrators, hadith texts and isnad graphs")]
#[command(long_about = r#"
Isnad serves a read-only hadith database as a website, enabling:
  • Browsing collections by chapter
  • Narrator profiles with their teachers and students
  • Chain-of-narration graphs for every hadith
  • Diacritic-insensitive search

Example usage:
  isnad init --from dump.sql
  isnad serve --port 3000
  isnad chain "Sahih Bukhari" "كتاب بدء الوحى" 2
  isnad search --narrator عائشة
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file
    #[arg(short, long, global = true, default_value = "isnad.toml")]
    config: PathBuf,

    /// Path to the database file (overrides the config file)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    format: OutputMode,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the website
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Write hadiths.json and search_index.json
    Export {
        /// Output directory
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Show the chain of narrators of one hadith
    Chain {
        source: String,
        chapter: String,
        hadith_no: String,
    },

    /// Show a narrator's profile, teachers and students
    Narrator {
        name: String,
    },

    /// Search hadiths
    Search {
        /// Text to look for
        text: Option<String>,

        /// Collection (defaults to the first configured source)
        #[arg(long)]
        source: Option<String>,

        /// Chapter name
        #[arg(long)]
        chapter: Option<String>,

        /// Part of a narrator's name
        #[arg(long)]
        narrator: Option<String>,

        /// Result page, starting at 0
        #[arg(long, default_value = "0")]
        page: usize,
    },

    /// Show statistics about the database
    Stats {
        /// Number of top narrators to list
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Write a config file and optionally build the database from a SQL dump
    Init {
        /// SQL dump to load into the database
        #[arg(long)]
        from: Option<PathBuf>,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    Text,
    Json,
}

impl OutputMode {
    pub fn is_human(self) -> bool {
        self == OutputMode::Text
    }
}

/// Machine-readable result of a command
pub fn emit_success(output_mode: OutputMode, command: &str, data: serde_json::Value) -> anyhow::Result<()> {
    if output_mode.is_human() {
        println!("{}", serde_json::to_string_pretty(&data)?);
    } else {
        let envelope = serde_json::json!({
            "status": "success",
            "command": command,
            "data": data,
        });
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // stderr keeps `--format json` output clean
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let mut settings = config::load_config(Some(&cli.config))?
        .unwrap_or_default()
        .resolve();
    if let Some(database) = &cli.database {
        settings.database = database.clone();
    }
    Ok(settings)
}

fn open_store(path: &Path) -> anyhow::Result<SqliteStore> {
    SqliteStore::open(path).with_context(|| {
        format!("cannot open {} (run `isnad init --from <dump.sql>` first)", path.display())
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output_mode = cli.format;
    let settings = load_settings(&cli)?;
    tracing::debug!("Settings: {:?}", settings);

    match cli.command {
        Commands::Serve { port } => run_serve(settings, port),
        Commands::Export { ref out } => run_export(output_mode, &settings, out.as_deref()),
        Commands::Chain { ref source, ref chapter, ref hadith_no } => {
            run_chain(output_mode, &settings, HadithKey::new(source, chapter, hadith_no))
        }
        Commands::Narrator { ref name } => run_narrator(output_mode, &settings, name),
        Commands::Search { ref text, ref source, ref chapter, ref narrator, page } => {
            let mut query = SearchQuery::default().page(page);
            query.text = text.clone();
            query.source = source.clone().or_else(|| Some(settings.primary_source().to_string()));
            query.chapter = chapter.clone();
            query.narrator = narrator.clone();
            run_search(output_mode, &settings, &query)
        }
        Commands::Stats { limit } => run_stats(output_mode, &settings, limit),
        Commands::Init { ref from, force } => run_init(output_mode, &cli, &settings, from.as_deref(), force),
    }
}

fn run_serve(mut settings: Settings, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(port) = port {
        settings.port = port;
    }
    let port = settings.port;
    let store = open_store(&settings.database)?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let state = AppState::new(store, settings)?;
        let state = with_graph_backend(state).await?;
        web::start_server(state, port).await
    })
}

/// Chains from a records file when one is configured, otherwise from SQLite
fn with_records_backend(state: AppState) -> anyhow::Result<AppState> {
    match state.settings.isnad_records.clone() {
        Some(path) => {
            let source = RecordsIsnadSource::load(&path)
                .with_context(|| format!("cannot load isnad records from {}", path.display()))?;
            tracing::info!("Loaded {} isnad records from {}", source.len(), path.display());
            Ok(state.with_isnad_source(Arc::new(source)))
        }
        None => Ok(state),
    }
}

#[cfg(feature = "neo4j")]
async fn with_graph_backend(state: AppState) -> anyhow::Result<AppState> {
    use isnad::backend::neo4j::Neo4jIsnadSource;

    let state = with_records_backend(state)?;
    match state.settings.neo4j.clone() {
        Some(neo4j) => {
            let source = Neo4jIsnadSource::connect(&neo4j)
                .await
                .with_context(|| format!("cannot connect to {}", neo4j.uri))?;
            Ok(state.with_isnad_source(Arc::new(source)))
        }
        None => Ok(state),
    }
}

#[cfg(not(feature = "neo4j"))]
async fn with_graph_backend(state: AppState) -> anyhow::Result<AppState> {
    if state.settings.neo4j.is_some() {
        tracing::warn!("[neo4j] is configured but this build lacks the `neo4j` feature; ignoring it");
    }
    with_records_backend(state)
}

fn run_export(output_mode: OutputMode, settings: &Settings, out: Option<&Path>) -> anyhow::Result<()> {
    let store = open_store(&settings.database)?;
    let out_dir = out.unwrap_or(&settings.export_dir);
    let summary = isnad::export::export_all(&store, &settings.sources, out_dir)?;

    if output_mode.is_human() {
        ui::success("Export complete");
        ui::status(Icons::FILE, "Hadiths", &format!("{} → {}", summary.hadiths, summary.hadiths_path.display()));
        ui::status(
            Icons::SEARCH,
            "Search index",
            &format!("{} → {}", summary.search_index, summary.search_index_path.display()),
        );
    } else {
        emit_success(output_mode, "export", serde_json::to_value(&summary)?)?;
    }
    Ok(())
}

fn run_chain(output_mode: OutputMode, settings: &Settings, key: HadithKey) -> anyhow::Result<()> {
    let store = open_store(&settings.database)?;
    let hadith = store
        .get_hadith(&key)?
        .with_context(|| format!("{} ({key})", text::HADITH_NOT_FOUND.title))?;
    let chain = store.get_chain_for_hadith(&key)?;

    if !output_mode.is_human() {
        return emit_success(
            output_mode,
            "chain",
            serde_json::json!({ "hadith": hadith, "chain": chain }),
        );
    }

    ui::header(&format!("{} / {} / {}", key.source, text::clean_name(&key.chapter), key.hadith_no));
    println!("{}", hadith.text_ar);
    if let Some(english) = &hadith.text_en {
        println!("{}", ui::dim(english));
    }

    ui::section(&format!("{} {}", Icons::LINK, text::ui_text::ISNAD));
    if chain.is_empty() {
        ui::warn(text::ui_text::NO_RESULTS);
        return Ok(());
    }
    for step in &chain {
        ui::chain_step(step.position, &step.narrator.name, step.narrator.grade.as_deref().map(text::arabic_grade));
    }
    println!();
    println!("{}", ui::chain_table(&chain));
    Ok(())
}

fn run_narrator(output_mode: OutputMode, settings: &Settings, name: &str) -> anyhow::Result<()> {
    let store = open_store(&settings.database)?;
    let narrator = store
        .get_narrator(name)?
        .with_context(|| format!("{}: {name}", text::NARRATOR_NOT_FOUND.title))?;
    let source = settings.primary_source();
    let teachers = store.get_predecessors(narrator.scholar_indx, source)?;
    let students = store.get_successors(narrator.scholar_indx, source)?;
    let stats = store.get_narrator_stats(narrator.scholar_indx)?;

    if !output_mode.is_human() {
        return emit_success(
            output_mode,
            "narrator",
            serde_json::json!({
                "narrator": narrator,
                "stats": stats,
                "teachers": teachers,
                "students": students,
            }),
        );
    }

    ui::header(&narrator.name);
    if let Some(grade) = &narrator.grade {
        ui::info(text::ui_text::GRADE, text::arabic_grade(grade));
    }
    if let Some(year) = narrator.birth_date_hijri {
        ui::info(text::ui_text::BIRTH, &text::to_arabic_numerals(year));
    }
    if let Some(year) = narrator.death_date_hijri {
        ui::info(text::ui_text::DEATH, &text::to_arabic_numerals(year));
    }
    if let Some(place) = &narrator.death_place {
        ui::info(text::ui_text::DEATH_PLACE, place);
    }
    if let Some(stats) = &stats {
        ui::summary_row("Hadiths:", &stats.hadith_count.to_string());
        ui::summary_row("Sources:", &stats.sources.join(", "));
    }

    ui::section(&format!("{} {}", Icons::UP, text::ui_text::TEACHERS));
    print_names(&teachers);
    ui::section(&format!("{} {}", Icons::DOWN, text::ui_text::STUDENTS));
    print_names(&students);
    Ok(())
}

fn print_names(narrators: &[isnad::Narrator]) {
    if narrators.is_empty() {
        println!("  {}", ui::muted(text::ui_text::NO_RESULTS));
    }
    for n in narrators {
        println!("  {} {}", Icons::PERSON, n.name);
    }
}

fn run_search(output_mode: OutputMode, settings: &Settings, query: &SearchQuery) -> anyhow::Result<()> {
    let store = open_store(&settings.database)?;
    let index = SearchIndex::load(&store)?;
    let page = index.search(query);

    if !output_mode.is_human() {
        return emit_success(output_mode, "search", serde_json::to_value(&page)?);
    }

    ui::status(Icons::SEARCH, "Matches", &page.total.to_string());
    if page.results.is_empty() {
        ui::warn(text::ui_text::NO_RESULTS);
        return Ok(());
    }
    println!("{}", ui::search_table(&page.results));
    if page.has_more {
        println!("{}", ui::muted(&format!("More results: --page {}", page.page + 1)));
    }
    Ok(())
}

fn run_stats(output_mode: OutputMode, settings: &Settings, limit: usize) -> anyhow::Result<()> {
    let store = open_store(&settings.database)?;
    let stats = store.stats()?;
    let source = settings.primary_source();
    let mut top = store.get_narrators_with_hadiths(source)?;
    top.truncate(limit);

    if !output_mode.is_human() {
        return emit_success(
            output_mode,
            "stats",
            serde_json::json!({ "database": stats, "top_narrators": top }),
        );
    }

    ui::header(&format!("{} Isnad Statistics ({})", Icons::STATS, settings.database.display()));
    println!("{}", ui::stats_table(&stats));
    if !top.is_empty() {
        ui::section(&format!("Top narrators in {source}"));
        println!("{}", ui::narrator_table(&top));
    }
    Ok(())
}

fn run_init(
    output_mode: OutputMode,
    cli: &Cli,
    settings: &Settings,
    from: Option<&Path>,
    force: bool,
) -> anyhow::Result<()> {
    let file_config = IsnadConfig {
        database: Some(settings.database.display().to_string()),
        port: Some(settings.port),
        sources: Some(settings.sources.clone()),
        export_dir: Some(settings.export_dir.display().to_string()),
        isnad_records: settings.isnad_records.as_ref().map(|p| p.display().to_string()),
        neo4j: settings.neo4j.clone(),
    };
    config::write_config(&cli.config, &file_config, force)?;

    let mut loaded = None;
    if let Some(dump) = from {
        let sql = std::fs::read_to_string(dump)
            .with_context(|| format!("cannot read {}", dump.display()))?;
        config::ensure_parent_dir(&settings.database)?;
        let store = SqliteStore::create(&settings.database)?;
        store.execute_batch(&sql)?;
        let stats = store.stats()?;
        tracing::info!("Loaded {} into {}", dump.display(), settings.database.display());
        loaded = Some(stats);
    }

    if !output_mode.is_human() {
        return emit_success(
            output_mode,
            "init",
            serde_json::json!({ "config": cli.config, "database": settings.database, "loaded": loaded }),
        );
    }

    ui::success(&format!("Wrote {}", cli.config.display()));
    if let Some(stats) = loaded {
        ui::status(Icons::DATABASE, "Database", &settings.database.display().to_string());
        println!("{}", ui::stats_table(&stats));
    }
    Ok(())
}
