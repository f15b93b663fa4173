use std::sync::Arc;
use axum::{
    Json,
    extract::{Path, Query, State},
    response::Html,
};
use serde::{Deserialize, Serialize};
use crate::export;
use crate::layout::{
    ChainMetrics, DEFAULT_WIDTH, GraphData, GraphViewConfig, TeacherStudentChain, layout_isnad,
    layout_teacher_student, layout_teacher_student_tiers,
};
use crate::model::{HadithKey, SearchRecord};
use crate::search::{SearchPage, SearchQuery};
use crate::text;
use super::error::{ApiError, AppError};
use super::{AppState, GraphPayload, pages};

/// Hadiths listed on the home page
const INDEX_LIMIT: usize = 1000;
/// Upper bound for one narrator-to-narrator listing
const TRANSMISSION_LIMIT: usize = 5000;
const DEFAULT_HEIGHT: f64 = 600.0;

type PageResult = Result<Html<String>, AppError>;

#[derive(Debug, Default, Deserialize)]
pub struct GraphParams {
    pub width: Option<f64>,
    pub height: Option<f64>,
    /// `tiers` selects the top-to-bottom teacher/student layout
    pub layout: Option<String>,
}

impl GraphParams {
    fn size(&self) -> (f64, f64) {
        let width = self.width.filter(|w| w.is_finite() && *w > 0.0).unwrap_or(DEFAULT_WIDTH);
        let height = self.height.filter(|h| h.is_finite() && *h > 0.0).unwrap_or(DEFAULT_HEIGHT);
        (width, height)
    }
}

// ========== Graph builders shared by pages and the JSON API ==========

async fn hadith_graph(state: &AppState, key: &HadithKey, params: &GraphParams) -> Result<GraphPayload, AppError> {
    let (width, height) = params.size();
    let data = match state.isnad.isnad(key).await? {
        Some(isnad) => layout_isnad(&isnad, ChainMetrics::for_width(width)),
        None => GraphData::default(),
    };
    Ok(GraphPayload {
        data,
        config: GraphViewConfig::isnad(width, height),
    })
}

fn narrator_graph(chain: &TeacherStudentChain, params: &GraphParams) -> GraphPayload {
    let (width, height) = params.size();
    let data = match params.layout.as_deref() {
        Some("tiers") => layout_teacher_student_tiers(chain),
        _ => layout_teacher_student(chain, width),
    };
    GraphPayload {
        data,
        config: GraphViewConfig::teacher_student(width, height),
    }
}

async fn teacher_student_chain(state: &AppState, name: &str) -> Result<TeacherStudentChain, AppError> {
    let store = state.store.lock().await;
    let narrator = store
        .get_narrator(name)?
        .ok_or(AppError::NotFound(text::NARRATOR_NOT_FOUND))?;
    let source = state.settings.primary_source();
    let predecessors = store.get_predecessors(narrator.scholar_indx, source)?;
    let successors = store.get_successors(narrator.scholar_indx, source)?;
    Ok(TeacherStudentChain {
        narrator,
        predecessors,
        successors,
    })
}

/// Collections outside the configured list are hidden on every source-scoped route
fn require_source(state: &AppState, source: &str) -> Result<(), AppError> {
    if state.settings.is_configured_source(source) {
        Ok(())
    } else {
        Err(AppError::NotFound(text::SOURCE_NOT_FOUND))
    }
}

// ========== Pages ==========

pub async fn index(State(state): State<Arc<AppState>>) -> PageResult {
    let hadiths = state.store.lock().await.get_hadiths(INDEX_LIMIT)?;
    Ok(Html(pages::index_page(&state.settings.sources, &hadiths)?))
}

pub async fn source_chapters(State(state): State<Arc<AppState>>, Path(source): Path<String>) -> PageResult {
    require_source(&state, &source)?;
    let chapters = state.store.lock().await.get_source_chapters(&source)?;
    if chapters.is_empty() {
        return Err(AppError::NotFound(text::SOURCE_NOT_FOUND));
    }
    Ok(Html(pages::source_page(&state.settings.sources, &source, &chapters)?))
}

pub async fn chapter_hadiths(
    State(state): State<Arc<AppState>>,
    Path((source, chapter)): Path<(String, String)>,
) -> PageResult {
    require_source(&state, &source)?;
    let hadiths = state.store.lock().await.get_hadiths_by_chapter(&source, &chapter)?;
    if hadiths.is_empty() {
        return Err(AppError::NotFound(text::CHAPTER_NOT_FOUND));
    }
    Ok(Html(pages::chapter_page(&state.settings.sources, &source, &chapter, &hadiths)?))
}

pub async fn hadith(
    State(state): State<Arc<AppState>>,
    Path((source, chapter, hadith_no)): Path<(String, String, String)>,
) -> PageResult {
    require_source(&state, &source)?;
    let key = HadithKey::new(source, chapter, hadith_no);
    // the store lock must be released before the isnad backend takes it
    let hadith = state.store.lock().await.get_hadith(&key)?;
    let hadith = hadith.ok_or(AppError::NotFound(text::HADITH_NOT_FOUND))?;

    let graph = hadith_graph(&state, &key, &GraphParams::default()).await?;
    tracing::debug!("Hadith {} graph has {} nodes", key, graph.data.nodes.len());
    Ok(Html(pages::hadith_page(&state.settings.sources, &hadith, &graph)?))
}

pub async fn isnad(State(state): State<Arc<AppState>>, Path(hadith_no): Path<String>) -> PageResult {
    let source = state.settings.primary_source().to_string();
    let hadith = state.store.lock().await.get_hadith_by_number(&source, &hadith_no)?;
    let key = match &hadith {
        Some(h) => h.key(),
        None => HadithKey::new(source, "", &hadith_no),
    };

    let graph = hadith_graph(&state, &key, &GraphParams::default()).await?;
    if graph.data.is_empty() {
        return Err(AppError::NotFound(text::HADITH_NOT_FOUND));
    }
    Ok(Html(pages::isnad_page(&state.settings.sources, &hadith_no, hadith.as_ref(), &graph)?))
}

pub async fn narrators(State(state): State<Arc<AppState>>) -> PageResult {
    let narrators = state.store.lock().await.get_narrators()?;
    Ok(Html(pages::narrators_page(&state.settings.sources, &narrators)?))
}

pub async fn narrator(State(state): State<Arc<AppState>>, Path(name): Path<String>) -> PageResult {
    let chain = teacher_student_chain(&state, &name).await?;
    let source = state.settings.primary_source();
    let (chapters, info) = {
        let store = state.store.lock().await;
        (
            store.narrated_about(chain.narrator.scholar_indx, source)?,
            store.get_narrator_info(chain.narrator.scholar_indx)?,
        )
    };
    let graph = narrator_graph(&chain, &GraphParams::default());

    let profile = pages::NarratorProfile {
        narrator: &chain.narrator,
        source,
        predecessors: &chain.predecessors,
        successors: &chain.successors,
        chapters: &chapters,
        info: &info,
        graph: &graph,
    };
    Ok(Html(pages::narrator_page(&state.settings.sources, &profile)?))
}

pub async fn narrator_to_narrator(
    State(state): State<Arc<AppState>>,
    Path((name, receiver)): Path<(String, String)>,
) -> PageResult {
    let hadiths = state
        .store
        .lock()
        .await
        .get_hadiths_from_narrator_to_narrator(&name, &receiver, None, TRANSMISSION_LIMIT)?;
    if hadiths.is_empty() {
        return Err(AppError::NotFound(text::TRANSMISSION_NOT_FOUND));
    }
    Ok(Html(pages::transmission_page(&state.settings.sources, &name, &receiver, &hadiths)?))
}

/// Default the source filter to the first configured collection
fn search_defaults(state: &AppState, mut query: SearchQuery) -> SearchQuery {
    if query.source.as_deref().is_none_or(|s| s.trim().is_empty()) {
        query.source = Some(state.settings.primary_source().to_string());
    }
    query
}

pub async fn search(State(state): State<Arc<AppState>>, Query(query): Query<SearchQuery>) -> PageResult {
    let query = search_defaults(&state, query);
    let results = state.search.search(&query);
    let chapters = state.search.chapters(query.source.as_deref().unwrap_or_default());
    Ok(Html(pages::search_page(&state.settings.sources, &query, &results, &chapters)?))
}

// ========== JSON ==========

pub async fn hadiths_json(State(state): State<Arc<AppState>>) -> Result<Json<Vec<SearchRecord>>, ApiError> {
    let store = state.store.lock().await;
    Ok(Json(export::hadith_records(&store, &state.settings.sources)?))
}

pub async fn hadith_graph_json(
    State(state): State<Arc<AppState>>,
    Path((source, chapter, hadith_no)): Path<(String, String, String)>,
    Query(params): Query<GraphParams>,
) -> Result<Json<GraphPayload>, ApiError> {
    require_source(&state, &source)?;
    let key = HadithKey::new(source, chapter, hadith_no);
    let exists = state.store.lock().await.get_hadith(&key)?.is_some();
    if !exists {
        return Err(AppError::NotFound(text::HADITH_NOT_FOUND).into());
    }
    Ok(Json(hadith_graph(&state, &key, &params).await?))
}

pub async fn narrator_graph_json(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(params): Query<GraphParams>,
) -> Result<Json<GraphPayload>, ApiError> {
    let chain = teacher_student_chain(&state, &name).await?;
    Ok(Json(narrator_graph(&chain, &params)))
}

#[derive(Serialize)]
pub struct SearchResponse {
    #[serde(flatten)]
    pub page: SearchPage,
    /// Chapters of the filtered source, for the chapter picker
    pub chapters: Vec<String>,
}

pub async fn search_json(State(state): State<Arc<AppState>>, Query(query): Query<SearchQuery>) -> Json<SearchResponse> {
    let query = search_defaults(&state, query);
    let page = state.search.search(&query);
    let chapters = state.search.chapters(query.source.as_deref().unwrap_or_default());
    Json(SearchResponse { page, chapters })
}
