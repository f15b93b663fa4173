//! Web frontend - axum server over the hadith store
//!
//! Pages are rendered server-side; the graph and search scripts call back into `/api/*`.
//! Anything that matches no route is looked up in the export directory.

use axum::{
    Router,
    handler::HandlerWithoutStateExt,
    response::IntoResponse,
    routing::get,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use crate::Result;
use crate::backend::{IsnadSource, SqliteIsnadSource};
use crate::config::Settings;
use crate::layout::{GraphData, GraphViewConfig};
use crate::search::SearchIndex;
use crate::storage::SqliteStore;
use crate::text;

pub mod error;
pub mod pages;
pub mod routes;

use error::AppError;

/// Positioned graph plus the renderer settings it should be drawn with
#[derive(Debug, Clone, Serialize)]
pub struct GraphPayload {
    pub data: GraphData,
    pub config: GraphViewConfig,
}

/// Server state
pub struct AppState {
    pub store: Arc<Mutex<SqliteStore>>,
    pub isnad: Arc<dyn IsnadSource>,
    pub search: SearchIndex,
    pub settings: Settings,
}

impl AppState {
    /// State with chains read from the same SQLite store
    pub fn new(store: SqliteStore, settings: Settings) -> Result<Self> {
        let search = SearchIndex::load(&store)?;
        let store = Arc::new(Mutex::new(store));
        let isnad = Arc::new(SqliteIsnadSource::new(store.clone()));
        Ok(Self {
            store,
            isnad,
            search,
            settings,
        })
    }

    pub fn with_isnad_source(mut self, isnad: Arc<dyn IsnadSource>) -> Self {
        self.isnad = isnad;
        self
    }
}

async fn not_found() -> impl IntoResponse {
    AppError::NotFound(text::PAGE_NOT_FOUND)
}

pub fn router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.settings.export_dir).not_found_service(not_found.into_service());

    Router::new()
        .route("/", get(routes::index))
        .route("/hadith/{source}", get(routes::source_chapters))
        .route("/hadith/{source}/{chapter}", get(routes::chapter_hadiths))
        .route("/hadith/{source}/{chapter}/{hadith_no}", get(routes::hadith))
        .route("/narrator", get(routes::narrators))
        .route("/narrator/{name}", get(routes::narrator))
        .route("/narrator/{name}/to/{receiver}", get(routes::narrator_to_narrator))
        .route("/isnad/{hadith_no}", get(routes::isnad))
        .route("/search", get(routes::search))
        .route("/hadiths.json", get(routes::hadiths_json))
        .route("/api/hadith/{source}/{chapter}/{hadith_no}/graph", get(routes::hadith_graph_json))
        .route("/api/narrator/{name}/graph", get(routes::narrator_graph_json))
        .route("/api/search", get(routes::search_json))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(state: AppState, port: u16) -> anyhow::Result<()> {
    tracing::info!(
        "Serving {} hadiths from {} (isnad backend: {})",
        state.search.len(),
        state.settings.database.display(),
        state.isnad.name()
    );
    let app = router(Arc::new(state));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on {}", addr);
    println!("🌍 Server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;
    use crate::backend::{RecordsIsnadSource, parse_isnad_records};
    use crate::storage::fixtures::{self, BELIEF, BUKHARI, REVELATION};

    const AISHA: &str = "أمّ المؤمنين عائشة بنت أبي بكر الصديق";
    const URWA: &str = "عروة بن الزبير";

    fn app() -> Router {
        let state = AppState::new(fixtures::seeded_store(), Settings::default()).unwrap();
        router(Arc::new(state))
    }

    async fn fetch(uri: &str) -> (StatusCode, String) {
        send(app(), uri).await
    }

    async fn send(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let (status, body) = fetch(uri).await;
        (status, serde_json::from_str(&body).unwrap())
    }

    #[tokio::test]
    async fn test_index_lists_hadiths() {
        let (status, body) = fetch("/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("إِنَّمَا الأَعْمَالُ بِالنِّيَّاتِ"));
        assert!(body.contains(r#"dir="rtl""#));
    }

    #[tokio::test]
    async fn test_source_page_only_for_configured_sources() {
        let (status, body) = fetch(&pages::source_href(BUKHARI)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(BELIEF));

        let (status, body) = fetch(&pages::source_href("Sahih Muslim")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains(text::SOURCE_NOT_FOUND.title));
    }

    #[tokio::test]
    async fn test_chapter_page() {
        let (status, _) = fetch(&pages::chapter_href(BUKHARI, REVELATION)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = fetch(&pages::chapter_href(BUKHARI, "كتاب لا يوجد")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_hadith_page_embeds_graph() {
        let (status, body) = fetch(&pages::hadith_href(BUKHARI, REVELATION, "2")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("شرح الحديث الثاني"));
        assert!(body.contains("data-graph"));
        assert!(body.contains("هشام بن عروة"));
    }

    #[tokio::test]
    async fn test_unknown_hadith_is_not_found_page() {
        let (status, body) = fetch(&pages::hadith_href(BUKHARI, REVELATION, "999")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains(text::HADITH_NOT_FOUND.title));
    }

    #[tokio::test]
    async fn test_narrator_pages() {
        let (status, body) = fetch("/narrator").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(URWA));

        let (status, body) = fetch(&pages::narrator_href(URWA)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("ابن شهاب الزهري"));

        let (status, body) = fetch(&pages::narrator_href("راوٍ مجهول")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains(text::NARRATOR_NOT_FOUND.title));
    }

    #[tokio::test]
    async fn test_transmission_page_follows_chain_direction() {
        let (status, _) = fetch(&pages::transmission_href(AISHA, URWA)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = fetch(&pages::transmission_href(URWA, AISHA)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains(text::TRANSMISSION_NOT_FOUND.title));
    }

    #[tokio::test]
    async fn test_isnad_page() {
        let (status, body) = fetch("/isnad/2").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("data-graph"));

        let (status, _) = fetch("/isnad/999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_search_page() {
        let (status, body) = fetch("/search?narrator=%D8%B9%D8%A7%D8%A6%D8%B4%D8%A9").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("search-form"));
    }

    #[tokio::test]
    async fn test_hadiths_json_export() {
        let (status, json) = get_json("/hadiths.json").await;
        assert_eq!(status, StatusCode::OK);
        let records = json.as_array().unwrap();
        assert_eq!(records.len(), 3);
        assert!(records[0].get("id").is_none());
    }

    #[tokio::test]
    async fn test_hadith_graph_api() {
        let uri = format!("/api{}/graph?width=1000", pages::hadith_href(BUKHARI, REVELATION, "2"));
        let (status, json) = get_json(&uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["nodes"].as_array().unwrap().len(), 5);
        assert_eq!(json["data"]["links"].as_array().unwrap().len(), 4);
        assert_eq!(json["config"]["link"]["type"], "CURVE_SMOOTH");

        let uri = format!("/api{}/graph", pages::hadith_href(BUKHARI, REVELATION, "999"));
        let (status, json) = get_json(&uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn test_narrator_graph_api() {
        let uri = format!("/api{}/graph", pages::narrator_href(URWA));
        let (status, json) = get_json(&uri).await;
        assert_eq!(status, StatusCode::OK);
        // one teacher, the narrator and two students
        assert_eq!(json["data"]["nodes"].as_array().unwrap().len(), 4);
        assert_eq!(json["data"]["links"].as_array().unwrap().len(), 3);

        let uri = format!("/api{}/graph?layout=tiers", pages::narrator_href(URWA));
        let (status, json) = get_json(&uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["nodes"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_search_api_defaults_to_primary_source() {
        let (status, json) = get_json("/api/search?text=%D8%A7%D9%84%D8%A5%D8%B3%D9%84%D8%A7%D9%85").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["results"].as_array().unwrap().len(), 1);
        assert_eq!(json["has_more"], false);
        assert_eq!(json["chapters"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found_page() {
        let (status, body) = fetch("/no/such/page").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains(text::PAGE_NOT_FOUND.title));
    }

    #[tokio::test]
    async fn test_search_api_page_past_usize_range() {
        let (status, json) = get_json("/api/search?page=18446744073709551615").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["results"].as_array().unwrap().is_empty());
        assert_eq!(json["has_more"], false);
    }

    /// Store holding a second collection that the default settings do not list
    fn app_with_unlisted_source() -> Router {
        let store = fixtures::seeded_store();
        store
            .execute_batch(
                "INSERT INTO hadiths (id, hadith_id, source, chapter_no, hadith_no, chapter, text_ar, text_en, explanation) VALUES
                    (6, 1, 'Sahih Muslim', 1, '1', 'كتاب الإيمان', 'حديث جبريل', 'The hadith of Jibril', 'شرح');
                 INSERT INTO hadith_chains (source, chapter_no, hadith_no, scholar_indx, position) VALUES
                    ('Sahih Muslim', 1, '1', 7, 1);",
            )
            .unwrap();
        let state = AppState::new(store, Settings::default()).unwrap();
        router(Arc::new(state))
    }

    #[tokio::test]
    async fn test_unlisted_source_hidden_on_every_route() {
        let (status, body) = send(app_with_unlisted_source(), &pages::chapter_href("Sahih Muslim", BELIEF)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains(text::SOURCE_NOT_FOUND.title));

        let (status, body) = send(app_with_unlisted_source(), &pages::hadith_href("Sahih Muslim", BELIEF, "1")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains(text::SOURCE_NOT_FOUND.title));

        let uri = format!("/api{}/graph", pages::hadith_href("Sahih Muslim", BELIEF, "1"));
        let (status, body) = send(app_with_unlisted_source(), &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert!(json["error"].is_string());

        // the listed collection is unaffected
        let (status, _) = send(app_with_unlisted_source(), &pages::hadith_href(BUKHARI, BELIEF, "8")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_isnad_page_from_records_backend() {
        let line = r#"{"HadithNo":"3","TransmissionChains":[{"SanadNo":"1","Narrators":[{"NarratorID":"1","NarratorName":"عائشة","NarratorGen":"Comp.(RA)"}]},{"SanadNo":"2","Narrators":[{"NarratorID":"7","NarratorName":"أبو هريرة","NarratorGen":"Comp.(RA)"}]}]}"#;
        let records = RecordsIsnadSource::from_records(parse_isnad_records(&[line]).unwrap());
        let state = AppState::new(fixtures::seeded_store(), Settings::default())
            .unwrap()
            .with_isnad_source(Arc::new(records));
        let app = router(Arc::new(state));

        let (status, body) = send(app.clone(), "/isnad/3").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("أبو هريرة"));

        // hadith 2 has a SQLite chain but no record
        let (status, _) = send(app, "/isnad/2").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
