//! Server-rendered pages
//!
//! Templates are compiled into the binary and render with the unescaped formatter, so every
//! value is escaped here before it reaches a template.

use std::borrow::Cow;
use percent_encoding::{AsciiSet, CONTROLS, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use tinytemplate::TinyTemplate;
use crate::Result;
use crate::model::{ChapterCount, Chapter, Hadith, HadithSummary, Narrator, NarratorSource};
use crate::search::{SearchPage, SearchQuery};
use crate::text::{self, NotFoundMessage, ui_text};
use super::GraphPayload;

static LAYOUT_HTML: &str = include_str!("../../assets/templates/layout.html");
static NOT_FOUND_HTML: &str = include_str!("../../assets/templates/not_found.html");
static ERROR_HTML: &str = include_str!("../../assets/templates/error.html");
static GRAPH_HTML: &str = include_str!("../../assets/templates/graph.html");
static SEARCH_HTML: &str = include_str!("../../assets/templates/search.html");

static SITE_CSS: &str = include_str!("../../assets/css/site.css");
static GRAPH_JS: &str = include_str!("../../assets/js/graph.js");
static SEARCH_JS: &str = include_str!("../../assets/js/search.js");

/// Characters escaped inside one URL path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

fn esc(value: &str) -> Cow<'_, str> {
    html_escape::encode_text(value)
}

fn attr(value: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(value)
}

fn segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

pub fn source_href(source: &str) -> String {
    format!("/hadith/{}", segment(source))
}

pub fn chapter_href(source: &str, chapter: &str) -> String {
    format!("/hadith/{}/{}", segment(source), segment(chapter))
}

pub fn hadith_href(source: &str, chapter: &str, hadith_no: &str) -> String {
    format!("/hadith/{}/{}/{}", segment(source), segment(chapter), segment(hadith_no))
}

pub fn narrator_href(name: &str) -> String {
    format!("/narrator/{}", segment(name))
}

pub fn transmission_href(from: &str, to: &str) -> String {
    format!("/narrator/{}/to/{}", segment(from), segment(to))
}

fn render<C: Serialize>(name: &'static str, template: &'static str, context: &C) -> Result<String> {
    let mut tt = TinyTemplate::new();
    tt.set_default_formatter(&tinytemplate::format_unescaped);
    tt.add_template(name, template)?;
    Ok(tt.render(name, context)?)
}

#[derive(Serialize)]
struct NavLink {
    href: String,
    title: String,
}

#[derive(Serialize)]
struct LayoutContext<'a> {
    title: Cow<'a, str>,
    css: &'static str,
    sources: Vec<NavLink>,
    content: &'a str,
    script: String,
}

/// Wrap page content in the site chrome
fn page(title: &str, sources: &[String], content: &str, scripts: &[&str]) -> Result<String> {
    let sources = sources
        .iter()
        .map(|s| NavLink {
            href: attr(&source_href(s)).into_owned(),
            title: esc(text::source_title(s)).into_owned(),
        })
        .collect();
    let context = LayoutContext {
        title: esc(title),
        css: SITE_CSS,
        sources,
        content,
        script: scripts.concat(),
    };
    render("layout", LAYOUT_HTML, &context)
}

#[derive(Serialize)]
struct GraphContext<'a> {
    id: &'a str,
    payload: String,
}

/// Graph container plus its JSON payload, read by the graph script
fn graph_panel(id: &str, payload: &GraphPayload) -> Result<String> {
    if payload.data.is_empty() {
        return Ok(format!(r#"<p class="muted">{}</p>"#, ui_text::NO_RESULTS));
    }
    // keep the payload from closing its script element
    let json = serde_json::to_string(payload)?.replace("</", "<\\/");
    render("graph", GRAPH_HTML, &GraphContext { id, payload: json })
}

fn badge(value: &str) -> String {
    format!(r#"<span class="badge">{}</span>"#, esc(value))
}

fn hadith_card(hadith: &Hadith, heading: &str) -> String {
    format!(
        r#"<a class="card hadith-card" href="{href}"><h3>{heading}</h3><div class="meta"><span class="tag">{source}</span><span class="tag">{chapter}</span>{number}</div><p class="text">{body}</p></a>"#,
        href = attr(&hadith_href(&hadith.source, &hadith.chapter, &hadith.hadith_no)),
        heading = esc(heading),
        source = esc(text::source_title(&hadith.source)),
        chapter = esc(&text::clean_name(&hadith.chapter)),
        number = esc(&text::to_arabic_numerals(&hadith.hadith_no)),
        body = esc(&hadith.text_ar),
    )
}

fn summary_cards(hadiths: &[HadithSummary]) -> String {
    hadiths
        .iter()
        .map(|h| hadith_card(&h.hadith, h.narrator_name.as_deref().unwrap_or(ui_text::UNKNOWN_NARRATOR)))
        .collect()
}

fn narrator_links(narrators: &[Narrator], href: impl Fn(&Narrator) -> String) -> String {
    let items: String = narrators
        .iter()
        .map(|n| format!(r#"<li><a href="{}">{}</a></li>"#, attr(&href(n)), esc(&n.name)))
        .collect();
    format!(r#"<ul class="plain-list">{items}</ul>"#)
}

pub fn index_page(sources: &[String], hadiths: &[Hadith]) -> Result<String> {
    let cards: String = hadiths
        .iter()
        .map(|h| hadith_card(h, &format!("{} {}", ui_text::HADITH, text::to_arabic_numerals(&h.hadith_no))))
        .collect();
    let content = format!(
        r#"<h1 class="page-title">{title}</h1><p>{count}</p><div class="hadith-list">{cards}</div>"#,
        title = ui_text::HADITHS,
        count = badge(&text::format_arabic_count(hadiths.len(), ui_text::HADITH, ui_text::HADITHS)),
    );
    page(ui_text::HADITHS, sources, &content, &[])
}

pub fn source_page(sources: &[String], source: &str, chapters: &[Chapter]) -> Result<String> {
    let title = text::source_title(source);
    let cards: String = chapters
        .iter()
        .map(|c| {
            format!(
                r#"<a class="card hadith-card" href="{href}"><div class="meta">{number}</div><h3>{chapter}</h3><p>{count}</p></a>"#,
                href = attr(&chapter_href(&c.source, &c.chapter)),
                number = esc(&text::format_chapter_title(c.chapter_no)),
                chapter = esc(&text::clean_name(&c.chapter)),
                count = esc(&text::format_arabic_count(c.count.max(0) as usize, ui_text::HADITH, ui_text::HADITHS)),
            )
        })
        .collect();
    let content = format!(
        r#"<h1 class="page-title">{title}</h1><p>{count}</p><div class="grid">{cards}</div>"#,
        title = esc(title),
        count = badge(&text::format_arabic_count(chapters.len(), ui_text::CHAPTER, ui_text::CHAPTERS)),
    );
    page(title, sources, &content, &[])
}

pub fn chapter_page(sources: &[String], source: &str, chapter: &str, hadiths: &[HadithSummary]) -> Result<String> {
    let content = format!(
        r#"<nav class="muted"><a href="{source_href}">{source}</a> ← {chapter}</nav><h1 class="page-title">{chapter}</h1><p>{count}</p><div class="hadith-list">{cards}</div>"#,
        source_href = attr(&source_href(source)),
        source = esc(text::source_title(source)),
        chapter = esc(&text::clean_name(chapter)),
        count = badge(&text::format_arabic_count(hadiths.len(), ui_text::HADITH, ui_text::HADITHS)),
        cards = summary_cards(hadiths),
    );
    page(&text::clean_name(chapter), sources, &content, &[])
}

pub fn hadith_page(sources: &[String], hadith: &Hadith, graph: &GraphPayload) -> Result<String> {
    let explanation = match hadith.explanation.as_deref().filter(|_| hadith.has_explanation()) {
        Some(explanation) => format!(
            r#"<section class="card"><h2>{}</h2><p class="hadith-text">{}</p></section>"#,
            ui_text::EXPLANATION,
            esc(explanation)
        ),
        None => String::new(),
    };
    let content = format!(
        r#"<nav class="muted"><a href="{source_href}">{source}</a> ← <a href="{chapter_href}">{chapter}</a> ← {number}</nav>
<div class="columns"><div><section class="card"><h2>{text_label}</h2><p class="hadith-text">{body}</p></section>{explanation}</div>
<section><h2>{isnad}</h2>{graph}</section></div>"#,
        source_href = attr(&source_href(&hadith.source)),
        source = esc(text::source_title(&hadith.source)),
        chapter_href = attr(&chapter_href(&hadith.source, &hadith.chapter)),
        chapter = esc(&text::clean_name(&hadith.chapter)),
        number = esc(&text::to_arabic_numerals(&hadith.hadith_no)),
        text_label = ui_text::HADITH_TEXT_LABEL,
        body = esc(&hadith.text_ar),
        isnad = ui_text::ISNAD,
        graph = graph_panel("isnad-graph", graph)?,
    );
    let title = format!("{} {} - {}", ui_text::HADITH, hadith.hadith_no, text::source_title(&hadith.source));
    page(&title, sources, &content, &[GRAPH_JS])
}

pub fn isnad_page(sources: &[String], hadith_no: &str, hadith: Option<&Hadith>, graph: &GraphPayload) -> Result<String> {
    let link = match hadith {
        Some(h) => format!(
            r#"<p><a class="button" href="{}">{}</a></p>"#,
            attr(&hadith_href(&h.source, &h.chapter, &h.hadith_no)),
            ui_text::READ_FULL_HADITH
        ),
        None => String::new(),
    };
    let title = format!("{} {} {}", ui_text::ISNAD, ui_text::HADITH, text::to_arabic_numerals(hadith_no));
    let content = format!(
        r#"<h1 class="page-title">{title}</h1>{link}{graph}"#,
        title = esc(&title),
        graph = graph_panel("isnad-graph", graph)?,
    );
    page(&title, sources, &content, &[GRAPH_JS])
}

pub fn narrators_page(sources: &[String], narrators: &[Narrator]) -> Result<String> {
    let cards: String = narrators
        .iter()
        .map(|n| {
            format!(
                r#"<a class="card hadith-card" href="{href}"><h3>{name}</h3><div class="meta">{grade}</div></a>"#,
                href = attr(&narrator_href(&n.name)),
                name = esc(&n.name),
                grade = esc(text::arabic_grade(n.grade_or_empty())),
            )
        })
        .collect();
    let content = format!(
        r#"<h1 class="page-title">{title}</h1><p>{count}</p><div class="grid">{cards}</div>"#,
        title = ui_text::NARRATORS,
        count = badge(&text::format_arabic_count(narrators.len(), ui_text::NARRATOR, ui_text::NARRATORS)),
    );
    page(ui_text::NARRATORS, sources, &content, &[])
}

/// Everything shown on a narrator's profile page
pub struct NarratorProfile<'a> {
    pub narrator: &'a Narrator,
    /// Collection the relations below were read from
    pub source: &'a str,
    pub predecessors: &'a [Narrator],
    pub successors: &'a [Narrator],
    pub chapters: &'a [ChapterCount],
    pub info: &'a [NarratorSource],
    pub graph: &'a GraphPayload,
}

fn date_line(label: &str, hijri: Option<i64>, gregorian: Option<i64>) -> String {
    const UNKNOWN: &str = "غير معروف";
    let value = if hijri.is_none() && gregorian.is_none() {
        UNKNOWN.to_string()
    } else {
        let part = |v: Option<i64>| v.map(text::to_arabic_numerals).unwrap_or_else(|| UNKNOWN.to_string());
        format!("{} هـ / {} مـ", part(hijri), part(gregorian))
    };
    format!("<p><strong>{label}:</strong> {}</p>", esc(&value))
}

pub fn narrator_page(sources: &[String], profile: &NarratorProfile) -> Result<String> {
    let narrator = profile.narrator;
    let grade = text::arabic_grade(narrator.grade_or_empty());
    let blessing = text::blessings(grade);
    let heading = if blessing.is_empty() {
        narrator.name.clone()
    } else {
        format!("{} ({})", narrator.name, blessing)
    };

    let mut summary = format!(
        r#"<section class="card"><p><strong>{}</strong> {}</p>{}{}"#,
        ui_text::GRADE,
        esc(grade),
        date_line(ui_text::BIRTH, narrator.birth_date_hijri, narrator.birth_date_gregorian),
        date_line(ui_text::DEATH, narrator.death_date_hijri, narrator.death_date_gregorian),
    );
    if let Some(place) = narrator.death_place.as_deref() {
        summary.push_str(&format!("<p><strong>{}:</strong> {}</p>", ui_text::DEATH_PLACE, esc(place)));
    }
    summary.push_str("</section>");

    let mut relations = String::new();
    if !profile.predecessors.is_empty() {
        relations.push_str(&format!(
            r#"<section class="card"><h2>رَوى عن ({})</h2>{}</section>"#,
            text::to_arabic_numerals(profile.predecessors.len()),
            narrator_links(profile.predecessors, |teacher| transmission_href(&teacher.name, &narrator.name)),
        ));
    }
    if !profile.successors.is_empty() {
        relations.push_str(&format!(
            r#"<section class="card"><h2>رَوى عنه ({})</h2>{}</section>"#,
            text::to_arabic_numerals(profile.successors.len()),
            narrator_links(profile.successors, |student| transmission_href(&narrator.name, &student.name)),
        ));
    }
    if !profile.chapters.is_empty() {
        let items: String = profile
            .chapters
            .iter()
            .map(|c| {
                format!(
                    r#"<li><a href="{}">{}</a> <span class="muted">{}</span></li>"#,
                    attr(&chapter_href(&c.source, &c.chapter)),
                    esc(&text::clean_name(&c.chapter)),
                    esc(&text::format_arabic_count(c.count.max(0) as usize, ui_text::HADITH, ui_text::HADITHS)),
                )
            })
            .collect();
        relations.push_str(&format!(
            r#"<section class="card"><h2>روى في ({} باب)</h2><ul class="plain-list">{items}</ul></section>"#,
            text::to_arabic_numerals(profile.chapters.len()),
        ));
    }

    let info: String = profile
        .info
        .iter()
        .map(|entry| {
            format!(
                r#"<section class="card"><h3>{}</h3><p class="hadith-text">{}</p></section>"#,
                esc(text::book_source_title(entry.book_source.as_deref().unwrap_or_default())),
                esc(entry.content.as_deref().unwrap_or_default()),
            )
        })
        .collect();
    let info = if info.is_empty() {
        info
    } else {
        format!(r#"<h2>ذُكر عنه</h2><div class="grid">{info}</div>"#)
    };

    let content = format!(
        r#"<h1 class="page-title">{heading}</h1><p class="muted">{source}</p>
<div class="columns"><div>{summary}{relations}</div><div>{graph}{info}</div></div>"#,
        heading = esc(&heading),
        source = esc(text::source_title(profile.source)),
        graph = graph_panel("narrator-graph", profile.graph)?,
    );
    page(&narrator.name, sources, &content, &[GRAPH_JS])
}

pub fn transmission_page(sources: &[String], from: &str, to: &str, hadiths: &[HadithSummary]) -> Result<String> {
    let title = format!("أحاديث من {from} إلى {to}");
    let content = format!(
        r#"<nav class="muted"><a href="/">الرئيسية</a> ← <a href="/narrator">{narrators}</a> ← <a href="{from_href}">{from}</a> ← إلى {to}</nav>
<h1 class="page-title">{title}</h1><p>{count}</p><div class="hadith-list">{cards}</div>"#,
        narrators = ui_text::NARRATORS,
        from_href = attr(&narrator_href(from)),
        from = esc(from),
        to = esc(to),
        title = esc(&title),
        count = badge(&text::format_arabic_count(hadiths.len(), ui_text::HADITH, ui_text::HADITHS)),
        cards = summary_cards(hadiths),
    );
    page(&title, sources, &content, &[])
}

#[derive(Serialize)]
struct SearchContext {
    heading: &'static str,
    text_label: &'static str,
    text_placeholder: &'static str,
    text: String,
    source_label: &'static str,
    source_options: String,
    chapter_label: &'static str,
    all_chapters: &'static str,
    chapter_options: String,
    narrator_label: &'static str,
    narrator_placeholder: &'static str,
    narrator: String,
    submit: &'static str,
    loading: &'static str,
    no_results: &'static str,
    unknown_narrator: &'static str,
    status: String,
    results: String,
    more: String,
}

fn options(values: &[String], selected: Option<&str>, label: impl Fn(&str) -> String) -> String {
    values
        .iter()
        .map(|v| {
            let selected = if selected == Some(v.as_str()) { " selected" } else { "" };
            format!(r#"<option value="{}"{selected}>{}</option>"#, attr(v), esc(&label(v)))
        })
        .collect()
}

/// Query string for the same search at another page
fn search_href(query: &SearchQuery, page: usize) -> String {
    let mut href = String::from("/search?");
    let fields = [
        ("text", &query.text),
        ("source", &query.source),
        ("chapter", &query.chapter),
        ("narrator", &query.narrator),
    ];
    for (key, value) in fields {
        if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
            href.push_str(&format!("{key}={}&", utf8_percent_encode(value, NON_ALPHANUMERIC)));
        }
    }
    href.push_str(&format!("page={page}"));
    href
}

pub fn search_page(sources: &[String], query: &SearchQuery, results: &SearchPage, chapters: &[String]) -> Result<String> {
    let cards: String = results
        .results
        .iter()
        .map(|r| {
            let hadith = Hadith {
                id: r.id.unwrap_or_default(),
                hadith_id: None,
                source: r.source.clone(),
                chapter_no: r.chapter_no,
                hadith_no: r.hadith_no.clone(),
                chapter: r.chapter.clone(),
                text_ar: r.text_ar.clone(),
                text_en: None,
                explanation: None,
            };
            hadith_card(&hadith, r.narrator_name.as_deref().unwrap_or(ui_text::UNKNOWN_NARRATOR))
        })
        .collect();
    let more = if results.has_more {
        format!(r#"<a class="button" href="{}">…</a>"#, attr(&search_href(query, results.page + 1)))
    } else {
        String::new()
    };
    let status = if results.results.is_empty() {
        ui_text::NO_RESULTS.to_string()
    } else {
        format!("{}: {}", ui_text::RESULTS_COUNT, text::to_arabic_numerals(results.total))
    };

    let context = SearchContext {
        heading: ui_text::SEARCH,
        text_label: ui_text::HADITH_TEXT_LABEL,
        text_placeholder: ui_text::SEARCH_IN_TEXT,
        text: attr(query.text.as_deref().unwrap_or_default()).into_owned(),
        source_label: ui_text::BOOK_LABEL,
        source_options: options(sources, query.source.as_deref(), |s| text::source_title(s).to_string()),
        chapter_label: ui_text::CHAPTER_LABEL,
        all_chapters: ui_text::ALL_CHAPTERS,
        chapter_options: options(chapters, query.chapter.as_deref(), text::clean_name),
        narrator_label: ui_text::NARRATOR_LABEL,
        narrator_placeholder: ui_text::NARRATOR_NAME,
        narrator: attr(query.narrator.as_deref().unwrap_or_default()).into_owned(),
        submit: ui_text::SEARCH,
        loading: ui_text::LOADING,
        no_results: ui_text::NO_RESULTS,
        unknown_narrator: ui_text::UNKNOWN_NARRATOR,
        status,
        results: cards,
        more,
    };
    let content = render("search", SEARCH_HTML, &context)?;
    page(ui_text::SEARCH, sources, &content, &[SEARCH_JS])
}

#[derive(Serialize)]
struct NoticeContext<'a> {
    title: Cow<'a, str>,
    description: Cow<'a, str>,
    back: &'static str,
    retry: &'static str,
}

pub fn not_found_page(message: NotFoundMessage) -> Result<String> {
    let context = NoticeContext {
        title: esc(message.title),
        description: esc(message.description),
        back: ui_text::BACK_TO_ALL_HADITHS,
        retry: ui_text::TRY_AGAIN,
    };
    let content = render("not_found", NOT_FOUND_HTML, &context)?;
    page(message.title, &[], &content, &[])
}

pub fn error_page() -> Result<String> {
    let context = NoticeContext {
        title: esc(ui_text::ERROR_TITLE),
        description: esc(ui_text::ERROR_DESCRIPTION),
        back: ui_text::BACK_TO_ALL_HADITHS,
        retry: ui_text::TRY_AGAIN,
    };
    let content = render("error", ERROR_HTML, &context)?;
    page(ui_text::ERROR_TITLE, &[], &content, &[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{GraphData, GraphNode, GraphViewConfig};

    #[test]
    fn test_hrefs_encode_segments() {
        assert_eq!(source_href("Sahih Bukhari"), "/hadith/Sahih%20Bukhari");
        assert_eq!(hadith_href("Sahih Bukhari", "باب", "12/a"), "/hadith/Sahih%20Bukhari/%D8%A8%D8%A7%D8%A8/12%2Fa");
        assert_eq!(transmission_href("a b", "c"), "/narrator/a%20b/to/c");
    }

    #[test]
    fn test_values_are_escaped() {
        let hadith = Hadith {
            id: 1,
            hadith_id: None,
            source: "Sahih Bukhari".to_string(),
            chapter_no: 1,
            hadith_no: "1".to_string(),
            chapter: "باب".to_string(),
            text_ar: "<script>alert(1)</script>".to_string(),
            text_en: None,
            explanation: None,
        };
        let html = index_page(&["Sahih Bukhari".to_string()], &[hadith]).unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("صحيح البخاري"));
    }

    #[test]
    fn test_graph_payload_cannot_close_script() {
        let mut data = GraphData::default();
        data.nodes.push(GraphNode::new("1", "</script><b>", None, 0.0, 0.0));
        let payload = GraphPayload {
            data,
            config: GraphViewConfig::default(),
        };
        let html = graph_panel("g", &payload).unwrap();
        assert_eq!(html.matches("</script>").count(), 1);
    }

    #[test]
    fn test_search_href_keeps_filters() {
        let query = SearchQuery::default().text("إنما").source("Sahih Bukhari");
        let href = search_href(&query, 2);
        assert!(href.starts_with("/search?text=%D8%A5"));
        assert!(href.contains("source=Sahih%20Bukhari&"));
        assert!(href.ends_with("page=2"));
    }

    #[test]
    fn test_notice_pages_render() {
        let html = not_found_page(text::HADITH_NOT_FOUND).unwrap();
        assert!(html.contains("الحديث غير موجود"));
        assert!(html.contains("dir=\"rtl\""));

        let html = error_page().unwrap();
        assert!(html.contains("window.location.reload()"));
    }

    #[test]
    fn test_graph_script_runs_forces_from_config() {
        assert!(GRAPH_JS.contains("config.d3"));
        assert!(GRAPH_JS.contains("forces.linkLength"));
        assert!(GRAPH_JS.contains("forces.gravity"));
        assert!(GRAPH_JS.contains("forces.alphaTarget"));

        let mut data = GraphData::default();
        data.nodes.push(GraphNode::new("1", "نافع", None, 10.0, 20.0));
        let payload = GraphPayload {
            data,
            config: GraphViewConfig::isnad(800.0, 600.0),
        };
        let html = graph_panel("g", &payload).unwrap();
        assert!(html.contains(r#""d3":{"gravity":0.0,"linkLength":15.0"#));
    }
}
