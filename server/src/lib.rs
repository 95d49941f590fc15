use anyhow::Result;
use axum::{extract::{Query, State}, http::StatusCode, routing::get, Json, Router};
use linkrank::corpus::{load_corpus, Corpus};
use linkrank::tokenizer::tokenize;
use linkrank::{Error, RankConfig, SearchEngine};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { 10 }

#[derive(Deserialize)]
pub struct RankParams {
    pub uri: String,
}

#[derive(Deserialize)]
pub struct RelevanceParams {
    pub q: String,
    pub uri: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub uri: String,
    pub title: Option<String>,
    pub score: f64,
    pub relevance: f64,
    pub page_rank: f64,
}

#[derive(Serialize)]
pub struct RankResponse {
    pub uri: String,
    pub page_rank: f64,
    /// `None` when the page is not in the corpus.
    pub out_degree: Option<usize>,
}

#[derive(Serialize)]
pub struct RelevanceResponse {
    pub query: String,
    pub uri: String,
    pub relevance: f64,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SearchEngine>,
    pub corpus: Arc<Corpus>,
}

/// Loads the pages at `pages_path` and builds the router over them.
pub fn build_app(pages_path: String, config: RankConfig) -> Result<Router> {
    let corpus = load_corpus(&pages_path)?;
    build_app_from_corpus(corpus, config)
}

pub fn build_app_from_corpus(corpus: Corpus, config: RankConfig) -> Result<Router> {
    let engine = SearchEngine::new(&corpus.pages, config)?;
    tracing::info!(
        pages = engine.len(),
        iterations = engine.page_ranks().iterations(),
        converged = engine.page_ranks().converged(),
        "ranked corpus"
    );
    let app_state = AppState { engine: Arc::new(engine), corpus: Arc::new(corpus) };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/rank", get(rank_handler))
        .route("/relevance", get(relevance_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);
    Ok(app)
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let terms = tokenize(&params.q);
    let k = params.k.clamp(1, 100);
    let found = state.engine.search(&terms, k);

    let results = found
        .hits
        .into_iter()
        .map(|hit| SearchHit {
            title: state.corpus.title(&hit.uri).map(str::to_string),
            uri: hit.uri,
            score: hit.score,
            relevance: hit.relevance,
            page_rank: hit.page_rank,
        })
        .collect();

    let elapsed = start.elapsed();
    Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_hits: found.total_hits, results })
}

pub async fn rank_handler(State(state): State<AppState>, Query(params): Query<RankParams>) -> Json<RankResponse> {
    let page_rank = state.engine.page_rank(&params.uri);
    let out_degree = state.engine.page_ranks().out_degree(&params.uri);
    Json(RankResponse { uri: params.uri, page_rank, out_degree })
}

pub async fn relevance_handler(
    State(state): State<AppState>,
    Query(params): Query<RelevanceParams>,
) -> Result<Json<RelevanceResponse>, (StatusCode, String)> {
    let terms = tokenize(&params.q);
    let relevance = state.engine.relevance(&terms, &params.uri).map_err(|err| match err {
        Error::InvalidArgument(msg) => (StatusCode::BAD_REQUEST, msg),
        other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    })?;
    Ok(Json(RelevanceResponse { query: params.q, uri: params.uri, relevance }))
}
