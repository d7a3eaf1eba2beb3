use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use cedict_index::{DictionaryEntry, LookupResult, Segment};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dictionary::{Dictionary, NotReady};

#[derive(Clone)]
pub struct AppState {
    pub dictionary: Arc<Dictionary>,
    pub max_text_len: usize,
    pub disable_cache: bool,
}

#[derive(Deserialize)]
pub struct LookupQuery {
    pub text: String,
    pub offset: usize,
    pub caret: Option<bool>,
}

#[derive(Deserialize)]
pub struct EntriesQuery {
    pub word: String,
}

#[derive(Deserialize)]
pub struct LineQuery {
    pub line: String,
}

#[derive(Deserialize)]
pub struct PinyinQuery {
    pub pinyin: String,
}

#[derive(Serialize)]
pub struct StatusResponse {
    ready: bool,
    words: usize,
    entries: usize,
    max_word_len: usize,
}

#[derive(Serialize)]
pub struct LookupResponse {
    result: Option<LookupResult>,
}

#[derive(Serialize)]
pub struct EntriesResponse {
    word: String,
    entries: Vec<DictionaryEntry>,
}

#[derive(Serialize)]
pub struct SegmentResponse {
    segments: Vec<Segment>,
}

#[derive(Serialize)]
pub struct TonesResponse {
    tones: Vec<Option<u8>>,
}

#[derive(Serialize)]
pub struct PinyinResponse {
    pinyin: String,
    rendered: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/status", get(status))
        .route("/v1/lookup", get(lookup))
        .route("/v1/entries", get(entries))
        .route("/v1/segment", get(segment))
        .route("/v1/tones", get(tones))
        .route("/v1/pinyin", get(pinyin))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    "ok"
}

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let response = match state.dictionary.index() {
        Ok(index) => StatusResponse {
            ready: true,
            words: index.len(),
            entries: index.entry_count(),
            max_word_len: index.max_word_len(),
        },
        Err(NotReady) => StatusResponse {
            ready: false,
            words: 0,
            entries: 0,
            max_word_len: 0,
        },
    };
    Json(response)
}

async fn lookup(
    State(state): State<AppState>,
    Query(params): Query<LookupQuery>,
) -> Result<Response, ApiError> {
    check_len(&state, "text", &params.text)?;
    let result = if params.caret.unwrap_or(false) {
        state.dictionary.lookup_at_caret(&params.text, params.offset)?
    } else {
        state.dictionary.lookup_at(&params.text, params.offset)?
    };
    Ok(cacheable(&state, LookupResponse { result }))
}

async fn entries(
    State(state): State<AppState>,
    Query(params): Query<EntriesQuery>,
) -> Result<Response, ApiError> {
    let word = params.word.trim();
    if word.is_empty() {
        return Err(ApiError::bad_request("word is required"));
    }
    check_len(&state, "word", word)?;
    let entries = state
        .dictionary
        .entries(word)?
        .map(<[_]>::to_vec)
        .unwrap_or_default();
    Ok(cacheable(
        &state,
        EntriesResponse {
            word: word.to_string(),
            entries,
        },
    ))
}

async fn segment(
    State(state): State<AppState>,
    Query(params): Query<LineQuery>,
) -> Result<Response, ApiError> {
    check_len(&state, "line", &params.line)?;
    let segments = state.dictionary.segment(&params.line)?;
    Ok(cacheable(&state, SegmentResponse { segments }))
}

async fn tones(
    State(state): State<AppState>,
    Query(params): Query<LineQuery>,
) -> Result<Response, ApiError> {
    check_len(&state, "line", &params.line)?;
    let tones = state
        .dictionary
        .line_tones(&params.line)?
        .into_iter()
        .map(|tone| tone.map(|t| t.number()))
        .collect();
    Ok(cacheable(&state, TonesResponse { tones }))
}

// Works before the dictionary is ready.
async fn pinyin(
    State(state): State<AppState>,
    Query(params): Query<PinyinQuery>,
) -> Result<Response, ApiError> {
    check_len(&state, "pinyin", &params.pinyin)?;
    let rendered = pinyin_tones::render(&params.pinyin);
    Ok(cacheable(
        &state,
        PinyinResponse {
            pinyin: params.pinyin,
            rendered,
        },
    ))
}

fn check_len(state: &AppState, field: &str, value: &str) -> Result<(), ApiError> {
    if value.chars().count() > state.max_text_len {
        return Err(ApiError::bad_request(format!(
            "{field} must be at most {} characters",
            state.max_text_len
        )));
    }
    Ok(())
}

fn cacheable<T: Serialize>(state: &AppState, body: T) -> Response {
    if state.disable_cache {
        return Json(body).into_response();
    }
    (
        [(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=300"),
        )],
        Json(body),
    )
        .into_response()
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("dictionary not ready")]
    NotReady,
}

impl ApiError {
    fn bad_request<T: Into<String>>(msg: T) -> Self {
        ApiError::BadRequest(msg.into())
    }
}

impl From<NotReady> for ApiError {
    fn from(_: NotReady) -> Self {
        ApiError::NotReady
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
        };
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
