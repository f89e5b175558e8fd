use crate::error::AppError;
use crate::github::GithubApi;
use crate::stats;
use crate::svg::{self, Theme};
use axum::Router;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn GithubApi>,
    pub top_n: usize,
    pub static_dir: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
pub struct TopLangsQuery {
    pub username: Option<String>,
    #[serde(default)]
    pub theme: Theme,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/top-langs", get(top_langs))
        .route("/favicon.ico", get(favicon))
        .with_state(state)
}

pub async fn top_langs(
    State(state): State<AppState>,
    Query(query): Query<TopLangsQuery>,
) -> Result<Response, AppError> {
    let username = query
        .username
        .filter(|u| !u.is_empty())
        .ok_or(AppError::MissingUsername)?;

    tracing::info!(username = %username, "rendering top languages");

    let totals = stats::fetch_language_stats(state.api.as_ref(), &username)
        .await
        .inspect_err(|e| {
            tracing::error!(username = %username, "listing repositories failed: {e}");
        })?;

    let svg = svg::generate_svg(&username, &totals, state.top_n, query.theme);
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}

pub async fn favicon(State(state): State<AppState>) -> Response {
    let path = state.static_dir.join("favicon.ico");
    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            ([(header::CONTENT_TYPE, "image/vnd.microsoft.icon")], bytes).into_response()
        }
        Err(e) => {
            tracing::debug!(path = %path.display(), "favicon unavailable: {e}");
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        }
    }
}
