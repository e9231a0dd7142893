//! Widget host page and FAQ listing

use std::path::Path;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    response::Html,
    routing::get,
};
use serde::Serialize;
use tower_http::services::{ServeDir, ServeFile};

use super::ApiState;

/// Page served at `/` when no static directory is configured
pub const BUILTIN_PAGE: &str = include_str!("../../static/index.html");

/// Build page router
///
/// With a static directory, `/` serves its `index.html` and `/static/*` its
/// files; otherwise `/` serves the built-in page.
pub fn router(state: Arc<ApiState>, static_dir: Option<&Path>) -> Router {
    let router = Router::new().route("/faq", get(faq)).with_state(state);

    match static_dir {
        Some(dir) => {
            tracing::info!(path = %dir.display(), "serving static files");
            router
                .route_service("/", ServeFile::new(dir.join("index.html")))
                .nest_service("/static", ServeDir::new(dir))
        }
        None => router.route("/", get(builtin_page)),
    }
}

async fn builtin_page() -> Html<&'static str> {
    Html(BUILTIN_PAGE)
}

/// FAQ listing for quick-reply buttons
#[derive(Debug, Serialize)]
pub struct FaqListing {
    pub questions: Vec<String>,
}

async fn faq(State(state): State<Arc<ApiState>>) -> Json<FaqListing> {
    Json(FaqListing {
        questions: state
            .conversation
            .faq()
            .questions()
            .map(ToString::to_string)
            .collect(),
    })
}
