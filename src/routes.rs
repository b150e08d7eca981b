// Route definitions

use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;
use warp::http::header::{HeaderMap, CONTENT_TYPE};
use warp::Filter;

use crate::handlers::{self, AppState};

pub fn configure_routes(
    state: Arc<AppState>,
    static_file: impl Into<PathBuf>,
) -> impl Filter<Extract = impl warp::Reply, Error = Infallible> + Clone {
    let max_body_bytes = state.chat.max_body_bytes;

    // GET /
    let index = warp::get()
        .and(warp::path::end())
        .and(warp::fs::file(static_file.into()));

    // GET /health
    let health = warp::get()
        .and(warp::path("health"))
        .and(warp::path::end())
        .and_then(handlers::health_handler);

    // POST /chat
    let chat = warp::post()
        .and(warp::path("chat"))
        .and(warp::path::end())
        .and(warp::body::content_length_limit(max_body_bytes))
        .and(raw_content_type())
        .and(warp::body::bytes())
        .and(with_state(state))
        .and_then(handlers::chat_handler);

    index
        .or(health)
        .or(chat)
        .recover(handlers::handle_rejection)
}

/// The `content-type` header, if any, decoded lossily.
///
/// Values outside visible ASCII are legal HTTP and must reach validation
/// instead of failing extraction.
fn raw_content_type() -> impl Filter<Extract = (Option<String>,), Error = Infallible> + Clone {
    warp::header::headers_cloned().map(|headers: HeaderMap| {
        headers
            .get(CONTENT_TYPE)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
    })
}

fn with_state(
    state: Arc<AppState>,
) -> impl Filter<Extract = (Arc<AppState>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}
