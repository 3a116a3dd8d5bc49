//! The guest chat page, compiled into the binary.
//!
//! `index.html` links its stylesheet and script under `/static/`; every
//! file in [`ASSETS`] is mounted at its path with a fixed content type.

use axum::{
    Router,
    http::header,
    response::{Html, IntoResponse},
    routing::get,
};

const INDEX_HTML: &str = include_str!("../../../frontend/index.html");

/// Static files served next to the page: (path, content type, body).
const ASSETS: &[(&str, &str, &str)] = &[
    (
        "/static/style.css",
        "text/css; charset=utf-8",
        include_str!("../../../frontend/style.css"),
    ),
    (
        "/static/app.js",
        "application/javascript; charset=utf-8",
        include_str!("../../../frontend/app.js"),
    ),
];

/// Router serving `/` and the page's static assets.
pub fn frontend_router() -> Router {
    ASSETS.iter().fold(
        Router::new().route("/", get(|| async { Html(INDEX_HTML) })),
        |router, &(path, content_type, body)| {
            router.route(
                path,
                get(move || async move {
                    ([(header::CONTENT_TYPE, content_type)], body).into_response()
                }),
            )
        },
    )
}
