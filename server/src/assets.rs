//! Browser page and script, embedded at compile time.

use axum::{http::header, response::Html, response::IntoResponse};

const INDEX_HTML: &str = include_str!("../assets/index.html");
const INDEX_JS: &str = include_str!("../assets/index.js");

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        INDEX_JS,
    )
}
