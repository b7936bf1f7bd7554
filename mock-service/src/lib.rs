//! A stand-in for the site the builtin profiles target.
//!
//! Serves exactly the endpoints the profiles hit and counts every request it sees, matched or
//! not, so tests can check what a run actually sent.
use axum::{
    debug_handler,
    extract::State,
    http::{header, Method, StatusCode, Uri},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use metrics::counter;
use serde_json::Value;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

/// Requests seen per route, keyed as `"METHOD /path"`.
#[derive(Debug, Default)]
pub struct Hits {
    counts: Mutex<BTreeMap<String, u64>>,
}

impl Hits {
    fn record(&self, route: &str) {
        counter!("mock_service_requests", "route" => route.to_string()).increment(1);
        let mut counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
        *counts.entry(route.to_string()).or_default() += 1;
    }

    pub fn get(&self, route: &str) -> u64 {
        self.snapshot().get(route).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.snapshot().values().sum()
    }

    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        self.counts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

pub fn router(hits: Arc<Hits>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/about", get(about))
        .route("/contact", get(contact))
        .route("/static/css/main.css", get(main_css))
        .route("/static/js/main.js", get(main_js))
        .route("/api/data", get(get_data).post(post_data))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(hits)
}

pub async fn run(listener: TcpListener, hits: Arc<Hits>) -> std::io::Result<()> {
    axum::serve(listener, router(hits)).await
}

/// Serve on an ephemeral localhost port in the background.
pub async fn spawn() -> std::io::Result<(SocketAddr, Arc<Hits>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let hits = Arc::new(Hits::default());

    let state = hits.clone();
    tokio::spawn(async move {
        if let Err(err) = run(listener, state).await {
            error!("Mock service stopped: {err}");
        }
    });

    debug!("Mock service listening on {addr}");
    Ok((addr, hits))
}

#[debug_handler]
async fn index(State(hits): State<Arc<Hits>>) -> &'static str {
    hits.record("GET /");
    "home"
}

async fn about(State(hits): State<Arc<Hits>>) -> &'static str {
    hits.record("GET /about");
    "about"
}

async fn contact(State(hits): State<Arc<Hits>>) -> &'static str {
    hits.record("GET /contact");
    "contact"
}

async fn main_css(State(hits): State<Arc<Hits>>) -> impl IntoResponse {
    hits.record("GET /static/css/main.css");
    ([(header::CONTENT_TYPE, "text/css")], "body { margin: 0; }")
}

async fn main_js(State(hits): State<Arc<Hits>>) -> impl IntoResponse {
    hits.record("GET /static/js/main.js");
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        "console.log('main');",
    )
}

async fn get_data(State(hits): State<Arc<Hits>>) -> Json<Value> {
    hits.record("GET /api/data");
    Json(serde_json::json!({ "key": "value" }))
}

#[debug_handler]
async fn post_data(
    State(hits): State<Arc<Hits>>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    hits.record("POST /api/data");
    if body.get("key").is_some() {
        Ok((StatusCode::CREATED, Json(body)))
    } else {
        Err(StatusCode::UNPROCESSABLE_ENTITY)
    }
}

async fn not_found(State(hits): State<Arc<Hits>>, method: Method, uri: Uri) -> StatusCode {
    hits.record(&format!("{method} {}", uri.path()));
    StatusCode::NOT_FOUND
}
