use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use axum::{
    extract::{Query, RawQuery, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// Upper bound on facts returned for one request.
pub const MAX_FACTS: usize = 100;

const ENG: &[&str] = &[
    "Cats sleep for around 13 to 16 hours a day.",
    "A group of cats is called a clowder.",
    "Cats have five toes on their front paws but only four on the back.",
    "A cat's nose print is unique, much like a human fingerprint.",
    "Cats can rotate their ears 180 degrees.",
];

const GER: &[&str] = &[
    "Katzen schlafen etwa 13 bis 16 Stunden am Tag.",
    "Eine Gruppe von Katzen nennt man Clowder.",
    "Katzen haben vorne fünf Zehen und hinten nur vier.",
];

const CES: &[&str] = &[
    "Kočky spí zhruba 13 až 16 hodin denně.",
    "Skupině koček se anglicky říká clowder.",
    "Kočky dokážou natočit uši o 180 stupňů.",
];

/// One query received by the stub, in arrival order.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordedQuery {
    pub raw: Option<String>,
    pub pairs: Vec<(String, String)>,
}

impl RecordedQuery {
    /// Last value for `key`, if the key was sent at all.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }
}

#[derive(Clone, Debug)]
struct Canned {
    status: u16,
    body: String,
}

#[derive(Debug, Default)]
struct Inner {
    queries: Vec<RecordedQuery>,
    canned: Option<Canned>,
    delay: Option<Duration>,
}

/// Shared handle to the stub's state. Clones observe the same recordings.
#[derive(Clone, Debug, Default)]
pub struct Upstream {
    inner: Arc<Mutex<Inner>>,
}

impl Upstream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every request with `status` and the raw `body`.
    pub fn respond_with(self, status: u16, body: impl Into<String>) -> Self {
        self.lock().canned = Some(Canned {
            status,
            body: body.into(),
        });
        self
    }

    /// Sleep before answering.
    pub fn delay(self, delay: Duration) -> Self {
        self.lock().delay = Some(delay);
        self
    }

    pub fn queries(&self) -> Vec<RecordedQuery> {
        self.lock().queries.clone()
    }

    pub fn hits(&self) -> usize {
        self.lock().queries.len()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

pub fn app() -> Router {
    router(Upstream::default())
}

pub fn router(upstream: Upstream) -> Router {
    Router::new().route("/", get(facts)).with_state(upstream)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, Upstream::default()).await
}

pub async fn serve(listener: TcpListener, upstream: Upstream) -> Result<(), std::io::Error> {
    axum::serve(listener, router(upstream)).await
}

/// Facts for `lang`, falling back to English like the real service.
pub fn catalogue(lang: Option<&str>) -> &'static [&'static str] {
    match lang {
        Some("ger") => GER,
        Some("ces-cz") => CES,
        _ => ENG,
    }
}

/// Pick facts the way the stub answers a query: `id` selects one fact
/// (1-based, empty when out of range), otherwise `count` facts cycling
/// through the catalogue.
pub fn select(count: Option<&str>, lang: Option<&str>, id: Option<&str>) -> Vec<String> {
    let facts = catalogue(lang);
    if let Some(id) = id {
        return id
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| facts.get(i))
            .map(|fact| vec![fact.to_string()])
            .unwrap_or_default();
    }
    let count = count
        .and_then(|c| c.parse::<usize>().ok())
        .unwrap_or(1)
        .min(MAX_FACTS);
    facts
        .iter()
        .cycle()
        .take(count)
        .map(|fact| fact.to_string())
        .collect()
}

async fn facts(
    State(upstream): State<Upstream>,
    RawQuery(raw): RawQuery,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let query = RecordedQuery { raw, pairs };
    let (canned, delay) = {
        let mut inner = upstream.lock();
        inner.queries.push(query.clone());
        (inner.canned.clone(), inner.delay)
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    if let Some(canned) = canned {
        let status = StatusCode::from_u16(canned.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, [(header::CONTENT_TYPE, "application/json")], canned.body).into_response();
    }

    let data = select(query.get("count"), query.get("lang"), query.get("id"));
    Json(serde_json::json!({ "data": data })).into_response()
}
