use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;

/// Passthrough to the external analysis backend. Responses are opaque JSON;
/// no schema is enforced on either side. Upstream failures are logged and the
/// last good payload for that request keeps being served, matching the
/// dashboard behavior of leaving previously displayed data in place.
#[derive(Clone)]
pub struct AnalysisProxy {
    client: reqwest::Client,
    base_url: String,
    last_good: Arc<Mutex<HashMap<String, Value>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Fresh(Value),
    Cached(Value),
    Unavailable(String),
}

impl AnalysisProxy {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            last_good: Arc::default(),
        }
    }

    pub async fn fetch(&self, path_and_query: &str) -> AnalysisOutcome {
        let url = format!(
            "{}/{path_and_query}",
            self.base_url.trim_end_matches('/')
        );

        match self.request(&url).await {
            Ok(payload) => {
                self.last_good
                    .lock()
                    .await
                    .insert(path_and_query.to_owned(), payload.clone());
                AnalysisOutcome::Fresh(payload)
            }
            Err(err) => {
                eprintln!("analysis upstream failed for {path_and_query}: {err}");
                match self.last_good.lock().await.get(path_and_query) {
                    Some(cached) => AnalysisOutcome::Cached(cached.clone()),
                    None => AnalysisOutcome::Unavailable(err.to_string()),
                }
            }
        }
    }

    async fn request(&self, url: &str) -> Result<Value, reqwest::Error> {
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

pub fn routes(proxy: AnalysisProxy) -> Router {
    Router::new()
        .route("/analysis/technical/:ticker", get(technical))
        .route("/analysis/overview/:ticker", get(overview))
        .route("/analysis/history/:ticker", get(history))
        .route("/analysis/backtest/:ticker", get(backtest))
        .with_state(proxy)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

async fn technical(
    Path(ticker): Path<String>,
    State(proxy): State<AnalysisProxy>,
) -> Response {
    respond(proxy.fetch(&format!("technical/{ticker}")).await)
}

async fn overview(
    Path(ticker): Path<String>,
    State(proxy): State<AnalysisProxy>,
) -> Response {
    respond(proxy.fetch(&format!("overview/{ticker}")).await)
}

async fn history(
    Path(ticker): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    State(proxy): State<AnalysisProxy>,
) -> Response {
    respond(proxy.fetch(&period_path("history", &ticker, &params)).await)
}

async fn backtest(
    Path(ticker): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    State(proxy): State<AnalysisProxy>,
) -> Response {
    respond(proxy.fetch(&period_path("backtest", &ticker, &params)).await)
}

fn period_path(endpoint: &str, ticker: &str, params: &HashMap<String, String>) -> String {
    match params.get("period") {
        Some(period) => format!("{endpoint}/{ticker}?period={period}"),
        None => format!("{endpoint}/{ticker}"),
    }
}

fn respond(outcome: AnalysisOutcome) -> Response {
    match outcome {
        AnalysisOutcome::Fresh(payload) | AnalysisOutcome::Cached(payload) => {
            (StatusCode::OK, Json(payload)).into_response()
        }
        AnalysisOutcome::Unavailable(detail) => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorBody { error: detail }),
        )
            .into_response(),
    }
}
