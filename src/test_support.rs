//! Stub upstream services shared by the fetcher and server tests.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::config::Config;

/// `None` for a source makes it answer with a server error.
pub struct UpstreamStub {
    pub countries: Option<Value>,
    pub rates: Option<Value>,
    pub rates_result: &'static str,
    /// Held before the rates source answers
    pub rates_delay: Duration,
}

impl UpstreamStub {
    pub fn healthy(countries: Value, rates: Value) -> Self {
        Self {
            countries: Some(countries),
            rates: Some(rates),
            rates_result: "success",
            rates_delay: Duration::ZERO,
        }
    }
}

/// Serve the stub on an ephemeral port and return its base URL.
pub async fn spawn_upstream(stub: UpstreamStub) -> String {
    let app = Router::new()
        .route("/countries", get(countries))
        .route("/rates", get(rates))
        .with_state(Arc::new(stub));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

pub fn upstream_config(base: &str) -> Config {
    Config {
        db_path: ":memory:".to_string(),
        countries_url: format!("{}/countries", base),
        rates_url: format!("{}/rates", base),
        request_timeout_secs: 5,
        ..Config::default()
    }
}

async fn countries(State(stub): State<Arc<UpstreamStub>>) -> Response {
    match &stub.countries {
        Some(body) => Json(body.clone()).into_response(),
        None => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn rates(State(stub): State<Arc<UpstreamStub>>) -> Response {
    if !stub.rates_delay.is_zero() {
        tokio::time::sleep(stub.rates_delay).await;
    }
    match &stub.rates {
        Some(rates) => Json(json!({
            "result": stub.rates_result,
            "provider": "https://www.exchangerate-api.com",
            "base_code": "USD",
            "time_last_update_utc": "Sat, 17 Oct 2026 00:02:31 +0000",
            "rates": rates,
        }))
        .into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}
