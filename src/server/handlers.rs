use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::app::App;
use crate::db::{CountryQuery, SortOrder};
use crate::error::AppError;

type AppState = Arc<App>;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    region: Option<String>,
    currency: Option<String>,
    sort: Option<String>,
}

impl ListParams {
    fn into_query(self) -> CountryQuery {
        // Empty values behave as if the parameter was absent
        let present = |value: Option<String>| value.filter(|v| !v.is_empty());
        CountryQuery {
            region: present(self.region),
            currency: present(self.currency),
            sort: self.sort.as_deref().and_then(SortOrder::parse),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: String,
}

#[derive(Debug, Serialize)]
struct RefreshResponse {
    message: String,
    total_countries: usize,
    last_refreshed_at: String,
}

fn error_response(status: StatusCode, msg: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: msg.into(),
            details: None,
        }),
    )
        .into_response()
}

fn internal_error(context: &str, err: AppError) -> Response {
    error!("{}: {}", context, err);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

/// `GET /countries`
pub async fn list_countries(
    State(app): State<AppState>,
    Query(params): Query<ListParams>,
) -> Response {
    match app.repository.list_countries(params.into_query()).await {
        Ok(countries) => Json(countries).into_response(),
        Err(e) => internal_error("Failed to list countries", e),
    }
}

/// `GET /countries/:name`
pub async fn get_country(State(app): State<AppState>, Path(name): Path<String>) -> Response {
    match app.repository.get_country(&name.to_lowercase()).await {
        Ok(Some(country)) => Json(country).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "Country not found"),
        Err(e) => internal_error("Failed to look up country", e),
    }
}

/// `DELETE /countries/:name`
pub async fn delete_country(State(app): State<AppState>, Path(name): Path<String>) -> Response {
    match app.repository.delete_country(&name.to_lowercase()).await {
        Ok(true) => Json(MessageResponse {
            message: "Country deleted successfully".to_string(),
        })
        .into_response(),
        Ok(false) => error_response(StatusCode::NOT_FOUND, "Country not found"),
        Err(e) => {
            error!("Failed to delete country {}: {}", name, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error deleting country")
        }
    }
}

/// `GET /status`
pub async fn status(State(app): State<AppState>) -> Response {
    match app.repository.status().await {
        Ok(status) => Json(status).into_response(),
        Err(e) => internal_error("Failed to read status", e),
    }
}

/// `POST /countries/refresh`
pub async fn refresh_countries(State(app): State<AppState>) -> Response {
    match app.refresh().await {
        Ok(outcome) => Json(RefreshResponse {
            message: "Countries store updated successfully".to_string(),
            total_countries: outcome.total_countries,
            last_refreshed_at: outcome
                .last_refreshed_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        })
        .into_response(),
        Err(e) if e.is_upstream() => {
            warn!("Refresh aborted: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse {
                    error: "External data source unavailable".to_string(),
                    details: e
                        .upstream_source()
                        .map(|source| format!("Could not fetch data from {}", source)),
                }),
            )
                .into_response()
        }
        // Store and render failures after a good fetch
        Err(e) => internal_error("Refresh failed", e),
    }
}

/// `GET /countries/image`
pub async fn summary_image(State(app): State<AppState>) -> Response {
    if !app.renderer.exists() {
        return error_response(StatusCode::NOT_FOUND, "Summary image not found");
    }

    match tokio::fs::read(app.renderer.path()).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "image/png")], bytes).into_response(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            error_response(StatusCode::NOT_FOUND, "Summary image not found")
        }
        Err(e) => internal_error("Failed to read summary image", e.into()),
    }
}
