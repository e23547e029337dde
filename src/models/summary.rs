use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of the top-N by estimated GDP.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopCountry {
    pub name: String,
    pub currency_code: Option<String>,
    pub estimated_gdp: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RefreshStatus {
    pub total_countries: i64,
    pub last_refreshed_at: Option<DateTime<Utc>>,
}

/// Read projection fed to the summary renderer. Recomputed on every refresh.
#[derive(Debug, Clone)]
pub struct SummarySnapshot {
    pub total_countries: i64,
    pub top_countries: Vec<TopCountry>,
    pub last_refreshed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    /// Number of countries written by this refresh
    pub total_countries: usize,
    pub last_refreshed_at: DateTime<Utc>,
    pub image_path: PathBuf,
}
