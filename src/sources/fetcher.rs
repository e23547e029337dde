use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{ExchangeRateResponse, RateTable, RawCountry};

const COUNTRIES_SOURCE: &str = "countries API";
const RATES_SOURCE: &str = "exchange rates API";

/// Client for the two remote data sources.
pub struct SourceFetcher {
    client: Client,
    countries_url: String,
    rates_url: String,
}

impl SourceFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("country-atlas/1.0")
            .build()?;

        Ok(Self {
            client,
            countries_url: config.countries_url.clone(),
            rates_url: config.rates_url.clone(),
        })
    }

    pub async fn fetch_countries(&self) -> Result<Vec<RawCountry>> {
        let countries: Vec<RawCountry> = self.get_json(&self.countries_url, COUNTRIES_SOURCE).await?;
        tracing::debug!("Fetched {} countries", countries.len());
        Ok(countries)
    }

    pub async fn fetch_rates(&self) -> Result<RateTable> {
        let envelope: ExchangeRateResponse = self.get_json(&self.rates_url, RATES_SOURCE).await?;

        if envelope.result.as_deref() == Some("error") {
            return Err(AppError::upstream(RATES_SOURCE, "provider reported an error"));
        }

        tracing::debug!(
            base = envelope.base_code.as_deref().unwrap_or("?"),
            updated = envelope.time_last_update_utc.as_deref().unwrap_or("?"),
            "Fetched {} exchange rates",
            envelope.rates.len()
        );
        Ok(envelope.rates)
    }

    /// Fetch both sources concurrently. Fails as soon as either one fails.
    pub async fn fetch_all(&self) -> Result<(Vec<RawCountry>, RateTable)> {
        tokio::try_join!(self.fetch_countries(), self.fetch_rates())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, source: &'static str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::upstream(source, e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::upstream(
                source,
                format!("HTTP {}", response.status()),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::upstream(source, format!("invalid response body: {}", e)))
    }
}
