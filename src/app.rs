use std::path::Path;

use chrono::{SubsecRound, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::db::Repository;
use crate::error::{AppError, Result};
use crate::models::RefreshOutcome;
use crate::pipeline::enrich_countries;
use crate::render::SummaryRenderer;
use crate::sources::SourceFetcher;

/// Number of countries shown on the summary image.
pub const SUMMARY_TOP_N: usize = 5;

/// Process-wide state shared by every request handler.
pub struct App {
    pub repository: Repository,
    pub renderer: SummaryRenderer,
    fetcher: SourceFetcher,
    // Serialises refreshes so two runs never interleave their upserts
    refresh_lock: Mutex<()>,
}

impl App {
    pub async fn new(config: &Config) -> Result<Self> {
        if let Some(parent) = Path::new(&config.db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let repository = Repository::new(&config.db_path).await?;
        let fetcher = SourceFetcher::new(config)?;
        let renderer = SummaryRenderer::new(config.summary_image_path());

        Ok(Self {
            repository,
            renderer,
            fetcher,
            refresh_lock: Mutex::new(()),
        })
    }

    /// Fetch both sources, enrich, upsert, and re-render the summary image.
    ///
    /// Upstream failures abort before anything is written. A store failure
    /// mid-batch leaves the rows written so far in place.
    pub async fn refresh(&self) -> Result<RefreshOutcome> {
        let _guard = self.refresh_lock.lock().await;

        let (raw_countries, rates) = self.fetcher.fetch_all().await?;
        let countries = enrich_countries(raw_countries, &rates, &mut StdRng::from_entropy());

        let refreshed_at = Utc::now().trunc_subsecs(3);
        let total_countries = countries.len();
        self.repository
            .upsert_countries(countries, refreshed_at)
            .await?;

        let snapshot = self.repository.summary_snapshot(SUMMARY_TOP_N).await?;
        let renderer = self.renderer.clone();
        let image_path = tokio::task::spawn_blocking(move || renderer.render(&snapshot))
            .await
            .map_err(|e| AppError::Internal(format!("summary render task failed: {}", e)))??;

        tracing::info!(
            countries = total_countries,
            "Refresh complete at {}",
            refreshed_at.to_rfc3339()
        );

        Ok(RefreshOutcome {
            total_countries,
            last_refreshed_at: refreshed_at,
            image_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::db::CountryQuery;
    use crate::test_support::{spawn_upstream, upstream_config, UpstreamStub};
    use serde_json::json;

    async fn app_for(stub: UpstreamStub, cache: &Path) -> App {
        let base = spawn_upstream(stub).await;
        let config = Config {
            cache_dir: cache.to_string_lossy().to_string(),
            ..upstream_config(&base)
        };
        App::new(&config).await.unwrap()
    }

    fn countries() -> serde_json::Value {
        json!([
            {"name":"Nigeria","capital":"Abuja","region":"Africa","population":206139589,
             "flag":"https://flagcdn.com/ng.svg","currencies":[{"code":"NGN","name":"Nigerian naira","symbol":"₦"}]},
            {"name":"Antarctica","region":"Polar","population":1000,"flag":"https://flagcdn.com/aq.svg"},
            {"name":"Narnia","capital":"Cair Paravel","region":"Fiction","population":5,
             "flag":"https://flags.example/narnia.svg","currencies":[{"code":"NAR","name":"Narnian lion","symbol":"L"}]}
        ])
    }

    #[tokio::test]
    async fn refresh_persists_and_renders() {
        let cache = tempfile::tempdir().unwrap();
        let app = app_for(
            UpstreamStub::healthy(countries(), json!({"NGN": 1600.0, "USD": 1.0})),
            cache.path(),
        )
        .await;

        let outcome = app.refresh().await.unwrap();
        assert_eq!(outcome.total_countries, 3);
        assert!(outcome.image_path.exists());
        assert!(app.renderer.exists());

        let nigeria = app.repository.get_country("nigeria").await.unwrap().unwrap();
        assert_eq!(nigeria.exchange_rate, Some(1600.0));
        assert!(nigeria.estimated_gdp.unwrap() > 0.0);
        assert_eq!(nigeria.last_refreshed_at, outcome.last_refreshed_at);

        let antarctica = app.repository.get_country("antarctica").await.unwrap().unwrap();
        assert_eq!(antarctica.estimated_gdp, Some(0.0));

        let narnia = app.repository.get_country("narnia").await.unwrap().unwrap();
        assert_eq!(narnia.estimated_gdp, None);
    }

    #[tokio::test]
    async fn second_refresh_does_not_duplicate_rows() {
        let cache = tempfile::tempdir().unwrap();
        let app = app_for(
            UpstreamStub::healthy(countries(), json!({"NGN": 1600.0})),
            cache.path(),
        )
        .await;

        app.refresh().await.unwrap();
        app.refresh().await.unwrap();

        let rows = app
            .repository
            .list_countries(CountryQuery::default())
            .await
            .unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[tokio::test]
    async fn upstream_failure_writes_nothing() {
        let cache = tempfile::tempdir().unwrap();
        let app = app_for(
            UpstreamStub {
                countries: Some(countries()),
                rates: None,
                rates_result: "success",
                rates_delay: Duration::ZERO,
            },
            cache.path(),
        )
        .await;

        let err = app.refresh().await.unwrap_err();
        assert!(err.is_upstream());
        assert_eq!(app.repository.status().await.unwrap().total_countries, 0);
        assert!(!app.renderer.exists());
    }
}
