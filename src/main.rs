use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

mod app;
mod config;
mod db;
mod error;
mod models;
mod pipeline;
mod render;
mod server;
mod sources;

#[cfg(test)]
mod test_support;

use app::App;
use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    // --config <path> overrides the default config location
    let config_path = args
        .iter()
        .position(|arg| arg == "--config")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from);

    // --refresh runs a single headless refresh
    let headless_refresh = args.iter().any(|arg| arg == "--refresh");

    let config = match &config_path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;

    let app = Arc::new(
        App::new(&config)
            .await
            .context("failed to initialise country store")?,
    );

    if headless_refresh {
        let outcome = app.refresh().await.context("refresh failed")?;
        println!(
            "Refreshed {} countries at {}, summary at {}",
            outcome.total_countries,
            outcome.last_refreshed_at.to_rfc3339(),
            outcome.image_path.display()
        );
        return Ok(());
    }

    server::serve(app, &config.host, config.port).await?;

    Ok(())
}
