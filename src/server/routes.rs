use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::app::App;
use crate::error::{AppError, Result};

use super::handlers;

pub fn router(app: Arc<App>) -> Router {
    Router::new()
        .route("/countries", get(handlers::list_countries))
        .route("/countries/refresh", post(handlers::refresh_countries))
        .route("/countries/image", get(handlers::summary_image))
        .route(
            "/countries/:name",
            get(handlers::get_country).delete(handlers::delete_country),
        )
        .route("/status", get(handlers::status))
        .with_state(app)
        .layer(TraceLayer::new_for_http())
}

/// Bind the configured host, which may be a name such as `localhost`.
pub async fn bind(host: &str, port: u16) -> Result<TcpListener> {
    TcpListener::bind((host, port))
        .await
        .map_err(|e| AppError::Config(format!("cannot listen on {}:{}: {}", host, port, e)))
}

/// Serve until Ctrl-C.
pub async fn serve(app: Arc<App>, host: &str, port: u16) -> Result<()> {
    let listener = bind(host, port).await?;
    info!("Country API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(app))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Country API shutting down");
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn binds_host_names() {
        let listener = bind("localhost", 0).await.unwrap();
        assert!(listener.local_addr().unwrap().ip().is_loopback());
    }

    #[tokio::test]
    async fn occupied_port_is_a_config_error() {
        let taken = bind("127.0.0.1", 0).await.unwrap();
        let port = taken.local_addr().unwrap().port();

        let err = bind("127.0.0.1", port).await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains(&format!("127.0.0.1:{}", port)));
    }
}
