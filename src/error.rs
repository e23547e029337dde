use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// One of the remote data sources failed or returned a non-success status.
    #[error("Could not fetch data from {source_name}: {message}")]
    Upstream {
        source_name: &'static str,
        message: String,
    },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database connection error: {0}")]
    Connection(#[from] tokio_rusqlite::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Render error: {0}")]
    Render(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn upstream(source_name: &'static str, message: impl Into<String>) -> Self {
        AppError::Upstream {
            source_name,
            message: message.into(),
        }
    }

    pub fn is_upstream(&self) -> bool {
        matches!(self, AppError::Upstream { .. })
    }

    /// Name of the remote source behind an `Upstream` error.
    pub fn upstream_source(&self) -> Option<&'static str> {
        match self {
            AppError::Upstream { source_name, .. } => Some(source_name),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
