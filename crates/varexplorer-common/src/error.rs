use thiserror::Error;

#[derive(Debug, Error)]
pub enum VarExplorerError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Security error: {0}")]
    Security(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, VarExplorerError>;
