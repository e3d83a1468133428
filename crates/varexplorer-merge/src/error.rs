use thiserror::Error;

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("Variant identifier must not be blank")]
    MissingIdentifier,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("JSON export error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
