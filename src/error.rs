use thiserror::Error;

pub type StrikeResult<T> = Result<T, StrikeError>;

#[derive(Error, Debug)]
pub enum StrikeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No data available: {0}")]
    NoData(String),

    #[error("Not found: {0}")]
    NotFound(String),
}
