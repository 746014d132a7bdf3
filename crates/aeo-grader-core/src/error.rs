use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraderError>;

#[derive(Debug, Error)]
pub enum GraderError {
    #[error("{0}")]
    InvalidUrl(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(feature = "live-probes")]
impl From<reqwest::Error> for GraderError {
    fn from(err: reqwest::Error) -> Self {
        GraderError::Network(err.to_string())
    }
}
