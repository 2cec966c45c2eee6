use thiserror::Error;

use crate::config::ConfigError;
use crate::ingest::{ExtractionError, NormalizationError};
use crate::network::FetchError;
use crate::nlp::NlpError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Language model error: {0}")]
    Nlp(#[from] NlpError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Normalization error: {0}")]
    Normalization(#[from] NormalizationError),
}

pub type Result<T> = std::result::Result<T, Error>;
