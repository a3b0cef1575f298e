use thiserror::Error;

use crate::{application::store::FetchError, config::LoadError, infra::error::InfraError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("invalid location: {0}")]
    Location(#[from] url::ParseError),
    #[error("validation failed: {0}")]
    Validation(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_errors_keep_their_message() {
        let error = AppError::from(FetchError::transport("memory", "offline"));
        assert_eq!(
            error.to_string(),
            "failed to fetch post index from memory: offline"
        );
    }

    #[test]
    fn infra_errors_convert_transparently() {
        let error = AppError::from(InfraError::http("client build failed"));
        assert_eq!(error.to_string(), "http error: client build failed");
    }
}
