use thiserror::Error;

#[derive(Error, Debug)]
pub enum CircleCiError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    #[error("project slug is required")]
    RequiredProjectSlug,

    #[error("job number is required")]
    RequiredJobNumber,

    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CircleCiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_messages() {
        assert_eq!(CircleCiError::Unauthorized.to_string(), "unauthorized");
        assert_eq!(CircleCiError::NotFound.to_string(), "not found");
        assert_eq!(
            CircleCiError::RequiredProjectSlug.to_string(),
            "project slug is required"
        );
        assert_eq!(
            CircleCiError::RequiredJobNumber.to_string(),
            "job number is required"
        );
    }

    #[test]
    fn test_api_error_message() {
        let err = CircleCiError::Api {
            status: 429,
            message: "Rate limit exceeded".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API request failed with status 429: Rate limit exceeded"
        );
    }
}
