//! API error types.

/// Errors from fetching or decoding an API resource.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the API
    #[error("rate limited by the API")]
    RateLimited,

    /// Response body was not a valid `{ "data": [...] }` document
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ApiError::Api {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "API error 500: Internal Server Error");

        let err = ApiError::RateLimited;
        assert_eq!(err.to_string(), "rate limited by the API");

        let err = ApiError::Json {
            message: "expected value".into(),
            body: Some("<html>".into()),
        };
        assert_eq!(err.to_string(), "JSON parse error: expected value");
    }
}
