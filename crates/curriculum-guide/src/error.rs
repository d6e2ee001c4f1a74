//! Error types for the curriculum guide page

use thiserror::Error;

/// Result type for page operations
pub type PageResult<T> = Result<T, PageError>;

/// Errors that can occur while configuring or running the page
///
/// Most page behaviour is total: missing elements are skipped and malformed
/// counter text leaves the element unanimated. These variants cover the few
/// places where a fault has to be reported to the caller.
#[derive(Debug, Error)]
pub enum PageError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Configuration could not be parsed
    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Preference storage failed
    #[error("Preference storage failed: {message}")]
    Storage {
        /// Error message
        message: String,
    },

    /// Host document call failed
    #[error("Host document error: {message}")]
    Host {
        /// Error message
        message: String,
    },
}

impl PageError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a storage error
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a host error
    #[must_use]
    pub fn host(message: impl Into<String>) -> Self {
        Self::Host {
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = PageError::config("threshold out of range");
        assert!(err.to_string().contains("Configuration"));
        assert!(err.to_string().contains("threshold out of range"));
    }

    #[test]
    fn test_storage_error() {
        let err = PageError::storage("quota exceeded");
        assert!(err.to_string().contains("Preference storage"));
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn test_host_error() {
        let err = PageError::host("no window");
        assert!(err.to_string().contains("Host document"));
    }

    #[test]
    fn test_json_error_from() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: PageError = parse.into();
        assert!(matches!(err, PageError::Json(_)));
        assert!(err.to_string().contains("Invalid configuration JSON"));
    }
}
