//! Result and error types for the harness.

use thiserror::Error;

/// Result type for harness operations
pub type EprResult<T> = Result<T, EprError>;

/// Errors that can occur while driving a flow
#[derive(Debug, Error)]
pub enum EprError {
    /// An expected page element or text did not appear within the bounded wait.
    /// Always fatal to the current flow; triggers a diagnostic screenshot.
    #[error("navigation assertion failed on {page}: expected {expectation} within {timeout_ms}ms")]
    NavigationAssertion {
        /// Page the assertion was made on
        page: &'static str,
        /// The expectation that was not met
        expectation: String,
        /// Bounded wait that was exceeded
        timeout_ms: u64,
    },

    /// Caller supplied a value outside a closed enumeration
    #[error("invalid choice for {field}: {value:?}")]
    InvalidChoice {
        /// Name of the closed enumeration
        field: &'static str,
        /// The out-of-set value
        value: String,
    },

    /// An external endpoint (company registry, notifications) failed fatally
    #[error("{service} lookup failed: {message}")]
    ExternalLookup {
        /// Which external service failed
        service: &'static str,
        /// Error message
        message: String,
    },

    /// Expected extraction not found in page or message text.
    /// Carries the raw source text for diagnosis.
    #[error("missing data: {what} not found in {source_text:?}")]
    MissingData {
        /// What was being extracted
        what: &'static str,
        /// The raw text that was searched
        source_text: String,
    },

    /// Browser launch error
    #[error("failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Page-level browser operation failed
    #[error("page error: {message}")]
    Page {
        /// Error message
        message: String,
    },

    /// Navigation to a URL failed
    #[error("navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Screenshot capture failed
    #[error("screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// CSV template violation (unknown override column, unreadable template)
    #[error("csv template error: {message}")]
    CsvTemplate {
        /// Error message
        message: String,
    },

    /// Configuration file missing or missing a required key
    #[error("configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Token signing error
    #[error("token signing error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// CSV read/write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl EprError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a CSV template error
    #[must_use]
    pub fn csv_template(message: impl Into<String>) -> Self {
        Self::CsvTemplate {
            message: message.into(),
        }
    }

    /// Create a page error
    #[must_use]
    pub fn page(message: impl Into<String>) -> Self {
        Self::Page {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_assertion_names_page_and_expectation() {
        let err = EprError::NavigationAssertion {
            page: "SigninPage",
            expectation: "heading \"Signed out\"".to_string(),
            timeout_ms: 10_000,
        };
        let msg = err.to_string();
        assert!(msg.contains("SigninPage"));
        assert!(msg.contains("Signed out"));
        assert!(msg.contains("10000ms"));
    }

    #[test]
    fn missing_data_carries_source_text() {
        let err = EprError::MissingData {
            what: "organisation id",
            source_text: "Some unrelated paragraph".to_string(),
        };
        assert!(err.to_string().contains("Some unrelated paragraph"));
    }
}
