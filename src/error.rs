//! Error types for serp-offers.
//!
//! Errors only arise while building an [`Engine`](crate::Engine) from
//! [`Options`](crate::Options). An extraction pass itself never fails: missing
//! fields, malformed sprite references and depth-capped walks all degrade to
//! absent values.

/// Error type for engine construction and configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A selector in a fallback chain could not be parsed.
    #[error("invalid selector for `{field}`: {selector:?}")]
    InvalidSelector {
        /// Configuration field holding the selector.
        field: &'static str,
        /// The offending selector text.
        selector: String,
    },

    /// A favicon variant-index pattern failed to compile.
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// The offending pattern text.
        pattern: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// The configuration is structurally unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// External configuration could not be deserialized.
    #[error("configuration parse failed: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;
