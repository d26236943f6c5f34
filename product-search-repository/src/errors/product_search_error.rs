//! Product search error types.
//!
//! A single error type covers engine I/O, response parsing, resource loading,
//! acknowledgement checks and configuration validation. How a variant is
//! treated depends on the caller: the search path logs and degrades to an
//! empty response, the rotation path propagates.

use thiserror::Error;

/// Unified errors from product search and index rotation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProductSearchError {
    /// Failed to build a client for the search engine.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// I/O failure or non-success status while talking to the engine.
    #[error("Transport error: {0}")]
    TransportError(String),

    /// Engine response or resource content could not be parsed.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A required resource (settings, mapping, seed data) is missing.
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// The engine did not acknowledge an index or alias change.
    #[error("Not acknowledged: {0}")]
    AcknowledgementFailure(String),

    /// Invalid configuration, e.g. overlapping token vocabularies.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A rotation was requested while another one is still running.
    #[error("Index rotation already in progress for alias {0}")]
    RotationInProgress(String),
}

impl ProductSearchError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a transport error.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::TransportError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a resource not found error.
    pub fn resource_not_found(msg: impl Into<String>) -> Self {
        Self::ResourceNotFound(msg.into())
    }

    /// Create an acknowledgement failure.
    pub fn not_acknowledged(msg: impl Into<String>) -> Self {
        Self::AcknowledgementFailure(msg.into())
    }

    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::ConfigurationError(msg.into())
    }

    /// Create a rotation-in-progress error.
    pub fn rotation_in_progress(alias: impl Into<String>) -> Self {
        Self::RotationInProgress(alias.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            ProductSearchError::resource_not_found("settings.json").to_string(),
            "Resource not found: settings.json"
        );
        assert_eq!(
            ProductSearchError::rotation_in_progress("products").to_string(),
            "Index rotation already in progress for alias products"
        );
    }
}
