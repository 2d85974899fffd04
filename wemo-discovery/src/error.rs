//! Error types for the discovery system.

use std::fmt;

/// Error type for discovery operations.
///
/// Only socket setup and the outgoing M-SEARCH can fail. Silence on the
/// network is not an error: it is an empty result.
#[derive(Debug)]
pub enum DiscoveryError {
    /// Network-related errors (socket creation, send failures)
    NetworkError(String),
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryError::NetworkError(msg) => write!(f, "Network error: {}", msg),
        }
    }
}

impl std::error::Error for DiscoveryError {}

/// Convenience Result type alias for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;
