//! Error types for the SOAP client

use thiserror::Error;

/// Errors that can occur during SOAP communication
#[derive(Debug, Error)]
pub enum SoapError {
    /// Connection refused, timeout, DNS failure
    #[error("Network/HTTP error: {0}")]
    Network(String),

    /// The device answered with a non-success HTTP status (WEMO faults are 500s)
    #[error("HTTP status {0}")]
    Status(u16),

    /// The response body could not be read as UTF-8 text
    #[error("Failed to read response body: {0}")]
    Body(String),
}
