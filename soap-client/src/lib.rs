//! Private SOAP transport for UPnP device communication
//!
//! This crate provides the minimal HTTP POST layer used to talk to WEMO
//! devices. WEMO devices live on the LAN and answer quickly, so every
//! request runs under a short fixed timeout and is never retried here: the
//! next poll cycle is the retry.
//!
//! Callers usually go through [`SoapTransport::post`], which folds every
//! transport failure into an empty body. Absence of data is the only failure
//! signal the engine above needs.

mod error;

pub use error::SoapError;

use std::time::Duration;

/// Default per-request timeout for WEMO devices
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Content type WEMO devices expect on every control request
pub const CONTENT_TYPE: &str = "text/xml; charset=\"utf-8\"";

/// Something that can deliver a SOAP envelope and hand back the raw response
///
/// Implementations must never fail loudly: any transport-level problem is
/// reported as an empty string.
pub trait SoapTransport: Send + Sync {
    /// POST `body` to `url` with the given SOAP action URI
    ///
    /// `soap_action` is the unquoted action, e.g.
    /// `urn:Belkin:service:basicevent:1#GetBinaryState`.
    fn post(&self, url: &str, soap_action: &str, body: &str) -> String;
}

/// A minimal SOAP client for UPnP device communication
#[derive(Debug, Clone)]
pub struct SoapClient {
    agent: ureq::Agent,
}

impl SoapClient {
    /// Create a new SOAP client with the default 2 second timeout
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a SOAP client with a custom connect/read timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(timeout)
                .timeout_read(timeout)
                .timeout_write(timeout)
                .build(),
        }
    }

    /// Send a SOAP request and return the response body or the failure cause
    pub fn try_post(&self, url: &str, soap_action: &str, body: &str) -> Result<String, SoapError> {
        let quoted_action = format!("\"{}\"", soap_action);

        let response = self
            .agent
            .post(url)
            .set("Content-Type", CONTENT_TYPE)
            .set("SOAPACTION", &quoted_action)
            .send_string(body)
            .map_err(|e| match e {
                ureq::Error::Status(code, _) => SoapError::Status(code),
                ureq::Error::Transport(t) => SoapError::Network(t.to_string()),
            })?;

        response
            .into_string()
            .map_err(|e| SoapError::Body(e.to_string()))
    }
}

impl SoapTransport for SoapClient {
    fn post(&self, url: &str, soap_action: &str, body: &str) -> String {
        match self.try_post(url, soap_action, body) {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!("SOAP {} to {} failed: {}", soap_action, url, e);
                String::new()
            }
        }
    }
}

impl Default for SoapClient {
    fn default() -> Self {
        Self::new()
    }
}
