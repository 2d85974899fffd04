//! Discovery seam
//!
//! The engine asks a [`Discoverer`] for `udn -> location` once per cycle.
//! [`SsdpDiscoverer`] is the network implementation; tests supply fixed maps.

use std::collections::HashMap;
use std::time::Duration;

use crate::Result;

/// Source of root devices for a poll cycle
pub trait Discoverer: Send + Sync {
    /// Every root device that answered this pass, keyed by UDN
    fn discover(&self) -> Result<HashMap<String, String>>;
}

/// SSDP `M-SEARCH` discovery with a fixed listening window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SsdpDiscoverer {
    window: Duration,
}

impl SsdpDiscoverer {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

impl Default for SsdpDiscoverer {
    fn default() -> Self {
        Self::new(wemo_discovery::DEFAULT_WINDOW)
    }
}

impl Discoverer for SsdpDiscoverer {
    fn discover(&self) -> Result<HashMap<String, String>> {
        let nodes = wemo_discovery::discover(self.window)?;
        tracing::debug!("SSDP found {} root devices", nodes.len());
        Ok(nodes)
    }
}

impl<F> Discoverer for F
where
    F: Fn() -> Result<HashMap<String, String>> + Send + Sync,
{
    fn discover(&self) -> Result<HashMap<String, String>> {
        self()
    }
}
