//! WEMO root device discovery
//!
//! Finds UPnP root devices on the local network with a single SSDP
//! `M-SEARCH` and reports each device's UDN together with the base URL of
//! its control endpoints (the `LOCATION` with `/setup.xml` removed).
//!
//! # Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//!
//! let nodes = wemo_discovery::discover(Duration::from_secs(2))?;
//! for (udn, location) in &nodes {
//!     println!("{} at {}", udn, location);
//! }
//! # Ok::<(), wemo_discovery::DiscoveryError>(())
//! ```

mod discovery;
mod error;
mod ssdp;

pub use discovery::DiscoveryIterator;

use discovery::DatagramWindow;
pub use error::{DiscoveryError, Result};

use std::collections::HashMap;
use std::time::Duration;

/// Default discovery window
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(2);

/// A root device seen during discovery
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiscoveredNode {
    /// UPnP unique device name, e.g. `uuid:Bridge-1_0-231442B0100A0B`
    pub udn: String,
    /// Base URL for control endpoints, e.g. `http://10.0.0.5:49153`
    pub location: String,
}

/// Discover root devices for `window` and map each UDN to its location.
///
/// A device answering more than once keeps the last location it reported.
pub fn discover(window: Duration) -> Result<HashMap<String, String>> {
    Ok(root_devices(DatagramWindow::open(window)?))
}

/// Map SSDP response datagrams to UDN and location.
///
/// Datagrams that are not complete root-device answers are skipped. A UDN
/// seen twice keeps the later location.
pub fn root_devices<I, S>(datagrams: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    datagrams
        .into_iter()
        .filter_map(|datagram| ssdp::parse_root_device(datagram.as_ref()))
        .map(|node| (node.udn, node.location))
        .collect()
}

/// Iterate over discovery responses as they arrive.
///
/// Socket setup failures produce an empty iterator; use
/// [`DiscoveryIterator::new`] to observe them.
pub fn discover_iter(window: Duration) -> DiscoveryIterator {
    DiscoveryIterator::new(window).unwrap_or_else(|e| {
        tracing::warn!("SSDP discovery unavailable: {}", e);
        DiscoveryIterator::empty()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(location: &str, usn: &str) -> String {
        format!(
            "HTTP/1.1 200 OK\r\nCACHE-CONTROL: max-age=86400\r\nLOCATION: {}\r\nST: upnp:rootdevice\r\nUSN: {}\r\n\r\n",
            location, usn
        )
    }

    #[test]
    fn test_repeated_udn_keeps_the_later_location() {
        let window = vec![
            answer("http://10.0.0.5:49153/setup.xml", "uuid:Socket-1_0-ABC::upnp:rootdevice"),
            answer("http://10.0.0.6:49154/setup.xml", "uuid:Socket-1_0-ABC::upnp:rootdevice"),
        ];

        let nodes = root_devices(&window);

        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes["uuid:Socket-1_0-ABC"], "http://10.0.0.6:49154");
    }

    #[test]
    fn test_partial_answers_are_skipped() {
        let window = vec![
            "HTTP/1.1 200 OK\r\nLOCATION: http://10.0.0.7:49153/setup.xml\r\n\r\n".to_string(),
            answer("http://10.0.0.8:1400/xml/device_description.xml", "uuid:RINCON_1::upnp:rootdevice"),
            "HTTP/1.1 200 OK\r\nUSN: uuid:Lightswitch-1_0-XYZ::upnp:rootdevice\r\n\r\n".to_string(),
            answer("http://10.0.0.9:49153/setup.xml", "uuid:Bridge-1_0-231442B0100A0B::upnp:rootdevice"),
        ];

        let nodes = root_devices(window);

        assert_eq!(
            nodes,
            HashMap::from([(
                "uuid:Bridge-1_0-231442B0100A0B".to_string(),
                "http://10.0.0.9:49153".to_string()
            )])
        );
    }

    #[test]
    fn test_empty_window() {
        assert!(root_devices(Vec::<String>::new()).is_empty());
    }
}
