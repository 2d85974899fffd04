//! SSDP (Simple Service Discovery Protocol) client for root-device discovery
//!
//! Internal to the crate. WEMO devices answer `upnp:rootdevice` searches with
//! a `LOCATION` pointing at their `setup.xml` and a `USN` of the form
//! `<udn>::upnp:rootdevice`.

use std::net::UdpSocket;
use std::time::{Duration, Instant};

use crate::error::{DiscoveryError, Result};
use crate::DiscoveredNode;

pub(crate) const SSDP_ADDR: &str = "239.255.255.250:1900";

const SETUP_XML_SUFFIX: &str = "/setup.xml";
const ROOT_DEVICE_SUFFIX: &str = "::upnp:rootdevice";

/// Largest UDP payload over IPv4
const MAX_DATAGRAM: usize = 65_507;

/// SSDP client bound to an ephemeral unicast port
pub(crate) struct SsdpClient {
    socket: UdpSocket,
    buffer: Vec<u8>,
}

impl SsdpClient {
    pub fn new() -> Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0").map_err(|e| {
            DiscoveryError::NetworkError(format!("Failed to bind UDP socket: {}", e))
        })?;

        socket.set_multicast_loop_v4(true).map_err(|e| {
            DiscoveryError::NetworkError(format!("Failed to set multicast loop: {}", e))
        })?;

        Ok(Self {
            socket,
            buffer: vec![0; MAX_DATAGRAM],
        })
    }

    /// Send one M-SEARCH for UPnP root devices
    pub fn search(&self) -> Result<()> {
        let request = "M-SEARCH * HTTP/1.1\r\n\
             HOST: 239.255.255.250:1900\r\n\
             ST: upnp:rootdevice\r\n\
             MX: 2\r\n\
             MAN: \"ssdp:discover\"\r\n\
             \r\n";

        self.socket
            .send_to(request.as_bytes(), SSDP_ADDR)
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to send M-SEARCH: {}", e)))?;

        Ok(())
    }

    /// Receive the next datagram before `deadline`.
    ///
    /// Returns `None` once the window is over. Undecodable datagrams and
    /// transient socket errors are skipped.
    pub fn recv_until(&mut self, deadline: Instant) -> Option<String> {
        loop {
            let remaining = deadline.checked_duration_since(Instant::now())?;
            if remaining.is_zero() {
                return None;
            }
            // A zero read timeout means "block forever" to the OS
            let timeout = remaining.max(Duration::from_millis(1));
            if self.socket.set_read_timeout(Some(timeout)).is_err() {
                return None;
            }

            match self.socket.recv_from(&mut self.buffer) {
                Ok((size, from)) => match std::str::from_utf8(&self.buffer[..size]) {
                    Ok(text) => return Some(text.to_string()),
                    Err(_) => {
                        tracing::trace!("Skipping non UTF-8 SSDP datagram from {}", from);
                        continue;
                    }
                },
                Err(e)
                    if e.kind() == std::io::ErrorKind::WouldBlock
                        || e.kind() == std::io::ErrorKind::TimedOut =>
                {
                    return None;
                }
                Err(e) => {
                    tracing::debug!("SSDP receive error: {}", e);
                    continue;
                }
            }
        }
    }
}

/// Extract a root device from one SSDP response datagram.
///
/// Both `LOCATION` (ending in `/setup.xml`) and `USN` (ending in
/// `::upnp:rootdevice`) must appear in the same datagram.
pub(crate) fn parse_root_device(response: &str) -> Option<DiscoveredNode> {
    let mut location = None;
    let mut udn = None;

    for line in response.lines() {
        let line = line.trim();

        if let Some(value) = extract_header_value(line, "LOCATION:") {
            if let Some(base) = value.strip_suffix(SETUP_XML_SUFFIX) {
                location = Some(base.trim().to_string());
            }
        } else if let Some(value) = extract_header_value(line, "USN:") {
            if let Some(id) = value.strip_suffix(ROOT_DEVICE_SUFFIX) {
                udn = Some(id.trim().to_string());
            }
        }
    }

    match (udn, location) {
        (Some(udn), Some(location)) if !udn.is_empty() && !location.is_empty() => {
            Some(DiscoveredNode { udn, location })
        }
        _ => None,
    }
}

/// Extract header value from a line like "HEADER: value"
fn extract_header_value(line: &str, header: &str) -> Option<String> {
    if line.len() > header.len()
        && line.is_char_boundary(header.len())
        && line[..header.len()].eq_ignore_ascii_case(header)
    {
        Some(line[header.len()..].trim().to_string())
    } else {
        None
    }
}
