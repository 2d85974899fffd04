//! Discovery window and iterator implementation.
//!
//! One M-SEARCH goes out when the iterator is created; the iterator then
//! yields every qualifying response until the window closes. Devices answer
//! after their own MX-jittered delay, so the window is bounded by time and
//! never by a reply count.

use std::time::{Duration, Instant};

use crate::error::Result;
use crate::ssdp::{parse_root_device, SsdpClient};
use crate::DiscoveredNode;

/// Raw SSDP datagrams received during one discovery window.
pub(crate) struct DatagramWindow {
    ssdp_client: Option<SsdpClient>,
    deadline: Instant,
}

impl DatagramWindow {
    /// Send the M-SEARCH and open a window of `window` length
    pub fn open(window: Duration) -> Result<Self> {
        let ssdp_client = SsdpClient::new()?;
        ssdp_client.search()?;

        Ok(Self {
            ssdp_client: Some(ssdp_client),
            deadline: Instant::now() + window,
        })
    }

    fn closed() -> Self {
        Self {
            ssdp_client: None,
            deadline: Instant::now(),
        }
    }
}

impl Iterator for DatagramWindow {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let client = self.ssdp_client.as_mut()?;
        let datagram = client.recv_until(self.deadline);
        if datagram.is_none() {
            // Window over: release the socket now rather than on drop
            self.ssdp_client = None;
        }
        datagram
    }
}

/// Iterator over root devices answering during one discovery window.
///
/// The same device may be yielded more than once if it answers repeatedly.
pub struct DiscoveryIterator {
    datagrams: DatagramWindow,
}

impl DiscoveryIterator {
    /// Send the M-SEARCH and open a window of `window` length
    pub fn new(window: Duration) -> Result<Self> {
        Ok(Self {
            datagrams: DatagramWindow::open(window)?,
        })
    }

    /// An iterator that yields nothing
    pub(crate) fn empty() -> Self {
        Self {
            datagrams: DatagramWindow::closed(),
        }
    }
}

impl Iterator for DiscoveryIterator {
    type Item = DiscoveredNode;

    fn next(&mut self) -> Option<Self::Item> {
        self.datagrams.by_ref().find_map(|datagram| {
            let node = parse_root_device(&datagram)?;
            tracing::debug!("WEMO detected: {} at {}", node.udn, node.location);
            Some(node)
        })
    }
}
