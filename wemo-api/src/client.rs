use std::sync::Arc;

use soap_client::{SoapClient, SoapTransport};
use wemo_parser::{BinaryState, DeviceStatusList, EndDevices};

use crate::operation::envelope;
use crate::operations::{
    DeviceStatusCommand, GetBinaryStateOperation, GetDeviceStatusOperation, GetEndDevicesOperation,
    GetFriendlyNameOperation, SetBinaryStateOperation, SetDeviceStatusOperation,
    SetDeviceStatusResponse,
};
use crate::WemoOperation;

/// Executes WEMO operations against devices
///
/// Every call goes out exactly once with the transport's short timeout.
/// Failures surface as the operation's "no answer" response
/// ([`BinaryState::Missing`], an empty [`DeviceStatusList`], ...), never as
/// an error.
///
/// ```rust,no_run
/// use wemo_api::WemoClient;
///
/// let client = WemoClient::new();
/// let state = client.get_binary_state("http://10.0.0.5:49153");
/// println!("{:?}", state);
/// ```
#[derive(Clone)]
pub struct WemoClient {
    transport: Arc<dyn SoapTransport>,
}

impl WemoClient {
    /// Client backed by a [`SoapClient`] with the default timeout
    pub fn new() -> Self {
        Self::with_transport(Arc::new(SoapClient::new()))
    }

    /// Client backed by any transport (custom timeouts, test doubles)
    pub fn with_transport(transport: Arc<dyn SoapTransport>) -> Self {
        Self { transport }
    }

    /// Execute an operation against the device at `location`
    pub fn execute<Op: WemoOperation>(
        &self,
        location: &str,
        request: &Op::Request,
    ) -> Op::Response {
        let service = Op::SERVICE;
        let body = envelope(service, Op::ACTION, &Op::build_payload(request));

        let response = self.transport.post(
            &service.control_url(location),
            &service.soap_action(Op::ACTION),
            &body,
        );
        tracing::debug!(
            "{} {}#{} -> {} bytes",
            location,
            service.name(),
            Op::ACTION,
            response.len()
        );
        tracing::trace!("{} response: {}", Op::ACTION, response);

        Op::parse_response(&response)
    }

    pub fn get_binary_state(&self, location: &str) -> BinaryState {
        self.execute::<GetBinaryStateOperation>(location, &())
    }

    pub fn set_binary_state(&self, location: &str, on: bool) -> BinaryState {
        self.execute::<SetBinaryStateOperation>(location, &on)
    }

    pub fn get_friendly_name(&self, location: &str) -> Option<String> {
        self.execute::<GetFriendlyNameOperation>(location, &())
    }

    pub fn get_end_devices(&self, location: &str, udn: &str) -> EndDevices {
        self.execute::<GetEndDevicesOperation>(location, &udn.to_string())
    }

    pub fn get_device_status(&self, location: &str, device_ids: &[String]) -> DeviceStatusList {
        self.execute::<GetDeviceStatusOperation>(location, &device_ids.to_vec())
    }

    pub fn set_device_status(
        &self,
        location: &str,
        command: &DeviceStatusCommand,
    ) -> SetDeviceStatusResponse {
        self.execute::<SetDeviceStatusOperation>(location, command)
    }
}

impl Default for WemoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WemoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WemoClient").finish_non_exhaustive()
    }
}
