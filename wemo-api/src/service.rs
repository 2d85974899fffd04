/// The WEMO UPnP services this crate talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    /// basicevent - on/off state and naming of plain switches
    BasicEvent,

    /// bridge - end devices and groups behind a WEMO Link
    Bridge,
}

/// Endpoint and service URI for a UPnP service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
    /// HTTP control path, relative to the device location
    pub endpoint: &'static str,

    /// UPnP service URI used in the envelope and SOAPACTION header
    pub service_uri: &'static str,
}

impl Service {
    pub fn name(&self) -> &'static str {
        match self {
            Service::BasicEvent => "basicevent",
            Service::Bridge => "bridge",
        }
    }

    pub fn info(&self) -> ServiceInfo {
        match self {
            Service::BasicEvent => ServiceInfo {
                endpoint: "upnp/control/basicevent1",
                service_uri: "urn:Belkin:service:basicevent:1",
            },
            Service::Bridge => ServiceInfo {
                endpoint: "upnp/control/bridge1",
                service_uri: "urn:Belkin:service:bridge:1",
            },
        }
    }

    /// Full control URL for a device location such as `http://10.0.0.5:49153`
    pub fn control_url(&self, location: &str) -> String {
        format!("{}/{}", location.trim_end_matches('/'), self.info().endpoint)
    }

    /// SOAPACTION value (unquoted) for `action`
    pub fn soap_action(&self, action: &str) -> String {
        format!("{}#{}", self.info().service_uri, action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_urls() {
        assert_eq!(
            Service::BasicEvent.control_url("http://10.0.0.5:49153"),
            "http://10.0.0.5:49153/upnp/control/basicevent1"
        );
        assert_eq!(
            Service::Bridge.control_url("http://10.0.0.9:49154/"),
            "http://10.0.0.9:49154/upnp/control/bridge1"
        );
    }

    #[test]
    fn test_service_names_match_control_paths() {
        for service in [Service::BasicEvent, Service::Bridge] {
            assert_eq!(service.info().endpoint, format!("upnp/control/{}1", service.name()));
            assert!(service.info().service_uri.contains(service.name()));
        }
    }

    #[test]
    fn test_soap_actions() {
        assert_eq!(
            Service::Bridge.soap_action("GetEndDevices"),
            "urn:Belkin:service:bridge:1#GetEndDevices"
        );
        assert_eq!(
            Service::BasicEvent.soap_action("SetBinaryState"),
            "urn:Belkin:service:basicevent:1#SetBinaryState"
        );
    }
}
