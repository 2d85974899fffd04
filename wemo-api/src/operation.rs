//! Operation framework: every WEMO SOAP action is a type implementing
//! [`WemoOperation`], pairing its payload builder with its response parser.

use crate::service::Service;

/// A single UPnP SOAP action
pub trait WemoOperation {
    /// Typed request data
    type Request;

    /// Typed response; must be able to represent "no answer"
    type Response;

    /// The UPnP service this action belongs to
    const SERVICE: Service;

    /// SOAP action name
    const ACTION: &'static str;

    /// XML placed inside `<u:Action>` (without the envelope)
    fn build_payload(request: &Self::Request) -> String;

    /// Interpret a raw response body. An empty body means the transport failed.
    fn parse_response(body: &str) -> Self::Response;
}

/// Wrap an action payload in the SOAP envelope WEMO firmware accepts
pub fn envelope(service: Service, action: &str, payload: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="utf-8"?>"#,
            r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/">"#,
            r#"<s:Body><u:{action} xmlns:u="{service_uri}">{payload}</u:{action}></s:Body>"#,
            r#"</s:Envelope>"#,
        ),
        action = action,
        service_uri = service.info().service_uri,
        payload = payload,
    )
}
