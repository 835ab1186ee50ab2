// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Client half of the accept-property endpoint.

use propchange_core::wire::{AcceptRequest, CSRF_HEADER};

use crate::error::TransportError;

/// A fully prepared accept call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptCall {
    /// Endpoint URI.
    pub uri: String,
    /// HTTP method; always `POST`.
    pub method: &'static str,
    /// Request headers.
    pub headers: Vec<(&'static str, String)>,
    /// Decoded body, for transports that serialize themselves.
    pub request: AcceptRequest,
    /// JSON body.
    pub body: String,
}

impl AcceptCall {
    /// Build the call for `request`, carrying `csrf_token`.
    pub fn new(uri: impl Into<String>, request: AcceptRequest, csrf_token: String) -> Self {
        let body = serde_json::json!({
            "node": request.node,
            "propertyName": request.property_name,
        })
        .to_string();
        Self {
            uri: uri.into(),
            method: "POST",
            headers: vec![
                (CSRF_HEADER, csrf_token),
                ("Content-Type", "application/json".to_owned()),
            ],
            request,
            body,
        }
    }

    /// Value of header `name`.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Transport port for accept calls. Credentials are included by the host.
pub trait AcceptTransport {
    /// Fetch a fresh anti-forgery token.
    fn csrf_token(&mut self) -> Result<String, TransportError>;

    /// Send `call`; `Ok` once the server completed the request.
    fn send(&mut self, call: &AcceptCall) -> Result<(), TransportError>;
}
