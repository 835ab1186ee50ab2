// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Recording accept transport.

use propchange_ui::accept_client::AcceptCall;
use propchange_ui::{AcceptTransport, TransportError};

/// Transport that records calls and answers with a fixed outcome.
#[derive(Debug, Clone)]
pub struct RecordingTransport {
    /// Token handed out by `csrf_token`.
    pub token: String,
    /// Calls sent, in order.
    pub sent: Vec<AcceptCall>,
    /// When set, `send` answers with this status.
    pub fail_status: Option<u16>,
}

impl RecordingTransport {
    /// Transport that accepts every call.
    pub fn new() -> Self {
        Self {
            token: "csrf-token".to_owned(),
            sent: Vec::new(),
            fail_status: None,
        }
    }

    /// Transport whose calls fail with `status`.
    pub fn failing(status: u16) -> Self {
        Self {
            fail_status: Some(status),
            ..Self::new()
        }
    }
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl AcceptTransport for RecordingTransport {
    fn csrf_token(&mut self) -> Result<String, TransportError> {
        Ok(self.token.clone())
    }

    fn send(&mut self, call: &AcceptCall) -> Result<(), TransportError> {
        self.sent.push(call.clone());
        match self.fail_status {
            Some(status) => Err(TransportError::Status(status)),
            None => Ok(()),
        }
    }
}
