// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! JSON bodies of the accept-property endpoint.

use serde::{Deserialize, Serialize};

use crate::snapshot::Snapshot;

/// Header carrying the anti-forgery token on accept requests.
pub const CSRF_HEADER: &str = "X-Flow-Csrftoken";

/// `POST` body sent when an editor accepts a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptRequest {
    /// Context path of the node.
    pub node: String,
    /// Property whose current value becomes the accepted value.
    pub property_name: String,
}

/// Response of the accept endpoint. Clients only use it as a completion signal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AcceptResponse {
    /// Snapshot after the accept.
    pub value: Snapshot,
}
