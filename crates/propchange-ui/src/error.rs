// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Client-side error types.

use thiserror::Error;

/// A marker element that cannot be registered.
#[derive(Debug, Error)]
pub enum MarkerError {
    /// A required data attribute is absent.
    #[error("missing attribute {0}")]
    MissingAttribute(&'static str),
    /// A JSON-valued attribute does not parse into the expected shape.
    #[error("malformed attribute {attribute}: {source}")]
    MalformedAttribute {
        /// Attribute name.
        attribute: &'static str,
        /// Parser error.
        source: serde_json::Error,
    },
}

/// Failure reported by an accept transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server answered with a non-success status.
    #[error("server responded with status {0}")]
    Status(u16),
}

/// Failure of an accept click.
#[derive(Debug, Error)]
pub enum AcceptError {
    /// The element is not bound in the current registry.
    #[error("element {0} is not registered")]
    UnknownElement(u64),
    /// The element carries no endpoint URI.
    #[error("element {0} has no accept endpoint")]
    MissingEndpoint(u64),
    /// The transport failed; the affordance stays.
    #[error(transparent)]
    Transport(#[from] TransportError),
}
