// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared pieces of the property-change tracker.
//!
//! Both halves of the system (the server-side repair/accept path and the
//! client-side change detection) agree on one data contract: the accepted-state
//! snapshot stored as a JSON object in the `propertyChangeState` property of a
//! node. This crate owns that contract plus the small config service used by
//! operator tooling.

pub mod config;
pub mod prefs;
pub mod snapshot;
pub mod value;
pub mod wire;

pub use snapshot::{Snapshot, PROPERTY_CHANGE_STATE};
pub use value::{is_scalar, scalars_match, PropertyValue};
