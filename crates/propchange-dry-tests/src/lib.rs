// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for the property-change crates.
#![forbid(unsafe_code)]
//!
//! # Modules
//!
//! - [`config`] - In-memory config store fake for testing without filesystem
//! - [`content`] - Node-type and node-row builders over the in-memory store
//! - [`frame`] - Fake content-frame elements carrying marker attributes
//! - [`render`] - Recording affordance renderer and static label sources
//! - [`transport`] - Recording accept transport with failure injection

pub mod config;
pub mod content;
pub mod frame;
pub mod render;
pub mod transport;

pub use config::InMemoryConfigStore;
pub use content::{node_type, ContentFixture, FlakyPersistence, RecordBuilder};
pub use frame::{FakeElement, MarkerBuilder};
pub use render::{labels, RecordingRenderer, StaticLabels};
pub use transport::RecordingTransport;
