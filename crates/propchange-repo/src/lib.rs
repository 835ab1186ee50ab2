// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Server side of the property-change tracker.
//!
//! The content repository, node-type schema and persistence layer are
//! external collaborators reached through the ports in [`schema`] and
//! [`store`]. On top of those ports this crate provides:
//!
//! - [`backfill`]: seeds an initial accepted-state snapshot for existing
//!   content so a fresh deployment does not flag every property as changed.
//! - [`accept`]: folds a property's current value into a node's snapshot.
//! - [`plugin`]: the `repair` sub-command wrapper with skip/only selection.
//! - [`memory`]: an in-process content store used by the CLI and tests.

pub mod accept;
pub mod backfill;
pub mod error;
pub mod memory;
pub mod node;
pub mod plugin;
pub mod schema;
pub mod store;

pub use accept::{accept_property, AcceptService};
pub use backfill::{Backfill, BackfillReport, BackfillRequest};
pub use error::{RepairError, StoreError};
pub use memory::MemoryContentStore;
pub use node::{ContextPath, DimensionCheck, DimensionValues, Node, NodeRecord, RowKey};
pub use plugin::{PropertyChangesRepair, RepairOptions, SUB_COMMAND};
pub use schema::{NodeTypeDef, NodeTypeRegistry, NodeTypeSchema, PropertyDef};
pub use store::{ContentStore, NodeQuery, Persistence};
