// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Marker elements rendered into the content frame.
//!
//! The page marks every element that wants change hints with a set of
//! `data-__property-change-*` attributes. This module reads them through the
//! [`MarkerElement`] port so the engine never touches a DOM directly.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;

use crate::error::MarkerError;

/// JSON array of observed property names.
pub const ATTR_OBSERVE: &str = "data-__property-change-observe";
/// JSON array of properties already known to differ at render time.
pub const ATTR_CHANGED: &str = "data-__property-change-changedproperties";
/// Context path of the observed node.
pub const ATTR_CONTEXT_PATH: &str = "data-__property-change-contextpath";
/// Node type of the observed node.
pub const ATTR_NODE_TYPE: &str = "data-__property-change-nodetype";
/// Optional JSON object `property -> [dependent properties]`.
pub const ATTR_NOTIFY: &str = "data-__property-change-notify";
/// Optional focus flag (`"true"`).
pub const ATTR_FOCUS: &str = "data-__property-change-focus";
/// Optional URI of the accept endpoint.
pub const ATTR_BASE_URI: &str = "data-__property-change-baseuri";

/// Host-assigned handle of a frame element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Read access to one element of the content frame.
pub trait MarkerElement {
    /// Stable handle of the element for later rendering calls.
    fn id(&self) -> ElementId;
    /// Value of attribute `name`, if present.
    fn attribute(&self, name: &str) -> Option<String>;
}

/// Parsed marker attributes of one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Element the marker was read from.
    pub element: ElementId,
    /// Observed property names (blank entries dropped).
    pub observed: Vec<String>,
    /// Properties already changed at render time (blank entries dropped).
    pub changed: Vec<String>,
    /// Context path of the node.
    pub context_path: String,
    /// Node type of the node.
    pub node_type: String,
    /// Observed property -> dependent properties to flag.
    pub notify: BTreeMap<String, Vec<String>>,
    /// Focus target when several bindings fire at once.
    pub focus: bool,
    /// Accept endpoint, when the page provides one.
    pub base_uri: Option<String>,
}

impl Marker {
    /// Read the marker attributes of `element`.
    pub fn parse<E: MarkerElement + ?Sized>(element: &E) -> Result<Self, MarkerError> {
        let observed: Vec<String> = json_attribute(element, ATTR_OBSERVE)?;
        let changed: Vec<String> = json_attribute(element, ATTR_CHANGED)?;
        let notify = match element.attribute(ATTR_NOTIFY) {
            Some(raw) => parse_json(ATTR_NOTIFY, &raw)?,
            None => BTreeMap::new(),
        };
        Ok(Self {
            element: element.id(),
            observed: drop_blank(observed),
            changed: drop_blank(changed),
            context_path: required(element, ATTR_CONTEXT_PATH)?,
            node_type: required(element, ATTR_NODE_TYPE)?,
            notify,
            focus: element.attribute(ATTR_FOCUS).as_deref() == Some("true"),
            base_uri: element.attribute(ATTR_BASE_URI),
        })
    }
}

fn required<E: MarkerElement + ?Sized>(element: &E, name: &'static str) -> Result<String, MarkerError> {
    element
        .attribute(name)
        .ok_or(MarkerError::MissingAttribute(name))
}

fn json_attribute<T, E>(element: &E, name: &'static str) -> Result<T, MarkerError>
where
    T: DeserializeOwned,
    E: MarkerElement + ?Sized,
{
    parse_json(name, &required(element, name)?)
}

fn parse_json<T: DeserializeOwned>(attribute: &'static str, raw: &str) -> Result<T, MarkerError> {
    serde_json::from_str(raw).map_err(|source| MarkerError::MalformedAttribute { attribute, source })
}

fn drop_blank(names: Vec<String>) -> Vec<String> {
    names.into_iter().filter(|s| !s.trim().is_empty()).collect()
}
