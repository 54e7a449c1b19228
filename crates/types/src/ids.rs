//! Newtype wrapper for field identifiers.
//!
//! A `FieldId` is the stable key of a field inside a layout and the correlation
//! token between a layout entry and the node that displays it on a render surface.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// An opaque, cheaply clonable field identifier.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(Arc<str>);

impl FieldId {
    /// Creates a new FieldId from a string
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this field ID
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for FieldId {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for FieldId {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}

impl AsRef<str> for FieldId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for FieldId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
