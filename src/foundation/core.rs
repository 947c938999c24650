use std::collections::BTreeMap;

/// Monotonic frame timestamp in milliseconds, as delivered by the display refresh.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct Timestamp(pub f64);

impl Timestamp {
    /// Milliseconds elapsed since `earlier`, clamped at zero.
    pub fn since(self, earlier: Timestamp) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }

    /// Shift forward by `ms` milliseconds.
    pub fn after_ms(self, ms: f64) -> Self {
        Self(self.0 + ms)
    }
}

/// Resolved property values keyed by property name. A `null` entry clears the property.
pub type PropertyMap = BTreeMap<String, serde_json::Value>;

/// Removal marker used inside committed trees.
pub const REMOVED: serde_json::Value = serde_json::Value::Null;

/// Identifies one rendered view a binding commits to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ViewDescriptor {
    /// Host-assigned view tag.
    pub tag: u32,
    /// Host component name (e.g. `"View"`).
    pub name: String,
}

impl ViewDescriptor {
    /// Create a descriptor.
    pub fn new(tag: u32, name: impl Into<String>) -> Self {
        Self {
            tag,
            name: name.into(),
        }
    }
}

/// Opaque reference to a mounted view instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewRef(pub u64);

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
