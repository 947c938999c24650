use crate::animation::node::{AnimationNode, Completions, StyleTree};
use crate::animation::walker::{Prior, interrupt, snapshot};
use crate::foundation::shared::SharedValue;
use crate::style::diff::is_animated;
use serde_json::Value;
use std::collections::BTreeMap;

/// What was last committed for one property.
#[derive(Clone, Debug)]
pub enum LastValue {
    /// Plain static value.
    Plain(Value),
    /// Bound holder; its live value counts as the committed one.
    Bound(SharedValue<Value>),
    /// The property was animated; this is its value at the time it was prepared.
    Animated(Value),
}

impl LastValue {
    /// View as the seed source for [`crate::animation::walker::prepare`].
    pub fn as_prior(&self) -> Prior<'_> {
        match self {
            Self::Plain(v) => Prior::Plain(v),
            Self::Bound(h) => Prior::Bound(h),
            Self::Animated(v) => Prior::Animated(v),
        }
    }

    /// Plain value, reading bound holders.
    pub fn resolved(&self) -> Value {
        match self {
            Self::Plain(v) | Self::Animated(v) => v.clone(),
            Self::Bound(h) => h.get(),
        }
    }
}

/// Committed values per property name.
pub type LastValues = BTreeMap<String, LastValue>;

/// Record `tree` the way it is kept in [`AnimatedState::last`].
pub fn snapshot_tree(tree: &StyleTree) -> LastValues {
    tree.iter()
        .map(|(k, node)| {
            let v = snapshot(node);
            let entry = if is_animated(node) {
                LastValue::Animated(v)
            } else {
                LastValue::Plain(v)
            };
            (k.clone(), entry)
        })
        .collect()
}

/// Persistent per-binding animation state.
///
/// Finished entries never linger in `animations`: each tick folds them into `last`. At most one
/// frame continuation runs per state, guarded by `running`.
#[derive(Debug, Default)]
pub struct AnimatedState {
    pub(crate) last: LastValues,
    pub(crate) animations: BTreeMap<String, AnimationNode>,
    pub(crate) running: bool,
    pub(crate) cancelled: bool,
}

impl AnimatedState {
    /// Empty state for a new binding.
    pub fn new() -> Self {
        Self::default()
    }

    /// State whose first animations seed from `initial` (e.g. values bound to holders).
    pub fn with_initial(initial: LastValues) -> Self {
        Self {
            last: initial,
            ..Self::default()
        }
    }

    /// Last committed values.
    pub fn last(&self) -> &LastValues {
        &self.last
    }

    /// In-flight animations by property name.
    pub fn animations(&self) -> &BTreeMap<String, AnimationNode> {
        &self.animations
    }

    /// Whether a frame continuation is scheduled or running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the next continuation will stop instead of stepping.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Stop the loop at its next tick boundary and drop every animation.
    ///
    /// Returns the interrupted callbacks; run them once the state is no longer borrowed.
    pub fn cancel(&mut self) -> Completions {
        self.cancelled = true;
        let mut fired = Completions::new();
        for node in self.animations.values_mut() {
            interrupt(node, &mut fired);
        }
        self.animations.clear();
        fired
    }

    /// Merge `tree` into `last`, overwriting by key.
    pub(crate) fn remember(&mut self, tree: &StyleTree) {
        self.last.extend(snapshot_tree(tree));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/updater/state.rs"]
mod tests;
