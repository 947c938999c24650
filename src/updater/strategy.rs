use crate::animation::node::StyleTree;
use crate::foundation::core::{PropertyMap, ViewDescriptor, ViewRef};
use crate::foundation::shared::SharedValue;
use crate::style::color::{ColorNormalizer, normalize_colors};
use crate::style::diff::{diff, is_animated, last_static_subset, static_subset};
use crate::updater::sink::CommitSink;
use crate::updater::state::LastValues;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

/// Post-processing step applied to every committed tree in deterministic mode.
pub type Adapter = Rc<dyn Fn(&mut PropertyMap)>;

/// How static values are shaped into commits.
#[derive(Clone)]
pub enum CommitStrategy {
    /// Commit the static subsets of the previous and new trees.
    Incremental,
    /// Commit minimal diffs, run `adapters` over every tree and merge every commit into `mirror`.
    Deterministic {
        adapters: Vec<Adapter>,
        mirror: SharedValue<PropertyMap>,
    },
}

impl fmt::Debug for CommitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incremental => f.write_str("Incremental"),
            Self::Deterministic { adapters, mirror } => f
                .debug_struct("Deterministic")
                .field("adapters", &adapters.len())
                .field("mirror", mirror)
                .finish(),
        }
    }
}

/// Everything needed to turn a property tree into a sink call.
#[derive(Clone)]
pub struct Committer {
    pub(crate) sink: Rc<dyn CommitSink>,
    pub(crate) targets: SharedValue<Vec<ViewDescriptor>>,
    pub(crate) views: Option<BTreeSet<ViewRef>>,
    pub(crate) colors: Option<Rc<dyn ColorNormalizer>>,
    pub(crate) strategy: CommitStrategy,
}

impl Committer {
    /// Commit made before the first continuation of a loop.
    ///
    /// `seeds` holds the start values of the animated keys, so they show up in the same commit as
    /// the static values.
    pub(crate) fn initial_payload(
        &self,
        last: &LastValues,
        tree: &StyleTree,
        seeds: PropertyMap,
    ) -> PropertyMap {
        let mut out = match self.strategy {
            CommitStrategy::Incremental => {
                let mut out: PropertyMap = last_static_subset(last)
                    .into_iter()
                    .filter(|(k, _)| !tree.get(k).is_some_and(is_animated))
                    .collect();
                out.extend(static_subset(tree));
                out
            }
            CommitStrategy::Deterministic { .. } => diff(last, tree),
        };
        out.extend(seeds);
        out
    }

    /// Commit for a tree with no animated keys.
    pub(crate) fn static_payload(&self, last: &LastValues, tree: &StyleTree) -> PropertyMap {
        match self.strategy {
            CommitStrategy::Incremental => static_subset(tree),
            CommitStrategy::Deterministic { .. } => diff(last, tree),
        }
    }

    /// Shape `props` and hand it to the sink. Empty trees are skipped.
    pub(crate) fn commit(&self, mut props: PropertyMap) {
        if props.is_empty() {
            return;
        }
        if let CommitStrategy::Deterministic { adapters, .. } = &self.strategy {
            for adapter in adapters {
                adapter(&mut props);
            }
        }
        if let Some(colors) = &self.colors {
            normalize_colors(&mut props, colors.as_ref());
        }
        if let CommitStrategy::Deterministic { mirror, .. } = &self.strategy {
            mirror.update(|m| {
                for (k, v) in &props {
                    if v.is_null() {
                        m.remove(k);
                    } else {
                        m.insert(k.clone(), v.clone());
                    }
                }
            });
        }
        let targets = self.targets.get();
        self.sink.commit(&targets, &props, self.views.as_ref());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/updater/strategy.rs"]
mod tests;
