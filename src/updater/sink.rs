use crate::foundation::core::{PropertyMap, ViewDescriptor, ViewRef};
use std::cell::RefCell;
use std::collections::BTreeSet;

/// View-commit layer contract.
///
/// `commit` applies a possibly partial property tree to the targeted views. It may be called
/// several times within one tick and must be idempotent under repeated identical input. A `null`
/// value clears the property.
pub trait CommitSink {
    fn commit(
        &self,
        targets: &[ViewDescriptor],
        props: &PropertyMap,
        views: Option<&BTreeSet<ViewRef>>,
    );
}

/// One recorded call to [`CommitSink::commit`].
#[derive(Clone, Debug, PartialEq)]
pub struct Commit {
    pub targets: Vec<ViewDescriptor>,
    pub props: PropertyMap,
    pub views: Option<BTreeSet<ViewRef>>,
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemoryCommitSink {
    commits: RefCell<Vec<Commit>>,
}

impl InMemoryCommitSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone out every commit so far, oldest first.
    pub fn commits(&self) -> Vec<Commit> {
        self.commits.borrow().clone()
    }

    /// Number of commits so far.
    pub fn len(&self) -> usize {
        self.commits.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drain the recorded commits.
    pub fn take(&self) -> Vec<Commit> {
        std::mem::take(&mut *self.commits.borrow_mut())
    }

    /// Property values a view would show after replaying every commit in order.
    pub fn applied(&self) -> PropertyMap {
        let mut out = PropertyMap::new();
        for c in self.commits.borrow().iter() {
            for (k, v) in &c.props {
                if v.is_null() {
                    out.remove(k);
                } else {
                    out.insert(k.clone(), v.clone());
                }
            }
        }
        out
    }
}

impl CommitSink for InMemoryCommitSink {
    fn commit(
        &self,
        targets: &[ViewDescriptor],
        props: &PropertyMap,
        views: Option<&BTreeSet<ViewRef>>,
    ) {
        self.commits.borrow_mut().push(Commit {
            targets: targets.to_vec(),
            props: props.clone(),
            views: views.cloned(),
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/updater/sink.rs"]
mod tests;
