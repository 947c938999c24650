use crate::animation::node::Completions;
use crate::animation::walker::{Prior, interrupt, prepare, snapshot, step};
use crate::binding::producer::Producer;
use crate::foundation::core::{PropertyMap, Timestamp, ViewDescriptor, ViewRef};
use crate::foundation::error::RestyleResult;
use crate::foundation::shared::SharedValue;
use crate::style::color::ColorNormalizer;
use crate::style::diff::{is_animated, validate};
use crate::updater::scheduler::FrameScheduler;
use crate::updater::sink::CommitSink;
use crate::updater::state::{AnimatedState, LastValue};
use crate::updater::strategy::{CommitStrategy, Committer};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace};

/// Collaborators of one [`StyleUpdater`].
pub struct UpdaterParts {
    pub state: Rc<RefCell<AnimatedState>>,
    pub producer: Producer,
    pub sink: Rc<dyn CommitSink>,
    pub scheduler: Rc<dyn FrameScheduler>,
    /// Animations advance only while this is `true`.
    pub active: SharedValue<bool>,
    pub strategy: CommitStrategy,
    pub targets: SharedValue<Vec<ViewDescriptor>>,
    pub views: Option<BTreeSet<ViewRef>>,
    pub colors: Option<Rc<dyn ColorNormalizer>>,
}

impl UpdaterParts {
    /// Parts with a fresh state, an active flag set to `true`, incremental commits, no targets
    /// and no color normalization.
    pub fn new(
        producer: Producer,
        sink: Rc<dyn CommitSink>,
        scheduler: Rc<dyn FrameScheduler>,
    ) -> Self {
        Self {
            state: Rc::new(RefCell::new(AnimatedState::new())),
            producer,
            sink,
            scheduler,
            active: SharedValue::new(true),
            strategy: CommitStrategy::Incremental,
            targets: SharedValue::new(Vec::new()),
            views: None,
            colors: None,
        }
    }
}

struct Inner {
    state: Rc<RefCell<AnimatedState>>,
    producer: Producer,
    scheduler: Rc<dyn FrameScheduler>,
    active: SharedValue<bool>,
    committer: Committer,
}

/// Merges producer output with in-flight animation state and drives the frame loop.
///
/// Completion callbacks run after the commit they belong to, with the state no longer borrowed,
/// so a callback may set a value that re-runs this updater.
#[derive(Clone)]
pub struct StyleUpdater {
    inner: Rc<Inner>,
}

impl fmt::Debug for StyleUpdater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleUpdater")
            .field("producer", &self.inner.producer.name())
            .field("strategy", &self.inner.committer.strategy)
            .finish_non_exhaustive()
    }
}

impl StyleUpdater {
    pub fn new(parts: UpdaterParts) -> Self {
        let committer = Committer {
            sink: parts.sink,
            targets: parts.targets,
            views: parts.views,
            colors: parts.colors,
            strategy: parts.strategy,
        };
        Self {
            inner: Rc::new(Inner {
                state: parts.state,
                producer: parts.producer,
                scheduler: parts.scheduler,
                active: parts.active,
                committer,
            }),
        }
    }

    pub fn state(&self) -> Rc<RefCell<AnimatedState>> {
        Rc::clone(&self.inner.state)
    }

    pub fn producer(&self) -> &Producer {
        &self.inner.producer
    }

    /// Stop the loop at its next tick boundary.
    pub fn cancel(&self) {
        let fired = self.inner.state.borrow_mut().cancel();
        fired.run();
    }

    /// Re-run the producer and reconcile its output with the animation state.
    ///
    /// `now` is the timestamp of the refresh this call runs in, if any. With one, the first frame
    /// of a new loop runs synchronously at that timestamp; without one, new animations start at
    /// [`FrameScheduler::now`] and the first frame is requested from the scheduler. In both cases
    /// the initial commit (static values plus animation seeds) lands before the first frame.
    #[tracing::instrument(skip(self), fields(producer = %self.inner.producer.name()))]
    pub fn update(&self, now: Option<Timestamp>) -> RestyleResult<()> {
        let inner = &self.inner;
        let mut tree = validate(inner.producer.produce())?;
        let start = now.unwrap_or_else(|| inner.scheduler.now());

        let mut fired = Completions::new();
        let (payload, schedule) = {
            let mut guard = inner.state.borrow_mut();
            let state = &mut *guard;

            let stale: Vec<String> = state
                .animations
                .keys()
                .filter(|k| !tree.get(*k).is_some_and(is_animated))
                .cloned()
                .collect();
            for key in stale {
                if let Some(mut node) = state.animations.remove(&key) {
                    interrupt(&mut node, &mut fired);
                }
            }

            let mut seeds = PropertyMap::new();
            for (key, node) in tree.iter_mut() {
                if !is_animated(node) {
                    continue;
                }
                let prior = state.last.get(key).map_or(Prior::Absent, LastValue::as_prior);
                prepare(node, state.animations.get(key), prior, start);
                seeds.insert(key.clone(), snapshot(node));
            }

            let outcome = if seeds.is_empty() {
                let payload = inner.committer.static_payload(&state.last, &tree);
                if state.running {
                    debug!("animations removed, stopping loop");
                }
                fired.append(state.cancel());
                (payload, false)
            } else {
                let payload = inner.committer.initial_payload(&state.last, &tree, seeds);
                state.cancelled = false;
                let schedule = !state.running;
                state.running = true;
                (payload, schedule)
            };

            state.remember(&tree);
            for (key, node) in tree {
                if !is_animated(&node) {
                    continue;
                }
                if let Some(mut replaced) = state.animations.insert(key, node) {
                    interrupt(&mut replaced, &mut fired);
                }
            }
            outcome
        };

        inner.committer.commit(payload);
        fired.run();

        if schedule {
            debug!(start = start.0, synchronous = now.is_some(), "animation loop started");
            match now {
                Some(ts) => run_frame(inner, ts),
                None => request_next(inner),
            }
        }
        Ok(())
    }
}

fn request_next(inner: &Rc<Inner>) {
    let next = Rc::clone(inner);
    inner
        .scheduler
        .request_frame(Box::new(move |ts| run_frame(&next, ts)));
}

fn run_frame(inner: &Rc<Inner>, ts: Timestamp) {
    let mut fired = Completions::new();
    let (updates, more) = {
        let mut guard = inner.state.borrow_mut();
        let state = &mut *guard;
        if state.cancelled {
            state.running = false;
            debug!("animation loop cancelled");
            return;
        }
        if !inner.active.get() {
            state.running = false;
            debug!(pending = state.animations.len(), "animation loop paused");
            return;
        }

        let AnimatedState {
            last, animations, ..
        } = &mut *state;
        let mut updates = PropertyMap::new();
        animations.retain(|key, node| {
            let (finished, value) = step(node, ts, true, &mut fired);
            if finished {
                last.insert(key.clone(), LastValue::Plain(value.clone()));
            }
            updates.insert(key.clone(), value);
            !finished
        });
        let more = !animations.is_empty();
        if !more {
            state.running = false;
        }
        (updates, more)
    };

    trace!(ts = ts.0, keys = updates.len(), more, "frame");
    inner.committer.commit(updates);
    fired.run();

    if more {
        request_next(inner);
    } else {
        debug!(ts = ts.0, "animation loop finished");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/updater/style_updater.rs"]
mod tests;
