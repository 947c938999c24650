use crate::binding::fingerprint::{DepValue, Fingerprint, equal, fingerprint};
use crate::binding::producer::Producer;
use crate::binding::runtime::{MapperId, MapperMetadata, MapperRuntime};
use crate::foundation::core::{PropertyMap, Timestamp, ViewDescriptor, ViewRef};
use crate::foundation::error::{RestyleError, RestyleResult};
use crate::foundation::shared::{SharedId, SharedValue};
use crate::style::color::{ColorNormalizer, HexColorNormalizer};
use crate::updater::scheduler::FrameScheduler;
use crate::updater::sink::CommitSink;
use crate::updater::state::{AnimatedState, LastValue, LastValues};
use crate::updater::strategy::{Adapter, CommitStrategy};
use crate::updater::style_updater::{StyleUpdater, UpdaterParts};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;
use tracing::debug;

/// Commit strategy selector for [`BindingOpts`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    Incremental,
    Deterministic,
}

/// Binding configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BindingOpts {
    pub strategy: StrategyKind,
    /// Normalize `#rrggbb`-style colors with [`HexColorNormalizer`].
    pub normalize_colors: bool,
    /// Initial value of the active flag.
    pub animations_active: bool,
}

impl Default for BindingOpts {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Incremental,
            normalize_colors: false,
            animations_active: true,
        }
    }
}

/// Result of [`StyleBinding::register`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindOutcome {
    /// First registration.
    Bound,
    /// Fingerprint unchanged; the existing state was kept.
    Reused,
    /// Fingerprint changed; the old state was cancelled and replaced.
    Rebound,
}

struct Registration {
    id: MapperId,
    fingerprint: Fingerprint,
    updater: StyleUpdater,
}

/// Lifecycle of one animated style attached to a set of views.
///
/// Owns the active flag and the view-descriptor holder. Each registration computes a dependency
/// fingerprint; an unchanged fingerprint keeps the running animation state, a changed one tears
/// it down and starts over.
pub struct StyleBinding {
    runtime: Rc<dyn MapperRuntime>,
    opts: BindingOpts,
    sink: Rc<dyn CommitSink>,
    scheduler: Rc<dyn FrameScheduler>,
    active: SharedValue<bool>,
    targets: SharedValue<Vec<ViewDescriptor>>,
    mirror: SharedValue<PropertyMap>,
    adapters: Vec<Adapter>,
    colors: Option<Rc<dyn ColorNormalizer>>,
    views: Option<BTreeSet<ViewRef>>,
    holders: LastValues,
    current: Option<Registration>,
}

impl std::fmt::Debug for StyleBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleBinding")
            .field("opts", &self.opts)
            .field("active", &self.active)
            .field("mapper", &self.mapper_id())
            .finish_non_exhaustive()
    }
}

impl StyleBinding {
    pub fn new(
        runtime: Rc<dyn MapperRuntime>,
        opts: BindingOpts,
        sink: Rc<dyn CommitSink>,
        scheduler: Rc<dyn FrameScheduler>,
    ) -> Self {
        let colors: Option<Rc<dyn ColorNormalizer>> = if opts.normalize_colors {
            Some(Rc::new(HexColorNormalizer))
        } else {
            None
        };
        Self {
            runtime,
            active: SharedValue::new(opts.animations_active),
            opts,
            sink,
            scheduler,
            targets: SharedValue::new(Vec::new()),
            mirror: SharedValue::new(PropertyMap::new()),
            adapters: Vec::new(),
            colors,
            views: None,
            holders: LastValues::new(),
            current: None,
        }
    }

    /// Append a post-processing step for deterministic commits.
    pub fn with_adapter(mut self, adapter: Adapter) -> Self {
        self.adapters.push(adapter);
        self
    }

    /// Replace the color normalizer.
    pub fn with_colors(mut self, colors: Rc<dyn ColorNormalizer>) -> Self {
        self.colors = Some(colors);
        self
    }

    /// Restrict commits to `views`.
    pub fn with_views(mut self, views: BTreeSet<ViewRef>) -> Self {
        self.views = Some(views);
        self
    }

    /// Seed animations of `key` from a bound holder instead of the last committed value.
    ///
    /// Applies to states created by later registrations.
    pub fn with_holder(mut self, key: impl Into<String>, holder: SharedValue<Value>) -> Self {
        self.holders.insert(key.into(), LastValue::Bound(holder));
        self
    }

    /// Animations advance only while this flag is `true`.
    pub fn active(&self) -> &SharedValue<bool> {
        &self.active
    }

    /// Views every commit is addressed to.
    pub fn view_targets(&self) -> &SharedValue<Vec<ViewDescriptor>> {
        &self.targets
    }

    /// Merged copy of every deterministic commit.
    pub fn mirror(&self) -> &SharedValue<PropertyMap> {
        &self.mirror
    }

    pub fn opts(&self) -> &BindingOpts {
        &self.opts
    }

    pub fn mapper_id(&self) -> Option<MapperId> {
        self.current.as_ref().map(|r| r.id)
    }

    pub fn fingerprint(&self) -> Option<&Fingerprint> {
        self.current.as_ref().map(|r| &r.fingerprint)
    }

    /// Animation state of the current registration.
    pub fn state(&self) -> Option<Rc<RefCell<AnimatedState>>> {
        self.current.as_ref().map(|r| r.updater.state())
    }

    /// Attach `producer`, reusing the current registration when its fingerprint is unchanged.
    ///
    /// A new registration runs the producer once before it is handed to the mapper runtime, so
    /// shape errors surface here.
    #[tracing::instrument(skip(self, producer, explicit, inputs), fields(name = %producer.name()))]
    pub fn register(
        &mut self,
        producer: Producer,
        explicit: Option<Vec<DepValue>>,
        inputs: Vec<SharedId>,
    ) -> RestyleResult<BindOutcome> {
        let fp = fingerprint(explicit, &[&producer]);
        if equal(self.fingerprint(), Some(&fp)) {
            debug!("fingerprint unchanged, keeping animation state");
            return Ok(BindOutcome::Reused);
        }

        let outcome = if self.current.is_some() {
            BindOutcome::Rebound
        } else {
            BindOutcome::Bound
        };
        self.teardown();

        let strategy = match self.opts.strategy {
            StrategyKind::Incremental => CommitStrategy::Incremental,
            StrategyKind::Deterministic => CommitStrategy::Deterministic {
                adapters: self.adapters.clone(),
                mirror: self.mirror.clone(),
            },
        };
        let metadata = MapperMetadata {
            name: producer.name().to_string(),
            caps: producer.caps(),
        };
        let updater = StyleUpdater::new(UpdaterParts {
            state: Rc::new(RefCell::new(AnimatedState::with_initial(
                self.holders.clone(),
            ))),
            producer,
            sink: Rc::clone(&self.sink),
            scheduler: Rc::clone(&self.scheduler),
            active: self.active.clone(),
            strategy,
            targets: self.targets.clone(),
            views: self.views.clone(),
            colors: self.colors.clone(),
        });
        updater.update(None)?;

        let mut inputs = inputs;
        inputs.push(self.active.id());
        let runner = updater.clone();
        let id = self.runtime.register(
            Box::new(move |now| runner.update(now)),
            inputs,
            vec![self.targets.id()],
            metadata,
        );
        debug!(mapper = id.0, ?outcome, "style binding registered");
        self.current = Some(Registration {
            id,
            fingerprint: fp,
            updater,
        });
        Ok(outcome)
    }

    /// Re-run the current registration outside the mapper runtime.
    pub fn refresh(&self, now: Option<Timestamp>) -> RestyleResult<()> {
        let reg = self
            .current
            .as_ref()
            .ok_or_else(|| RestyleError::binding("refresh on a binding with no registration"))?;
        reg.updater.update(now)
    }

    /// Unregister the mapper and cancel its animations.
    pub fn teardown(&mut self) {
        if let Some(reg) = self.current.take() {
            self.runtime.unregister(reg.id);
            reg.updater.cancel();
            debug!(mapper = reg.id.0, "style binding torn down");
        }
    }
}

impl Drop for StyleBinding {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/binding/style_binding.rs"]
mod tests;
