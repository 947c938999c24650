use crate::foundation::core::Timestamp;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Producer output after shape validation: property name to node.
pub type StyleTree = BTreeMap<String, AnimationNode>;

/// Invoked once when a Terminal finishes (`true`) or is interrupted before finishing (`false`).
pub type CompletionCallback = Box<dyn FnOnce(bool)>;

/// Behaviour of a single animatable value.
///
/// Implementations own their private progress state; the shared `current` value lives on the
/// [`Terminal`] so walkers can read it without knowing the concrete animation.
pub trait FrameAnimation {
    /// Initialize from the resolved start value. Called exactly once per Terminal.
    ///
    /// `previous` is the Terminal this one replaces, if any, so followers can inherit motion.
    fn on_start(
        &mut self,
        current: &mut Value,
        seed: &Value,
        now: Timestamp,
        previous: Option<&Terminal>,
    );

    /// Advance to `now`, writing the new value into `current`. Returns `true` once finished.
    fn on_frame(&mut self, current: &mut Value, now: Timestamp) -> bool;

    /// Rate of change at the last frame, in units per second.
    fn velocity(&self) -> f64 {
        0.0
    }
}

/// One-shot start state of a Terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartPhase {
    /// `on_start` has not run yet.
    Pending,
    /// `on_start` ran; preparing again is a no-op.
    Started,
}

/// Leaf carrying per-frame stepping state.
pub struct Terminal {
    pub(crate) current: Value,
    pub(crate) behavior: Box<dyn FrameAnimation>,
    pub(crate) phase: StartPhase,
    pub(crate) finished: bool,
    pub(crate) timestamp: Timestamp,
    pub(crate) callback: Option<CompletionCallback>,
}

impl fmt::Debug for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Terminal")
            .field("current", &self.current)
            .field("phase", &self.phase)
            .field("finished", &self.finished)
            .field("timestamp", &self.timestamp)
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

impl Terminal {
    /// Wrap `behavior` with a declared initial value.
    pub fn new(initial: Value, behavior: impl FrameAnimation + 'static) -> Self {
        Self {
            current: initial,
            behavior: Box::new(behavior),
            phase: StartPhase::Pending,
            finished: false,
            timestamp: Timestamp::default(),
            callback: None,
        }
    }

    /// Build a Terminal from a pair of closures.
    pub fn from_fns<S, F>(initial: Value, on_start: S, on_frame: F) -> Self
    where
        S: FnMut(&mut Value, &Value, Timestamp, Option<&Terminal>) + 'static,
        F: FnMut(&mut Value, Timestamp) -> bool + 'static,
    {
        Self::new(initial, FnAnimation { on_start, on_frame })
    }

    /// Attach a completion callback.
    pub fn with_callback(mut self, callback: impl FnOnce(bool) + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    /// Latest value written by the behaviour.
    pub fn current(&self) -> &Value {
        &self.current
    }

    /// Whether the animation reported completion.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Start phase.
    pub fn phase(&self) -> StartPhase {
        self.phase
    }

    /// Timestamp of the last start or frame.
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Velocity reported by the behaviour.
    pub fn velocity(&self) -> f64 {
        self.behavior.velocity()
    }

    pub(crate) fn start(&mut self, seed: Value, now: Timestamp, previous: Option<&Terminal>) {
        if self.phase == StartPhase::Started {
            return;
        }
        self.behavior.on_start(&mut self.current, &seed, now, previous);
        self.timestamp = now;
        self.phase = StartPhase::Started;
    }

    /// Detach the callback, if still attached, into `fired`.
    pub(crate) fn complete(&mut self, finished: bool, fired: &mut Completions) {
        if let Some(cb) = self.callback.take() {
            fired.0.push((cb, finished));
        }
    }
}

/// Completion callbacks detached during a walk.
///
/// Walks run while the animation state is mutably borrowed, and a callback may set a watched
/// value that re-enters the updater. Callbacks are therefore collected here and run once the
/// borrow is released.
#[derive(Default)]
#[must_use = "collected callbacks only fire through `run`"]
pub struct Completions(Vec<(CompletionCallback, bool)>);

impl fmt::Debug for Completions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.0.iter().map(|(_, finished)| finished))
            .finish()
    }
}

impl Completions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Move every callback of `other` behind the ones already collected.
    pub fn append(&mut self, mut other: Completions) {
        self.0.append(&mut other.0);
    }

    /// Fire the callbacks in collection order.
    pub fn run(self) {
        for (cb, finished) in self.0 {
            cb(finished);
        }
    }
}

/// Closure-backed [`FrameAnimation`].
pub struct FnAnimation<S, F> {
    on_start: S,
    on_frame: F,
}

impl<S, F> FrameAnimation for FnAnimation<S, F>
where
    S: FnMut(&mut Value, &Value, Timestamp, Option<&Terminal>),
    F: FnMut(&mut Value, Timestamp) -> bool,
{
    fn on_start(
        &mut self,
        current: &mut Value,
        seed: &Value,
        now: Timestamp,
        previous: Option<&Terminal>,
    ) {
        (self.on_start)(current, seed, now, previous)
    }

    fn on_frame(&mut self, current: &mut Value, now: Timestamp) -> bool {
        (self.on_frame)(current, now)
    }
}

/// Branch mirroring the shape of a property map or list.
#[derive(Debug)]
pub enum Composite {
    /// Keyed children.
    Map(BTreeMap<String, AnimationNode>),
    /// Positional children.
    Seq(Vec<AnimationNode>),
}

/// Recursive property-tree node mixing static values, animations and nested branches.
#[derive(Debug)]
pub enum AnimationNode {
    /// Opaque leaf that never animates.
    Static(Value),
    /// Animated leaf.
    Terminal(Terminal),
    /// Nested map or sequence.
    Composite(Composite),
}

impl AnimationNode {
    /// Build a keyed composite.
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, AnimationNode)>) -> Self {
        Self::Composite(Composite::Map(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// Build a positional composite.
    pub fn seq(items: impl IntoIterator<Item = AnimationNode>) -> Self {
        Self::Composite(Composite::Seq(items.into_iter().collect()))
    }

    /// Borrow the Terminal, if this node is one.
    pub fn as_terminal(&self) -> Option<&Terminal> {
        match self {
            Self::Terminal(t) => Some(t),
            _ => None,
        }
    }
}

impl From<Value> for AnimationNode {
    fn from(v: Value) -> Self {
        Self::Static(v)
    }
}

impl From<Terminal> for AnimationNode {
    fn from(t: Terminal) -> Self {
        Self::Terminal(t)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/node.rs"]
mod tests;
