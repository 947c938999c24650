//! Recursive operations over [`AnimationNode`] trees.
//!
//! All walks tolerate shape drift between the current tree and the previous one: a key, index or
//! variant with no counterpart simply resolves to "absent".

use crate::animation::node::{AnimationNode, Completions, Composite, Terminal};
use crate::foundation::core::Timestamp;
use crate::foundation::shared::SharedValue;
use serde_json::Value;

/// What the previous committed value for a path looked like.
#[derive(Clone, Copy, Debug)]
pub enum Prior<'a> {
    /// Nothing was committed at this path.
    Absent,
    /// A plain static value.
    Plain(&'a Value),
    /// A bound holder; its live value is the seed.
    Bound(&'a SharedValue<Value>),
    /// The path was animated; this is the declared value it had when prepared.
    Animated(&'a Value),
}

impl<'a> Prior<'a> {
    fn key(self, key: &str) -> Prior<'a> {
        match self {
            Self::Plain(Value::Object(m)) => m.get(key).map_or(Self::Absent, Self::Plain),
            Self::Animated(Value::Object(m)) => m.get(key).map_or(Self::Absent, Self::Animated),
            _ => Self::Absent,
        }
    }

    fn index(self, idx: usize) -> Prior<'a> {
        match self {
            Self::Plain(Value::Array(v)) => v.get(idx).map_or(Self::Absent, Self::Plain),
            Self::Animated(Value::Array(v)) => v.get(idx).map_or(Self::Absent, Self::Animated),
            _ => Self::Absent,
        }
    }
}

/// Initialize the start state of every Terminal in `node`.
///
/// `previous` is the in-flight node this one replaces; `prior` is the last committed value at the
/// same path. A running animation that gets replaced hands over its live `current`, so the new
/// animation continues from where the old one was instead of its original start value.
pub fn prepare(
    node: &mut AnimationNode,
    previous: Option<&AnimationNode>,
    prior: Prior<'_>,
    now: Timestamp,
) {
    match node {
        AnimationNode::Static(_) => {}
        AnimationNode::Terminal(t) => {
            let prev = previous.and_then(AnimationNode::as_terminal);
            let seed = resolve_seed(t, prev, prior);
            t.start(seed, now, prev);
        }
        AnimationNode::Composite(children) => {
            let held;
            let prior = match prior {
                Prior::Bound(h) => {
                    held = h.get();
                    Prior::Plain(&held)
                }
                other => other,
            };
            match children {
                Composite::Map(map) => {
                    for (key, child) in map.iter_mut() {
                        let prev_child = match previous {
                            Some(AnimationNode::Composite(Composite::Map(m))) => m.get(key),
                            _ => None,
                        };
                        prepare(child, prev_child, prior.key(key), now);
                    }
                }
                Composite::Seq(items) => {
                    for (idx, child) in items.iter_mut().enumerate() {
                        let prev_child = match previous {
                            Some(AnimationNode::Composite(Composite::Seq(v))) => v.get(idx),
                            _ => None,
                        };
                        prepare(child, prev_child, prior.index(idx), now);
                    }
                }
            }
        }
    }
}

fn resolve_seed(node: &Terminal, previous: Option<&Terminal>, prior: Prior<'_>) -> Value {
    match prior {
        Prior::Bound(h) => h.get(),
        Prior::Animated(declared) => previous
            .map(|p| p.current.clone())
            .unwrap_or_else(|| declared.clone()),
        Prior::Plain(v) => v.clone(),
        Prior::Absent => node.current.clone(),
    }
}

/// Advance every Terminal in `node` to `now`.
///
/// Returns whether the whole subtree finished, plus a value tree of the same shape. Callbacks of
/// Terminals finishing on this frame land in `fired`. When `active` is false nothing advances:
/// the subtree reports finished with its frozen values and no callback is collected.
pub fn step(
    node: &mut AnimationNode,
    now: Timestamp,
    active: bool,
    fired: &mut Completions,
) -> (bool, Value) {
    if !active {
        return (true, snapshot(node));
    }
    match node {
        AnimationNode::Static(v) => (true, v.clone()),
        AnimationNode::Terminal(t) => step_terminal(t, now, fired),
        AnimationNode::Composite(Composite::Map(map)) => {
            let mut finished = true;
            let mut out = serde_json::Map::with_capacity(map.len());
            for (key, child) in map.iter_mut() {
                let (done, v) = step(child, now, true, fired);
                finished &= done;
                out.insert(key.clone(), v);
            }
            (finished, Value::Object(out))
        }
        AnimationNode::Composite(Composite::Seq(items)) => {
            let mut finished = true;
            let mut out = Vec::with_capacity(items.len());
            for child in items.iter_mut() {
                let (done, v) = step(child, now, true, fired);
                finished &= done;
                out.push(v);
            }
            (finished, Value::Array(out))
        }
    }
}

fn step_terminal(t: &mut Terminal, now: Timestamp, fired: &mut Completions) -> (bool, Value) {
    if t.finished {
        return (true, t.current.clone());
    }
    // Never prepared: start from the declared value.
    let declared = t.current.clone();
    t.start(declared, now, None);

    let done = t.behavior.on_frame(&mut t.current, now);
    t.timestamp = now;
    if done {
        t.finished = true;
        t.complete(true, fired);
    }
    (done, t.current.clone())
}

/// Collect a `false` completion for every unfinished Terminal in `node`.
pub fn interrupt(node: &mut AnimationNode, fired: &mut Completions) {
    match node {
        AnimationNode::Static(_) => {}
        AnimationNode::Terminal(t) => {
            if !t.finished {
                t.complete(false, fired);
            }
        }
        AnimationNode::Composite(Composite::Map(map)) => {
            map.values_mut().for_each(|child| interrupt(child, fired))
        }
        AnimationNode::Composite(Composite::Seq(items)) => {
            items.iter_mut().for_each(|child| interrupt(child, fired))
        }
    }
}

/// Resolve `node` to a plain value, reading `current` for Terminals.
pub fn snapshot(node: &AnimationNode) -> Value {
    match node {
        AnimationNode::Static(v) => v.clone(),
        AnimationNode::Terminal(t) => t.current.clone(),
        AnimationNode::Composite(Composite::Map(map)) => Value::Object(
            map.iter()
                .map(|(k, child)| (k.clone(), snapshot(child)))
                .collect(),
        ),
        AnimationNode::Composite(Composite::Seq(items)) => {
            Value::Array(items.iter().map(snapshot).collect())
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/walker.rs"]
mod tests;
