use crate::animation::node::{AnimationNode, Composite, StyleTree};
use crate::animation::walker::snapshot;
use crate::foundation::core::{PropertyMap, REMOVED};
use crate::foundation::error::{RestyleError, RestyleResult};
use crate::updater::state::{LastValue, LastValues};
use serde_json::Value;

/// Whether `node` needs the frame loop.
///
/// Sequences count as animated when any element's first member is a Terminal (the transform-list
/// shape `[{ "translateX": <anim> }]`); maps when any child is animated. Map elements keep their
/// keys sorted, so "first member" is the lexicographically smallest key, not the one declared
/// first: `[{ "scale": 1, "rotate": <anim> }]` is animated through `rotate`.
pub fn is_animated(node: &AnimationNode) -> bool {
    match node {
        AnimationNode::Static(_) => false,
        AnimationNode::Terminal(_) => true,
        AnimationNode::Composite(Composite::Seq(items)) => items.iter().any(first_member_animates),
        AnimationNode::Composite(Composite::Map(map)) => map.values().any(is_animated),
    }
}

fn first_member_animates(item: &AnimationNode) -> bool {
    let first = match item {
        AnimationNode::Terminal(_) => return true,
        AnimationNode::Composite(Composite::Map(m)) => m.values().next(),
        AnimationNode::Composite(Composite::Seq(v)) => v.first(),
        AnimationNode::Static(_) => None,
    };
    matches!(first, Some(AnimationNode::Terminal(_)))
}

/// Check producer output and turn it into a [`StyleTree`].
///
/// `None` and `null` are an empty tree; a static JSON object is lifted into static leaves.
/// Sequences are rejected because they cannot be merged key-wise against per-instance overrides.
pub fn validate(root: Option<AnimationNode>) -> RestyleResult<StyleTree> {
    match root {
        None | Some(AnimationNode::Static(Value::Null)) => Ok(StyleTree::new()),
        Some(AnimationNode::Composite(Composite::Map(map))) => Ok(map),
        Some(AnimationNode::Static(Value::Object(map))) => Ok(map
            .into_iter()
            .map(|(k, v)| (k, AnimationNode::Static(v)))
            .collect()),
        Some(AnimationNode::Composite(Composite::Seq(_)))
        | Some(AnimationNode::Static(Value::Array(_))) => Err(RestyleError::shape(
            "style producer returned a sequence; return a property map instead",
        )),
        Some(AnimationNode::Terminal(_)) => Err(RestyleError::shape(
            "style producer returned a bare animation; wrap it in a property map",
        )),
        Some(AnimationNode::Static(other)) => Err(RestyleError::shape(format!(
            "style producer must return a property map, got {}",
            kind_name(&other)
        ))),
    }
}

fn kind_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Minimal update turning `old` into the static part of `new`.
///
/// Keys dropped from `new` map to the removal marker; animated keys of `new` are left to the
/// frame loop; everything else is included only when it changed. Keys that were animated in
/// `old` never compare equal, since the view may show any intermediate value.
pub fn diff(old: &LastValues, new: &StyleTree) -> PropertyMap {
    let mut out = PropertyMap::new();
    for key in old.keys() {
        if !new.contains_key(key) {
            out.insert(key.clone(), REMOVED);
        }
    }
    for (key, node) in new {
        if is_animated(node) {
            continue;
        }
        let value = snapshot(node);
        let unchanged = match old.get(key) {
            Some(LastValue::Plain(prev)) => structurally_equal(prev, &value),
            Some(LastValue::Bound(holder)) => structurally_equal(&holder.get(), &value),
            Some(LastValue::Animated(_)) | None => false,
        };
        if !unchanged {
            out.insert(key.clone(), value);
        }
    }
    out
}

/// Resolved values of the non-animated keys of `tree`.
pub fn static_subset(tree: &StyleTree) -> PropertyMap {
    tree.iter()
        .filter(|(_, node)| !is_animated(node))
        .map(|(k, node)| (k.clone(), snapshot(node)))
        .collect()
}

/// Resolved values of the non-animated keys of a previous commit.
pub fn last_static_subset(last: &LastValues) -> PropertyMap {
    last.iter()
        .filter_map(|(k, v)| match v {
            LastValue::Plain(p) => Some((k.clone(), p.clone())),
            LastValue::Bound(h) => Some((k.clone(), h.get())),
            LastValue::Animated(_) => None,
        })
        .collect()
}

/// Deep equality where numbers compare by value (`1` equals `1.0`), sequences by position and
/// maps by key set plus values.
pub fn structurally_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| structurally_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| structurally_equal(x, y)))
        }
        _ => a == b,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/diff.rs"]
mod tests;
