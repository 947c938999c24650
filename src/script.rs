use crate::animation::ease::Ease;
use crate::animation::node::{AnimationNode, Composite, StyleTree};
use crate::animation::spring::{SpringConfig, spring};
use crate::animation::timing::timing;
use crate::binding::producer::Producer;
use crate::binding::style_binding::BindingOpts;
use crate::foundation::error::{RestyleError, RestyleResult};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;

fn default_fps() -> u32 {
    60
}

/// A JSON style script: property specs plus the frame rate to play them at.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StyleScript {
    #[serde(default = "default_fps")]
    pub frames_per_second: u32,
    #[serde(default)]
    pub opts: BindingOpts,
    pub properties: BTreeMap<String, PropSpec>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimingSpec {
    pub to: Value,
    pub duration_ms: f64,
    #[serde(default)]
    pub ease: Ease,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpringSpec {
    pub to: f64,
    #[serde(flatten)]
    pub config: SpringConfig,
}

/// One property of a script.
///
/// An object with the single key `timing` or `spring` is an animation; anything else is a static
/// value.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub enum PropSpec {
    Timing(TimingSpec),
    Spring(SpringSpec),
    Value(Value),
}

impl TryFrom<Value> for PropSpec {
    type Error = serde_json::Error;

    fn try_from(v: Value) -> Result<Self, Self::Error> {
        let Value::Object(map) = &v else {
            return Ok(Self::Value(v));
        };
        if map.len() != 1 {
            return Ok(Self::Value(v));
        }
        match map.iter().next() {
            Some((k, inner)) if k == "timing" => {
                Ok(Self::Timing(serde_json::from_value(inner.clone())?))
            }
            Some((k, inner)) if k == "spring" => {
                Ok(Self::Spring(serde_json::from_value(inner.clone())?))
            }
            _ => Ok(Self::Value(v)),
        }
    }
}

impl From<PropSpec> for Value {
    fn from(p: PropSpec) -> Self {
        let wrap = |key: &str, inner: Value| {
            let mut m = serde_json::Map::new();
            m.insert(key.to_string(), inner);
            Value::Object(m)
        };
        match p {
            PropSpec::Timing(t) => wrap("timing", serde_json::to_value(t).unwrap_or(Value::Null)),
            PropSpec::Spring(s) => wrap("spring", serde_json::to_value(s).unwrap_or(Value::Null)),
            PropSpec::Value(v) => v,
        }
    }
}

impl PropSpec {
    pub fn is_animated(&self) -> bool {
        !matches!(self, Self::Value(_))
    }

    pub fn validate(&self, name: &str) -> RestyleResult<()> {
        match self {
            Self::Timing(t) => {
                if !t.duration_ms.is_finite() || t.duration_ms < 0.0 {
                    return Err(RestyleError::validation(format!(
                        "property '{name}': duration_ms must be finite and >= 0"
                    )));
                }
            }
            Self::Spring(s) => {
                let c = &s.config;
                if !s.to.is_finite() {
                    return Err(RestyleError::validation(format!(
                        "property '{name}': spring target must be finite"
                    )));
                }
                for (label, v) in [
                    ("stiffness", c.stiffness),
                    ("damping", c.damping),
                    ("mass", c.mass),
                ] {
                    if !(v.is_finite() && v > 0.0) {
                        return Err(RestyleError::validation(format!(
                            "property '{name}': spring {label} must be > 0"
                        )));
                    }
                }
            }
            Self::Value(_) => {}
        }
        Ok(())
    }

    /// Fresh node for one producer run.
    pub fn to_node(&self) -> AnimationNode {
        match self {
            Self::Timing(t) => AnimationNode::from(timing(t.to.clone(), t.duration_ms, t.ease)),
            Self::Spring(s) => AnimationNode::from(spring(s.to, s.config)),
            Self::Value(v) => AnimationNode::from(v.clone()),
        }
    }
}

impl StyleScript {
    pub fn from_json_str(s: &str) -> RestyleResult<Self> {
        let script: Self = serde_json::from_str(s)?;
        script.validate()?;
        Ok(script)
    }

    pub fn load(path: &Path) -> RestyleResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            RestyleError::Other(anyhow::Error::new(e).context(format!(
                "read style script '{}'",
                path.display()
            )))
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> RestyleResult<()> {
        if self.frames_per_second == 0 {
            return Err(RestyleError::validation("frames_per_second must be > 0"));
        }
        for (name, spec) in &self.properties {
            spec.validate(name)?;
        }
        Ok(())
    }

    /// Milliseconds between two frames.
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / f64::from(self.frames_per_second)
    }

    pub fn animated_count(&self) -> usize {
        self.properties.values().filter(|p| p.is_animated()).count()
    }

    /// Fresh node tree for the current properties.
    pub fn to_tree(&self) -> StyleTree {
        self.properties
            .iter()
            .map(|(k, p)| (k.clone(), p.to_node()))
            .collect()
    }

    /// Producer building a fresh tree from this script on every run.
    ///
    /// Identity is the canonical JSON of the properties, so two scripts with the same properties
    /// fingerprint alike.
    pub fn producer(&self, name: &str) -> RestyleResult<Producer> {
        let source = serde_json::to_string(&self.properties)?;
        let script = Rc::new(self.clone());
        Ok(Producer::new(name, &source, move || {
            Some(AnimationNode::Composite(Composite::Map(script.to_tree())))
        }))
    }
}

#[cfg(test)]
#[path = "../tests/unit/script.rs"]
mod tests;
