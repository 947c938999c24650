use crate::animation::ease::Ease;
use crate::animation::node::{FrameAnimation, Terminal};
use crate::foundation::core::Timestamp;
use serde_json::Value;

/// Linear interpolation between two values of the same kind.
pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Value {
    /// Numbers interpolate, equal-length arrays and same-keyed objects interpolate member-wise;
    /// anything else holds `a` until `t` reaches 1.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        match (a, b) {
            (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
                (Some(x), Some(y)) => number(f64::lerp(&x, &y, t)),
                _ => hold(a, b, t),
            },
            (Value::Array(xs), Value::Array(ys)) if xs.len() == ys.len() => Value::Array(
                xs.iter()
                    .zip(ys)
                    .map(|(x, y)| Value::lerp(x, y, t))
                    .collect(),
            ),
            (Value::Object(xs), Value::Object(ys))
                if xs.len() == ys.len() && xs.keys().all(|k| ys.contains_key(k)) =>
            {
                Value::Object(
                    xs.iter()
                        .map(|(k, x)| (k.clone(), Value::lerp(x, &ys[k], t)))
                        .collect(),
                )
            }
            _ => hold(a, b, t),
        }
    }
}

fn hold(a: &Value, b: &Value, t: f64) -> Value {
    if t >= 1.0 { b.clone() } else { a.clone() }
}

pub(crate) fn number(v: f64) -> Value {
    serde_json::Number::from_f64(v)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Duration-based animation toward a fixed target along an easing curve.
#[derive(Clone, Debug)]
pub struct Timing {
    to: Value,
    duration_ms: f64,
    ease: Ease,
    from: Value,
    started_at: Timestamp,
}

impl Timing {
    /// Animate to `to` over `duration_ms` milliseconds.
    pub fn new(to: Value, duration_ms: f64, ease: Ease) -> Self {
        Self {
            to,
            duration_ms,
            ease,
            from: Value::Null,
            started_at: Timestamp::default(),
        }
    }

    /// Wrap into a Terminal whose declared value is `to`.
    pub fn into_terminal(self) -> Terminal {
        Terminal::new(self.to.clone(), self)
    }
}

impl FrameAnimation for Timing {
    fn on_start(
        &mut self,
        current: &mut Value,
        seed: &Value,
        now: Timestamp,
        _previous: Option<&Terminal>,
    ) {
        self.from = seed.clone();
        self.started_at = now;
        *current = seed.clone();
    }

    fn on_frame(&mut self, current: &mut Value, now: Timestamp) -> bool {
        let t = Ease::progress(now.since(self.started_at), self.duration_ms);
        if t >= 1.0 {
            *current = self.to.clone();
            return true;
        }
        *current = Value::lerp(&self.from, &self.to, self.ease.apply(t));
        false
    }
}

/// Timing animation to `to` as a ready-to-use node.
pub fn timing(to: Value, duration_ms: f64, ease: Ease) -> Terminal {
    Timing::new(to, duration_ms, ease).into_terminal()
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timing.rs"]
mod tests;
