use crate::animation::node::{FrameAnimation, Terminal};
use crate::animation::timing::number;
use crate::foundation::core::Timestamp;
use serde_json::Value;

// Frames longer than this are treated as a hitch and integrated as if they were this long.
const MAX_FRAME_MS: f64 = 64.0;

/// Physical parameters of a damped spring.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
    /// Initial velocity used when there is no interrupted motion to inherit.
    pub velocity: f64,
    pub rest_speed: f64,
    pub rest_displacement: f64,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 100.0,
            damping: 10.0,
            mass: 1.0,
            velocity: 0.0,
            rest_speed: 0.001,
            rest_displacement: 0.001,
        }
    }
}

/// Numeric spring toward a target. Interrupting a running animation keeps its velocity.
#[derive(Clone, Debug)]
pub struct Spring {
    to: f64,
    cfg: SpringConfig,
    position: f64,
    velocity: f64,
    last: Timestamp,
}

impl Spring {
    pub fn new(to: f64, cfg: SpringConfig) -> Self {
        Self {
            to,
            cfg,
            position: to,
            velocity: cfg.velocity,
            last: Timestamp::default(),
        }
    }

    /// Wrap into a Terminal whose declared value is the target.
    pub fn into_terminal(self) -> Terminal {
        Terminal::new(number(self.to), self)
    }

    fn at_rest(&self) -> bool {
        self.velocity.abs() < self.cfg.rest_speed
            && (self.position - self.to).abs() < self.cfg.rest_displacement
    }
}

impl FrameAnimation for Spring {
    fn on_start(
        &mut self,
        current: &mut Value,
        seed: &Value,
        now: Timestamp,
        previous: Option<&Terminal>,
    ) {
        self.position = seed.as_f64().unwrap_or(self.to);
        if let Some(prev) = previous.filter(|p| !p.is_finished()) {
            self.velocity = prev.velocity();
        }
        self.last = now;
        *current = number(self.position);
    }

    fn on_frame(&mut self, current: &mut Value, now: Timestamp) -> bool {
        let dt_ms = now.since(self.last).min(MAX_FRAME_MS);
        self.last = now;

        // Semi-implicit Euler in 1ms substeps keeps stiff springs stable.
        let steps = dt_ms.ceil().max(1.0) as usize;
        let h = dt_ms / 1000.0 / steps as f64;
        let mass = self.cfg.mass.max(f64::EPSILON);
        for _ in 0..steps {
            let force =
                -self.cfg.stiffness * (self.position - self.to) - self.cfg.damping * self.velocity;
            self.velocity += force / mass * h;
            self.position += self.velocity * h;
        }

        if self.at_rest() {
            self.position = self.to;
            self.velocity = 0.0;
            *current = number(self.to);
            return true;
        }
        *current = number(self.position);
        false
    }

    fn velocity(&self) -> f64 {
        self.velocity
    }
}

/// Spring animation to `to` as a ready-to-use node.
pub fn spring(to: f64, cfg: SpringConfig) -> Terminal {
    Spring::new(to, cfg).into_terminal()
}

#[cfg(test)]
#[path = "../../tests/unit/animation/spring.rs"]
mod tests;
