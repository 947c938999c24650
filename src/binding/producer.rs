use crate::animation::node::AnimationNode;
use crate::binding::fingerprint::{DepValue, content_hash};
use std::fmt;
use std::rc::Rc;

/// Capability descriptor computed once when a producer is built and forwarded to the mapper
/// runtime as registration metadata.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProducerCaps {
    /// Output depends only on declared inputs, so the runtime may skip redundant re-runs.
    pub optimizable: bool,
    /// The producer closes over values that take part in its identity.
    pub captures_state: bool,
}

type ProduceFn = dyn Fn() -> Option<AnimationNode>;

/// A style function together with its identity.
///
/// The identity is a stable hash of the producer's source text plus the values it captured; two
/// producers with equal identity are interchangeable for binding purposes.
#[derive(Clone)]
pub struct Producer {
    name: String,
    source_hash: u64,
    captured: Vec<DepValue>,
    caps: ProducerCaps,
    func: Rc<ProduceFn>,
}

impl fmt::Debug for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer")
            .field("name", &self.name)
            .field("source_hash", &format_args!("{:016x}", self.source_hash))
            .field("captured", &self.captured)
            .field("caps", &self.caps)
            .finish()
    }
}

impl Producer {
    /// Wrap `func`, identified by the text of its definition.
    pub fn new(
        name: impl Into<String>,
        source: &str,
        func: impl Fn() -> Option<AnimationNode> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            source_hash: content_hash(source),
            captured: Vec::new(),
            caps: ProducerCaps::default(),
            func: Rc::new(func),
        }
    }

    /// Declare the values the producer closed over.
    pub fn capturing(mut self, values: impl IntoIterator<Item = DepValue>) -> Self {
        self.captured = values.into_iter().collect();
        self.caps.captures_state = !self.captured.is_empty();
        self
    }

    /// Mark the output as depending only on declared inputs.
    pub fn optimizable(mut self) -> Self {
        self.caps.optimizable = true;
        self
    }

    /// Run the producer.
    pub fn produce(&self) -> Option<AnimationNode> {
        (self.func)()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_hash(&self) -> u64 {
        self.source_hash
    }

    pub fn captured(&self) -> &[DepValue] {
        &self.captured
    }

    pub fn caps(&self) -> ProducerCaps {
        self.caps
    }
}
