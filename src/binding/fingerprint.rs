//! Dependency fingerprints deciding whether a binding is rebuilt or reused.
//!
//! Without an explicit dependency list, a binding's identity is the content hash of each producer
//! plus the values it captured. With one, the list is extended by a sentinel hash over all
//! producers, so editing a producer still forces a rebind.

use crate::binding::producer::Producer;
use serde_json::Value;
use xxhash_rust::xxh3::Xxh3;

const XXH3_SEED: u64 = 0x5be3_2c41_9e07_a6d1;

/// One identity token.
#[derive(Clone, Debug)]
pub enum DepValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Hash(u64),
    List(Vec<DepValue>),
}

/// Same-value comparison: NaN equals NaN, `+0` differs from `-0`.
pub fn same_value(a: f64, b: f64) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    a == b && a.is_sign_negative() == b.is_sign_negative()
}

impl PartialEq for DepValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => same_value(*a, *b),
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Hash(a), Self::Hash(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            _ => false,
        }
    }
}

impl From<f64> for DepValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i64> for DepValue {
    fn from(v: i64) -> Self {
        Self::Number(v as f64)
    }
}

impl From<bool> for DepValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for DepValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for DepValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&Value> for DepValue {
    fn from(v: &Value) -> Self {
        match v {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            Value::String(s) => Self::Text(s.clone()),
            Value::Array(items) => Self::List(items.iter().map(Self::from).collect()),
            Value::Object(map) => Self::List(
                map.iter()
                    .map(|(k, v)| Self::List(vec![Self::Text(k.clone()), Self::from(v)]))
                    .collect(),
            ),
        }
    }
}

/// Ordered identity tokens of a binding.
#[derive(Clone, Debug, PartialEq)]
pub struct Fingerprint(pub Vec<DepValue>);

impl Fingerprint {
    pub fn tokens(&self) -> &[DepValue] {
        &self.0
    }
}

/// Build the fingerprint of a binding over `producers`.
pub fn fingerprint(explicit: Option<Vec<DepValue>>, producers: &[&Producer]) -> Fingerprint {
    match explicit {
        None => Fingerprint(
            producers
                .iter()
                .map(|p| {
                    DepValue::List(vec![
                        DepValue::Hash(p.source_hash()),
                        DepValue::List(p.captured().to_vec()),
                    ])
                })
                .collect(),
        ),
        Some(mut deps) => {
            deps.push(DepValue::Hash(aggregate_hash(producers)));
            Fingerprint(deps)
        }
    }
}

/// Whether two fingerprints identify the same binding. Absent fingerprints never match.
pub fn equal(a: Option<&Fingerprint>, b: Option<&Fingerprint>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.0.len() == b.0.len() && a.0.iter().zip(&b.0).all(|(x, y)| x == y),
        _ => false,
    }
}

/// Stable content hash of producer source text.
pub fn content_hash(source: &str) -> u64 {
    let mut h = StableHasher::new();
    h.write_str(source);
    h.finish()
}

/// Hash over the content hashes of `producers`, in order.
pub fn aggregate_hash(producers: &[&Producer]) -> u64 {
    let mut h = StableHasher::new();
    h.write_u64(producers.len() as u64);
    for p in producers {
        h.write_u64(p.source_hash());
    }
    h.finish()
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_str(&mut self, s: &str) {
        self.write_u64(s.len() as u64);
        self.write_bytes(s.as_bytes());
    }

    fn finish(self) -> u64 {
        self.inner.digest()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/binding/fingerprint.rs"]
mod tests;
