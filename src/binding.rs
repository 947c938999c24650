pub mod fingerprint;
pub mod producer;
pub mod runtime;
pub mod style_binding;
