pub mod ease;
pub mod node;
pub mod spring;
pub mod timing;
pub mod walker;
