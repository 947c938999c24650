pub mod color;
pub mod diff;
