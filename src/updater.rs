pub mod scheduler;
pub mod sink;
pub mod state;
pub mod strategy;
pub mod style_updater;
