//! Tracker orchestration: configuration, the startup/refresh cycle, and the
//! polling loop that feeds device state to a presence sink.

mod config;
pub mod scheduler;
mod sink;
mod tracker;

pub use config::{Config, ConfigError};
pub use sink::PresenceSink;
pub use tracker::{Tracker, TrackerError};
