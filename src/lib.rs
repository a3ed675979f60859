//! Two-channel serial voltage scope: line-delimited ADC frames in, a bounded
//! sliding window of converted samples out, redrawn on a fixed tick.
pub mod config;
pub mod drivers;
pub mod gui;
pub mod headless;
pub mod types;

pub use config::{Cli, ScopeConfig};
pub use types::{Channel, ConnectionMode};
