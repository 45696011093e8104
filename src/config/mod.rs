//! Lane configuration
//!
//! Points the lane at the modules root and the project settings store.

mod lane;

pub use lane::{ConfigError, LaneConfig};
