//! Platform detection module
//!
//! Decides from the device identifier (user agent) whether the visitor is on
//! one of the supported iOS device families.

mod detection;

pub use detection::{AppleDevice, detect_device, is_target_platform};
