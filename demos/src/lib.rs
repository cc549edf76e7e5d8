//! # Debug Overlay Demos
//!
//! Headless scenes that drive the debug overlay the way a game loop would:
//! render frames at one rate, fixed physics steps at another.
//!
//! ## Available Demos
//!
//! - `stress_demo` - Many animated shapes, logs stats every second

pub mod scene;

/// Demos library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
