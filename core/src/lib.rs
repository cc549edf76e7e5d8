//! # Debug Overlay Core
//!
//! Engine-agnostic building blocks for the debug overlay: math aliases,
//! bounding volumes used for culling, a generation-checked slot arena and
//! the CPU-side mesh generators for every debug shape.

pub mod bounds;
pub mod math;
pub mod mesh;
pub mod pool;
pub mod profiling;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
