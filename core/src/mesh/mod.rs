//! CPU-side mesh data and generators for debug shapes.
//!
//! - [`MeshData`] - Vertices (position, normal, uv) plus optional u32 indices
//! - [`generators`] - Pure functions producing wireframe, volumetric and solid
//!   meshes for every debug shape
//!
//! Generators run when the shape meshes are (re)built, never per draw call.

mod data;
pub mod generators;

pub use data::{MeshData, MeshVertex, PrimitiveTopology};
