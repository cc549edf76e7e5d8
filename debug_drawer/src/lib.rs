//! Runtime debug overlay: timed wireframe shapes and lines drawn from
//! anywhere in a game or tool, culled and flattened into per-shape instance
//! buffers once per render frame.
//!
//! # Architecture
//!
//! - [`DebugDrawer`]: thread-safe front end holding the draw API
//! - [`GeometryContainer`]: runs the render and physics ticks
//! - [`GeometryPool`]: timed instances and lines, keyed dedup, culling
//! - [`RendererSink`]: receives shape meshes and flattened buffers
//! - [`ScopedConfig`]: per-thread overrides for thickness and friends
//!
//! # Usage
//!
//! ```
//! use debug_overlay_drawer::{DebugDrawer, DrawerSettings, RecordingSink, ShapeKind, colors};
//! use debug_overlay_core::math::Vec3;
//!
//! let sink = RecordingSink::new();
//! let drawer = DebugDrawer::new(DrawerSettings::default(), sink.clone());
//!
//! // From any system, any thread:
//! drawer.draw_sphere(&Vec3::new(0.0, 1.0, 0.0), 0.5, colors::EMPTY, 0.0);
//! drawer.draw_line(&Vec3::zeros(), &Vec3::x(), colors::RED, 2.0);
//!
//! // Once per frame, with every active camera:
//! drawer.process(1.0 / 60.0, &[]);
//!
//! assert_eq!(sink.snapshot().visible(ShapeKind::Sphere), 1);
//! ```

mod buffer;
pub mod colors;
mod config;
mod container;
mod culling;
mod draw_api;
mod drawer;
mod entry;
mod geometry_pool;
mod meshes;
mod scoped_config;
mod shape;
mod sink;
mod stats;
mod vertex;

pub use buffer::{InstanceBuffer, MIN_INSTANCE_CAPACITY};
pub use config::{ConfigError, DrawerConfig, DrawerSettings, MeshSettings, ScopedConfigData};
pub use container::{CameraSnapshot, GeometryContainer, RenderView};
pub use culling::CullingData;
pub use draw_api::PointType;
pub use drawer::DebugDrawer;
pub use entry::{
    DelayedRendererInstance, DelayedRendererLine, EntryState, InstanceDesc, LineDesc, Lifetime,
    key_of,
};
pub use geometry_pool::{GeometryPool, InstanceHandle, LineHandle};
pub use meshes::ShapeMeshes;
pub use scoped_config::{ScopeOverrides, ScopedConfig, ScopedConfigRegistry};
pub use shape::{ProcessType, ShapeKind};
pub use sink::{LoggingSink, NullSink, Recorded, RecordingSink, RendererSink};
pub use stats::{KindStats, Stats};
pub use vertex::{InstanceData, LineVertex};
