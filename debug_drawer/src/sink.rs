//! The boundary with the rendering backend.
//!
//! The drawer never touches GPU objects. Each render tick it pushes the
//! flattened buffers through a [`RendererSink`]; the backend owns the
//! instance buffers, materials and scene hookup.

use std::sync::Arc;

use debug_overlay_core::mesh::MeshData;
use parking_lot::Mutex;

use crate::shape::ShapeKind;
use crate::vertex::{InstanceData, LineVertex};

/// Receives the drawer's per-tick output.
pub trait RendererSink: Send {
    /// Shared meshes, one per kind in [`ShapeKind::ALL`] order.
    fn set_meshes(&mut self, _meshes: &[MeshData]) {}

    /// Replace the visible instances of `kind`.
    ///
    /// `instances.len() == visible_count`; the backend may keep a larger
    /// allocation and only draw the first `visible_count` entries.
    fn upload_instances(&mut self, kind: ShapeKind, instances: &[InstanceData], visible_count: usize);

    /// Replace the shared line-list buffer.
    fn upload_lines(&mut self, vertices: &[LineVertex]);

    fn set_render_layer_mask(&mut self, _mask: u32) {}
}

/// Sink that discards everything.
#[derive(Debug, Default)]
pub struct NullSink;

impl RendererSink for NullSink {
    fn upload_instances(&mut self, _kind: ShapeKind, _instances: &[InstanceData], _visible_count: usize) {}

    fn upload_lines(&mut self, _vertices: &[LineVertex]) {}
}

/// What a [`RecordingSink`] has seen.
#[derive(Debug, Clone, Default)]
pub struct Recorded {
    /// Last upload per kind.
    pub instances: Vec<Vec<InstanceData>>,
    pub lines: Vec<LineVertex>,
    pub instance_uploads: usize,
    pub line_uploads: usize,
    pub mesh_uploads: usize,
    pub render_layer_mask: Option<u32>,
}

impl Recorded {
    pub fn visible(&self, kind: ShapeKind) -> usize {
        self.instances.get(kind.index()).map_or(0, Vec::len)
    }
}

/// Sink that keeps a copy of every upload.
///
/// Clones share the same recording, so a test can keep one clone and hand
/// the other to the drawer.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    recorded: Arc<Mutex<Recorded>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Recorded {
        self.recorded.lock().clone()
    }
}

impl RendererSink for RecordingSink {
    fn set_meshes(&mut self, _meshes: &[MeshData]) {
        self.recorded.lock().mesh_uploads += 1;
    }

    fn upload_instances(&mut self, kind: ShapeKind, instances: &[InstanceData], visible_count: usize) {
        debug_assert_eq!(instances.len(), visible_count);
        let mut recorded = self.recorded.lock();
        if recorded.instances.len() < ShapeKind::COUNT {
            recorded.instances.resize(ShapeKind::COUNT, Vec::new());
        }
        recorded.instances[kind.index()] = instances.to_vec();
        recorded.instance_uploads += 1;
    }

    fn upload_lines(&mut self, vertices: &[LineVertex]) {
        let mut recorded = self.recorded.lock();
        recorded.lines = vertices.to_vec();
        recorded.line_uploads += 1;
    }

    fn set_render_layer_mask(&mut self, mask: u32) {
        self.recorded.lock().render_layer_mask = Some(mask);
    }
}

/// Sink that logs a summary of each upload at debug level.
#[derive(Debug, Default)]
pub struct LoggingSink;

impl RendererSink for LoggingSink {
    fn set_meshes(&mut self, meshes: &[MeshData]) {
        let vertices: u32 = meshes.iter().map(MeshData::vertex_count).sum();
        log::info!("Received {} shape meshes ({} vertices)", meshes.len(), vertices);
    }

    fn upload_instances(&mut self, kind: ShapeKind, _instances: &[InstanceData], visible_count: usize) {
        log::debug!("{kind}: {visible_count} visible instances");
    }

    fn upload_lines(&mut self, vertices: &[LineVertex]) {
        log::debug!("lines: {} segments", vertices.len() / 2);
    }

    fn set_render_layer_mask(&mut self, mask: u32) {
        log::debug!("render layer mask: {mask:#x}");
    }
}
