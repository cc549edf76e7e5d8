use debug_overlay_core::bounds::Frustum;
use debug_overlay_core::math::{Mat4, Vec3};
use debug_overlay_core::{frame_mark, profile_function, profile_scope};

use crate::config::{DrawerConfig, MeshSettings};
use crate::culling::CullingData;
use crate::geometry_pool::GeometryPool;
use crate::meshes::ShapeMeshes;
use crate::shape::{ProcessType, ShapeKind};
use crate::sink::RendererSink;

/// Far distance assumed when no camera is known.
pub const DEFAULT_CAMERA_FAR: f32 = 1000.0;

/// One viewport's camera for a render tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    pub frustum: Frustum,
    pub camera_position: Vec3,
    pub far: f32,
}

impl RenderView {
    pub fn new(frustum: Frustum, camera_position: Vec3, far: f32) -> Self {
        Self {
            frustum,
            camera_position,
            far,
        }
    }

    /// Build a view from the camera's combined view-projection matrix.
    pub fn from_view_projection(view_proj: &Mat4, camera_position: Vec3, far: f32) -> Self {
        Self::new(Frustum::from_view_projection(view_proj), camera_position, far)
    }
}

/// First camera seen by the last render tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSnapshot {
    pub position: Vec3,
    pub far: f32,
}

impl Default for CameraSnapshot {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            far: DEFAULT_CAMERA_FAR,
        }
    }
}

/// Drives the [`GeometryPool`] once per render frame and once per physics
/// tick, and pushes the results into the [`RendererSink`].
pub struct GeometryContainer {
    pool: GeometryPool,
    sink: Box<dyn RendererSink>,
    meshes: ShapeMeshes,
    render_layer_mask: Option<u32>,
    camera: CameraSnapshot,
    lines_uploaded: bool,
    is_frame_rendered: bool,
}

impl GeometryContainer {
    pub fn new(sink: Box<dyn RendererSink>, mesh_settings: &MeshSettings) -> Self {
        let mut container = Self {
            pool: GeometryPool::new(),
            sink,
            meshes: ShapeMeshes::generate(mesh_settings),
            render_layer_mask: None,
            camera: CameraSnapshot::default(),
            lines_uploaded: false,
            is_frame_rendered: false,
        };
        container.sink.set_meshes(container.meshes.as_slice());
        container
    }

    pub fn pool(&self) -> &GeometryPool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut GeometryPool {
        &mut self.pool
    }

    pub fn meshes(&self) -> &ShapeMeshes {
        &self.meshes
    }

    pub fn camera(&self) -> CameraSnapshot {
        self.camera
    }

    pub fn render_layer_mask(&self) -> Option<u32> {
        self.render_layer_mask
    }

    pub fn is_frame_rendered(&self) -> bool {
        self.is_frame_rendered
    }

    /// Rebuild every shape mesh and hand them to the sink.
    pub fn regenerate_meshes(&mut self, settings: &MeshSettings) {
        self.meshes = ShapeMeshes::generate(settings);
        self.sink.set_meshes(self.meshes.as_slice());
        log::info!("Regenerated {} debug shape meshes", ShapeKind::COUNT);
    }

    pub fn set_render_layer_mask(&mut self, mask: u32) {
        if self.render_layer_mask != Some(mask) {
            self.sink.set_render_layer_mask(mask);
            self.render_layer_mask = Some(mask);
        }
    }

    /// Render tick.
    ///
    /// Runs cull, line flatten, instance flatten, visible scan, render
    /// expiration and render aging, in that order. Does nothing while the
    /// config freezes rendering.
    pub fn update_geometry(
        &mut self,
        delta: f32,
        views: &[RenderView],
        config: &DrawerConfig,
        debug_enabled: bool,
    ) {
        profile_function!();

        if config.freeze_render {
            return;
        }

        if !debug_enabled {
            self.pool.update_expiration(ProcessType::Render);
            self.pool.expire_pending();
            self.pool.reset_counter(delta, ProcessType::Render);
            self.pool.reset_visible_objects();
            self.upload();
            return;
        }

        self.set_render_layer_mask(config.render_layer_mask);

        self.camera = views
            .first()
            .map(|v| CameraSnapshot {
                position: v.camera_position,
                far: v.far,
            })
            .unwrap_or_default();

        let frustums = if config.use_frustum_culling {
            views.iter().map(|v| v.frustum).collect()
        } else {
            Vec::new()
        };
        let culling = CullingData::new(
            frustums,
            views.iter().map(|v| v.camera_position).collect(),
            config.culling_distance,
        );

        {
            profile_scope!("cull");
            self.pool.update_visibility(&culling);
        }

        if config.visible_instance_bounds {
            self.pool.add_bounds_overlays();
        }

        self.pool.fill_lines_data();
        self.pool.fill_instance_data();
        self.upload();

        self.pool.scan_visible_instances();
        self.pool.update_expiration(ProcessType::Render);
        self.pool.reset_counter(delta, ProcessType::Render);

        self.is_frame_rendered = true;
        frame_mark!();
    }

    fn upload(&mut self) {
        profile_scope!("upload");

        let vertices = self.pool.line_vertices();
        if !vertices.is_empty() || self.lines_uploaded {
            self.sink.upload_lines(vertices);
            self.lines_uploaded = !vertices.is_empty();
        }

        for kind in ShapeKind::ALL {
            let buffer = self.pool.instance_buffer(kind);
            if buffer.needs_upload() {
                self.sink
                    .upload_instances(kind, buffer.visible(), buffer.visible_count());
            }
        }
    }

    /// Start of a physics tick.
    ///
    /// Physics entries age only once per rendered frame, so entries created
    /// by several physics ticks between two frames all get drawn.
    pub fn update_geometry_physics_start(&mut self, delta: f32) {
        if self.is_frame_rendered {
            self.pool.reset_counter(delta, ProcessType::Physics);
            self.is_frame_rendered = false;
        }
    }

    /// End of a physics tick.
    pub fn update_geometry_physics_end(&mut self) {
        self.pool.update_expiration(ProcessType::Physics);
    }

    /// Drop every entry and push empty buffers to the sink.
    pub fn clear(&mut self) {
        self.pool.clear_pool();
        self.upload();
    }
}
