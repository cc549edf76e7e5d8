use debug_overlay_core::bounds::{Aabb, Frustum, SphereBounds};
use debug_overlay_core::math::Vec3;

/// Camera inputs of one visibility pass.
///
/// Visibility is a union over viewports: a shape visible in any frustum is
/// visible. With no frustums frustum culling is off. Distance culling applies
/// when `culling_distance > 0` and at least one camera position is known.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CullingData {
    pub frustums: Vec<Frustum>,
    pub camera_positions: Vec<Vec3>,
    pub culling_distance: f32,
}

impl CullingData {
    /// Inputs that mark everything visible.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn new(frustums: Vec<Frustum>, camera_positions: Vec<Vec3>, culling_distance: f32) -> Self {
        Self {
            frustums,
            camera_positions,
            culling_distance,
        }
    }

    fn distance_culling_enabled(&self) -> bool {
        self.culling_distance > 0.0 && !self.camera_positions.is_empty()
    }

    pub fn is_sphere_visible(&self, sphere: &SphereBounds) -> bool {
        if !self.frustums.is_empty() && !self.frustums.iter().any(|f| f.intersects_sphere(sphere)) {
            return false;
        }
        if !self.distance_culling_enabled() {
            return true;
        }
        self.camera_positions
            .iter()
            .any(|camera| (sphere.center - camera).norm() - sphere.radius <= self.culling_distance)
    }

    pub fn is_aabb_visible(&self, aabb: &Aabb) -> bool {
        if !self.frustums.is_empty() && !self.frustums.iter().any(|f| f.intersects_aabb(aabb)) {
            return false;
        }
        if !self.distance_culling_enabled() {
            return true;
        }
        self.camera_positions
            .iter()
            .any(|camera| aabb.distance_to_point(camera) <= self.culling_distance)
    }
}
