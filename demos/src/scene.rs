//! A small animated scene drawn through most of the draw API.

use std::f32::consts::TAU;

use debug_overlay_core::bounds::{Frustum, Plane};
use debug_overlay_core::math::{
    Mat3, Mat4, Transform3D, Vec3, look_at_rh, perspective_rh, quat_from_rotation_y,
};
use debug_overlay_drawer::{DebugDrawer, PointType, RenderView, colors};

/// Orbiting camera looking at the origin.
pub struct OrbitCamera {
    pub distance: f32,
    pub height: f32,
    pub fov_y: f32,
    pub aspect: f32,
    pub far: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            distance: 30.0,
            height: 12.0,
            fov_y: std::f32::consts::FRAC_PI_3,
            aspect: 16.0 / 9.0,
            far: 200.0,
        }
    }
}

impl OrbitCamera {
    pub fn position(&self, time: f32) -> Vec3 {
        let angle = time * 0.1;
        Vec3::new(angle.sin() * self.distance, self.height, angle.cos() * self.distance)
    }

    pub fn view_projection(&self, time: f32) -> Mat4 {
        let proj = perspective_rh(self.fov_y, self.aspect, 0.1, self.far);
        proj * look_at_rh(&self.position(time), &Vec3::zeros(), &Vec3::y())
    }

    pub fn render_view(&self, time: f32) -> RenderView {
        RenderView::from_view_projection(&self.view_projection(time), self.position(time), self.far)
    }
}

/// Per-frame draws: a ring of spinning boxes, a grid, a ground plane and a gizmo.
pub fn draw_frame(drawer: &DebugDrawer, time: f32, objects: u32) {
    drawer.draw_grid_xf(
        &Transform3D::new(Mat3::from_diagonal_element(40.0), Vec3::zeros()),
        (20, 20),
        colors::EMPTY,
        true,
        0.0,
    );
    drawer.draw_gizmo(&Transform3D::identity(), colors::EMPTY, false, 0.0);
    drawer.draw_plane(
        &Plane::from_point_normal(&Vec3::new(0.0, -0.01, 0.0), &Vec3::y()),
        colors::EMPTY,
        None,
        0.0,
    );

    let objects = objects.max(1);
    for i in 0..objects {
        let phase = i as f32 / objects as f32 * TAU + time * 0.3;
        let radius = 8.0 + (i % 7) as f32;
        let position = Vec3::new(phase.cos() * radius, 1.0, phase.sin() * radius);
        drawer.draw_box(
            &position,
            quat_from_rotation_y(time + phase),
            &Vec3::repeat(0.8),
            colors::EMPTY,
            true,
            0.0,
        );
        if i % 4 == 0 {
            drawer.draw_arrow(&position, &(position + Vec3::y() * 2.0), colors::EMPTY, 0.25, false, 0.0);
        }
    }

    // Thick orbit path
    let _thick = drawer
        .new_scoped_config()
        .with_thickness(0.05)
        .with_center_brightness(0.6);
    let path: Vec<Vec3> = (0..=64)
        .map(|i| {
            let a = i as f32 / 64.0 * TAU;
            Vec3::new(a.cos() * 6.0, 0.1, a.sin() * 6.0)
        })
        .collect();
    drawer.draw_line_path(&path, colors::SKY_BLUE, 0.0);
}

/// Physics-step draws: falling points, and a ray hit that lingers.
pub fn draw_physics_step(drawer: &DebugDrawer, time: f32, step: u64) {
    let height = 10.0 - (time * 2.0) % 10.0;
    let points: Vec<Vec3> = (0..8)
        .map(|i| Vec3::new(i as f32 - 3.5, height, 0.0))
        .collect();
    drawer.draw_points(&points, PointType::Sphere, 0.15, colors::ORANGE_RED, 0.0);

    if step % 10 == 0 {
        drawer.draw_line_hit_offset(
            &Vec3::new(0.0, height, 0.0),
            &Vec3::new(0.0, -1.0, 0.0),
            true,
            height / (height + 1.0),
            0.3,
            colors::EMPTY,
            colors::EMPTY,
            0.5,
        );
    }
}

/// Frustum of a second, fixed camera drawn as a wireframe.
pub fn draw_security_camera(drawer: &DebugDrawer) {
    let view = look_at_rh(&Vec3::new(15.0, 6.0, 0.0), &Vec3::zeros(), &Vec3::y());
    let frustum = Frustum::from_view_projection(&(perspective_rh(0.8, 1.3, 0.5, 12.0) * view));
    drawer.draw_camera_frustum(&frustum, colors::EMPTY, 0.0);
}
