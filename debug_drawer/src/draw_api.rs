use debug_overlay_core::bounds::{Aabb, Frustum, Plane, SphereBounds};
use debug_overlay_core::math::{
    Mat3, Quat, Transform3D, Vec3, basis_looking_at, up_vector_for,
};
use debug_overlay_core::mesh::generators::{
    CUBE_DIAGONAL_LENGTH_FOR_SPHERE, camera_frustum_lines, grid_lines, lines_from_path,
};

use crate::colors::{self, Color};
use crate::config::{DrawerConfig, ScopedConfigData};
use crate::container::CameraSnapshot;
use crate::drawer::DebugDrawer;
use crate::entry::{InstanceDesc, LineDesc};
use crate::geometry_pool::GeometryPool;
use crate::shape::{ProcessType, ShapeKind};

/// How [`DebugDrawer::draw_points`] marks each point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointType {
    #[default]
    Square,
    Sphere,
}

/// Bounding radius of the arrowhead mesh around its middle.
const ARROWHEAD_BOUNDS_RADIUS: f32 = 0.56;
const GIZMO_ARROW_SIZE: f32 = 0.15;

/// Everything a draw call resolves once, under the lock.
struct DrawScope<'a> {
    pool: &'a mut GeometryPool,
    config: &'a DrawerConfig,
    scope: ScopedConfigData,
    process_type: ProcessType,
    camera: CameraSnapshot,
}

impl DrawScope<'_> {
    fn is_volumetric(&self) -> bool {
        self.scope.thickness > 0.0
    }

    fn custom_color(&self) -> Color {
        [self.scope.thickness, self.scope.center_brightness, 0.0, 0.0]
    }

    fn sphere_kind(&self) -> ShapeKind {
        if self.scope.hd_sphere {
            ShapeKind::SphereHd
        } else {
            ShapeKind::Sphere
        }
    }

    fn instance(
        &mut self,
        kind: ShapeKind,
        transform: Transform3D,
        color: Color,
        bounds: SphereBounds,
        duration: f32,
    ) {
        let volumetric = kind.to_volumetric();
        let (kind, custom, bounds) = if self.is_volumetric() && volumetric.is_volumetric() {
            let grown = SphereBounds::new(bounds.center, bounds.radius + self.scope.thickness);
            (volumetric, self.custom_color(), grown)
        } else {
            (kind, colors::EMPTY, bounds)
        };
        self.pool.add_or_update_instance(
            InstanceDesc::new(kind, transform)
                .with_color(color)
                .with_custom_color(custom)
                .with_bounds(bounds)
                .with_duration(duration)
                .with_process_type(self.process_type),
        );
    }

    /// Raw line list, or one thick segment instance per pair.
    fn lines(&mut self, points: Vec<Vec3>, color: Color, duration: f32) {
        if points.len() < 2 {
            return;
        }
        if !self.is_volumetric() {
            self.pool.add_or_update_line(
                LineDesc::new(points)
                    .with_color(color)
                    .with_duration(duration)
                    .with_process_type(self.process_type),
            );
            return;
        }
        for pair in points.chunks_exact(2) {
            let (a, b) = (pair[0], pair[1]);
            let delta = b - a;
            let length = delta.norm();
            if length <= f32::EPSILON {
                continue;
            }
            let basis = basis_looking_at(&delta, &up_vector_for(&delta));
            let transform = Transform3D::new(basis, a).scaled_local(Vec3::new(1.0, 1.0, length));
            let bounds = SphereBounds::new(a + delta * 0.5, length * 0.5);
            self.instance(ShapeKind::LineVolumetric, transform, color, bounds, duration);
        }
    }

    fn arrowhead(&mut self, transform: Transform3D, color: Color, duration: f32) {
        let center = transform.transform_point(&Vec3::new(0.0, 0.0, -0.5));
        let bounds = SphereBounds::new(center, transform.max_axis_length() * ARROWHEAD_BOUNDS_RADIUS);
        self.instance(ShapeKind::ArrowHead, transform, color, bounds, duration);
    }

    fn arrow(&mut self, a: Vec3, b: Vec3, color: Color, arrow_size: f32, is_absolute: bool, duration: f32) {
        let delta = b - a;
        let length = delta.norm();
        self.lines(vec![a, b], color, duration);
        if length <= f32::EPSILON {
            return;
        }
        let size = if is_absolute { arrow_size } else { arrow_size * length };
        let dir = delta / length;
        let basis = basis_looking_at(&dir, &up_vector_for(&dir)) * size;
        self.arrowhead(Transform3D::new(basis, b - dir * size), color, duration);
    }

    fn sphere(&mut self, position: Vec3, radius: f32, color: Color, duration: f32) {
        let kind = self.sphere_kind();
        let transform = Transform3D::new(Mat3::from_diagonal_element(radius * 2.0), position);
        self.instance(kind, transform, color, SphereBounds::new(position, radius), duration);
    }

    fn square(&mut self, position: Vec3, size: f32, color: Color, duration: f32) {
        let transform = Transform3D::new(Mat3::from_diagonal_element(size), position);
        let bounds = SphereBounds::new(position, size * std::f32::consts::FRAC_1_SQRT_2);
        self.instance(ShapeKind::BillboardSquare, transform, color, bounds, duration);
    }
}

impl DebugDrawer {
    fn draw(&self, f: impl FnOnce(&mut DrawScope<'_>)) {
        let thread = std::thread::current().id();
        self.with_state(|s| {
            let scope = s.scoped.resolve(thread);
            let process_type = s.current_process_type();
            let camera = s.container.camera();
            let mut draw = DrawScope {
                pool: s.container.pool_mut(),
                config: &s.config,
                scope,
                process_type,
                camera,
            };
            f(&mut draw);
        });
    }

    // -----------------------------------------------------------------------
    // Spheres and cylinders
    // -----------------------------------------------------------------------

    /// Draw a sphere. HD when the scope asks for it.
    pub fn draw_sphere(&self, position: &Vec3, radius: f32, color: Color, duration: f32) {
        let color = colors::or_default(color, colors::CHARTREUSE);
        self.draw(|d| d.sphere(*position, radius, color, duration));
    }

    /// Draw a unit-diameter sphere under `transform`.
    pub fn draw_sphere_xf(&self, transform: &Transform3D, color: Color, duration: f32) {
        let color = colors::or_default(color, colors::CHARTREUSE);
        let bounds = SphereBounds::new(transform.origin, transform.max_axis_length() * 0.5);
        self.draw(|d| {
            let kind = d.sphere_kind();
            d.instance(kind, *transform, color, bounds, duration);
        });
    }

    /// Draw a vertical cylinder of radius 0.5 and height 1 under `transform`.
    pub fn draw_cylinder(&self, transform: &Transform3D, color: Color, duration: f32) {
        let color = colors::or_default(color, colors::FOREST_GREEN);
        let bounds = SphereBounds::new(
            transform.origin,
            transform.max_axis_length() * CUBE_DIAGONAL_LENGTH_FOR_SPHERE,
        );
        self.draw(|d| d.instance(ShapeKind::Cylinder, *transform, color, bounds, duration));
    }

    /// Draw a cylinder whose end caps are centered on `a` and `b`.
    pub fn draw_cylinder_ab(&self, a: &Vec3, b: &Vec3, radius: f32, color: Color, duration: f32) {
        let color = colors::or_default(color, colors::FOREST_GREEN);
        let delta = b - a;
        let length = delta.norm();
        let center = a + delta * 0.5;
        let basis = basis_looking_at(&delta, &up_vector_for(&delta));
        let transform =
            Transform3D::new(basis, center).scaled_local(Vec3::new(radius * 2.0, radius * 2.0, length));
        let bounds = SphereBounds::new(center, (radius * radius + length * length * 0.25).sqrt());
        self.draw(|d| d.instance(ShapeKind::CylinderAb, transform, color, bounds, duration));
    }

    // -----------------------------------------------------------------------
    // Boxes
    // -----------------------------------------------------------------------

    /// Draw a box. Corner-anchored at `position` unless `is_centered`.
    pub fn draw_box(
        &self,
        position: &Vec3,
        rotation: Quat,
        size: &Vec3,
        color: Color,
        is_centered: bool,
        duration: f32,
    ) {
        let transform = Transform3D::from_rotation_scale_translation(rotation, *size, *position);
        self.draw_box_xf(&transform, color, is_centered, duration);
    }

    /// Draw a unit box under `transform`.
    pub fn draw_box_xf(&self, transform: &Transform3D, color: Color, is_centered: bool, duration: f32) {
        let color = colors::or_default(color, colors::FOREST_GREEN);
        let (kind, center) = if is_centered {
            (ShapeKind::CubeCentered, transform.origin)
        } else {
            (ShapeKind::Cube, transform.transform_point(&Vec3::repeat(0.5)))
        };
        let radius = (0..3).map(|i| transform.axis(i)).sum::<Vec3>().norm() * 0.5;
        let bounds = SphereBounds::new(center, radius.max(transform.max_axis_length() * 0.5));
        self.draw(|d| d.instance(kind, *transform, color, bounds, duration));
    }

    pub fn draw_aabb(&self, aabb: &Aabb, color: Color, duration: f32) {
        let transform = Transform3D::new(Mat3::from_diagonal(&aabb.size()), aabb.min);
        self.draw_box_xf(&transform, color, false, duration);
    }

    /// Draw the axis-aligned box spanned by two corners.
    pub fn draw_aabb_ab(&self, a: &Vec3, b: &Vec3, color: Color, duration: f32) {
        self.draw_aabb(&Aabb::new(*a, *b), color, duration);
    }

    /// Draw a box oriented by `up`.
    ///
    /// With `is_ab_diagonal`, `a` and `b` are opposite corners in a frame whose
    /// Y axis is `up`. Otherwise they are the centers of two opposite faces of
    /// a cube rolled so its Y axis follows `up`.
    pub fn draw_box_ab(
        &self,
        a: &Vec3,
        b: &Vec3,
        up: &Vec3,
        color: Color,
        is_ab_diagonal: bool,
        duration: f32,
    ) {
        let delta = b - a;
        let length = delta.norm();
        if length <= f32::EPSILON {
            return;
        }

        let transform = if is_ab_diagonal {
            let y = up.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::y);
            let x = y.cross(&up_vector_for(&y)).normalize();
            let z = x.cross(&y);
            let basis = Mat3::from_columns(&[x, y, z]);
            let local = basis.transpose() * delta;
            let size = local.abs();
            let min_local = Vec3::new(local.x.min(0.0), local.y.min(0.0), local.z.min(0.0));
            Transform3D::new(basis, a + basis * min_local).scaled_local(size)
        } else {
            let basis = basis_looking_at(&delta, up);
            Transform3D::new(basis, a + delta * 0.5).scaled_local(Vec3::repeat(length))
        };
        self.draw_box_xf(&transform, color, !is_ab_diagonal, duration);
    }

    // -----------------------------------------------------------------------
    // Lines
    // -----------------------------------------------------------------------

    pub fn draw_line(&self, a: &Vec3, b: &Vec3, color: Color, duration: f32) {
        let color = colors::or_default(color, colors::RED);
        self.draw(|d| d.lines(vec![*a, *b], color, duration));
    }

    /// Draw a line list. A trailing unpaired point is ignored.
    pub fn draw_lines(&self, lines: &[Vec3], color: Color, duration: f32) {
        let color = colors::or_default(color, colors::RED);
        let mut points = lines.to_vec();
        points.truncate(points.len() / 2 * 2);
        self.draw(|d| d.lines(points, color, duration));
    }

    /// Draw connected segments through every point of `path`.
    pub fn draw_line_path(&self, path: &[Vec3], color: Color, duration: f32) {
        let color = colors::or_default(color, colors::RED);
        let points = lines_from_path(path);
        self.draw(|d| d.lines(points, color, duration));
    }

    pub fn draw_ray(&self, origin: &Vec3, direction: &Vec3, length: f32, color: Color, duration: f32) {
        let Some(dir) = direction.try_normalize(f32::EPSILON) else {
            return;
        };
        self.draw_line(origin, &(origin + dir * length), color, duration);
    }

    /// Draw a ray cast result: the segment before `hit` in the hit color, the
    /// rest in the after-hit color, and a marker at `hit`. Without a hit the
    /// whole segment uses the hit color.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_line_hit(
        &self,
        start: &Vec3,
        end: &Vec3,
        hit: &Vec3,
        is_hit: bool,
        hit_size: f32,
        hit_color: Color,
        after_hit_color: Color,
        duration: f32,
    ) {
        let (start, end, hit) = (*start, *end, *hit);
        self.draw(|d| {
            let hit_color = colors::or_default(hit_color, d.config.line_hit_color);
            let after_hit_color = colors::or_default(after_hit_color, d.config.line_after_hit_color);
            if is_hit {
                d.lines(vec![start, hit], hit_color, duration);
                d.lines(vec![hit, end], after_hit_color, duration);
                d.square(hit, hit_size, hit_color, duration);
            } else {
                d.lines(vec![start, end], hit_color, duration);
            }
        });
    }

    /// [`draw_line_hit`](Self::draw_line_hit) with the hit placed at a
    /// fraction of the segment, clamped to 0..=1.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_line_hit_offset(
        &self,
        start: &Vec3,
        end: &Vec3,
        is_hit: bool,
        unit_offset_of_hit: f32,
        hit_size: f32,
        hit_color: Color,
        after_hit_color: Color,
        duration: f32,
    ) {
        let hit = start + (end - start) * unit_offset_of_hit.clamp(0.0, 1.0);
        self.draw_line_hit(
            start,
            end,
            &hit,
            is_hit,
            hit_size,
            hit_color,
            after_hit_color,
            duration,
        );
    }

    // -----------------------------------------------------------------------
    // Arrows
    // -----------------------------------------------------------------------

    /// Draw an arrowhead with its tip at local `(0, 0, -1)`.
    pub fn draw_arrowhead(&self, transform: &Transform3D, color: Color, duration: f32) {
        let color = colors::or_default(color, colors::LIGHT_GREEN);
        self.draw(|d| d.arrowhead(*transform, color, duration));
    }

    /// Draw a line from `a` to `b` with an arrowhead at `b`.
    ///
    /// `arrow_size` is a fraction of the length unless `is_absolute_size`.
    pub fn draw_arrow(
        &self,
        a: &Vec3,
        b: &Vec3,
        color: Color,
        arrow_size: f32,
        is_absolute_size: bool,
        duration: f32,
    ) {
        let color = colors::or_default(color, colors::LIGHT_GREEN);
        self.draw(|d| d.arrow(*a, *b, color, arrow_size, is_absolute_size, duration));
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_arrow_ray(
        &self,
        origin: &Vec3,
        direction: &Vec3,
        length: f32,
        color: Color,
        arrow_size: f32,
        is_absolute_size: bool,
        duration: f32,
    ) {
        let Some(dir) = direction.try_normalize(f32::EPSILON) else {
            return;
        };
        self.draw_arrow(
            origin,
            &(origin + dir * length),
            color,
            arrow_size,
            is_absolute_size,
            duration,
        );
    }

    /// Draw an arrow for every segment of `path`.
    pub fn draw_arrow_path(
        &self,
        path: &[Vec3],
        color: Color,
        arrow_size: f32,
        is_absolute_size: bool,
        duration: f32,
    ) {
        let color = colors::or_default(color, colors::LIGHT_GREEN);
        self.draw(|d| {
            for pair in path.windows(2) {
                d.arrow(pair[0], pair[1], color, arrow_size, is_absolute_size, duration);
            }
        });
    }

    // -----------------------------------------------------------------------
    // Points and flat shapes
    // -----------------------------------------------------------------------

    /// Mark every point with a billboard square of side `size` or a sphere
    /// of radius `size`.
    pub fn draw_points(&self, points: &[Vec3], point_type: PointType, size: f32, color: Color, duration: f32) {
        let color = colors::or_default(color, colors::RED);
        self.draw(|d| {
            for p in points {
                match point_type {
                    PointType::Square => d.square(*p, size, color, duration),
                    PointType::Sphere => d.sphere(*p, size, color, duration),
                }
            }
        });
    }

    /// Draw `path` as connected lines with a marker on every point.
    pub fn draw_point_path(
        &self,
        path: &[Vec3],
        point_type: PointType,
        size: f32,
        points_color: Color,
        lines_color: Color,
        duration: f32,
    ) {
        self.draw_points(path, point_type, size, points_color, duration);
        let lines_color = colors::or_default(lines_color, colors::GREEN);
        self.draw_line_path(path, lines_color, duration);
    }

    /// Draw a camera-facing square.
    pub fn draw_square(&self, position: &Vec3, size: f32, color: Color, duration: f32) {
        let color = colors::or_default(color, colors::RED);
        self.draw(|d| d.square(*position, size, color, duration));
    }

    /// Draw a square patch of `plane`.
    ///
    /// The patch is centered on `anchor` projected onto the plane, or on the
    /// last camera position projected onto it. Its side is the scoped plane
    /// size, or twice the camera's far distance when that is infinite.
    pub fn draw_plane(&self, plane: &Plane, color: Color, anchor: Option<&Vec3>, duration: f32) {
        let color = colors::or_default(color, colors::PLANE);
        let plane = *plane;
        let anchor = anchor.copied();
        self.draw(|d| {
            let size = if d.scope.plane_size.is_finite() {
                d.scope.plane_size
            } else {
                d.camera.far * 2.0
            };
            let center = plane.project(&anchor.unwrap_or(d.camera.position));
            let basis = basis_looking_at(&-plane.normal, &up_vector_for(&plane.normal));
            let transform = Transform3D::new(basis, center).scaled_local(Vec3::new(size, size, 1.0));
            let bounds = SphereBounds::new(center, size * std::f32::consts::FRAC_1_SQRT_2);
            d.instance(ShapeKind::Plane, transform, color, bounds, duration);
        });
    }

    /// Draw three crossing axis lines of length 1 under `transform`.
    pub fn draw_position(&self, transform: &Transform3D, color: Color, duration: f32) {
        let color = colors::or_default(color, colors::CRIMSON);
        let bounds = SphereBounds::new(transform.origin, transform.max_axis_length() * 0.5);
        self.draw(|d| d.instance(ShapeKind::Position, *transform, color, bounds, duration));
    }

    /// Draw the basis of `transform` as three arrows, red/green/blue unless
    /// `color` is set. Centered gizmos span from `-axis / 2` to `axis / 2`.
    pub fn draw_gizmo(&self, transform: &Transform3D, color: Color, is_centered: bool, duration: f32) {
        let origin = transform.origin;
        let axis_colors = [colors::AXIS_X, colors::AXIS_Y, colors::AXIS_Z];
        self.draw(|d| {
            for (i, axis_color) in axis_colors.iter().enumerate() {
                let axis = transform.axis(i);
                let (from, to) = if is_centered {
                    (origin - axis * 0.5, origin + axis * 0.5)
                } else {
                    (origin, origin + axis)
                };
                let c = colors::or_default(color, *axis_color);
                d.arrow(from, to, c, GIZMO_ARROW_SIZE, false, duration);
            }
        });
    }

    // -----------------------------------------------------------------------
    // Grids and frustums
    // -----------------------------------------------------------------------

    /// Draw a grid spanned by `x_size` and `y_size` with `subdivision` cells.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_grid(
        &self,
        origin: &Vec3,
        x_size: &Vec3,
        y_size: &Vec3,
        subdivision: (u32, u32),
        color: Color,
        is_centered: bool,
        duration: f32,
    ) {
        let color = colors::or_default(color, colors::WHITE);
        let points = grid_lines(origin, x_size, y_size, subdivision, is_centered);
        self.draw(|d| d.lines(points, color, duration));
    }

    /// Draw a grid on the local XZ plane of `transform`.
    pub fn draw_grid_xf(
        &self,
        transform: &Transform3D,
        subdivision: (u32, u32),
        color: Color,
        is_centered: bool,
        duration: f32,
    ) {
        self.draw_grid(
            &transform.origin,
            &transform.axis(0),
            &transform.axis(2),
            subdivision,
            color,
            is_centered,
            duration,
        );
    }

    /// Draw the outline of a camera frustum.
    pub fn draw_camera_frustum(&self, frustum: &Frustum, color: Color, duration: f32) {
        let color = colors::or_default(color, colors::FRUSTUM);
        let points = camera_frustum_lines(frustum);
        if points.is_empty() {
            log::debug!("Skipping degenerate camera frustum");
            return;
        }
        self.draw(|d| d.lines(points, color, duration));
    }

    /// Planes in `[near, far, left, top, right, bottom]` order.
    pub fn draw_camera_frustum_planes(&self, planes: &[Plane; 6], color: Color, duration: f32) {
        self.draw_camera_frustum(&Frustum::new(*planes), color, duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DrawerSettings;
    use crate::sink::RecordingSink;
    use debug_overlay_core::math::quat_from_xyzw;

    fn drawer() -> (DebugDrawer, RecordingSink) {
        let sink = RecordingSink::new();
        (DebugDrawer::new(DrawerSettings::default(), sink.clone()), sink)
    }

    #[test]
    fn test_draw_sphere_uses_default_color() {
        let (drawer, sink) = drawer();
        drawer.draw_sphere(&Vec3::zeros(), 0.5, colors::EMPTY, 0.0);
        drawer.process(0.016, &[]);

        let recorded = sink.snapshot();
        let instance = recorded.instances[ShapeKind::Sphere.index()][0];
        assert_eq!(instance.color, colors::CHARTREUSE);
        assert_eq!(instance.transform[0][0], 1.0);
    }

    #[test]
    fn test_hd_sphere_from_scope() {
        let (drawer, sink) = drawer();
        {
            let _scope = drawer.new_scoped_config().with_hd_sphere(true);
            drawer.draw_sphere(&Vec3::zeros(), 0.5, colors::EMPTY, 0.0);
        }
        drawer.draw_sphere(&Vec3::zeros(), 0.5, colors::EMPTY, 0.0);
        drawer.process(0.016, &[]);

        let recorded = sink.snapshot();
        assert_eq!(recorded.visible(ShapeKind::SphereHd), 1);
        assert_eq!(recorded.visible(ShapeKind::Sphere), 1);
    }

    #[test]
    fn test_thickness_switches_to_volumetric() {
        let (drawer, sink) = drawer();
        {
            let _scope = drawer
                .new_scoped_config()
                .with_thickness(0.1)
                .with_center_brightness(0.5);
            drawer.draw_box_xf(&Transform3D::identity(), colors::EMPTY, true, 0.0);
            drawer.draw_lines(
                &[Vec3::zeros(), Vec3::x(), Vec3::zeros(), Vec3::zeros()],
                colors::EMPTY,
                0.0,
            );
        }
        drawer.process(0.016, &[]);

        let recorded = sink.snapshot();
        assert_eq!(recorded.visible(ShapeKind::CubeCentered), 0);
        assert_eq!(recorded.visible(ShapeKind::CubeCenteredVolumetric), 1);
        // The zero-length pair is skipped
        assert_eq!(recorded.visible(ShapeKind::LineVolumetric), 1);
        assert!(recorded.lines.is_empty());
        let custom = recorded.instances[ShapeKind::CubeCenteredVolumetric.index()][0].custom;
        assert_eq!(custom, [0.1, 0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_thin_lines_go_to_line_buffer() {
        let (drawer, sink) = drawer();
        drawer.draw_line(&Vec3::zeros(), &Vec3::x(), colors::EMPTY, 0.0);
        drawer.draw_line_path(&[Vec3::zeros(), Vec3::x(), Vec3::y()], colors::BLUE, 0.0);
        drawer.process(0.016, &[]);

        let lines = sink.snapshot().lines;
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0].color, colors::RED);
    }

    #[test]
    fn test_arrow_tip_lands_on_target() {
        let (drawer, sink) = drawer();
        drawer.draw_arrow(&Vec3::zeros(), &Vec3::new(0.0, 0.0, -4.0), colors::EMPTY, 0.5, true, 0.0);
        drawer.process(0.016, &[]);

        let recorded = sink.snapshot();
        let head = recorded.instances[ShapeKind::ArrowHead.index()][0];
        // Base sits `arrow_size` before the tip
        assert!((head.origin() - Vec3::new(0.0, 0.0, -3.5)).norm() < 1e-5);
        assert_eq!(recorded.lines.len(), 2);
    }

    #[test]
    fn test_line_hit() {
        let (drawer, sink) = drawer();
        drawer.draw_line_hit_offset(
            &Vec3::zeros(),
            &Vec3::x(),
            true,
            0.5,
            0.25,
            colors::EMPTY,
            colors::EMPTY,
            0.0,
        );
        drawer.process(0.016, &[]);

        let recorded = sink.snapshot();
        assert_eq!(recorded.lines.len(), 4);
        assert_eq!(recorded.lines[0].color, DrawerConfig::default().line_hit_color);
        assert_eq!(recorded.lines[2].color, DrawerConfig::default().line_after_hit_color);
        assert_eq!(recorded.visible(ShapeKind::BillboardSquare), 1);
    }

    #[test]
    fn test_gizmo_draws_three_arrows() {
        let (drawer, sink) = drawer();
        drawer.draw_gizmo(&Transform3D::identity(), colors::EMPTY, true, 0.0);
        drawer.process(0.016, &[]);

        let recorded = sink.snapshot();
        assert_eq!(recorded.visible(ShapeKind::ArrowHead), 3);
        assert_eq!(recorded.lines.len(), 6);
        assert_eq!(recorded.lines[0].color, colors::AXIS_X);
    }

    #[test]
    fn test_plane_uses_camera_far_when_unsized() {
        let (drawer, sink) = drawer();
        let plane = Plane::from_point_normal(&Vec3::zeros(), &Vec3::y());
        drawer.draw_plane(&plane, colors::EMPTY, None, 0.0);
        {
            let _scope = drawer.new_scoped_config().with_plane_size(3.0);
            drawer.draw_plane(&plane, colors::EMPTY, Some(&Vec3::new(1.0, 5.0, 0.0)), 0.0);
        }
        drawer.process(0.016, &[]);

        let recorded = sink.snapshot();
        let planes = &recorded.instances[ShapeKind::Plane.index()];
        assert_eq!(planes.len(), 2);
        let sizes: Vec<f32> = planes
            .iter()
            .map(|p| Vec3::new(p.transform[0][0], p.transform[1][0], p.transform[2][0]).norm())
            .collect();
        assert!(sizes.iter().any(|s| (s - 2000.0).abs() < 1e-2));
        assert!(sizes.iter().any(|s| (s - 3.0).abs() < 1e-5));
        assert!(planes.iter().any(|p| (p.origin() - Vec3::new(1.0, 0.0, 0.0)).norm() < 1e-5));
    }

    #[test]
    fn test_box_variants() {
        let (drawer, sink) = drawer();
        drawer.draw_box(
            &Vec3::zeros(),
            quat_from_xyzw(0.0, 0.0, 0.0, 1.0),
            &Vec3::new(1.0, 2.0, 3.0),
            colors::EMPTY,
            false,
            0.0,
        );
        drawer.draw_aabb_ab(&Vec3::new(1.0, 1.0, 1.0), &Vec3::zeros(), colors::EMPTY, 0.0);
        drawer.draw_box_ab(&Vec3::zeros(), &Vec3::new(1.0, 1.0, 1.0), &Vec3::y(), colors::EMPTY, true, 0.0);
        drawer.draw_box_ab(&Vec3::zeros(), &Vec3::zeros(), &Vec3::y(), colors::EMPTY, true, 0.0);
        drawer.draw_box_ab(&Vec3::zeros(), &Vec3::x(), &Vec3::y(), colors::EMPTY, false, 0.0);
        drawer.process(0.016, &[]);

        let recorded = sink.snapshot();
        assert_eq!(recorded.visible(ShapeKind::Cube), 3);
        assert_eq!(recorded.visible(ShapeKind::CubeCentered), 1);
        let aabb = recorded.instances[ShapeKind::Cube.index()][1];
        assert_eq!(aabb.origin(), Vec3::zeros());
    }

    #[test]
    fn test_points_and_grid() {
        let (drawer, sink) = drawer();
        let path = [Vec3::zeros(), Vec3::x(), Vec3::y()];
        drawer.draw_point_path(&path, PointType::Sphere, 0.1, colors::EMPTY, colors::EMPTY, 0.0);
        drawer.draw_points(&path, PointType::Square, 0.1, colors::EMPTY, 0.0);
        drawer.draw_grid_xf(&Transform3D::identity(), (2, 2), colors::EMPTY, true, 0.0);
        drawer.process(0.016, &[]);

        let recorded = sink.snapshot();
        assert_eq!(recorded.visible(ShapeKind::Sphere), 3);
        assert_eq!(recorded.visible(ShapeKind::BillboardSquare), 3);
        // 2 path segments + 6 grid lines
        assert_eq!(recorded.lines.len(), (2 + 6) * 2);
    }

    #[test]
    fn test_grid_with_huge_subdivision_is_clamped() {
        let (drawer, sink) = drawer();
        drawer.draw_grid_xf(&Transform3D::identity(), (u32::MAX, u32::MAX), colors::EMPTY, false, 0.0);
        drawer.process(0.016, &[]);

        let cells = debug_overlay_core::mesh::generators::MAX_GRID_SUBDIVISION as usize;
        assert_eq!(sink.snapshot().lines.len(), (cells + 1) * 2 * 2);
    }

    #[test]
    fn test_camera_frustum() {
        let (drawer, sink) = drawer();
        let view_proj = debug_overlay_core::math::perspective_rh(1.0, 1.0, 0.5, 10.0);
        drawer.draw_camera_frustum(&Frustum::from_view_projection(&view_proj), colors::EMPTY, 0.0);
        drawer.process(0.016, &[]);
        let lines = sink.snapshot().lines;
        assert_eq!(lines.len(), 24);
        assert_eq!(lines[0].color, colors::FRUSTUM);
    }

    #[test]
    fn test_degenerate_inputs_draw_nothing() {
        let (drawer, sink) = drawer();
        drawer.draw_ray(&Vec3::zeros(), &Vec3::zeros(), 5.0, colors::EMPTY, 0.0);
        drawer.draw_arrow_ray(&Vec3::zeros(), &Vec3::zeros(), 5.0, colors::EMPTY, 0.5, false, 0.0);
        drawer.draw_lines(&[Vec3::zeros()], colors::EMPTY, 0.0);
        drawer.process(0.016, &[]);

        let stats = drawer.get_stats();
        assert_eq!(stats.total_created, 0);
        assert!(sink.snapshot().lines.is_empty());
    }
}
