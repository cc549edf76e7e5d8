//! Bounding volumes and view frustums used for visibility culling.
//!
//! Planes use inward-facing normals: a point `p` is on the inside of a
//! [`Plane`] when `normal · p + d >= 0`. A [`Frustum`] is the intersection of
//! the inside half-spaces of its six planes.

use crate::math::{Mat4, Vec3, Vec4};

/// Denominator below which three planes are treated as having no single intersection.
const PLANE_INTERSECTION_EPSILON: f32 = 1e-8;

/// An oriented plane `normal · p + d = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub d: f32,
}

impl Plane {
    /// Create a plane, normalizing the equation when the normal is non-zero.
    pub fn new(normal: Vec3, d: f32) -> Self {
        let len = normal.norm();
        if len > f32::EPSILON && len.is_finite() {
            Self {
                normal: normal / len,
                d: d / len,
            }
        } else {
            Self { normal, d }
        }
    }

    /// Plane through `point` facing along `normal`.
    pub fn from_point_normal(point: &Vec3, normal: &Vec3) -> Self {
        let n = normal.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::y);
        Self::new(n, -n.dot(point))
    }

    fn from_coefficients(v: Vec4) -> Self {
        Self::new(Vec3::new(v.x, v.y, v.z), v.w)
    }

    /// Signed distance from the plane; positive on the inside.
    pub fn signed_distance(&self, point: &Vec3) -> f32 {
        self.normal.dot(point) + self.d
    }

    /// Orthogonal projection of `point` onto the plane.
    pub fn project(&self, point: &Vec3) -> Vec3 {
        point - self.normal * self.signed_distance(point)
    }

    /// Point shared by three planes, or `None` when any two are parallel.
    pub fn intersect_3(a: &Plane, b: &Plane, c: &Plane) -> Option<Vec3> {
        let bc = b.normal.cross(&c.normal);
        let denom = a.normal.dot(&bc);
        if denom.abs() < PLANE_INTERSECTION_EPSILON || !denom.is_finite() {
            return None;
        }
        let ca = c.normal.cross(&a.normal);
        let ab = a.normal.cross(&b.normal);
        Some((bc * -a.d + ca * -b.d + ab * -c.d) / denom)
    }
}

/// A bounding sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereBounds {
    pub center: Vec3,
    pub radius: f32,
}

impl SphereBounds {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius: radius.abs(),
        }
    }
}

impl Default for SphereBounds {
    fn default() -> Self {
        Self::new(Vec3::zeros(), 0.0)
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.inf(&max),
            max: min.sup(&max),
        }
    }

    /// Smallest box containing all `points`. An empty slice gives a zero box at the origin.
    pub fn from_points(points: &[Vec3]) -> Self {
        let Some(first) = points.first() else {
            return Self::new(Vec3::zeros(), Vec3::zeros());
        };
        points.iter().skip(1).fold(Self::new(*first, *first), |acc, p| Self {
            min: acc.min.inf(p),
            max: acc.max.sup(p),
        })
    }

    /// Return the box grown by `margin` on every side.
    pub fn grown(&self, margin: f32) -> Self {
        let m = Vec3::repeat(margin.max(0.0));
        Self {
            min: self.min - m,
            max: self.max + m,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Euclidean distance from `point` to the box; zero inside.
    pub fn distance_to_point(&self, point: &Vec3) -> f32 {
        let clamped = point.sup(&self.min).inf(&self.max);
        (point - clamped).norm()
    }

    /// Sphere enclosing the box.
    pub fn bounding_sphere(&self) -> SphereBounds {
        SphereBounds::new(self.center(), self.size().norm() * 0.5)
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::new(Vec3::zeros(), Vec3::zeros())
    }
}

/// A view frustum defined by six inward-facing planes.
///
/// Plane order is `[near, far, left, top, right, bottom]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    pub const NEAR: usize = 0;
    pub const FAR: usize = 1;
    pub const LEFT: usize = 2;
    pub const TOP: usize = 3;
    pub const RIGHT: usize = 4;
    pub const BOTTOM: usize = 5;

    pub fn new(planes: [Plane; 6]) -> Self {
        Self { planes }
    }

    /// Extract the planes of a view-projection matrix with depth range [0, 1]
    /// (Gribb-Hartmann).
    pub fn from_view_projection(view_proj: &Mat4) -> Self {
        let row = |i: usize| -> Vec4 { view_proj.row(i).transpose() };
        let (r0, r1, r2, r3) = (row(0), row(1), row(2), row(3));
        Self::new([
            Plane::from_coefficients(r2),
            Plane::from_coefficients(r3 - r2),
            Plane::from_coefficients(r3 + r0),
            Plane::from_coefficients(r3 - r1),
            Plane::from_coefficients(r3 - r0),
            Plane::from_coefficients(r3 + r1),
        ])
    }

    /// Whether the sphere is at least partially inside.
    pub fn intersects_sphere(&self, sphere: &SphereBounds) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.signed_distance(&sphere.center) >= -sphere.radius)
    }

    /// Whether the box is at least partially inside.
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        self.planes.iter().all(|plane| {
            // Corner furthest along the plane normal.
            let p = Vec3::new(
                if plane.normal.x >= 0.0 { aabb.max.x } else { aabb.min.x },
                if plane.normal.y >= 0.0 { aabb.max.y } else { aabb.min.y },
                if plane.normal.z >= 0.0 { aabb.max.z } else { aabb.min.z },
            );
            plane.signed_distance(&p) >= 0.0
        })
    }

    /// The eight corners: near `[top-left, top-right, bottom-right, bottom-left]`
    /// followed by far in the same order.
    ///
    /// Returns `None` when the planes do not enclose a finite volume.
    pub fn corners(&self) -> Option<[Vec3; 8]> {
        let p = &self.planes;
        let corner = |depth: usize, vertical: usize, horizontal: usize| {
            Plane::intersect_3(&p[depth], &p[vertical], &p[horizontal])
        };
        Some([
            corner(Self::NEAR, Self::TOP, Self::LEFT)?,
            corner(Self::NEAR, Self::TOP, Self::RIGHT)?,
            corner(Self::NEAR, Self::BOTTOM, Self::RIGHT)?,
            corner(Self::NEAR, Self::BOTTOM, Self::LEFT)?,
            corner(Self::FAR, Self::TOP, Self::LEFT)?,
            corner(Self::FAR, Self::TOP, Self::RIGHT)?,
            corner(Self::FAR, Self::BOTTOM, Self::RIGHT)?,
            corner(Self::FAR, Self::BOTTOM, Self::LEFT)?,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{look_at_rh, perspective_rh};
    use std::f32::consts::FRAC_PI_2;

    fn camera_at_z5() -> Frustum {
        let proj = perspective_rh(FRAC_PI_2, 1.0, 0.1, 100.0);
        let view = look_at_rh(&Vec3::new(0.0, 0.0, 5.0), &Vec3::zeros(), &Vec3::y());
        Frustum::from_view_projection(&(proj * view))
    }

    #[test]
    fn plane_signed_distance_and_projection() {
        let plane = Plane::from_point_normal(&Vec3::new(0.0, 2.0, 0.0), &Vec3::new(0.0, 5.0, 0.0));
        assert!((plane.signed_distance(&Vec3::new(0.0, 3.0, 0.0)) - 1.0).abs() < 1e-6);
        let projected = plane.project(&Vec3::new(4.0, -1.0, 2.0));
        assert!((projected - Vec3::new(4.0, 2.0, 2.0)).norm() < 1e-6);
    }

    #[test]
    fn intersect_three_axis_planes() {
        let x = Plane::from_point_normal(&Vec3::new(1.0, 0.0, 0.0), &Vec3::x());
        let y = Plane::from_point_normal(&Vec3::new(0.0, 2.0, 0.0), &Vec3::y());
        let z = Plane::from_point_normal(&Vec3::new(0.0, 0.0, 3.0), &Vec3::z());
        let p = Plane::intersect_3(&x, &y, &z).unwrap();
        assert!((p - Vec3::new(1.0, 2.0, 3.0)).norm() < 1e-5);
    }

    #[test]
    fn parallel_planes_have_no_intersection() {
        let a = Plane::from_point_normal(&Vec3::zeros(), &Vec3::x());
        let b = Plane::from_point_normal(&Vec3::new(1.0, 0.0, 0.0), &Vec3::x());
        let c = Plane::from_point_normal(&Vec3::zeros(), &Vec3::y());
        assert!(Plane::intersect_3(&a, &b, &c).is_none());
    }

    #[test]
    fn aabb_from_points_and_distance() {
        let aabb = Aabb::from_points(&[
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(-1.0, 2.0, 0.5),
            Vec3::new(0.0, 0.0, -3.0),
        ]);
        assert_eq!(aabb.min, Vec3::new(-1.0, -1.0, -3.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 2.0, 0.5));
        assert_eq!(aabb.distance_to_point(&Vec3::zeros()), 0.0);
        assert!((aabb.distance_to_point(&Vec3::new(4.0, 0.0, 0.0)) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn frustum_contains_point_in_front() {
        let frustum = camera_at_z5();
        assert!(frustum.intersects_sphere(&SphereBounds::new(Vec3::zeros(), 0.5)));
        assert!(frustum.intersects_aabb(&Aabb::new(Vec3::repeat(-0.5), Vec3::repeat(0.5))));
    }

    #[test]
    fn frustum_rejects_point_behind_camera() {
        let frustum = camera_at_z5();
        assert!(!frustum.intersects_sphere(&SphereBounds::new(Vec3::new(0.0, 0.0, 10.0), 0.5)));
        assert!(!frustum.intersects_aabb(&Aabb::new(
            Vec3::new(-0.5, -0.5, 9.5),
            Vec3::new(0.5, 0.5, 10.5)
        )));
    }

    #[test]
    fn frustum_accepts_partially_inside_sphere() {
        let frustum = camera_at_z5();
        // Centre just behind the near plane, radius reaches into the volume.
        assert!(frustum.intersects_sphere(&SphereBounds::new(Vec3::new(0.0, 0.0, 5.0), 1.0)));
    }

    #[test]
    fn frustum_corners_are_finite() {
        let corners = camera_at_z5().corners().unwrap();
        for c in &corners {
            assert!(c.iter().all(|v| v.is_finite()));
        }
        // Far corners lie ~100 units in front of the camera.
        assert!((corners[4].z - (5.0 - 100.0)).abs() < 0.5);
    }
}
