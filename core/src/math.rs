//! Math type aliases, a Godot-style affine [`Transform3D`] and helpers.
//!
//! All rendering math is `f32` and built on `nalgebra`.

pub use nalgebra;

/// 2D vector (f32).
pub type Vec2 = nalgebra::Vector2<f32>;

/// 3D vector (f32).
pub type Vec3 = nalgebra::Vector3<f32>;

/// 4D vector (f32).
pub type Vec4 = nalgebra::Vector4<f32>;

/// 3x3 matrix (f32). Used as a transform basis: columns are the local axes.
pub type Mat3 = nalgebra::Matrix3<f32>;

/// 4x4 matrix (f32).
pub type Mat4 = nalgebra::Matrix4<f32>;

/// Quaternion (f32). Stored as `[x, y, z, w]` in memory.
/// Use [`quat_from_xyzw`] or `Quaternion::new(w, x, y, z)` to construct.
pub type Quat = nalgebra::Quaternion<f32>;

/// Squared length below which a direction is treated as zero.
const DEGENERATE_LENGTH_SQ: f32 = 1e-12;

/// An affine transform: a 3x3 basis (rotation and scale) plus an origin.
///
/// The basis columns are the transformed X, Y and Z axes, so scaling the
/// basis scales the shape along its own axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform3D {
    pub basis: Mat3,
    pub origin: Vec3,
}

impl Transform3D {
    /// Create a transform from a basis and an origin.
    pub fn new(basis: Mat3, origin: Vec3) -> Self {
        Self { basis, origin }
    }

    /// The identity transform.
    pub fn identity() -> Self {
        Self::new(Mat3::identity(), Vec3::zeros())
    }

    /// Translation-only transform.
    pub fn from_translation(origin: Vec3) -> Self {
        Self::new(Mat3::identity(), origin)
    }

    /// Build a transform from rotation, per-axis scale and translation.
    pub fn from_rotation_scale_translation(rotation: Quat, scale: Vec3, translation: Vec3) -> Self {
        let r = nalgebra::UnitQuaternion::new_normalize(rotation);
        let basis = r.to_rotation_matrix().into_inner() * Mat3::from_diagonal(&scale);
        Self::new(basis, translation)
    }

    /// Return a copy with the basis scaled along its local axes.
    pub fn scaled_local(&self, scale: Vec3) -> Self {
        Self::new(self.basis * Mat3::from_diagonal(&scale), self.origin)
    }

    /// Transform a point (applies basis and origin).
    pub fn transform_point(&self, point: &Vec3) -> Vec3 {
        self.basis * point + self.origin
    }

    /// Transform a direction (basis only).
    pub fn transform_vector(&self, vector: &Vec3) -> Vec3 {
        self.basis * vector
    }

    /// Local axis `index` (0 = X, 1 = Y, 2 = Z) in world space, including scale.
    pub fn axis(&self, index: usize) -> Vec3 {
        self.basis.column(index).into_owned()
    }

    /// Length of the longest basis axis.
    pub fn max_axis_length(&self) -> f32 {
        (0..3).map(|i| self.axis(i).norm()).fold(0.0, f32::max)
    }

    /// Row-major 3x4 matrix `[basis | origin]`, the layout instance buffers use.
    pub fn to_rows_3x4(&self) -> [[f32; 4]; 3] {
        let b = &self.basis;
        let o = &self.origin;
        [
            [b[(0, 0)], b[(0, 1)], b[(0, 2)], o.x],
            [b[(1, 0)], b[(1, 1)], b[(1, 2)], o.y],
            [b[(2, 0)], b[(2, 1)], b[(2, 2)], o.z],
        ]
    }

    /// Convert to a homogeneous 4x4 matrix.
    pub fn to_homogeneous(&self) -> Mat4 {
        let mut m = self.basis.to_homogeneous();
        m[(0, 3)] = self.origin.x;
        m[(1, 3)] = self.origin.y;
        m[(2, 3)] = self.origin.z;
        m
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

/// Pick an up vector that is not parallel to `direction`.
///
/// Returns +Y unless the direction is nearly vertical, in which case +Z.
pub fn up_vector_for(direction: &Vec3) -> Vec3 {
    let len = direction.norm();
    if len > 0.0 && (direction.y / len).abs() > 0.99 {
        Vec3::z()
    } else {
        Vec3::y()
    }
}

/// Basis whose -Z axis points along `direction`.
///
/// A zero or non-finite direction yields the identity basis. If `up` is
/// parallel to the direction, [`up_vector_for`] picks a replacement.
pub fn basis_looking_at(direction: &Vec3, up: &Vec3) -> Mat3 {
    let len_sq = direction.norm_squared();
    if len_sq <= DEGENERATE_LENGTH_SQ || !len_sq.is_finite() {
        return Mat3::identity();
    }
    let z = -direction / len_sq.sqrt();
    let mut x = up.cross(&z);
    if x.norm_squared() <= DEGENERATE_LENGTH_SQ {
        x = up_vector_for(direction).cross(&z);
    }
    let x = x.normalize();
    let y = z.cross(&x);
    Mat3::from_columns(&[x, y, z])
}

/// Build a right-handed perspective projection with depth range [0, 1] (wgpu/Vulkan convention).
pub fn perspective_rh(yfov: f32, aspect: f32, znear: f32, zfar: f32) -> Mat4 {
    let f = 1.0 / (yfov / 2.0).tan();
    let nf = 1.0 / (znear - zfar);
    #[rustfmt::skip]
    let result = Mat4::new(
        f / aspect, 0.0,  0.0,              0.0,
        0.0,        f,    0.0,              0.0,
        0.0,        0.0,  zfar * nf,        znear * zfar * nf,
        0.0,        0.0,  -1.0,             0.0,
    );
    result
}

/// Right-handed look-at view matrix.
pub fn look_at_rh(eye: &Vec3, target: &Vec3, up: &Vec3) -> Mat4 {
    let eye_point = nalgebra::Point3::from(*eye);
    let target_point = nalgebra::Point3::from(*target);
    nalgebra::Isometry3::look_at_rh(&eye_point, &target_point, up).to_homogeneous()
}

/// Create a quaternion from x, y, z, w components.
pub fn quat_from_xyzw(x: f32, y: f32, z: f32, w: f32) -> Quat {
    nalgebra::Quaternion::new(w, x, y, z)
}

/// Create a quaternion from rotation around an arbitrary axis.
///
/// A zero axis yields the identity rotation.
pub fn quat_from_axis_angle(axis: &Vec3, angle: f32) -> Quat {
    match nalgebra::Unit::try_new(*axis, f32::EPSILON) {
        Some(axis) => nalgebra::UnitQuaternion::from_axis_angle(&axis, angle).into_inner(),
        None => Quat::identity(),
    }
}

/// Create a quaternion from rotation around the X axis.
pub fn quat_from_rotation_x(angle: f32) -> Quat {
    nalgebra::UnitQuaternion::from_axis_angle(&nalgebra::Vector3::x_axis(), angle).into_inner()
}

/// Create a quaternion from rotation around the Y axis.
pub fn quat_from_rotation_y(angle: f32) -> Quat {
    nalgebra::UnitQuaternion::from_axis_angle(&nalgebra::Vector3::y_axis(), angle).into_inner()
}

/// Rotate a vector by a quaternion.
pub fn quat_rotate_vec3(q: Quat, v: Vec3) -> Vec3 {
    nalgebra::UnitQuaternion::new_normalize(q) * v
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn identity_transform_is_noop() {
        let t = Transform3D::identity();
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(t.transform_point(&p), p);
    }

    #[test]
    fn scaled_local_scales_axes() {
        let t = Transform3D::from_translation(Vec3::new(1.0, 0.0, 0.0))
            .scaled_local(Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(t.transform_point(&Vec3::new(1.0, 1.0, 1.0)), Vec3::new(3.0, 3.0, 4.0));
        assert!((t.max_axis_length() - 4.0).abs() < 1e-6);
    }

    #[test]
    fn rows_layout_puts_origin_last() {
        let t = Transform3D::from_translation(Vec3::new(5.0, 6.0, 7.0));
        let rows = t.to_rows_3x4();
        assert_eq!(rows[0], [1.0, 0.0, 0.0, 5.0]);
        assert_eq!(rows[1], [0.0, 1.0, 0.0, 6.0]);
        assert_eq!(rows[2], [0.0, 0.0, 1.0, 7.0]);
    }

    #[test]
    fn looking_at_points_negative_z() {
        let dir = Vec3::new(1.0, 0.0, 0.0);
        let basis = basis_looking_at(&dir, &Vec3::y());
        let forward = basis * Vec3::new(0.0, 0.0, -1.0);
        assert!((forward - dir).norm() < 1e-5);
        assert!((basis.determinant() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn looking_at_vertical_uses_fallback_up() {
        let dir = Vec3::new(0.0, 3.0, 0.0);
        let basis = basis_looking_at(&dir, &Vec3::y());
        let forward = basis * Vec3::new(0.0, 0.0, -1.0);
        assert!((forward - Vec3::y()).norm() < 1e-5);
        assert!(basis.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn looking_at_zero_is_identity() {
        assert_eq!(basis_looking_at(&Vec3::zeros(), &Vec3::y()), Mat3::identity());
    }

    #[test]
    fn rotation_y_90() {
        let q = quat_from_rotation_y(FRAC_PI_2);
        let v = quat_rotate_vec3(q, Vec3::new(1.0, 0.0, 0.0));
        assert!((v.x - 0.0).abs() < 1e-5);
        assert!((v.z - (-1.0)).abs() < 1e-5);
    }

    #[test]
    fn trs_transform_matches_components() {
        let t = Transform3D::from_rotation_scale_translation(
            quat_from_rotation_y(FRAC_PI_2),
            Vec3::new(2.0, 2.0, 2.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        let p = t.transform_point(&Vec3::new(1.0, 0.0, 0.0));
        assert!((p - Vec3::new(0.0, 1.0, -2.0)).norm() < 1e-5);
    }
}
