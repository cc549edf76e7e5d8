//! Mesh generators for debug shapes.
//!
//! Every function here is pure and deterministic. Wireframe generators return
//! [`PrimitiveTopology::LineList`] meshes, volumetric and solid generators
//! return [`PrimitiveTopology::TriangleList`] meshes. Degenerate parameters
//! (too few segments, zero-length edges) are clamped or skipped, never turned
//! into NaN geometry.

use std::collections::HashMap;
use std::f32::consts::{PI, TAU};

use super::data::{MeshData, MeshVertex, PrimitiveTopology};
use crate::bounds::Frustum;
use crate::math::{Vec3, quat_from_axis_angle, quat_rotate_vec3};

/// Minimum latitude count for [`sphere_lines`].
pub const MIN_SPHERE_LATS: u32 = 2;
/// Minimum longitude count for [`sphere_lines`].
pub const MIN_SPHERE_LONS: u32 = 4;
/// Minimum radial edge count for [`cylinder_lines`].
pub const MIN_CYLINDER_EDGES: u32 = 3;
/// Upper bound of each [`grid_lines`] subdivision.
pub const MAX_GRID_SUBDIVISION: u32 = 1024;

/// Half the diagonal of a unit cube; bounding radius of a unit box.
pub const CUBE_DIAGONAL_LENGTH_FOR_SPHERE: f32 = 0.866_025_4;

/// Segments shorter than this are dropped by the volumetric transform.
const MIN_SEGMENT_LENGTH: f32 = 1e-6;

const CUBE_VERTICES: [[f32; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 0.0, 1.0],
    [0.0, 0.0, 1.0],
    [0.0, 1.0, 0.0],
    [1.0, 1.0, 0.0],
    [1.0, 1.0, 1.0],
    [0.0, 1.0, 1.0],
];

#[rustfmt::skip]
const CUBE_INDICES: [u32; 24] = [
    // Bottom ring
    0, 1, 1, 2, 2, 3, 3, 0,
    // Top ring
    4, 5, 5, 6, 6, 7, 7, 4,
    // Vertical edges
    0, 4, 1, 5, 2, 6, 3, 7,
];

#[rustfmt::skip]
const CUBE_DIAGONAL_INDICES: [u32; 12] = [
    // Top and bottom
    1, 3, 4, 6,
    // Front and back
    1, 4, 3, 6,
    // Left and right
    3, 4, 1, 6,
];

const ARROWHEAD_VERTICES: [[f32; 3]; 6] = [
    [0.0, 0.0, -1.0],
    [0.0, 0.25, 0.0],
    [0.0, -0.25, 0.0],
    [0.25, 0.0, 0.0],
    [-0.25, 0.0, 0.0],
    // Inner point the base spokes meet at
    [0.0, 0.0, -0.2],
];

#[rustfmt::skip]
const ARROWHEAD_INDICES: [u32; 16] = [
    0, 1, 0, 2, 0, 3, 0, 4,
    5, 1, 5, 2, 5, 3, 5, 4,
];

const POSITION_VERTICES: [[f32; 3]; 6] = [
    [0.5, 0.0, 0.0],
    [-0.5, 0.0, 0.0],
    [0.0, 0.5, 0.0],
    [0.0, -0.5, 0.0],
    [0.0, 0.0, 0.5],
    [0.0, 0.0, -0.5],
];

const CENTERED_SQUARE_VERTICES: [[f32; 3]; 4] = [
    [0.5, 0.5, 0.0],
    [0.5, -0.5, 0.0],
    [-0.5, -0.5, 0.0],
    [-0.5, 0.5, 0.0],
];

const SQUARE_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];
const SQUARE_BACKWARDS_INDICES: [u32; 6] = [0, 2, 1, 2, 0, 3];

fn to_vec3(points: &[[f32; 3]]) -> Vec<Vec3> {
    points.iter().map(|p| Vec3::from(*p)).collect()
}

fn line_mesh(positions: &[Vec3], indices: &[u32], label: &str) -> MeshData {
    MeshData::from_positions(PrimitiveTopology::LineList, positions, indices).with_label(label)
}

/// Unit wireframe cube, 12 edges.
///
/// With `centered` the cube spans [-0.5, 0.5] on every axis, otherwise it is
/// anchored at its bottom corner and spans [0, 1].
pub fn cube_lines(centered: bool) -> MeshData {
    let offset = if centered { Vec3::repeat(0.5) } else { Vec3::zeros() };
    let positions: Vec<Vec3> = to_vec3(&CUBE_VERTICES).into_iter().map(|p| p - offset).collect();
    line_mesh(
        &positions,
        &CUBE_INDICES,
        if centered { "cube_centered" } else { "cube" },
    )
}

/// Unit wireframe cube with one diagonal across each face (18 edges).
pub fn cube_with_diagonals_lines(centered: bool) -> MeshData {
    let cube = cube_lines(centered);
    let indices: Vec<u32> = CUBE_INDICES
        .iter()
        .chain(CUBE_DIAGONAL_INDICES.iter())
        .copied()
        .collect();
    cube.with_indices(indices)
        .with_label("cube_with_diagonals")
}

/// Wireframe arrowhead pointing along -Z with its tip at `(0, 0, -1)`.
pub fn arrowhead_lines() -> MeshData {
    line_mesh(&to_vec3(&ARROWHEAD_VERTICES), &ARROWHEAD_INDICES, "arrowhead")
}

/// Three axis-aligned lines of length 1 crossing at the origin.
pub fn position_lines() -> MeshData {
    line_mesh(&to_vec3(&POSITION_VERTICES), &[0, 1, 2, 3, 4, 5], "position")
}

/// Single line from the origin to `(0, 0, -1)`.
pub fn line_segment() -> MeshData {
    line_mesh(&[Vec3::zeros(), Vec3::new(0.0, 0.0, -1.0)], &[0, 1], "line")
}

/// Unit square on the XY plane, centered at the origin.
///
/// `backwards` flips the winding so the square faces -Z (billboards).
pub fn centered_square(backwards: bool) -> MeshData {
    let normal = if backwards { -Vec3::z() } else { Vec3::z() };
    let vertices = to_vec3(&CENTERED_SQUARE_VERTICES)
        .into_iter()
        .map(|p| MeshVertex::new(p, normal, [p.x + 0.5, 0.5 - p.y]))
        .collect();
    let indices = if backwards {
        SQUARE_BACKWARDS_INDICES
    } else {
        SQUARE_INDICES
    };
    MeshData::new(PrimitiveTopology::TriangleList)
        .with_vertices(vertices)
        .with_indices(indices.to_vec())
        .with_label(if backwards { "billboard_square" } else { "plane" })
}

/// Wireframe UV sphere made of latitude rings and longitude meridians.
///
/// `lats` is clamped to at least [`MIN_SPHERE_LATS`] and `lons` to at least
/// [`MIN_SPHERE_LONS`].
pub fn sphere_lines(lats: u32, lons: u32, radius: f32) -> MeshData {
    if lats < MIN_SPHERE_LATS || lons < MIN_SPHERE_LONS {
        log::debug!("Sphere tessellation {lats}x{lons} raised to the minimum");
    }
    let lats = lats.max(MIN_SPHERE_LATS);
    let lons = lons.max(MIN_SPHERE_LONS);

    let mut positions = Vec::with_capacity(((lats + 1) * lons) as usize);
    for ring in 0..=lats {
        let theta = PI * (-0.5 + ring as f32 / lats as f32);
        let (y, ring_radius) = theta.sin_cos();
        for segment in 0..lons {
            let phi = TAU * segment as f32 / lons as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();
            positions.push(Vec3::new(cos_phi * ring_radius, y, sin_phi * ring_radius) * radius);
        }
    }

    let vertex = |ring: u32, segment: u32| ring * lons + segment % lons;
    let mut indices = Vec::with_capacity(((2 * lats - 1) * lons * 2) as usize);
    // Rings, skipping the degenerate pole rings
    for ring in 1..lats {
        for segment in 0..lons {
            indices.push(vertex(ring, segment));
            indices.push(vertex(ring, segment + 1));
        }
    }
    // Meridians
    for segment in 0..lons {
        for ring in 0..lats {
            indices.push(vertex(ring, segment));
            indices.push(vertex(ring + 1, segment));
        }
    }

    line_mesh(&positions, &indices, "sphere")
}

/// Wireframe icosphere: an icosahedron subdivided `subdivisions` times.
///
/// Subdivision `n` has `10 * 4^n + 2` vertices and `30 * 4^n` edges.
pub fn icosphere_lines(radius: f32, subdivisions: u32) -> MeshData {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let mut positions: Vec<Vec3> = [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ]
    .iter()
    .map(|p| Vec3::from(*p).normalize())
    .collect();

    #[rustfmt::skip]
    let mut faces: Vec<[u32; 3]> = vec![
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ];

    for _ in 0..subdivisions {
        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
        let mut midpoint = |a: u32, b: u32, positions: &mut Vec<Vec3>| -> u32 {
            let key = (a.min(b), a.max(b));
            *midpoints.entry(key).or_insert_with(|| {
                let p = ((positions[a as usize] + positions[b as usize]) * 0.5).normalize();
                positions.push(p);
                positions.len() as u32 - 1
            })
        };
        let mut next = Vec::with_capacity(faces.len() * 4);
        for [a, b, c] in faces {
            let ab = midpoint(a, b, &mut positions);
            let bc = midpoint(b, c, &mut positions);
            let ca = midpoint(c, a, &mut positions);
            next.extend_from_slice(&[[a, ab, ca], [b, bc, ab], [c, ca, bc], [ab, bc, ca]]);
        }
        faces = next;
    }

    let mut edges: Vec<(u32, u32)> = faces
        .iter()
        .flat_map(|[a, b, c]| [(*a, *b), (*b, *c), (*c, *a)])
        .map(|(a, b)| (a.min(b), a.max(b)))
        .collect();
    edges.sort_unstable();
    edges.dedup();

    let indices: Vec<u32> = edges.iter().flat_map(|(a, b)| [*a, *b]).collect();
    let positions: Vec<Vec3> = positions.into_iter().map(|p| p * radius).collect();
    line_mesh(&positions, &indices, "icosphere")
}

/// Wireframe vertical cylinder centered at the origin.
///
/// Draws the top and bottom rings plus a vertical edge every
/// `draw_edge_each_n_step` radial steps. `edges` is clamped to at least
/// [`MIN_CYLINDER_EDGES`] and the step to at least 1.
pub fn cylinder_lines(edges: u32, radius: f32, height: f32, draw_edge_each_n_step: u32) -> MeshData {
    let edges = edges.max(MIN_CYLINDER_EDGES);
    let step = draw_edge_each_n_step.max(1);
    let half_height = height * 0.5;

    let mut positions = Vec::with_capacity(edges as usize * 2);
    for y in [half_height, -half_height] {
        for i in 0..edges {
            let angle = TAU * i as f32 / edges as f32;
            let (sin, cos) = angle.sin_cos();
            positions.push(Vec3::new(sin * radius, y, cos * radius));
        }
    }

    let top = |i: u32| i % edges;
    let bottom = |i: u32| edges + i % edges;
    let mut indices = Vec::new();
    for i in 0..edges {
        indices.extend_from_slice(&[top(i), top(i + 1), bottom(i), bottom(i + 1)]);
        if i % step == 0 {
            indices.extend_from_slice(&[top(i), bottom(i)]);
        }
    }

    line_mesh(&positions, &indices, "cylinder")
}

/// Copy of `mesh` rotated by `angle` radians around `axis`.
pub fn rotated(mesh: &MeshData, axis: &Vec3, angle: f32) -> MeshData {
    let rotation = quat_from_axis_angle(axis, angle);
    let mut out = mesh.clone();
    for v in out.vertices_mut() {
        let position = quat_rotate_vec3(rotation, v.position());
        let normal = quat_rotate_vec3(rotation, v.normal());
        *v = MeshVertex::new(position, normal, v.uv);
    }
    out
}

/// Unit vector perpendicular to `dir` (which must be normalized).
fn any_orthogonal(dir: &Vec3) -> Vec3 {
    let helper = if dir.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
    dir.cross(&helper).normalize()
}

/// Thicken a wireframe into a triangulated tube mesh.
///
/// Each segment becomes a four-sided prism whose vertices sit on the segment
/// endpoints and carry their expansion direction in `normal`; the renderer
/// pushes them outward by the line thickness. With `add_bevel` every segment
/// end also gets a pyramid cap. Zero-length segments are dropped.
///
/// Per segment: 8 vertices and 24 indices, plus 2 vertices and 24 indices
/// with bevel caps.
pub fn convert_wireframe_to_volumetric(mesh: &MeshData, add_bevel: bool) -> MeshData {
    let segments = mesh.line_segments();
    let mut vertices = Vec::with_capacity(segments.len() * 10);
    let mut indices = Vec::with_capacity(segments.len() * 48);

    for (a, b) in segments {
        let delta = b - a;
        let length = delta.norm();
        if length < MIN_SEGMENT_LENGTH || !length.is_finite() {
            continue;
        }
        let dir = delta / length;
        let u = any_orthogonal(&dir);
        let v = dir.cross(&u);
        let sides = [u, v, -u, -v];

        let base = vertices.len() as u32;
        for (k, side) in sides.iter().enumerate() {
            let marker = (k % 2) as f32;
            vertices.push(MeshVertex::new(a, *side, [0.0, marker]));
            vertices.push(MeshVertex::new(b, *side, [1.0, marker]));
        }
        let start = |k: usize| base + (k % 4) as u32 * 2;
        let end = |k: usize| base + (k % 4) as u32 * 2 + 1;
        for k in 0..4 {
            indices.extend_from_slice(&[start(k), end(k), end(k + 1)]);
            indices.extend_from_slice(&[start(k), end(k + 1), start(k + 1)]);
        }

        if add_bevel {
            let cap_start = vertices.len() as u32;
            vertices.push(MeshVertex::new(a, -dir, [0.0, 0.5]));
            let cap_end = cap_start + 1;
            vertices.push(MeshVertex::new(b, dir, [1.0, 0.5]));
            for k in 0..4 {
                indices.extend_from_slice(&[cap_start, start(k + 1), start(k)]);
                indices.extend_from_slice(&[cap_end, end(k), end(k + 1)]);
            }
        }
    }

    let label = format!("{}_volumetric", mesh.label().unwrap_or("mesh"));
    MeshData::new(PrimitiveTopology::TriangleList)
        .with_vertices(vertices)
        .with_indices(indices)
        .with_label(label)
}

/// Solid four-sided arrowhead pointing along -Z, tip at `(0, 0, -length)`.
///
/// Base corners expand radially, the tip expands forward. With `add_bevel`
/// the base is closed by a center vertex that expands backwards, otherwise by
/// two flat triangles.
pub fn volumetric_arrowhead(radius: f32, length: f32, add_bevel: bool) -> MeshData {
    let radius = radius.abs();
    let length = length.abs();
    let tip = Vec3::new(0.0, 0.0, -length);
    let corners = [Vec3::x(), Vec3::y(), -Vec3::x(), -Vec3::y()];

    let mut vertices = vec![MeshVertex::new(tip, -Vec3::z(), [1.0, 0.5])];
    for (k, dir) in corners.iter().enumerate() {
        vertices.push(MeshVertex::new(dir * radius, *dir, [0.0, (k % 2) as f32]));
    }
    let corner = |k: usize| 1 + (k % 4) as u32;

    let mut indices = Vec::with_capacity(24);
    for k in 0..4 {
        indices.extend_from_slice(&[0, corner(k), corner(k + 1)]);
    }
    if add_bevel {
        let center = vertices.len() as u32;
        vertices.push(MeshVertex::new(Vec3::zeros(), Vec3::z(), [0.0, 0.5]));
        for k in 0..4 {
            indices.extend_from_slice(&[center, corner(k + 1), corner(k)]);
        }
    } else {
        indices.extend_from_slice(&[corner(0), corner(2), corner(1), corner(0), corner(3), corner(2)]);
    }

    MeshData::new(PrimitiveTopology::TriangleList)
        .with_vertices(vertices)
        .with_indices(indices)
        .with_label("arrowhead_volumetric")
}

/// Line-list points outlining a camera frustum (12 edges, 24 points).
///
/// Returns an empty list when the planes do not enclose a finite volume.
pub fn camera_frustum_lines(frustum: &Frustum) -> Vec<Vec3> {
    let Some(corners) = frustum.corners() else {
        return Vec::new();
    };
    CUBE_INDICES.iter().map(|i| corners[*i as usize]).collect()
}

/// Line-list points connecting consecutive points of `path`.
///
/// Paths with fewer than two points produce no lines.
pub fn lines_from_path(path: &[Vec3]) -> Vec<Vec3> {
    path.windows(2).flat_map(|pair| [pair[0], pair[1]]).collect()
}

/// Line-list points of a grid spanned by `x_size` and `y_size`.
///
/// The grid has `subdivision.0` cells along X and `subdivision.1` along Y
/// (each clamped to at least 1). With `centered` the grid is centered on
/// `origin`, otherwise `origin` is its corner.
pub fn grid_lines(
    origin: &Vec3,
    x_size: &Vec3,
    y_size: &Vec3,
    subdivision: (u32, u32),
    centered: bool,
) -> Vec<Vec3> {
    let cells_x = subdivision.0.clamp(1, MAX_GRID_SUBDIVISION);
    let cells_y = subdivision.1.clamp(1, MAX_GRID_SUBDIVISION);
    if (cells_x, cells_y) != subdivision {
        log::warn!(
            "Grid subdivision {:?} clamped to ({cells_x}, {cells_y})",
            subdivision
        );
    }
    let corner = if centered {
        origin - (x_size + y_size) * 0.5
    } else {
        *origin
    };

    let mut points = Vec::with_capacity((cells_x as usize + cells_y as usize + 2) * 2);
    for i in 0..=cells_x {
        let start = corner + x_size * (i as f32 / cells_x as f32);
        points.push(start);
        points.push(start + y_size);
    }
    for j in 0..=cells_y {
        let start = corner + y_size * (j as f32 / cells_y as f32);
        points.push(start);
        points.push(start + x_size);
    }
    points
}
