use std::f32::consts::FRAC_PI_2;

use debug_overlay_core::math::Vec3;
use debug_overlay_core::mesh::MeshData;
use debug_overlay_core::mesh::generators::{
    arrowhead_lines, centered_square, convert_wireframe_to_volumetric, cube_lines,
    cylinder_lines, icosphere_lines, line_segment, position_lines, rotated, sphere_lines,
    volumetric_arrowhead,
};

use crate::config::MeshSettings;
use crate::shape::ShapeKind;

/// Radius of a sphere around the origin enclosing every unit shape mesh.
pub const UNIT_SHAPE_BOUNDING_RADIUS: f32 = 1.732_050_8;

const SPHERE_RADIUS: f32 = 0.5;
const SPHERE_LATS_LONS: u32 = 8;
const SPHERE_HD_LATS_LONS: u32 = 16;
const ICOSPHERE_SUBDIVISIONS: u32 = 1;
const ICOSPHERE_HD_SUBDIVISIONS: u32 = 2;
const CYLINDER_EDGES: u32 = 16;
const CYLINDER_VERTICAL_EDGE_STEP: u32 = 2;

/// One shared mesh per [`ShapeKind`], indexed by [`ShapeKind::index`].
#[derive(Debug, Clone)]
pub struct ShapeMeshes {
    meshes: Vec<MeshData>,
}

impl ShapeMeshes {
    pub fn generate(settings: &MeshSettings) -> Self {
        let bevel = settings.add_bevel_to_volumetric;

        let sphere = if settings.use_icosphere {
            icosphere_lines(SPHERE_RADIUS, ICOSPHERE_SUBDIVISIONS)
        } else {
            sphere_lines(SPHERE_LATS_LONS, SPHERE_LATS_LONS, SPHERE_RADIUS)
        };
        let sphere_hd = if settings.use_icosphere_hd {
            icosphere_lines(SPHERE_RADIUS, ICOSPHERE_HD_SUBDIVISIONS)
        } else {
            sphere_lines(SPHERE_HD_LATS_LONS, SPHERE_HD_LATS_LONS, SPHERE_RADIUS)
        };
        let cylinder = cylinder_lines(CYLINDER_EDGES, 0.5, 1.0, CYLINDER_VERTICAL_EDGE_STEP);
        let cylinder_ab = rotated(&cylinder, &Vec3::x(), FRAC_PI_2).with_label("cylinder_ab");

        let meshes = ShapeKind::ALL
            .iter()
            .map(|kind| match kind {
                ShapeKind::Cube => cube_lines(false),
                ShapeKind::CubeCentered => cube_lines(true),
                ShapeKind::ArrowHead => arrowhead_lines(),
                ShapeKind::Position => position_lines(),
                ShapeKind::Sphere => sphere.clone(),
                ShapeKind::SphereHd => sphere_hd.clone(),
                ShapeKind::Cylinder => cylinder.clone(),
                ShapeKind::CylinderAb => cylinder_ab.clone(),
                ShapeKind::LineVolumetric => convert_wireframe_to_volumetric(&line_segment(), bevel),
                ShapeKind::CubeVolumetric => convert_wireframe_to_volumetric(&cube_lines(false), bevel),
                ShapeKind::CubeCenteredVolumetric => {
                    convert_wireframe_to_volumetric(&cube_lines(true), bevel)
                }
                ShapeKind::ArrowHeadVolumetric => volumetric_arrowhead(0.25, 1.0, bevel),
                ShapeKind::PositionVolumetric => {
                    convert_wireframe_to_volumetric(&position_lines(), bevel)
                }
                ShapeKind::SphereVolumetric => convert_wireframe_to_volumetric(&sphere, bevel),
                ShapeKind::SphereHdVolumetric => convert_wireframe_to_volumetric(&sphere_hd, bevel),
                ShapeKind::CylinderVolumetric => convert_wireframe_to_volumetric(&cylinder, bevel),
                ShapeKind::CylinderAbVolumetric => {
                    convert_wireframe_to_volumetric(&cylinder_ab, bevel)
                }
                ShapeKind::BillboardSquare => centered_square(true),
                ShapeKind::Plane => centered_square(false),
            })
            .collect();

        Self { meshes }
    }

    pub fn get(&self, kind: ShapeKind) -> &MeshData {
        &self.meshes[kind.index()]
    }

    pub fn as_slice(&self) -> &[MeshData] {
        &self.meshes
    }
}
