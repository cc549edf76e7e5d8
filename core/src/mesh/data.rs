//! CPU-side mesh data structures.

use crate::math::Vec3;

/// Primitive topology describing how vertices are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveTopology {
    /// Every two vertices form a line.
    LineList,
    /// Every three vertices form a triangle.
    #[default]
    TriangleList,
}

impl PrimitiveTopology {
    /// Get the number of vertices per primitive.
    pub fn vertices_per_primitive(&self) -> u32 {
        match self {
            Self::LineList => 2,
            Self::TriangleList => 3,
        }
    }
}

/// Vertex used by every generated mesh: position + normal + uv (32 bytes).
///
/// For volumetric meshes `normal` is the expansion direction the renderer
/// scales by line thickness, and `uv.x` runs from 0 at a segment start to 1
/// at its end.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    pub fn new(position: Vec3, normal: Vec3, uv: [f32; 2]) -> Self {
        Self {
            position: position.into(),
            normal: normal.into(),
            uv,
        }
    }

    /// A vertex with only a position.
    pub fn at(position: Vec3) -> Self {
        Self::new(position, Vec3::zeros(), [0.0, 0.0])
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from(self.position)
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::from(self.normal)
    }
}

/// CPU-side mesh: vertices, optional indices and topology.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    topology: PrimitiveTopology,
    vertices: Vec<MeshVertex>,
    indices: Vec<u32>,
    label: Option<String>,
}

impl MeshData {
    /// Create an empty mesh with the given topology.
    pub fn new(topology: PrimitiveTopology) -> Self {
        Self {
            topology,
            ..Default::default()
        }
    }

    /// Build a mesh from bare positions.
    pub fn from_positions(topology: PrimitiveTopology, positions: &[Vec3], indices: &[u32]) -> Self {
        Self::new(topology)
            .with_vertices(positions.iter().copied().map(MeshVertex::at).collect())
            .with_indices(indices.to_vec())
    }

    pub fn with_vertices(mut self, vertices: Vec<MeshVertex>) -> Self {
        self.vertices = vertices;
        self
    }

    pub fn with_indices(mut self, indices: Vec<u32>) -> Self {
        self.indices = indices;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    pub fn vertices(&self) -> &[MeshVertex] {
        &self.vertices
    }

    pub fn vertices_mut(&mut self) -> &mut [MeshVertex] {
        &mut self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn is_indexed(&self) -> bool {
        !self.indices.is_empty()
    }

    /// Number of lines or triangles the mesh draws.
    pub fn primitive_count(&self) -> u32 {
        let elements = if self.is_indexed() {
            self.index_count()
        } else {
            self.vertex_count()
        };
        elements / self.topology.vertices_per_primitive()
    }

    /// Raw vertex bytes ready for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw index bytes (u32) ready for upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Resolve the line segments of a [`PrimitiveTopology::LineList`] mesh.
    ///
    /// Returns an empty list for triangle meshes.
    pub fn line_segments(&self) -> Vec<(Vec3, Vec3)> {
        if self.topology != PrimitiveTopology::LineList {
            return Vec::new();
        }
        let position = |i: u32| self.vertices.get(i as usize).map(MeshVertex::position);
        let order: Vec<u32> = if self.is_indexed() {
            self.indices.clone()
        } else {
            (0..self.vertex_count()).collect()
        };
        order
            .chunks_exact(2)
            .filter_map(|pair| Some((position(pair[0])?, position(pair[1])?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_size() {
        assert_eq!(std::mem::size_of::<MeshVertex>(), 32);
    }

    #[test]
    fn test_primitive_count_indexed_and_flat() {
        let points = [Vec3::zeros(), Vec3::x(), Vec3::y()];
        let indexed = MeshData::from_positions(PrimitiveTopology::LineList, &points, &[0, 1, 1, 2]);
        assert_eq!(indexed.primitive_count(), 2);

        let flat = MeshData::from_positions(PrimitiveTopology::TriangleList, &points, &[]);
        assert!(!flat.is_indexed());
        assert_eq!(flat.primitive_count(), 1);
    }

    #[test]
    fn test_line_segments_resolve_indices() {
        let points = [Vec3::zeros(), Vec3::x(), Vec3::y()];
        let mesh = MeshData::from_positions(PrimitiveTopology::LineList, &points, &[0, 2, 2, 1]);
        let segments = mesh.line_segments();
        assert_eq!(segments, vec![(Vec3::zeros(), Vec3::y()), (Vec3::y(), Vec3::x())]);
    }

    #[test]
    fn test_byte_views() {
        let mesh = MeshData::from_positions(
            PrimitiveTopology::LineList,
            &[Vec3::zeros(), Vec3::x()],
            &[0, 1],
        );
        assert_eq!(mesh.vertex_bytes().len(), 2 * 32);
        assert_eq!(mesh.index_bytes().len(), 2 * 4);
    }
}
