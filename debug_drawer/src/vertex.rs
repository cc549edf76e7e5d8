use debug_overlay_core::math::{Transform3D, Vec3};

/// A line vertex: position + color.
///
/// Used for the shared line-list buffer. Every pair of consecutive vertices
/// forms one line segment.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl LineVertex {
    pub fn new(position: &Vec3, color: [f32; 4]) -> Self {
        Self {
            position: (*position).into(),
            color,
        }
    }
}

/// Per-instance data uploaded for every visible instanced shape.
///
/// `transform` holds the first three rows of the affine matrix. `custom`
/// carries `(thickness, center_brightness, 0, 0)` for volumetric kinds.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceData {
    pub transform: [[f32; 4]; 3],
    pub color: [f32; 4],
    pub custom: [f32; 4],
}

impl InstanceData {
    pub fn new(transform: &Transform3D, color: [f32; 4], custom: [f32; 4]) -> Self {
        Self {
            transform: transform.to_rows_3x4(),
            color,
            custom,
        }
    }

    /// Translation column of the stored transform.
    pub fn origin(&self) -> Vec3 {
        Vec3::new(
            self.transform[0][3],
            self.transform[1][3],
            self.transform[2][3],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_sizes() {
        assert_eq!(std::mem::size_of::<LineVertex>(), 28);
        assert_eq!(std::mem::size_of::<InstanceData>(), 80);
    }

    #[test]
    fn test_instance_origin() {
        let xf = Transform3D::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let data = InstanceData::new(&xf, [1.0; 4], [0.0; 4]);
        assert_eq!(data.origin(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(bytemuck::bytes_of(&data).len(), 80);
    }
}
