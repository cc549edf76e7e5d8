/// Closed set of instanced primitive types.
///
/// Every kind owns its own bucket in the geometry pool, its own instance
/// buffer and its own shared mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShapeKind {
    // Wireframes
    Cube,
    CubeCentered,
    ArrowHead,
    Position,
    Sphere,
    SphereHd,
    Cylinder,
    CylinderAb,

    // Wireframes thickened into tubes
    LineVolumetric,
    CubeVolumetric,
    CubeCenteredVolumetric,
    ArrowHeadVolumetric,
    PositionVolumetric,
    SphereVolumetric,
    SphereHdVolumetric,
    CylinderVolumetric,
    CylinderAbVolumetric,

    // Solid
    BillboardSquare,
    Plane,
}

impl ShapeKind {
    /// Number of kinds.
    pub const COUNT: usize = 19;

    /// Every kind, in index order.
    pub const ALL: [ShapeKind; Self::COUNT] = [
        Self::Cube,
        Self::CubeCentered,
        Self::ArrowHead,
        Self::Position,
        Self::Sphere,
        Self::SphereHd,
        Self::Cylinder,
        Self::CylinderAb,
        Self::LineVolumetric,
        Self::CubeVolumetric,
        Self::CubeCenteredVolumetric,
        Self::ArrowHeadVolumetric,
        Self::PositionVolumetric,
        Self::SphereVolumetric,
        Self::SphereHdVolumetric,
        Self::CylinderVolumetric,
        Self::CylinderAbVolumetric,
        Self::BillboardSquare,
        Self::Plane,
    ];

    /// Dense index in `0..COUNT`.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Cube => "cube",
            Self::CubeCentered => "cube_centered",
            Self::ArrowHead => "arrowhead",
            Self::Position => "position",
            Self::Sphere => "sphere",
            Self::SphereHd => "sphere_hd",
            Self::Cylinder => "cylinder",
            Self::CylinderAb => "cylinder_ab",
            Self::LineVolumetric => "line_volumetric",
            Self::CubeVolumetric => "cube_volumetric",
            Self::CubeCenteredVolumetric => "cube_centered_volumetric",
            Self::ArrowHeadVolumetric => "arrowhead_volumetric",
            Self::PositionVolumetric => "position_volumetric",
            Self::SphereVolumetric => "sphere_volumetric",
            Self::SphereHdVolumetric => "sphere_hd_volumetric",
            Self::CylinderVolumetric => "cylinder_volumetric",
            Self::CylinderAbVolumetric => "cylinder_ab_volumetric",
            Self::BillboardSquare => "billboard_square",
            Self::Plane => "plane",
        }
    }

    /// Whether this kind is drawn with the thickened line mesh.
    pub fn is_volumetric(self) -> bool {
        matches!(
            self,
            Self::LineVolumetric
                | Self::CubeVolumetric
                | Self::CubeCenteredVolumetric
                | Self::ArrowHeadVolumetric
                | Self::PositionVolumetric
                | Self::SphereVolumetric
                | Self::SphereHdVolumetric
                | Self::CylinderVolumetric
                | Self::CylinderAbVolumetric
        )
    }

    /// The volumetric counterpart of a wireframe kind.
    ///
    /// Volumetric and solid kinds map to themselves.
    pub fn to_volumetric(self) -> Self {
        match self {
            Self::Cube => Self::CubeVolumetric,
            Self::CubeCentered => Self::CubeCenteredVolumetric,
            Self::ArrowHead => Self::ArrowHeadVolumetric,
            Self::Position => Self::PositionVolumetric,
            Self::Sphere => Self::SphereVolumetric,
            Self::SphereHd => Self::SphereHdVolumetric,
            Self::Cylinder => Self::CylinderVolumetric,
            Self::CylinderAb => Self::CylinderAbVolumetric,
            other => other,
        }
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which update cadence ages and reclaims an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProcessType {
    /// Created during a render frame.
    #[default]
    Render,
    /// Created during a physics tick.
    Physics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_are_dense() {
        for (i, kind) in ShapeKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_to_volumetric() {
        assert_eq!(ShapeKind::Sphere.to_volumetric(), ShapeKind::SphereVolumetric);
        assert_eq!(ShapeKind::CylinderAb.to_volumetric(), ShapeKind::CylinderAbVolumetric);
        assert_eq!(ShapeKind::Plane.to_volumetric(), ShapeKind::Plane);
        assert_eq!(
            ShapeKind::CubeVolumetric.to_volumetric(),
            ShapeKind::CubeVolumetric
        );
        for kind in ShapeKind::ALL {
            let v = kind.to_volumetric();
            assert!(v.is_volumetric() || matches!(v, ShapeKind::BillboardSquare | ShapeKind::Plane));
        }
    }
}
