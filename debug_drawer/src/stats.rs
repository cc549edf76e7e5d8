use crate::shape::ShapeKind;

/// Live and visible entries of one shape kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindStats {
    pub live: usize,
    pub visible: usize,
}

/// Read-only snapshot of the overlay's render statistics.
///
/// Visible counts and timings describe the last flattened render frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stats {
    /// Live render-tick instances.
    pub instances: usize,
    /// Live render-tick line entries.
    pub lines: usize,
    pub instances_physics: usize,
    pub lines_physics: usize,
    /// All live entries of both process types.
    pub total_geometry: usize,

    pub visible_instances: usize,
    pub visible_lines: usize,
    pub total_visible: usize,

    /// Entries allocated since the pool was created.
    pub total_created: u64,

    pub time_filling_buffers_instances_usec: u64,
    pub time_filling_buffers_lines_usec: u64,
    pub time_culling_instances_usec: u64,
    pub time_culling_lines_usec: u64,

    pub created_scoped_configs: u64,
    /// Scoped configs still registered.
    pub orphan_scoped_configs: usize,

    pub per_kind: Vec<KindStats>,
}

impl Stats {
    pub fn kind(&self, kind: ShapeKind) -> KindStats {
        self.per_kind.get(kind.index()).copied().unwrap_or_default()
    }
}
