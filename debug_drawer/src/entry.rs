//! Timed pool entries.
//!
//! Every entry carries a [`Lifetime`] that walks through
//! `Pending -> Active -> Expired -> Reclaimed`:
//!
//! - `Pending`: just created, not flattened into a buffer yet.
//! - `Active`: flattened at least once, still has lifetime left.
//! - `Expired`: one-frame entry already drawn, or remaining lifetime ran out.
//!   Expired entries are no longer drawn and wait for the expiration sweep
//!   of their own process type.
//! - `Reclaimed`: the slot went back to the free list. Only reported for
//!   stale handles, the entry itself is gone.

use std::hash::{DefaultHasher, Hash, Hasher};

use debug_overlay_core::bounds::{Aabb, SphereBounds};
use debug_overlay_core::math::{Transform3D, Vec3};

use crate::colors::{self, Color};
use crate::shape::{ProcessType, ShapeKind};

/// Lifecycle state of a pooled entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Pending,
    Active,
    Expired,
    Reclaimed,
}

/// Remaining-time bookkeeping shared by instances and lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lifetime {
    duration: f32,
    remaining: f32,
    process_type: ProcessType,
    state: EntryState,
    is_used_one_time: bool,
}

impl Lifetime {
    pub fn new(duration: f32, process_type: ProcessType) -> Self {
        Self {
            duration,
            remaining: duration,
            process_type,
            state: EntryState::Pending,
            is_used_one_time: false,
        }
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn process_type(&self) -> ProcessType {
        self.process_type
    }

    pub fn state(&self) -> EntryState {
        self.state
    }

    pub fn is_used_one_time(&self) -> bool {
        self.is_used_one_time
    }

    pub fn set_used_one_time(&mut self, value: bool) {
        self.is_used_one_time = value;
    }

    /// Entries with `duration <= 0` live for exactly one tick.
    pub fn is_one_frame(&self) -> bool {
        self.duration <= 0.0 || self.is_used_one_time
    }

    pub fn is_expired(&self) -> bool {
        matches!(self.state, EntryState::Expired | EntryState::Reclaimed)
    }

    /// Restart the lifetime after a merge-by-key update.
    pub fn refresh(&mut self, duration: f32, process_type: ProcessType) {
        self.duration = duration;
        self.remaining = duration;
        self.process_type = process_type;
        if self.state != EntryState::Pending {
            self.state = EntryState::Active;
        }
    }

    /// Called when the entry is flattened into a frame.
    pub fn mark_drawn(&mut self) {
        if self.state == EntryState::Pending {
            self.state = EntryState::Active;
        }
    }

    /// Force a not-yet-drawn entry to expire.
    pub fn expire_pending(&mut self) {
        if self.state == EntryState::Pending {
            self.state = EntryState::Expired;
        }
    }

    /// Age the entry by one tick of its process type.
    ///
    /// Pending entries are not aged: nothing expires before it was drawn once.
    pub fn tick(&mut self, delta: f32) {
        if self.state != EntryState::Active {
            return;
        }
        if self.is_one_frame() {
            self.state = EntryState::Expired;
            return;
        }
        self.remaining -= delta;
        if self.remaining <= 0.0 {
            self.state = EntryState::Expired;
        }
    }
}

/// Behavior the pool needs from both entry types.
pub trait PooledEntry {
    fn key(&self) -> Option<u64>;
    fn lifetime(&self) -> &Lifetime;
    fn lifetime_mut(&mut self) -> &mut Lifetime;
    fn is_visible(&self) -> bool;
    fn set_visible(&mut self, visible: bool);
}

/// One timed occurrence of an instanced shape.
#[derive(Debug, Clone, PartialEq)]
pub struct DelayedRendererInstance {
    pub kind: ShapeKind,
    pub transform: Transform3D,
    pub color: Color,
    pub custom_color: Color,
    pub bounds: SphereBounds,
    pub lifetime: Lifetime,
    pub is_visible: bool,
    pub key: Option<u64>,
    /// Synthetic entry created by the visible-bounds overlay.
    pub is_bounds_overlay: bool,
}

impl PooledEntry for DelayedRendererInstance {
    fn key(&self) -> Option<u64> {
        self.key
    }

    fn lifetime(&self) -> &Lifetime {
        &self.lifetime
    }

    fn lifetime_mut(&mut self) -> &mut Lifetime {
        &mut self.lifetime
    }

    fn is_visible(&self) -> bool {
        self.is_visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.is_visible = visible;
    }
}

/// A timed set of raw line segments.
///
/// `points` is a line list: every consecutive pair is one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct DelayedRendererLine {
    pub points: Vec<Vec3>,
    pub color: Color,
    pub bounds: Aabb,
    pub lifetime: Lifetime,
    pub is_visible: bool,
    pub key: Option<u64>,
}

impl PooledEntry for DelayedRendererLine {
    fn key(&self) -> Option<u64> {
        self.key
    }

    fn lifetime(&self) -> &Lifetime {
        &self.lifetime
    }

    fn lifetime_mut(&mut self) -> &mut Lifetime {
        &mut self.lifetime
    }

    fn is_visible(&self) -> bool {
        self.is_visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.is_visible = visible;
    }
}

/// Parameters of an `add_or_update_instance` call.
///
/// Bounds default to a sphere enclosing the unit shape under `transform`.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceDesc {
    pub kind: ShapeKind,
    pub transform: Transform3D,
    pub key: Option<u64>,
    pub process_type: ProcessType,
    pub color: Color,
    pub custom_color: Color,
    pub bounds: Option<SphereBounds>,
    pub duration: f32,
    pub is_used_one_time: bool,
}

impl InstanceDesc {
    pub fn new(kind: ShapeKind, transform: Transform3D) -> Self {
        Self {
            kind,
            transform,
            key: None,
            process_type: ProcessType::Render,
            color: colors::WHITE,
            custom_color: colors::EMPTY,
            bounds: None,
            duration: 0.0,
            is_used_one_time: false,
        }
    }

    pub fn with_key(mut self, key: u64) -> Self {
        self.key = Some(key);
        self
    }

    pub fn with_process_type(mut self, process_type: ProcessType) -> Self {
        self.process_type = process_type;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_custom_color(mut self, custom_color: Color) -> Self {
        self.custom_color = custom_color;
        self
    }

    pub fn with_bounds(mut self, bounds: SphereBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    /// Skip merge-by-key and expire after a single tick.
    pub fn with_one_time(mut self) -> Self {
        self.is_used_one_time = true;
        self
    }

    pub(crate) fn resolved_bounds(&self) -> SphereBounds {
        self.bounds.unwrap_or_else(|| {
            SphereBounds::new(
                self.transform.origin,
                self.transform.max_axis_length() * crate::meshes::UNIT_SHAPE_BOUNDING_RADIUS,
            )
        })
    }

    pub(crate) fn into_entry(self) -> DelayedRendererInstance {
        let bounds = self.resolved_bounds();
        let mut lifetime = Lifetime::new(self.duration, self.process_type);
        lifetime.set_used_one_time(self.is_used_one_time);
        DelayedRendererInstance {
            kind: self.kind,
            transform: self.transform,
            color: self.color,
            custom_color: self.custom_color,
            bounds,
            lifetime,
            is_visible: true,
            key: if self.is_used_one_time { None } else { self.key },
            is_bounds_overlay: false,
        }
    }
}

/// Parameters of an `add_or_update_line` call.
#[derive(Debug, Clone, PartialEq)]
pub struct LineDesc {
    pub points: Vec<Vec3>,
    pub key: Option<u64>,
    pub process_type: ProcessType,
    pub color: Color,
    pub duration: f32,
    pub is_used_one_time: bool,
}

impl LineDesc {
    /// `points` is a line list. A trailing unpaired point is ignored.
    pub fn new(mut points: Vec<Vec3>) -> Self {
        if points.len() % 2 != 0 {
            points.pop();
        }
        Self {
            points,
            key: None,
            process_type: ProcessType::Render,
            color: colors::WHITE,
            duration: 0.0,
            is_used_one_time: false,
        }
    }

    pub fn with_key(mut self, key: u64) -> Self {
        self.key = Some(key);
        self
    }

    pub fn with_process_type(mut self, process_type: ProcessType) -> Self {
        self.process_type = process_type;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_one_time(mut self) -> Self {
        self.is_used_one_time = true;
        self
    }

    pub(crate) fn into_entry(self) -> DelayedRendererLine {
        let bounds = Aabb::from_points(&self.points);
        let mut lifetime = Lifetime::new(self.duration, self.process_type);
        lifetime.set_used_one_time(self.is_used_one_time);
        DelayedRendererLine {
            points: self.points,
            color: self.color,
            bounds,
            lifetime,
            is_visible: true,
            key: if self.is_used_one_time { None } else { self.key },
        }
    }
}

/// Stable dedup key for any hashable value, for [`InstanceDesc::with_key`]
/// and [`LineDesc::with_key`].
pub fn key_of<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}
