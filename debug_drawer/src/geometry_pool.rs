//! Pooled storage of every timed debug shape.
//!
//! Each [`ShapeKind`] has its own bucket: a generation-checked [`SlotPool`]
//! plus a map from dedup key to slot. Raw lines share one more bucket. The
//! pool does not lock anything itself; [`DebugDrawer`](crate::DebugDrawer)
//! serializes every call.
//!
//! A render tick drives the pool in a fixed order:
//!
//! 1. [`update_visibility`](GeometryPool::update_visibility)
//! 2. [`fill_lines_data`](GeometryPool::fill_lines_data)
//! 3. [`fill_instance_data`](GeometryPool::fill_instance_data)
//! 4. [`scan_visible_instances`](GeometryPool::scan_visible_instances)
//! 5. [`update_expiration`](GeometryPool::update_expiration)
//! 6. [`reset_counter`](GeometryPool::reset_counter)

use std::collections::HashMap;
use std::time::Instant;

use debug_overlay_core::bounds::{Aabb, SphereBounds};
use debug_overlay_core::math::{Mat3, Transform3D};
use debug_overlay_core::pool::{SlotHandle, SlotPool};
use debug_overlay_core::{profile_function, profile_plot, profile_scope};

use crate::buffer::InstanceBuffer;
use crate::colors;
use crate::culling::CullingData;
use crate::entry::{
    DelayedRendererInstance, DelayedRendererLine, EntryState, InstanceDesc, LineDesc, PooledEntry,
};
use crate::shape::{ProcessType, ShapeKind};
use crate::stats::{KindStats, Stats};
use crate::vertex::{InstanceData, LineVertex};

/// Handle to a pooled instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceHandle {
    pub kind: ShapeKind,
    pub slot: SlotHandle,
}

/// Handle to a pooled line entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineHandle(pub SlotHandle);

struct Bucket<E> {
    slots: SlotPool<E>,
    keys: HashMap<u64, SlotHandle>,
}

impl<E: PooledEntry> Bucket<E> {
    fn new() -> Self {
        Self {
            slots: SlotPool::new(),
            keys: HashMap::new(),
        }
    }

    fn find_mut(&mut self, key: u64) -> Option<(SlotHandle, &mut E)> {
        let handle = *self.keys.get(&key)?;
        self.slots.get_mut(handle).map(|entry| (handle, entry))
    }

    fn insert(&mut self, entry: E) -> SlotHandle {
        let key = match entry.lifetime().is_used_one_time() {
            true => None,
            false => entry.key(),
        };
        let handle = self.slots.insert(entry);
        if let Some(key) = key {
            self.keys.insert(key, handle);
        }
        handle
    }

    fn tick(&mut self, delta: f32, process_type: ProcessType) {
        for entry in self.slots.values_mut() {
            if entry.lifetime().process_type() == process_type {
                entry.lifetime_mut().tick(delta);
            }
        }
    }

    fn reclaim_expired(&mut self, process_type: ProcessType) -> usize {
        let keys = &mut self.keys;
        let mut reclaimed = 0;
        self.slots.retain(
            |_, entry| {
                let lifetime = entry.lifetime();
                lifetime.process_type() != process_type || !lifetime.is_expired()
            },
            |handle, entry| {
                if let Some(key) = entry.key()
                    && keys.get(&key) == Some(&handle)
                {
                    keys.remove(&key);
                }
                reclaimed += 1;
            },
        );
        reclaimed
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.keys.clear();
    }

    fn expire_pending(&mut self) {
        for entry in self.slots.values_mut() {
            entry.lifetime_mut().expire_pending();
        }
    }

    fn hide_all(&mut self) {
        for entry in self.slots.values_mut() {
            entry.set_visible(false);
        }
    }

    fn count(&self, process_type: ProcessType) -> usize {
        self.slots
            .values()
            .filter(|e| e.lifetime().process_type() == process_type)
            .count()
    }

    fn state_of(&self, handle: SlotHandle) -> EntryState {
        self.slots
            .get(handle)
            .map_or(EntryState::Reclaimed, |e| e.lifetime().state())
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Timings {
    culling_instances_usec: u64,
    culling_lines_usec: u64,
    filling_instances_usec: u64,
    filling_lines_usec: u64,
}

fn elapsed_usec(start: Instant) -> u64 {
    start.elapsed().as_micros() as u64
}

/// Typed collection of timed debug shapes, one bucket per [`ShapeKind`].
pub struct GeometryPool {
    instances: Vec<Bucket<DelayedRendererInstance>>,
    lines: Bucket<DelayedRendererLine>,
    buffers: Vec<InstanceBuffer>,
    line_vertices: Vec<LineVertex>,
    scratch: Vec<InstanceData>,
    visible_per_kind: [usize; ShapeKind::COUNT],
    visible_instances: usize,
    visible_lines: usize,
    total_created: u64,
    timings: Timings,
}

impl GeometryPool {
    pub fn new() -> Self {
        Self {
            instances: ShapeKind::ALL.iter().map(|_| Bucket::new()).collect(),
            lines: Bucket::new(),
            buffers: ShapeKind::ALL.iter().map(|_| InstanceBuffer::new()).collect(),
            line_vertices: Vec::new(),
            scratch: Vec::new(),
            visible_per_kind: [0; ShapeKind::COUNT],
            visible_instances: 0,
            visible_lines: 0,
            total_created: 0,
            timings: Timings::default(),
        }
    }

    // -----------------------------------------------------------------------
    // Add / update
    // -----------------------------------------------------------------------

    pub fn add_or_update_instance(&mut self, desc: InstanceDesc) -> InstanceHandle {
        self.add_or_update_instance_with(desc, |_| {})
    }

    /// Insert an instance, or refresh the live entry with the same key.
    ///
    /// `mutator` runs last, on the new or refreshed entry.
    pub fn add_or_update_instance_with(
        &mut self,
        desc: InstanceDesc,
        mutator: impl FnOnce(&mut DelayedRendererInstance),
    ) -> InstanceHandle {
        let kind = desc.kind;
        let bucket = &mut self.instances[kind.index()];

        if let Some(key) = desc.key.filter(|_| !desc.is_used_one_time)
            && let Some((slot, entry)) = bucket.find_mut(key)
        {
            entry.bounds = desc.resolved_bounds();
            entry.transform = desc.transform;
            entry.color = desc.color;
            entry.custom_color = desc.custom_color;
            entry.lifetime.refresh(desc.duration, desc.process_type);
            mutator(entry);
            return InstanceHandle { kind, slot };
        }

        let mut entry = desc.into_entry();
        mutator(&mut entry);
        self.total_created += 1;
        InstanceHandle {
            kind,
            slot: bucket.insert(entry),
        }
    }

    pub fn add_or_update_line(&mut self, desc: LineDesc) -> LineHandle {
        self.add_or_update_line_with(desc, |_| {})
    }

    /// Insert a line entry, or refresh the live entry with the same key.
    pub fn add_or_update_line_with(
        &mut self,
        desc: LineDesc,
        mutator: impl FnOnce(&mut DelayedRendererLine),
    ) -> LineHandle {
        if let Some(key) = desc.key.filter(|_| !desc.is_used_one_time)
            && let Some((slot, entry)) = self.lines.find_mut(key)
        {
            entry.lifetime.refresh(desc.duration, desc.process_type);
            entry.color = desc.color;
            entry.bounds = Aabb::from_points(&desc.points);
            entry.points = desc.points;
            mutator(entry);
            return LineHandle(slot);
        }

        let mut entry = desc.into_entry();
        mutator(&mut entry);
        self.total_created += 1;
        LineHandle(self.lines.insert(entry))
    }

    // -----------------------------------------------------------------------
    // Per-tick passes
    // -----------------------------------------------------------------------

    /// Recompute `is_visible` for every entry.
    pub fn update_visibility(&mut self, culling: &CullingData) {
        profile_function!();

        let start = Instant::now();
        for bucket in &mut self.instances {
            for entry in bucket.slots.values_mut() {
                entry.is_visible = culling.is_sphere_visible(&entry.bounds);
            }
        }
        self.timings.culling_instances_usec = elapsed_usec(start);

        let start = Instant::now();
        for entry in self.lines.slots.values_mut() {
            entry.is_visible = culling.is_aabb_visible(&entry.bounds);
        }
        self.timings.culling_lines_usec = elapsed_usec(start);
    }

    /// Add one-shot wireframes around every visible entry's bounds.
    ///
    /// Instances get a sphere, lines get a box. Entries created here are
    /// flagged as overlays and never get bounds of their own.
    pub fn add_bounds_overlays(&mut self) {
        profile_scope!("bounds_overlays");

        let spheres: Vec<SphereBounds> = self
            .instances
            .iter()
            .flat_map(|bucket| bucket.slots.values())
            .filter(|e| e.is_visible && !e.lifetime.is_expired() && !e.is_bounds_overlay)
            .map(|e| e.bounds)
            .collect();
        let boxes: Vec<_> = self
            .lines
            .slots
            .values()
            .filter(|e| e.is_visible && !e.lifetime.is_expired())
            .map(|e| e.bounds)
            .collect();

        for sphere in spheres {
            let transform = Transform3D::new(
                Mat3::from_diagonal_element(sphere.radius * 2.0),
                sphere.center,
            );
            let desc = InstanceDesc::new(ShapeKind::Sphere, transform)
                .with_color(colors::DEBUG_BOUNDS)
                .with_bounds(sphere)
                .with_one_time();
            self.add_or_update_instance_with(desc, |e| e.is_bounds_overlay = true);
        }
        for aabb in boxes {
            let transform = Transform3D::new(Mat3::from_diagonal(&aabb.size()), aabb.min);
            let desc = InstanceDesc::new(ShapeKind::Cube, transform)
                .with_color(colors::DEBUG_BOUNDS)
                .with_bounds(aabb.bounding_sphere())
                .with_one_time();
            self.add_or_update_instance_with(desc, |e| e.is_bounds_overlay = true);
        }
    }

    /// Rebuild the shared line-list buffer from visible line entries.
    pub fn fill_lines_data(&mut self) {
        profile_function!();

        let start = Instant::now();
        self.line_vertices.clear();
        for entry in self.lines.slots.values_mut() {
            if entry.lifetime.is_expired() {
                continue;
            }
            entry.lifetime.mark_drawn();
            if !entry.is_visible {
                continue;
            }
            let color = entry.color;
            self.line_vertices
                .extend(entry.points.iter().map(|p| LineVertex::new(p, color)));
        }
        self.timings.filling_lines_usec = elapsed_usec(start);
    }

    /// Rebuild every kind's instance buffer from its visible live entries.
    pub fn fill_instance_data(&mut self) {
        profile_function!();

        let start = Instant::now();
        for (bucket, buffer) in self.instances.iter_mut().zip(self.buffers.iter_mut()) {
            self.scratch.clear();
            for entry in bucket.slots.values_mut() {
                if entry.lifetime.is_expired() {
                    continue;
                }
                entry.lifetime.mark_drawn();
                if entry.is_visible {
                    self.scratch.push(InstanceData::new(
                        &entry.transform,
                        entry.color,
                        entry.custom_color,
                    ));
                }
            }
            buffer.write(self.scratch.drain(..));
        }
        self.timings.filling_instances_usec = elapsed_usec(start);
    }

    /// Refresh visible counters from the buffers just filled.
    pub fn scan_visible_instances(&mut self) {
        for (count, buffer) in self.visible_per_kind.iter_mut().zip(&self.buffers) {
            *count = buffer.visible_count();
        }
        self.visible_instances = self.visible_per_kind.iter().sum();
        self.visible_lines = self
            .lines
            .slots
            .values()
            .filter(|e| e.is_visible && !e.lifetime.is_expired())
            .count();
        profile_plot!("debug_overlay_visible_instances", self.visible_instances);
    }

    /// Reclaim expired entries created by `process_type`.
    ///
    /// Entries of the other process type are left alone even if expired.
    pub fn update_expiration(&mut self, process_type: ProcessType) -> usize {
        profile_function!();

        let mut reclaimed = self.lines.reclaim_expired(process_type);
        for bucket in &mut self.instances {
            reclaimed += bucket.reclaim_expired(process_type);
        }
        reclaimed
    }

    /// Age every entry created by `process_type` by one tick.
    pub fn reset_counter(&mut self, delta: f32, process_type: ProcessType) {
        profile_function!();

        self.lines.tick(delta, process_type);
        for bucket in &mut self.instances {
            bucket.tick(delta, process_type);
        }
    }

    /// Expire every entry that was never drawn, of both process types.
    pub fn expire_pending(&mut self) {
        self.lines.expire_pending();
        for bucket in &mut self.instances {
            bucket.expire_pending();
        }
    }

    /// Hide every entry and zero all visible counts.
    pub fn reset_visible_objects(&mut self) {
        self.lines.hide_all();
        for bucket in &mut self.instances {
            bucket.hide_all();
        }
        self.reset_outputs();
    }

    // -----------------------------------------------------------------------
    // Clearing
    // -----------------------------------------------------------------------

    /// Reclaim every entry of every kind.
    pub fn clear_pool(&mut self) {
        self.lines.clear();
        for bucket in &mut self.instances {
            bucket.clear();
        }
        self.reset_outputs();
    }

    /// Reclaim every entry of one kind.
    pub fn clear_kind(&mut self, kind: ShapeKind) {
        let index = kind.index();
        self.instances[index].clear();
        self.buffers[index].reset();
        self.visible_per_kind[index] = 0;
        self.visible_instances = self.visible_per_kind.iter().sum();
    }

    /// Reclaim every raw line entry.
    pub fn clear_lines(&mut self) {
        self.lines.clear();
        self.line_vertices.clear();
        self.visible_lines = 0;
    }

    fn reset_outputs(&mut self) {
        for buffer in &mut self.buffers {
            buffer.reset();
        }
        self.line_vertices.clear();
        self.visible_per_kind = [0; ShapeKind::COUNT];
        self.visible_instances = 0;
        self.visible_lines = 0;
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn for_each_instance(&self, mut f: impl FnMut(&DelayedRendererInstance)) {
        for bucket in &self.instances {
            bucket.slots.values().for_each(&mut f);
        }
    }

    pub fn for_each_line(&self, f: impl FnMut(&DelayedRendererLine)) {
        self.lines.slots.values().for_each(f);
    }

    pub fn instance(&self, handle: InstanceHandle) -> Option<&DelayedRendererInstance> {
        self.instances[handle.kind.index()].slots.get(handle.slot)
    }

    pub fn line(&self, handle: LineHandle) -> Option<&DelayedRendererLine> {
        self.lines.slots.get(handle.0)
    }

    /// Lifecycle state behind `handle`; [`EntryState::Reclaimed`] once the slot is gone.
    pub fn instance_state(&self, handle: InstanceHandle) -> EntryState {
        self.instances[handle.kind.index()].state_of(handle.slot)
    }

    pub fn line_state(&self, handle: LineHandle) -> EntryState {
        self.lines.state_of(handle.0)
    }

    /// Live entries of `kind`, both process types.
    pub fn live_count(&self, kind: ShapeKind) -> usize {
        self.instances[kind.index()].slots.len()
    }

    pub fn line_count(&self) -> usize {
        self.lines.slots.len()
    }

    pub fn instance_buffer(&self, kind: ShapeKind) -> &InstanceBuffer {
        &self.buffers[kind.index()]
    }

    pub fn line_vertices(&self) -> &[LineVertex] {
        &self.line_vertices
    }

    /// Snapshot of the pool's counters.
    ///
    /// Scoped config counters are left at zero; the drawer fills them in.
    pub fn stats(&self) -> Stats {
        let instances = self
            .instances
            .iter()
            .map(|b| b.count(ProcessType::Render))
            .sum();
        let instances_physics = self
            .instances
            .iter()
            .map(|b| b.count(ProcessType::Physics))
            .sum();
        let lines = self.lines.count(ProcessType::Render);
        let lines_physics = self.lines.count(ProcessType::Physics);

        let per_kind = ShapeKind::ALL
            .iter()
            .map(|kind| KindStats {
                live: self.live_count(*kind),
                visible: self.visible_per_kind[kind.index()],
            })
            .collect();

        Stats {
            instances,
            lines,
            instances_physics,
            lines_physics,
            total_geometry: instances + instances_physics + lines + lines_physics,
            visible_instances: self.visible_instances,
            visible_lines: self.visible_lines,
            total_visible: self.visible_instances + self.visible_lines,
            total_created: self.total_created,
            time_filling_buffers_instances_usec: self.timings.filling_instances_usec,
            time_filling_buffers_lines_usec: self.timings.filling_lines_usec,
            time_culling_instances_usec: self.timings.culling_instances_usec,
            time_culling_lines_usec: self.timings.culling_lines_usec,
            per_kind,
            ..Default::default()
        }
    }
}

impl Default for GeometryPool {
    fn default() -> Self {
        Self::new()
    }
}
