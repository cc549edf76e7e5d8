use std::cell::RefCell;
use std::thread::ThreadId;

use parking_lot::ReentrantMutex;

use crate::config::{DrawerConfig, DrawerSettings, MeshSettings, ScopedConfigData};
use crate::container::{CameraSnapshot, GeometryContainer, RenderView};
use crate::entry::{DelayedRendererInstance, DelayedRendererLine, InstanceDesc, LineDesc};
use crate::geometry_pool::{InstanceHandle, LineHandle};
use crate::scoped_config::{ScopeOverrides, ScopedConfig, ScopedConfigRegistry};
use crate::shape::{ProcessType, ShapeKind};
use crate::sink::RendererSink;
use crate::stats::Stats;

pub(crate) struct DrawerState {
    pub(crate) container: GeometryContainer,
    pub(crate) config: DrawerConfig,
    pub(crate) mesh_settings: MeshSettings,
    pub(crate) scoped: ScopedConfigRegistry,
    pub(crate) debug_enabled: bool,
    pub(crate) in_physics_frame: bool,
}

impl DrawerState {
    /// Process type for a draw call that did not name one.
    pub(crate) fn current_process_type(&self) -> ProcessType {
        if self.in_physics_frame {
            ProcessType::Physics
        } else {
            ProcessType::Render
        }
    }
}

/// Thread-safe front of the debug overlay.
///
/// All state sits behind one reentrant lock: draw calls from any thread,
/// the render tick and the physics tick serialize on it. Calls made from
/// inside another call on the same thread (for example from an
/// [`add_or_update_instance_with`](Self::add_or_update_instance_with)
/// mutator) are dropped with a warning.
///
/// # Usage
///
/// ```
/// use debug_overlay_core::math::Vec3;
/// use debug_overlay_drawer::{DebugDrawer, DrawerSettings, RecordingSink, ShapeKind, colors};
///
/// let sink = RecordingSink::new();
/// let drawer = DebugDrawer::new(DrawerSettings::default(), sink.clone());
///
/// // Anywhere, any thread:
/// drawer.draw_sphere(&Vec3::zeros(), 0.5, colors::RED, 0.0);
///
/// // Once per rendered frame:
/// drawer.process(0.016, &[]);
/// assert_eq!(sink.snapshot().visible(ShapeKind::Sphere), 1);
/// ```
pub struct DebugDrawer {
    state: ReentrantMutex<RefCell<DrawerState>>,
}

impl DebugDrawer {
    pub fn new(settings: DrawerSettings, sink: impl RendererSink + 'static) -> Self {
        let mut settings = settings;
        settings.scope.validate();
        let container = GeometryContainer::new(Box::new(sink), &settings.meshes);
        log::info!(
            "Debug drawer created ({} shape kinds, frustum culling {})",
            ShapeKind::COUNT,
            if settings.drawer.use_frustum_culling { "on" } else { "off" }
        );
        Self {
            state: ReentrantMutex::new(RefCell::new(DrawerState {
                container,
                config: settings.drawer,
                mesh_settings: settings.meshes,
                scoped: ScopedConfigRegistry::new(settings.scope),
                debug_enabled: true,
                in_physics_frame: false,
            })),
        }
    }

    /// Run `f` on the locked state.
    ///
    /// Returns `None` when the calling thread is already inside the drawer.
    pub(crate) fn with_state<R>(&self, f: impl FnOnce(&mut DrawerState) -> R) -> Option<R> {
        let guard = self.state.lock();
        let Ok(mut state) = guard.try_borrow_mut() else {
            log::warn!("Re-entrant debug drawer call ignored");
            return None;
        };
        Some(f(&mut state))
    }

    // -----------------------------------------------------------------------
    // Tick drivers
    // -----------------------------------------------------------------------

    /// Render tick. `views` holds every active viewport's camera; an empty
    /// slice disables culling for this frame.
    pub fn process(&self, delta: f32, views: &[RenderView]) {
        self.with_state(|s| {
            let enabled = s.debug_enabled;
            s.container.update_geometry(delta, views, &s.config, enabled);
        });
    }

    /// Start of a physics tick. Draw calls until
    /// [`physics_process_end`](Self::physics_process_end) are tagged physics.
    pub fn physics_process_start(&self, delta: f32) {
        self.with_state(|s| {
            s.in_physics_frame = true;
            s.container.update_geometry_physics_start(delta);
        });
    }

    pub fn physics_process_end(&self, _delta: f32) {
        self.with_state(|s| {
            s.in_physics_frame = false;
            s.container.update_geometry_physics_end();
        });
    }

    // -----------------------------------------------------------------------
    // Low-level pool access
    // -----------------------------------------------------------------------

    pub fn add_or_update_instance(&self, desc: InstanceDesc) -> Option<InstanceHandle> {
        self.with_state(|s| s.container.pool_mut().add_or_update_instance(desc))
    }

    /// Like [`add_or_update_instance`](Self::add_or_update_instance) with a
    /// final edit of the pooled entry.
    pub fn add_or_update_instance_with(
        &self,
        desc: InstanceDesc,
        mutator: impl FnOnce(&mut DelayedRendererInstance),
    ) -> Option<InstanceHandle> {
        self.with_state(|s| {
            s.container
                .pool_mut()
                .add_or_update_instance_with(desc, mutator)
        })
    }

    pub fn add_or_update_line(&self, desc: LineDesc) -> Option<LineHandle> {
        self.with_state(|s| s.container.pool_mut().add_or_update_line(desc))
    }

    pub fn add_or_update_line_with(
        &self,
        desc: LineDesc,
        mutator: impl FnOnce(&mut DelayedRendererLine),
    ) -> Option<LineHandle> {
        self.with_state(|s| s.container.pool_mut().add_or_update_line_with(desc, mutator))
    }

    /// Read a pooled instance.
    pub fn inspect_instance<R>(
        &self,
        handle: InstanceHandle,
        f: impl FnOnce(Option<&DelayedRendererInstance>) -> R,
    ) -> Option<R> {
        self.with_state(|s| f(s.container.pool().instance(handle)))
    }

    pub fn instance_state(&self, handle: InstanceHandle) -> Option<crate::entry::EntryState> {
        self.with_state(|s| s.container.pool().instance_state(handle))
    }

    pub fn line_state(&self, handle: LineHandle) -> Option<crate::entry::EntryState> {
        self.with_state(|s| s.container.pool().line_state(handle))
    }

    // -----------------------------------------------------------------------
    // Clearing and stats
    // -----------------------------------------------------------------------

    /// Drop every entry of every kind.
    pub fn clear_all(&self) {
        self.with_state(|s| s.container.clear());
    }

    pub fn clear_kind(&self, kind: ShapeKind) {
        self.with_state(|s| s.container.pool_mut().clear_kind(kind));
    }

    pub fn clear_lines(&self) {
        self.with_state(|s| s.container.pool_mut().clear_lines());
    }

    pub fn get_stats(&self) -> Stats {
        self.with_state(|s| {
            let mut stats = s.container.pool().stats();
            stats.created_scoped_configs = s.scoped.created_count();
            stats.orphan_scoped_configs = s.scoped.active_count();
            stats
        })
        .unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    pub fn config(&self) -> DrawerConfig {
        self.with_state(|s| s.config.clone()).unwrap_or_default()
    }

    pub fn set_config(&self, config: DrawerConfig) {
        self.with_state(|s| s.config = config);
    }

    pub fn is_debug_enabled(&self) -> bool {
        self.with_state(|s| s.debug_enabled).unwrap_or(false)
    }

    /// While disabled, render ticks upload nothing and only age entries.
    pub fn set_debug_enabled(&self, enabled: bool) {
        self.with_state(|s| {
            if s.debug_enabled != enabled {
                log::info!("Debug drawing {}", if enabled { "enabled" } else { "disabled" });
            }
            s.debug_enabled = enabled;
        });
    }

    pub fn mesh_settings(&self) -> MeshSettings {
        self.with_state(|s| s.mesh_settings.clone()).unwrap_or_default()
    }

    /// Apply new mesh settings and rebuild every shape mesh.
    pub fn set_mesh_settings(&self, settings: MeshSettings) {
        self.with_state(|s| {
            s.mesh_settings = settings;
            s.container.regenerate_meshes(&s.mesh_settings);
        });
    }

    /// Rebuild every shape mesh with the current settings.
    pub fn regenerate_geometry_meshes(&self) {
        self.with_state(|s| s.container.regenerate_meshes(&s.mesh_settings));
    }

    pub fn render_layer_mask(&self) -> Option<u32> {
        self.with_state(|s| s.container.render_layer_mask()).flatten()
    }

    /// Camera recorded by the last render tick.
    pub fn camera(&self) -> CameraSnapshot {
        self.with_state(|s| s.container.camera()).unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // Scoped configs
    // -----------------------------------------------------------------------

    /// Push a scope onto the calling thread's config stack.
    pub fn new_scoped_config(&self) -> ScopedConfig<'_> {
        let thread = std::thread::current().id();
        let guard_id = self.with_state(|s| s.scoped.register(thread)).unwrap_or(0);
        ScopedConfig::new(self, thread, guard_id)
    }

    /// Values draw calls on this thread currently resolve to.
    pub fn scoped_config(&self) -> ScopedConfigData {
        let thread = std::thread::current().id();
        self.with_state(|s| s.scoped.resolve(thread))
            .unwrap_or_default()
    }

    /// Baseline values for scopes created from now on, clamped like the
    /// scope setters.
    pub fn set_default_scoped_config(&self, mut data: ScopedConfigData) {
        data.validate();
        self.with_state(|s| s.scoped.set_defaults(data));
    }

    pub(crate) fn update_scoped_config(
        &self,
        thread: ThreadId,
        guard_id: u64,
        f: impl FnOnce(&mut ScopeOverrides),
    ) {
        self.with_state(|s| s.scoped.update(thread, guard_id, f));
    }

    pub(crate) fn resolve_scoped_config_upto(&self, thread: ThreadId, guard_id: u64) -> ScopedConfigData {
        self.with_state(|s| s.scoped.resolve_upto(thread, guard_id))
            .unwrap_or_default()
    }

    pub(crate) fn unregister_scoped_config(&self, thread: ThreadId, guard_id: u64) {
        let removed = self.with_state(|s| s.scoped.unregister(thread, guard_id));
        if removed == Some(false) {
            log::debug!("Scoped config {guard_id} was already unregistered");
        }
    }

    /// Drop every scope on every thread. Live guards become no-ops.
    pub fn clear_scoped_configs(&self) {
        self.with_state(|s| s.scoped.clear());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{NullSink, RecordingSink};
    use debug_overlay_core::math::Transform3D;
    use std::sync::Arc;

    fn cube() -> InstanceDesc {
        InstanceDesc::new(ShapeKind::Cube, Transform3D::identity())
    }

    #[test]
    fn test_drawer_is_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DebugDrawer>();
    }

    #[test]
    fn test_reentrant_call_is_dropped() {
        let drawer = DebugDrawer::new(DrawerSettings::default(), NullSink);
        let mut inner = None;
        drawer.add_or_update_instance_with(cube(), |_| {
            inner = Some(drawer.add_or_update_instance(cube()));
        });
        assert_eq!(inner, Some(None));
        assert_eq!(drawer.get_stats().instances, 1);
    }

    #[test]
    fn test_physics_window_tags_draws() {
        let drawer = DebugDrawer::new(DrawerSettings::default(), NullSink);
        drawer.physics_process_start(0.02);
        drawer.draw_position(&Transform3D::identity(), crate::colors::EMPTY, 0.0);
        drawer.physics_process_end(0.02);
        drawer.draw_position(&Transform3D::identity(), crate::colors::EMPTY, 0.0);

        let stats = drawer.get_stats();
        assert_eq!(stats.instances, 1);
        assert_eq!(stats.instances_physics, 1);
    }

    #[test]
    fn test_concurrent_draws() {
        let sink = RecordingSink::new();
        let drawer = Arc::new(DebugDrawer::new(DrawerSettings::default(), sink.clone()));
        let threads: Vec<_> = (0..4)
            .map(|t| {
                let drawer = Arc::clone(&drawer);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        drawer.add_or_update_instance(cube().with_key(t * 1000 + i));
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }
        drawer.process(0.016, &[]);
        assert_eq!(sink.snapshot().visible(ShapeKind::Cube), 400);
    }

    #[test]
    fn test_scoped_config_counts_in_stats() {
        let drawer = DebugDrawer::new(DrawerSettings::default(), NullSink);
        {
            let _a = drawer.new_scoped_config();
            let _b = drawer.new_scoped_config();
            assert_eq!(drawer.get_stats().orphan_scoped_configs, 2);
        }
        let stats = drawer.get_stats();
        assert_eq!(stats.created_scoped_configs, 2);
        assert_eq!(stats.orphan_scoped_configs, 0);
    }

    #[test]
    fn test_explicit_unregister_then_drop() {
        let drawer = DebugDrawer::new(DrawerSettings::default(), NullSink);
        let mut scope = drawer.new_scoped_config().with_thickness(1.0);
        assert_eq!(drawer.scoped_config().thickness, 1.0);
        scope.unregister();
        scope.unregister();
        assert_eq!(drawer.scoped_config().thickness, 0.0);
        drop(scope);
        assert_eq!(drawer.get_stats().orphan_scoped_configs, 0);
    }

    #[test]
    fn test_default_scoped_config_is_clamped() {
        let drawer = DebugDrawer::new(DrawerSettings::default(), NullSink);
        drawer.set_default_scoped_config(ScopedConfigData {
            thickness: 500.0,
            center_brightness: -2.0,
            ..Default::default()
        });
        let data = drawer.scoped_config();
        assert_eq!(data.thickness, crate::config::MAX_THICKNESS);
        assert_eq!(data.center_brightness, 0.0);
    }
}
