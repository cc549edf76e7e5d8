//! Per-thread override stacks for drawing parameters.
//!
//! [`DebugDrawer::new_scoped_config`](crate::DebugDrawer::new_scoped_config)
//! pushes a scope onto the calling thread's stack and returns a
//! [`ScopedConfig`] guard. A new scope starts from a copy of the values in
//! effect on its thread when it is created (the enclosing scope, or the
//! drawer's defaults), and its setters only change that copy. Later edits to
//! an enclosing scope or to the defaults do not reach scopes that already
//! exist. Draw calls use the innermost scope. Dropping the guard pops it.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::thread::ThreadId;

use crate::config::ScopedConfigData;
use crate::drawer::DebugDrawer;

/// Fields a single scope overrides. `None` keeps the value copied at creation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScopeOverrides {
    pub thickness: Option<f32>,
    pub center_brightness: Option<f32>,
    pub hd_sphere: Option<bool>,
    pub plane_size: Option<f32>,
}

impl ScopeOverrides {
    fn apply_to(&self, data: &mut ScopedConfigData) {
        if let Some(v) = self.thickness {
            data.thickness = v;
        }
        if let Some(v) = self.center_brightness {
            data.center_brightness = v;
        }
        if let Some(v) = self.hd_sphere {
            data.hd_sphere = v;
        }
        if let Some(v) = self.plane_size {
            data.plane_size = v;
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ScopeFrame {
    guard_id: u64,
    base: ScopedConfigData,
    overrides: ScopeOverrides,
}

impl ScopeFrame {
    fn data(&self) -> ScopedConfigData {
        let mut data = self.base;
        self.overrides.apply_to(&mut data);
        data
    }
}

/// Arena of scope stacks keyed by thread.
#[derive(Debug, Default)]
pub struct ScopedConfigRegistry {
    defaults: ScopedConfigData,
    stacks: HashMap<ThreadId, Vec<ScopeFrame>>,
    cache: HashMap<ThreadId, ScopedConfigData>,
    next_guard_id: u64,
    created: u64,
}

impl ScopedConfigRegistry {
    pub fn new(defaults: ScopedConfigData) -> Self {
        Self {
            defaults,
            ..Default::default()
        }
    }

    pub fn defaults(&self) -> &ScopedConfigData {
        &self.defaults
    }

    pub fn set_defaults(&mut self, defaults: ScopedConfigData) {
        self.defaults = defaults;
        self.cache.clear();
    }

    /// Push a scope for `thread` holding a copy of its current values, and
    /// return its guard id.
    pub fn register(&mut self, thread: ThreadId) -> u64 {
        self.next_guard_id += 1;
        self.created += 1;
        let guard_id = self.next_guard_id;
        let base = self.resolve_stack(thread, None);
        self.stacks.entry(thread).or_default().push(ScopeFrame {
            guard_id,
            base,
            overrides: ScopeOverrides::default(),
        });
        self.cache.remove(&thread);
        guard_id
    }

    /// Remove a scope. Unknown or already removed scopes are ignored.
    ///
    /// Scopes are normally released innermost first, but any position works.
    pub fn unregister(&mut self, thread: ThreadId, guard_id: u64) -> bool {
        let Some(stack) = self.stacks.get_mut(&thread) else {
            return false;
        };
        let Some(pos) = stack.iter().position(|frame| frame.guard_id == guard_id) else {
            return false;
        };
        stack.remove(pos);
        if stack.is_empty() {
            self.stacks.remove(&thread);
        }
        self.cache.remove(&thread);
        true
    }

    /// Edit the overrides of a live scope.
    pub fn update(
        &mut self,
        thread: ThreadId,
        guard_id: u64,
        f: impl FnOnce(&mut ScopeOverrides),
    ) -> bool {
        let Some(overrides) = self
            .stacks
            .get_mut(&thread)
            .and_then(|stack| stack.iter_mut().find(|frame| frame.guard_id == guard_id))
            .map(|frame| &mut frame.overrides)
        else {
            return false;
        };
        f(overrides);
        self.cache.remove(&thread);
        true
    }

    /// Effective values for draw calls issued on `thread`.
    pub fn resolve(&mut self, thread: ThreadId) -> ScopedConfigData {
        if let Some(cached) = self.cache.get(&thread) {
            return *cached;
        }
        let data = self.resolve_stack(thread, None);
        self.cache.insert(thread, data);
        data
    }

    /// Values held by scope `guard_id`, ignoring scopes nested inside it.
    pub fn resolve_upto(&self, thread: ThreadId, guard_id: u64) -> ScopedConfigData {
        self.resolve_stack(thread, Some(guard_id))
    }

    fn resolve_stack(&self, thread: ThreadId, guard_id: Option<u64>) -> ScopedConfigData {
        let stack = self.stacks.get(&thread);
        let frame = match guard_id {
            Some(id) => stack.and_then(|s| s.iter().find(|frame| frame.guard_id == id)),
            None => stack.and_then(|s| s.last()),
        };
        frame.map_or(self.defaults, ScopeFrame::data)
    }

    /// Scopes ever registered.
    pub fn created_count(&self) -> u64 {
        self.created
    }

    /// Scopes still registered on any thread.
    pub fn active_count(&self) -> usize {
        self.stacks.values().map(Vec::len).sum()
    }

    pub fn clear(&mut self) {
        self.stacks.clear();
        self.cache.clear();
    }
}

/// Guard for one scope on the creating thread's stack.
///
/// Setters clamp like the defaults do. The guard cannot leave its thread;
/// dropping it, or calling [`unregister`](Self::unregister), pops the scope.
///
/// ```
/// use debug_overlay_drawer::{DebugDrawer, DrawerSettings, NullSink};
///
/// let drawer = DebugDrawer::new(DrawerSettings::default(), NullSink);
/// let _outer = drawer.new_scoped_config().with_thickness(0.3);
/// {
///     let inner = drawer.new_scoped_config().with_hd_sphere(true);
///     assert_eq!(inner.thickness(), 0.3);
/// }
/// ```
pub struct ScopedConfig<'a> {
    drawer: &'a DebugDrawer,
    thread: ThreadId,
    guard_id: u64,
    registered: bool,
    _not_send: PhantomData<*const ()>,
}

impl<'a> ScopedConfig<'a> {
    pub(crate) fn new(drawer: &'a DebugDrawer, thread: ThreadId, guard_id: u64) -> Self {
        Self {
            drawer,
            thread,
            guard_id,
            registered: true,
            _not_send: PhantomData,
        }
    }

    fn update(&self, f: impl FnOnce(&mut ScopeOverrides)) {
        if self.registered {
            self.drawer
                .update_scoped_config(self.thread, self.guard_id, f);
        }
    }

    fn resolved(&self) -> ScopedConfigData {
        self.drawer
            .resolve_scoped_config_upto(self.thread, self.guard_id)
    }

    pub fn guard_id(&self) -> u64 {
        self.guard_id
    }

    /// Line thickness for wireframe shapes; 0 draws thin lines.
    pub fn with_thickness(self, value: f32) -> Self {
        let value = ScopedConfigData::clamp_thickness(value);
        self.update(|o| o.thickness = Some(value));
        self
    }

    /// Brightness of the center of thick lines, 0..=1.
    pub fn with_center_brightness(self, value: f32) -> Self {
        let value = ScopedConfigData::clamp_brightness(value);
        self.update(|o| o.center_brightness = Some(value));
        self
    }

    pub fn with_hd_sphere(self, value: bool) -> Self {
        self.update(|o| o.hd_sphere = Some(value));
        self
    }

    pub fn with_plane_size(self, value: f32) -> Self {
        self.update(|o| o.plane_size = Some(value));
        self
    }

    pub fn thickness(&self) -> f32 {
        self.resolved().thickness
    }

    pub fn center_brightness(&self) -> f32 {
        self.resolved().center_brightness
    }

    pub fn is_hd_sphere(&self) -> bool {
        self.resolved().hd_sphere
    }

    pub fn plane_size(&self) -> f32 {
        self.resolved().plane_size
    }

    /// Pop this scope now. Calling it again is a no-op.
    pub fn unregister(&mut self) {
        if !self.registered {
            return;
        }
        self.registered = false;
        self.drawer
            .unregister_scoped_config(self.thread, self.guard_id);
    }
}

impl Drop for ScopedConfig<'_> {
    fn drop(&mut self) {
        self.unregister();
    }
}

impl std::fmt::Debug for ScopedConfig<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedConfig")
            .field("thread", &self.thread)
            .field("guard_id", &self.guard_id)
            .field("registered", &self.registered)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current() -> ThreadId {
        std::thread::current().id()
    }

    #[test]
    fn test_empty_stack_resolves_defaults() {
        let mut registry = ScopedConfigRegistry::new(ScopedConfigData::default());
        assert_eq!(registry.resolve(current()), ScopedConfigData::default());
    }

    #[test]
    fn test_inner_inherits_outer() {
        let mut registry = ScopedConfigRegistry::default();
        let outer = registry.register(current());
        registry.update(current(), outer, |o| o.thickness = Some(0.3));
        let inner = registry.register(current());
        registry.update(current(), inner, |o| o.hd_sphere = Some(true));

        let data = registry.resolve(current());
        assert_eq!(data.thickness, 0.3);
        assert!(data.hd_sphere);

        let outer_view = registry.resolve_upto(current(), outer);
        assert!(!outer_view.hd_sphere);
    }

    #[test]
    fn test_outer_edit_after_inner_exists_does_not_leak() {
        let mut registry = ScopedConfigRegistry::default();
        let outer = registry.register(current());
        registry.update(current(), outer, |o| o.thickness = Some(0.3));
        let inner = registry.register(current());

        registry.update(current(), outer, |o| o.thickness = Some(0.9));
        registry.set_defaults(ScopedConfigData {
            hd_sphere: true,
            ..Default::default()
        });

        let data = registry.resolve(current());
        assert_eq!(data.thickness, 0.3);
        assert!(!data.hd_sphere);
        assert_eq!(registry.resolve_upto(current(), outer).thickness, 0.9);

        registry.unregister(current(), inner);
        assert_eq!(registry.resolve(current()).thickness, 0.9);
    }

    #[test]
    fn test_inner_override_wins() {
        let mut registry = ScopedConfigRegistry::default();
        let outer = registry.register(current());
        registry.update(current(), outer, |o| o.thickness = Some(0.3));
        let inner = registry.register(current());
        registry.update(current(), inner, |o| o.thickness = Some(0.1));
        assert_eq!(registry.resolve(current()).thickness, 0.1);

        registry.unregister(current(), inner);
        assert_eq!(registry.resolve(current()).thickness, 0.3);
    }

    #[test]
    fn test_cache_invalidated_on_update() {
        let mut registry = ScopedConfigRegistry::default();
        let id = registry.register(current());
        assert_eq!(registry.resolve(current()).thickness, 0.0);
        registry.update(current(), id, |o| o.thickness = Some(2.0));
        assert_eq!(registry.resolve(current()).thickness, 2.0);
    }

    #[test]
    fn test_double_unregister_is_noop() {
        let mut registry = ScopedConfigRegistry::default();
        let id = registry.register(current());
        assert!(registry.unregister(current(), id));
        assert!(!registry.unregister(current(), id));
        assert_eq!(registry.active_count(), 0);
        assert_eq!(registry.created_count(), 1);
    }

    #[test]
    fn test_threads_are_isolated() {
        let mut registry = ScopedConfigRegistry::default();
        let id = registry.register(current());
        registry.update(current(), id, |o| o.thickness = Some(1.0));

        let other = std::thread::spawn(|| std::thread::current().id())
            .join()
            .unwrap();
        assert_eq!(registry.resolve(other).thickness, 0.0);
    }
}
