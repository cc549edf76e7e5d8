//! Generation-checked slot arena.
//!
//! [`SlotPool<T>`] stores values in a flat `Vec` of slots. Removing a value
//! leaves its slot empty and pushes the index onto a free list; the next
//! insert reuses it before the vector grows. Every slot carries a generation
//! counter that is bumped on removal, so a [`SlotHandle`] taken before the
//! slot was recycled no longer resolves.
//!
//! # Example
//!
//! ```
//! use debug_overlay_core::pool::SlotPool;
//!
//! let mut pool = SlotPool::new();
//! let a = pool.insert("sphere");
//! assert_eq!(pool.get(a), Some(&"sphere"));
//!
//! // Reclaiming the slot makes the old handle stale
//! pool.remove(a);
//! assert!(pool.get(a).is_none());
//!
//! // The freed slot is reused, under a new generation
//! let b = pool.insert("cube");
//! assert_eq!(a.index(), b.index());
//! assert_ne!(a, b);
//! assert!(pool.get(a).is_none());
//! ```

/// Stable reference to a value in a [`SlotPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotHandle {
    index: u32,
    generation: u32,
}

impl SlotHandle {
    /// Slot index inside the pool.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Generation the slot had when this handle was issued.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// A growable arena with free-list reuse and generation-checked handles.
#[derive(Debug)]
pub struct SlotPool<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> SlotPool<T> {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the pool has no live values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots ever allocated (live + free).
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of empty slots waiting for reuse.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Insert a value, reusing a free slot when one exists.
    pub fn insert(&mut self, value: T) -> SlotHandle {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            debug_assert!(slot.value.is_none());
            slot.value = Some(value);
            return SlotHandle {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        SlotHandle {
            index,
            generation: 0,
        }
    }

    /// Check whether `handle` still refers to a live value.
    pub fn contains(&self, handle: SlotHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Get a reference to the value behind `handle`.
    ///
    /// Returns `None` if the slot was reclaimed since the handle was issued.
    pub fn get(&self, handle: SlotHandle) -> Option<&T> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    /// Get a mutable reference to the value behind `handle`.
    pub fn get_mut(&mut self, handle: SlotHandle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    /// Remove the value behind `handle` and return its slot to the free list.
    pub fn remove(&mut self, handle: SlotHandle) -> Option<T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.len -= 1;
        Some(value)
    }

    /// Remove every value for which `keep` returns `false`.
    ///
    /// Removed values are passed to `on_removed` together with their (now stale) handle.
    pub fn retain(
        &mut self,
        mut keep: impl FnMut(SlotHandle, &mut T) -> bool,
        mut on_removed: impl FnMut(SlotHandle, T),
    ) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let handle = SlotHandle {
                index: index as u32,
                generation: slot.generation,
            };
            let Some(value) = slot.value.as_mut() else {
                continue;
            };
            if keep(handle, value) {
                continue;
            }
            if let Some(value) = slot.value.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
                self.len -= 1;
                on_removed(handle, value);
            }
        }
    }

    /// Remove every value. Slots are kept for reuse and all handles go stale.
    pub fn clear(&mut self) {
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate().rev() {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free.push(index as u32);
        }
        self.len = 0;
    }

    /// Iterate over live values in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotHandle, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value.as_ref().map(|value| {
                (
                    SlotHandle {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    value,
                )
            })
        })
    }

    /// Iterate mutably over live values in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SlotHandle, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.value.as_mut().map(|value| {
                (
                    SlotHandle {
                        index: index as u32,
                        generation,
                    },
                    value,
                )
            })
        })
    }

    /// Iterate over live values without handles.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(|slot| slot.value.as_ref())
    }

    /// Iterate mutably over live values without handles.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut().filter_map(|slot| slot.value.as_mut())
    }
}

impl<T> Default for SlotPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let pool = SlotPool::<u32>::new();
        assert!(pool.is_empty());
        assert_eq!(pool.len(), 0);
        assert_eq!(pool.capacity(), 0);
    }

    #[test]
    fn test_insert_and_get() {
        let mut pool = SlotPool::new();
        let a = pool.insert(1);
        let b = pool.insert(2);
        assert_eq!(pool.get(a), Some(&1));
        assert_eq!(pool.get(b), Some(&2));
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_remove_reuses_slot_before_growing() {
        let mut pool = SlotPool::new();
        let a = pool.insert(1);
        pool.insert(2);
        assert_eq!(pool.remove(a), Some(1));
        assert_eq!(pool.free_count(), 1);

        let c = pool.insert(3);
        assert_eq!(c.index(), a.index());
        assert_eq!(pool.capacity(), 2);
        assert_eq!(pool.free_count(), 0);
    }

    #[test]
    fn test_stale_handle_does_not_resolve() {
        let mut pool = SlotPool::new();
        let a = pool.insert(10);
        pool.remove(a);
        let b = pool.insert(20);

        assert_eq!(a.index(), b.index());
        assert_ne!(a.generation(), b.generation());
        assert!(pool.get(a).is_none());
        assert!(pool.get_mut(a).is_none());
        assert!(pool.remove(a).is_none());
        assert_eq!(pool.get(b), Some(&20));
    }

    #[test]
    fn test_double_remove_is_noop() {
        let mut pool = SlotPool::new();
        let a = pool.insert(5);
        assert_eq!(pool.remove(a), Some(5));
        assert_eq!(pool.remove(a), None);
        assert_eq!(pool.len(), 0);
        assert_eq!(pool.free_count(), 1);
    }

    #[test]
    fn test_retain_reports_removed() {
        let mut pool = SlotPool::new();
        for i in 0..6 {
            pool.insert(i);
        }
        let mut removed = Vec::new();
        pool.retain(|_, v| *v % 2 == 0, |_, v| removed.push(v));

        assert_eq!(removed, vec![1, 3, 5]);
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.values().copied().collect::<Vec<_>>(), vec![0, 2, 4]);
    }

    #[test]
    fn test_clear_keeps_slots_and_invalidates_handles() {
        let mut pool = SlotPool::new();
        let handles: Vec<_> = (0..4).map(|i| pool.insert(i)).collect();
        pool.clear();

        assert!(pool.is_empty());
        assert_eq!(pool.capacity(), 4);
        assert_eq!(pool.free_count(), 4);
        assert!(handles.iter().all(|h| !pool.contains(*h)));

        // Reinsertion fills the existing slots, lowest index first
        let h = pool.insert(9);
        assert_eq!(h.index(), 0);
        assert_eq!(pool.capacity(), 4);
    }

    #[test]
    fn test_iter_mut_updates_values() {
        let mut pool = SlotPool::new();
        let a = pool.insert(1);
        let b = pool.insert(2);
        for (_, v) in pool.iter_mut() {
            *v *= 10;
        }
        assert_eq!(pool.get(a), Some(&10));
        assert_eq!(pool.get(b), Some(&20));
        let handles: Vec<_> = pool.iter().map(|(h, _)| h).collect();
        assert_eq!(handles, vec![a, b]);
    }
}
