use crate::vertex::InstanceData;

/// Initial allocation of an instance buffer, in instances.
pub const MIN_INSTANCE_CAPACITY: usize = 32;

/// Renderer-facing instance buffer of one shape kind.
///
/// The allocation only grows, doubling when the visible count outgrows it.
/// Each tick just rewrites the front of the buffer and moves the logical
/// visible count.
#[derive(Debug, Default)]
pub struct InstanceBuffer {
    data: Vec<InstanceData>,
    visible_count: usize,
    previous_visible_count: usize,
    reallocated: bool,
}

impl InstanceBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocated size in instances.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    /// Instances written by the last [`write`](Self::write).
    pub fn visible(&self) -> &[InstanceData] {
        &self.data[..self.visible_count]
    }

    /// Whether the last write had to grow the allocation.
    pub fn was_reallocated(&self) -> bool {
        self.reallocated
    }

    /// A buffer only needs uploading if it shows something now or did last time.
    pub fn needs_upload(&self) -> bool {
        self.visible_count > 0 || self.previous_visible_count > 0
    }

    /// Replace the visible contents with `instances`.
    pub fn write(&mut self, instances: impl ExactSizeIterator<Item = InstanceData>) {
        let count = instances.len();
        self.ensure_capacity(count);
        let mut written = 0;
        for (slot, instance) in self.data.iter_mut().zip(instances) {
            *slot = instance;
            written += 1;
        }
        self.set_visible_count(written);
    }

    /// Hide everything without touching the allocation.
    pub fn reset(&mut self) {
        self.reallocated = false;
        self.set_visible_count(0);
    }

    fn set_visible_count(&mut self, count: usize) {
        self.previous_visible_count = self.visible_count;
        self.visible_count = count;
    }

    fn ensure_capacity(&mut self, count: usize) {
        self.reallocated = false;
        if count <= self.data.len() {
            return;
        }
        let mut capacity = self.data.len().max(MIN_INSTANCE_CAPACITY);
        while capacity < count {
            capacity *= 2;
        }
        log::debug!(
            "Growing instance buffer from {} to {} instances",
            self.data.len(),
            capacity
        );
        self.data.resize(capacity, InstanceData::default());
        self.reallocated = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instances(n: usize) -> impl ExactSizeIterator<Item = InstanceData> {
        (0..n).map(|i| InstanceData {
            color: [i as f32, 0.0, 0.0, 1.0],
            ..Default::default()
        })
    }

    #[test]
    fn test_growth_doubles() {
        let mut buffer = InstanceBuffer::new();
        buffer.write(instances(10));
        assert_eq!(buffer.capacity(), MIN_INSTANCE_CAPACITY);
        assert!(buffer.was_reallocated());

        buffer.write(instances(MIN_INSTANCE_CAPACITY + 1));
        assert_eq!(buffer.capacity(), MIN_INSTANCE_CAPACITY * 2);

        buffer.write(instances(MIN_INSTANCE_CAPACITY * 5));
        assert_eq!(buffer.capacity(), MIN_INSTANCE_CAPACITY * 8);
    }

    #[test]
    fn test_shrinking_keeps_allocation() {
        let mut buffer = InstanceBuffer::new();
        buffer.write(instances(100));
        let capacity = buffer.capacity();

        buffer.write(instances(3));
        assert_eq!(buffer.capacity(), capacity);
        assert!(!buffer.was_reallocated());
        assert_eq!(buffer.visible_count(), 3);
        assert_eq!(buffer.visible()[2].color[0], 2.0);
    }

    #[test]
    fn test_needs_upload_once_after_emptying() {
        let mut buffer = InstanceBuffer::new();
        assert!(!buffer.needs_upload());

        buffer.write(instances(2));
        assert!(buffer.needs_upload());

        buffer.write(instances(0));
        assert!(buffer.needs_upload());

        buffer.write(instances(0));
        assert!(!buffer.needs_upload());
    }
}
