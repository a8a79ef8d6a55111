//! Reusable child-id buffers for the tree walk.
//!
//! Child lists are acquired on entry to a node with children and released
//! once its children are processed. Acquire/release is strictly nested, so a
//! plain free list is enough.

use crate::capture::NodeId;

/// Free list of child-id buffers
#[derive(Debug, Default)]
pub struct NodePool {
    free: Vec<Vec<NodeId>>,
    acquired: usize,
    released: usize,
    allocated: usize,
}

impl NodePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a cleared buffer, reusing a released one when available
    pub fn acquire(&mut self) -> Vec<NodeId> {
        self.acquired += 1;
        self.free.pop().unwrap_or_else(|| {
            self.allocated += 1;
            Vec::new()
        })
    }

    /// Clear a buffer and return it to the free list
    pub fn release(&mut self, mut buffer: Vec<NodeId>) {
        buffer.clear();
        self.released += 1;
        self.free.push(buffer);
    }

    /// Buffers currently on the free list
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    /// Buffers handed out and not yet released
    pub fn outstanding(&self) -> usize {
        self.acquired - self.released
    }

    pub fn acquire_count(&self) -> usize {
        self.acquired
    }

    pub fn release_count(&self) -> usize {
        self.released
    }

    /// Buffers freshly allocated (peak nesting of nodes with children)
    pub fn allocation_count(&self) -> usize {
        self.allocated
    }

    /// Drop every pooled buffer, returning how many were freed
    pub fn drain(&mut self) -> usize {
        let freed = self.free.len();
        self.free.clear();
        self.free.shrink_to_fit();
        freed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_released_buffer_is_reused() {
        let mut pool = NodePool::new();
        let mut buffer = pool.acquire();
        buffer.extend([1, 2, 3]);
        let capacity = buffer.capacity();
        pool.release(buffer);

        let reused = pool.acquire();
        assert!(reused.is_empty());
        assert_eq!(reused.capacity(), capacity);
        assert_eq!(pool.allocation_count(), 1);
        pool.release(reused);
    }

    #[test]
    fn test_nested_acquire_allocates_per_level() {
        let mut pool = NodePool::new();
        let outer = pool.acquire();
        let inner = pool.acquire();
        assert_eq!(pool.outstanding(), 2);
        pool.release(inner);
        pool.release(outer);

        assert_eq!(pool.acquire_count(), pool.release_count());
        assert_eq!(pool.free_len(), 2);
        assert_eq!(pool.allocation_count(), 2);
    }

    #[test]
    fn test_drain_empties_free_list() {
        let mut pool = NodePool::new();
        let buffer = pool.acquire();
        pool.release(buffer);
        assert_eq!(pool.drain(), 1);
        assert_eq!(pool.free_len(), 0);
    }
}
