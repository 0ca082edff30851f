/// Default floor for node capacity: 64 KiB.
///
/// Lowering it means more calls into the global allocator as the chain grows.
pub const MIN_CHUNK_SIZE: usize = 0x10000;

/// Per-arena tuning.
///
/// ```
/// use bumpchain_allocator::{Arena, ArenaConfig};
///
/// let config = ArenaConfig::default().with_min_chunk_size(4096);
/// let arena = Arena::with_config(config, 0).unwrap();
/// assert_eq!(arena.total_capacity(), 4096);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaConfig {
    min_chunk_size: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self { min_chunk_size: MIN_CHUNK_SIZE }
    }
}

impl ArenaConfig {
    /// Set the smallest capacity any node of the arena may have.
    ///
    /// Zero is clamped to 1, as a node buffer cannot be zero-sized.
    #[must_use]
    pub fn with_min_chunk_size(mut self, min_chunk_size: usize) -> Self {
        self.min_chunk_size = min_chunk_size.max(1);
        self
    }

    pub fn min_chunk_size(&self) -> usize {
        self.min_chunk_size
    }

    /// Capacity of a node created for a request of `requested` bytes.
    #[inline]
    pub(crate) fn node_capacity(&self, requested: usize) -> usize {
        requested.max(self.min_chunk_size)
    }
}
