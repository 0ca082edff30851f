use thiserror::Error;

/// Reasons an arena could not hand out memory.
///
/// Reset and drop never fail, so this only surfaces from construction, allocation and extension.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AllocError {
    /// The global allocator could not supply a node buffer.
    #[error("failed to allocate a {size} byte arena node")]
    AllocationFailure { size: usize },

    /// A single request is larger than the node it would have to fit in.
    /// Requests are never split across nodes.
    #[error("requested {requested} bytes, but arena nodes hold at most {capacity} bytes")]
    OversizeRequest { requested: usize, capacity: usize },

    /// `element_size * count` does not fit in `usize`.
    #[error("zeroed allocation of {count} elements of {element_size} bytes overflows usize")]
    SizeOverflow { element_size: usize, count: usize },

    /// An arena is required but none was given.
    #[error("no arena")]
    InvalidArena,
}
