//! Entry points taking an optional arena.
//!
//! For callers that keep their arena as an `Option<Arena>` handle, where "no arena" is a valid
//! state (never created, or already destroyed). Cleanup and introspection treat `None` as an empty
//! arena. Anything which has to hand out memory fails with [`AllocError::InvalidArena`].
//!
//! ```
//! use bumpchain_allocator::handle;
//!
//! let mut arena = Some(handle::create(None, 0).unwrap());
//! handle::allocate(arena.as_ref(), 10).unwrap();
//! assert_eq!(handle::total_used(arena.as_ref()), 10);
//!
//! handle::destroy(arena.take());
//! assert_eq!(handle::total_used(arena.as_ref()), 0);
//! ```

use std::ptr::NonNull;

use crate::{AllocError, Arena, NodeStats};

/// Get a clean arena.
///
/// With an existing arena, resets and returns it. Nothing is allocated or released.
/// Otherwise creates a new one with a first node of `max(MIN_CHUNK_SIZE, min_size)` bytes.
///
/// # Errors
/// [`AllocError::AllocationFailure`] if a new arena's first node cannot be allocated.
pub fn create(existing: Option<Arena>, min_size: usize) -> Result<Arena, AllocError> {
    match existing {
        Some(arena) => Ok(arena.recycle()),
        None => Arena::new(min_size),
    }
}

/// Release the arena and all its nodes. No-op for `None`.
pub fn destroy(arena: Option<Arena>) {
    if let Some(arena) = arena {
        arena.destroy();
    }
}

/// See [`Arena::alloc`].
///
/// # Errors
/// [`AllocError::InvalidArena`] for `None`, otherwise as [`Arena::alloc`].
pub fn allocate(arena: Option<&Arena>, size: usize) -> Result<NonNull<u8>, AllocError> {
    arena.ok_or(AllocError::InvalidArena)?.alloc(size)
}

/// See [`Arena::alloc_zeroed`].
///
/// # Errors
/// [`AllocError::InvalidArena`] for `None`, otherwise as [`Arena::alloc_zeroed`].
pub fn allocate_zeroed(
    arena: Option<&Arena>,
    element_size: usize,
    count: usize,
) -> Result<NonNull<u8>, AllocError> {
    arena.ok_or(AllocError::InvalidArena)?.alloc_zeroed(element_size, count)
}

/// Rewind every node. No-op for `None`.
pub fn reset(arena: Option<&mut Arena>) {
    if let Some(arena) = arena {
        arena.reset();
    }
}

/// See [`Arena::extend`].
///
/// # Errors
/// [`AllocError::InvalidArena`] for `None`, otherwise as [`Arena::extend`].
pub fn extend(arena: Option<&Arena>, min_size: usize) -> Result<NodeStats, AllocError> {
    arena.ok_or(AllocError::InvalidArena)?.extend(min_size)
}

/// Sum of node capacities, 0 for `None`.
pub fn total_capacity(arena: Option<&Arena>) -> usize {
    arena.map_or(0, Arena::total_capacity)
}

/// Sum of bytes in use, 0 for `None`.
pub fn total_used(arena: Option<&Arena>) -> usize {
    arena.map_or(0, Arena::total_used)
}
