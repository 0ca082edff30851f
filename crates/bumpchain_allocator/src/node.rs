//! A single backing buffer of an [`Arena`](crate::Arena), and a cursor into it.

use std::{
    alloc::{self, Layout},
    mem::MaybeUninit,
    ptr::NonNull,
    slice,
};

use crate::AllocError;

/// Alignment of every node buffer.
///
/// Matches what `malloc` gives on 64-bit platforms. The cursor itself is never re-aligned, so only
/// the first allocation in a node is guaranteed to start on this boundary.
pub const NODE_ALIGN: usize = 16;

/// One contiguous buffer. Bytes `[0, cursor)` are handed out, `[cursor, capacity)` are free.
pub struct ArenaNode {
    memory: NonNull<u8>,
    cursor: usize,
    capacity: usize,
}

// SAFETY: `ArenaNode` is the only owner of `memory`. Nothing else holds on to the buffer,
// so moving the node to another thread moves the buffer with it.
unsafe impl Send for ArenaNode {}

impl ArenaNode {
    /// Allocate a node with a buffer of exactly `capacity` bytes.
    ///
    /// # Errors
    /// [`AllocError::AllocationFailure`] if the global allocator returns null or `capacity`
    /// does not form a valid [`Layout`] (including `capacity == 0`).
    pub fn new(capacity: usize) -> Result<Self, AllocError> {
        let failure = AllocError::AllocationFailure { size: capacity };
        if capacity == 0 {
            return Err(failure);
        }
        let layout = Layout::from_size_align(capacity, NODE_ALIGN).map_err(|_| failure)?;
        // SAFETY: `layout` has non-zero size, checked above.
        let memory = unsafe { alloc::alloc(layout) };
        let memory = NonNull::new(memory).ok_or(failure)?;
        Ok(Self { memory, cursor: 0, capacity })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn used(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity - self.cursor
    }

    /// Claim the next `size` bytes.
    ///
    /// Returns pointer to where the cursor was, or `None` if fewer than `size` bytes are free.
    /// A failed bump leaves the node untouched.
    #[inline]
    pub fn bump(&mut self, size: usize) -> Option<NonNull<u8>> {
        if size > self.remaining() {
            return None;
        }
        // SAFETY: `cursor + size <= capacity`, so `cursor` is in bounds of the buffer
        // (or one past the end when the node is full and `size` is 0).
        let ptr = unsafe { self.memory.as_ptr().add(self.cursor) };
        self.cursor += size;
        debug_assert!(self.cursor <= self.capacity);
        // SAFETY: Offset from a non-null pointer, within the same allocation.
        Some(unsafe { NonNull::new_unchecked(ptr) })
    }

    /// Rewind the cursor. Everything handed out before is free again.
    #[inline]
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Bytes handed out since the last rewind.
    ///
    /// May contain uninitialized bytes: [`Arena::alloc`](crate::Arena::alloc) does not
    /// initialize what it returns.
    pub fn allocated_bytes(&self) -> &[MaybeUninit<u8>] {
        // SAFETY: `[0, cursor)` is within the buffer, and `MaybeUninit<u8>` has no validity
        // requirements.
        unsafe {
            slice::from_raw_parts(self.memory.as_ptr().cast::<MaybeUninit<u8>>(), self.cursor)
        }
    }

    /// Does `ptr` point into this node's buffer?
    pub fn contains(&self, ptr: *const u8) -> bool {
        let start = self.memory.as_ptr() as usize;
        let addr = ptr as usize;
        addr >= start && addr < start + self.capacity
    }
}

impl Drop for ArenaNode {
    fn drop(&mut self) {
        // SAFETY: Same size and align the buffer was allocated with in `ArenaNode::new`,
        // which already validated them.
        let layout = unsafe { Layout::from_size_align_unchecked(self.capacity, NODE_ALIGN) };
        // SAFETY: `memory` was allocated with `layout` and is released only here.
        unsafe { alloc::dealloc(self.memory.as_ptr(), layout) };
    }
}
