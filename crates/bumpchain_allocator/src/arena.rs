use std::{
    cell::{Cell, RefCell},
    fmt,
    mem::{self, MaybeUninit},
    ptr::NonNull,
    slice, str,
};

use tracing::{debug, trace};

use crate::{AllocError, ArenaConfig, ArenaNode, ArenaStats, NodeStats};

/// Chained bump allocator.
///
/// Memory comes from a chain of [`ArenaNode`]s. Allocation advances the cursor of the current
/// node. When the current node cannot fit a request, the rest of it is abandoned and allocation
/// moves to the next node in the chain, appending a new one if there is none.
///
/// Nothing is freed individually. [`Arena::reset`] makes all memory available again without
/// releasing it, and dropping the `Arena` releases every node.
///
/// `Arena` is `Send` but not `Sync`. Use one arena per thread.
pub struct Arena {
    nodes: RefCell<Vec<ArenaNode>>,
    /// Index of the node allocation starts from. Nodes before it are exhausted.
    current: Cell<usize>,
    config: ArenaConfig,
}

impl Arena {
    /// Create an arena whose first node holds `max(MIN_CHUNK_SIZE, min_size)` bytes.
    ///
    /// # Errors
    /// [`AllocError::AllocationFailure`] if the first node's buffer cannot be allocated.
    pub fn new(min_size: usize) -> Result<Self, AllocError> {
        Self::with_config(ArenaConfig::default(), min_size)
    }

    /// Create an arena whose first node holds `max(config.min_chunk_size(), min_size)` bytes.
    ///
    /// # Errors
    /// [`AllocError::AllocationFailure`] if the first node or its buffer cannot be allocated.
    pub fn with_config(config: ArenaConfig, min_size: usize) -> Result<Self, AllocError> {
        let mut nodes = Vec::new();
        reserve_node_slot(&mut nodes)?;
        let head = ArenaNode::new(config.node_capacity(min_size))?;
        debug!(capacity = head.capacity(), "created arena");
        nodes.push(head);
        Ok(Self { nodes: RefCell::new(nodes), current: Cell::new(0), config })
    }

    /// Reset the arena and hand it back, for callers who want "a clean arena" whether or not
    /// they already had one.
    #[must_use]
    pub fn recycle(mut self) -> Self {
        self.reset();
        self
    }

    /// Release all nodes. Same as dropping the arena.
    pub fn destroy(self) {
        debug!(nodes = self.node_count(), capacity = self.total_capacity(), "destroying arena");
    }

    pub fn config(&self) -> ArenaConfig {
        self.config
    }

    /// Allocate `size` uninitialized bytes.
    ///
    /// The returned pointer is valid for reads and writes of `size` bytes until the arena is
    /// reset or dropped. Its alignment is only what the position in the node happens to give.
    ///
    /// A `size` of 0 always succeeds and returns the current cursor without consuming anything.
    ///
    /// # Errors
    /// * [`AllocError::OversizeRequest`] if `size` is larger than the current node's capacity.
    ///   Requests are never split across nodes.
    /// * [`AllocError::AllocationFailure`] if the chain had to be extended and the new node
    ///   or its buffer could not be allocated.
    pub fn alloc(&self, size: usize) -> Result<NonNull<u8>, AllocError> {
        let mut nodes = self.nodes.borrow_mut();
        let mut index = self.current.get();

        // New nodes for this request get the same capacity as the node it started in
        let capacity = nodes[index].capacity();
        if size > capacity {
            return Err(AllocError::OversizeRequest { requested: size, capacity });
        }

        loop {
            if let Some(ptr) = nodes[index].bump(size) {
                self.current.set(index);
                return Ok(ptr);
            }

            trace!(node = index, remaining = nodes[index].remaining(), size, "node exhausted");
            index += 1;
            if index == nodes.len() {
                reserve_node_slot(&mut nodes)?;
                let node = ArenaNode::new(capacity)?;
                debug!(node = index, capacity, "extended arena");
                nodes.push(node);
            }
        }
    }

    /// Allocate `element_size * count` bytes, all set to zero.
    ///
    /// # Errors
    /// * [`AllocError::SizeOverflow`] if `element_size * count` overflows `usize`.
    ///   Nothing is allocated in this case.
    /// * Same as [`Arena::alloc`] otherwise.
    pub fn alloc_zeroed(
        &self,
        element_size: usize,
        count: usize,
    ) -> Result<NonNull<u8>, AllocError> {
        let size = element_size
            .checked_mul(count)
            .ok_or(AllocError::SizeOverflow { element_size, count })?;
        let ptr = self.alloc(size)?;
        // SAFETY: `alloc` returned a region valid for writes of `size` bytes.
        unsafe { ptr.as_ptr().write_bytes(0, size) };
        Ok(ptr)
    }

    /// Allocate `len` zeroed bytes as a slice which lives as long as the borrow of the arena.
    ///
    /// # Errors
    /// Same as [`Arena::alloc`].
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_bytes_zeroed(&self, len: usize) -> Result<&mut [u8], AllocError> {
        let ptr = self.alloc_zeroed(1, len)?;
        // SAFETY: `len` bytes were just allocated and zeroed. The region is not handed out
        // again until `reset`, which takes `&mut self` so cannot run while the slice is alive.
        Ok(unsafe { slice::from_raw_parts_mut(ptr.as_ptr(), len) })
    }

    /// Copy `src` into the arena.
    ///
    /// # Errors
    /// Same as [`Arena::alloc`].
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_slice_copy(&self, src: &[u8]) -> Result<&mut [u8], AllocError> {
        let ptr = self.alloc(src.len())?;
        // SAFETY: Destination is `src.len()` freshly allocated bytes, so cannot overlap `src`.
        // Exclusive until `reset`, same as `alloc_bytes_zeroed`.
        unsafe {
            ptr.as_ptr().copy_from_nonoverlapping(src.as_ptr(), src.len());
            Ok(slice::from_raw_parts_mut(ptr.as_ptr(), src.len()))
        }
    }

    /// Copy `src` into the arena.
    ///
    /// # Errors
    /// Same as [`Arena::alloc`].
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_str(&self, src: &str) -> Result<&mut str, AllocError> {
        let bytes = self.alloc_slice_copy(src.as_bytes())?;
        // SAFETY: Bytes were copied from a `&str`, so are valid UTF-8.
        Ok(unsafe { str::from_utf8_unchecked_mut(bytes) })
    }

    /// Append a node of `max(min_chunk_size, min_size)` bytes to the end of the chain.
    ///
    /// The current node is unchanged. Allocation reaches the new node once every node before
    /// it is exhausted, so this can be used to grow the chain ahead of time.
    ///
    /// # Errors
    /// [`AllocError::AllocationFailure`] if the node or its buffer cannot be allocated.
    /// The chain is unchanged in that case.
    pub fn extend(&self, min_size: usize) -> Result<NodeStats, AllocError> {
        let mut nodes = self.nodes.borrow_mut();
        reserve_node_slot(&mut nodes)?;
        let node = ArenaNode::new(self.config.node_capacity(min_size))?;
        let stats = NodeStats { capacity: node.capacity(), used: node.used() };
        debug!(node = nodes.len(), capacity = stats.capacity, "extended arena");
        nodes.push(node);
        Ok(stats)
    }

    /// Rewind every node. All previous allocations become invalid.
    ///
    /// No memory is released, so the next allocations reuse the existing chain from the start.
    pub fn reset(&mut self) {
        let nodes = self.nodes.get_mut();
        for node in nodes.iter_mut() {
            node.rewind();
        }
        self.current.set(0);
        debug!(nodes = nodes.len(), "reset arena");
    }

    /// Sum of all node capacities.
    pub fn total_capacity(&self) -> usize {
        self.nodes.borrow().iter().map(ArenaNode::capacity).sum()
    }

    /// Sum of bytes handed out from all nodes since the last reset.
    ///
    /// Space abandoned at the end of an exhausted node is not counted.
    pub fn total_used(&self) -> usize {
        self.nodes.borrow().iter().map(ArenaNode::used).sum()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.borrow().len()
    }

    pub fn node_stats(&self) -> Vec<NodeStats> {
        self.nodes
            .borrow()
            .iter()
            .map(|node| NodeStats { capacity: node.capacity(), used: node.used() })
            .collect()
    }

    pub fn stats(&self) -> ArenaStats {
        self.node_stats().into_iter().collect()
    }

    /// Iterate over the used part of each node, head first.
    ///
    /// Takes `&mut self` so no allocation can be written to while the chunks are borrowed.
    /// Bytes from [`Arena::alloc`] which were never written are uninitialized.
    pub fn iter_allocated_chunks(&mut self) -> impl Iterator<Item = &[MaybeUninit<u8>]> + '_ {
        self.nodes.get_mut().iter().map(ArenaNode::allocated_bytes)
    }
}

/// Make room in the chain for one more node, so appending it cannot abort on allocation failure.
fn reserve_node_slot(nodes: &mut Vec<ArenaNode>) -> Result<(), AllocError> {
    nodes
        .try_reserve(1)
        .map_err(|_| AllocError::AllocationFailure { size: mem::size_of::<ArenaNode>() })
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats();
        f.debug_struct("Arena")
            .field("nodes", &stats.nodes)
            .field("capacity", &stats.capacity)
            .field("used", &stats.used)
            .field("current", &self.current.get())
            .finish()
    }
}
