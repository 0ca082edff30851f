//! Chained bump arena.
//!
//! [`Arena`] hands out raw bytes by advancing a cursor through a backing buffer. When the buffer
//! is exhausted, another is chained on. Individual allocations are never freed: the whole arena
//! is either [reset](Arena::reset) for reuse, or dropped.
//!
//! ```
//! use bumpchain_allocator::Arena;
//!
//! let mut arena = Arena::new(0).unwrap();
//! arena.alloc(10).unwrap();
//! assert_eq!(arena.total_used(), 10);
//! arena.reset();
//! assert_eq!(arena.total_used(), 0);
//! ```
//!
//! [`handle`] has the same operations for callers holding an `Option<Arena>`.

mod arena;
mod config;
mod error;
pub mod handle;
mod node;
mod stats;

pub use arena::Arena;
pub use config::{ArenaConfig, MIN_CHUNK_SIZE};
pub use error::AllocError;
pub use node::{ArenaNode, NODE_ALIGN};
pub use stats::{ArenaStats, NodeStats};

use static_assertions::{assert_impl_all, assert_not_impl_any, const_assert};

const_assert!(MIN_CHUNK_SIZE > 0);
const_assert!(NODE_ALIGN.is_power_of_two());

// Can be moved to another thread, but not shared between them
assert_impl_all!(Arena: Send);
assert_not_impl_any!(Arena: Sync);
