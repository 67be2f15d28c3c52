//! Arrowhead memory core
//!
//! This crate provides the allocation primitives the Arrowhead engine builds
//! on, including:
//!
//! - **Linear arenas**: one-block bump allocation with save/restore points
//! - **Scratch spaces**: scoped restore points over an arena
//! - **Thread scratch arenas**: a temp and a persistent arena per thread
//!   (requires the `scratch` feature, on by default)
//! - **Pools**: typed free lists carved from an arena
//! - **Intrusive reference counting**: `OwningRef<T>` over objects that embed
//!   their own atomic count
//!
//! Capacity violations are bugs, not recoverable conditions: they go to the
//! fail-fast reporter in `arrowhead-log` unless a `try_*` entry point is
//! used.
//!
//! # Example
//!
//! ```
//! use arrowhead_mem::{LinearArena, PoolAllocator, ScratchSpace};
//!
//! let arena = LinearArena::create(64 * 1024);
//!
//! let mut pool = PoolAllocator::<[u32; 4]>::new();
//! let block = pool.allocate(&arena, [1, 2, 3, 4]);
//!
//! let mut scratch = ScratchSpace::new(&arena);
//! let tmp = arena.push_array_zero::<u8>(1024);
//! scratch.reset();
//!
//! assert_eq!(unsafe { block.as_ref() }[3], 4);
//! assert_eq!(arena.cursor(), tmp);
//! ```

pub mod arena;
pub mod context;
pub mod error;
pub mod pool;
pub mod rc;
pub mod scratch;
pub mod slot;

pub use arena::{ArenaHandle, LinearArena};
pub use context::{SCRATCH_SIZE, ScratchArenas, ScratchConfig, ScratchState};
pub use error::{Error, Result};
pub use pool::PoolAllocator;
pub use rc::{OwningRef, RefCount, RefCounted};
pub use scratch::ScratchSpace;
pub use slot::ArenaSlot;

#[cfg(feature = "scratch")]
pub use context::{
    dispose_scratch, init_scratch, init_scratch_with, scratch_state, with_persistent_scratch,
    with_temp_scratch,
};
