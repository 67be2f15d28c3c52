//! Error types for the Arrowhead memory core.
//!
//! The allocators treat every one of these as fatal: the plain entry points
//! (`LinearArena::push`, `LinearArena::set_pos_back`, `LinearArena::create`)
//! hand the error to the fail-fast reporter. The `try_*` variants return
//! them instead, for callers that size arenas dynamically.

use std::fmt;

/// Errors that can occur in the memory core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A push would move the offset past the arena's capacity.
    CapacityExceeded {
        /// The requested allocation size in bytes.
        requested: usize,
        /// The offset at the time of the request.
        offset: usize,
        /// The arena's total capacity.
        capacity: usize,
    },

    /// A position outside `0..=capacity` was passed to `set_pos_back`.
    InvalidPosition {
        /// The requested position.
        pos: usize,
        /// The arena's total capacity.
        capacity: usize,
    },

    /// The system allocator could not provide the arena block.
    OutOfMemory {
        /// Total block size in bytes (header included).
        size: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CapacityExceeded {
                requested,
                offset,
                capacity,
            } => write!(
                f,
                "Arena pushed out of bounds: requested {requested} bytes at offset {offset}, capacity {capacity} bytes"
            ),
            Error::InvalidPosition { pos, capacity } => write!(
                f,
                "Arena set pos must be inside the bounds: position {pos}, capacity {capacity} bytes"
            ),
            Error::OutOfMemory { size } => {
                write!(f, "Out of memory: failed to allocate arena block of {size} bytes")
            }
        }
    }
}

impl std::error::Error for Error {}

/// Result type for memory core operations.
pub type Result<T> = std::result::Result<T, Error>;
