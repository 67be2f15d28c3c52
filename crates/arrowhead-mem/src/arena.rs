//! Linear (bump) arena for the Arrowhead engine.
//!
//! A [`LinearArena`] hands out memory from one contiguous block with a
//! single monotonic cursor. Allocation is a bounds check and an addition;
//! deallocation happens in bulk by moving the cursor back ([`pop`],
//! [`set_pos_back`], [`clear`]). This suits per-frame and per-task
//! transient data.
//!
//! # Memory Layout
//!
//! [`LinearArena::create`] performs exactly one system allocation of
//! `HEADER_SIZE + capacity` bytes. The arena header lives at the front of
//! that block and the data region immediately follows it:
//!
//! ```text
//! +----------------+--------------------------------------------+
//! | LinearArena    | data region (capacity bytes)               |
//! | (header)       | [allocated .......][free ...............]  |
//! +----------------+--------------------------------------------+
//! ^ block start    ^ base                ^ cursor = base + offset
//! ```
//!
//! The returned [`ArenaHandle`] owns the block and frees it with a single
//! deallocation when dropped. Arenas never move: everything refers to them
//! by address.
//!
//! # Failure
//!
//! Pushing past capacity or seeking outside the arena is a sizing bug, not
//! a runtime condition. [`push`] and [`set_pos_back`] hand such errors to
//! the fail-fast reporter in `arrowhead-log`, which terminates the process.
//! [`try_push`] and [`try_set_pos_back`] return the [`Error`] instead.
//!
//! # Thread Safety
//!
//! A `LinearArena` is single-owner: its offset lives in a [`Cell`] and the
//! type is neither `Send` nor `Sync`. Use one arena per thread (see
//! [`crate::context`]).
//!
//! # Example
//!
//! ```
//! use arrowhead_mem::arena::LinearArena;
//!
//! let arena = LinearArena::create(1024);
//!
//! let header = arena.push(100);
//! let pos = arena.pos();
//! let _temp = arena.push(200);
//! assert_eq!(arena.pos(), 300);
//!
//! arena.set_pos_back(pos);
//! assert_eq!(arena.pos(), 100);
//! assert_eq!(arena.base(), header);
//! ```
//!
//! [`pop`]: LinearArena::pop
//! [`set_pos_back`]: LinearArena::set_pos_back
//! [`clear`]: LinearArena::clear
//! [`push`]: LinearArena::push
//! [`try_push`]: LinearArena::try_push
//! [`try_set_pos_back`]: LinearArena::try_set_pos_back

use crate::error::{Error, Result};
use arrowhead_log::{core_debug, core_fail};
use std::alloc::{self, Layout};
use std::cell::Cell;
use std::fmt;
use std::ops::Deref;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicU64, Ordering};

/// Alignment of the arena block and of its data region (16 bytes).
///
/// This covers every primitive type, `u128`, and 16-byte SIMD vectors, so
/// typed helpers over such types never need padding at offset 0.
pub const DEFAULT_ALIGNMENT: usize = 16;

/// Distance from the block start to the data region.
///
/// The header size rounded up to [`DEFAULT_ALIGNMENT`].
pub const HEADER_SIZE: usize =
    std::mem::size_of::<LinearArena>().next_multiple_of(DEFAULT_ALIGNMENT);

/// Source of per-arena identities, used to reject slots from other arenas.
static NEXT_ARENA_ID: AtomicU64 = AtomicU64::new(1);

/// A bump allocator over one contiguous, fixed-capacity block.
///
/// Only reachable through an [`ArenaHandle`]; see the module documentation
/// for the block layout.
///
/// # Invariants
///
/// - `0 <= offset <= capacity` at all times
/// - the cursor is always `base + offset`
///
/// The arena does not run constructors or destructors. Typed helpers return
/// pointers to uninitialized (or zeroed) memory and callers initialize it in
/// place.
pub struct LinearArena {
    /// Start of the data region, directly after the header.
    data: NonNull<u8>,
    /// Total capacity of the data region in bytes.
    total_size: usize,
    /// Current allocation offset.
    allocated: Cell<usize>,
    /// Bumped whenever the cursor moves backwards.
    generation: Cell<u64>,
    /// Unique identity of this arena.
    id: u64,
}

impl LinearArena {
    /// Creates an arena with `capacity` bytes of data.
    ///
    /// The header and the data region come from a single allocation; the
    /// data region starts [`HEADER_SIZE`] bytes after the header and is
    /// aligned to [`DEFAULT_ALIGNMENT`].
    ///
    /// # Arguments
    ///
    /// * `capacity` - Size of the data region in bytes. Fixed for the
    ///   arena's lifetime. Zero is allowed.
    ///
    /// # Returns
    ///
    /// The owning [`ArenaHandle`]. Dropping it (or calling
    /// [`ArenaHandle::dispose`]) frees the whole block.
    ///
    /// # Example
    ///
    /// ```
    /// use arrowhead_mem::arena::LinearArena;
    ///
    /// let arena = LinearArena::create(4096);
    /// assert_eq!(arena.capacity(), 4096);
    /// assert_eq!(arena.pos(), 0);
    /// ```
    ///
    /// # Panics
    ///
    /// Does not panic; if the system allocator fails, the failure is handed
    /// to the fail-fast reporter.
    #[must_use]
    pub fn create(capacity: usize) -> ArenaHandle {
        match Self::try_create(capacity) {
            Ok(handle) => handle,
            Err(err) => core_fail!("{err}"),
        }
    }

    /// Creates an arena, returning an error instead of reporting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfMemory`] if the block size overflows or the
    /// system allocator returns null.
    pub fn try_create(capacity: usize) -> Result<ArenaHandle> {
        let layout = Self::block_layout(capacity)?;

        // SAFETY: layout has a non-zero size (HEADER_SIZE > 0) and a valid
        // power-of-two alignment. A null return is checked below.
        let block = unsafe { alloc::alloc(layout) };
        let block = NonNull::new(block).ok_or(Error::OutOfMemory {
            size: layout.size(),
        })?;

        // SAFETY: HEADER_SIZE <= layout.size(), so the data pointer stays
        // inside (or one past the end of) the block. It carries the block's
        // provenance.
        let data = unsafe { block.add(HEADER_SIZE) };
        let header = block.cast::<LinearArena>();

        // SAFETY: the block is at least HEADER_SIZE >= size_of::<LinearArena>()
        // bytes, aligned to DEFAULT_ALIGNMENT >= align_of::<LinearArena>(),
        // and freshly allocated, so writing the header is valid.
        unsafe {
            header.as_ptr().write(LinearArena {
                data,
                total_size: capacity,
                allocated: Cell::new(0),
                generation: Cell::new(0),
                id: NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed),
            });
        }

        core_debug!(tag: "Arena", "created arena of {} bytes at {:p}", capacity, data);

        Ok(ArenaHandle { arena: header })
    }

    /// Layout of the whole block (header + data).
    fn block_layout(capacity: usize) -> Result<Layout> {
        let size = HEADER_SIZE
            .checked_add(capacity)
            .ok_or(Error::OutOfMemory { size: usize::MAX })?;
        let align = DEFAULT_ALIGNMENT.max(std::mem::align_of::<LinearArena>());
        Layout::from_size_align(size, align).map_err(|_| Error::OutOfMemory { size })
    }

    /// Allocates `size` uninitialized bytes at the cursor.
    ///
    /// The cursor and offset advance by exactly `size`; no alignment padding
    /// is inserted. Filling the arena to exactly its capacity is allowed.
    ///
    /// # Returns
    ///
    /// A pointer to `size` fresh bytes. For `size == 0` the pointer is the
    /// current cursor and must not be dereferenced.
    ///
    /// # Example
    ///
    /// ```
    /// use arrowhead_mem::arena::LinearArena;
    ///
    /// let arena = LinearArena::create(64);
    /// let a = arena.push(10);
    /// let b = arena.push(6);
    /// assert_eq!(b.as_ptr() as usize - a.as_ptr() as usize, 10);
    /// assert_eq!(arena.pos(), 16);
    /// ```
    ///
    /// # Panics
    ///
    /// Does not panic; exceeding the capacity is handed to the fail-fast
    /// reporter with the message "Arena pushed out of bounds".
    #[inline]
    pub fn push(&self, size: usize) -> NonNull<u8> {
        match self.try_push(size) {
            Ok(block) => block,
            Err(err) => self.fail(err),
        }
    }

    /// Allocates `size` uninitialized bytes, returning an error on overflow.
    ///
    /// On error the arena is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if the new offset would exceed
    /// the capacity.
    #[inline]
    pub fn try_push(&self, size: usize) -> Result<NonNull<u8>> {
        self.try_push_aligned(size, 1)
    }

    /// Allocates `size` bytes at a cursor first padded to `align`.
    ///
    /// The padding counts toward the offset. Padding and size are checked
    /// together, so a failed request leaves the arena unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if padding plus `size` does not
    /// fit.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `align` is not a power of two.
    pub fn try_push_aligned(&self, size: usize, align: usize) -> Result<NonNull<u8>> {
        debug_assert!(align.is_power_of_two(), "Alignment must be a power of two");

        let offset = self.allocated.get();
        let cursor_addr = self.data.as_ptr().addr().wrapping_add(offset);
        let padding = cursor_addr.wrapping_neg() & (align - 1);

        let exceeded = Error::CapacityExceeded {
            requested: size,
            offset,
            capacity: self.total_size,
        };
        let start = offset.checked_add(padding).ok_or(exceeded)?;
        let end = start
            .checked_add(size)
            .filter(|&end| end <= self.total_size)
            .ok_or(exceeded)?;

        self.allocated.set(end);

        // SAFETY: start <= end <= total_size, so the pointer stays inside the
        // data region (or one past its end for zero-sized requests).
        Ok(unsafe { self.data.add(start) })
    }

    /// Allocates `size` bytes at a cursor padded to `align`.
    ///
    /// # Panics
    ///
    /// Does not panic; exhaustion is handed to the fail-fast reporter.
    #[inline]
    pub fn push_aligned(&self, size: usize, align: usize) -> NonNull<u8> {
        match self.try_push_aligned(size, align) {
            Ok(block) => block,
            Err(err) => self.fail(err),
        }
    }

    /// Allocates `size` zero-filled bytes at the cursor.
    ///
    /// # Example
    ///
    /// ```
    /// use arrowhead_mem::arena::LinearArena;
    ///
    /// let arena = LinearArena::create(64);
    /// let block = arena.push_zero(32);
    /// let bytes = unsafe { std::slice::from_raw_parts(block.as_ptr(), 32) };
    /// assert!(bytes.iter().all(|&b| b == 0));
    /// ```
    pub fn push_zero(&self, size: usize) -> NonNull<u8> {
        let block = self.push(size);

        // SAFETY: push returned `size` writable bytes inside the data region.
        unsafe {
            block.as_ptr().write_bytes(0, size);
        }

        block
    }

    /// Allocates uninitialized space for `count` values of `T`.
    ///
    /// The cursor is padded to `align_of::<T>()` first. No constructors run;
    /// the caller initializes the elements in place.
    ///
    /// # Example
    ///
    /// ```
    /// use arrowhead_mem::arena::LinearArena;
    ///
    /// let arena = LinearArena::create(256);
    /// let values = arena.push_array::<u32>(4);
    /// for i in 0..4 {
    ///     unsafe { values.as_ptr().add(i).write(i as u32 * 10) };
    /// }
    /// let slice = unsafe { std::slice::from_raw_parts(values.as_ptr(), 4) };
    /// assert_eq!(slice, &[0, 10, 20, 30]);
    /// ```
    pub fn push_array<T>(&self, count: usize) -> NonNull<T> {
        let size = self.array_size::<T>(count);
        self.push_aligned(size, std::mem::align_of::<T>()).cast()
    }

    /// Allocates zero-filled space for `count` values of `T`.
    pub fn push_array_zero<T>(&self, count: usize) -> NonNull<T> {
        let size = self.array_size::<T>(count);
        let block = self.push_aligned(size, std::mem::align_of::<T>());

        // SAFETY: push_aligned returned `size` writable bytes.
        unsafe {
            block.as_ptr().write_bytes(0, size);
        }

        block.cast()
    }

    /// Allocates uninitialized space for one `T`.
    pub fn push_struct<T>(&self) -> NonNull<T> {
        self.push_array::<T>(1)
    }

    /// Allocates zero-filled space for one `T`.
    pub fn push_struct_zero<T>(&self) -> NonNull<T> {
        self.push_array_zero::<T>(1)
    }

    /// Byte size of `count` values of `T`, reporting on overflow.
    fn array_size<T>(&self, count: usize) -> usize {
        match std::mem::size_of::<T>().checked_mul(count) {
            Some(size) => size,
            None => self.fail(Error::CapacityExceeded {
                requested: usize::MAX,
                offset: self.allocated.get(),
                capacity: self.total_size,
            }),
        }
    }

    /// Retreats the cursor by `size` bytes.
    ///
    /// Popping more than is allocated clamps the offset at zero; it is not
    /// an error.
    pub fn pop(&self, size: usize) {
        let offset = self.allocated.get();
        self.rewind(offset - size.min(offset));
    }

    /// Returns the current offset, usable as a restore point.
    #[inline]
    #[must_use]
    pub fn pos(&self) -> usize {
        self.allocated.get()
    }

    /// Moves the cursor to exactly `pos`.
    ///
    /// Memory beyond the new cursor is neither zeroed nor otherwise
    /// invalidated; the caller must know nothing past `pos` is referenced
    /// afterwards. Moving forward (up to the capacity) is allowed.
    ///
    /// # Panics
    ///
    /// Does not panic; a position beyond the capacity is handed to the
    /// fail-fast reporter.
    pub fn set_pos_back(&self, pos: usize) {
        if let Err(err) = self.try_set_pos_back(pos) {
            self.fail(err);
        }
    }

    /// Moves the cursor to exactly `pos`, returning an error if out of range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPosition`] if `pos > capacity`.
    pub fn try_set_pos_back(&self, pos: usize) -> Result<()> {
        if pos > self.total_size {
            return Err(Error::InvalidPosition {
                pos,
                capacity: self.total_size,
            });
        }

        self.rewind(pos);
        Ok(())
    }

    /// Discards every allocation. Equivalent to `set_pos_back(0)`.
    pub fn clear(&self) {
        self.rewind(0);
    }

    fn rewind(&self, pos: usize) {
        if pos < self.allocated.get() {
            self.generation.set(self.generation.get() + 1);
        }
        self.allocated.set(pos);
    }

    /// Total capacity of the data region in bytes.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.total_size
    }

    /// Bytes still available before the arena is exhausted.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.total_size - self.allocated.get()
    }

    /// Start of the data region.
    #[inline]
    #[must_use]
    pub fn base(&self) -> NonNull<u8> {
        self.data
    }

    /// Current write cursor (`base + pos`).
    #[inline]
    #[must_use]
    pub fn cursor(&self) -> NonNull<u8> {
        // SAFETY: allocated <= total_size by invariant.
        unsafe { self.data.add(self.allocated.get()) }
    }

    /// Number of backwards cursor moves so far.
    #[inline]
    pub(crate) fn generation(&self) -> u64 {
        self.generation.get()
    }

    #[inline]
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    #[cold]
    #[inline(never)]
    fn fail(&self, err: Error) -> ! {
        core_fail!("{err} (arena at {:p})", self.data)
    }
}

impl fmt::Debug for LinearArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinearArena")
            .field("base", &self.data)
            .field("pos", &self.pos())
            .field("capacity", &self.total_size)
            .finish()
    }
}

/// Owning handle to a [`LinearArena`] block.
///
/// Dereferences to the arena. The handle is the only way to release the
/// block: dropping it (or calling [`dispose`](Self::dispose)) frees header
/// and data with a single deallocation. Pointers obtained from the arena
/// dangle afterwards.
pub struct ArenaHandle {
    /// Header at the front of the block.
    arena: NonNull<LinearArena>,
}

impl ArenaHandle {
    /// Frees the arena block. Equivalent to dropping the handle.
    pub fn dispose(self) {
        drop(self);
    }

    /// Returns the arena.
    #[inline]
    #[must_use]
    pub fn arena(&self) -> &LinearArena {
        self
    }
}

impl Deref for ArenaHandle {
    type Target = LinearArena;

    #[inline]
    fn deref(&self) -> &LinearArena {
        // SAFETY: the header was written in `try_create` and stays valid
        // until this handle is dropped.
        unsafe { self.arena.as_ref() }
    }
}

impl Drop for ArenaHandle {
    fn drop(&mut self) {
        let capacity = self.total_size;
        core_debug!(tag: "Arena", "disposing arena of {} bytes at {:p}", capacity, self.data);

        let Ok(layout) = LinearArena::block_layout(capacity) else {
            // Unreachable: the same layout was computed successfully at creation.
            return;
        };

        // SAFETY: the block was allocated in `try_create` with exactly this
        // layout, and this handle is its unique owner. The header holds no
        // resources, so no destructor needs to run first.
        unsafe {
            alloc::dealloc(self.arena.as_ptr().cast::<u8>(), layout);
        }
    }
}

impl fmt::Debug for ArenaHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn install_panic_hook() {
        arrowhead_log::set_fatal_hook(Some(arrowhead_log::panic_on_fatal));
    }

    #[test]
    fn test_create_places_data_after_header() {
        let arena = LinearArena::create(128);

        let header_addr = std::ptr::from_ref::<LinearArena>(&arena).addr();
        let base_addr = arena.base().as_ptr().addr();

        assert_eq!(base_addr - header_addr, HEADER_SIZE);
        assert_eq!(base_addr % DEFAULT_ALIGNMENT, 0);
        assert_eq!(arena.capacity(), 128);
        assert_eq!(arena.pos(), 0);
        assert_eq!(arena.cursor(), arena.base());
    }

    #[test]
    fn test_push_is_contiguous() {
        let arena = LinearArena::create(1024);

        let a = arena.push(3);
        let b = arena.push(5);
        let c = arena.push(7);

        assert_eq!(a, arena.base());
        assert_eq!(b.as_ptr().addr() - a.as_ptr().addr(), 3);
        assert_eq!(c.as_ptr().addr() - b.as_ptr().addr(), 5);
        assert_eq!(arena.pos(), 15);
        assert_eq!(arena.remaining(), 1024 - 15);
    }

    #[test]
    fn test_push_to_exact_capacity() {
        let arena = LinearArena::create(16);

        arena.push(10);
        arena.push(6);

        assert_eq!(arena.pos(), 16);
        assert_eq!(arena.remaining(), 0);
    }

    #[test]
    fn test_try_push_reports_capacity() {
        let arena = LinearArena::create(16);
        arena.push(8);

        let err = arena.try_push(9).unwrap_err();
        assert_eq!(
            err,
            Error::CapacityExceeded {
                requested: 9,
                offset: 8,
                capacity: 16
            }
        );
        // A failed request leaves the arena untouched
        assert_eq!(arena.pos(), 8);
    }

    #[test]
    fn test_try_push_overflow_is_an_error() {
        let arena = LinearArena::create(16);
        arena.push(1);

        assert!(arena.try_push(usize::MAX).is_err());
        assert_eq!(arena.pos(), 1);
    }

    #[test]
    #[should_panic(expected = "Arena pushed out of bounds")]
    fn test_push_past_capacity_is_fatal() {
        install_panic_hook();
        let arena = LinearArena::create(16);
        arena.push(20);
    }

    #[test]
    fn test_push_zero_clears_reused_memory() {
        let arena = LinearArena::create(64);

        let dirty = arena.push(32);
        unsafe { dirty.as_ptr().write_bytes(0xAA, 32) };
        arena.clear();

        let clean = arena.push_zero(32);
        assert_eq!(clean, dirty);
        let bytes = unsafe { std::slice::from_raw_parts(clean.as_ptr(), 32) };
        assert!(bytes.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_typed_helpers_align_cursor() {
        let arena = LinearArena::create(256);

        arena.push(1);
        let value = arena.push_struct::<u64>();

        assert_eq!(value.as_ptr().addr() % std::mem::align_of::<u64>(), 0);
        assert_eq!(arena.pos(), 16);

        let array = arena.push_array_zero::<u32>(4);
        let slice = unsafe { std::slice::from_raw_parts(array.as_ptr(), 4) };
        assert_eq!(slice, &[0, 0, 0, 0]);
        assert_eq!(arena.pos(), 32);
    }

    #[test]
    fn test_push_struct_zero() {
        #[derive(Debug, PartialEq)]
        struct Header {
            id: u32,
            len: u64,
        }

        let arena = LinearArena::create(64);
        let header = arena.push_struct_zero::<Header>();

        // All-zero is a valid Header.
        assert_eq!(unsafe { header.as_ref() }, &Header { id: 0, len: 0 });
    }

    #[test]
    fn test_zero_sized_types_use_no_space() {
        let arena = LinearArena::create(8);

        arena.push_array::<()>(1000);
        arena.push_struct::<()>();

        assert_eq!(arena.pos(), 0);
    }

    #[test]
    fn test_pop_clamps_at_zero() {
        let arena = LinearArena::create(64);

        arena.push(10);
        arena.pop(4);
        assert_eq!(arena.pos(), 6);

        arena.pop(100);
        assert_eq!(arena.pos(), 0);
        assert_eq!(arena.cursor(), arena.base());
    }

    #[test]
    fn test_save_restore_round_trip() {
        let arena = LinearArena::create(256);
        arena.push(40);

        let pos = arena.pos();
        let cursor = arena.cursor();
        arena.push(100);
        arena.set_pos_back(pos);

        assert_eq!(arena.pos(), pos);
        assert_eq!(arena.cursor(), cursor);
    }

    #[test]
    fn test_set_pos_back_accepts_capacity() {
        let arena = LinearArena::create(32);

        arena.set_pos_back(32);
        assert_eq!(arena.pos(), 32);
        assert!(arena.try_push(1).is_err());
    }

    #[test]
    fn test_try_set_pos_back_rejects_out_of_range() {
        let arena = LinearArena::create(32);
        arena.push(8);

        assert_eq!(
            arena.try_set_pos_back(33),
            Err(Error::InvalidPosition { pos: 33, capacity: 32 })
        );
        assert_eq!(arena.pos(), 8);
    }

    #[test]
    #[should_panic(expected = "Arena set pos must be inside the bounds")]
    fn test_set_pos_back_out_of_range_is_fatal() {
        install_panic_hook();
        let arena = LinearArena::create(32);
        arena.set_pos_back(64);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let arena = LinearArena::create(64);
        arena.push(50);

        arena.clear();
        assert_eq!(arena.pos(), 0);
        arena.clear();
        assert_eq!(arena.pos(), 0);
        assert_eq!(arena.cursor(), arena.base());
    }

    #[test]
    fn test_generation_only_moves_on_rewind() {
        let arena = LinearArena::create(64);
        let start = arena.generation();

        arena.push(8);
        arena.set_pos_back(16);
        assert_eq!(arena.generation(), start);

        arena.pop(4);
        assert_eq!(arena.generation(), start + 1);

        arena.clear();
        arena.clear();
        assert_eq!(arena.generation(), start + 2);
    }

    #[test]
    fn test_zero_capacity_arena() {
        let arena = LinearArena::create(0);

        let block = arena.push(0);
        assert_eq!(block, arena.base());
        assert!(arena.try_push(1).is_err());
    }

    #[test]
    fn test_arenas_have_distinct_ids() {
        let a = LinearArena::create(16);
        let b = LinearArena::create(16);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_dispose() {
        let arena = LinearArena::create(4096);
        arena.push(1024);
        arena.dispose();
    }

    #[test]
    fn test_debug_output() {
        let arena = LinearArena::create(64);
        arena.push(5);

        let debug = format!("{arena:?}");
        assert!(debug.contains("LinearArena"));
        assert!(debug.contains("pos: 5"));
        assert!(debug.contains("capacity: 64"));
    }
}
