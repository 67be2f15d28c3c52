//! Checked, copy-out access to values stored in a [`LinearArena`].
//!
//! Raw arena pointers dangle silently once the cursor is moved back. An
//! [`ArenaSlot`] instead records where a value was written together with the
//! arena's identity and rewind generation. Reading or writing through a slot
//! after any backwards cursor move fails instead of touching reused memory.
//!
//! Slots are coarse: *every* `pop`, `set_pos_back` or `clear` that moves the
//! cursor back invalidates *all* outstanding slots of that arena, including
//! slots below the new cursor.
//!
//! ```
//! use arrowhead_mem::arena::LinearArena;
//!
//! let arena = LinearArena::create(256);
//! let slot = arena.alloc_slot(7u32);
//! assert_eq!(arena.read_slot(slot), Some(7));
//!
//! arena.clear();
//! assert_eq!(arena.read_slot(slot), None);
//! ```

use crate::arena::LinearArena;
use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

/// Handle to a `T` stored in a [`LinearArena`].
///
/// Values are copied in and out; a slot never hands out references.
pub struct ArenaSlot<T> {
    offset: usize,
    generation: u64,
    arena_id: u64,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ArenaSlot<T> {
    /// Byte offset of the value inside the arena's data region.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl<T> Clone for ArenaSlot<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ArenaSlot<T> {}

impl<T> PartialEq for ArenaSlot<T> {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset
            && self.generation == other.generation
            && self.arena_id == other.arena_id
    }
}

impl<T> Eq for ArenaSlot<T> {}

impl<T> fmt::Debug for ArenaSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArenaSlot")
            .field("offset", &self.offset)
            .field("generation", &self.generation)
            .finish()
    }
}

impl LinearArena {
    /// Pushes `value` and returns a slot for it.
    ///
    /// Space is taken with [`push_struct`](Self::push_struct), so exhaustion
    /// goes to the fail-fast reporter.
    pub fn alloc_slot<T: Copy>(&self, value: T) -> ArenaSlot<T> {
        let ptr = self.push_struct::<T>();

        // SAFETY: push_struct returned aligned, writable space for one T.
        unsafe {
            ptr.as_ptr().write(value);
        }

        ArenaSlot {
            offset: ptr.as_ptr().addr() - self.base().as_ptr().addr(),
            generation: self.generation(),
            arena_id: self.id(),
            _marker: PhantomData,
        }
    }

    /// Copies the value out of `slot`.
    ///
    /// Returns `None` if the slot belongs to another arena or the cursor
    /// has moved back since the slot was allocated.
    #[must_use]
    pub fn read_slot<T: Copy>(&self, slot: ArenaSlot<T>) -> Option<T> {
        // SAFETY: slot_ptr only returns pointers to live, aligned values of
        // type T written by alloc_slot or write_slot.
        self.slot_ptr(slot).map(|ptr| unsafe { ptr.as_ptr().read() })
    }

    /// Overwrites the value in `slot`. Returns `false` if the slot is stale.
    pub fn write_slot<T: Copy>(&self, slot: ArenaSlot<T>, value: T) -> bool {
        match self.slot_ptr(slot) {
            Some(ptr) => {
                // SAFETY: see read_slot.
                unsafe { ptr.as_ptr().write(value) };
                true
            }
            None => false,
        }
    }

    /// Whether `slot` still refers to a live value in this arena.
    #[must_use]
    pub fn is_slot_live<T>(&self, slot: ArenaSlot<T>) -> bool {
        self.slot_ptr(slot).is_some()
    }

    fn slot_ptr<T>(&self, slot: ArenaSlot<T>) -> Option<NonNull<T>> {
        if slot.arena_id != self.id() || slot.generation != self.generation() {
            return None;
        }

        let end = slot.offset.checked_add(std::mem::size_of::<T>())?;
        if end > self.pos() {
            return None;
        }

        // SAFETY: offset + size_of::<T>() <= pos <= capacity, so the value
        // lies inside the data region.
        Some(unsafe { self.base().add(slot.offset) }.cast())
    }
}
