//! Typed free-list pool carved from a [`LinearArena`].
//!
//! A [`PoolAllocator<T>`] recycles fixed-size nodes. Freed nodes go onto an
//! intrusive LIFO free list; allocation pops that list and only carves a new
//! node from the arena when the list is empty. Nodes are never given back to
//! the arena, so the arena only grows while the pool is in use.
//!
//! ```text
//! first_free -> [node C] -> [node A] -> None
//!                 ^ most recently freed, handed out next
//! ```
//!
//! The pool holds no reference to the arena; callers pass it to
//! [`allocate`](PoolAllocator::allocate). Every node lives in arena memory,
//! so the arena must outlive all pointers the pool returns, and it must not
//! be rewound past the pool's nodes while the pool is in use.
//!
//! # Guard tags
//!
//! In debug builds (or with the `guard-tags` feature) each node carries a
//! tag marking it live or free. `free` then reports double frees and
//! pointers that never came from `allocate`.
//!
//! # Example
//!
//! ```
//! use arrowhead_mem::arena::LinearArena;
//! use arrowhead_mem::pool::PoolAllocator;
//!
//! let arena = LinearArena::create(4096);
//! let mut pool = PoolAllocator::<[f32; 4]>::new();
//!
//! let a = pool.allocate(&arena, [1.0; 4]);
//! let used = arena.pos();
//!
//! unsafe { pool.free(a) };
//! let b = pool.allocate(&arena, [2.0; 4]);
//!
//! // The freed node is reused; the arena did not grow.
//! assert_eq!(a, b);
//! assert_eq!(arena.pos(), used);
//! ```

use crate::arena::LinearArena;
use std::fmt;
use std::marker::PhantomData;
use std::mem::MaybeUninit;
use std::ptr::NonNull;

#[cfg(any(debug_assertions, feature = "guard-tags"))]
use arrowhead_log::core_fail;

#[cfg(any(debug_assertions, feature = "guard-tags"))]
const GUARD_LIVE: u32 = 0x4C49_5645;

#[cfg(any(debug_assertions, feature = "guard-tags"))]
const GUARD_FREE: u32 = 0x4652_4545;

/// One pool slot. The value sits at offset 0, so `*mut Node<T>` and
/// `*mut T` convert by cast.
#[repr(C)]
struct Node<T> {
    value: MaybeUninit<T>,
    next: Option<NonNull<Node<T>>>,
    #[cfg(any(debug_assertions, feature = "guard-tags"))]
    guard: u32,
}

/// Free-list allocator for values of type `T`.
///
/// Not `Send`/`Sync`: a pool belongs to the thread owning its arena.
pub struct PoolAllocator<T> {
    first_free: Option<NonNull<Node<T>>>,
    free_len: usize,
    carved: usize,
    _marker: PhantomData<T>,
}

impl<T> PoolAllocator<T> {
    /// Creates an empty pool.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            first_free: None,
            free_len: 0,
            carved: 0,
            _marker: PhantomData,
        }
    }

    /// Stores `value` in a pool node and returns a pointer to it.
    ///
    /// Reuses the most recently freed node if there is one; otherwise a
    /// zeroed node is carved from `arena`. A reused node is overwritten with
    /// `value`, so nothing of its previous occupant remains visible.
    ///
    /// # Panics
    ///
    /// Does not panic; arena exhaustion is handed to the fail-fast reporter.
    pub fn allocate(&mut self, arena: &LinearArena, value: T) -> NonNull<T> {
        let node = match self.first_free {
            Some(node) => {
                // SAFETY: nodes on the free list were carved by this pool and
                // the arena keeps them alive.
                self.first_free = unsafe { (*node.as_ptr()).next.take() };
                self.free_len -= 1;
                node
            }
            None => {
                self.carved += 1;
                // All-zero is a valid Node: uninit value, `None` link, zero tag.
                arena.push_struct_zero::<Node<T>>()
            }
        };

        // SAFETY: node points to a properly aligned Node<T> in arena memory
        // that nobody else references.
        unsafe {
            let node = &mut *node.as_ptr();
            node.value.write(value);
            #[cfg(any(debug_assertions, feature = "guard-tags"))]
            {
                node.guard = GUARD_LIVE;
            }
        }

        node.cast::<T>()
    }

    /// Returns the node holding `value` to the free list.
    ///
    /// The value is **not** dropped; use [`destroy`](Self::destroy) for
    /// types with destructors.
    ///
    /// # Safety
    ///
    /// `value` must have been returned by [`allocate`](Self::allocate) on
    /// this pool and not freed since. It must not be used afterwards.
    ///
    /// # Panics
    ///
    /// With guard tags enabled, a double free or a pointer from elsewhere is
    /// handed to the fail-fast reporter.
    pub unsafe fn free(&mut self, value: NonNull<T>) {
        let node = value.cast::<Node<T>>();

        #[cfg(any(debug_assertions, feature = "guard-tags"))]
        {
            // SAFETY: the caller guarantees `value` came from a pool node.
            let guard = unsafe { (*node.as_ptr()).guard };
            match guard {
                GUARD_LIVE => {}
                GUARD_FREE => core_fail!("Pool double free of {:p}", value),
                _ => core_fail!("Pool free of a foreign pointer {:p}", value),
            }
        }

        // SAFETY: see above; the node is live and owned by this pool.
        unsafe {
            let node = &mut *node.as_ptr();
            node.next = self.first_free;
            #[cfg(any(debug_assertions, feature = "guard-tags"))]
            {
                node.guard = GUARD_FREE;
            }
        }

        self.first_free = Some(node);
        self.free_len += 1;
    }

    /// Drops the value in place, then frees its node.
    ///
    /// # Safety
    ///
    /// Same contract as [`free`](Self::free).
    pub unsafe fn destroy(&mut self, value: NonNull<T>) {
        // SAFETY: the caller guarantees `value` is a live pool value.
        unsafe {
            value.as_ptr().drop_in_place();
            self.free(value);
        }
    }

    /// Number of nodes on the free list.
    #[must_use]
    pub fn free_len(&self) -> usize {
        self.free_len
    }

    /// Number of nodes ever carved from the arena.
    #[must_use]
    pub fn carved(&self) -> usize {
        self.carved
    }

    /// Number of nodes currently handed out.
    #[must_use]
    pub fn live(&self) -> usize {
        self.carved - self.free_len
    }

    /// Arena bytes taken by one node.
    #[must_use]
    pub const fn node_size() -> usize {
        std::mem::size_of::<Node<T>>()
    }
}

impl<T> Default for PoolAllocator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for PoolAllocator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolAllocator")
            .field("carved", &self.carved)
            .field("free_len", &self.free_len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Vec3 {
        x: f32,
        y: f32,
        z: f32,
    }

    #[test]
    fn test_allocate_carves_from_arena() {
        let arena = LinearArena::create(1024);
        let mut pool = PoolAllocator::<Vec3>::new();

        let v = pool.allocate(
            &arena,
            Vec3 {
                x: 1.0,
                y: 2.0,
                z: 3.0,
            },
        );

        assert_eq!(unsafe { v.as_ref() }.y, 2.0);
        assert_eq!(pool.carved(), 1);
        assert_eq!(pool.live(), 1);
        assert!(arena.pos() >= PoolAllocator::<Vec3>::node_size());
    }

    #[test]
    fn test_free_list_is_lifo() {
        let arena = LinearArena::create(1024);
        let mut pool = PoolAllocator::<u64>::new();

        let a = pool.allocate(&arena, 1);
        let b = pool.allocate(&arena, 2);
        let c = pool.allocate(&arena, 3);

        unsafe {
            pool.free(a);
            pool.free(c);
        }
        assert_eq!(pool.free_len(), 2);

        assert_eq!(pool.allocate(&arena, 4), c);
        assert_eq!(pool.allocate(&arena, 5), a);
        assert_eq!(pool.free_len(), 0);
        assert_eq!(unsafe { *b.as_ref() }, 2);
    }

    #[test]
    fn test_reuse_does_not_grow_arena() {
        let arena = LinearArena::create(1024);
        let mut pool = PoolAllocator::<[u8; 24]>::new();

        let first = pool.allocate(&arena, [1; 24]);
        let before_loop = arena.pos();
        let mut used = None;

        for i in 0..100 {
            let value = pool.allocate(&arena, [i; 24]);
            assert_eq!(unsafe { value.as_ref() }[0], i);
            unsafe { pool.free(value) };

            // Only the first iteration carves; later ones reuse its node.
            let pos = arena.pos();
            assert_eq!(*used.get_or_insert(pos), pos);
        }

        assert_eq!(
            used,
            Some(before_loop + PoolAllocator::<[u8; 24]>::node_size())
        );
        assert_eq!(pool.carved(), 2);
        assert_eq!(unsafe { first.as_ref() }[0], 1);
    }

    #[test]
    fn test_reused_node_gets_new_value() {
        let arena = LinearArena::create(256);
        let mut pool = PoolAllocator::<u32>::new();

        let a = pool.allocate(&arena, 0xDEAD);
        unsafe { pool.free(a) };
        let b = pool.allocate(&arena, 7);

        assert_eq!(unsafe { *b.as_ref() }, 7);
    }

    #[test]
    fn test_values_are_aligned() {
        let arena = LinearArena::create(1024);
        let mut pool = PoolAllocator::<u128>::new();

        arena.push(3);
        let value = pool.allocate(&arena, 5);

        assert_eq!(value.as_ptr().addr() % std::mem::align_of::<u128>(), 0);
    }

    #[test]
    fn test_destroy_runs_drop() {
        struct Tracked(Rc<Cell<u32>>);

        impl Drop for Tracked {
            fn drop(&mut self) {
                self.0.set(self.0.get() + 1);
            }
        }

        let drops = Rc::new(Cell::new(0));
        let arena = LinearArena::create(256);
        let mut pool = PoolAllocator::<Tracked>::new();

        let a = pool.allocate(&arena, Tracked(drops.clone()));
        let b = pool.allocate(&arena, Tracked(drops.clone()));

        unsafe { pool.destroy(a) };
        assert_eq!(drops.get(), 1);

        // free alone never drops
        unsafe {
            pool.free(b);
        }
        assert_eq!(drops.get(), 1);
        assert_eq!(pool.free_len(), 2);
    }

    #[test]
    fn test_default_pool_is_empty() {
        let pool = PoolAllocator::<u8>::default();
        assert_eq!(pool.free_len(), 0);
        assert_eq!(pool.carved(), 0);
        assert_eq!(format!("{pool:?}"), "PoolAllocator { carved: 0, free_len: 0 }");
    }

    #[test]
    #[cfg(any(debug_assertions, feature = "guard-tags"))]
    #[should_panic(expected = "Pool double free")]
    fn test_double_free_is_reported() {
        arrowhead_log::set_fatal_hook(Some(arrowhead_log::panic_on_fatal));
        let arena = LinearArena::create(256);
        let mut pool = PoolAllocator::<u32>::new();

        let a = pool.allocate(&arena, 1);
        unsafe {
            pool.free(a);
            pool.free(a);
        }
    }

    #[test]
    #[cfg(any(debug_assertions, feature = "guard-tags"))]
    #[should_panic(expected = "Pool free of a foreign pointer")]
    fn test_foreign_free_is_reported() {
        arrowhead_log::set_fatal_hook(Some(arrowhead_log::panic_on_fatal));
        let arena = LinearArena::create(256);
        let mut pool = PoolAllocator::<u32>::new();

        // A zeroed node-sized block that never went through allocate.
        let foreign = arena.push_struct_zero::<Node<u32>>().cast::<u32>();
        unsafe { pool.free(foreign) };
    }
}
