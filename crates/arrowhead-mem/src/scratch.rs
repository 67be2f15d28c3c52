//! Scoped save/restore points over a [`LinearArena`].
//!
//! A [`ScratchSpace`] captures the arena position when it is created;
//! [`reset`](ScratchSpace::reset) moves the arena back to that position,
//! discarding everything pushed in between. Scratches nest, and must be
//! reset in LIFO order.
//!
//! Dropping a scratch does **not** reset it. The reset is always explicit,
//! so a scratch can be handed around or abandoned without rewinding memory
//! someone else still uses.
//!
//! ```
//! use arrowhead_mem::arena::LinearArena;
//! use arrowhead_mem::scratch::ScratchSpace;
//!
//! let arena = LinearArena::create(1024);
//! arena.push(64);
//!
//! let mut scratch = ScratchSpace::new(&arena);
//! arena.push(512);
//! scratch.reset();
//!
//! assert_eq!(arena.pos(), 64);
//! assert!(scratch.has_reset());
//! ```

use crate::arena::LinearArena;

/// A restore point in a [`LinearArena`].
#[derive(Debug)]
pub struct ScratchSpace<'a> {
    arena: &'a LinearArena,
    reset_pos: usize,
    has_reset: bool,
}

impl<'a> ScratchSpace<'a> {
    /// Captures the current position of `arena`.
    #[must_use]
    pub fn new(arena: &'a LinearArena) -> Self {
        Self {
            arena,
            reset_pos: arena.pos(),
            has_reset: false,
        }
    }

    /// Rewinds the arena to the captured position.
    ///
    /// Pointers obtained from the arena after this scratch was created are
    /// invalid afterwards. Resetting twice is harmless.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the arena is already below the captured
    /// position, which means an enclosing scratch was reset first.
    ///
    /// The check is best-effort: it only sees the current position. If the
    /// enclosing scratch was reset and the arena then grew past this
    /// scratch's captured position again, the out-of-order reset goes
    /// unnoticed.
    pub fn reset(&mut self) {
        debug_assert!(
            self.arena.pos() >= self.reset_pos,
            "Scratch reset out of order: arena at {}, scratch captured {}",
            self.arena.pos(),
            self.reset_pos
        );

        self.arena.set_pos_back(self.reset_pos);
        self.has_reset = true;
    }

    /// Whether [`reset`](Self::reset) has been called.
    #[must_use]
    pub fn has_reset(&self) -> bool {
        self.has_reset
    }

    /// The captured arena position.
    #[must_use]
    pub fn reset_pos(&self) -> usize {
        self.reset_pos
    }

    /// The underlying arena.
    #[must_use]
    pub fn arena(&self) -> &'a LinearArena {
        self.arena
    }
}
