//! Per-thread scratch arenas.
//!
//! Every thread that needs transient memory gets two arenas:
//!
//! - **temp**: cleared or rewound often (per task, per frame)
//! - **persistent**: lives as long as the thread's work
//!
//! [`ScratchArenas`] owns such a pair. With the `scratch` feature (on by
//! default) a thread-local registry holds one pair per thread, created on
//! first use and released by [`dispose_scratch`] or at thread exit.
//!
//! ```
//! use arrowhead_mem::context::{with_temp_scratch, dispose_scratch};
//! use arrowhead_mem::scratch::ScratchSpace;
//!
//! let total = with_temp_scratch(|arena| {
//!     let mut scratch = ScratchSpace::new(arena);
//!     let values = arena.push_array_zero::<u32>(16);
//!     let sum = unsafe { std::slice::from_raw_parts(values.as_ptr(), 16) }
//!         .iter()
//!         .sum::<u32>();
//!     scratch.reset();
//!     sum
//! });
//! assert_eq!(total, 0);
//!
//! assert!(dispose_scratch());
//! ```

use crate::arena::{ArenaHandle, LinearArena};

/// Default capacity of each scratch arena (1 MiB).
pub const SCRATCH_SIZE: usize = 1024 * 1024;

/// Capacities of a thread's scratch arenas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScratchConfig {
    /// Capacity of the temp arena in bytes.
    pub temp_capacity: usize,
    /// Capacity of the persistent arena in bytes.
    pub persistent_capacity: usize,
}

impl ScratchConfig {
    /// Creates a config with explicit capacities.
    #[must_use]
    pub const fn new(temp_capacity: usize, persistent_capacity: usize) -> Self {
        Self {
            temp_capacity,
            persistent_capacity,
        }
    }

    /// Both arenas with the same capacity.
    #[must_use]
    pub const fn uniform(capacity: usize) -> Self {
        Self::new(capacity, capacity)
    }
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self::uniform(SCRATCH_SIZE)
    }
}

/// A thread's temp and persistent arenas.
#[derive(Debug)]
pub struct ScratchArenas {
    temp: ArenaHandle,
    persistent: ArenaHandle,
    config: ScratchConfig,
}

impl ScratchArenas {
    /// Creates both arenas.
    #[must_use]
    pub fn new(config: ScratchConfig) -> Self {
        Self {
            temp: LinearArena::create(config.temp_capacity),
            persistent: LinearArena::create(config.persistent_capacity),
            config,
        }
    }

    /// The frequently reset arena.
    #[must_use]
    pub fn temp(&self) -> &LinearArena {
        &self.temp
    }

    /// The long-lived arena.
    #[must_use]
    pub fn persistent(&self) -> &LinearArena {
        &self.persistent
    }

    /// The capacities the arenas were created with.
    #[must_use]
    pub fn config(&self) -> ScratchConfig {
        self.config
    }
}

impl Default for ScratchArenas {
    fn default() -> Self {
        Self::new(ScratchConfig::default())
    }
}

/// Lifecycle of the calling thread's scratch arenas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScratchState {
    /// Not created yet; the first use creates them.
    Uninitialized,
    /// Created and usable.
    Live,
    /// Released by [`dispose_scratch`]; any further use is fatal.
    Disposed,
}

#[cfg(feature = "scratch")]
pub use registry::{
    dispose_scratch, init_scratch, init_scratch_with, scratch_state, with_persistent_scratch,
    with_temp_scratch,
};

#[cfg(feature = "scratch")]
mod registry {
    use super::{ScratchArenas, ScratchConfig, ScratchState};
    use crate::arena::LinearArena;
    use arrowhead_log::{core_debug, core_fail, core_warn};
    use std::cell::RefCell;

    enum Registry {
        Uninitialized,
        Live(ScratchArenas),
        Disposed,
    }

    thread_local! {
        static SCRATCH: RefCell<Registry> = const { RefCell::new(Registry::Uninitialized) };
    }

    /// Creates this thread's scratch arenas with the default config.
    ///
    /// Returns `false` if they already exist.
    pub fn init_scratch() -> bool {
        init_scratch_with(ScratchConfig::default())
    }

    /// Creates this thread's scratch arenas.
    ///
    /// Returns `false` (and keeps the existing arenas) if they already
    /// exist, including when called from inside [`with_temp_scratch`] or
    /// [`with_persistent_scratch`].
    ///
    /// # Panics
    ///
    /// Does not panic; initializing after [`dispose_scratch`] is handed to
    /// the fail-fast reporter.
    pub fn init_scratch_with(config: ScratchConfig) -> bool {
        SCRATCH.with(|cell| {
            // A shared borrow is enough to see a live registry, so this also
            // works from inside `with_temp_scratch` / `with_persistent_scratch`.
            if let Ok(registry) = cell.try_borrow() {
                match &*registry {
                    Registry::Live(arenas) => {
                        if arenas.config() != config {
                            core_warn!(
                                tag: "Scratch",
                                "scratch arenas already exist; ignoring new config {:?}",
                                config
                            );
                        }
                        return false;
                    }
                    Registry::Disposed => core_fail!("scratch arenas used after dispose"),
                    Registry::Uninitialized => {}
                }
            }

            let Ok(mut registry) = cell.try_borrow_mut() else {
                core_fail!("scratch arenas initialized while in use")
            };

            core_debug!(
                tag: "Scratch",
                "creating scratch arenas (temp {} bytes, persistent {} bytes)",
                config.temp_capacity,
                config.persistent_capacity
            );
            *registry = Registry::Live(ScratchArenas::new(config));
            true
        })
    }

    /// Releases this thread's scratch arenas.
    ///
    /// Returns `true` if arenas were released. Disposing twice, or before
    /// any use, does nothing and returns `false`. After a successful
    /// dispose, every scratch function on this thread is fatal.
    ///
    /// # Panics
    ///
    /// Does not panic; disposing from inside [`with_temp_scratch`] or
    /// [`with_persistent_scratch`] is handed to the fail-fast reporter.
    pub fn dispose_scratch() -> bool {
        SCRATCH.with(|cell| {
            let Ok(mut registry) = cell.try_borrow_mut() else {
                core_fail!("scratch arenas disposed while in use")
            };

            match std::mem::replace(&mut *registry, Registry::Disposed) {
                Registry::Live(arenas) => {
                    core_debug!(tag: "Scratch", "disposing scratch arenas");
                    drop(arenas);
                    true
                }
                Registry::Disposed => {
                    core_warn!(tag: "Scratch", "scratch arenas disposed twice");
                    false
                }
                Registry::Uninitialized => {
                    *registry = Registry::Uninitialized;
                    false
                }
            }
        })
    }

    /// Current lifecycle state of this thread's scratch arenas.
    #[must_use]
    pub fn scratch_state() -> ScratchState {
        SCRATCH.with(|cell| match &*cell.borrow() {
            Registry::Uninitialized => ScratchState::Uninitialized,
            Registry::Live(_) => ScratchState::Live,
            Registry::Disposed => ScratchState::Disposed,
        })
    }

    /// Runs `f` with this thread's temp arena, creating the arenas on first
    /// use.
    ///
    /// Calls nest freely, also with [`with_persistent_scratch`].
    pub fn with_temp_scratch<R>(f: impl FnOnce(&LinearArena) -> R) -> R {
        with_arenas(|arenas| f(arenas.temp()))
    }

    /// Runs `f` with this thread's persistent arena, creating the arenas on
    /// first use.
    pub fn with_persistent_scratch<R>(f: impl FnOnce(&LinearArena) -> R) -> R {
        with_arenas(|arenas| f(arenas.persistent()))
    }

    fn with_arenas<R>(f: impl FnOnce(&ScratchArenas) -> R) -> R {
        SCRATCH.with(|cell| {
            if matches!(*cell.borrow(), Registry::Uninitialized) {
                init_scratch();
            }

            let registry = cell.borrow();
            match &*registry {
                Registry::Live(arenas) => f(arenas),
                _ => core_fail!("scratch arenas used after dispose"),
            }
        })
    }
}
