//! Intrusive atomic reference counting.
//!
//! Objects embed a [`RefCount`] and implement [`RefCounted`]; an
//! [`OwningRef<T>`] is a nullable, shared handle that keeps the object alive
//! while any handle refers to it. The last handle to go away frees the
//! object.
//!
//! Unlike `Arc`, the count lives inside the object itself. This lets a
//! handle be re-created from a plain pointer ([`OwningRef::from_raw`]) and
//! lets handles to a trait object (`OwningRef<dyn Shape>`) be checked-cast
//! back to the concrete type ([`OwningRef::downcast`]).
//!
//! # Ordering
//!
//! Increments and decrements use `AcqRel`, so every write made through any
//! handle happens-before the destructor of the last one.
//!
//! # Example
//!
//! ```
//! use arrowhead_mem::impl_ref_counted;
//! use arrowhead_mem::rc::{OwningRef, RefCount};
//!
//! struct Texture {
//!     refs: RefCount,
//!     width: u32,
//! }
//! impl_ref_counted!(Texture, refs);
//!
//! let a = OwningRef::new(Texture { refs: RefCount::new(), width: 64 });
//! let b = a.clone();
//!
//! assert_eq!(a.ref_count(), 2);
//! assert_eq!(a, b);
//! assert_eq!(b.width, 64);
//! ```

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicU32, Ordering};

/// Thread-safe reference counter embedded in a counted object.
///
/// Starts at zero: a freshly constructed object is owned by nobody until the
/// first [`OwningRef`] is created over it.
pub struct RefCount {
    count: AtomicU32,
}

impl RefCount {
    /// Creates a counter at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            count: AtomicU32::new(0),
        }
    }

    /// Current count. Only a snapshot when other threads hold handles.
    #[inline]
    #[must_use]
    pub fn get(&self) -> u32 {
        self.count.load(Ordering::Acquire)
    }

    /// Increments the count and returns the new value.
    ///
    /// # Panics
    ///
    /// Panics if the count would overflow `u32::MAX`.
    #[inline]
    pub fn inc_ref(&self) -> u32 {
        let old = self.count.fetch_add(1, Ordering::AcqRel);
        if old == u32::MAX {
            panic!("Reference count overflow in RefCount::inc_ref");
        }
        old + 1
    }

    /// Decrements the count. Returns `true` if this released the last
    /// reference.
    #[inline]
    pub fn dec_ref(&self) -> bool {
        let old = self.count.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(old != 0, "RefCount::dec_ref on a zero count");
        old == 1
    }
}

impl Default for RefCount {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloning an object yields a new, unreferenced object: the clone's count
/// starts at zero.
impl Clone for RefCount {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl fmt::Debug for RefCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RefCount").field(&self.get()).finish()
    }
}

/// An object carrying its own [`RefCount`].
///
/// Usually implemented with [`impl_ref_counted!`](crate::impl_ref_counted).
///
/// # Safety
///
/// - `ref_count` must always return the same counter, owned by `self` and
///   not shared with any other object.
/// - `as_any` must return `self` (not a field), so downcasts resolve to the
///   object's real concrete type.
pub unsafe trait RefCounted: Any {
    /// The embedded counter.
    fn ref_count(&self) -> &RefCount;

    /// `self` as [`Any`], for checked downcasts.
    fn as_any(&self) -> &dyn Any;
}

/// Implements [`RefCounted`] for a type with a [`RefCount`] field.
///
/// ```
/// use arrowhead_mem::impl_ref_counted;
/// use arrowhead_mem::rc::RefCount;
///
/// struct Mesh {
///     refs: RefCount,
/// }
/// impl_ref_counted!(Mesh, refs);
/// ```
#[macro_export]
macro_rules! impl_ref_counted {
    ($ty:ty, $field:ident) => {
        // SAFETY: the counter is a field of the object and `as_any` returns
        // the object itself.
        unsafe impl $crate::rc::RefCounted for $ty {
            #[inline]
            fn ref_count(&self) -> &$crate::rc::RefCount {
                &self.$field
            }

            #[inline]
            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }
        }
    };
}

/// Converts an [`OwningRef`] into a handle of a trait it implements.
///
/// The source handle is consumed and its reference moves into the result,
/// so the count is unchanged. Only unsizing conversions compile; the target
/// type cannot change the object's identity.
///
/// To assign into an existing base handle, upcast a clone: the clone
/// retains the source before `assign` releases the old target.
///
/// ```
/// use arrowhead_mem::rc::{OwningRef, RefCount, RefCounted};
/// use arrowhead_mem::{impl_ref_counted, upcast};
///
/// trait Shape: RefCounted {}
///
/// struct Circle {
///     refs: RefCount,
/// }
/// impl_ref_counted!(Circle, refs);
/// impl Shape for Circle {}
///
/// let circle = OwningRef::new(Circle { refs: RefCount::new() });
/// let shape: OwningRef<dyn Shape> = upcast!(circle.clone(), dyn Shape);
/// assert_eq!(circle.ref_count(), 2);
///
/// let mut slot: OwningRef<dyn Shape> = OwningRef::null();
/// slot.assign(&shape);
/// assert_eq!(shape.ref_count(), 3);
/// ```
#[macro_export]
macro_rules! upcast {
    ($source:expr, $target:ty) => {
        match $source {
            source => {
                // SAFETY: the closure body is a plain coercion, which can only
                // unsize the pointer to the same object.
                unsafe {
                    $crate::rc::OwningRef::__upcast(source, |ptr| {
                        let coerced: *mut $target = ptr;
                        coerced
                    })
                }
            }
        }
    };
}

/// A nullable, shared, reference-counted handle.
///
/// - Cloning increments the count; dropping decrements it, and the handle
///   that drops it to zero frees the object.
/// - Two handles are equal when they point at the same object (or are both
///   null); the pointee is never compared.
/// - Dereferencing a null handle panics; use [`get`](Self::get) to check.
pub struct OwningRef<T: ?Sized + RefCounted> {
    ptr: Option<NonNull<T>>,
    _marker: PhantomData<T>,
}

impl<T: RefCounted> OwningRef<T> {
    /// Moves `value` to the heap and takes the first reference to it.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self::from_box(Box::new(value))
    }

    /// Replaces this handle with a checked cast of `other`.
    ///
    /// If `other` does not point at a `T`, this handle becomes null. The
    /// source is retained before the current target is released.
    pub fn assign_downcast<U: ?Sized + RefCounted>(&mut self, other: &OwningRef<U>) {
        *self = other.downcast::<T>();
    }
}

impl<T: ?Sized + RefCounted> OwningRef<T> {
    /// A handle referring to nothing.
    #[must_use]
    pub const fn null() -> Self {
        Self {
            ptr: None,
            _marker: PhantomData,
        }
    }

    /// Takes the first reference to a boxed object.
    ///
    /// This is how handles to trait objects are made:
    ///
    /// ```
    /// use arrowhead_mem::impl_ref_counted;
    /// use arrowhead_mem::rc::{OwningRef, RefCount, RefCounted};
    ///
    /// trait Shape: RefCounted {
    ///     fn area(&self) -> f32;
    /// }
    ///
    /// struct Square {
    ///     refs: RefCount,
    ///     side: f32,
    /// }
    /// impl_ref_counted!(Square, refs);
    ///
    /// impl Shape for Square {
    ///     fn area(&self) -> f32 {
    ///         self.side * self.side
    ///     }
    /// }
    ///
    /// let shape: OwningRef<dyn Shape> =
    ///     OwningRef::from_box(Box::new(Square { refs: RefCount::new(), side: 2.0 }));
    /// assert_eq!(shape.area(), 4.0);
    ///
    /// let square = shape.downcast::<Square>();
    /// assert!(!square.is_null());
    /// assert_eq!(shape.ref_count(), 2);
    /// ```
    #[must_use]
    pub fn from_box(value: Box<T>) -> Self {
        let ptr = NonNull::from(Box::leak(value));

        // SAFETY: the pointer comes straight from a Box.
        unsafe { Self::from_raw(ptr.as_ptr()) }
    }

    /// Wraps a raw pointer, incrementing the object's count.
    ///
    /// A null pointer yields a null handle.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or point to a live object allocated with `Box`
    /// whose lifetime is managed only through its [`RefCount`]. The object
    /// is freed with `Box::from_raw` once the count returns to zero.
    pub unsafe fn from_raw(ptr: *mut T) -> Self {
        let this = Self {
            ptr: NonNull::new(ptr),
            _marker: PhantomData,
        };
        this.retain();
        this
    }

    /// Whether the handle refers to nothing.
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.ptr.is_none()
    }

    /// The referenced object, or `None` for a null handle.
    #[inline]
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        // SAFETY: a non-null handle holds a reference, so the object is live.
        self.ptr.map(|ptr| unsafe { &*ptr.as_ptr() })
    }

    /// The raw object pointer. The count is not changed.
    #[inline]
    #[must_use]
    pub fn as_ptr(&self) -> Option<NonNull<T>> {
        self.ptr
    }

    /// The object's current count, or 0 for a null handle.
    #[must_use]
    pub fn ref_count(&self) -> u32 {
        self.get().map_or(0, |value| value.ref_count().get())
    }

    /// Makes this handle refer to `other`'s object.
    ///
    /// `other` is retained before the current object is released, so
    /// assigning a handle to itself (or to another handle of the same
    /// object) never frees the object.
    pub fn assign(&mut self, other: &Self) {
        other.retain();
        self.release();
        self.ptr = other.ptr;
    }

    /// Moves `source`'s reference into this handle, leaving `source` null.
    ///
    /// The object previously held here is released. The moved object's
    /// count is unchanged.
    pub fn move_from(&mut self, source: &mut Self) {
        self.release();
        self.ptr = source.ptr.take();
    }

    /// Moves the reference out, leaving this handle null.
    #[must_use]
    pub fn take(&mut self) -> Self {
        Self {
            ptr: self.ptr.take(),
            _marker: PhantomData,
        }
    }

    /// Releases the reference, leaving this handle null.
    pub fn reset(&mut self) {
        self.release();
    }

    /// Checked cast to a handle of concrete type `U`.
    ///
    /// Returns a new reference (count incremented) if the object is a `U`,
    /// and a null handle otherwise, including when `self` is null.
    #[must_use]
    pub fn downcast<U: RefCounted>(&self) -> OwningRef<U> {
        let Some(ptr) = self.ptr else {
            return OwningRef::null();
        };

        // SAFETY: non-null handle, the object is live.
        let value = unsafe { ptr.as_ref() };
        if !value.as_any().is::<U>() {
            return OwningRef::null();
        }

        let cast = OwningRef {
            ptr: Some(ptr.cast::<U>()),
            _marker: PhantomData,
        };
        cast.retain();
        cast
    }

    /// Re-types the handle through a pointer conversion, keeping the count.
    ///
    /// Use the [`upcast!`](crate::upcast) macro instead of calling this.
    ///
    /// # Safety
    ///
    /// `cast` must return a pointer to the same object, typed as the object
    /// itself or as a trait object it implements (an unsizing coercion).
    ///
    /// # Panics
    ///
    /// Panics if `cast` changes the object's address.
    #[doc(hidden)]
    #[must_use]
    pub unsafe fn __upcast<U: ?Sized + RefCounted>(
        mut self,
        cast: impl FnOnce(*mut T) -> *mut U,
    ) -> OwningRef<U> {
        let Some(ptr) = self.ptr.take() else {
            return OwningRef::null();
        };

        let cast_ptr = cast(ptr.as_ptr());
        assert!(
            std::ptr::addr_eq(ptr.as_ptr(), cast_ptr),
            "OwningRef upcast moved the object pointer"
        );

        // The reference moves from `self` to the new handle; no count change.
        OwningRef {
            ptr: NonNull::new(cast_ptr),
            _marker: PhantomData,
        }
    }

    fn retain(&self) {
        if let Some(value) = self.get() {
            value.ref_count().inc_ref();
        }
    }

    fn release(&mut self) {
        let Some(ptr) = self.ptr.take() else {
            return;
        };

        // SAFETY: this handle still held a reference, so the object is live.
        let last = unsafe { ptr.as_ref() }.ref_count().dec_ref();
        if last {
            // SAFETY: the count reached zero, so no other handle exists. The
            // object was allocated with Box (see from_raw).
            unsafe { drop(Box::from_raw(ptr.as_ptr())) };
        }
    }
}

impl<T: ?Sized + RefCounted> Clone for OwningRef<T> {
    fn clone(&self) -> Self {
        self.retain();
        Self {
            ptr: self.ptr,
            _marker: PhantomData,
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.assign(source);
    }
}

impl<T: ?Sized + RefCounted> Drop for OwningRef<T> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T: ?Sized + RefCounted> Default for OwningRef<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T: ?Sized + RefCounted> From<Box<T>> for OwningRef<T> {
    fn from(value: Box<T>) -> Self {
        Self::from_box(value)
    }
}

impl<T: ?Sized + RefCounted> Deref for OwningRef<T> {
    type Target = T;

    fn deref(&self) -> &T {
        match self.get() {
            Some(value) => value,
            None => panic!("Dereferenced a null OwningRef"),
        }
    }
}

impl<T: ?Sized + RefCounted> PartialEq for OwningRef<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self.ptr, other.ptr) {
            (Some(a), Some(b)) => std::ptr::addr_eq(a.as_ptr(), b.as_ptr()),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: ?Sized + RefCounted> Eq for OwningRef<T> {}

impl<T: ?Sized + RefCounted> fmt::Debug for OwningRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ptr {
            Some(ptr) => f
                .debug_struct("OwningRef")
                .field("ptr", &ptr.as_ptr().cast::<()>())
                .field("ref_count", &self.ref_count())
                .finish(),
            None => f.write_str("OwningRef(null)"),
        }
    }
}

// SAFETY: the count is atomic. Handles on several threads share the object,
// so it must be both Send and Sync, as with Arc.
unsafe impl<T: ?Sized + RefCounted + Send + Sync> Send for OwningRef<T> {}
unsafe impl<T: ?Sized + RefCounted + Send + Sync> Sync for OwningRef<T> {}
