/*!
 * Allocator Traits
 * The capability contract every allocator implements
 */

use super::types::AllocResult;
use crate::core::types::Size;
use std::alloc::Layout;
use std::ptr::NonNull;

/// Raw allocator interface
///
/// The sole boundary consumers depend on: obtain, resize, and release
/// regions of raw memory. Implementations own whatever bookkeeping they
/// need; the contract itself is stateless.
///
/// Resource discipline: every region obtained through `allocate` or
/// `reallocate` must be returned through exactly one `release` (or folded
/// into a later `reallocate`) carrying the same alignment and the region's
/// current size.
///
/// Zero-size requests succeed with a dangling, align-addressed pointer and
/// no underlying allocation; releasing such a region frees nothing.
pub trait RawAllocator {
    /// Obtain a fresh region of at least `layout.size()` bytes aligned to
    /// `layout.align()`.
    ///
    /// Fails with an error instead of handing out misaligned or absent
    /// memory; no retry happens on behalf of the caller.
    fn allocate(&self, layout: Layout) -> AllocResult<NonNull<u8>>;

    /// Resize a previously obtained region to `new_size` bytes, preserving
    /// contents up to `min(old, new)`. The region may move.
    ///
    /// `None` with a zero-size `old_layout` behaves as a plain allocation.
    /// On failure the old region is untouched and still owned by the caller.
    ///
    /// # Safety
    /// `ptr` must have been obtained from this allocator with `old_layout`
    /// (same alignment, current size), and `new_size` must not overflow
    /// `isize::MAX` when rounded up to `old_layout.align()`.
    unsafe fn reallocate(
        &self,
        ptr: Option<NonNull<u8>>,
        old_layout: Layout,
        new_size: Size,
    ) -> AllocResult<NonNull<u8>>;

    /// Return a region to the allocator. `None` is a no-op.
    ///
    /// # Safety
    /// A `Some` ptr must have been obtained from this allocator with
    /// `layout` (same alignment, current size) and must not be used again.
    unsafe fn release(&self, ptr: Option<NonNull<u8>>, layout: Layout);
}

/// A borrowed allocator satisfies the same contract as its owner. This is
/// what lets a decorator wrap an allocator it does not own the lifetime of.
impl<A: RawAllocator + ?Sized> RawAllocator for &A {
    fn allocate(&self, layout: Layout) -> AllocResult<NonNull<u8>> {
        (**self).allocate(layout)
    }

    unsafe fn reallocate(
        &self,
        ptr: Option<NonNull<u8>>,
        old_layout: Layout,
        new_size: Size,
    ) -> AllocResult<NonNull<u8>> {
        // SAFETY: forwarded under the caller's contract
        unsafe { (**self).reallocate(ptr, old_layout, new_size) }
    }

    unsafe fn release(&self, ptr: Option<NonNull<u8>>, layout: Layout) {
        // SAFETY: forwarded under the caller's contract
        unsafe { (**self).release(ptr, layout) }
    }
}
