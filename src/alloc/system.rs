/*!
 * System Allocator
 * Leaf implementation over the platform allocation primitives
 */

use super::traits::RawAllocator;
use super::types::{AllocError, AllocResult};
use crate::core::limits::MAX_NATURAL_ALIGN;
use crate::core::types::Size;
use log::error;
use std::alloc::Layout;
use std::ptr::NonNull;

/// Allocator backed by `malloc`/`realloc`/`free`
///
/// Stateless; every instance is interchangeable. The platform heap only
/// guarantees alignment for fundamental types (`max_align_t`), so any
/// request above [`MAX_NATURAL_ALIGN`] is rejected rather than served
/// misaligned.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemAllocator;

impl SystemAllocator {
    pub const fn new() -> Self {
        SystemAllocator
    }

    fn check_alignment(layout: Layout) -> AllocResult<()> {
        if layout.align() > MAX_NATURAL_ALIGN {
            error!(
                "requested alignment {} exceeds max alignment {}, cannot use the platform heap (malloc under the hood)",
                layout.align(),
                MAX_NATURAL_ALIGN
            );
            return Err(AllocError::UnsupportedAlignment {
                align: layout.align(),
                max: MAX_NATURAL_ALIGN,
            });
        }
        Ok(())
    }
}

/// Canonical region for zero-size requests: dangling but well-aligned.
/// Never passed to libc.
fn dangling(layout: Layout) -> NonNull<u8> {
    // alignments are nonzero powers of two, so the address is never null
    unsafe { NonNull::new_unchecked(layout.align() as *mut u8) }
}

impl RawAllocator for SystemAllocator {
    fn allocate(&self, layout: Layout) -> AllocResult<NonNull<u8>> {
        Self::check_alignment(layout)?;
        if layout.size() == 0 {
            return Ok(dangling(layout));
        }
        // SAFETY: size is nonzero; malloc returns max_align_t-aligned memory
        let ptr = unsafe { libc::malloc(layout.size()) };
        NonNull::new(ptr.cast::<u8>()).ok_or(AllocError::OutOfMemory {
            size: layout.size(),
            align: layout.align(),
        })
    }

    unsafe fn reallocate(
        &self,
        ptr: Option<NonNull<u8>>,
        old_layout: Layout,
        new_size: Size,
    ) -> AllocResult<NonNull<u8>> {
        Self::check_alignment(old_layout)?;

        // no live region yet: plain allocation
        let Some(ptr) = ptr.filter(|_| old_layout.size() != 0) else {
            // SAFETY: caller guarantees new_size is valid for this alignment
            let new_layout =
                unsafe { Layout::from_size_align_unchecked(new_size, old_layout.align()) };
            return self.allocate(new_layout);
        };

        if new_size == 0 {
            // shrink to nothing: free and hand back the canonical empty region
            // SAFETY: ptr came from malloc/realloc and is still live
            unsafe { libc::free(ptr.as_ptr().cast()) };
            return Ok(dangling(old_layout));
        }

        // SAFETY: ptr came from malloc/realloc and is still live
        let new_ptr = unsafe { libc::realloc(ptr.as_ptr().cast(), new_size) };
        NonNull::new(new_ptr.cast::<u8>()).ok_or(AllocError::OutOfMemory {
            size: new_size,
            align: old_layout.align(),
        })
    }

    unsafe fn release(&self, ptr: Option<NonNull<u8>>, layout: Layout) {
        let Some(ptr) = ptr else {
            return;
        };
        if Self::check_alignment(layout).is_err() {
            // such a region cannot have come from this allocator; refusing to
            // free is safer than handing libc a pointer it never produced
            return;
        }
        if layout.size() == 0 {
            return;
        }
        // SAFETY: ptr was obtained from this allocator with this layout
        unsafe { libc::free(ptr.as_ptr().cast()) };
    }
}
