/*!
 * Instrumented Allocator
 * Decorator that tracks allocation lifecycle and detects misuse
 */

use super::traits::RawAllocator;
use super::types::{AllocResult, AllocStats};
use crate::core::types::Size;
use log::{error, trace};
use std::alloc::Layout;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicU64, Ordering};

/// Decorator wrapping any [`RawAllocator`], observing every request
///
/// Delegates actual memory management unchanged while maintaining running
/// statistics. Failed requests leave every counter untouched. Double frees
/// and over-frees are reported as integrity violations and the affected
/// counter is clamped to a safe value first, so unsigned underflow cannot
/// compound the corruption.
///
/// Wrap by value, or by reference when the wrapped allocator must outlive
/// the wrapper: `InstrumentedAllocator::new(&system)`. Decorators compose;
/// each one observes the layer beneath it.
///
/// Dropping the wrapper with live allocations is a leak by contract and is
/// reported as such (debug builds panic).
#[derive(Debug, Default)]
pub struct InstrumentedAllocator<A: RawAllocator> {
    inner: A,
    total_allocations: AtomicU64,
    current_allocations: AtomicU64,
    peak_allocations: AtomicU64,
    total_allocated_bytes: AtomicU64,
    current_allocated_bytes: AtomicU64,
    peak_allocated_bytes: AtomicU64,
    total_freed_bytes: AtomicU64,
}

impl<A: RawAllocator> InstrumentedAllocator<A> {
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            total_allocations: AtomicU64::new(0),
            current_allocations: AtomicU64::new(0),
            peak_allocations: AtomicU64::new(0),
            total_allocated_bytes: AtomicU64::new(0),
            current_allocated_bytes: AtomicU64::new(0),
            peak_allocated_bytes: AtomicU64::new(0),
            total_freed_bytes: AtomicU64::new(0),
        }
    }

    /// The wrapped allocator
    pub fn inner(&self) -> &A {
        &self.inner
    }

    /// Snapshot of the running counters
    pub fn stats(&self) -> AllocStats {
        AllocStats {
            total_allocations: self.total_allocations.load(Ordering::SeqCst),
            current_allocations: self.current_allocations.load(Ordering::SeqCst),
            peak_allocations: self.peak_allocations.load(Ordering::SeqCst),
            total_allocated_bytes: self.total_allocated_bytes.load(Ordering::SeqCst),
            current_allocated_bytes: self.current_allocated_bytes.load(Ordering::SeqCst),
            peak_allocated_bytes: self.peak_allocated_bytes.load(Ordering::SeqCst),
            total_freed_bytes: self.total_freed_bytes.load(Ordering::SeqCst),
        }
    }

    fn record_new_block(&self) {
        self.total_allocations.fetch_add(1, Ordering::SeqCst);
        let current = self.current_allocations.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_allocations.fetch_max(current, Ordering::SeqCst);
    }

    fn record_grow(&self, bytes: u64) {
        self.total_allocated_bytes.fetch_add(bytes, Ordering::SeqCst);
        let current = self.current_allocated_bytes.fetch_add(bytes, Ordering::SeqCst) + bytes;
        self.peak_allocated_bytes.fetch_max(current, Ordering::SeqCst);
    }

    fn record_shrink(&self, bytes: u64) {
        self.total_freed_bytes.fetch_add(bytes, Ordering::SeqCst);
        self.current_allocated_bytes.fetch_sub(bytes, Ordering::SeqCst);
    }
}

impl<A: RawAllocator> RawAllocator for InstrumentedAllocator<A> {
    fn allocate(&self, layout: Layout) -> AllocResult<NonNull<u8>> {
        let ptr = self.inner.allocate(layout)?;
        self.record_new_block();
        self.record_grow(layout.size() as u64);
        trace!(
            "allocated {} bytes (align {}) at {:p}",
            layout.size(),
            layout.align(),
            ptr
        );
        Ok(ptr)
    }

    unsafe fn reallocate(
        &self,
        ptr: Option<NonNull<u8>>,
        old_layout: Layout,
        new_size: Size,
    ) -> AllocResult<NonNull<u8>> {
        // SAFETY: forwarded under the caller's contract
        let new_ptr = unsafe { self.inner.reallocate(ptr, old_layout, new_size)? };

        let old = old_layout.size() as u64;
        let new = new_size as u64;
        if new > old {
            if old == 0 {
                // growing an empty region brings a new block into existence
                self.record_new_block();
            }
            self.record_grow(new - old);
        } else if old > new {
            // the block lives on, smaller: a partial free
            self.record_shrink(old - new);
        }
        trace!(
            "reallocated {} -> {} bytes (align {}) at {:p}",
            old,
            new,
            old_layout.align(),
            new_ptr
        );
        Ok(new_ptr)
    }

    unsafe fn release(&self, ptr: Option<NonNull<u8>>, layout: Layout) {
        let Some(ptr) = ptr else {
            // releasing nothing is a no-op, not an allocation event
            return;
        };
        // SAFETY: forwarded under the caller's contract
        unsafe { self.inner.release(Some(ptr), layout) };

        let bytes = layout.size() as u64;
        if self.current_allocations.load(Ordering::SeqCst) == 0 {
            error!(
                "unmatched release of {} bytes at {:p}: current allocation count is already zero, \
                 this is probably a double free or memory corruption",
                bytes, ptr
            );
            self.current_allocations.store(1, Ordering::SeqCst);
        }
        let current_bytes = self.current_allocated_bytes.load(Ordering::SeqCst);
        if current_bytes < bytes {
            error!(
                "over-free of {} bytes at {:p}: only {} bytes currently tracked as allocated",
                bytes, ptr, current_bytes
            );
            self.current_allocated_bytes.store(bytes, Ordering::SeqCst);
        }
        self.current_allocations.fetch_sub(1, Ordering::SeqCst);
        self.total_freed_bytes.fetch_add(bytes, Ordering::SeqCst);
        self.current_allocated_bytes.fetch_sub(bytes, Ordering::SeqCst);
        trace!("released {} bytes (align {}) at {:p}", bytes, layout.align(), ptr);
    }
}

impl<A: RawAllocator> Drop for InstrumentedAllocator<A> {
    fn drop(&mut self) {
        let count = self.current_allocations.load(Ordering::SeqCst);
        let bytes = self.current_allocated_bytes.load(Ordering::SeqCst);
        if count != 0 || bytes != 0 {
            error!(
                "memory leak detected: {} allocations still active, {} bytes still allocated",
                count, bytes
            );
            if cfg!(debug_assertions) && !std::thread::panicking() {
                panic!(
                    "memory leak detected: {count} allocations still active, {bytes} bytes still allocated"
                );
            }
        }
    }
}
