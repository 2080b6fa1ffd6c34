/*!
 * Process-wide Allocator Handle
 * Build-time selected default allocator reachable from anywhere
 */

#[cfg(debug_assertions)]
use super::instrumented::InstrumentedAllocator;
use super::system::SystemAllocator;
use super::traits::RawAllocator;
use super::types::{AllocResult, AllocStats};
use crate::core::types::Size;
#[cfg(debug_assertions)]
use log::error;
use log::info;
use std::alloc::Layout;
use std::ptr::NonNull;
use std::sync::OnceLock;

/// The allocator every consumer reaches by default
///
/// Debug builds wrap the system allocator with instrumentation and assert on
/// leaks at shutdown; release builds use the system allocator directly with
/// no tracking overhead.
#[cfg(debug_assertions)]
pub type DefaultAllocator = InstrumentedAllocator<SystemAllocator>;

/// The allocator every consumer reaches by default
///
/// Debug builds wrap the system allocator with instrumentation and assert on
/// leaks at shutdown; release builds use the system allocator directly with
/// no tracking overhead.
#[cfg(not(debug_assertions))]
pub type DefaultAllocator = SystemAllocator;

static PROCESS_ALLOCATOR: OnceLock<DefaultAllocator> = OnceLock::new();

fn build_default() -> DefaultAllocator {
    #[cfg(debug_assertions)]
    {
        InstrumentedAllocator::new(SystemAllocator::new())
    }
    #[cfg(not(debug_assertions))]
    {
        SystemAllocator::new()
    }
}

/// The process-wide allocator instance
///
/// Initialized on first use and shared for the rest of the process lifetime.
pub fn process_allocator() -> &'static DefaultAllocator {
    PROCESS_ALLOCATOR.get_or_init(|| {
        info!(
            "process allocator initialized ({})",
            if cfg!(debug_assertions) {
                "instrumented system allocator"
            } else {
                "system allocator"
            }
        );
        build_default()
    })
}

/// Initialize the process-wide allocator eagerly
///
/// Optional: the handle initializes itself on first use. Calling this up
/// front keeps initialization out of the first allocation path.
pub fn init() {
    let _ = process_allocator();
}

/// Verify the process-wide allocator is balanced at teardown
///
/// Statics never drop, so the leak check an instrumented allocator runs at
/// destruction is an explicit call here. Every allocation must have been
/// matched by a release before this point; anything still live is a leak and
/// is reported as a defect (debug builds panic). Release builds track
/// nothing and have nothing to check.
pub fn shutdown() {
    #[cfg(debug_assertions)]
    if let Some(allocator) = PROCESS_ALLOCATOR.get() {
        let stats = allocator.stats();
        if stats.current_allocations != 0 || stats.current_allocated_bytes != 0 {
            error!(
                "memory leak detected at shutdown: {} allocations still active, {} bytes still allocated",
                stats.current_allocations, stats.current_allocated_bytes
            );
            if !std::thread::panicking() {
                panic!(
                    "memory leak detected at shutdown: {} allocations still active, {} bytes still allocated",
                    stats.current_allocations, stats.current_allocated_bytes
                );
            }
        } else {
            info!(
                "process allocator shut down clean ({} allocations, {} bytes over the process lifetime)",
                stats.total_allocations, stats.total_allocated_bytes
            );
        }
    }
}

/// Statistics for the process-wide allocator
///
/// `None` in release builds (nothing is tracked) and before first use.
pub fn global_stats() -> Option<AllocStats> {
    #[cfg(debug_assertions)]
    {
        PROCESS_ALLOCATOR.get().map(|allocator| allocator.stats())
    }
    #[cfg(not(debug_assertions))]
    {
        None
    }
}

/// Zero-sized handle to the process-wide allocator
///
/// Containers default to this, so consumers stay generic over
/// [`RawAllocator`] and the global is reached only at leaf allocation sites.
#[derive(Debug, Clone, Copy, Default)]
pub struct Global;

impl RawAllocator for Global {
    fn allocate(&self, layout: Layout) -> AllocResult<NonNull<u8>> {
        process_allocator().allocate(layout)
    }

    unsafe fn reallocate(
        &self,
        ptr: Option<NonNull<u8>>,
        old_layout: Layout,
        new_size: Size,
    ) -> AllocResult<NonNull<u8>> {
        // SAFETY: forwarded under the caller's contract
        unsafe { process_allocator().reallocate(ptr, old_layout, new_size) }
    }

    unsafe fn release(&self, ptr: Option<NonNull<u8>>, layout: Layout) {
        // SAFETY: forwarded under the caller's contract
        unsafe { process_allocator().release(ptr, layout) }
    }
}
