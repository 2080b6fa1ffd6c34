/*!
 * Process-wide Allocator Tests
 * Build-time selection, stats access, shutdown leak check
 */

use memkit::{global_stats, init, process_allocator, shutdown, DynVec, Global, RawAllocator};
use pretty_assertions::assert_eq;
use serial_test::serial;
use std::alloc::Layout;

fn layout(size: usize) -> Layout {
    Layout::from_size_align(size, 8).unwrap()
}

// The process allocator is shared across every test in this binary, so all
// assertions work on deltas rather than absolute totals.

#[test]
#[serial]
fn test_global_handle_round_trip() {
    init();
    let before = global_stats();

    let ptr = Global.allocate(layout(512)).unwrap();
    if let Some(before) = before {
        let during = global_stats().unwrap();
        assert_eq!(
            during.current_allocations,
            before.current_allocations + 1
        );
        assert_eq!(
            during.current_allocated_bytes,
            before.current_allocated_bytes + 512
        );
    }

    unsafe { Global.release(Some(ptr), layout(512)) };
    if let Some(before) = before {
        let after = global_stats().unwrap();
        assert_eq!(after.current_allocations, before.current_allocations);
        assert_eq!(
            after.current_allocated_bytes,
            before.current_allocated_bytes
        );
        assert_eq!(after.total_freed_bytes, before.total_freed_bytes + 512);
    }
}

#[test]
#[serial]
fn test_global_stats_presence_matches_build_configuration() {
    init();
    if cfg!(debug_assertions) {
        // debug builds instrument the system allocator
        assert!(global_stats().is_some());
    } else {
        // release builds run the bare system allocator, nothing is tracked
        assert!(global_stats().is_none());
    }
}

#[test]
#[serial]
fn test_process_allocator_is_a_singleton() {
    let first = process_allocator() as *const _;
    let second = process_allocator() as *const _;
    assert_eq!(first, second);
}

#[test]
#[serial]
fn test_shutdown_passes_on_a_balanced_program() {
    init();
    let ptr = Global.allocate(layout(64)).unwrap();
    unsafe { Global.release(Some(ptr), layout(64)) };

    // every allocation above was matched by a release
    shutdown();
}

#[test]
#[serial]
fn test_containers_reach_the_global_by_default() {
    init();
    let before = global_stats();

    let mut values: DynVec<u64> = DynVec::with_capacity(8).unwrap();
    for i in 0..8 {
        values.push(i).unwrap();
    }

    if let Some(before) = before {
        let during = global_stats().unwrap();
        assert_eq!(during.current_allocations, before.current_allocations + 1);
        assert_eq!(
            during.current_allocated_bytes,
            before.current_allocated_bytes + 64
        );
    }

    drop(values);
    if let Some(before) = before {
        let after = global_stats().unwrap();
        assert_eq!(after.current_allocations, before.current_allocations);
        assert_eq!(
            after.current_allocated_bytes,
            before.current_allocated_bytes
        );
    }
}
