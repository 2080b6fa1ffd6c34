/*!
 * Allocation Types
 * Errors and statistics for the allocation subsystem
 */

use crate::core::types::Size;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Allocation operation result
pub type AllocResult<T> = Result<T, AllocError>;

/// Allocation errors
///
/// Every variant is recoverable from the caller's point of view: the request
/// failed, nothing was allocated, and no counter moved. Integrity violations
/// (double free, over-free, leak) are not errors - they are reported at the
/// point of detection and never surface through this type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocError {
    #[error("out of memory: failed to obtain {size} bytes aligned to {align}")]
    OutOfMemory { size: Size, align: Size },

    #[error("requested alignment {align} exceeds the platform maximum {max}")]
    UnsupportedAlignment { align: Size, max: Size },

    #[error("capacity overflow: {elements} elements of {element_size} bytes exceed the addressable range")]
    CapacityOverflow { elements: usize, element_size: Size },
}

/// Running allocation statistics
///
/// Snapshot of an instrumented allocator's counters. Totals and peaks are
/// monotonic; current values rise and fall with the live allocation set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocStats {
    pub total_allocations: u64,
    pub current_allocations: u64,
    pub peak_allocations: u64,
    pub total_allocated_bytes: u64,
    pub current_allocated_bytes: u64,
    pub peak_allocated_bytes: u64,
    pub total_freed_bytes: u64,
}
