/*!
 * Limits and Constants
 *
 * Centralized location for allocation limits and growth thresholds.
 * All values include rationale comments explaining WHY they exist.
 */

use crate::core::types::Size;
use std::mem;

/// Maximum alignment the system allocator can honor
/// malloc returns memory aligned for any fundamental type, nothing stronger;
/// requests above this fail instead of handing out misaligned memory
pub const MAX_NATURAL_ALIGN: Size = mem::align_of::<libc::max_align_t>();

/// First capacity a growing container jumps to (slots)
/// Skips the 1 -> 2 -> 4 reallocation churn for small vectors
pub const MIN_GROW_CAPACITY: usize = 4;

/// Geometric growth factor for dynamic containers
/// Doubling keeps repeated appends amortized O(1)
pub const GROWTH_FACTOR: usize = 2;
