/*!
 * Collections Module
 * Allocator-backed containers
 */

pub mod dyn_vec;

// Re-export for convenience
pub use dyn_vec::DynVec;
