/*!
 * Core Types
 * Common types used across the crate
 */

/// Size type for memory operations, in bytes
pub type Size = usize;
