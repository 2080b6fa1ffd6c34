/*!
 * Allocation Module
 * Allocator capability, system backend, instrumentation, process-wide handle
 */

pub mod global;
pub mod instrumented;
pub mod system;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use global::{global_stats, init, process_allocator, shutdown, DefaultAllocator, Global};
pub use instrumented::InstrumentedAllocator;
pub use system::SystemAllocator;
pub use traits::RawAllocator;
pub use types::{AllocError, AllocResult, AllocStats};
