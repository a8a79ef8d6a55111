//! Conversion of per-frame sample trees into flat trace records.
//!
//! This module transforms captured frames into:
//! - Timestamped span events (one per visited sample)
//! - One thread-name record per unique thread
//! - Collapsed self-value stacks (for flamegraphs)

pub mod driver;
pub mod flatten;
pub mod pool;
pub mod registry;

// Re-export main types and functions
pub use driver::{convert_frames, ConversionSummary};
pub use flatten::{flatten, normalize_sample_name, CallPath, FlattenState, ThreadScope};
pub use pool::NodePool;
pub use registry::{normalize_thread_name, thread_full_name, ThreadRegistry};
