//! Profile capture input.
//!
//! This module handles:
//! - The read-only frame/thread/sample views the converter walks
//! - The JSON capture file schema
//! - Loading captures and merging same-named samples
//! - The selectable sample metric

pub mod loader;
pub mod metric;
pub mod schema;
pub mod source;

// Re-export main types
pub use loader::{CaptureSource, ThreadSamples};
pub use metric::MetricKind;
pub use schema::{Capture, FrameRecord, SampleRecord, ThreadRecord};
pub use source::{FrameSource, NodeId, ThreadView};
