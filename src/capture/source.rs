//! Read-only views over profiler frames, threads and sample nodes.
//!
//! The converter never touches capture storage directly. It walks
//! whatever implements [`FrameSource`], one [`ThreadView`] at a time.

use super::metric::MetricKind;
use std::ops::RangeInclusive;

/// Opaque sample id, scoped to a single thread view
pub type NodeId = usize;

/// One thread's sample hierarchy within one frame
pub trait ThreadView {
    /// Raw thread name as reported by the profiler (may be blank)
    fn thread_name(&self) -> &str;

    /// Thread group name, empty when the thread is ungrouped
    fn group_name(&self) -> &str;

    /// Numeric thread id used as the trace `tid`
    fn thread_id(&self) -> u64;

    /// Id of the top-level sample
    fn root_id(&self) -> NodeId;

    /// Raw sample name (may be blank or contain whitespace)
    fn item_name(&self, id: NodeId) -> &str;

    /// Append every merged sample value for `metric` to `out`
    fn merged_values(&self, id: NodeId, metric: MetricKind, out: &mut Vec<f64>);

    fn has_children(&self, id: NodeId) -> bool;

    /// Append child ids to `out` in source order
    fn children(&self, id: NodeId, out: &mut Vec<NodeId>);
}

/// A fully materialized set of captured frames
pub trait FrameSource {
    type Thread: ThreadView;

    /// Contiguous frame index range, `None` when the capture holds no frames
    fn frame_range(&self) -> Option<RangeInclusive<u64>>;

    /// Overall frame duration in milliseconds
    fn frame_time_ms(&self, frame: u64) -> f64;

    fn thread_count(&self, frame: u64) -> usize;

    fn thread(&self, frame: u64, index: usize) -> Option<&Self::Thread>;
}
