//! Capture file loader.
//!
//! Reads a capture JSON document and builds one node arena per thread.
//! Sibling samples that share a name are merged into a single node: their
//! values are kept side by side as merged samples and their children are
//! merged recursively, the same way a profiler hierarchy view collapses
//! repeated calls.

use super::metric::MetricKind;
use super::schema::{Capture, SampleRecord, ThreadRecord};
use super::source::{FrameSource, NodeId, ThreadView};
use crate::utils::error::SourceError;
use log::{debug, info};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::ops::RangeInclusive;
use std::path::Path;

/// Values of one raw sample folded into a merged node
#[derive(Debug, Clone, Copy)]
struct SampleValues {
    calls: f64,
    gc_memory: f64,
    total_time: f64,
}

impl SampleValues {
    fn of(sample: &SampleRecord) -> Self {
        Self {
            calls: sample.calls,
            gc_memory: sample.gc_memory,
            total_time: sample.total_time,
        }
    }

    fn get(&self, metric: MetricKind) -> f64 {
        match metric {
            MetricKind::CallCount => self.calls,
            MetricKind::AllocatedBytes => self.gc_memory,
            MetricKind::ElapsedTime => self.total_time,
        }
    }
}

#[derive(Debug, Clone)]
struct ArenaNode {
    name: String,
    samples: Vec<SampleValues>,
    children: Vec<NodeId>,
}

/// Merged sample hierarchy for one thread in one frame
#[derive(Debug, Clone)]
pub struct ThreadSamples {
    name: String,
    group: String,
    thread_id: u64,
    nodes: Vec<ArenaNode>,
}

impl ThreadSamples {
    fn build(record: &ThreadRecord) -> Self {
        let mut nodes = Vec::new();
        insert_merged(&mut nodes, &[&record.root]);

        Self {
            name: record.name.clone(),
            group: record.group.clone(),
            thread_id: record.thread_id,
            nodes,
        }
    }

    /// Number of merged nodes in this thread's hierarchy
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Insert one merged node built from a group of same-named siblings
fn insert_merged(nodes: &mut Vec<ArenaNode>, group: &[&SampleRecord]) -> NodeId {
    let id = nodes.len();
    nodes.push(ArenaNode {
        name: group.first().map(|s| s.name.clone()).unwrap_or_default(),
        samples: group.iter().map(|s| SampleValues::of(s)).collect(),
        children: Vec::new(),
    });

    let callees: Vec<&SampleRecord> = group.iter().flat_map(|s| s.children.iter()).collect();
    let children = merge_siblings(nodes, &callees);
    nodes[id].children = children;

    id
}

/// Group siblings by name (first-seen order) and insert one node per group
fn merge_siblings(nodes: &mut Vec<ArenaNode>, siblings: &[&SampleRecord]) -> Vec<NodeId> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&SampleRecord>> = HashMap::new();

    for &sample in siblings {
        let entry = groups.entry(sample.name.as_str()).or_default();
        if entry.is_empty() {
            order.push(sample.name.as_str());
        }
        entry.push(sample);
    }

    order
        .into_iter()
        .map(|name| {
            let group = groups.remove(name).unwrap_or_default();
            insert_merged(nodes, &group)
        })
        .collect()
}

impl ThreadView for ThreadSamples {
    fn thread_name(&self) -> &str {
        &self.name
    }

    fn group_name(&self) -> &str {
        &self.group
    }

    fn thread_id(&self) -> u64 {
        self.thread_id
    }

    fn root_id(&self) -> NodeId {
        0
    }

    fn item_name(&self, id: NodeId) -> &str {
        self.nodes.get(id).map(|n| n.name.as_str()).unwrap_or("")
    }

    fn merged_values(&self, id: NodeId, metric: MetricKind, out: &mut Vec<f64>) {
        if let Some(node) = self.nodes.get(id) {
            out.extend(node.samples.iter().map(|s| s.get(metric)));
        }
    }

    fn has_children(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|n| !n.children.is_empty())
    }

    fn children(&self, id: NodeId, out: &mut Vec<NodeId>) {
        if let Some(node) = self.nodes.get(id) {
            out.extend_from_slice(&node.children);
        }
    }
}

#[derive(Debug, Clone)]
struct LoadedFrame {
    frame_time_ms: f64,
    threads: Vec<ThreadSamples>,
}

/// A capture loaded into memory, ready for conversion
#[derive(Debug, Clone, Default)]
pub struct CaptureSource {
    first_frame: u64,
    frames: Vec<LoadedFrame>,
}

impl CaptureSource {
    /// Load a capture JSON file
    ///
    /// **Public** - main entry point for reading captures
    ///
    /// # Errors
    /// * `SourceError::Unavailable` - file cannot be opened
    /// * `SourceError::JsonError` - file is not a valid capture document
    /// * `SourceError::InvalidFormat` - frame indices are not contiguous
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();

        debug!("Reading capture from: {}", path.display());

        let file = File::open(path).map_err(|source| SourceError::Unavailable {
            path: path.to_path_buf(),
            source,
        })?;

        let capture: Capture = serde_json::from_reader(BufReader::new(file))?;
        let source = Self::from_capture(capture)?;

        info!(
            "Capture loaded: {} frames, {} thread samples",
            source.frame_count(),
            source.thread_sample_count()
        );

        Ok(source)
    }

    /// Parse a capture from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, SourceError> {
        let capture: Capture = serde_json::from_str(json)?;
        Self::from_capture(capture)
    }

    /// Build the merged node arenas from an in-memory capture
    pub fn from_capture(mut capture: Capture) -> Result<Self, SourceError> {
        capture.frames.sort_by_key(|f| f.index);

        let first_frame = capture.frames.first().map(|f| f.index).unwrap_or(0);
        for (offset, frame) in capture.frames.iter().enumerate() {
            let expected = first_frame + offset as u64;
            if frame.index != expected {
                return Err(SourceError::InvalidFormat(format!(
                    "frame indices must be contiguous: expected {}, found {}",
                    expected, frame.index
                )));
            }
        }

        let frames = capture
            .frames
            .iter()
            .map(|frame| LoadedFrame {
                frame_time_ms: frame.frame_time_ms,
                threads: frame.threads.iter().map(ThreadSamples::build).collect(),
            })
            .collect();

        Ok(Self {
            first_frame,
            frames,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Total number of (frame, thread) sample trees
    pub fn thread_sample_count(&self) -> usize {
        self.frames.iter().map(|f| f.threads.len()).sum()
    }

    /// Total number of merged nodes across all frames and threads
    pub fn node_count(&self) -> usize {
        self.frames
            .iter()
            .flat_map(|f| f.threads.iter())
            .map(ThreadSamples::node_count)
            .sum()
    }

    fn frame(&self, frame: u64) -> Option<&LoadedFrame> {
        let offset = frame.checked_sub(self.first_frame)?;
        self.frames.get(usize::try_from(offset).ok()?)
    }
}

impl FrameSource for CaptureSource {
    type Thread = ThreadSamples;

    fn frame_range(&self) -> Option<RangeInclusive<u64>> {
        if self.frames.is_empty() {
            return None;
        }
        let last = self.first_frame + self.frames.len() as u64 - 1;
        Some(self.first_frame..=last)
    }

    fn frame_time_ms(&self, frame: u64) -> f64 {
        self.frame(frame).map(|f| f.frame_time_ms).unwrap_or(0.0)
    }

    fn thread_count(&self, frame: u64) -> usize {
        self.frame(frame).map(|f| f.threads.len()).unwrap_or(0)
    }

    fn thread(&self, frame: u64, index: usize) -> Option<&ThreadSamples> {
        self.frame(frame)?.threads.get(index)
    }
}
