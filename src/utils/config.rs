//! Configuration and constants for the converter.

use crate::capture::MetricKind;

/// Current output format version
pub const FORMAT_VERSION: &str = "1.0.0";

/// Category given to the top-level sample of every thread
pub const ROOT_CATEGORY: &str = "Root";

/// Name used when a thread reports a blank name
pub const UNKNOWN_THREAD: &str = "UnknownThread";

/// Samples whose name contains one of these markers are dropped with their subtree
pub const DEFAULT_EXCLUDE_MARKERS: &[&str] = &["Editor"];

// Elapsed time is captured in milliseconds, trace viewers expect microseconds
pub const ELAPSED_TIME_SCALE: f64 = 1000.0;

// Trace event constants
pub const METADATA_CATEGORY: &str = "__metadata";
pub const THREAD_NAME_EVENT: &str = "thread_name";
pub const TRACE_PID: u32 = 0;

// Output file suffixes, appended to `<base>_<MetricKind>`
pub const TRACE_SUFFIX: &str = "trace.json";
pub const PERFETTO_SUFFIX: &str = "perfetto.json";
pub const INSTRUMENT_SUFFIX: &str = "instrument.txt";
pub const SPEEDSCOPE_SUFFIX: &str = "speedscope.json";
pub const SVG_SUFFIX: &str = "svg";

/// Settings for a single conversion run
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertConfig {
    /// Which sample column is read from each node
    pub metric: MetricKind,

    /// Stop after this many frames (None = whole range)
    pub max_frames: Option<usize>,

    /// Name substrings marking samples to exclude
    pub exclude_markers: Vec<String>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            metric: MetricKind::ElapsedTime,
            max_frames: None,
            exclude_markers: DEFAULT_EXCLUDE_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

impl ConvertConfig {
    pub fn new(metric: MetricKind) -> Self {
        Self {
            metric,
            ..Self::default()
        }
    }

    pub fn with_max_frames(mut self, max_frames: Option<usize>) -> Self {
        self.max_frames = max_frames;
        self
    }

    pub fn with_exclude_markers(mut self, markers: Vec<String>) -> Self {
        self.exclude_markers = markers;
        self
    }

    /// True if a raw sample name should be dropped along with its subtree
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude_markers
            .iter()
            .any(|marker| name.contains(marker.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_excludes_editor_samples() {
        let config = ConvertConfig::default();
        assert!(config.is_excluded("EditorLoop"));
        assert!(config.is_excluded("Profiler.EditorOnly"));
        assert!(!config.is_excluded("PlayerLoop"));
    }

    #[test]
    fn test_empty_markers_exclude_nothing() {
        let config = ConvertConfig::default().with_exclude_markers(Vec::new());
        assert!(!config.is_excluded("EditorLoop"));
    }

    #[test]
    fn test_default_processes_full_range() {
        let config = ConvertConfig::new(MetricKind::CallCount);
        assert_eq!(config.metric, MetricKind::CallCount);
        assert!(config.max_frames.is_none());
    }
}
