use crate::capture::MetricKind;
use crate::utils::config::DEFAULT_EXCLUDE_MARKERS;
use std::path::PathBuf;

/// Arguments for the convert command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ConvertArgs {
    /// Capture JSON file to convert
    pub input: PathBuf,

    /// Output base path (defaults to the input path without extension)
    pub output_base: Option<PathBuf>,

    /// One output set is written per metric
    pub metrics: Vec<MetricKind>,

    /// Stop after this many frames
    pub max_frames: Option<usize>,

    /// Name substrings marking samples to exclude
    pub exclude_markers: Vec<String>,

    /// Also render `<base>_<Metric>.svg`
    pub flamegraph: bool,

    /// Flamegraph title (defaults to the input file name)
    pub title: Option<String>,

    /// Flamegraph image width in pixels
    pub width: Option<usize>,

    /// Also write `<base>_<Metric>.speedscope.json`
    pub speedscope: bool,

    /// Print the heaviest stacks to stdout
    pub print_summary: bool,
}

impl Default for ConvertArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output_base: None,
            metrics: vec![MetricKind::ElapsedTime],
            max_frames: None,
            exclude_markers: DEFAULT_EXCLUDE_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            flamegraph: false,
            title: None,
            width: None,
            speedscope: false,
            print_summary: false,
        }
    }
}

impl ConvertArgs {
    /// Base path that output file names are derived from
    pub fn output_base(&self) -> PathBuf {
        self.output_base
            .clone()
            .unwrap_or_else(|| self.input.with_extension(""))
    }

    /// Whether any renderer needs the collapsed stacks kept in memory
    pub fn retains_stacks(&self) -> bool {
        self.flamegraph || self.speedscope || self.print_summary
    }
}

/// Files written for one metric
#[derive(Debug, Clone)]
pub struct RunReport {
    pub metric: MetricKind,
    pub written: Vec<PathBuf>,
    pub spans: usize,
    pub stacks: usize,
}
