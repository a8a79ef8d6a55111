//! Sample value kinds that can be extracted from a capture.

use crate::utils::config::ELAPSED_TIME_SCALE;
use clap::ValueEnum;
use std::fmt;

/// The numeric column read from every sample node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum MetricKind {
    /// Number of calls merged into the sample
    CallCount,
    /// Managed heap bytes allocated by the sample
    AllocatedBytes,
    /// Inclusive wall time, captured in milliseconds
    ElapsedTime,
}

impl MetricKind {
    /// Label used in output file names
    pub fn label(self) -> &'static str {
        match self {
            MetricKind::CallCount => "CallCount",
            MetricKind::AllocatedBytes => "AllocatedBytes",
            MetricKind::ElapsedTime => "ElapsedTime",
        }
    }

    /// Multiplier applied to raw values before they reach the encoders
    pub fn scale(self) -> f64 {
        match self {
            MetricKind::ElapsedTime => ELAPSED_TIME_SCALE,
            MetricKind::CallCount | MetricKind::AllocatedBytes => 1.0,
        }
    }

    /// Unit of the scaled value
    pub fn unit(self) -> &'static str {
        match self {
            MetricKind::CallCount => "none",
            MetricKind::AllocatedBytes => "bytes",
            MetricKind::ElapsedTime => "microseconds",
        }
    }

    /// Counter name shown on flamegraph tooltips
    pub fn count_name(self) -> &'static str {
        match self {
            MetricKind::CallCount => "calls",
            MetricKind::AllocatedBytes => "bytes",
            MetricKind::ElapsedTime => "us",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
