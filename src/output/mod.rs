//! Output encoders for flattened profile data.
//!
//! This module handles writing data to disk in various formats:
//! - Trace event JSON (bare array and perfetto `traceEvents` envelope)
//! - Collapsed stack text
//! - Speedscope JSON
//! - SVG flamegraphs

pub mod collapsed;
pub mod events;
pub mod json;
pub mod sinks;
pub mod speedscope;
pub mod svg;

// Re-export main types and functions
pub use collapsed::{CollapsedStack, CollapsedWriter};
pub use events::{Phase, SpanEvent, ThreadNameEvent, TraceEvent};
pub use json::{DocumentLayout, JsonArrayWriter};
pub use sinks::{EventSink, OutputSet, RecordingSink, SinkSummary, TraceSinks};
pub use speedscope::{build_speedscope, write_speedscope, Speedscope};
pub use svg::write_svg;

use crate::utils::error::OutputError;
use std::path::Path;

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}
