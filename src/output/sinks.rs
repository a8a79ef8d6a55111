//! The three encoders driven by one traversal.
//!
//! [`TraceSinks`] fans every record out to the trace-event array, the
//! perfetto document and the collapsed stack file. [`RecordingSink`] keeps
//! the same records in memory.

use super::collapsed::{CollapsedStack, CollapsedWriter};
use super::events::{SpanEvent, ThreadNameEvent, TraceEvent};
use super::json::{DocumentLayout, JsonArrayWriter};
use crate::capture::MetricKind;
use crate::utils::config::{
    INSTRUMENT_SUFFIX, PERFETTO_SUFFIX, SPEEDSCOPE_SUFFIX, SVG_SUFFIX, TRACE_SUFFIX,
};
use crate::utils::error::OutputError;
use log::debug;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Receiver for everything the flattener emits
pub trait EventSink {
    /// One-time thread naming record
    fn thread_name(&mut self, event: &ThreadNameEvent) -> Result<(), OutputError>;

    /// One span per visited sample
    fn span(&mut self, event: &SpanEvent) -> Result<(), OutputError>;

    /// One collapsed stack line
    fn stack(&mut self, path: &[String], weight: f64) -> Result<(), OutputError>;
}

/// File paths making up one output set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSet {
    pub trace: PathBuf,
    pub perfetto: PathBuf,
    pub instrument: PathBuf,
    pub speedscope: PathBuf,
    pub svg: PathBuf,
}

impl OutputSet {
    /// Paths for `<base>_<MetricKind>.<suffix>`
    pub fn new(base: impl AsRef<Path>, metric: MetricKind) -> Self {
        let base = base.as_ref();
        let file_for = |suffix: &str| {
            let mut name = base.as_os_str().to_os_string();
            name.push(format!("_{}.{}", metric.label(), suffix));
            PathBuf::from(name)
        };

        Self {
            trace: file_for(TRACE_SUFFIX),
            perfetto: file_for(PERFETTO_SUFFIX),
            instrument: file_for(INSTRUMENT_SUFFIX),
            speedscope: file_for(SPEEDSCOPE_SUFFIX),
            svg: file_for(SVG_SUFFIX),
        }
    }
}

/// What the encoders wrote during one run
#[derive(Debug, Clone, Default)]
pub struct SinkSummary {
    pub trace_events: usize,
    pub perfetto_events: usize,
    pub stack_lines: usize,
    /// Retained stacks, empty unless retention was requested
    pub stacks: Vec<CollapsedStack>,
}

/// Trace, perfetto and collapsed stack encoders sharing one traversal
pub struct TraceSinks<W: Write> {
    trace: JsonArrayWriter<W>,
    perfetto: JsonArrayWriter<W>,
    collapsed: CollapsedWriter<W>,
}

impl<W: Write> TraceSinks<W> {
    /// Open all three documents
    pub fn new(trace: W, perfetto: W, collapsed: W) -> Result<Self, OutputError> {
        Ok(Self {
            trace: JsonArrayWriter::new(trace, DocumentLayout::Array)?,
            perfetto: JsonArrayWriter::new(perfetto, DocumentLayout::TraceEvents)?,
            collapsed: CollapsedWriter::new(collapsed),
        })
    }

    /// Keep collapsed stacks in memory as well as writing them
    pub fn retaining_stacks(mut self) -> Self {
        self.collapsed = self.collapsed.retaining();
        self
    }

    /// Close every document
    pub fn finish(self) -> Result<SinkSummary, OutputError> {
        Ok(self.finish_into_writers()?.0)
    }

    /// Close every document and return the writers (trace, perfetto, collapsed)
    pub fn finish_into_writers(self) -> Result<(SinkSummary, [W; 3]), OutputError> {
        let trace_events = self.trace.event_count();
        let perfetto_events = self.perfetto.event_count();
        let stack_lines = self.collapsed.line_count();

        let trace = self.trace.finish()?;
        let perfetto = self.perfetto.finish()?;
        let (collapsed, stacks) = self.collapsed.finish()?;

        let summary = SinkSummary {
            trace_events,
            perfetto_events,
            stack_lines,
            stacks,
        };
        Ok((summary, [trace, perfetto, collapsed]))
    }
}

impl TraceSinks<BufWriter<File>> {
    /// Create (truncating) the trace, perfetto and instrument files of a set
    pub fn create(outputs: &OutputSet) -> Result<Self, OutputError> {
        Self::new(
            create_output_file(&outputs.trace)?,
            create_output_file(&outputs.perfetto)?,
            create_output_file(&outputs.instrument)?,
        )
    }
}

impl<W: Write> EventSink for TraceSinks<W> {
    fn thread_name(&mut self, event: &ThreadNameEvent) -> Result<(), OutputError> {
        self.perfetto.write_event(event)?;
        self.trace.write_event(event)
    }

    fn span(&mut self, event: &SpanEvent) -> Result<(), OutputError> {
        self.perfetto.write_event(event)?;
        self.trace.write_event(event)
    }

    fn stack(&mut self, path: &[String], weight: f64) -> Result<(), OutputError> {
        self.collapsed.write_stack(path, weight)
    }
}

/// In-memory sink holding every emitted record in order
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub events: Vec<TraceEvent>,
    pub stacks: Vec<CollapsedStack>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spans(&self) -> impl Iterator<Item = &SpanEvent> {
        self.events.iter().filter_map(TraceEvent::as_span)
    }

    pub fn thread_names(&self) -> impl Iterator<Item = &ThreadNameEvent> {
        self.events.iter().filter_map(TraceEvent::as_thread_name)
    }

    /// Collapsed lines as they would appear in the instrument file
    pub fn lines(&self) -> Vec<String> {
        self.stacks.iter().map(CollapsedStack::to_line).collect()
    }
}

impl EventSink for RecordingSink {
    fn thread_name(&mut self, event: &ThreadNameEvent) -> Result<(), OutputError> {
        self.events.push(TraceEvent::ThreadName(event.clone()));
        Ok(())
    }

    fn span(&mut self, event: &SpanEvent) -> Result<(), OutputError> {
        self.events.push(TraceEvent::Span(event.clone()));
        Ok(())
    }

    fn stack(&mut self, path: &[String], weight: f64) -> Result<(), OutputError> {
        self.stacks.push(CollapsedStack::new(path.to_vec(), weight));
        Ok(())
    }
}

/// Validate a path, create its parent directories, and open it truncated
pub fn create_output_file(path: &Path) -> Result<BufWriter<File>, OutputError> {
    super::validate_path(path)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(path).map_err(OutputError::WriteFailed)?;
    Ok(BufWriter::new(file))
}
