//! Streaming JSON trace document writer.
//!
//! Events are serialized one at a time with serde, so names are always
//! escaped correctly and the writer alone decides where commas go. The
//! closing bracket is written by [`JsonArrayWriter::finish`], or on drop if
//! a run stops early, so the document stays well formed.

use crate::utils::error::OutputError;
use serde::Serialize;
use std::io::{self, Write};

/// Outer shape of a trace document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentLayout {
    /// A bare JSON array of events
    Array,
    /// `{"traceEvents": [...]}`
    TraceEvents,
}

impl DocumentLayout {
    fn opening(self) -> &'static [u8] {
        match self {
            DocumentLayout::Array => b"[",
            DocumentLayout::TraceEvents => b"{\n\"traceEvents\": [",
        }
    }

    fn closing(self) -> &'static [u8] {
        match self {
            DocumentLayout::Array => b"\n]\n",
            DocumentLayout::TraceEvents => b"\n]\n}\n",
        }
    }
}

/// Writes a JSON array of events, one event per line
pub struct JsonArrayWriter<W: Write> {
    writer: Option<W>,
    layout: DocumentLayout,
    events: usize,
}

impl<W: Write> JsonArrayWriter<W> {
    /// Start a document and write its opening bracket
    pub fn new(mut writer: W, layout: DocumentLayout) -> Result<Self, OutputError> {
        writer.write_all(layout.opening())?;

        Ok(Self {
            writer: Some(writer),
            layout,
            events: 0,
        })
    }

    /// Append one event
    pub fn write_event<T: Serialize>(&mut self, event: &T) -> Result<(), OutputError> {
        let writer = self.writer.as_mut().ok_or_else(closed_error)?;

        if self.events > 0 {
            writer.write_all(b",")?;
        }
        writer.write_all(b"\n    ")?;
        serde_json::to_writer(&mut *writer, event)?;

        self.events += 1;
        Ok(())
    }

    /// Number of events written so far
    pub fn event_count(&self) -> usize {
        self.events
    }

    /// Close the document, flush, and hand back the underlying writer
    pub fn finish(mut self) -> Result<W, OutputError> {
        let writer = self.close()?.ok_or_else(closed_error)?;
        Ok(writer)
    }

    fn close(&mut self) -> io::Result<Option<W>> {
        let Some(mut writer) = self.writer.take() else {
            return Ok(None);
        };

        writer.write_all(self.layout.closing())?;
        writer.flush()?;
        Ok(Some(writer))
    }
}

impl<W: Write> Drop for JsonArrayWriter<W> {
    fn drop(&mut self) {
        if self.writer.is_some() {
            // Best effort only, the run is already failing
            let _ = self.close();
        }
    }
}

fn closed_error() -> OutputError {
    OutputError::WriteFailed(io::Error::other("trace document already closed"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_empty_array_is_valid_json() {
        let writer = JsonArrayWriter::new(Vec::new(), DocumentLayout::Array).unwrap();
        let bytes = writer.finish().unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value, json!([]));
    }

    #[test]
    fn test_trace_events_envelope() {
        let mut writer = JsonArrayWriter::new(Vec::new(), DocumentLayout::TraceEvents).unwrap();
        writer.write_event(&json!({"name": "a"})).unwrap();
        writer.write_event(&json!({"name": "b"})).unwrap();
        assert_eq!(writer.event_count(), 2);

        let bytes = writer.finish().unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value, json!({"traceEvents": [{"name": "a"}, {"name": "b"}]}));
    }

    #[test]
    fn test_one_event_per_line() {
        let mut writer = JsonArrayWriter::new(Vec::new(), DocumentLayout::Array).unwrap();
        writer.write_event(&json!({"n": 1})).unwrap();
        writer.write_event(&json!({"n": 2})).unwrap();
        let text = String::from_utf8(writer.finish().unwrap()).unwrap();
        assert_eq!(text, "[\n    {\"n\":1},\n    {\"n\":2}\n]\n");
    }

    #[test]
    fn test_drop_closes_document() {
        let mut buffer = Vec::new();
        {
            let mut writer =
                JsonArrayWriter::new(&mut buffer, DocumentLayout::TraceEvents).unwrap();
            writer.write_event(&json!({"name": "partial"})).unwrap();
        }
        let value: Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["traceEvents"][0]["name"], "partial");
    }
}
