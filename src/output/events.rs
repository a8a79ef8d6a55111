//! Trace event records shared by both JSON encoders.
//!
//! Field order follows what trace viewers emit themselves, so diffs against
//! hand-written traces stay readable.

use crate::utils::config::{METADATA_CATEGORY, THREAD_NAME_EVENT, TRACE_PID};
use serde::{Deserialize, Serialize};

/// Event phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Complete event: begin and duration in one record
    #[serde(rename = "X")]
    Complete,
    /// Metadata event
    #[serde(rename = "M")]
    Metadata,
}

/// A flattened sample: one `ph = "X"` span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanEvent {
    pub name: String,
    /// Parent sample name, or the root category for top-level samples
    pub cat: String,
    pub ts: f64,
    pub dur: f64,
    pub ph: Phase,
    pub pid: u32,
    pub tid: u64,
    pub args: SpanArgs,
}

/// Span metadata, kept as strings like profiler exports do
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanArgs {
    #[serde(rename = "Frame")]
    pub frame: String,
    #[serde(rename = "Value")]
    pub value: String,
}

/// One-time record naming a thread's timeline track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadNameEvent {
    pub args: ThreadNameArgs,
    pub cat: String,
    pub name: String,
    pub ph: Phase,
    pub pid: u32,
    pub tid: u64,
    pub ts: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadNameArgs {
    pub name: String,
}

/// Any record found in an encoded trace document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TraceEvent {
    Span(SpanEvent),
    ThreadName(ThreadNameEvent),
}

impl SpanEvent {
    pub fn new(
        name: impl Into<String>,
        cat: impl Into<String>,
        ts: f64,
        dur: f64,
        tid: u64,
        frame: u64,
    ) -> Self {
        Self {
            name: name.into(),
            cat: cat.into(),
            ts,
            dur,
            ph: Phase::Complete,
            pid: TRACE_PID,
            tid,
            args: SpanArgs {
                frame: frame.to_string(),
                value: dur.to_string(),
            },
        }
    }
}

impl ThreadNameEvent {
    pub fn new(thread_full_name: impl Into<String>, tid: u64) -> Self {
        Self {
            args: ThreadNameArgs {
                name: thread_full_name.into(),
            },
            cat: METADATA_CATEGORY.to_string(),
            name: THREAD_NAME_EVENT.to_string(),
            ph: Phase::Metadata,
            pid: TRACE_PID,
            tid,
            ts: 0,
        }
    }
}

impl TraceEvent {
    pub fn as_span(&self) -> Option<&SpanEvent> {
        match self {
            TraceEvent::Span(span) => Some(span),
            TraceEvent::ThreadName(_) => None,
        }
    }

    pub fn as_thread_name(&self) -> Option<&ThreadNameEvent> {
        match self {
            TraceEvent::ThreadName(meta) => Some(meta),
            TraceEvent::Span(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_span_shape() {
        let span = SpanEvent::new("Update", "Root", 0.0, 40000.0, 12, 1);
        let value = serde_json::to_value(&span).unwrap();
        assert_eq!(value["ph"], "X");
        assert_eq!(value["pid"], 0);
        assert_eq!(value["tid"], 12);
        assert_eq!(value["args"], json!({"Frame": "1", "Value": "40000"}));
    }

    #[test]
    fn test_thread_name_shape() {
        let meta = ThreadNameEvent::new("Job.Worker 0", 44);
        let value = serde_json::to_value(&meta).unwrap();
        assert_eq!(
            value,
            json!({
                "args": {"name": "Job.Worker 0"},
                "cat": "__metadata",
                "name": "thread_name",
                "ph": "M",
                "pid": 0,
                "tid": 44,
                "ts": 0
            })
        );
    }

    #[test]
    fn test_untagged_events_read_back() {
        let events: Vec<TraceEvent> = serde_json::from_value(json!([
            {"args": {"name": "Main"}, "cat": "__metadata", "name": "thread_name",
             "ph": "M", "pid": 0, "tid": 1, "ts": 0},
            {"name": "A", "cat": "Root", "ts": 0.0, "dur": 5.0, "ph": "X",
             "pid": 0, "tid": 1, "args": {"Frame": "1", "Value": "5"}}
        ]))
        .unwrap();

        assert!(events[0].as_thread_name().is_some());
        assert_eq!(events[1].as_span().unwrap().name, "A");
    }

    #[test]
    fn test_names_are_escaped() {
        let span = SpanEvent::new("say \"hi\"\n", "Root", 0.0, 1.0, 1, 1);
        let encoded = serde_json::to_string(&span).unwrap();
        let decoded: SpanEvent = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.name, "say \"hi\"\n");
    }
}
