//! On-disk JSON schema for profile captures.
//!
//! A capture is a list of frames, each holding one sample tree per thread.
//! Numeric sample fields are read leniently: anything that is not a JSON
//! number loads as NaN and is skipped later by the flattener.

use serde::{Deserialize, Deserializer, Serialize};

/// Top-level capture document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Capture {
    #[serde(default)]
    pub frames: Vec<FrameRecord>,
}

/// One captured frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Frame index, contiguous across the capture
    pub index: u64,

    /// Overall frame duration
    #[serde(default)]
    pub frame_time_ms: f64,

    #[serde(default)]
    pub threads: Vec<ThreadRecord>,
}

/// One thread's samples within a frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadRecord {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub group: String,

    #[serde(default)]
    pub thread_id: u64,

    pub root: SampleRecord,
}

/// A recorded sample and its callees
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SampleRecord {
    #[serde(default)]
    pub name: String,

    #[serde(default, deserialize_with = "lenient_number")]
    pub calls: f64,

    #[serde(default, deserialize_with = "lenient_number")]
    pub gc_memory: f64,

    /// Inclusive time in milliseconds
    #[serde(default, deserialize_with = "lenient_number")]
    pub total_time: f64,

    #[serde(default)]
    pub children: Vec<SampleRecord>,
}

impl Capture {
    pub fn new(frames: Vec<FrameRecord>) -> Self {
        Self { frames }
    }
}

impl FrameRecord {
    pub fn new(index: u64, threads: Vec<ThreadRecord>) -> Self {
        Self {
            index,
            frame_time_ms: 0.0,
            threads,
        }
    }

    pub fn with_frame_time(mut self, frame_time_ms: f64) -> Self {
        self.frame_time_ms = frame_time_ms;
        self
    }
}

impl ThreadRecord {
    pub fn new(name: impl Into<String>, thread_id: u64, root: SampleRecord) -> Self {
        Self {
            name: name.into(),
            group: String::new(),
            thread_id,
            root,
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }
}

impl SampleRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_calls(mut self, calls: f64) -> Self {
        self.calls = calls;
        self
    }

    pub fn with_gc_memory(mut self, bytes: f64) -> Self {
        self.gc_memory = bytes;
        self
    }

    pub fn with_total_time(mut self, ms: f64) -> Self {
        self.total_time = ms;
        self
    }

    pub fn with_children(mut self, children: Vec<SampleRecord>) -> Self {
        self.children = children;
        self
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64().unwrap_or(f64::NAN))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default() {
        let sample: SampleRecord = serde_json::from_str(r#"{"name": "Update"}"#).unwrap();
        assert_eq!(sample.name, "Update");
        assert_eq!(sample.calls, 0.0);
        assert_eq!(sample.total_time, 0.0);
        assert!(sample.children.is_empty());
    }

    #[test]
    fn test_non_numeric_value_loads_as_nan() {
        let sample: SampleRecord =
            serde_json::from_str(r#"{"name": "Bad", "total_time": "n/a", "calls": null}"#)
                .unwrap();
        assert!(sample.total_time.is_nan());
        assert!(sample.calls.is_nan());
    }

    #[test]
    fn test_thread_group_defaults_to_empty() {
        let thread: ThreadRecord =
            serde_json::from_str(r#"{"name": "Main", "thread_id": 7, "root": {"name": "r"}}"#)
                .unwrap();
        assert_eq!(thread.group, "");
        assert_eq!(thread.thread_id, 7);
    }
}
