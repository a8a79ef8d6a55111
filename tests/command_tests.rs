use pretty_assertions::assert_eq;
use profile_trace_convert::capture::MetricKind;
use profile_trace_convert::commands::{execute_convert, validate_args, validate_capture_file, ConvertArgs};
use profile_trace_convert::output::{OutputSet, TraceEvent};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

const CAPTURE: &str = r#"{
  "frames": [
    {
      "index": 1,
      "frame_time_ms": 100.0,
      "threads": [
        {
          "name": "Main Thread",
          "group": "",
          "thread_id": 1,
          "root": {
            "name": "PlayerLoop",
            "calls": 1,
            "gc_memory": 512,
            "total_time": 100.0,
            "children": [
              { "name": "Update \"Scripts\"", "calls": 4, "gc_memory": 256, "total_time": 40.0 },
              { "name": "EditorLoop", "calls": 1, "gc_memory": 0, "total_time": 10.0 }
            ]
          }
        }
      ]
    },
    {
      "index": 2,
      "frame_time_ms": 50.0,
      "threads": [
        {
          "name": "Main Thread",
          "thread_id": 1,
          "root": { "name": "PlayerLoop", "calls": 1, "total_time": 50.0 }
        }
      ]
    }
  ]
}"#;

fn write_capture(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("capture.json");
    fs::write(&path, contents).unwrap();
    path
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_convert_writes_three_documents() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = write_capture(temp_dir.path(), CAPTURE);

    let reports = execute_convert(ConvertArgs {
        input,
        ..Default::default()
    })
    .unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].spans, 3);

    let outputs = OutputSet::new(temp_dir.path().join("capture"), MetricKind::ElapsedTime);

    let trace = read_json(&outputs.trace);
    let perfetto = read_json(&outputs.perfetto);
    assert_eq!(trace, perfetto["traceEvents"]);

    let events: Vec<TraceEvent> = serde_json::from_value(trace.clone()).unwrap();
    assert_eq!(events.len(), 4);
    assert_eq!(
        trace[0],
        json!({
            "args": {"name": "Main Thread"},
            "cat": "__metadata",
            "name": "thread_name",
            "ph": "M",
            "pid": 0,
            "tid": 1,
            "ts": 0
        })
    );
    assert_eq!(trace[2]["name"], "Update_\"Scripts\"");
    assert_eq!(trace[2]["cat"], "PlayerLoop");
    assert_eq!(trace[3]["ts"], 100000.0);
    assert_eq!(trace[3]["args"]["Frame"], "2");

    let text = fs::read_to_string(&outputs.instrument).unwrap();
    assert_eq!(
        text,
        "PlayerLoop;Update_\"Scripts\" 40000\nPlayerLoop 60000\nPlayerLoop 50000\n"
    );
}

#[test]
fn test_one_output_set_per_metric() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = write_capture(temp_dir.path(), CAPTURE);
    let base = temp_dir.path().join("out/run");

    let reports = execute_convert(ConvertArgs {
        input,
        output_base: Some(base.clone()),
        metrics: vec![MetricKind::CallCount, MetricKind::AllocatedBytes],
        ..Default::default()
    })
    .unwrap();
    assert_eq!(reports.len(), 2);

    let calls = OutputSet::new(&base, MetricKind::CallCount);
    let bytes = OutputSet::new(&base, MetricKind::AllocatedBytes);

    assert_eq!(
        fs::read_to_string(&calls.instrument).unwrap(),
        "PlayerLoop;Update_\"Scripts\" 4\nPlayerLoop 1\n"
    );
    assert_eq!(
        fs::read_to_string(&bytes.instrument).unwrap(),
        "PlayerLoop;Update_\"Scripts\" 256\nPlayerLoop 256\n"
    );
    assert!(!OutputSet::new(&base, MetricKind::ElapsedTime).trace.exists());
}

#[test]
fn test_frame_limit_and_no_exclusions() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = write_capture(temp_dir.path(), CAPTURE);

    execute_convert(ConvertArgs {
        input,
        max_frames: Some(1),
        exclude_markers: Vec::new(),
        ..Default::default()
    })
    .unwrap();

    let outputs = OutputSet::new(temp_dir.path().join("capture"), MetricKind::ElapsedTime);
    assert_eq!(
        fs::read_to_string(&outputs.instrument).unwrap(),
        "PlayerLoop;Update_\"Scripts\" 40000\nPlayerLoop;EditorLoop 10000\nPlayerLoop 50000\n"
    );
}

#[test]
fn test_empty_capture_gives_well_formed_outputs() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = write_capture(temp_dir.path(), r#"{"frames": []}"#);

    execute_convert(ConvertArgs {
        input,
        ..Default::default()
    })
    .unwrap();

    let outputs = OutputSet::new(temp_dir.path().join("capture"), MetricKind::ElapsedTime);
    assert_eq!(read_json(&outputs.trace), json!([]));
    assert_eq!(read_json(&outputs.perfetto), json!({"traceEvents": []}));
    assert_eq!(fs::read_to_string(&outputs.instrument).unwrap(), "");
}

#[test]
fn test_existing_outputs_are_truncated() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = write_capture(temp_dir.path(), r#"{"frames": []}"#);
    let outputs = OutputSet::new(temp_dir.path().join("capture"), MetricKind::ElapsedTime);
    fs::write(&outputs.instrument, "stale line 1\n").unwrap();

    execute_convert(ConvertArgs {
        input,
        ..Default::default()
    })
    .unwrap();

    assert_eq!(fs::read_to_string(&outputs.instrument).unwrap(), "");
}

#[test]
fn test_speedscope_and_flamegraph_outputs() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = write_capture(temp_dir.path(), CAPTURE);

    let reports = execute_convert(ConvertArgs {
        input,
        speedscope: true,
        flamegraph: true,
        title: Some("Level 1".to_string()),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(reports[0].written.len(), 5);

    let outputs = OutputSet::new(temp_dir.path().join("capture"), MetricKind::ElapsedTime);
    let speedscope = read_json(&outputs.speedscope);
    assert_eq!(speedscope["profiles"][0]["weights"], json!([40000.0, 60000.0, 50000.0]));
    assert_eq!(speedscope["shared"]["frames"][0]["name"], "PlayerLoop");

    let svg = fs::read_to_string(&outputs.svg).unwrap();
    assert!(svg.contains("Level 1"));
}

#[test]
fn test_malformed_capture_is_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = write_capture(temp_dir.path(), "{ not json");

    let result = execute_convert(ConvertArgs {
        input: input.clone(),
        ..Default::default()
    });
    assert!(result.is_err());
    assert!(validate_capture_file(&input).is_err());
}

#[test]
fn test_validate_capture_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = write_capture(temp_dir.path(), CAPTURE);
    assert!(validate_capture_file(&input).is_ok());
}

#[test]
fn test_validate_args_valid() {
    let args = ConvertArgs {
        input: PathBuf::from("capture.json"),
        max_frames: Some(7),
        ..Default::default()
    };

    assert!(validate_args(&args).is_ok());
}

#[test]
fn test_validate_args_empty_output_base() {
    let args = ConvertArgs {
        input: PathBuf::from("capture.json"),
        output_base: Some(PathBuf::new()),
        ..Default::default()
    };

    assert!(validate_args(&args).is_err());
}

#[test]
fn test_flamegraph_skipped_when_metric_has_no_stacks() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = write_capture(
        temp_dir.path(),
        r#"{"frames": [{"index": 0, "threads": [{"name": "Main", "thread_id": 1,
            "root": {"name": "Loop", "calls": 1, "gc_memory": 0, "total_time": 2.0}}]}]}"#,
    );

    let reports = execute_convert(ConvertArgs {
        input,
        metrics: vec![MetricKind::AllocatedBytes, MetricKind::ElapsedTime],
        flamegraph: true,
        ..Default::default()
    })
    .unwrap();
    assert_eq!(reports.len(), 2);

    let base = temp_dir.path().join("capture");
    let bytes = OutputSet::new(&base, MetricKind::AllocatedBytes);
    assert_eq!(read_json(&bytes.trace), json!([{
        "args": {"name": "Main"},
        "cat": "__metadata",
        "name": "thread_name",
        "ph": "M",
        "pid": 0,
        "tid": 1,
        "ts": 0
    }]));
    assert!(!bytes.svg.exists());
    assert_eq!(reports[0].written.len(), 3);

    let elapsed = OutputSet::new(&base, MetricKind::ElapsedTime);
    assert_eq!(fs::read_to_string(&elapsed.instrument).unwrap(), "Loop 2000\n");
    assert!(elapsed.svg.exists());
    assert_eq!(reports[1].written.len(), 4);
}

#[test]
fn test_flamegraph_on_empty_capture_does_not_fail() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = write_capture(temp_dir.path(), r#"{"frames": []}"#);

    let reports = execute_convert(ConvertArgs {
        input,
        flamegraph: true,
        ..Default::default()
    })
    .unwrap();

    let outputs = OutputSet::new(temp_dir.path().join("capture"), MetricKind::ElapsedTime);
    assert_eq!(read_json(&outputs.trace), json!([]));
    assert!(!outputs.svg.exists());
    assert_eq!(reports[0].written.len(), 3);
}

#[test]
fn test_flamegraph_width_applied() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = write_capture(temp_dir.path(), CAPTURE);

    execute_convert(ConvertArgs {
        input,
        flamegraph: true,
        width: Some(640),
        ..Default::default()
    })
    .unwrap();

    let outputs = OutputSet::new(temp_dir.path().join("capture"), MetricKind::ElapsedTime);
    let svg = fs::read_to_string(&outputs.svg).unwrap();
    assert!(svg.contains("width=\"640\""));
}

#[test]
fn test_validate_args_zero_width() {
    let args = ConvertArgs {
        input: PathBuf::from("capture.json"),
        width: Some(0),
        ..Default::default()
    };

    assert!(validate_args(&args).is_err());
}
