use crate::capture::{CaptureSource, FrameSource, ThreadView};
use crate::convert::{normalize_thread_name, thread_full_name};
use crate::utils::config::FORMAT_VERSION;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::Path;

/// Validate a capture JSON file and print its shape
pub fn validate_capture_file(file_path: impl AsRef<Path>) -> Result<()> {
    let file_path = file_path.as_ref();
    println!("Validating capture: {}", file_path.display());

    let source = CaptureSource::load(file_path)
        .with_context(|| format!("Failed to load capture {}", file_path.display()))?;

    let mut threads = BTreeSet::new();
    if let Some(range) = source.frame_range() {
        for frame in range {
            for index in 0..source.thread_count(frame) {
                if let Some(view) = source.thread(frame, index) {
                    let name = normalize_thread_name(view.thread_name());
                    threads.insert((thread_full_name(name, view.group_name()), view.thread_id()));
                }
            }
        }
    }

    println!("✓ Valid capture JSON");
    match source.frame_range() {
        Some(range) => println!("  Frames: {} ({}..={})", source.frame_count(), range.start(), range.end()),
        None => println!("  Frames: 0"),
    }
    println!("  Threads: {}", threads.len());
    for (name, tid) in &threads {
        println!("    {} (tid {})", name, tid);
    }
    println!("  Thread samples: {}", source.thread_sample_count());
    println!("  Merged nodes: {}", source.node_count());

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("Profile Trace Convert v{}", env!("CARGO_PKG_VERSION"));
    println!("Output Format: v{}", FORMAT_VERSION);
    println!();
    println!("Flattens profiler sample trees into trace events and flamegraph stacks.");
}
