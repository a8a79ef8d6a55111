//! Frame-by-frame conversion driver.
//!
//! Walks frames in index order and threads in source order, naming each
//! thread once and laying successive frames of a thread back to back.

use super::flatten::{flatten, FlattenState, ThreadScope};
use super::registry::{normalize_thread_name, thread_full_name, ThreadRegistry};
use crate::capture::{FrameSource, ThreadView};
use crate::output::{EventSink, ThreadNameEvent};
use crate::utils::config::{ConvertConfig, ROOT_CATEGORY};
use crate::utils::error::OutputError;
use log::{debug, info, warn};

/// Counters describing one conversion run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    /// First and last frame actually processed
    pub frames: Option<(u64, u64)>,
    pub frames_processed: usize,
    /// Frames left out by the `max_frames` cap
    pub frames_skipped: u64,
    /// Thread sample trees visited (frames x threads)
    pub thread_samples: usize,
    pub threads_registered: usize,
    pub spans: usize,
    pub stacks: usize,
    pub excluded: usize,
    pub max_depth: usize,
    pub pool_acquires: usize,
    pub pool_releases: usize,
    pub pool_buffers: usize,
}

impl ConversionSummary {
    /// Get human-readable summary
    pub fn summary(&self) -> String {
        let frames = match self.frames {
            Some((first, last)) => format!("{}..={}", first, last),
            None => "none".to_string(),
        };
        format!(
            "Frames: {} ({} processed) | Threads: {} | Spans: {} | Stacks: {} | Excluded: {} | Max depth: {}",
            frames,
            self.frames_processed,
            self.threads_registered,
            self.spans,
            self.stacks,
            self.excluded,
            self.max_depth
        )
    }
}

/// Convert every frame of `source` into events on `sink`
///
/// **Public** - main entry point of the conversion core
///
/// # Returns
/// Run counters. A source with no frames or no threads yields an empty
/// summary and leaves the sink untouched.
///
/// # Errors
/// * `OutputError` - any sink write failure aborts the run
pub fn convert_frames<S: FrameSource, K: EventSink>(
    source: &S,
    config: &ConvertConfig,
    sink: &mut K,
) -> Result<ConversionSummary, OutputError> {
    let mut summary = ConversionSummary::default();

    let Some(range) = source.frame_range() else {
        info!("Capture holds no frames, outputs will be empty");
        return Ok(summary);
    };
    let (first, last) = (*range.start(), *range.end());

    info!(
        "Converting frames {}..={} ({} metric)",
        first, last, config.metric
    );

    let mut registry = ThreadRegistry::new();
    let mut state = FlattenState::new();

    for frame in first..=last {
        if config
            .max_frames
            .is_some_and(|max| summary.frames_processed >= max)
        {
            summary.frames_skipped = last - frame + 1;
            warn!(
                "Frame limit of {} reached, skipping frames {}..={}",
                summary.frames_processed, frame, last
            );
            break;
        }

        let thread_count = source.thread_count(frame);
        debug!(
            "Frame {}: {} threads, {:.3} ms",
            frame,
            thread_count,
            source.frame_time_ms(frame)
        );

        for thread_index in 0..thread_count {
            let Some(view) = source.thread(frame, thread_index) else {
                continue;
            };

            let thread_name = normalize_thread_name(view.thread_name());
            let full_name = thread_full_name(thread_name, view.group_name());
            let thread_id = view.thread_id();

            let start_time = registry.cursor(&full_name);
            if registry.ensure_registered(&full_name, thread_id) {
                debug!("Registered thread {} (tid {})", full_name, thread_id);
                sink.thread_name(&ThreadNameEvent::new(full_name.as_str(), thread_id))?;
            }

            let scope = ThreadScope {
                view,
                thread_name,
                thread_id,
                frame_index: frame,
                config,
            };
            let consumed = flatten(
                &scope,
                &mut state,
                sink,
                view.root_id(),
                start_time,
                ROOT_CATEGORY,
            )?;
            registry.advance(&full_name, consumed);

            summary.thread_samples += 1;
        }

        summary.frames = Some((first, frame));
        summary.frames_processed += 1;
    }

    summary.threads_registered = registry.registered_count();
    summary.spans = state.spans;
    summary.stacks = state.stacks;
    summary.excluded = state.excluded;
    summary.max_depth = state.path.max_depth();
    summary.pool_acquires = state.pool.acquire_count();
    summary.pool_releases = state.pool.release_count();
    summary.pool_buffers = state.pool.drain();

    debug!(
        "Pool: {} acquires, {} releases, {} buffers drained",
        summary.pool_acquires, summary.pool_releases, summary.pool_buffers
    );
    info!("{}", summary.summary());

    Ok(summary)
}
