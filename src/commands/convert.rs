//! Convert command implementation.
//!
//! The convert command:
//! 1. Loads the capture
//! 2. Opens the trace, perfetto and instrument outputs for each metric
//! 3. Flattens every frame into them
//! 4. Optionally renders a flamegraph and a speedscope profile

use super::models::{ConvertArgs, RunReport};
use crate::capture::{CaptureSource, MetricKind};
use crate::convert::convert_frames;
use crate::flamegraph::{generate_flamegraph, generate_text_summary, FlamegraphConfig};
use crate::output::{build_speedscope, write_speedscope, write_svg, OutputSet, TraceSinks};
use crate::utils::config::ConvertConfig;
use crate::utils::error::FlamegraphError;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::time::Instant;

/// Execute the convert command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// One report per metric, in the order requested
///
/// # Errors
/// * Capture cannot be loaded (nothing is written)
/// * Any output file cannot be created or written
pub fn execute_convert(args: ConvertArgs) -> Result<Vec<RunReport>> {
    let start_time = Instant::now();

    info!("Loading capture: {}", args.input.display());
    let source = CaptureSource::load(&args.input)
        .with_context(|| format!("Failed to load capture {}", args.input.display()))?;

    let mut reports = Vec::with_capacity(args.metrics.len());
    for &metric in &args.metrics {
        reports.push(convert_metric(&args, &source, metric)?);
    }

    info!(
        "Conversion completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(reports)
}

/// Run one conversion and write one output set
///
/// **Private** - internal helper for execute_convert
fn convert_metric(args: &ConvertArgs, source: &CaptureSource, metric: MetricKind) -> Result<RunReport> {
    let outputs = OutputSet::new(args.output_base(), metric);
    let config = ConvertConfig::new(metric)
        .with_max_frames(args.max_frames)
        .with_exclude_markers(args.exclude_markers.clone());

    info!("Writing {} outputs", metric);
    debug!("Output set: {:?}", outputs);

    let mut sinks = TraceSinks::create(&outputs).context("Failed to open output files")?;
    if args.retains_stacks() {
        sinks = sinks.retaining_stacks();
    }

    let summary = convert_frames(source, &config, &mut sinks)
        .with_context(|| format!("Failed to convert {} samples", metric))?;
    let written = sinks.finish().context("Failed to finalize output files")?;

    info!("✓ Trace events written to: {}", outputs.trace.display());
    info!("✓ Perfetto trace written to: {}", outputs.perfetto.display());
    info!("✓ Collapsed stacks written to: {}", outputs.instrument.display());

    let mut report = RunReport {
        metric,
        written: vec![
            outputs.trace.clone(),
            outputs.perfetto.clone(),
            outputs.instrument.clone(),
        ],
        spans: summary.spans,
        stacks: written.stack_lines,
    };

    if args.speedscope {
        let name = display_name(args);
        let doc = build_speedscope(&written.stacks, metric, &name);
        write_speedscope(&doc, &outputs.speedscope).context("Failed to write speedscope profile")?;
        report.written.push(outputs.speedscope.clone());
    }

    if args.flamegraph {
        let title = args
            .title
            .clone()
            .unwrap_or_else(|| format!("{} ({})", display_name(args), metric));
        let mut config = FlamegraphConfig::new().with_title(title).with_metric(metric);
        if let Some(width) = args.width {
            config = config.with_width(width);
        }

        match generate_flamegraph(&written.stacks, Some(&config)) {
            Ok(svg) => {
                write_svg(&svg, &outputs.svg).context("Failed to write flamegraph SVG")?;
                info!("✓ Flamegraph written to: {}", outputs.svg.display());
                report.written.push(outputs.svg.clone());
            }
            Err(FlamegraphError::EmptyStacks) => {
                warn!("No {} stacks to draw, skipping flamegraph", metric);
            }
            Err(e) => return Err(e).context("Failed to generate flamegraph"),
        }
    }

    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("CONVERSION SUMMARY ({})", metric);
        println!("{}", "=".repeat(80));
        println!("{}", summary.summary());
        println!("\n{}", generate_text_summary(&written.stacks, 10));
        println!("{}", "=".repeat(80));
    }

    Ok(report)
}

fn display_name(args: &ConvertArgs) -> String {
    args.input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "capture".to_string())
}

/// Validate convert arguments
///
/// **Public** - can be called before execute_convert for early validation
pub fn validate_args(args: &ConvertArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input capture path cannot be empty");
    }

    if args.metrics.is_empty() {
        anyhow::bail!("At least one metric must be selected");
    }

    let mut seen = Vec::with_capacity(args.metrics.len());
    for metric in &args.metrics {
        if seen.contains(metric) {
            anyhow::bail!("Metric {} selected more than once", metric);
        }
        seen.push(*metric);
    }

    if args.max_frames == Some(0) {
        anyhow::bail!("max_frames must be greater than 0");
    }

    if args.exclude_markers.iter().any(|m| m.trim().is_empty()) {
        anyhow::bail!("Exclude markers cannot be blank");
    }

    if args.width == Some(0) {
        anyhow::bail!("Flamegraph width must be greater than 0");
    }

    if let Some(base) = &args.output_base {
        if base.as_os_str().is_empty() {
            anyhow::bail!("Output base path cannot be empty");
        }
    }

    Ok(())
}
