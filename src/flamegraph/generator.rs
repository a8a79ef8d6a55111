//! SVG flamegraph generation using inferno.
//!
//! Collapsed stacks already carry self values, so they are handed to
//! inferno as-is. Weights are rounded to whole units since inferno counts
//! samples as integers.

use crate::capture::MetricKind;
use crate::output::CollapsedStack;
use crate::utils::error::FlamegraphError;
use log::{debug, info};

/// Flamegraph configuration
#[derive(Debug, Clone)]
pub struct FlamegraphConfig {
    pub title: String,
    pub count_name: String,
    pub width: Option<usize>,
}

impl Default for FlamegraphConfig {
    fn default() -> Self {
        Self {
            title: "Profile Capture".to_string(),
            count_name: "samples".to_string(),
            width: None,
        }
    }
}

impl FlamegraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Name the sample counter after the metric's unit
    pub fn with_metric(mut self, metric: MetricKind) -> Self {
        self.count_name = metric.count_name().to_string();
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }
}

/// Generate SVG flamegraph from collapsed stacks
///
/// # Errors
/// * `FlamegraphError::EmptyStacks` - nothing with a positive weight to draw
/// * `FlamegraphError::RenderFailed` - inferno failed to render
pub fn generate_flamegraph(
    stacks: &[CollapsedStack],
    config: Option<&FlamegraphConfig>,
) -> Result<String, FlamegraphError> {
    let config = config.cloned().unwrap_or_default();

    let lines: Vec<String> = stacks
        .iter()
        .filter_map(|stack| {
            let weight = stack.weight.round();
            (weight >= 1.0).then(|| format!("{} {}", stack.stack(), weight as u64))
        })
        .collect();

    if lines.is_empty() {
        return Err(FlamegraphError::EmptyStacks);
    }

    info!("Generating flamegraph with {} stacks", lines.len());
    debug!(
        "Dropped {} stacks below one {}",
        stacks.len() - lines.len(),
        config.count_name
    );

    let mut options = inferno::flamegraph::Options::default();
    options.title = config.title.clone();
    options.count_name = config.count_name.clone();
    if let Some(width) = config.width {
        options.image_width = Some(width);
    }

    let mut svg = Vec::new();
    inferno::flamegraph::from_lines(&mut options, lines.iter().map(String::as_str), &mut svg)
        .map_err(|e| FlamegraphError::RenderFailed(e.to_string()))?;

    Ok(String::from_utf8_lossy(&svg).into_owned())
}

/// Generate a text summary of the heaviest stacks
///
/// **Public** - useful for CLI output
pub fn generate_text_summary(stacks: &[CollapsedStack], top_n: usize) -> String {
    let mut sorted: Vec<&CollapsedStack> = stacks.iter().collect();
    sorted.sort_by(|a, b| b.weight.total_cmp(&a.weight));

    let total: f64 = stacks.iter().map(|s| s.weight).sum();

    let mut summary = format!("Top {} stacks by self value:\n", top_n.min(sorted.len()));
    for (rank, stack) in sorted.iter().take(top_n).enumerate() {
        let percentage = if total > 0.0 {
            stack.weight / total * 100.0
        } else {
            0.0
        };
        summary.push_str(&format!(
            "{:>3}. {:>12} ({:>5.1}%)  {}\n",
            rank + 1,
            stack.weight,
            percentage,
            stack.stack()
        ));
    }

    summary
}
