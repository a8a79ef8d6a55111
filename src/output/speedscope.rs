//! Speedscope "sampled" profile export.
//!
//! Each collapsed stack becomes one sample whose weight is the stack's
//! self value. Frame names are interned into the shared frame table in
//! first-seen order.

use super::collapsed::CollapsedStack;
use crate::capture::MetricKind;
use crate::utils::error::OutputError;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

const SPEEDSCOPE_SCHEMA: &str = "https://www.speedscope.app/file-format-schema.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Speedscope {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub profiles: Vec<SampledProfile>,
    pub shared: Shared,
    pub name: String,
    pub exporter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shared {
    pub frames: Vec<SpeedscopeFrame>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedscopeFrame {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampledProfile {
    pub r#type: String,
    pub name: String,
    pub unit: String,
    #[serde(rename = "startValue")]
    pub start_value: f64,
    #[serde(rename = "endValue")]
    pub end_value: f64,
    pub samples: Vec<Vec<usize>>,
    pub weights: Vec<f64>,
}

/// Build a speedscope document from collapsed stacks
pub fn build_speedscope(stacks: &[CollapsedStack], metric: MetricKind, name: &str) -> Speedscope {
    let mut frames: Vec<SpeedscopeFrame> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut samples = Vec::with_capacity(stacks.len());
    let mut weights = Vec::with_capacity(stacks.len());

    for stack in stacks {
        let sample: Vec<usize> = stack
            .path
            .iter()
            .map(|frame| {
                *index.entry(frame.as_str()).or_insert_with(|| {
                    frames.push(SpeedscopeFrame {
                        name: frame.clone(),
                    });
                    frames.len() - 1
                })
            })
            .collect();
        samples.push(sample);
        weights.push(stack.weight);
    }

    let end_value: f64 = weights.iter().sum();

    Speedscope {
        schema: SPEEDSCOPE_SCHEMA.to_string(),
        profiles: vec![SampledProfile {
            r#type: "sampled".to_string(),
            name: format!("{} ({})", name, metric),
            unit: metric.unit().to_string(),
            start_value: 0.0,
            end_value,
            samples,
            weights,
        }],
        shared: Shared { frames },
        name: name.to_string(),
        exporter: format!("profile-trace-convert@{}", env!("CARGO_PKG_VERSION")),
    }
}

/// Write a speedscope document to a JSON file
pub fn write_speedscope(doc: &Speedscope, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing speedscope profile to: {}", output_path.display());

    let writer = super::sinks::create_output_file(output_path)?;
    serde_json::to_writer_pretty(writer, doc).map_err(OutputError::SerializationFailed)?;

    Ok(())
}
