//! Profile Trace Convert
//!
//! Flattens per-frame, per-thread profiler sample trees into flat,
//! timestamped trace events for generic trace viewers, plus collapsed
//! stack text for flamegraph tools.
//!
//! This crate provides the core implementation for the
//! `profile-trace` CLI tool.
//!
//! ## Getting Started
//!
//! ```bash
//! profile-trace convert --input capture.json --metric elapsed-time
//! ```
//!
//! Writes `capture_ElapsedTime.trace.json`,
//! `capture_ElapsedTime.perfetto.json` and
//! `capture_ElapsedTime.instrument.txt` next to the capture.

pub mod capture;
pub mod commands;
pub mod convert;
pub mod flamegraph;
pub mod output;
pub mod utils;
