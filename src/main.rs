//! Profile Trace Convert CLI
//!
//! Converts profiler captures into trace-event JSON, perfetto JSON and
//! collapsed flamegraph stacks.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use profile_trace_convert::capture::MetricKind;
use profile_trace_convert::commands::{
    display_version, execute_convert, validate_args, validate_capture_file, ConvertArgs,
};
use profile_trace_convert::utils::config::DEFAULT_EXCLUDE_MARKERS;

/// Profile Trace Convert - profiler captures to trace viewers
#[derive(Parser, Debug)]
#[command(name = "profile-trace")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a capture into trace and flamegraph outputs
    Convert {
        /// Capture JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Output base path (defaults to the input path without extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Metric to extract; repeat for one output set per metric
        #[arg(short, long, value_enum, default_values_t = [MetricKind::ElapsedTime])]
        metric: Vec<MetricKind>,

        /// Stop after this many frames
        #[arg(long, env = "PROFILE_TRACE_MAX_FRAMES")]
        max_frames: Option<usize>,

        /// Drop samples whose name contains this marker; repeatable
        #[arg(long = "exclude", default_values_t = DEFAULT_EXCLUDE_MARKERS.iter().map(|m| m.to_string()))]
        exclude: Vec<String>,

        /// Keep every sample, including ones matching the exclude markers
        #[arg(long, conflicts_with = "exclude")]
        no_exclude: bool,

        /// Also render an SVG flamegraph per metric
        #[arg(long)]
        flamegraph: bool,

        /// Flamegraph title
        #[arg(long)]
        title: Option<String>,

        /// Flamegraph image width in pixels
        #[arg(long)]
        width: Option<usize>,

        /// Also write a speedscope profile per metric
        #[arg(long)]
        speedscope: bool,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a capture JSON file
    Validate {
        /// Path to capture JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Convert {
            input,
            output,
            metric,
            max_frames,
            exclude,
            no_exclude,
            flamegraph,
            title,
            width,
            speedscope,
            summary,
        } => {
            let args = ConvertArgs {
                input,
                output_base: output,
                metrics: metric,
                max_frames,
                exclude_markers: if no_exclude { Vec::new() } else { exclude },
                flamegraph,
                title,
                width,
                speedscope,
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            execute_convert(args)?;
        }

        Commands::Validate { file } => {
            validate_capture_file(file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
