//! Collapsed stack text output.
//!
//! Format: "parent;child;grandchild weight", one line per sample with
//! positive self value.
//!
//! Example: "PlayerLoop;Update;Physics 1250"

use crate::utils::error::OutputError;
use std::io::Write;

/// A single collapsed stack entry
#[derive(Debug, Clone, PartialEq)]
pub struct CollapsedStack {
    /// Sample names, root first
    pub path: Vec<String>,

    /// Self value attributed to the last frame of the path
    pub weight: f64,
}

impl CollapsedStack {
    pub fn new(path: Vec<String>, weight: f64) -> Self {
        Self { path, weight }
    }

    /// Stack as semicolon-separated string
    pub fn stack(&self) -> String {
        self.path.join(";")
    }

    pub fn to_line(&self) -> String {
        format_line(&self.path, self.weight)
    }
}

fn format_line(path: &[String], weight: f64) -> String {
    format!("{} {}", path.join(";"), weight)
}

/// Writes collapsed stack lines, optionally keeping them for later renderers
pub struct CollapsedWriter<W: Write> {
    writer: W,
    lines: usize,
    retained: Option<Vec<CollapsedStack>>,
}

impl<W: Write> CollapsedWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            lines: 0,
            retained: None,
        }
    }

    /// Also keep every written stack in memory (for SVG/speedscope output)
    pub fn retaining(mut self) -> Self {
        self.retained = Some(Vec::new());
        self
    }

    pub fn write_stack(&mut self, path: &[String], weight: f64) -> Result<(), OutputError> {
        writeln!(self.writer, "{}", format_line(path, weight))?;
        self.lines += 1;

        if let Some(retained) = self.retained.as_mut() {
            retained.push(CollapsedStack::new(path.to_vec(), weight));
        }

        Ok(())
    }

    pub fn line_count(&self) -> usize {
        self.lines
    }

    /// Flush and return the writer plus any retained stacks
    pub fn finish(mut self) -> Result<(W, Vec<CollapsedStack>), OutputError> {
        self.writer.flush()?;
        Ok((self.writer, self.retained.unwrap_or_default()))
    }
}
