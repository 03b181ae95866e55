//! Debug drawing and log output for gameplay events.
//!
//! The attack resolver reports each outcome as a debug line plus a short log
//! line. [`Presentation`] is the seam; [`DebugDraw`] records both so hosts
//! can render them and tests can inspect them, and mirrors log lines to
//! `tracing`.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// RGBA colour, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Color {
    /// Opaque green.
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    /// Opaque red.
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Opaque colour from components.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// A debug line segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DebugLine {
    /// Segment start
    pub start: Vec3,
    /// Segment end
    pub end: Vec3,
    /// Line colour
    pub color: Color,
}

/// Sink for debug geometry and log lines.
pub trait Presentation {
    /// Draw a debug line segment.
    fn draw_debug_line(&mut self, start: Vec3, end: Vec3, color: Color);

    /// Emit one line of log text.
    fn log_line(&mut self, line: &str);
}

/// Recording [`Presentation`] that keeps lines and log text until cleared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebugDraw {
    lines: Vec<DebugLine>,
    log: Vec<String>,
}

impl DebugDraw {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines drawn so far.
    #[must_use]
    pub fn lines(&self) -> &[DebugLine] {
        &self.lines
    }

    /// Log lines emitted so far.
    #[must_use]
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Take the recorded lines, leaving the buffer empty.
    pub fn take_lines(&mut self) -> Vec<DebugLine> {
        std::mem::take(&mut self.lines)
    }

    /// Take the recorded log, leaving it empty.
    pub fn take_log(&mut self) -> Vec<String> {
        std::mem::take(&mut self.log)
    }

    /// Forget everything recorded.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.log.clear();
    }
}

impl Presentation for DebugDraw {
    fn draw_debug_line(&mut self, start: Vec3, end: Vec3, color: Color) {
        self.lines.push(DebugLine { start, end, color });
    }

    fn log_line(&mut self, line: &str) {
        tracing::info!(target: "twinblast::presentation", "{line}");
        self.log.push(line.to_string());
    }
}
