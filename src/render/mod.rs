//! Drawing-surface contract
//!
//! The simulation never touches a concrete canvas; it draws through this
//! trait and needs exactly four primitives. Frame sources are opaque: a
//! `src` rectangle indexes the host's sprite atlas, and the surface scales
//! it into the destination rectangle in world coordinates. The host applies
//! any camera transform.

use crate::sim::Rect;

/// A 2D drawing surface the world renders into once per tick.
pub trait Surface {
    /// Clear a rectangular region
    fn clear(&mut self, region: Rect);
    /// Draw a sub-rectangle of the sprite atlas scaled into `dest`
    fn draw_frame(&mut self, src: Rect, dest: Rect);
    /// Draw text anchored at (x, y)
    fn draw_text(&mut self, text: &str, x: f32, y: f32);
    /// Outline a rectangle (hitbox debugging)
    fn stroke_rect(&mut self, rect: Rect);
}

/// Discards every draw call. For headless runs and benchmarks.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn clear(&mut self, _region: Rect) {}
    fn draw_frame(&mut self, _src: Rect, _dest: Rect) {}
    fn draw_text(&mut self, _text: &str, _x: f32, _y: f32) {}
    fn stroke_rect(&mut self, _rect: Rect) {}
}

/// One recorded drawing primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear(Rect),
    Frame { src: Rect, dest: Rect },
    Text { text: String, x: f32, y: f32 },
    Stroke(Rect),
}

/// Records draw calls in order for later inspection. The test suite asserts
/// against the recorded stream instead of pixels.
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    pub calls: Vec<DrawCall>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.calls.clear();
    }
}

impl Surface for Recorder {
    fn clear(&mut self, region: Rect) {
        self.calls.push(DrawCall::Clear(region));
    }

    fn draw_frame(&mut self, src: Rect, dest: Rect) {
        self.calls.push(DrawCall::Frame { src, dest });
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32) {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            x,
            y,
        });
    }

    fn stroke_rect(&mut self, rect: Rect) {
        self.calls.push(DrawCall::Stroke(rect));
    }
}
