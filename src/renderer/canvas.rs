//! Full-viewport draw list
//!
//! Effects draw into a `Canvas` in pixel space; `RenderState` uploads it.
//! The canvas tracks viewport dimensions and drops its contents on resize.

use super::vertex::Vertex;

#[derive(Debug, Clone, Default)]
pub struct Canvas {
    width: u32,
    height: u32,
    vertices: Vec<Vertex>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            vertices: Vec::new(),
        }
    }

    /// Track new viewport dimensions; implicitly clears
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.vertices.clear();
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    /// False while the viewport has no area; draws are dropped
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Viewport size as floats
    pub fn extent(&self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }

    /// Append prebuilt triangles
    pub fn push(&mut self, vertices: &[Vertex]) {
        if self.is_ready() {
            self.vertices.extend_from_slice(vertices);
        }
    }

    /// Flat rectangle; fully transparent or empty rectangles are skipped
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) {
        if w <= 0.0 || h <= 0.0 || color[3] <= 0.0 {
            return;
        }
        self.push(&super::shapes::rect(x, y, w, h, color));
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}
