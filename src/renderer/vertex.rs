//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Pixel-space vertex; `RenderState` rewrites `position` to NDC on upload
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn at(point: Vec2, color: [f32; 4]) -> Self {
        Self::new(point.x, point.y, color)
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Overlay colors
pub mod colors {
    /// Dim layer under the transition visuals
    pub const BACKDROP: [f32; 4] = [0.0, 0.0, 0.0, 0.6];
    /// Bars, iris and checker fill
    pub const WIPE: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    /// Flash gradient stops, center to rim (alpha applied at draw time)
    pub const FLASH_CORE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const FLASH_MID: [f32; 4] = [0.898, 0.906, 0.922, 1.0]; // #e5e7eb
    pub const FLASH_EDGE: [f32; 4] = [0.067, 0.094, 0.153, 1.0]; // #111827
    pub const FLASH_RIM: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_matches_struct() {
        let layout = Vertex::desc();
        assert_eq!(layout.array_stride, 24);
        assert_eq!(layout.attributes[1].offset, 8);
        assert_eq!(Vertex::at(Vec2::new(3.0, 4.0), colors::WIPE).position, [3.0, 4.0]);
    }
}
