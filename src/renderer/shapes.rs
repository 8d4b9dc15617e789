//! Shape generation for 2D primitives
//!
//! All shapes are emitted in viewport pixel space (origin top-left, y down).

use glam::Vec2;
use std::f32::consts::TAU;

use super::vertex::Vertex;

/// Generate vertices for an axis-aligned filled rectangle
pub fn rect(x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) -> [Vertex; 6] {
    let (x1, y1) = (x + w, y + h);
    [
        Vertex::new(x, y, color),
        Vertex::new(x1, y, color),
        Vertex::new(x, y1, color),
        Vertex::new(x, y1, color),
        Vertex::new(x1, y, color),
        Vertex::new(x1, y1, color),
    ]
}

/// Point on the circle of `radius` around `center` at `theta`
fn on_circle(center: Vec2, radius: f32, theta: f32) -> Vec2 {
    center + Vec2::from_angle(theta) * radius
}

/// Angles bounding segment `i` of `segments`
fn segment_angles(i: u32, segments: u32) -> (f32, f32) {
    let step = TAU / segments as f32;
    (i as f32 * step, (i + 1) as f32 * step)
}

/// Triangle-fan disc (one triangle per segment)
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    (0..segments)
        .flat_map(|i| {
            let (a, b) = segment_angles(i, segments);
            [
                Vertex::at(center, color),
                Vertex::at(on_circle(center, radius, a), color),
                Vertex::at(on_circle(center, radius, b), color),
            ]
        })
        .collect()
}

/// A color stop for `radial_gradient`: `offset` in [0, 1] of the radius
#[derive(Debug, Clone, Copy)]
pub struct GradientStop {
    pub offset: f32,
    pub color: [f32; 4],
}

/// Generate vertices for a disc shaded by concentric color stops.
///
/// Each pair of adjacent stops becomes a ring band whose inner and outer
/// edges carry the stop colors; the GPU interpolates between them. `alpha`
/// multiplies every stop.
pub fn radial_gradient(
    center: Vec2,
    radius: f32,
    stops: &[GradientStop],
    alpha: f32,
    segments: u32,
) -> Vec<Vertex> {
    if stops.len() < 2 || radius <= 0.0 {
        return Vec::new();
    }

    let with_alpha = |c: [f32; 4]| [c[0], c[1], c[2], c[3] * alpha];
    let mut vertices = Vec::with_capacity((segments * 6) as usize * (stops.len() - 1));

    for band in stops.windows(2) {
        let (inner, outer) = (band[0], band[1]);
        let inner_r = inner.offset.clamp(0.0, 1.0) * radius;
        let outer_r = outer.offset.clamp(0.0, 1.0) * radius;
        let inner_c = with_alpha(inner.color);
        let outer_c = with_alpha(outer.color);

        for i in 0..segments {
            let (a, b) = segment_angles(i, segments);
            let inner_a = Vertex::at(on_circle(center, inner_r, a), inner_c);
            let inner_b = Vertex::at(on_circle(center, inner_r, b), inner_c);
            let outer_a = Vertex::at(on_circle(center, outer_r, a), outer_c);
            let outer_b = Vertex::at(on_circle(center, outer_r, b), outer_c);

            // Quad between the two stop rings
            vertices.extend([inner_a, outer_a, inner_b, inner_b, outer_a, outer_b]);
        }
    }

    vertices
}
