//! WebGPU rendering module
//!
//! Effects draw flat-colored triangles into a `Canvas` in viewport pixels;
//! `RenderState` converts them to NDC and submits one draw per frame.

pub mod canvas;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use canvas::Canvas;
pub use pipeline::RenderState;
pub use vertex::Vertex;
