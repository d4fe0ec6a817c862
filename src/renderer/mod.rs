//! Rendering module
//!
//! The simulation draws through the [`Painter`] seam. The WebGPU backend
//! tessellates a recorded [`DisplayList`] into triangles and draws them.

pub mod color;
pub mod painter;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use color::Rgba;
pub use painter::{DisplayList, DrawCmd, Painter};
pub use pipeline::RenderState;
pub use shapes::tessellate;
pub use vertex::Vertex;
