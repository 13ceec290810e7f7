//! # sdf-glyphs-wgpu
//!
//! WGPU backend for `sdf-glyphs`: uploads glyph instance attributes and the quad
//! template, and records instanced draws limited to the geometry's current instance count.
//!
//! Pipeline and material construction stay with the caller; [`glyph_buffer_layouts`]
//! describes the vertex buffers a compatible pipeline must declare.

mod buffer;
mod error;
mod geometry;
mod instance;
mod vertex;

pub use buffer::*;
pub use error::*;
pub use geometry::*;
pub use instance::*;
pub use vertex::*;
