//! # sdf-glyphs
//!
//! Graphics backend agnostic geometry for instanced SDF text.
//!
//! A layout engine hands over flat per-glyph arrays (bounds, atlas indices, colors) plus
//! optional chunked bounds; this crate keeps them as instance attributes, maintains the
//! bounding volumes, and picks the instance count needed for a clip rect. Uploading and
//! drawing is handled by backend crates like `sdf-glyphs-wgpu`.

mod attribute;
mod bounds;
mod chunk;
mod error;
mod geometry;
mod rect;
pub mod resource;
mod template;

pub use attribute::*;
pub use bounds::*;
pub use chunk::*;
pub use error::*;
pub use geometry::*;
pub use rect::*;
pub use resource::{Dispose, ResourceTracker};
pub use template::*;
