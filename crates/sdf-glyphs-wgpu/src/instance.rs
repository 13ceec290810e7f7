//! Per-glyph instance buffer layouts.
//!
//! Each glyph attribute lives in its own instance-rate vertex buffer, mirroring the
//! column-wise storage in `sdf_glyphs::GlyphsGeometry`.

use std::borrow::Cow;

use sdf_glyphs::{InstanceAttribute, GLYPH_BOUNDS_ATTRIBUTE, GLYPH_COLOR_ATTRIBUTE, GLYPH_INDEX_ATTRIBUTE};

/// Vertex buffer slots used by [`crate::GpuGlyphGeometry::draw`].
pub const TEMPLATE_SLOT: u32 = 0;
pub const GLYPH_BOUNDS_SLOT: u32 = 1;
pub const GLYPH_INDEX_SLOT: u32 = 2;
pub const GLYPH_COLOR_SLOT: u32 = 3;

/// Shader locations of the instance attributes (after the template's 0..=2).
pub const GLYPH_BOUNDS_LOCATION: u32 = 3;
pub const GLYPH_INDEX_LOCATION: u32 = 4;
pub const GLYPH_COLOR_LOCATION: u32 = 5;

/// `[minX, minY, maxX, maxY]`: vec4<f32> at location 3
pub const fn glyph_bounds_desc() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: &[wgpu::VertexAttribute] = &[wgpu::VertexAttribute {
        offset: 0,
        shader_location: GLYPH_BOUNDS_LOCATION,
        format: wgpu::VertexFormat::Float32x4,
    }];

    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: ATTRIBUTES,
    }
}

/// Atlas slot: f32 at location 4
pub const fn glyph_index_desc() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: &[wgpu::VertexAttribute] = &[wgpu::VertexAttribute {
        offset: 0,
        shader_location: GLYPH_INDEX_LOCATION,
        format: wgpu::VertexFormat::Float32,
    }];

    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<f32>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: ATTRIBUTES,
    }
}

/// Glyph color: vec4<f32> at location 5 (Unorm8x4, alpha always 255)
///
/// Colors arrive as 3 bytes per glyph, but vertex strides must be 4-byte aligned, so
/// they are padded on upload.
pub const fn glyph_color_desc() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: &[wgpu::VertexAttribute] = &[wgpu::VertexAttribute {
        offset: 0,
        shader_location: GLYPH_COLOR_LOCATION,
        format: wgpu::VertexFormat::Unorm8x4,
    }];

    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[u8; 4]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: ATTRIBUTES,
    }
}

/// All buffer layouts a glyph pipeline needs, in slot order.
///
/// `with_colors` selects whether the pipeline reads per-glyph colors from slot 3.
pub fn glyph_buffer_layouts(with_colors: bool) -> Vec<wgpu::VertexBufferLayout<'static>> {
    let mut layouts = vec![
        crate::vertex::template_vertex_desc(),
        glyph_bounds_desc(),
        glyph_index_desc(),
    ];
    if with_colors {
        layouts.push(glyph_color_desc());
    }
    layouts
}

/// Slot a named attribute is bound to, if it is one of the glyph attributes.
pub fn attribute_slot(name: &str) -> Option<u32> {
    match name {
        GLYPH_BOUNDS_ATTRIBUTE => Some(GLYPH_BOUNDS_SLOT),
        GLYPH_INDEX_ATTRIBUTE => Some(GLYPH_INDEX_SLOT),
        GLYPH_COLOR_ATTRIBUTE => Some(GLYPH_COLOR_SLOT),
        _ => None,
    }
}

/// Expand `[r, g, b, ...]` into opaque `[r, g, b, 255, ...]`.
pub fn pad_colors(rgb: &[u8]) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(rgb.len() / 3 * 4);
    for c in rgb.chunks_exact(3) {
        rgba.extend_from_slice(&[c[0], c[1], c[2], 255]);
    }
    rgba
}

/// Bytes to upload for an attribute, padded to the buffer copy alignment.
pub fn upload_bytes<'a>(name: &str, attribute: &'a InstanceAttribute) -> Cow<'a, [u8]> {
    if name == GLYPH_COLOR_ATTRIBUTE {
        if let Some(rgb) = attribute.data().as_u8() {
            return Cow::Owned(pad_colors(rgb));
        }
    }

    let bytes = attribute.data().as_bytes();
    let align = wgpu::COPY_BUFFER_ALIGNMENT as usize;
    if bytes.len() % align == 0 {
        Cow::Borrowed(bytes)
    } else {
        let mut padded = bytes.to_vec();
        padded.resize(bytes.len().next_multiple_of(align), 0);
        Cow::Owned(padded)
    }
}
