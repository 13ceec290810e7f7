use sdf_glyphs::TemplateVertex;

/// Shader locations of the quad template attributes.
pub const POSITION_LOCATION: u32 = 0;
pub const NORMAL_LOCATION: u32 = 1;
pub const UV_LOCATION: u32 = 2;

/// Vertex buffer layout for the glyph quad template (slot 0).
///
/// Matches [`TemplateVertex`], which is uploaded as-is.
pub const fn template_vertex_desc() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: &[wgpu::VertexAttribute] = &[
        // position
        wgpu::VertexAttribute {
            offset: 0,
            shader_location: POSITION_LOCATION,
            format: wgpu::VertexFormat::Float32x3,
        },
        // normal
        wgpu::VertexAttribute {
            offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
            shader_location: NORMAL_LOCATION,
            format: wgpu::VertexFormat::Float32x3,
        },
        // uv
        wgpu::VertexAttribute {
            offset: (std::mem::size_of::<[f32; 3]>() * 2) as wgpu::BufferAddress,
            shader_location: UV_LOCATION,
            format: wgpu::VertexFormat::Float32x2,
        },
    ];

    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<TemplateVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: ATTRIBUTES,
    }
}
