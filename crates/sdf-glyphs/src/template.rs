use bytemuck::{Pod, Zeroable};
use std::num::NonZeroU32;

use crate::error::GeometryError;

/// Vertex of the per-instance glyph quad.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct TemplateVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl TemplateVertex {
    pub const fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// The quad every glyph instance is drawn with.
///
/// A unit plane covering [0, 1]^2, subdivided `detail` times along each axis, stored as
/// two back-to-back faces in one mesh: the front face first, then a mirrored back face.
/// Drawing only the front half, only the back half, or all indices selects the
/// rendered side without a second draw call.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphTemplate {
    detail: u32,
    vertices: Vec<TemplateVertex>,
    indices: Vec<u32>,
}

impl GlyphTemplate {
    pub fn new(detail: u32) -> Result<Self, GeometryError> {
        NonZeroU32::new(detail)
            .map(Self::with_detail)
            .ok_or(GeometryError::InvalidDetail)
    }

    pub fn with_detail(detail: NonZeroU32) -> Self {
        let detail = detail.get();
        let grid = detail as usize;
        let row = grid + 1;
        let face_vertex_count = row * row;

        let mut vertices = Vec::with_capacity(face_vertex_count * 2);
        let mut indices = Vec::with_capacity(grid * grid * 12);

        let step = 1.0 / detail as f32;
        for iy in 0..row {
            let y = 0.5 - iy as f32 * step;
            for ix in 0..row {
                let x = ix as f32 * step - 0.5;
                vertices.push(TemplateVertex::new(
                    [x + 0.5, y + 0.5, 0.0],
                    [0.0, 0.0, 1.0],
                    [ix as f32 * step, 1.0 - iy as f32 * step],
                ));
            }
        }

        // Back face: x mirrored around the quad's center, normal facing -z.
        for iy in 0..row {
            let y = 0.5 - iy as f32 * step;
            for ix in 0..row {
                let x = ix as f32 * step - 0.5;
                vertices.push(TemplateVertex::new(
                    [0.5 - x, y + 0.5, 0.0],
                    [0.0, 0.0, -1.0],
                    [ix as f32 * step, 1.0 - iy as f32 * step],
                ));
            }
        }

        for face in 0..2 {
            let base = (face * face_vertex_count) as u32;
            for iy in 0..grid {
                for ix in 0..grid {
                    let a = base + (ix + row * iy) as u32;
                    let b = base + (ix + row * (iy + 1)) as u32;
                    let c = base + (ix + 1 + row * (iy + 1)) as u32;
                    let d = base + (ix + 1 + row * iy) as u32;
                    indices.extend_from_slice(&[a, b, d, b, c, d]);
                }
            }
        }

        Self {
            detail,
            vertices,
            indices,
        }
    }

    pub fn detail(&self) -> u32 {
        self.detail
    }

    pub fn vertices(&self) -> &[TemplateVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

impl Default for GlyphTemplate {
    fn default() -> Self {
        Self::with_detail(NonZeroU32::MIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_quad() {
        let template = GlyphTemplate::default();
        let positions: Vec<[f32; 3]> = template.vertices().iter().map(|v| v.position).collect();
        assert_eq!(
            positions,
            vec![
                [0.0, 1.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                // back face, mirrored in x
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 0.0, 0.0],
            ]
        );
        assert_eq!(template.indices(), &[0, 2, 1, 2, 3, 1, 4, 6, 5, 6, 7, 5]);
        assert_eq!(template.vertices()[0].uv, [0.0, 1.0]);
        assert_eq!(template.vertices()[3].uv, [1.0, 0.0]);
    }

    #[test]
    fn test_counts_scale_with_detail() {
        let template = GlyphTemplate::new(3).unwrap();
        assert_eq!(template.vertices().len(), 2 * 16);
        assert_eq!(template.indices().len(), 2 * 9 * 6);
        let max = *template.indices().iter().max().unwrap();
        assert_eq!(max as usize, template.vertices().len() - 1);
    }

    #[test]
    fn test_faces_are_split_in_halves() {
        let template = GlyphTemplate::new(2).unwrap();
        let half = template.indices().len() / 2;
        let face_verts = template.vertices().len() / 2;

        for &i in &template.indices()[..half] {
            assert!((i as usize) < face_verts);
            assert_eq!(template.vertices()[i as usize].normal[2], 1.0);
        }
        for &i in &template.indices()[half..] {
            assert!((i as usize) >= face_verts);
            assert_eq!(template.vertices()[i as usize].normal[2], -1.0);
        }
    }

    #[test]
    fn test_positions_cover_unit_square() {
        let template = GlyphTemplate::new(4).unwrap();
        for v in template.vertices() {
            assert!((0.0..=1.0).contains(&v.position[0]));
            assert!((0.0..=1.0).contains(&v.position[1]));
        }
    }

    #[test]
    fn test_zero_detail_rejected() {
        assert_eq!(GlyphTemplate::new(0).unwrap_err(), GeometryError::InvalidDetail);
    }
}
