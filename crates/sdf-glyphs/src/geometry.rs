//! Instanced glyph geometry.
//!
//! One quad template is drawn once per glyph. Everything that varies per glyph lives in
//! flat instance attributes indexed by glyph ordinal, which keeps the data dense enough to
//! upload in one transfer per attribute:
//! - `glyph_bounds`: `[minX, minY, maxX, maxY]` per glyph
//! - `glyph_index`: the glyph's slot in the SDF atlas
//! - `glyph_color`: optional `[r, g, b]` per glyph
//!
//! The renderer only reads derived state from here (instance count, bounding volumes,
//! draw groups); all mutation goes through [`GlyphsGeometry::update_glyphs`] and the
//! configuration setters.

use std::collections::HashMap;
use std::ops::Range;

use crate::attribute::InstanceAttribute;
use crate::bounds::{BoundingBox, BoundingSphere};
use crate::chunk::{ChunkTable, GlyphChunk};
use crate::error::GeometryError;
use crate::rect::Rect;
use crate::template::GlyphTemplate;

pub const GLYPH_BOUNDS_ATTRIBUTE: &str = "glyph_bounds";
pub const GLYPH_INDEX_ATTRIBUTE: &str = "glyph_index";
pub const GLYPH_COLOR_ATTRIBUTE: &str = "glyph_color";

/// Which faces of the glyph quads are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Side {
    Front,
    Back,
    #[default]
    Double,
}

/// A range of the template index buffer drawn with one material.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawGroup {
    pub start: u32,
    pub count: u32,
    pub material_index: usize,
}

impl DrawGroup {
    pub fn index_range(&self) -> Range<u32> {
        self.start..self.start + self.count
    }
}

/// Material slot for the glyph fill.
pub const MAIN_MATERIAL: usize = 0;
/// Material slot for outlines and other effects drawn from the same geometry.
pub const OUTLINE_MATERIAL: usize = 1;

/// Construction-time settings for [`GlyphsGeometry`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeometryConfig {
    /// Subdivisions per axis of each glyph quad. Higher values let a vertex shader bend
    /// glyphs smoothly, e.g. for a curve radius.
    pub detail: u32,
    /// Radius of the cylinder the block is wrapped around; 0 keeps it flat.
    pub curve_radius: f32,
    pub side: Side,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            detail: 1,
            curve_radius: 0.0,
            side: Side::Double,
        }
    }
}

/// A single glyph read back from the instance attributes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glyph {
    pub bounds: Rect,
    pub atlas_index: f32,
    pub color: Option<[u8; 3]>,
}

/// Geometry for one block of SDF text, drawn with instancing.
#[derive(Clone, Debug)]
pub struct GlyphsGeometry {
    template: GlyphTemplate,
    attributes: HashMap<String, InstanceAttribute>,

    glyph_count: usize,
    instance_count: usize,
    block_bounds: Rect,
    chunks: Option<ChunkTable>,

    curve_radius: f32,
    side: Side,
    draw_range: Range<u32>,

    bounding_box: BoundingBox,
    bounding_sphere: BoundingSphere,
}

impl GlyphsGeometry {
    /// Empty geometry with the default configuration.
    pub fn new() -> Self {
        let template = GlyphTemplate::default();
        let side = Side::default();
        let draw_range = side_range(side, template.index_count());
        Self {
            template,
            attributes: HashMap::new(),
            glyph_count: 0,
            instance_count: 0,
            block_bounds: Rect::EMPTY,
            chunks: None,
            curve_radius: 0.0,
            side,
            draw_range,
            bounding_box: BoundingBox::EMPTY,
            bounding_sphere: BoundingSphere::EMPTY,
        }
    }

    pub fn with_config(config: GeometryConfig) -> Result<Self, GeometryError> {
        let mut geometry = Self::new();
        geometry.set_detail(config.detail)?;
        geometry.set_curve_radius(config.curve_radius);
        geometry.set_side(config.side);
        Ok(geometry)
    }

    /// Replace all glyph data.
    ///
    /// `glyph_bounds` holds four values per glyph, `glyph_atlas_indices` one, and
    /// `glyph_colors` (if any) three. When `block_bounds` is `None` it is derived from the
    /// glyph bounds. `chunked_bounds` must partition the glyphs in order; without it
    /// [`GlyphsGeometry::apply_clip_rect`] never reduces the instance count.
    ///
    /// Nothing is modified unless every input is consistent.
    pub fn update_glyphs(
        &mut self,
        glyph_bounds: &[f32],
        glyph_atlas_indices: &[f32],
        block_bounds: Option<Rect>,
        chunked_bounds: Option<Vec<GlyphChunk>>,
        glyph_colors: Option<&[u8]>,
    ) -> Result<(), GeometryError> {
        let chunks = validate_glyphs(glyph_bounds, glyph_atlas_indices, chunked_bounds, glyph_colors)
            .inspect_err(|err| log::warn!("rejected glyph update: {}", err))?;

        let glyph_count = glyph_atlas_indices.len();

        self.write_f32_attribute(GLYPH_BOUNDS_ATTRIBUTE, glyph_bounds, 4);
        self.write_f32_attribute(GLYPH_INDEX_ATTRIBUTE, glyph_atlas_indices, 1);
        match glyph_colors {
            Some(colors) => self.write_u8_attribute(GLYPH_COLOR_ATTRIBUTE, colors, 3),
            None => {
                self.attributes.remove(GLYPH_COLOR_ATTRIBUTE);
            }
        }

        self.glyph_count = glyph_count;
        self.instance_count = glyph_count;
        self.block_bounds =
            block_bounds.unwrap_or_else(|| Rect::from_flat_bounds(glyph_bounds));
        self.chunks = chunks;
        self.update_bounds();

        log::debug!(
            "updated glyph geometry: {} glyphs, {} chunks",
            glyph_count,
            self.chunks.as_ref().map_or(0, ChunkTable::len)
        );
        Ok(())
    }

    fn write_f32_attribute(&mut self, name: &str, values: &[f32], item_size: usize) {
        let in_place = self
            .attributes
            .get_mut(name)
            .is_some_and(|attr| attr.item_size() == item_size && attr.copy_from_f32(values));
        if !in_place {
            self.attributes
                .insert(name.to_owned(), InstanceAttribute::new(values.to_vec(), item_size));
        }
    }

    fn write_u8_attribute(&mut self, name: &str, values: &[u8], item_size: usize) {
        let in_place = self
            .attributes
            .get_mut(name)
            .is_some_and(|attr| attr.item_size() == item_size && attr.copy_from_u8(values));
        if !in_place {
            self.attributes
                .insert(name.to_owned(), InstanceAttribute::new(values.to_vec(), item_size));
        }
    }

    fn update_bounds(&mut self) {
        self.compute_bounding_box();
        self.compute_bounding_sphere();
    }

    /// Recompute the bounding box from the block bounds and curve radius.
    pub fn compute_bounding_box(&mut self) -> BoundingBox {
        self.bounding_box = BoundingBox::from_block(&self.block_bounds, self.curve_radius);
        self.bounding_box
    }

    /// Recompute the bounding sphere. It is centered on the bounding box and reaches its
    /// corners, so it always encloses the block.
    pub fn compute_bounding_sphere(&mut self) -> BoundingSphere {
        let bbox = BoundingBox::from_block(&self.block_bounds, self.curve_radius);
        self.bounding_sphere = bbox.bounding_sphere();
        self.bounding_sphere
    }

    /// Pick the lowest instance count that still draws every glyph inside `clip_rect`.
    ///
    /// Without a chunk table this restores the full glyph count. Returns the count that
    /// was set.
    pub fn apply_clip_rect(&mut self, clip_rect: &Rect) -> usize {
        self.instance_count = match &self.chunks {
            Some(chunks) => chunks.visible_instance_count(clip_rect),
            None => self.glyph_count,
        };
        log::trace!(
            "clip {:?}: {} of {} instances",
            clip_rect,
            self.instance_count,
            self.glyph_count
        );
        self.instance_count
    }

    /// Draw every glyph again.
    pub fn clear_clip_rect(&mut self) {
        self.instance_count = self.glyph_count;
    }

    /// Select the drawn faces. Only the index range changes; no geometry is rebuilt.
    pub fn set_side(&mut self, side: Side) {
        self.side = side;
        self.draw_range = side_range(side, self.template.index_count());
    }

    /// Rebuild the quad template with `detail` subdivisions per axis.
    pub fn set_detail(&mut self, detail: u32) -> Result<(), GeometryError> {
        if detail == self.template.detail() {
            return Ok(());
        }
        self.template = GlyphTemplate::new(detail)?;
        self.set_side(self.side);
        Ok(())
    }

    pub fn set_curve_radius(&mut self, curve_radius: f32) {
        if curve_radius != self.curve_radius {
            self.curve_radius = curve_radius;
            self.update_bounds();
        }
    }

    /// Register or replace a named instance attribute, returning the previous one.
    ///
    /// Custom names are stored as given. The glyph attributes must keep their element
    /// type and item size and hold exactly one item per glyph, otherwise nothing changes.
    pub fn set_attribute(
        &mut self,
        name: impl Into<String>,
        attribute: InstanceAttribute,
    ) -> Result<Option<InstanceAttribute>, GeometryError> {
        let name = name.into();
        check_glyph_attribute(&name, &attribute, self.glyph_count)
            .inspect_err(|err| log::warn!("rejected attribute {}: {}", name, err))?;
        Ok(self.attributes.insert(name, attribute))
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<InstanceAttribute> {
        self.attributes.remove(name)
    }

    pub fn attribute(&self, name: &str) -> Option<&InstanceAttribute> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &InstanceAttribute)> {
        self.attributes
            .iter()
            .map(|(name, attr)| (name.as_str(), attr))
    }

    /// Read glyph `ordinal` back out of the attribute arrays.
    pub fn glyph(&self, ordinal: usize) -> Option<Glyph> {
        if ordinal >= self.glyph_count {
            return None;
        }
        let bounds = self.attribute(GLYPH_BOUNDS_ATTRIBUTE)?.data().as_f32()?;
        let indices = self.attribute(GLYPH_INDEX_ATTRIBUTE)?.data().as_f32()?;
        let color = self
            .attribute(GLYPH_COLOR_ATTRIBUTE)
            .and_then(|attr| attr.data().as_u8())
            .and_then(|colors| colors.get(ordinal * 3..ordinal * 3 + 3))
            .map(|c| [c[0], c[1], c[2]]);

        let b = bounds.get(ordinal * 4..ordinal * 4 + 4)?;
        Some(Glyph {
            bounds: Rect::from_array([b[0], b[1], b[2], b[3]]),
            atlas_index: *indices.get(ordinal)?,
            color,
        })
    }

    /// The two draw groups (main and outline material), both covering the index range of
    /// the active side.
    pub fn groups(&self) -> [DrawGroup; 2] {
        let start = self.draw_range.start;
        let count = self.draw_range.end - self.draw_range.start;
        [
            DrawGroup {
                start,
                count,
                material_index: MAIN_MATERIAL,
            },
            DrawGroup {
                start,
                count,
                material_index: OUTLINE_MATERIAL,
            },
        ]
    }

    pub fn group(&self, material_index: usize) -> Option<DrawGroup> {
        self.groups()
            .into_iter()
            .find(|group| group.material_index == material_index)
    }

    pub fn draw_range(&self) -> Range<u32> {
        self.draw_range.clone()
    }

    pub fn glyph_count(&self) -> usize {
        self.glyph_count
    }

    pub fn instance_count(&self) -> usize {
        self.instance_count
    }

    pub fn block_bounds(&self) -> Rect {
        self.block_bounds
    }

    pub fn chunk_table(&self) -> Option<&ChunkTable> {
        self.chunks.as_ref()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    pub fn bounding_sphere(&self) -> BoundingSphere {
        self.bounding_sphere
    }

    pub fn template(&self) -> &GlyphTemplate {
        &self.template
    }

    pub fn detail(&self) -> u32 {
        self.template.detail()
    }

    pub fn curve_radius(&self) -> f32 {
        self.curve_radius
    }

    pub fn side(&self) -> Side {
        self.side
    }
}

impl Default for GlyphsGeometry {
    fn default() -> Self {
        Self::new()
    }
}

fn side_range(side: Side, index_count: u32) -> Range<u32> {
    let half = index_count / 2;
    match side {
        Side::Front => 0..half,
        Side::Back => half..index_count,
        Side::Double => 0..index_count,
    }
}

fn check_glyph_attribute(
    name: &str,
    attribute: &InstanceAttribute,
    glyph_count: usize,
) -> Result<(), GeometryError> {
    let (reserved, item_size, is_bytes) = match name {
        GLYPH_BOUNDS_ATTRIBUTE => (GLYPH_BOUNDS_ATTRIBUTE, 4, false),
        GLYPH_INDEX_ATTRIBUTE => (GLYPH_INDEX_ATTRIBUTE, 1, false),
        GLYPH_COLOR_ATTRIBUTE => (GLYPH_COLOR_ATTRIBUTE, 3, true),
        _ => return Ok(()),
    };

    let data = attribute.data();
    let typed = if is_bytes {
        data.as_u8().is_some()
    } else {
        data.as_f32().is_some()
    };
    if !typed || attribute.item_size() != item_size || data.len() % item_size != 0 {
        return Err(GeometryError::AttributeFormat(reserved));
    }
    if attribute.count() != glyph_count {
        return Err(GeometryError::LengthMismatch {
            attribute: reserved,
            expected: glyph_count,
            actual: attribute.count(),
        });
    }
    Ok(())
}

fn validate_glyphs(
    glyph_bounds: &[f32],
    glyph_atlas_indices: &[f32],
    chunked_bounds: Option<Vec<GlyphChunk>>,
    glyph_colors: Option<&[u8]>,
) -> Result<Option<ChunkTable>, GeometryError> {
    if glyph_bounds.len() % 4 != 0 {
        return Err(GeometryError::MisalignedBounds(glyph_bounds.len()));
    }

    let glyph_count = glyph_bounds.len() / 4;
    if glyph_atlas_indices.len() != glyph_count {
        return Err(GeometryError::LengthMismatch {
            attribute: GLYPH_INDEX_ATTRIBUTE,
            expected: glyph_count,
            actual: glyph_atlas_indices.len(),
        });
    }

    if let Some(colors) = glyph_colors {
        if colors.len() % 3 != 0 {
            return Err(GeometryError::MisalignedColors(colors.len()));
        }
        if colors.len() / 3 != glyph_count {
            return Err(GeometryError::LengthMismatch {
                attribute: GLYPH_COLOR_ATTRIBUTE,
                expected: glyph_count,
                actual: colors.len() / 3,
            });
        }
    }

    chunked_bounds
        .map(|chunks| ChunkTable::new(chunks, glyph_count))
        .transpose()
}
