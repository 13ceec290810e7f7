//! Chunked glyph bounds and clip-driven instance counts.
//!
//! The layout engine groups consecutive glyphs into chunks and reports a bounding rect
//! for each. Given a clip rect, the renderer wants to skip the vertex work for glyphs
//! that cannot be visible. Instanced draws only take an instance *count* and never a
//! starting offset, so the best we can do is cut off the tail: the result always covers
//! glyphs `0..n`. A clip window near the end of a long block therefore still draws
//! everything before it.

use crate::error::GeometryError;
use crate::rect::Rect;

/// Default number of glyphs grouped into one chunk by [`ChunkTable::from_glyph_bounds`].
pub const DEFAULT_CHUNK_SIZE: usize = 64;

/// A half-open range of glyph ordinals sharing one bounding rect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphChunk {
    pub start: usize,
    pub end: usize,
    pub rect: Rect,
}

impl GlyphChunk {
    pub const fn new(start: usize, end: usize, rect: Rect) -> Self {
        Self { start, end, rect }
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// An ordered chunk list that partitions `0..glyph_count` exactly.
///
/// The partition is checked on construction, so anything holding a `ChunkTable`
/// can rely on ascending, contiguous, non-empty ranges.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkTable {
    chunks: Vec<GlyphChunk>,
}

impl ChunkTable {
    /// Validate `chunks` against `glyph_count`.
    pub fn new(chunks: Vec<GlyphChunk>, glyph_count: usize) -> Result<Self, GeometryError> {
        let mut expected = 0;
        for (index, chunk) in chunks.iter().enumerate() {
            if chunk.start != expected {
                return Err(GeometryError::ChunkGap {
                    index,
                    start: chunk.start,
                    expected,
                });
            }
            if chunk.is_empty() {
                return Err(GeometryError::EmptyChunk {
                    index,
                    start: chunk.start,
                    end: chunk.end,
                });
            }
            expected = chunk.end;
        }

        if expected != glyph_count {
            return Err(GeometryError::ChunkCoverage {
                covered: expected,
                expected: glyph_count,
            });
        }

        Ok(Self { chunks })
    }

    /// Group a flat `[minX, minY, maxX, maxY, ...]` glyph bounds array into chunks of at
    /// most `chunk_size` consecutive glyphs, each carrying the union of its glyph rects.
    pub fn from_glyph_bounds(glyph_bounds: &[f32], chunk_size: usize) -> Result<Self, GeometryError> {
        if glyph_bounds.len() % 4 != 0 {
            return Err(GeometryError::MisalignedBounds(glyph_bounds.len()));
        }
        if chunk_size == 0 {
            return Err(GeometryError::InvalidChunkSize);
        }

        let chunks = glyph_bounds
            .chunks(chunk_size.saturating_mul(4))
            .enumerate()
            .map(|(i, bounds)| {
                let start = i * chunk_size;
                GlyphChunk::new(start, start + bounds.len() / 4, Rect::from_flat_bounds(bounds))
            })
            .collect();

        Ok(Self { chunks })
    }

    pub fn chunks(&self) -> &[GlyphChunk] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Number of glyphs partitioned by this table.
    pub fn glyph_count(&self) -> usize {
        self.chunks.last().map_or(0, |chunk| chunk.end)
    }

    /// See [`find_visible_instance_count`].
    pub fn visible_instance_count(&self, clip_rect: &Rect) -> usize {
        find_visible_instance_count(self, clip_rect)
    }
}

/// Smallest instance count that still draws every chunk intersecting `clip_rect`.
///
/// Returns 0 for an empty table, a degenerate clip rect, or when nothing intersects.
/// When several chunks intersect, the largest `end` wins, so chunks before it are drawn
/// even if they are themselves clipped away.
pub fn find_visible_instance_count(chunks: &ChunkTable, clip_rect: &Rect) -> usize {
    if clip_rect.is_degenerate() {
        return 0;
    }

    // Ends ascend with the chunk index, so the last hit is the maximum.
    chunks
        .chunks
        .iter()
        .rev()
        .find(|chunk| chunk.rect.intersects(clip_rect))
        .map_or(0, |chunk| chunk.end)
}
