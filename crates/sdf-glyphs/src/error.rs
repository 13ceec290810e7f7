use thiserror::Error;

/// Contract violations reported by glyph updates.
///
/// These are never recoverable locally: the caller handed over data that would
/// desynchronize per-glyph attributes. The update that produced one was not applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("glyph bounds length {0} is not a multiple of 4")]
    MisalignedBounds(usize),

    #[error("glyph colors length {0} is not a multiple of 3")]
    MisalignedColors(usize),

    #[error("{attribute} describes {actual} glyphs, expected {expected}")]
    LengthMismatch {
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{0} has the wrong element type or item size")]
    AttributeFormat(&'static str),

    #[error("chunk {index} starts at {start}, expected {expected}")]
    ChunkGap {
        index: usize,
        start: usize,
        expected: usize,
    },

    #[error("chunk {index} has an empty range {start}..{end}")]
    EmptyChunk {
        index: usize,
        start: usize,
        end: usize,
    },

    #[error("chunks cover {covered} glyphs, expected {expected}")]
    ChunkCoverage { covered: usize, expected: usize },

    #[error("chunk size must be at least 1")]
    InvalidChunkSize,

    #[error("template detail must be at least 1")]
    InvalidDetail,
}
