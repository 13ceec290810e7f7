use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);

fn next_version() -> u64 {
    NEXT_VERSION.fetch_add(1, Ordering::Relaxed)
}

/// Typed storage behind an attribute.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeData {
    F32(Vec<f32>),
    U8(Vec<u8>),
}

impl AttributeData {
    pub fn len(&self) -> usize {
        match self {
            AttributeData::F32(data) => data.len(),
            AttributeData::U8(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw bytes, ready for a buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            AttributeData::F32(data) => bytemuck::cast_slice(data.as_slice()),
            AttributeData::U8(data) => data.as_slice(),
        }
    }

    pub fn as_f32(&self) -> Option<&[f32]> {
        match self {
            AttributeData::F32(data) => Some(data.as_slice()),
            AttributeData::U8(_) => None,
        }
    }

    pub fn as_u8(&self) -> Option<&[u8]> {
        match self {
            AttributeData::U8(data) => Some(data.as_slice()),
            AttributeData::F32(_) => None,
        }
    }
}

impl From<Vec<f32>> for AttributeData {
    fn from(data: Vec<f32>) -> Self {
        AttributeData::F32(data)
    }
}

impl From<Vec<u8>> for AttributeData {
    fn from(data: Vec<u8>) -> Self {
        AttributeData::U8(data)
    }
}

/// A per-instance attribute: a flat array read `item_size` values at a time.
///
/// `version` changes on every content change so a backend can tell when a re-upload is
/// needed without diffing the data. Versions are unique across all attributes, so a
/// replaced attribute never looks unchanged.
#[derive(Clone, Debug, PartialEq)]
pub struct InstanceAttribute {
    data: AttributeData,
    item_size: usize,
    version: u64,
}

impl InstanceAttribute {
    pub fn new(data: impl Into<AttributeData>, item_size: usize) -> Self {
        Self {
            data: data.into(),
            item_size: item_size.max(1),
            version: next_version(),
        }
    }

    pub fn data(&self) -> &AttributeData {
        &self.data
    }

    pub fn item_size(&self) -> usize {
        self.item_size
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of items (instances) held.
    pub fn count(&self) -> usize {
        self.data.len() / self.item_size
    }

    /// Overwrite the contents in place when the length is unchanged.
    ///
    /// Returns `false` without touching anything on a length or type mismatch; the
    /// caller has to replace the attribute instead.
    pub fn copy_from_f32(&mut self, values: &[f32]) -> bool {
        match &mut self.data {
            AttributeData::F32(data) if data.len() == values.len() => {
                data.copy_from_slice(values);
                self.version = next_version();
                true
            }
            _ => false,
        }
    }

    /// Byte-typed counterpart of [`InstanceAttribute::copy_from_f32`].
    pub fn copy_from_u8(&mut self, values: &[u8]) -> bool {
        match &mut self.data {
            AttributeData::U8(data) if data.len() == values.len() => {
                data.copy_from_slice(values);
                self.version = next_version();
                true
            }
            _ => false,
        }
    }
}
