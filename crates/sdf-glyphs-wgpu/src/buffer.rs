use sdf_glyphs::Dispose;

/// A GPU buffer whose release goes through a `ResourceTracker`.
#[derive(Debug)]
pub struct TrackedBuffer {
    buffer: wgpu::Buffer,
}

impl TrackedBuffer {
    pub fn new(device: &wgpu::Device, label: &str, size: u64, usage: wgpu::BufferUsages) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self { buffer }
    }

    /// Create a buffer initialized with `contents`.
    pub fn with_contents(
        device: &wgpu::Device,
        label: &str,
        contents: &[u8],
        usage: wgpu::BufferUsages,
    ) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: contents.len() as u64,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: true,
        });
        buffer
            .slice(..)
            .get_mapped_range_mut()
            .copy_from_slice(contents);
        buffer.unmap();
        Self { buffer }
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Capacity in bytes.
    pub fn size(&self) -> u64 {
        self.buffer.size()
    }
}

impl Dispose for TrackedBuffer {
    fn dispose(&self) {
        // Destroying twice is allowed by wgpu.
        self.buffer.destroy();
    }
}
