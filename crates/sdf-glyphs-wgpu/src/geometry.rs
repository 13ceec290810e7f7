use std::collections::HashMap;
use std::sync::Arc;

use sdf_glyphs::{
    DrawGroup, GlyphTemplate, GlyphsGeometry, ResourceTracker, GLYPH_BOUNDS_ATTRIBUTE,
    GLYPH_COLOR_ATTRIBUTE, GLYPH_INDEX_ATTRIBUTE,
};

use crate::buffer::TrackedBuffer;
use crate::error::GpuError;
use crate::instance::{attribute_slot, upload_bytes, TEMPLATE_SLOT};

/// Instance buffers start with room for this many glyphs.
pub const INITIAL_INSTANCE_CAPACITY: u64 = 256;

/// Bytes per instance of the widest glyph attribute.
const MAX_INSTANCE_STRIDE: u64 = std::mem::size_of::<[f32; 4]>() as u64;

struct GpuAttribute {
    buffer: Arc<TrackedBuffer>,
    version: u64,
}

/// GPU copy of a [`GlyphsGeometry`].
///
/// Owns one vertex/index buffer pair for the quad template and one instance buffer per
/// attribute. Every buffer is registered with an internal [`ResourceTracker`]; buffers
/// that get replaced are released right away and [`GpuGlyphGeometry::dispose`] releases
/// the rest.
pub struct GpuGlyphGeometry {
    template_vertex_buffer: Arc<TrackedBuffer>,
    template_index_buffer: Arc<TrackedBuffer>,
    template_detail: u32,

    attributes: HashMap<String, GpuAttribute>,

    instance_count: u32,
    groups: [DrawGroup; 2],

    resources: ResourceTracker<TrackedBuffer>,
}

impl GpuGlyphGeometry {
    pub fn new(device: &wgpu::Device, geometry: &GlyphsGeometry) -> Self {
        let mut resources = ResourceTracker::new();
        let (template_vertex_buffer, template_index_buffer) =
            create_template_buffers(device, geometry.template());
        resources.add(template_vertex_buffer.clone());
        resources.add(template_index_buffer.clone());

        Self {
            template_vertex_buffer,
            template_index_buffer,
            template_detail: geometry.detail(),
            attributes: HashMap::new(),
            instance_count: 0,
            groups: geometry.groups(),
            resources,
        }
    }

    /// Bring the GPU buffers in line with `geometry`.
    ///
    /// Only attributes whose version changed since the last sync are uploaded.
    pub fn sync(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        geometry: &GlyphsGeometry,
    ) -> Result<(), GpuError> {
        let instance_count = draw_instance_count(geometry.instance_count())?;

        if geometry.detail() != self.template_detail {
            let (vertex_buffer, index_buffer) = create_template_buffers(device, geometry.template());
            self.resources.dispose(&self.template_vertex_buffer);
            self.resources.dispose(&self.template_index_buffer);
            self.resources.add(vertex_buffer.clone());
            self.resources.add(index_buffer.clone());
            self.template_vertex_buffer = vertex_buffer;
            self.template_index_buffer = index_buffer;
            self.template_detail = geometry.detail();
        }

        // Drop buffers for attributes that no longer exist.
        let stale: Vec<String> = self
            .attributes
            .keys()
            .filter(|name| geometry.attribute(name).is_none())
            .cloned()
            .collect();
        for name in stale {
            if let Some(attr) = self.attributes.remove(&name) {
                self.resources.dispose(&attr.buffer);
            }
        }

        for (name, attribute) in geometry.attributes() {
            if self
                .attributes
                .get(name)
                .is_some_and(|gpu| gpu.version == attribute.version())
            {
                continue;
            }

            let bytes = upload_bytes(name, attribute);
            let needed = bytes.len() as u64;

            let reuse = self
                .attributes
                .get(name)
                .filter(|gpu| gpu.buffer.size() >= needed)
                .map(|gpu| gpu.buffer.clone());

            let buffer = match reuse {
                Some(buffer) => buffer,
                None => {
                    let capacity = (needed * 2)
                        .next_power_of_two()
                        .max(INITIAL_INSTANCE_CAPACITY * MAX_INSTANCE_STRIDE);
                    log::info!(
                        "allocating {} instance buffer: {} bytes",
                        name,
                        capacity
                    );
                    let buffer = Arc::new(TrackedBuffer::new(
                        device,
                        &format!("SDF Glyph {} Buffer", name),
                        capacity,
                        wgpu::BufferUsages::VERTEX,
                    ));
                    self.resources.add(buffer.clone());
                    if let Some(old) = self.attributes.remove(name) {
                        self.resources.dispose(&old.buffer);
                    }
                    buffer
                }
            };

            if !bytes.is_empty() {
                queue.write_buffer(buffer.buffer(), 0, &bytes);
            }

            self.attributes.insert(
                name.to_owned(),
                GpuAttribute {
                    buffer,
                    version: attribute.version(),
                },
            );
        }

        self.instance_count = instance_count;
        self.groups = geometry.groups();
        Ok(())
    }

    /// Issue the instanced draw for `material_index` into a pass whose pipeline was built
    /// from [`crate::glyph_buffer_layouts`].
    ///
    /// Nothing is recorded when there is nothing to draw.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>, material_index: usize) {
        let Some(group) = self
            .groups
            .iter()
            .find(|group| group.material_index == material_index)
        else {
            return;
        };
        if self.instance_count == 0 || group.count == 0 {
            return;
        }

        if !self.attributes.contains_key(GLYPH_BOUNDS_ATTRIBUTE)
            || !self.attributes.contains_key(GLYPH_INDEX_ATTRIBUTE)
        {
            return;
        }

        render_pass.set_vertex_buffer(TEMPLATE_SLOT, self.template_vertex_buffer.buffer().slice(..));
        // Custom attributes have no slot here; bind them via `attribute_buffer`.
        for (name, attr) in &self.attributes {
            if let Some(slot) = attribute_slot(name) {
                render_pass.set_vertex_buffer(slot, attr.buffer.buffer().slice(..));
            }
        }
        render_pass.set_index_buffer(
            self.template_index_buffer.buffer().slice(..),
            wgpu::IndexFormat::Uint32,
        );
        render_pass.draw_indexed(group.index_range(), 0, 0..self.instance_count);
    }

    pub fn instance_count(&self) -> u32 {
        self.instance_count
    }

    /// Whether per-glyph colors are uploaded, i.e. the pipeline should read slot 3.
    pub fn has_colors(&self) -> bool {
        self.attributes.contains_key(GLYPH_COLOR_ATTRIBUTE)
    }

    /// The instance buffer for a named attribute, for binding custom attributes.
    pub fn attribute_buffer(&self, name: &str) -> Option<&wgpu::Buffer> {
        self.attributes.get(name).map(|attr| attr.buffer.buffer())
    }

    /// Number of live GPU buffers.
    pub fn tracked_buffers(&self) -> usize {
        self.resources.len()
    }

    /// Release every GPU buffer. The next [`GpuGlyphGeometry::sync`] recreates them.
    pub fn dispose(&mut self) {
        self.attributes.clear();
        self.instance_count = 0;
        // No template has detail 0, so the next sync rebuilds it.
        self.template_detail = 0;
        self.resources.dispose_all();
    }
}

fn draw_instance_count(count: usize) -> Result<u32, GpuError> {
    u32::try_from(count).map_err(|_| GpuError::TooManyInstances(count))
}

fn create_template_buffers(
    device: &wgpu::Device,
    template: &GlyphTemplate,
) -> (Arc<TrackedBuffer>, Arc<TrackedBuffer>) {
    let vertex_buffer = TrackedBuffer::with_contents(
        device,
        "SDF Glyph Template Vertex Buffer",
        bytemuck::cast_slice(template.vertices()),
        wgpu::BufferUsages::VERTEX,
    );
    let index_buffer = TrackedBuffer::with_contents(
        device,
        "SDF Glyph Template Index Buffer",
        bytemuck::cast_slice(template.indices()),
        wgpu::BufferUsages::INDEX,
    );
    (Arc::new(vertex_buffer), Arc::new(index_buffer))
}
