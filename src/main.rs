//! Instanced SDF text geometry demo
//!
//! Lays out a long block of placeholder text, scrolls a clip window over it and reports
//! how many glyph instances each frame would draw. When a GPU adapter is available the
//! geometry is also uploaded through the wgpu backend.

use rand::Rng;
use sdf_glyphs::{ChunkTable, GeometryConfig, GlyphsGeometry, Rect, Side, DEFAULT_CHUNK_SIZE};
use sdf_glyphs_wgpu::{glyph_buffer_layouts, GpuGlyphGeometry};

const GLYPH_COUNT: usize = 4000;
const GLYPHS_PER_LINE: usize = 80;
const GLYPH_WIDTH: f32 = 0.6;
const LINE_HEIGHT: f32 = 1.2;
const CLIP_HEIGHT: f32 = 12.0;
const SCROLL_STEPS: usize = 8;

/// Flat glyph arrays as a layout engine would produce them
struct TextLayout {
    glyph_bounds: Vec<f32>,
    atlas_indices: Vec<f32>,
    colors: Vec<u8>,
}

/// Lay out random words line by line, top to bottom (y decreasing)
fn layout_text() -> TextLayout {
    let mut rng = rand::rng();
    let mut layout = TextLayout {
        glyph_bounds: Vec::with_capacity(GLYPH_COUNT * 4),
        atlas_indices: Vec::with_capacity(GLYPH_COUNT),
        colors: Vec::with_capacity(GLYPH_COUNT * 3),
    };

    let mut column = 0;
    let mut line = 0;
    let mut word_left = rng.random_range(1..10);
    while layout.atlas_indices.len() < GLYPH_COUNT {
        if word_left == 0 {
            // space
            column += 1;
            word_left = rng.random_range(1..10);
        }
        if column + word_left > GLYPHS_PER_LINE {
            column = 0;
            line += 1;
        }

        let x = column as f32 * GLYPH_WIDTH;
        let y = -(line as f32) * LINE_HEIGHT;
        layout
            .glyph_bounds
            .extend_from_slice(&[x, y - LINE_HEIGHT, x + GLYPH_WIDTH, y]);
        layout
            .atlas_indices
            .push(rng.random_range(0..96) as f32);
        let shade = rng.random_range(160..=255);
        layout.colors.extend_from_slice(&[shade, shade, 255]);

        column += 1;
        word_left -= 1;
    }

    log::info!("✓ Laid out {} glyphs on {} lines", GLYPH_COUNT, line + 1);
    layout
}

fn build_geometry(layout: &TextLayout) -> Result<GlyphsGeometry, Box<dyn std::error::Error>> {
    let config = GeometryConfig {
        side: Side::Front,
        ..Default::default()
    };
    let mut geometry = GlyphsGeometry::with_config(config)?;

    let table = ChunkTable::from_glyph_bounds(&layout.glyph_bounds, DEFAULT_CHUNK_SIZE)?;
    geometry.update_glyphs(
        &layout.glyph_bounds,
        &layout.atlas_indices,
        None,
        Some(table.chunks().to_vec()),
        Some(&layout.colors),
    )?;

    let block = geometry.block_bounds();
    log::info!(
        "  Block bounds: {:.1}x{:.1}, {} chunks",
        block.width(),
        block.height(),
        table.len()
    );
    log::info!(
        "  Bounding sphere radius: {:.2}",
        geometry.bounding_sphere().radius
    );
    Ok(geometry)
}

/// Scroll a clip window from the top of the block to the bottom
fn scroll(geometry: &mut GlyphsGeometry) {
    let block = geometry.block_bounds();
    let travel = (block.height() - CLIP_HEIGHT).max(0.0);
    for step in 0..=SCROLL_STEPS {
        let top = block.max[1] - travel * step as f32 / SCROLL_STEPS as f32;
        let clip = Rect::new([block.min[0], top - CLIP_HEIGHT], [block.max[0], top]);
        let count = geometry.apply_clip_rect(&clip);
        log::info!(
            "  clip y={:>7.1}..{:>7.1}: drawing {:>5}/{} instances",
            clip.min[1],
            clip.max[1],
            count,
            geometry.glyph_count()
        );
    }
}

fn request_device() -> Option<(wgpu::Device, wgpu::Queue)> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });

    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::default(),
        compatible_surface: None,
        force_fallback_adapter: false,
    }))
    .ok()?;
    log::info!("Using adapter: {}", adapter.get_info().name);

    pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
        label: Some("SDF Text Device"),
        required_features: wgpu::Features::empty(),
        required_limits: wgpu::Limits::default(),
        memory_hints: wgpu::MemoryHints::default(),
        experimental_features: wgpu::ExperimentalFeatures::disabled(),
        trace: wgpu::Trace::Off,
    }))
    .inspect_err(|err| log::warn!("Failed to create device: {}", err))
    .ok()
}

fn upload(geometry: &GlyphsGeometry) -> Result<(), Box<dyn std::error::Error>> {
    let Some((device, queue)) = request_device() else {
        log::warn!("No GPU adapter available, skipping upload");
        return Ok(());
    };

    let mut gpu = GpuGlyphGeometry::new(&device, geometry);
    gpu.sync(&device, &queue, geometry)?;
    log::info!(
        "✓ Uploaded {} instances into {} buffers ({} vertex layouts)",
        gpu.instance_count(),
        gpu.tracked_buffers(),
        glyph_buffer_layouts(gpu.has_colors()).len()
    );

    gpu.dispose();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let layout = layout_text();
    let mut geometry = build_geometry(&layout)?;
    scroll(&mut geometry);

    geometry.clear_clip_rect();
    upload(&geometry)?;
    Ok(())
}
