pub mod config;

pub use config::{WindowConfig, WindowMode};

use std::sync::Arc;

use anyhow::{Context, Result};
use glam::{IVec2, Vec2};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::pixel::Pixel;
use crate::renderer::Gpu;
use crate::renderer::pipeline::{
    CompositeVertex, create_composite_pipeline, orthographic_projection,
};
use crate::sprite::Sprite;

// ── Layer ───────────────────────────────────────────────────────────────────

/// One compositing layer: a software canvas, its GPU texture, and the decal
/// draws queued against it this frame.
///
/// `offset` and `scale` are stored in the render-ready form: `offset` holds
/// the *negated* user value and `scale` the *reciprocal* (see
/// [`EngineWindow::set_layer_offset`] / [`EngineWindow::set_layer_scale`]),
/// so the compositor consumes them directly.
pub(crate) struct Layer {
    pub canvas: Sprite,
    pub texture: wgpu::Texture,
    pub bind_group: wgpu::BindGroup,
    /// Decal draws queued this frame; cleared every frame whether or not the
    /// layer rendered.
    pub decals: Vec<DecalFrame>,
    /// Canvas pixels changed since the last texture upload.
    pub dirty: bool,
    pub enabled: bool,
    pub tint: Pixel,
    pub offset: Vec2,
    pub scale: Vec2,
}

impl Layer {
    fn new(gpu: &Gpu, width: u32, height: u32) -> Self {
        let canvas = Sprite::new(width as i32, height as i32);
        let (texture, bind_group) = gpu.create_sprite_texture(width, height);
        Self {
            canvas,
            texture,
            bind_group,
            decals: Vec::new(),
            dirty: false,
            enabled: false,
            tint: Pixel::WHITE,
            offset: Vec2::ZERO,
            scale: Vec2::ONE,
        }
    }
}

/// One queued decal draw: everything the compositor needs to render a region
/// of a decal texture this frame.
pub(crate) struct DecalFrame {
    pub bind_group: wgpu::BindGroup,
    /// Full decal texture size in pixels, for UV normalisation.
    pub tex_size: Vec2,
    pub src_pos: Vec2,
    pub src_size: Vec2,
    pub dst_pos: Vec2,
    pub dst_size: Vec2,
    /// Rotation in radians, clockwise, about `pivot`.
    pub angle: f32,
    /// Rotation point relative to the destination rectangle origin.
    pub pivot: Vec2,
    pub tint: Pixel,
}

// ── EngineWindow ────────────────────────────────────────────────────────────

/// A native window plus everything rendered into it: the wgpu surface and
/// composite pipeline, and the stack of layers (layer 0 is created with the
/// window and always present).
pub struct EngineWindow {
    pub(crate) window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    _projection_buffer: wgpu::Buffer,
    projection_bind_group: wgpu::BindGroup,

    pub(crate) layers: Vec<Layer>,
    /// Layer whose canvas currently receives this window's draw calls.
    pub(crate) draw_target_ix: usize,

    config: WindowConfig,
    physical_width: u32,
    physical_height: u32,

    pub(crate) keybd_focus: bool,
    pub(crate) mouse_focus: bool,
    pub(crate) shown: bool,

    pub(crate) mouse_logical: IVec2,
    pub(crate) mouse_physical: IVec2,
}

impl EngineWindow {
    /// Wrap a freshly created winit window: create its surface, composite
    /// pipeline, logical projection, and the default layer 0 (which becomes
    /// the draw target).
    pub(crate) fn create(gpu: &Gpu, window: Arc<Window>, config: WindowConfig) -> Result<Self> {
        let surface = gpu
            .instance
            .create_surface(Arc::clone(&window))
            .context("failed to create window surface")?;
        Self::with_surface(gpu, window, surface, config)
    }

    /// Like [`EngineWindow::create`] but with an existing surface — the main
    /// window's surface is created before the GPU context, for adapter
    /// compatibility.
    pub(crate) fn with_surface(
        gpu: &Gpu,
        window: Arc<Window>,
        surface: wgpu::Surface<'static>,
        config: WindowConfig,
    ) -> Result<Self> {
        let config = config.sanitised();
        let size = window.inner_size();

        let caps = surface.get_capabilities(&gpu.adapter);
        let format = caps.formats[0];

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: if config.vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&gpu.device, &surface_config);

        let pipeline =
            create_composite_pipeline(&gpu.device, format, &gpu.projection_bgl, &gpu.texture_bgl);

        // Draw calls live in logical pixel space; the projection maps that
        // onto the whole surface, which is what implements the pixel size.
        let proj =
            orthographic_projection(config.logical_width as f32, config.logical_height as f32);
        let projection_buffer = gpu.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("projection_buffer"),
            contents: bytemuck::cast_slice(&proj),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let projection_bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("projection_bg"),
            layout: &gpu.projection_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: projection_buffer.as_entire_binding(),
            }],
        });

        let screen_layer = Layer::new(gpu, config.logical_width, config.logical_height);

        let mut win = Self {
            window,
            surface,
            surface_config,
            pipeline,
            _projection_buffer: projection_buffer,
            projection_bind_group,
            layers: vec![screen_layer],
            draw_target_ix: 0,
            physical_width: size.width,
            physical_height: size.height,
            config,
            keybd_focus: false,
            mouse_focus: false,
            shown: true,
            mouse_logical: IVec2::ZERO,
            mouse_physical: IVec2::ZERO,
        };
        win.set_draw_target(0);
        Ok(win)
    }

    pub(crate) fn id(&self) -> winit::window::WindowId {
        self.window.id()
    }

    // ── Size queries ───────────────────────────────────────────────────────

    /// Logical window width — the coordinate space of draw calls.
    pub fn width(&self) -> i32 {
        self.config.logical_width as i32
    }

    pub fn height(&self) -> i32 {
        self.config.logical_height as i32
    }

    /// Size of one logical pixel in physical pixels.
    pub fn pixel_width(&self) -> i32 {
        self.config.pixel_width as i32
    }

    pub fn pixel_height(&self) -> i32 {
        self.config.pixel_height as i32
    }

    pub fn physical_width(&self) -> i32 {
        self.physical_width as i32
    }

    pub fn physical_height(&self) -> i32 {
        self.physical_height as i32
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn is_minimized(&self) -> bool {
        self.window.is_minimized().unwrap_or(false)
    }

    pub fn is_maximized(&self) -> bool {
        self.window.is_maximized()
    }

    pub fn is_keybd_focused(&self) -> bool {
        self.keybd_focus
    }

    pub fn is_mouse_focused(&self) -> bool {
        self.mouse_focus
    }

    /// Change the text in the window title bar.
    pub fn update_caption(&self, caption: &str) {
        self.window.set_title(caption);
    }

    /// Make the window visible again and raise it above other windows.
    pub fn focus(&mut self) {
        if !self.shown {
            self.window.set_visible(true);
            self.shown = true;
        }
        self.window.focus_window();
    }

    /// Hide the window (the close-button behaviour; hiding window 0 ends the
    /// main loop).
    pub(crate) fn hide(&mut self) {
        self.window.set_visible(false);
        self.shown = false;
    }

    pub(crate) fn set_mouse(&mut self, physical: IVec2) {
        self.mouse_physical = physical;
        self.mouse_logical = IVec2::new(
            physical.x / self.config.pixel_width as i32,
            physical.y / self.config.pixel_height as i32,
        );
    }

    pub(crate) fn resize(&mut self, gpu: &Gpu, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.physical_width = width;
        self.physical_height = height;
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&gpu.device, &self.surface_config);
    }

    // ── Layers ─────────────────────────────────────────────────────────────

    /// Create an additional layer (canvas + texture) and return its index.
    /// New layers start disabled.
    pub fn create_layer(&mut self, gpu: &Gpu) -> usize {
        self.layers.push(Layer::new(gpu, self.config.logical_width, self.config.logical_height));
        self.layers.len() - 1
    }

    fn layer_mut(&mut self, layer: usize, caller: &str) -> Option<&mut Layer> {
        if layer >= self.layers.len() {
            eprintln!("[window] {caller}: layer index out of range: {layer}");
            return None;
        }
        Some(&mut self.layers[layer])
    }

    /// Route subsequent draw calls to `layer`'s canvas.
    pub fn set_draw_target(&mut self, layer: usize) {
        if layer >= self.layers.len() {
            eprintln!("[window] set_draw_target: layer index out of range: {layer}");
            return;
        }
        self.draw_target_ix = layer;
        self.layers[layer].dirty = true;
    }

    /// Enable or disable a layer for rendering. Enabling marks it dirty so
    /// its texture refreshes on the next frame.
    pub fn enable_layer(&mut self, layer: usize, enable: bool) {
        if let Some(l) = self.layer_mut(layer, "enable_layer") {
            l.enabled = enable;
            l.dirty = enable;
        }
    }

    /// The offset is a normalised factor on the *scaled* canvas size, and is
    /// stored negated: an offset of (0.5, 0.0) shifts the rendered layer left
    /// by half its scaled width.
    pub fn set_layer_offset(&mut self, layer: usize, x: f32, y: f32) {
        if let Some(l) = self.layer_mut(layer, "set_layer_offset") {
            l.offset = Vec2::new(-x, -y);
            l.dirty = true;
        }
    }

    /// Stored as the reciprocal: a scale of 2 renders the layer at half size.
    pub fn set_layer_scale(&mut self, layer: usize, x: f32, y: f32) {
        if x == 0.0 || y == 0.0 {
            eprintln!("[window] set_layer_scale: zero scale ({x}, {y})");
            return;
        }
        if let Some(l) = self.layer_mut(layer, "set_layer_scale") {
            l.scale = Vec2::new(1.0 / x, 1.0 / y);
            l.dirty = true;
        }
    }

    /// Like [`EngineWindow::set_layer_scale`] but without the inversion.
    pub fn set_layer_scale_inv(&mut self, layer: usize, x: f32, y: f32) {
        if let Some(l) = self.layer_mut(layer, "set_layer_scale_inv") {
            l.scale = Vec2::new(x, y);
            l.dirty = true;
        }
    }

    pub fn set_layer_tint(&mut self, layer: usize, tint: Pixel) {
        if let Some(l) = self.layer_mut(layer, "set_layer_tint") {
            l.tint = tint;
            l.dirty = true;
        }
    }

    /// Drop all queued decal draws. Called every frame — also for hidden
    /// windows, which would otherwise pile up decals.
    pub(crate) fn clear_decal_queues(&mut self) {
        for layer in &mut self.layers {
            layer.decals.clear();
        }
    }

    // ── Compositing ────────────────────────────────────────────────────────

    /// Composite this window's layers and submit the GPU work. The returned
    /// surface frame still has to be presented; the engine presents all
    /// windows together at the end of the render cycle.
    ///
    /// Per layer, back to front (reverse creation order): upload the canvas
    /// if dirty, draw the tinted canvas quad with the layer offset/scale,
    /// then the queued decals in queue order. Decal queues are cleared
    /// unconditionally.
    pub(crate) fn render(&mut self, gpu: &Gpu) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        // Layer 0 must always be drawn.
        self.layers[0].dirty = true;
        self.layers[0].enabled = true;

        let mut verts: Vec<CompositeVertex> = Vec::new();
        let mut batches: Vec<(wgpu::BindGroup, std::ops::Range<u32>)> = Vec::new();

        for ix in (0..self.layers.len()).rev() {
            if self.layers[ix].enabled {
                if self.layers[ix].dirty {
                    gpu.upload_sprite(&self.layers[ix].texture, &self.layers[ix].canvas);
                    self.layers[ix].dirty = false;
                }

                let layer = &self.layers[ix];
                let scaled = Vec2::new(layer.canvas.width as f32, layer.canvas.height as f32)
                    * layer.scale;
                // offset already carries the sign flip from set_layer_offset
                let origin = layer.offset * scaled;

                let start = verts.len() as u32;
                push_quad(
                    &mut verts,
                    origin,
                    scaled,
                    Vec2::ZERO,
                    Vec2::ONE,
                    0.0,
                    Vec2::ZERO,
                    layer.tint,
                );
                batches.push((layer.bind_group.clone(), start..verts.len() as u32));

                for frame in &layer.decals {
                    let start = verts.len() as u32;
                    let uv_min = frame.src_pos / frame.tex_size;
                    let uv_max = (frame.src_pos + frame.src_size) / frame.tex_size;
                    push_quad(
                        &mut verts,
                        frame.dst_pos,
                        frame.dst_size,
                        uv_min,
                        uv_max,
                        frame.angle,
                        frame.pivot,
                        frame.tint,
                    );
                    batches.push((frame.bind_group.clone(), start..verts.len() as u32));
                }
            }
            self.layers[ix].decals.clear();
        }

        let frame = self.surface.get_current_texture()?;
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let vbuf = gpu.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("composite_vertex_buffer"),
            contents: bytemuck::cast_slice(&verts),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("composite_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.projection_bind_group, &[]);
            pass.set_vertex_buffer(0, vbuf.slice(..));
            for (bind_group, range) in &batches {
                pass.set_bind_group(1, bind_group, &[]);
                pass.draw(range.clone(), 0..1);
            }
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        Ok(frame)
    }
}

/// Append the 6 vertices of a (possibly rotated) textured quad.
///
/// Corners are rotated clockwise by `angle` around `pivot` (relative to the
/// destination origin) on the CPU; the GPU only ever sees triangles.
fn push_quad(
    verts: &mut Vec<CompositeVertex>,
    dst_pos: Vec2,
    dst_size: Vec2,
    uv_min: Vec2,
    uv_max: Vec2,
    angle: f32,
    pivot: Vec2,
    tint: Pixel,
) {
    let (sin, cos) = angle.sin_cos();
    let rotate = |corner: Vec2| -> [f32; 2] {
        let d = corner - pivot;
        // clockwise rotation in y-down screen space
        let p = dst_pos + pivot + Vec2::new(cos * d.x - sin * d.y, sin * d.x + cos * d.y);
        [p.x, p.y]
    };

    let tint = tint.to_f32_array();
    let tl = CompositeVertex {
        position: rotate(Vec2::new(0.0, 0.0)),
        uv: [uv_min.x, uv_min.y],
        tint,
    };
    let tr = CompositeVertex {
        position: rotate(Vec2::new(dst_size.x, 0.0)),
        uv: [uv_max.x, uv_min.y],
        tint,
    };
    let bl = CompositeVertex {
        position: rotate(Vec2::new(0.0, dst_size.y)),
        uv: [uv_min.x, uv_max.y],
        tint,
    };
    let br = CompositeVertex {
        position: rotate(Vec2::new(dst_size.x, dst_size.y)),
        uv: [uv_max.x, uv_max.y],
        tint,
    };
    verts.extend_from_slice(&[tl, bl, tr, tr, bl, br]);
}
