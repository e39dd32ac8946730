pub mod pipeline;

use anyhow::{Context, Result};

use crate::sprite::Sprite;

/// Shared GPU context: one instance/device/queue serves every window.
///
/// Also owns the bind group layouts and the nearest-neighbour sampler used by
/// all composite pipelines, so layer and decal textures from any window bind
/// interchangeably.
pub struct Gpu {
    pub(crate) instance: wgpu::Instance,
    pub(crate) adapter: wgpu::Adapter,
    pub(crate) device: wgpu::Device,
    pub(crate) queue: wgpu::Queue,
    pub(crate) projection_bgl: wgpu::BindGroupLayout,
    pub(crate) texture_bgl: wgpu::BindGroupLayout,
    pub(crate) sampler: wgpu::Sampler,
}

impl Gpu {
    /// Acquire an adapter compatible with `surface` (the main window's) and
    /// set up the shared device state. Blocking; called once at startup.
    pub fn new(instance: wgpu::Instance, surface: &wgpu::Surface) -> Result<Self> {
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            compatible_surface: Some(surface),
            ..Default::default()
        }))
        .context("no suitable GPU adapter found")?;

        let (device, queue) =
            pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default()))
                .context("failed to create GPU device")?;

        let projection_bgl = pipeline::create_projection_bind_group_layout(&device);
        let texture_bgl = pipeline::create_texture_bind_group_layout(&device);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Ok(Self { instance, adapter, device, queue, projection_bgl, texture_bgl, sampler })
    }

    /// Create a texture sized for a sprite, plus its composite bind group.
    ///
    /// `Bgra8Unorm` matches the byte order of the engine's packed `ARGB8888`
    /// pixels on little-endian hosts, so sprite buffers upload verbatim.
    pub(crate) fn create_sprite_texture(
        &self,
        width: u32,
        height: u32,
    ) -> (wgpu::Texture, wgpu::BindGroup) {
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("sprite_texture"),
            size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Bgra8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sprite_texture_bg"),
            layout: &self.texture_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        (texture, bind_group)
    }

    /// Re-upload a whole sprite into its texture.
    pub(crate) fn upload_sprite(&self, texture: &wgpu::Texture, sprite: &Sprite) {
        let (w, h) = (sprite.width as u32, sprite.height as u32);
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(sprite.raw()),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * w),
                rows_per_image: Some(h),
            },
            wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
        );
    }
}
