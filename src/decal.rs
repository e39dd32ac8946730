use anyhow::{Result, bail};

use crate::renderer::Gpu;
use crate::sprite::Sprite;

/// A GPU-resident texture mirroring a [`Sprite`]'s pixels.
///
/// The decal copies the sprite's pixels at creation (and on
/// [`Decal::update`]); it never owns the sprite, and dropping a decal leaves
/// the sprite untouched. Decals are queued for hardware compositing with the
/// `Engine::draw_*decal` family — they bypass the software rasterizer
/// entirely.
pub struct Decal {
    pub(crate) texture: wgpu::Texture,
    pub(crate) bind_group: wgpu::BindGroup,
    pub width: i32,
    pub height: i32,
}

impl Decal {
    pub(crate) fn new(gpu: &Gpu, sprite: &Sprite) -> Result<Self> {
        if sprite.is_empty() {
            bail!("cannot create a decal from an empty sprite");
        }
        let (texture, bind_group) =
            gpu.create_sprite_texture(sprite.width as u32, sprite.height as u32);
        gpu.upload_sprite(&texture, sprite);
        Ok(Self { texture, bind_group, width: sprite.width, height: sprite.height })
    }

    /// Push the sprite's current pixels back into GPU memory. The sprite
    /// must have the same dimensions the decal was created with.
    pub(crate) fn update(&self, gpu: &Gpu, sprite: &Sprite) {
        if sprite.width != self.width || sprite.height != self.height {
            eprintln!(
                "[decal] update(): sprite is {}x{} but decal is {}x{}, skipping upload",
                sprite.width, sprite.height, self.width, self.height
            );
            return;
        }
        gpu.upload_sprite(&self.texture, sprite);
    }
}
