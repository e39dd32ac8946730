use std::path::Path;

use crate::pixel::{Pixel, PixelFormat};

// ── Flip ────────────────────────────────────────────────────────────────────

/// Mirror mode for sprite blits.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Flip {
    #[default]
    None,
    Horizontal,
    Vertical,
    Both,
}

// ── Sprite ──────────────────────────────────────────────────────────────────

/// An owned off-screen pixel buffer.
///
/// Pixels are stored packed according to the sprite's [`PixelFormat`]. A
/// sprite that failed to load (or was created empty) has `width == height ==
/// 0` and an empty buffer; [`Sprite::is_empty`] reports exactly that state.
pub struct Sprite {
    pub width: i32,
    pub height: i32,
    format: PixelFormat,
    data: Vec<u32>,
}

impl Sprite {
    /// An empty sprite — no buffer, zero size.
    pub fn empty() -> Self {
        Self { width: 0, height: 0, format: PixelFormat::ARGB8888, data: Vec::new() }
    }

    /// A blank (transparent) sprite of the given size in the engine format.
    pub fn new(w: i32, h: i32) -> Self {
        Self::with_format(w, h, PixelFormat::ARGB8888)
    }

    pub fn with_format(w: i32, h: i32, format: PixelFormat) -> Self {
        if w <= 0 || h <= 0 {
            eprintln!("[sprite] invalid sprite size {w}x{h}, creating empty sprite");
            return Self { format, ..Self::empty() };
        }
        Self {
            width: w,
            height: h,
            format,
            data: vec![0u32; (w * h) as usize],
        }
    }

    /// Load a sprite from a PNG or JPEG file.
    ///
    /// On failure this logs a warning and returns an empty sprite, so the
    /// caller can keep running and check [`Sprite::is_empty`] if it cares.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Self {
        Self::from_file_with_format(path, PixelFormat::ARGB8888)
    }

    pub fn from_file_with_format<P: AsRef<Path>>(path: P, format: PixelFormat) -> Self {
        let path = path.as_ref();
        let img = match image::open(path) {
            Ok(img) => img.to_rgba8(),
            Err(e) => {
                eprintln!("[sprite] failed to load '{}': {e}", path.display());
                return Self { format, ..Self::empty() };
            }
        };
        let (w, h) = img.dimensions();
        let mut sprite = Self::with_format(w as i32, h as i32, format);
        for (i, px) in img.pixels().enumerate() {
            let [r, g, b, a] = px.0;
            sprite.data[i] = Pixel::rgba(r, g, b, a).encode(&format);
        }
        sprite
    }

    /// True when the sprite has no pixel buffer.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// The raw packed pixels, row-major. Used by the renderer for uploads.
    pub fn raw(&self) -> &[u32] {
        &self.data
    }

    /// Pixel at `(x, y)`. Out-of-range coordinates log a warning and return
    /// the CYAN sentinel.
    pub fn pixel(&self, x: i32, y: i32) -> Pixel {
        if x < 0 || x >= self.width {
            eprintln!("[sprite] pixel(): x out of range: {x} (width {})", self.width);
            return Pixel::CYAN;
        }
        if y < 0 || y >= self.height {
            eprintln!("[sprite] pixel(): y out of range: {y} (height {})", self.height);
            return Pixel::CYAN;
        }
        Pixel::decode(self.data[(y * self.width + x) as usize], &self.format)
    }

    /// Set the pixel at `(x, y)`. Out-of-range coordinates log and do nothing.
    pub fn set_pixel(&mut self, x: i32, y: i32, pix: Pixel) {
        if x < 0 || x >= self.width {
            eprintln!("[sprite] set_pixel(): x out of range: {x} (width {})", self.width);
        } else if y < 0 || y >= self.height {
            eprintln!("[sprite] set_pixel(): y out of range: {y} (height {})", self.height);
        } else {
            self.data[(y * self.width + x) as usize] = pix.encode(&self.format);
        }
    }

    /// Raw encoded read without range reporting; callers guarantee bounds.
    pub(crate) fn encoded_unchecked(&self, x: i32, y: i32) -> u32 {
        self.data[(y * self.width + x) as usize]
    }

    /// Raw encoded write without range reporting; callers guarantee bounds.
    pub(crate) fn write_encoded_unchecked(&mut self, x: i32, y: i32, encoded: u32) {
        self.data[(y * self.width + x) as usize] = encoded;
    }

    /// Sample at normalised coordinates `(u, v)` in `[0.0, 1.0]`.
    /// Coordinates outside the unit square return the MAGENTA sentinel.
    pub fn sample(&self, u: f32, v: f32) -> Pixel {
        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
            return Pixel::MAGENTA;
        }
        let x = ((u * self.width as f32) as i32).clamp(0, self.width - 1);
        let y = ((v * self.height as f32) as i32).clamp(0, self.height - 1);
        self.pixel(x, y)
    }

    /// An exact copy of this sprite.
    pub fn duplicate(&self) -> Sprite {
        Sprite {
            width: self.width,
            height: self.height,
            format: self.format,
            data: self.data.clone(),
        }
    }

    /// A copy of the region starting at `(x, y)` with size `(w, h)`.
    /// Source pixels outside this sprite are left blank in the copy.
    pub fn duplicate_region(&self, x: i32, y: i32, w: i32, h: i32) -> Sprite {
        let mut copy = Sprite::with_format(w, h, self.format);
        if copy.is_empty() {
            return copy;
        }
        for dy in 0..h {
            for dx in 0..w {
                let sx = x + dx;
                let sy = y + dy;
                if sx >= 0 && sx < self.width && sy >= 0 && sy < self.height {
                    copy.data[(dy * w + dx) as usize] = self.data[(sy * self.width + sx) as usize];
                }
            }
        }
        copy
    }

    /// Fill the whole buffer with one colour.
    pub fn fill(&mut self, colour: Pixel) {
        let encoded = colour.encode(&self.format);
        self.data.fill(encoded);
    }
}
