use glam::Vec2;

use crate::draw::Painter;
use crate::font_data::{
    FONT_CHAR_OFFSET, FONT_GLYPHS, FONT_TILE_H, FONT_TILE_W, FONT_TILES_X, FONT_TILES_Y,
};
use crate::pixel::Pixel;
use crate::sprite::Sprite;

// ── Glyph metrics ───────────────────────────────────────────────────────────

/// Blank border around one glyph tile: the number of pixel columns/rows on
/// each side that can be removed without touching the glyph.
#[derive(Copy, Clone, Debug, Default)]
pub struct GlyphMargins {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

/// One character of laid-out decal text: a source rectangle into the font
/// sprite and a destination rectangle on screen.
#[derive(Copy, Clone, Debug)]
pub struct GlyphQuad {
    pub src_pos: Vec2,
    pub src_size: Vec2,
    pub dst_pos: Vec2,
    pub dst_size: Vec2,
}

// ── SpriteFont ──────────────────────────────────────────────────────────────

/// Bitmap font backed by a sprite sheet of fixed-size tiles.
///
/// The default font is decoded from the embedded 8×8 glyph bitmaps at
/// construction. Fixed-advance rendering uses the tile size; proportional
/// rendering shrinks the per-glyph margins down to a nominal spacing derived
/// from the width of the `'|'` glyph.
pub struct SpriteFont {
    sprite: Sprite,
    tiles_x: i32,
    tile_w: i32,
    tile_h: i32,
    char_offset: i32,
    glyph_count: i32,
    margins: Vec<GlyphMargins>,
    nominal_margin: i32,
    /// Inter-character spacing in units of the nominal margin.
    inter_char_spacing: i32,
    /// Advance of the space character in units of the nominal margin.
    space_advance: i32,
}

impl SpriteFont {
    /// Build the default embedded 8×8 ASCII font.
    pub fn default_font() -> Self {
        let w = FONT_TILES_X * FONT_TILE_W;
        let h = FONT_TILES_Y * FONT_TILE_H;
        let mut sprite = Sprite::new(w, h);
        for (i, glyph) in FONT_GLYPHS.iter().enumerate() {
            let tx = (i as i32 % FONT_TILES_X) * FONT_TILE_W;
            let ty = (i as i32 / FONT_TILES_X) * FONT_TILE_H;
            for (row, bits) in glyph.iter().enumerate() {
                for col in 0..FONT_TILE_W {
                    if bits & (1 << col) != 0 {
                        sprite.set_pixel(tx + col, ty + row as i32, Pixel::WHITE);
                    }
                }
            }
        }
        Self::from_sprite(sprite, FONT_TILES_X, FONT_TILE_W, FONT_TILE_H, FONT_CHAR_OFFSET)
    }

    /// Build a font from an existing tile-sheet sprite. `char_offset` is the
    /// codepoint of the first tile.
    pub fn from_sprite(
        sprite: Sprite,
        tiles_x: i32,
        tile_w: i32,
        tile_h: i32,
        char_offset: i32,
    ) -> Self {
        let glyph_count = if tile_w > 0 && tile_h > 0 {
            (sprite.width / tile_w) * (sprite.height / tile_h)
        } else {
            0
        };
        let mut font = Self {
            sprite,
            tiles_x,
            tile_w,
            tile_h,
            char_offset,
            glyph_count,
            margins: Vec::new(),
            nominal_margin: 1,
            inter_char_spacing: 1,
            space_advance: 4,
        };
        font.scan_margins();
        font
    }

    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    pub fn tile_size(&self) -> (i32, i32) {
        (self.tile_w, self.tile_h)
    }

    pub fn margins(&self, ch: char) -> GlyphMargins {
        match self.glyph_index(ch) {
            Some(ix) => self.margins[ix as usize],
            None => GlyphMargins::default(),
        }
    }

    fn glyph_index(&self, ch: char) -> Option<i32> {
        let ix = ch as i32 - self.char_offset;
        (ix >= 0 && ix < self.glyph_count).then_some(ix)
    }

    /// Determine the blank margins of every glyph tile. The nominal margin —
    /// the unit of proportional spacing — is the ink width of the slimmest
    /// useful glyph, `'|'`.
    fn scan_margins(&mut self) {
        self.margins.clear();
        let blank = |x: i32, y: i32| self.sprite.pixel(x, y).a == 0;
        for i in 0..self.glyph_count {
            let px = (i % self.tiles_x) * self.tile_w;
            let py = (i / self.tiles_x) * self.tile_h;

            let mut m = GlyphMargins {
                left: self.tile_w,
                right: self.tile_w,
                top: self.tile_h,
                bottom: self.tile_h,
            };
            'left: for x in 0..self.tile_w {
                for y in 0..self.tile_h {
                    if !blank(px + x, py + y) {
                        m.left = x;
                        break 'left;
                    }
                }
            }
            'right: for x in (0..self.tile_w).rev() {
                for y in 0..self.tile_h {
                    if !blank(px + x, py + y) {
                        m.right = self.tile_w - 1 - x;
                        break 'right;
                    }
                }
            }
            'top: for y in 0..self.tile_h {
                for x in 0..self.tile_w {
                    if !blank(px + x, py + y) {
                        m.top = y;
                        break 'top;
                    }
                }
            }
            'bottom: for y in (0..self.tile_h).rev() {
                for x in 0..self.tile_w {
                    if !blank(px + x, py + y) {
                        m.bottom = self.tile_h - 1 - y;
                        break 'bottom;
                    }
                }
            }
            self.margins.push(m);
        }

        if let Some(ix) = self.glyph_index('|') {
            let m = self.margins[ix as usize];
            self.nominal_margin = (self.tile_w - (m.left + m.right)).max(1);
        }
    }

    // ── Sprite-path rendering ──────────────────────────────────────────────

    /// Draw `text` with a fixed advance of one tile per character. `'\n'`
    /// returns to the start x and advances one (scaled) tile down.
    pub fn draw_string(
        &self,
        painter: &mut Painter,
        x: i32,
        y: i32,
        text: &str,
        colour: Pixel,
        scale: i32,
    ) {
        if scale < 1 {
            return;
        }
        let mut x_off = 0;
        let mut y_off = 0;
        for ch in text.chars() {
            if ch == '\n' {
                y_off += self.tile_h * scale;
                x_off = 0;
                continue;
            }
            self.blit_glyph(painter, x + x_off, y + y_off, ch, colour, scale);
            x_off += self.tile_w * scale;
        }
    }

    /// Like [`SpriteFont::draw_string`] but with proportional horizontal
    /// spacing: surplus glyph margins beyond the nominal spacing are folded
    /// into an accumulated correction.
    pub fn draw_string_prop(
        &self,
        painter: &mut Painter,
        x: i32,
        y: i32,
        text: &str,
        colour: Pixel,
        scale: i32,
    ) {
        if scale < 1 {
            return;
        }
        let mut x_off = 0;
        let mut y_off = 0;
        let mut spacing_acc = 0;
        for ch in text.chars() {
            if ch == '\n' {
                y_off += self.tile_h * scale;
                x_off = 0;
                spacing_acc = 0;
                continue;
            }
            spacing_acc += self.leading_correction(ch);
            self.blit_glyph(painter, x + x_off - spacing_acc * scale, y + y_off, ch, colour, scale);
            spacing_acc += self.trailing_correction(ch);
            x_off += self.tile_w * scale;
        }
    }

    fn blit_glyph(
        &self,
        painter: &mut Painter,
        x: i32,
        y: i32,
        ch: char,
        colour: Pixel,
        scale: i32,
    ) {
        let Some(ix) = self.glyph_index(ch) else { return };
        let sx = (ix % self.tiles_x) * self.tile_w;
        let sy = (ix / self.tiles_x) * self.tile_h;
        for gy in 0..self.tile_h {
            for gx in 0..self.tile_w {
                if self.sprite.pixel(sx + gx, sy + gy).a == 0 {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        painter.draw(x + gx * scale + dx, y + gy * scale + dy, colour);
                    }
                }
            }
        }
    }

    /// Spacing removed before drawing `ch` in proportional mode.
    fn leading_correction(&self, ch: char) -> i32 {
        if ch == ' ' {
            return self.tile_w - self.nominal_margin * self.space_advance;
        }
        match self.glyph_index(ch) {
            Some(ix) => {
                (self.margins[ix as usize].left - self.nominal_margin * self.inter_char_spacing)
                    .max(0)
            }
            None => 0,
        }
    }

    /// Spacing removed after drawing `ch` in proportional mode.
    fn trailing_correction(&self, ch: char) -> i32 {
        if ch == ' ' {
            return 0;
        }
        match self.glyph_index(ch) {
            Some(ix) => {
                (self.margins[ix as usize].right - self.nominal_margin * self.inter_char_spacing)
                    .max(0)
            }
            None => 0,
        }
    }

    // ── Decal-path layout ──────────────────────────────────────────────────

    /// Work out (source, destination) rectangles for rendering `text` from
    /// the font decal, one quad per visible character, with fixed advance.
    pub fn layout_string(&self, x: f32, y: f32, text: &str, scale: Vec2) -> Vec<GlyphQuad> {
        let mut quads = Vec::new();
        let mut x_off = 0.0;
        let mut y_off = 0.0;
        for ch in text.chars() {
            if ch == '\n' {
                y_off += self.tile_h as f32 * scale.y;
                x_off = 0.0;
                continue;
            }
            if let Some(quad) = self.glyph_quad(ch, x + x_off, y + y_off, scale) {
                quads.push(quad);
            }
            x_off += self.tile_w as f32 * scale.x;
        }
        quads
    }

    /// Proportional variant of [`SpriteFont::layout_string`].
    pub fn layout_string_prop(&self, x: f32, y: f32, text: &str, scale: Vec2) -> Vec<GlyphQuad> {
        let mut quads = Vec::new();
        let mut x_off = 0.0;
        let mut y_off = 0.0;
        let mut spacing_acc = 0;
        for ch in text.chars() {
            if ch == '\n' {
                y_off += self.tile_h as f32 * scale.y;
                x_off = 0.0;
                spacing_acc = 0;
                continue;
            }
            spacing_acc += self.leading_correction(ch);
            let gx = x + x_off - spacing_acc as f32 * scale.x;
            if let Some(quad) = self.glyph_quad(ch, gx, y + y_off, scale) {
                quads.push(quad);
            }
            spacing_acc += self.trailing_correction(ch);
            x_off += self.tile_w as f32 * scale.x;
        }
        quads
    }

    fn glyph_quad(&self, ch: char, x: f32, y: f32, scale: Vec2) -> Option<GlyphQuad> {
        let ix = self.glyph_index(ch)?;
        let sx = (ix % self.tiles_x) * self.tile_w;
        let sy = (ix / self.tiles_x) * self.tile_h;
        Some(GlyphQuad {
            src_pos: Vec2::new(sx as f32, sy as f32),
            src_size: Vec2::new(self.tile_w as f32, self.tile_h as f32),
            dst_pos: Vec2::new(x, y),
            dst_size: Vec2::new(self.tile_w as f32 * scale.x, self.tile_h as f32 * scale.y),
        })
    }
}
