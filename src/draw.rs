// =============================================================================
// DRAW.RS — software rasterizer
//
// All primitives write through a single blended pixel function that applies
// the current pixel mode (overwrite / mask / alpha / custom), so every shape
// composes the same way. The algorithms are the classics: Bresenham lines
// with a 32-bit stipple pattern, midpoint circles with 8-way symmetry, and a
// two-phase integer scanline fill for triangles.
// =============================================================================

use crate::pixel::{BlendFn, Pixel, PixelMode, blend_pixel};
use crate::sprite::{Flip, Sprite};

/// Borrows a target sprite plus the active blend policy and rasterizes onto
/// it. The engine hands one of these out for its current draw target; tests
/// construct them directly over a plain [`Sprite`].
pub struct Painter<'a> {
    target: &'a mut Sprite,
    mode: PixelMode,
    blend_factor: f32,
    blend_fn: Option<&'a BlendFn>,
}

impl<'a> Painter<'a> {
    /// Painter in `Normal` (overwrite) mode.
    pub fn new(target: &'a mut Sprite) -> Self {
        Self { target, mode: PixelMode::Normal, blend_factor: 1.0, blend_fn: None }
    }

    pub fn with_mode(
        target: &'a mut Sprite,
        mode: PixelMode,
        blend_factor: f32,
        blend_fn: Option<&'a BlendFn>,
    ) -> Self {
        Self { target, mode, blend_factor, blend_fn }
    }

    pub fn width(&self) -> i32 {
        self.target.width
    }

    pub fn height(&self) -> i32 {
        self.target.height
    }

    // ── Pixel writing ──────────────────────────────────────────────────────

    /// Combine `colour` with the destination pixel and write the result.
    /// Callers guarantee `(x, y)` is inside the target.
    fn blended_write(&mut self, x: i32, y: i32, colour: Pixel) {
        let fmt = self.target.format();
        if self.mode == PixelMode::Normal {
            self.target.write_encoded_unchecked(x, y, colour.encode(&fmt));
            return;
        }
        let dst = Pixel::decode(self.target.encoded_unchecked(x, y), &fmt);
        if let Some(out) =
            blend_pixel(self.mode, self.blend_factor, self.blend_fn, x, y, colour, dst)
        {
            self.target.write_encoded_unchecked(x, y, out.encode(&fmt));
        }
    }

    /// Draw one pixel. Out-of-bounds coordinates are silently dropped.
    pub fn draw(&mut self, x: i32, y: i32, colour: Pixel) {
        if x >= 0 && x < self.target.width && y >= 0 && y < self.target.height {
            self.blended_write(x, y, colour);
        }
    }

    /// Fill the whole target.
    pub fn clear(&mut self, colour: Pixel) {
        let (w, h) = (self.target.width, self.target.height);
        self.fill_rect(0, 0, w, h, colour);
    }

    // ── Lines ──────────────────────────────────────────────────────────────

    fn hline(&mut self, mut x0: i32, mut x1: i32, y: i32, colour: Pixel) {
        if x0 > x1 {
            std::mem::swap(&mut x0, &mut x1);
        }
        for x in x0..=x1 {
            self.draw(x, y, colour);
        }
    }

    fn vline(&mut self, x: i32, mut y0: i32, mut y1: i32, colour: Pixel) {
        if y0 > y1 {
            std::mem::swap(&mut y0, &mut y1);
        }
        for y in y0..=y1 {
            self.draw(x, y, colour);
        }
    }

    /// Bresenham line from `(x0, y0)` to `(x1, y1)`.
    ///
    /// `pattern` is a 32-bit repeating stipple sampled by pixel position
    /// relative to the start of the (normalised) span, wrapping every 32
    /// pixels; `0xFFFF_FFFF` draws a solid line.
    pub fn draw_line(
        &mut self,
        mut x0: i32,
        mut y0: i32,
        mut x1: i32,
        mut y1: i32,
        colour: Pixel,
        pattern: u32,
    ) {
        // The `cur` dot of the line maps onto a bit of the pattern; draw it
        // only when that bit is set.
        let pattern_active = |fst: i32, cur: i32, pattern: u32| -> bool {
            let bit = (cur - fst).rem_euclid(32) as u32;
            pattern & (1 << bit) != 0
        };

        if x0 == x1 {
            // vertical
            if y0 > y1 {
                std::mem::swap(&mut y0, &mut y1);
            }
            for y in y0..=y1 {
                if pattern_active(y0, y, pattern) {
                    self.draw(x0, y, colour);
                }
            }
        } else if y0 == y1 {
            // horizontal
            if x0 > x1 {
                std::mem::swap(&mut x0, &mut x1);
            }
            for x in x0..=x1 {
                if pattern_active(x0, x, pattern) {
                    self.draw(x, y0, colour);
                }
            }
        } else if (y1 - y0).abs() < (x1 - x0).abs() {
            // low gradient — one pixel per x step
            if x0 > x1 {
                std::mem::swap(&mut x0, &mut x1);
                std::mem::swap(&mut y0, &mut y1);
            }
            let dx = x1 - x0;
            let mut dy = y1 - y0;
            let yi = if dy < 0 {
                dy = -dy;
                -1
            } else {
                1
            };
            let mut d = 2 * dy - dx;
            let mut y = y0;
            for x in x0..=x1 {
                if pattern_active(x0, x, pattern) {
                    self.draw(x, y, colour);
                }
                if d > 0 {
                    y += yi;
                    d += 2 * (dy - dx);
                } else {
                    d += 2 * dy;
                }
            }
        } else {
            // high gradient — one pixel per y step
            if y0 > y1 {
                std::mem::swap(&mut y0, &mut y1);
                std::mem::swap(&mut x0, &mut x1);
            }
            let mut dx = x1 - x0;
            let dy = y1 - y0;
            let xi = if dx < 0 {
                dx = -dx;
                -1
            } else {
                1
            };
            let mut d = 2 * dx - dy;
            let mut x = x0;
            for y in y0..=y1 {
                if pattern_active(y0, y, pattern) {
                    self.draw(x, y, colour);
                }
                if d > 0 {
                    x += xi;
                    d += 2 * (dx - dy);
                } else {
                    d += 2 * dx;
                }
            }
        }
    }

    // ── Rectangles ─────────────────────────────────────────────────────────

    /// Stroke a rectangle with corners `(x, y)` and `(x + w, y + h)`.
    pub fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, colour: Pixel) {
        self.hline(x, x + w, y, colour);
        self.hline(x, x + w, y + h, colour);
        self.vline(x, y, y + h, colour);
        self.vline(x + w, y, y + h, colour);
    }

    /// Fill a rectangle, clamped to the target bounds. Negative or oversized
    /// rectangles never write outside `[0, width) × [0, height)`.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, colour: Pixel) {
        let x0 = x.clamp(0, self.target.width);
        let y0 = y.clamp(0, self.target.height);
        let x1 = (x + w).clamp(0, self.target.width);
        let y1 = (y + h).clamp(0, self.target.height);
        for j in y0..y1 {
            for i in x0..x1 {
                self.blended_write(i, j, colour);
            }
        }
    }

    // ── Triangles ──────────────────────────────────────────────────────────

    pub fn draw_triangle(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        colour: Pixel,
    ) {
        self.draw_line(x0, y0, x1, y1, colour, 0xFFFF_FFFF);
        self.draw_line(x1, y1, x2, y2, colour, 0xFFFF_FFFF);
        self.draw_line(x2, y2, x0, y0, colour, 0xFFFF_FFFF);
    }

    /// Scanline triangle fill: vertices sorted by y, then the two active
    /// edges are walked with integer error accumulation — flat-bottom half
    /// first, flat-top half second — filling a horizontal span per scanline.
    pub fn fill_triangle(
        &mut self,
        mut x1: i32,
        mut y1: i32,
        mut x2: i32,
        mut y2: i32,
        mut x3: i32,
        mut y3: i32,
        colour: Pixel,
    ) {
        if y1 > y2 {
            std::mem::swap(&mut y1, &mut y2);
            std::mem::swap(&mut x1, &mut x2);
        }
        if y1 > y3 {
            std::mem::swap(&mut y1, &mut y3);
            std::mem::swap(&mut x1, &mut x3);
        }
        if y2 > y3 {
            std::mem::swap(&mut y2, &mut y3);
            std::mem::swap(&mut x2, &mut x3);
        }

        let mut t1x = x1;
        let mut t2x = x1;
        let mut y = y1;

        let mut dx1 = x2 - x1;
        let mut signx1 = if dx1 < 0 {
            dx1 = -dx1;
            -1
        } else {
            1
        };
        let mut dy1 = y2 - y1;

        let mut dx2 = x3 - x1;
        let signx2 = if dx2 < 0 {
            dx2 = -dx2;
            -1
        } else {
            1
        };
        let mut dy2 = y3 - y1;

        let mut changed1 = false;
        let mut changed2 = false;
        if dy1 > dx1 {
            std::mem::swap(&mut dx1, &mut dy1);
            changed1 = true;
        }
        if dy2 > dx2 {
            std::mem::swap(&mut dx2, &mut dy2);
            changed2 = true;
        }

        let mut e2 = dx2 >> 1;
        let mut e1;

        // First half: top vertex down to the middle vertex.
        if y1 != y2 {
            e1 = dx1 >> 1;
            let mut i = 0;
            while i < dx1 {
                let mut t1xp = 0;
                let mut t2xp = 0;
                let (mut minx, mut maxx) = if t1x < t2x { (t1x, t2x) } else { (t2x, t1x) };

                // walk edge 1 until its y is about to change
                'edge1: while i < dx1 {
                    i += 1;
                    e1 += dy1;
                    while e1 >= dx1 {
                        e1 -= dx1;
                        if changed1 {
                            t1xp = signx1;
                        } else {
                            break 'edge1;
                        }
                    }
                    if changed1 {
                        break;
                    }
                    t1x += signx1;
                }
                // walk edge 2 until its y is about to change
                'edge2: loop {
                    e2 += dy2;
                    while e2 >= dx2 {
                        e2 -= dx2;
                        if changed2 {
                            t2xp = signx2;
                        } else {
                            break 'edge2;
                        }
                    }
                    if changed2 {
                        break;
                    }
                    t2x += signx2;
                }

                minx = minx.min(t1x).min(t2x);
                maxx = maxx.max(t1x).max(t2x);
                self.hline(minx, maxx, y, colour);

                if !changed1 {
                    t1x += signx1;
                }
                t1x += t1xp;
                if !changed2 {
                    t2x += signx2;
                }
                t2x += t2xp;
                y += 1;
                if y == y2 {
                    break;
                }
            }
        }

        // Second half: middle vertex down to the bottom vertex. Edge 2 (the
        // long one) keeps its accumulated error from the first half.
        dx1 = x3 - x2;
        signx1 = if dx1 < 0 {
            dx1 = -dx1;
            -1
        } else {
            1
        };
        dy1 = y3 - y2;
        t1x = x2;
        changed1 = false;
        if dy1 > dx1 {
            std::mem::swap(&mut dx1, &mut dy1);
            changed1 = true;
        }
        e1 = dx1 >> 1;

        let mut i = 0;
        while i <= dx1 {
            let mut t1xp = 0;
            let mut t2xp = 0;
            let (mut minx, mut maxx) = if t1x < t2x { (t1x, t2x) } else { (t2x, t1x) };

            'edge1: while i < dx1 {
                e1 += dy1;
                while e1 >= dx1 {
                    e1 -= dx1;
                    if changed1 {
                        t1xp = signx1;
                        break;
                    } else {
                        break 'edge1;
                    }
                }
                if changed1 {
                    break;
                }
                t1x += signx1;
                if i < dx1 {
                    i += 1;
                }
            }
            'edge2: while t2x != x3 {
                e2 += dy2;
                while e2 >= dx2 {
                    e2 -= dx2;
                    if changed2 {
                        t2xp = signx2;
                    } else {
                        break 'edge2;
                    }
                }
                if changed2 {
                    break;
                }
                t2x += signx2;
            }

            minx = minx.min(t1x).min(t2x);
            maxx = maxx.max(t1x).max(t2x);
            self.hline(minx, maxx, y, colour);

            if !changed1 {
                t1x += signx1;
            }
            t1x += t1xp;
            if !changed2 {
                t2x += signx2;
            }
            t2x += t2xp;
            y += 1;
            if y > y3 {
                return;
            }
            i += 1;
        }
    }

    // ── Circles ────────────────────────────────────────────────────────────

    /// Midpoint circle stroke. Only one octant is computed; the rest comes
    /// from 8-way symmetry.
    pub fn draw_circle(&mut self, xc: i32, yc: i32, r: i32, colour: Pixel) {
        if r < 0 {
            eprintln!("[draw] draw_circle(): negative radius {r}");
            return;
        }
        let mut pk = 3 - 2 * r;
        let mut x = 0;
        let mut y = r;
        self.circle_octants(xc, yc, x, y, colour);
        while x < y {
            if pk <= 0 {
                pk += 4 * x + 6;
                x += 1;
            } else {
                pk += 4 * (x - y) + 10;
                x += 1;
                y -= 1;
            }
            self.circle_octants(xc, yc, x, y, colour);
        }
    }

    fn circle_octants(&mut self, xc: i32, yc: i32, x: i32, y: i32, colour: Pixel) {
        self.draw(xc + x, yc + y, colour);
        self.draw(xc - x, yc + y, colour);
        self.draw(xc + x, yc - y, colour);
        self.draw(xc - x, yc - y, colour);
        self.draw(xc + y, yc + x, colour);
        self.draw(xc - y, yc + x, colour);
        self.draw(xc + y, yc - x, colour);
        self.draw(xc - y, yc - x, colour);
    }

    /// Midpoint circle fill: horizontal spans per scan instead of points.
    pub fn fill_circle(&mut self, xc: i32, yc: i32, r: i32, colour: Pixel) {
        if r < 0 {
            eprintln!("[draw] fill_circle(): negative radius {r}");
            return;
        }
        let mut pk = 3 - 2 * r;
        let mut x = 0;
        let mut y = r;
        while x <= y {
            self.hline(xc - y, xc + y, yc - x, colour);
            if x > 0 {
                self.hline(xc - y, xc + y, yc + x, colour);
            }
            if pk < 0 {
                pk += 4 * x + 6;
                x += 1;
            } else {
                if x != y {
                    self.hline(xc - x, xc + x, yc - y, colour);
                    self.hline(xc - x, xc + x, yc + y, colour);
                }
                pk += 4 * (x - y) + 10;
                x += 1;
                y -= 1;
            }
        }
    }

    // ── Sprite blitting ────────────────────────────────────────────────────

    /// Blit `sprite` at `(x, y)` with an integer `scale` and optional flip.
    /// Every source pixel routes through the blended writer, so the current
    /// pixel mode applies (use `Mask` or `Alpha` for transparent sprites).
    pub fn draw_sprite(&mut self, x: i32, y: i32, sprite: &Sprite, scale: i32, flip: Flip) {
        self.draw_partial_sprite(x, y, sprite, 0, 0, sprite.width, sprite.height, scale, flip);
    }

    /// Blit the `(ox, oy)..(ox + w, oy + h)` region of `sprite` at `(x, y)`.
    pub fn draw_partial_sprite(
        &mut self,
        x: i32,
        y: i32,
        sprite: &Sprite,
        ox: i32,
        oy: i32,
        w: i32,
        h: i32,
        scale: i32,
        flip: Flip,
    ) {
        if scale < 1 || sprite.is_empty() {
            return;
        }
        let src_fmt = sprite.format();
        for ys in 0..h {
            for xs in 0..w {
                let (fx, fy) = match flip {
                    Flip::None => (xs, ys),
                    Flip::Horizontal => (w - 1 - xs, ys),
                    Flip::Vertical => (xs, h - 1 - ys),
                    Flip::Both => (w - 1 - xs, h - 1 - ys),
                };
                let sx = ox + fx;
                let sy = oy + fy;
                if sx < 0 || sx >= sprite.width || sy < 0 || sy >= sprite.height {
                    continue;
                }
                let colour = Pixel::decode(sprite.encoded_unchecked(sx, sy), &src_fmt);
                for dy in 0..scale {
                    for dx in 0..scale {
                        self.draw(x + xs * scale + dx, y + ys * scale + dy, colour);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_pixels(sprite: &Sprite, colour: Pixel) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        for y in 0..sprite.height {
            for x in 0..sprite.width {
                if sprite.pixel(x, y) == colour {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn stipple_pattern_skips_every_other_pixel() {
        let mut target = Sprite::new(40, 4);
        let mut p = Painter::new(&mut target);
        p.draw_line(0, 1, 39, 1, Pixel::WHITE, 0x5555_5555);
        let pts = solid_pixels(&target, Pixel::WHITE);
        assert_eq!(pts.len(), 20);
        assert!(pts.iter().all(|&(x, _)| x % 2 == 0));
    }

    #[test]
    fn fill_rect_clamps_oversized_input() {
        let mut target = Sprite::new(8, 8);
        let mut p = Painter::new(&mut target);
        p.fill_rect(-100, -100, 1000, 1000, Pixel::RED);
        assert_eq!(solid_pixels(&target, Pixel::RED).len(), 64);
    }
}
