use pixen::draw::Painter;
use pixen::pixel::{Pixel, PixelMode};
use pixen::sprite::{Flip, Sprite};

fn set_pixels(sprite: &Sprite) -> Vec<(i32, i32)> {
    let mut out = Vec::new();
    for y in 0..sprite.height {
        for x in 0..sprite.width {
            if sprite.pixel(x, y) != Pixel::BLANK {
                out.push((x, y));
            }
        }
    }
    out
}

// ── Lines ───────────────────────────────────────────────────────────────────

#[test]
fn line_low_gradient_is_connected_and_bounded() {
    let mut target = Sprite::new(16, 8);
    Painter::new(&mut target).draw_line(0, 0, 10, 3, Pixel::WHITE, 0xFFFF_FFFF);
    let pts = set_pixels(&target);

    // one pixel per x step, endpoints included
    assert_eq!(pts.len(), 11);
    assert!(pts.contains(&(0, 0)));
    assert!(pts.contains(&(10, 3)));
    for x in 0..=10 {
        assert_eq!(pts.iter().filter(|&&(px, _)| px == x).count(), 1, "x column {x}");
    }
    // y never overshoots the endpoint bounding box and never decreases
    let mut last_y = 0;
    for x in 0..=10 {
        let y = pts.iter().find(|&&(px, _)| px == x).unwrap().1;
        assert!((0..=3).contains(&y));
        assert!(y >= last_y);
        last_y = y;
    }
}

#[test]
fn line_high_gradient_is_connected_and_bounded() {
    let mut target = Sprite::new(8, 16);
    Painter::new(&mut target).draw_line(6, 12, 2, 1, Pixel::WHITE, 0xFFFF_FFFF);
    let pts = set_pixels(&target);

    assert_eq!(pts.len(), 12); // one pixel per y step
    assert!(pts.contains(&(6, 12)));
    assert!(pts.contains(&(2, 1)));
    for y in 1..=12 {
        assert_eq!(pts.iter().filter(|&&(_, py)| py == y).count(), 1, "y row {y}");
    }
    assert!(pts.iter().all(|&(x, _)| (2..=6).contains(&x)));
}

#[test]
fn degenerate_lines_draw_full_spans() {
    let mut target = Sprite::new(10, 10);
    let mut p = Painter::new(&mut target);
    p.draw_line(7, 2, 1, 2, Pixel::WHITE, 0xFFFF_FFFF); // horizontal, reversed
    p.draw_line(4, 8, 4, 5, Pixel::WHITE, 0xFFFF_FFFF); // vertical, reversed
    for x in 1..=7 {
        assert_ne!(target.pixel(x, 2), Pixel::BLANK);
    }
    for y in 5..=8 {
        assert_ne!(target.pixel(4, y), Pixel::BLANK);
    }
}

#[test]
fn stipple_pattern_wraps_every_32_pixels() {
    let mut target = Sprite::new(64, 1);
    Painter::new(&mut target).draw_line(0, 0, 63, 0, Pixel::WHITE, 0x0000_0001);
    assert_eq!(set_pixels(&target), vec![(0, 0), (32, 0)]);
}

#[test]
fn offscreen_line_writes_nothing_out_of_bounds() {
    let mut target = Sprite::new(8, 8);
    Painter::new(&mut target).draw_line(-20, -5, 30, 12, Pixel::WHITE, 0xFFFF_FFFF);
    // just checking it clips without panicking; anything drawn is in-bounds
    for &(x, y) in &set_pixels(&target) {
        assert!((0..8).contains(&x) && (0..8).contains(&y));
    }
}

// ── Rectangles ──────────────────────────────────────────────────────────────

#[test]
fn rect_stroke_draws_perimeter_only() {
    let mut target = Sprite::new(10, 10);
    Painter::new(&mut target).draw_rect(1, 1, 3, 2, Pixel::WHITE);
    // corners of the (x, y)..(x+w, y+h) outline
    for corner in [(1, 1), (4, 1), (1, 3), (4, 3)] {
        assert_ne!(target.pixel(corner.0, corner.1), Pixel::BLANK);
    }
    // interior untouched
    assert_eq!(target.pixel(2, 2), Pixel::BLANK);
    assert_eq!(target.pixel(3, 2), Pixel::BLANK);
}

#[test]
fn fill_rect_clamps_to_target_bounds() {
    let mut target = Sprite::new(8, 8);
    Painter::new(&mut target).fill_rect(-5, -5, 100, 100, Pixel::RED);
    assert_eq!(set_pixels(&target).len(), 64);
}

#[test]
fn fill_rect_negative_size_draws_nothing() {
    let mut target = Sprite::new(8, 8);
    Painter::new(&mut target).fill_rect(4, 4, -3, -3, Pixel::RED);
    assert!(set_pixels(&target).is_empty());
}

#[test]
fn fill_rect_interior_exact() {
    let mut target = Sprite::new(8, 8);
    Painter::new(&mut target).fill_rect(2, 3, 4, 2, Pixel::RED);
    let pts = set_pixels(&target);
    assert_eq!(pts.len(), 8);
    assert!(pts.iter().all(|&(x, y)| (2..6).contains(&x) && (3..5).contains(&y)));
}

// ── Triangles ───────────────────────────────────────────────────────────────

#[test]
fn fill_triangle_covers_extremes_and_stays_in_bbox() {
    let mut target = Sprite::new(20, 20);
    Painter::new(&mut target).fill_triangle(5, 2, 2, 12, 14, 10, Pixel::GREEN);
    let pts = set_pixels(&target);

    assert!(pts.contains(&(5, 2)), "top vertex filled");
    assert!(pts.contains(&(2, 12)), "bottom vertex filled");
    assert!(pts.contains(&(7, 8)), "centroid filled");
    assert!(pts.iter().all(|&(x, y)| (2..=14).contains(&x) && (2..=12).contains(&y)));
    // every scanline the triangle spans has at least one pixel
    for y in 2..=12 {
        assert!(pts.iter().any(|&(_, py)| py == y), "scanline {y}");
    }
}

#[test]
fn fill_triangle_flat_top_and_degenerate_do_not_hang() {
    let mut target = Sprite::new(16, 16);
    let mut p = Painter::new(&mut target);
    p.fill_triangle(2, 3, 10, 3, 6, 9, Pixel::GREEN); // flat top
    p.fill_triangle(0, 12, 4, 12, 8, 12, Pixel::RED); // colinear
    assert!(target.pixel(6, 5) == Pixel::GREEN);
    assert!(target.pixel(4, 12) == Pixel::RED);
}

#[test]
fn triangle_stroke_hits_all_vertices() {
    let mut target = Sprite::new(20, 20);
    Painter::new(&mut target).draw_triangle(3, 3, 15, 6, 8, 14, Pixel::WHITE);
    for v in [(3, 3), (15, 6), (8, 14)] {
        assert_ne!(target.pixel(v.0, v.1), Pixel::BLANK);
    }
}

// ── Circles ─────────────────────────────────────────────────────────────────

#[test]
fn circle_stroke_is_symmetric_under_quarter_rotation() {
    let mut target = Sprite::new(41, 41);
    Painter::new(&mut target).draw_circle(20, 20, 13, Pixel::WHITE);
    let pts: Vec<(i32, i32)> =
        set_pixels(&target).into_iter().map(|(x, y)| (x - 20, y - 20)).collect();
    assert!(!pts.is_empty());
    for &(x, y) in &pts {
        assert!(pts.contains(&(-y, x)), "missing 90-degree image of ({x}, {y})");
    }
}

#[test]
fn circle_stroke_radius_is_respected() {
    let mut target = Sprite::new(41, 41);
    Painter::new(&mut target).draw_circle(20, 20, 10, Pixel::WHITE);
    for (x, y) in set_pixels(&target) {
        let d2 = (x - 20).pow(2) + (y - 20).pow(2);
        // stroke pixels sit on the integer approximation of the circle
        assert!((81..=121).contains(&d2), "pixel ({x}, {y}) at d^2 = {d2}");
    }
}

#[test]
fn fill_circle_contains_centre_and_cardinal_extremes() {
    let mut target = Sprite::new(31, 31);
    Painter::new(&mut target).fill_circle(15, 15, 7, Pixel::BLUE);
    for p in [(15, 15), (22, 15), (8, 15), (15, 22), (15, 8)] {
        assert_eq!(target.pixel(p.0, p.1), Pixel::BLUE);
    }
    // nothing escapes the radius by more than the algorithm's half-pixel
    for (x, y) in set_pixels(&target) {
        let d2 = (x - 15).pow(2) + (y - 15).pow(2);
        assert!(d2 <= 8 * 8, "pixel ({x}, {y}) outside radius");
    }
}

#[test]
fn negative_radius_is_rejected() {
    let mut target = Sprite::new(10, 10);
    let mut p = Painter::new(&mut target);
    p.draw_circle(5, 5, -3, Pixel::WHITE);
    p.fill_circle(5, 5, -3, Pixel::WHITE);
    assert!(set_pixels(&target).is_empty());
}

// ── Sprite blits ────────────────────────────────────────────────────────────

fn quad_sprite() -> Sprite {
    let mut s = Sprite::new(2, 2);
    s.set_pixel(0, 0, Pixel::RED);
    s.set_pixel(1, 0, Pixel::GREEN);
    s.set_pixel(0, 1, Pixel::BLUE);
    s.set_pixel(1, 1, Pixel::WHITE);
    s
}

#[test]
fn sprite_blit_copies_pixels() {
    let src = quad_sprite();
    let mut target = Sprite::new(4, 4);
    Painter::new(&mut target).draw_sprite(1, 1, &src, 1, Flip::None);
    assert_eq!(target.pixel(1, 1), Pixel::RED);
    assert_eq!(target.pixel(2, 1), Pixel::GREEN);
    assert_eq!(target.pixel(1, 2), Pixel::BLUE);
    assert_eq!(target.pixel(2, 2), Pixel::WHITE);
}

#[test]
fn sprite_blit_flips_horizontally() {
    let src = quad_sprite();
    let mut target = Sprite::new(2, 2);
    Painter::new(&mut target).draw_sprite(0, 0, &src, 1, Flip::Horizontal);
    assert_eq!(target.pixel(0, 0), Pixel::GREEN);
    assert_eq!(target.pixel(1, 0), Pixel::RED);
    assert_eq!(target.pixel(0, 1), Pixel::WHITE);
    assert_eq!(target.pixel(1, 1), Pixel::BLUE);
}

#[test]
fn sprite_blit_flips_both() {
    let src = quad_sprite();
    let mut target = Sprite::new(2, 2);
    Painter::new(&mut target).draw_sprite(0, 0, &src, 1, Flip::Both);
    assert_eq!(target.pixel(0, 0), Pixel::WHITE);
    assert_eq!(target.pixel(1, 1), Pixel::RED);
}

#[test]
fn sprite_blit_integer_scale() {
    let mut src = Sprite::new(1, 1);
    src.set_pixel(0, 0, Pixel::YELLOW);
    let mut target = Sprite::new(5, 5);
    Painter::new(&mut target).draw_sprite(1, 1, &src, 3, Flip::None);
    let pts = set_pixels(&target);
    assert_eq!(pts.len(), 9);
    assert!(pts.iter().all(|&(x, y)| (1..4).contains(&x) && (1..4).contains(&y)));
}

#[test]
fn partial_sprite_blit_selects_region() {
    let src = quad_sprite();
    let mut target = Sprite::new(3, 3);
    Painter::new(&mut target).draw_partial_sprite(0, 0, &src, 1, 0, 1, 2, 1, Flip::None);
    assert_eq!(target.pixel(0, 0), Pixel::GREEN);
    assert_eq!(target.pixel(0, 1), Pixel::WHITE);
    assert_eq!(set_pixels(&target).len(), 2);
}

// ── Pixel modes on the painter ──────────────────────────────────────────────

#[test]
fn painter_mask_mode_skips_translucent_pixels() {
    let mut target = Sprite::new(4, 1);
    target.fill(Pixel::BLACK);
    let mut p = Painter::with_mode(&mut target, PixelMode::Mask, 1.0, None);
    p.draw(0, 0, Pixel::rgba(255, 0, 0, 254));
    p.draw(1, 0, Pixel::rgba(0, 255, 0, 255));
    assert_eq!(target.pixel(0, 0), Pixel::BLACK);
    assert_eq!(target.pixel(1, 0), Pixel::GREEN);
}

#[test]
fn painter_alpha_mode_blends_toward_source() {
    let mut target = Sprite::new(1, 1);
    target.fill(Pixel::BLACK);
    let mut p = Painter::with_mode(&mut target, PixelMode::Alpha, 1.0, None);
    p.draw(0, 0, Pixel::rgba(255, 255, 255, 128));
    let out = target.pixel(0, 0);
    // roughly half-way between black and white
    assert!((out.r as i32 - 128).abs() <= 2);
    assert_eq!(out.a, 255);
}
