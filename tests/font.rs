use pixen::Vec2;
use pixen::draw::Painter;
use pixen::font::SpriteFont;
use pixen::pixel::Pixel;
use pixen::sprite::Sprite;

#[test]
fn default_font_sheet_is_96_tiles_of_8x8() {
    let font = SpriteFont::default_font();
    assert_eq!(font.sprite().width, 128);
    assert_eq!(font.sprite().height, 48);
    assert_eq!(font.tile_size(), (8, 8));
}

#[test]
fn space_glyph_is_fully_blank() {
    let font = SpriteFont::default_font();
    let m = font.margins(' ');
    assert_eq!(m.left, 8);
    assert_eq!(m.right, 8);
}

#[test]
fn pipe_glyph_margins_are_symmetric() {
    let font = SpriteFont::default_font();
    let m = font.margins('|');
    assert_eq!(m.left, m.right);
    assert!(m.left > 0);
}

#[test]
fn draw_string_puts_ink_on_the_canvas() {
    let font = SpriteFont::default_font();
    let mut canvas = Sprite::new(64, 16);
    let mut p = Painter::new(&mut canvas);
    font.draw_string(&mut p, 0, 0, "Hi", Pixel::WHITE, 1);

    let mut inked = 0;
    for y in 0..16 {
        for x in 0..64 {
            if canvas.pixel(x, y) == Pixel::WHITE {
                inked += 1;
            }
        }
    }
    assert!(inked > 0);
    // the second glyph starts one tile over
    let second_tile_inked = (8..16).any(|x| (0..8).any(|y| canvas.pixel(x, y) == Pixel::WHITE));
    assert!(second_tile_inked);
}

#[test]
fn draw_string_scale_doubles_coverage() {
    let font = SpriteFont::default_font();

    let count = |scale: i32| {
        let mut canvas = Sprite::new(32, 32);
        let mut p = Painter::new(&mut canvas);
        font.draw_string(&mut p, 0, 0, "I", Pixel::WHITE, scale);
        let mut n = 0;
        for y in 0..32 {
            for x in 0..32 {
                if canvas.pixel(x, y) == Pixel::WHITE {
                    n += 1;
                }
            }
        }
        n
    };

    assert_eq!(count(2), count(1) * 4);
}

#[test]
fn layout_advances_one_tile_per_character() {
    let font = SpriteFont::default_font();
    let quads = font.layout_string(0.0, 0.0, "abc", Vec2::ONE);
    assert_eq!(quads.len(), 3);
    assert_eq!(quads[0].dst_pos.x, 0.0);
    assert_eq!(quads[1].dst_pos.x, 8.0);
    assert_eq!(quads[2].dst_pos.x, 16.0);
    assert!(quads.iter().all(|q| q.dst_pos.y == 0.0));
}

#[test]
fn layout_newline_resets_x_and_advances_y() {
    let font = SpriteFont::default_font();
    let quads = font.layout_string(4.0, 2.0, "a\nb", Vec2::new(1.0, 2.0));
    assert_eq!(quads.len(), 2);
    assert_eq!(quads[0].dst_pos, Vec2::new(4.0, 2.0));
    assert_eq!(quads[1].dst_pos, Vec2::new(4.0, 2.0 + 16.0));
}

#[test]
fn layout_scale_stretches_destination_not_source() {
    let font = SpriteFont::default_font();
    let quads = font.layout_string(0.0, 0.0, "x", Vec2::new(3.0, 2.0));
    assert_eq!(quads[0].src_size, Vec2::new(8.0, 8.0));
    assert_eq!(quads[0].dst_size, Vec2::new(24.0, 16.0));
}

#[test]
fn proportional_layout_is_narrower_for_slim_glyphs() {
    let font = SpriteFont::default_font();
    let fixed = font.layout_string(0.0, 0.0, "iii!", Vec2::ONE);
    let prop = font.layout_string_prop(0.0, 0.0, "iii!", Vec2::ONE);
    let right = |quads: &[pixen::font::GlyphQuad]| {
        quads.iter().map(|q| q.dst_pos.x + q.dst_size.x).fold(0.0f32, f32::max)
    };
    assert!(right(&prop) < right(&fixed));
}

#[test]
fn unknown_codepoints_are_skipped() {
    let font = SpriteFont::default_font();
    let quads = font.layout_string(0.0, 0.0, "a\u{3042}b", Vec2::ONE);
    // the hiragana glyph has no tile; layout still advances past it
    assert_eq!(quads.len(), 2);
    assert_eq!(quads[1].dst_pos.x, 16.0);
}
