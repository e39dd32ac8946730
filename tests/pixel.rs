use pixen::pixel::{Pixel, PixelFormat, PixelMode, blend_pixel};

#[test]
fn encode_decode_round_trip_argb8888() {
    let fmt = PixelFormat::ARGB8888;
    for p in [
        Pixel::rgba(0, 0, 0, 0),
        Pixel::rgba(255, 255, 255, 255),
        Pixel::rgba(1, 2, 3, 4),
        Pixel::rgba(200, 100, 50, 25),
    ] {
        assert_eq!(Pixel::decode(p.encode(&fmt), &fmt), p);
    }
}

#[test]
fn encode_decode_round_trip_rgba8888() {
    let fmt = PixelFormat::RGBA8888;
    let p = Pixel::rgba(0x12, 0x34, 0x56, 0x78);
    assert_eq!(p.encode(&fmt), 0x1234_5678);
    assert_eq!(Pixel::decode(p.encode(&fmt), &fmt), p);
}

#[test]
fn formats_disagree_on_layout() {
    let p = Pixel::rgba(0x11, 0x22, 0x33, 0x44);
    assert_ne!(p.encode(&PixelFormat::ARGB8888), p.encode(&PixelFormat::RGBA8888));
}

#[test]
fn channel_unpack_matches_decode() {
    let fmt = PixelFormat::ARGB8888;
    let encoded = Pixel::rgba(10, 20, 30, 40).encode(&fmt);
    assert_eq!(fmt.unpack_r(encoded), 10);
    assert_eq!(fmt.unpack_g(encoded), 20);
    assert_eq!(fmt.unpack_b(encoded), 30);
    assert_eq!(fmt.unpack_a(encoded), 40);
}

#[test]
fn from_f32_scales_channels() {
    let p = Pixel::from_f32(1.0, 0.0, 0.5, 1.0);
    assert_eq!(p.r, 255);
    assert_eq!(p.g, 0);
    assert_eq!(p.b, 127);
    assert_eq!(p.a, 255);
}

#[test]
fn arithmetic_saturates() {
    let p = Pixel::new(200, 200, 200) + Pixel::new(100, 100, 100);
    assert_eq!((p.r, p.g, p.b), (255, 255, 255));

    let q = Pixel::new(10, 10, 10) - Pixel::new(100, 100, 100);
    assert_eq!((q.r, q.g, q.b), (0, 0, 0));

    let s = Pixel::new(100, 100, 100) * 4.0;
    assert_eq!((s.r, s.g, s.b), (255, 255, 255));
}

#[test]
fn inverse_flips_rgb_only() {
    let p = Pixel::rgba(0, 128, 255, 40).inv();
    assert_eq!((p.r, p.g, p.b, p.a), (255, 127, 0, 40));
}

#[test]
fn lerp_endpoints() {
    let a = Pixel::new(10, 20, 30);
    let b = Pixel::new(200, 100, 0);
    assert_eq!(Pixel::lerp(a, b, 1.0), a);
    assert_eq!(Pixel::lerp(a, b, 0.0), b);
}

// ── Blending ────────────────────────────────────────────────────────────────

#[test]
fn normal_mode_overwrites() {
    let src = Pixel::rgba(1, 2, 3, 4);
    let out = blend_pixel(PixelMode::Normal, 1.0, None, 0, 0, src, Pixel::WHITE).unwrap();
    assert_eq!(out, src);
}

#[test]
fn mask_mode_draws_only_fully_opaque() {
    let opaque = Pixel::rgba(9, 9, 9, 255);
    let translucent = Pixel::rgba(9, 9, 9, 128);
    assert_eq!(
        blend_pixel(PixelMode::Mask, 1.0, None, 0, 0, opaque, Pixel::BLACK),
        Some(opaque)
    );
    assert_eq!(blend_pixel(PixelMode::Mask, 1.0, None, 0, 0, translucent, Pixel::BLACK), None);
}

#[test]
fn alpha_blend_opaque_source_replaces_destination() {
    let src = Pixel::new(12, 200, 90);
    for dst in [Pixel::BLANK, Pixel::BLACK, Pixel::WHITE, Pixel::rgba(5, 5, 5, 5)] {
        let out = blend_pixel(PixelMode::Alpha, 1.0, None, 0, 0, src, dst).unwrap();
        assert_eq!(out, src);
    }
}

#[test]
fn alpha_blend_transparent_source_keeps_opaque_destination() {
    let dst = Pixel::new(40, 80, 120);
    let src = Pixel::rgba(255, 0, 0, 0);
    let out = blend_pixel(PixelMode::Alpha, 1.0, None, 0, 0, src, dst).unwrap();
    assert_eq!(out, dst);
}

#[test]
fn alpha_blend_both_transparent_yields_blank() {
    let out = blend_pixel(PixelMode::Alpha, 1.0, None, 0, 0, Pixel::BLANK, Pixel::BLANK).unwrap();
    assert_eq!(out, Pixel::BLANK);
}

#[test]
fn blend_factor_zero_keeps_destination() {
    let dst = Pixel::new(40, 80, 120);
    let src = Pixel::new(255, 255, 255);
    let out = blend_pixel(PixelMode::Alpha, 0.0, None, 0, 0, src, dst).unwrap();
    assert_eq!(out, dst);
}

#[test]
fn alpha_prop_writes_computed_alpha_through() {
    let src = Pixel::rgba(100, 150, 200, 128);
    let out = blend_pixel(PixelMode::AlphaProp, 1.0, None, 0, 0, src, Pixel::BLANK).unwrap();
    // Over a fully transparent destination the result keeps the source
    // colour and the source alpha.
    assert!((out.r as i32 - 100).abs() <= 1);
    assert!((out.g as i32 - 150).abs() <= 1);
    assert!((out.b as i32 - 200).abs() <= 1);
    assert!((out.a as i32 - 128).abs() <= 1);
}

#[test]
fn alpha_mode_result_is_opaque() {
    let src = Pixel::rgba(100, 150, 200, 128);
    let out = blend_pixel(PixelMode::Alpha, 1.0, None, 0, 0, src, Pixel::BLACK).unwrap();
    assert_eq!(out.a, 255);
}

#[test]
fn custom_mode_uses_callback() {
    let swap = Box::new(|_x: i32, _y: i32, src: Pixel, dst: Pixel| {
        Pixel::rgba(dst.r, src.g, src.b, src.a)
    }) as pixen::pixel::BlendFn;
    let out = blend_pixel(
        PixelMode::Custom,
        1.0,
        Some(&swap),
        0,
        0,
        Pixel::new(1, 2, 3),
        Pixel::new(9, 9, 9),
    )
    .unwrap();
    assert_eq!((out.r, out.g, out.b), (9, 2, 3));
}
