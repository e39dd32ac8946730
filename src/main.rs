// Demo program: software primitives on layer 0, a tinted overlay layer, and
// a rotating decal on top. Escape quits.

use pixen::draw::Painter;
use pixen::engine::{Engine, EngineBuilder, Game, KeyCode};
use pixen::{Decal, Pixel, PixelMode, Sprite, Vec2};

struct Demo {
    badge: Option<Decal>,
    overlay: usize,
    angle: f32,
    time: f32,
    rng: u64,
}

impl Demo {
    fn new() -> Self {
        Self { badge: None, overlay: 0, angle: 0.0, time: 0.0, rng: 0x9E3779B97F4A7C15 }
    }

    fn rand(&mut self) -> u32 {
        // xorshift64 is plenty for noise pixels
        self.rng ^= self.rng << 13;
        self.rng ^= self.rng >> 7;
        self.rng ^= self.rng << 17;
        (self.rng >> 32) as u32
    }
}

impl Game for Demo {
    fn on_create(&mut self, engine: &mut Engine) -> bool {
        // A little procedural badge sprite for the decal path.
        let mut sprite = Sprite::new(32, 32);
        let mut p = Painter::new(&mut sprite);
        p.fill_circle(16, 16, 14, Pixel::DARK_RED);
        p.draw_circle(16, 16, 14, Pixel::AMBER);
        p.fill_triangle(16, 6, 8, 24, 24, 24, Pixel::GOLDEN);
        match engine.create_decal(&sprite) {
            Ok(decal) => self.badge = Some(decal),
            Err(e) => eprintln!("demo: badge decal unavailable: {e}"),
        }

        // A slow-scrolling tinted overlay on its own layer.
        self.overlay = engine.create_layer();
        engine.set_draw_target(self.overlay);
        for i in 0..12 {
            engine.fill_rect(i * 32, 0, 16, engine.screen_height(), Pixel::rgba(255, 255, 255, 24));
        }
        engine.enable_layer(self.overlay, true);
        engine.set_layer_tint(self.overlay, Pixel::rgba(64, 128, 255, 160));
        engine.set_draw_target(0);
        true
    }

    fn on_update(&mut self, engine: &mut Engine, elapsed: f32) -> bool {
        if engine.get_key(KeyCode::Escape).pressed() {
            return false;
        }
        self.time += elapsed;
        self.angle += elapsed * 1.5;

        let w = engine.screen_width();
        let h = engine.screen_height();

        engine.clear(Pixel::VERY_DARK_BLUE);

        // noise band along the bottom
        for y in h - 24..h {
            for x in 0..w {
                let v = (self.rand() % 48) as u8;
                engine.draw(x, y, Pixel::new(v, v, v + 16));
            }
        }

        // orbiting filled circle with alpha blending
        let cx = w / 2 + ((self.time * 1.3).cos() * 90.0) as i32;
        let cy = h / 2 + ((self.time * 1.3).sin() * 50.0) as i32;
        engine.set_pixel_mode(PixelMode::Alpha);
        engine.fill_circle(cx, cy, 20, Pixel::rgba(0, 255, 128, 140));
        engine.set_pixel_mode(PixelMode::Normal);
        engine.draw_circle(cx, cy, 20, Pixel::GREEN);

        // stippled crosshair through the orbit centre
        engine.draw_line(0, h / 2, w, h / 2, Pixel::DARK_GREY, 0xF0F0_F0F0);
        engine.draw_line(w / 2, 0, w / 2, h, Pixel::DARK_GREY, 0xF0F0_F0F0);

        engine.fill_triangle(20, h - 30, 50, h - 70, 80, h - 34, Pixel::DARK_MAGENTA);
        engine.draw_rect(16, 16, 64, 40, Pixel::GREY);

        engine.draw_string(20, 22, "pixen", Pixel::WHITE, 2);
        engine.draw_string_prop(20, 42, "fixed vs proportional", Pixel::GREY, 1);

        // drift the overlay layer; the offset is a fraction of the layer size
        engine.set_layer_offset(self.overlay, (self.time * 0.02).fract(), 0.0);

        if let Some(badge) = &self.badge {
            engine.draw_rotated_decal(
                Vec2::new(w as f32 - 48.0, 48.0),
                badge,
                self.angle,
                Vec2::new(16.0, 16.0),
                Vec2::new(2.0, 2.0),
                Pixel::WHITE,
            );
        }
        engine.draw_string_decal(
            Vec2::new(4.0, h as f32 - 34.0),
            &format!("fps {}", engine.fps_mean()),
            Pixel::YELLOW,
            Vec2::new(1.0, 1.0),
        );
        true
    }
}

fn main() -> anyhow::Result<()> {
    EngineBuilder::new()
        .with_title("pixen demo")
        .with_size(320, 180)
        .with_pixel_size(4, 4)
        .vsync()
        .run(Demo::new())
}
