use std::sync::Arc;

use anyhow::{Context, Result};
use glam::{IVec2, Vec2};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Fullscreen, Window, WindowId};

pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

use crate::audio::AudioContext;
use crate::decal::Decal;
use crate::draw::Painter;
use crate::font::SpriteFont;
use crate::input::{InputState, KeyState};
use crate::pixel::{BlendFn, Pixel, PixelMode};
use crate::renderer::Gpu;
use crate::sprite::{Flip, Sprite};
use crate::timer::{Profiler, Stopwatch};
use crate::window::{DecalFrame, EngineWindow, WindowConfig, WindowMode};

// Profiler probe indices for the main loop phases.
const PROBE_EVENTS: usize = 0;
const PROBE_UPDATE: usize = 1;
const PROBE_COMPOSITE: usize = 2;
const PROBE_PRESENT: usize = 3;

// ── Game trait ──────────────────────────────────────────────────────────────

/// User-side lifecycle callbacks. Each returns a continue flag: returning
/// `false` ends the main loop.
pub trait Game {
    /// Called once before the game loop starts; create assets here.
    fn on_create(&mut self, _engine: &mut Engine) -> bool {
        true
    }
    /// Called once per frame with the elapsed time in seconds. Put input
    /// handling, game logic and drawing here.
    fn on_update(&mut self, engine: &mut Engine, elapsed: f32) -> bool;
    /// Called once after the game loop has finished.
    fn on_destroy(&mut self, _engine: &mut Engine) -> bool {
        true
    }
}

// ── Engine ──────────────────────────────────────────────────────────────────

/// The engine core: owns the GPU context, every window (and through them all
/// layers and their decal queues), the input and audio state, the default
/// font, and the frame timing machinery.
///
/// At all times exactly one window is active and one of its layers is the
/// draw target; every `draw_*` call lands on that layer's canvas, and every
/// `draw_*decal` call queues into that layer.
pub struct Engine {
    pub(crate) gpu: Gpu,
    pub(crate) windows: Vec<EngineWindow>,
    active_window_ix: usize,
    pending_windows: Vec<WindowConfig>,

    pixel_mode: PixelMode,
    blend_factor: f32,
    blend_fn: Option<BlendFn>,

    pub input: InputState,
    pub audio: AudioContext,

    font: SpriteFont,
    font_decal: Option<Decal>,

    frame_timer: Stopwatch,
    pub profiler: Profiler,

    // frame statistics
    cur_fps: i32,
    fps_mean: i32,
    musec_cur: f32,
    musec_mean: f32,
    musec_cum: u64,
    timing_cntr: u32,

    app_name: String,
    cursor_visible: bool,
    quit_requested: bool,
}

impl Engine {
    fn new(gpu: Gpu, main_window: EngineWindow, app_name: String) -> Self {
        let font = SpriteFont::default_font();
        let font_decal = match Decal::new(&gpu, font.sprite()) {
            Ok(d) => Some(d),
            Err(e) => {
                eprintln!("[engine] failed to create font decal: {e}");
                None
            }
        };

        let mut profiler = Profiler::new();
        profiler.init_probes(&["events & input", "user update", "composite", "present"]);
        let mut frame_timer = Stopwatch::new();
        frame_timer.start();

        Self {
            gpu,
            windows: vec![main_window],
            active_window_ix: 0,
            pending_windows: Vec::new(),
            pixel_mode: PixelMode::Normal,
            blend_factor: 1.0,
            blend_fn: None,
            input: InputState::new(),
            audio: AudioContext::new(),
            font,
            font_decal,
            frame_timer,
            profiler,
            cur_fps: 0,
            fps_mean: 0,
            musec_cur: 0.0,
            musec_mean: 0.0,
            musec_cum: 0,
            timing_cntr: 0,
            app_name,
            cursor_visible: true,
            quit_requested: false,
        }
    }

    // ── Windows ────────────────────────────────────────────────────────────

    /// Request an additional window. Native windows can only be created from
    /// inside the event loop, so the request is queued and fulfilled right
    /// after the current user callback returns; the prospective window index
    /// is returned immediately.
    pub fn add_window(&mut self, config: WindowConfig) -> usize {
        self.pending_windows.push(config);
        self.windows.len() + self.pending_windows.len() - 1
    }

    /// Make the window at `ix` the active window — the target of draw calls,
    /// screen queries and input queries. An out-of-range index is reported
    /// and falls back to window 0.
    pub fn activate_window(&mut self, ix: usize) {
        if ix >= self.windows.len() {
            eprintln!("[engine] activate_window: window index out of range: {ix}");
            self.active_window_ix = 0;
            return;
        }
        self.active_window_ix = ix;
    }

    pub fn active_window_index(&self) -> usize {
        self.active_window_ix
    }

    pub fn active_window(&self) -> &EngineWindow {
        &self.windows[self.active_window_ix]
    }

    pub fn active_window_mut(&mut self) -> &mut EngineWindow {
        &mut self.windows[self.active_window_ix]
    }

    pub fn window(&self, ix: usize) -> Option<&EngineWindow> {
        self.windows.get(ix)
    }

    pub fn window_mut(&mut self, ix: usize) -> Option<&mut EngineWindow> {
        self.windows.get_mut(ix)
    }

    pub(crate) fn window_index(&self, id: WindowId) -> Option<usize> {
        self.windows.iter().position(|w| w.id() == id)
    }

    /// Signal that the main loop should exit after the current frame.
    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    // ── Screen / draw target queries ───────────────────────────────────────

    /// Logical width of the active window.
    pub fn screen_width(&self) -> i32 {
        self.active_window().width()
    }

    /// Logical height of the active window.
    pub fn screen_height(&self) -> i32 {
        self.active_window().height()
    }

    pub fn draw_target_width(&self) -> i32 {
        let win = self.active_window();
        win.layers[win.draw_target_ix].canvas.width
    }

    pub fn draw_target_height(&self) -> i32 {
        let win = self.active_window();
        win.layers[win.draw_target_ix].canvas.height
    }

    // ── Layers (on the active window) ──────────────────────────────────────

    /// Add a layer to the active window and return its index.
    pub fn create_layer(&mut self) -> usize {
        let Engine { gpu, windows, active_window_ix, .. } = self;
        windows[*active_window_ix].create_layer(gpu)
    }

    /// Route draw calls to `layer` of the active window.
    pub fn set_draw_target(&mut self, layer: usize) {
        self.active_window_mut().set_draw_target(layer);
    }

    pub fn enable_layer(&mut self, layer: usize, enable: bool) {
        self.active_window_mut().enable_layer(layer, enable);
    }

    pub fn set_layer_offset(&mut self, layer: usize, x: f32, y: f32) {
        self.active_window_mut().set_layer_offset(layer, x, y);
    }

    pub fn set_layer_scale(&mut self, layer: usize, x: f32, y: f32) {
        self.active_window_mut().set_layer_scale(layer, x, y);
    }

    pub fn set_layer_scale_inv(&mut self, layer: usize, x: f32, y: f32) {
        self.active_window_mut().set_layer_scale_inv(layer, x, y);
    }

    pub fn set_layer_tint(&mut self, layer: usize, tint: Pixel) {
        self.active_window_mut().set_layer_tint(layer, tint);
    }

    // ── Pixel modes ────────────────────────────────────────────────────────

    pub fn set_pixel_mode(&mut self, mode: PixelMode) {
        self.pixel_mode = mode;
    }

    pub fn pixel_mode(&self) -> PixelMode {
        self.pixel_mode
    }

    /// Install a custom blend callback and switch to `PixelMode::Custom`.
    pub fn set_custom_pixel_mode(
        &mut self,
        blend: impl Fn(i32, i32, Pixel, Pixel) -> Pixel + 'static,
    ) {
        self.blend_fn = Some(Box::new(blend));
        self.pixel_mode = PixelMode::Custom;
    }

    /// Set the blend factor for the alpha modes; clamped to [0.0, 1.0].
    pub fn set_blend_factor(&mut self, blend: f32) {
        self.blend_factor = blend.clamp(0.0, 1.0);
    }

    pub fn blend_factor(&self) -> f32 {
        self.blend_factor
    }

    // ── Software drawing (active window, current draw-target layer) ────────

    /// A painter over the current draw target with the current pixel mode.
    /// Marks the target layer dirty — its texture re-uploads next frame.
    fn painter(&mut self) -> Painter<'_> {
        let Engine { windows, active_window_ix, pixel_mode, blend_factor, blend_fn, .. } = self;
        let win = &mut windows[*active_window_ix];
        let layer = &mut win.layers[win.draw_target_ix];
        layer.dirty = true;
        Painter::with_mode(&mut layer.canvas, *pixel_mode, *blend_factor, blend_fn.as_ref())
    }

    fn painter_and_font(&mut self) -> (Painter<'_>, &SpriteFont) {
        let Engine { windows, active_window_ix, pixel_mode, blend_factor, blend_fn, font, .. } =
            self;
        let win = &mut windows[*active_window_ix];
        let layer = &mut win.layers[win.draw_target_ix];
        layer.dirty = true;
        (Painter::with_mode(&mut layer.canvas, *pixel_mode, *blend_factor, blend_fn.as_ref()), font)
    }

    /// Clear the draw target to one colour.
    pub fn clear(&mut self, colour: Pixel) {
        self.painter().clear(colour);
    }

    /// Draw a single pixel.
    pub fn draw(&mut self, x: i32, y: i32, colour: Pixel) {
        self.painter().draw(x, y, colour);
    }

    /// Draw a line; see [`Painter::draw_line`] for the pattern semantics.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, colour: Pixel, pattern: u32) {
        self.painter().draw_line(x0, y0, x1, y1, colour, pattern);
    }

    pub fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, colour: Pixel) {
        self.painter().draw_rect(x, y, w, h, colour);
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, colour: Pixel) {
        self.painter().fill_rect(x, y, w, h, colour);
    }

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
        self.painter().draw_triangle(x0, y0, x1, y1, x2, y2, colour);
    }

    pub fn fill_triangle(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        colour: Pixel,
    ) {
        self.painter().fill_triangle(x0, y0, x1, y1, x2, y2, colour);
    }

    pub fn draw_circle(&mut self, xc: i32, yc: i32, r: i32, colour: Pixel) {
        self.painter().draw_circle(xc, yc, r, colour);
    }

    pub fn fill_circle(&mut self, xc: i32, yc: i32, r: i32, colour: Pixel) {
        self.painter().fill_circle(xc, yc, r, colour);
    }

    pub fn draw_sprite(&mut self, x: i32, y: i32, sprite: &Sprite, scale: i32, flip: Flip) {
        self.painter().draw_sprite(x, y, sprite, scale, flip);
    }

    #[allow(clippy::too_many_arguments)]
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
        self.painter().draw_partial_sprite(x, y, sprite, ox, oy, w, h, scale, flip);
    }

    /// Draw `text` with the default font, fixed advance.
    pub fn draw_string(&mut self, x: i32, y: i32, text: &str, colour: Pixel, scale: i32) {
        let (mut painter, font) = self.painter_and_font();
        font.draw_string(&mut painter, x, y, text, colour, scale);
    }

    /// Draw `text` with the default font, proportional advance.
    pub fn draw_string_prop(&mut self, x: i32, y: i32, text: &str, colour: Pixel, scale: i32) {
        let (mut painter, font) = self.painter_and_font();
        font.draw_string_prop(&mut painter, x, y, text, colour, scale);
    }

    /// A reference to the active font sprite (e.g. to build a custom decal).
    pub fn font_sprite(&self) -> &Sprite {
        self.font.sprite()
    }

    /// Replace the active font. The font decal for `draw_string_decal` is
    /// rebuilt from the new font sprite.
    pub fn set_font(&mut self, font: SpriteFont) {
        self.font_decal = match Decal::new(&self.gpu, font.sprite()) {
            Ok(d) => Some(d),
            Err(e) => {
                eprintln!("[engine] set_font: failed to create font decal: {e}");
                None
            }
        };
        self.font = font;
    }

    // ── Decals (queued on the active window's draw-target layer) ───────────

    /// Create a decal mirroring `sprite`'s current pixels.
    pub fn create_decal(&self, sprite: &Sprite) -> Result<Decal> {
        Decal::new(&self.gpu, sprite)
    }

    /// Push `sprite`'s current pixels into `decal`'s texture.
    pub fn update_decal(&self, decal: &Decal, sprite: &Sprite) {
        decal.update(&self.gpu, sprite);
    }

    fn queue_decal(&mut self, frame: DecalFrame) {
        let win = &mut self.windows[self.active_window_ix];
        let ix = win.draw_target_ix;
        win.layers[ix].decals.push(frame);
    }

    /// Queue a whole decal at `pos`, scaled and tinted.
    pub fn draw_decal(&mut self, pos: Vec2, decal: &Decal, scale: Vec2, tint: Pixel) {
        let size = Vec2::new(decal.width as f32, decal.height as f32);
        self.queue_decal(DecalFrame {
            bind_group: decal.bind_group.clone(),
            tex_size: size,
            src_pos: Vec2::ZERO,
            src_size: size,
            dst_pos: pos,
            dst_size: size * scale,
            angle: 0.0,
            pivot: Vec2::ZERO,
            tint,
        });
    }

    /// Queue a region of a decal, scaled and tinted.
    pub fn draw_partial_decal(
        &mut self,
        pos: Vec2,
        decal: &Decal,
        src_pos: Vec2,
        src_size: Vec2,
        scale: Vec2,
        tint: Pixel,
    ) {
        let tex_size = Vec2::new(decal.width as f32, decal.height as f32);
        self.queue_decal(DecalFrame {
            bind_group: decal.bind_group.clone(),
            tex_size,
            src_pos,
            src_size,
            dst_pos: pos,
            dst_size: src_size * scale,
            angle: 0.0,
            pivot: Vec2::ZERO,
            tint,
        });
    }

    /// Like [`Engine::draw_partial_decal`] but with the on-screen size given
    /// directly instead of as a scale factor.
    pub fn draw_partial_decal_sized(
        &mut self,
        pos: Vec2,
        size: Vec2,
        decal: &Decal,
        src_pos: Vec2,
        src_size: Vec2,
        tint: Pixel,
    ) {
        let tex_size = Vec2::new(decal.width as f32, decal.height as f32);
        self.queue_decal(DecalFrame {
            bind_group: decal.bind_group.clone(),
            tex_size,
            src_pos,
            src_size,
            dst_pos: pos,
            dst_size: size,
            angle: 0.0,
            pivot: Vec2::ZERO,
            tint,
        });
    }

    /// Queue a whole decal rotated by `angle` radians (clockwise) about
    /// `center` (in decal pixels, scaled), positioned so that `center` lands
    /// on `pos`.
    pub fn draw_rotated_decal(
        &mut self,
        pos: Vec2,
        decal: &Decal,
        angle: f32,
        center: Vec2,
        scale: Vec2,
        tint: Pixel,
    ) {
        let size = Vec2::new(decal.width as f32, decal.height as f32);
        self.queue_decal(DecalFrame {
            bind_group: decal.bind_group.clone(),
            tex_size: size,
            src_pos: Vec2::ZERO,
            src_size: size,
            dst_pos: pos - center * scale,
            dst_size: size * scale,
            angle,
            pivot: center * scale,
            tint,
        });
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_partial_rotated_decal(
        &mut self,
        pos: Vec2,
        decal: &Decal,
        angle: f32,
        center: Vec2,
        src_pos: Vec2,
        src_size: Vec2,
        scale: Vec2,
        tint: Pixel,
    ) {
        let tex_size = Vec2::new(decal.width as f32, decal.height as f32);
        self.queue_decal(DecalFrame {
            bind_group: decal.bind_group.clone(),
            tex_size,
            src_pos,
            src_size,
            dst_pos: pos - center * scale,
            dst_size: src_size * scale,
            angle,
            pivot: center * scale,
            tint,
        });
    }

    /// Queue `text` as partial decals of the font decal, fixed advance.
    pub fn draw_string_decal(&mut self, pos: Vec2, text: &str, colour: Pixel, scale: Vec2) {
        let Some(font_decal) = &self.font_decal else {
            eprintln!("[engine] draw_string_decal: no font decal available");
            return;
        };
        let bind_group = font_decal.bind_group.clone();
        let tex_size = Vec2::new(font_decal.width as f32, font_decal.height as f32);
        for quad in self.font.layout_string(pos.x, pos.y, text, scale) {
            self.queue_decal(DecalFrame {
                bind_group: bind_group.clone(),
                tex_size,
                src_pos: quad.src_pos,
                src_size: quad.src_size,
                dst_pos: quad.dst_pos,
                dst_size: quad.dst_size,
                angle: 0.0,
                pivot: Vec2::ZERO,
                tint: colour,
            });
        }
    }

    /// Queue `text` as partial decals of the font decal, proportional advance.
    pub fn draw_string_prop_decal(&mut self, pos: Vec2, text: &str, colour: Pixel, scale: Vec2) {
        let Some(font_decal) = &self.font_decal else {
            eprintln!("[engine] draw_string_prop_decal: no font decal available");
            return;
        };
        let bind_group = font_decal.bind_group.clone();
        let tex_size = Vec2::new(font_decal.width as f32, font_decal.height as f32);
        for quad in self.font.layout_string_prop(pos.x, pos.y, text, scale) {
            self.queue_decal(DecalFrame {
                bind_group: bind_group.clone(),
                tex_size,
                src_pos: quad.src_pos,
                src_size: quad.src_size,
                dst_pos: quad.dst_pos,
                dst_size: quad.dst_size,
                angle: 0.0,
                pivot: Vec2::ZERO,
                tint: colour,
            });
        }
    }

    // ── Input queries (gated on the active window's focus) ─────────────────

    /// State of a keyboard key. Idle unless the active window has keyboard
    /// focus.
    pub fn get_key(&self, key: KeyCode) -> KeyState {
        if self.active_window().is_keybd_focused() { self.input.key(key) } else { KeyState::Idle }
    }

    /// State of a mouse button. Idle unless the active window has mouse
    /// focus.
    pub fn get_mouse(&self, button: MouseButton) -> KeyState {
        if self.active_window().is_mouse_focused() {
            self.input.mouse(button)
        } else {
            KeyState::Idle
        }
    }

    /// Mouse x in the active window's logical pixels.
    pub fn mouse_x(&self) -> i32 {
        self.active_window().mouse_logical.x
    }

    pub fn mouse_y(&self) -> i32 {
        self.active_window().mouse_logical.y
    }

    pub fn mouse_pos(&self) -> IVec2 {
        self.active_window().mouse_logical
    }

    /// Mouse position in physical window pixels.
    pub fn window_mouse(&self) -> IVec2 {
        self.active_window().mouse_physical
    }

    /// Wheel movement this frame; 0 unless the active window has mouse focus.
    pub fn mouse_wheel(&self) -> f32 {
        if self.active_window().is_mouse_focused() { self.input.wheel() } else { 0.0 }
    }

    pub fn is_focused(&self) -> bool {
        self.is_keybd_focused()
    }

    pub fn is_keybd_focused(&self) -> bool {
        self.active_window().is_keybd_focused()
    }

    pub fn is_mouse_focused(&self) -> bool {
        self.active_window().is_mouse_focused()
    }

    /// Show or hide the OS cursor (all windows).
    pub fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor_visible = visible;
        for win in &self.windows {
            win.window.set_cursor_visible(visible);
        }
    }

    pub fn is_cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    // ── Frame statistics ───────────────────────────────────────────────────

    /// Frame rate of the last frame.
    pub fn fps(&self) -> i32 {
        self.cur_fps
    }

    /// Mean frame rate over the last half second.
    pub fn fps_mean(&self) -> i32 {
        self.fps_mean
    }

    /// Duration of the last frame in seconds.
    pub fn elapsed(&self) -> f32 {
        self.musec_cur / 1_000_000.0
    }

    /// Mean frame duration over the last half second, in seconds.
    pub fn elapsed_mean(&self) -> f32 {
        self.musec_mean / 1_000_000.0
    }

    fn update_frame_stats(&mut self, elapsed_us: u64) {
        self.musec_cur = elapsed_us as f32;
        self.cur_fps = (1_000_000.0 / self.musec_cur.max(1.0)) as i32;
        self.musec_cum += elapsed_us;
        self.timing_cntr += 1;

        // Refresh the mean FPS (and the window-0 caption) every 0.5 seconds.
        if self.musec_cum >= 500_000 {
            self.musec_mean = self.musec_cum as f32 / self.timing_cntr as f32;
            self.fps_mean = (1_000_000.0 / self.musec_mean.max(1.0)) as i32;
            self.musec_cum -= 500_000;
            self.timing_cntr = 0;

            let caption = format!(
                "{} - FPS: {} ({} us)",
                self.app_name, self.fps_mean, self.musec_mean as u32
            );
            self.windows[0].update_caption(&caption);
        }
    }

    // ── Render cycle ───────────────────────────────────────────────────────

    /// Composite and present every visible window; hidden windows only get
    /// their decal queues cleared so they don't pile up.
    fn render_windows(&mut self) {
        let Engine { gpu, windows, profiler, .. } = self;

        let mut frames = Vec::with_capacity(windows.len());
        for win in windows.iter_mut() {
            if !win.is_shown() {
                win.clear_decal_queues();
                continue;
            }
            match win.render(gpu) {
                Ok(frame) => frames.push(frame),
                Err(wgpu::SurfaceError::Lost) => {
                    let size = win.window.inner_size();
                    win.resize(gpu, size.width, size.height);
                }
                Err(e) => eprintln!("[engine] render error: {e}"),
            }
        }
        profiler.probe(PROBE_COMPOSITE);

        for frame in frames {
            frame.present();
        }
        profiler.probe(PROBE_PRESENT);
    }

    fn create_pending_windows(&mut self, event_loop: &ActiveEventLoop) {
        for config in std::mem::take(&mut self.pending_windows) {
            let result = create_native_window(event_loop, &config)
                .and_then(|w| EngineWindow::create(&self.gpu, w, config));
            match result {
                Ok(win) => {
                    win.window.set_cursor_visible(self.cursor_visible);
                    self.windows.push(win);
                }
                Err(e) => eprintln!("[engine] failed to create window: {e}"),
            }
        }
    }
}

// ── EngineBuilder ───────────────────────────────────────────────────────────

/// Engine configuration and entry point.
///
/// ```no_run
/// use pixen::engine::{Engine, EngineBuilder, Game};
///
/// struct Demo;
/// impl Game for Demo {
///     fn on_update(&mut self, engine: &mut Engine, _elapsed: f32) -> bool {
///         engine.clear(pixen::Pixel::DARK_BLUE);
///         true
///     }
/// }
///
/// EngineBuilder::new()
///     .with_title("demo")
///     .with_size(320, 180)
///     .with_pixel_size(4, 4)
///     .run(Demo)
///     .unwrap();
/// ```
pub struct EngineBuilder {
    config: WindowConfig,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self { config: WindowConfig::default() }
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.config.title = title.into();
        self
    }

    /// Logical window size, in logical pixels.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.config.logical_width = width;
        self.config.logical_height = height;
        self
    }

    /// Size of one logical pixel in physical pixels.
    pub fn with_pixel_size(mut self, width: u32, height: u32) -> Self {
        self.config.pixel_width = width;
        self.config.pixel_height = height;
        self
    }

    /// Borderless fullscreen instead of a decorated window.
    pub fn fullscreen(mut self) -> Self {
        self.config.mode = WindowMode::Borderless;
        self
    }

    /// Sync presentation to the display refresh.
    pub fn vsync(mut self) -> Self {
        self.config.vsync = true;
        self
    }

    /// Build the engine and drive the game loop until the game stops or the
    /// main window is closed. Startup failures (no adapter, no window)
    /// surface as errors here.
    pub fn run(self, game: impl Game) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;
        let mut app = App {
            window_config: self.config.sanitised(),
            game,
            engine: None,
            error: None,
        };
        event_loop.run_app(&mut app).context("event loop error")?;
        match app.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

fn create_native_window(
    event_loop: &ActiveEventLoop,
    config: &WindowConfig,
) -> Result<Arc<Window>> {
    let mut attrs = Window::default_attributes()
        .with_title(&config.title)
        .with_inner_size(PhysicalSize::new(config.physical_width(), config.physical_height()))
        .with_resizable(config.resizable);
    if config.mode == WindowMode::Borderless {
        attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
    }
    let window = event_loop.create_window(attrs).context("failed to create native window")?;
    Ok(Arc::new(window))
}

// ── App (winit ApplicationHandler) ──────────────────────────────────────────

struct App<G: Game> {
    window_config: WindowConfig,
    game: G,
    engine: Option<Engine>,
    error: Option<anyhow::Error>,
}

impl<G: Game> App<G> {
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<Engine> {
        let window = create_native_window(event_loop, &self.window_config)?;

        // The adapter must be compatible with the main window's surface, so
        // the surface is created first and handed to both.
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(Arc::clone(&window))
            .context("failed to create main window surface")?;
        let gpu = Gpu::new(instance, &surface)?;

        let main_window =
            EngineWindow::with_surface(&gpu, window, surface, self.window_config.clone())?;
        Ok(Engine::new(gpu, main_window, self.window_config.title.clone()))
    }

    /// One full frame: timing, the user update, window creation backlog, the
    /// composite/present cycle, and the input snapshot rotation.
    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(engine) = self.engine.as_mut() else { return };

        let elapsed_us = engine.frame_timer.stop_and_start();
        engine.update_frame_stats(elapsed_us);
        engine.profiler.probe(PROBE_EVENTS);

        // Guard against huge steps after stalls (debugger, window drag).
        let dt = (elapsed_us as f32 / 1_000_000.0).min(0.25);
        let keep_going = self.game.on_update(engine, dt);
        engine.profiler.probe(PROBE_UPDATE);

        if !keep_going || engine.quit_requested {
            event_loop.exit();
            return;
        }

        engine.create_pending_windows(event_loop);
        engine.render_windows();
        engine.input.end_frame();

        // Closing (hiding) the main window ends the loop.
        if !engine.windows[0].is_shown() {
            event_loop.exit();
        }
    }
}

impl<G: Game> ApplicationHandler for App<G> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.engine.is_some() {
            return;
        }
        match self.init(event_loop) {
            Ok(engine) => self.engine = Some(engine),
            Err(e) => {
                self.error = Some(e);
                event_loop.exit();
                return;
            }
        }
        let engine = self.engine.as_mut().expect("engine just created");
        if !self.game.on_create(engine) {
            event_loop.exit();
            return;
        }
        // Windows requested during on_create.
        engine.create_pending_windows(event_loop);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(engine) = self.engine.as_ref() {
            engine.windows[0].window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        let Some(engine) = self.engine.as_mut() else { return };
        let Some(win_ix) = engine.window_index(id) else { return };

        match event {
            WindowEvent::CloseRequested => {
                // Closing hides the window; only the main window quits.
                engine.windows[win_ix].hide();
                if win_ix == 0 {
                    event_loop.exit();
                }
            }

            WindowEvent::Resized(size) => {
                let Engine { gpu, windows, .. } = engine;
                windows[win_ix].resize(gpu, size.width, size.height);
            }

            WindowEvent::Focused(focused) => {
                engine.windows[win_ix].keybd_focus = focused;
            }

            WindowEvent::CursorEntered { .. } => {
                engine.windows[win_ix].mouse_focus = true;
            }

            WindowEvent::CursorLeft { .. } => {
                engine.windows[win_ix].mouse_focus = false;
            }

            WindowEvent::CursorMoved { position, .. } => {
                engine.windows[win_ix].set_mouse(IVec2::new(position.x as i32, position.y as i32));
            }

            WindowEvent::MouseInput { button, state, .. } => {
                engine.input.set_mouse(button, state.is_pressed());
            }

            WindowEvent::MouseWheel { delta, .. } => {
                use winit::event::MouseScrollDelta;
                match delta {
                    MouseScrollDelta::LineDelta(_, y) => engine.input.wheel += y,
                    MouseScrollDelta::PixelDelta(pos) => {
                        engine.input.wheel += (pos.y / 100.0) as f32
                    }
                }
            }

            WindowEvent::KeyboardInput {
                event: KeyEvent { physical_key: PhysicalKey::Code(code), state, .. },
                ..
            } => {
                engine.input.set_key(code, state.is_pressed());
            }

            WindowEvent::RedrawRequested => {
                // The main window's redraw drives the whole frame; secondary
                // windows are composited in the same pass.
                if win_ix == 0 {
                    self.frame(event_loop);
                }
            }

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(engine) = self.engine.as_mut() {
            self.game.on_destroy(engine);
            engine.profiler.print_stats("game loop profiler");
        }
    }
}
