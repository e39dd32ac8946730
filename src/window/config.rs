// ── WindowMode ────────────────────────────────────────────────────────────────

/// Controls how the OS window is presented.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WindowMode {
    /// Standard decorated window at the configured resolution.
    Windowed,
    /// Borderless window sized to match the monitor's native resolution.
    Borderless,
}

// ── WindowConfig ──────────────────────────────────────────────────────────────

/// Window configuration snapshot.
///
/// - **logical** dimensions are the internal game resolution: the size of the
///   layer canvases and the coordinate space of every draw call.
/// - **pixel** dimensions are the size of one logical pixel in physical
///   (screen) pixels, so the physical window size is
///   `logical × pixel` per axis.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowConfig {
    /// Text in the window title bar.
    pub title: String,
    /// Internal game / render resolution width in logical pixels.
    pub logical_width: u32,
    /// Internal game / render resolution height in logical pixels.
    pub logical_height: u32,
    /// Width of one logical pixel in physical pixels.
    pub pixel_width: u32,
    /// Height of one logical pixel in physical pixels.
    pub pixel_height: u32,
    /// Active window mode.
    pub mode: WindowMode,
    /// Sync presentation to the display refresh.
    pub vsync: bool,
    /// Allow the OS to resize the window.
    pub resizable: bool,
}

impl WindowConfig {
    /// Returns a `WindowConfig` initialised to 320 × 180 logical pixels at
    /// 4 × 4 physical pixels each, in `Windowed` mode.
    pub fn default() -> Self {
        Self {
            title: "pixen".into(),
            logical_width: 320,
            logical_height: 180,
            pixel_width: 4,
            pixel_height: 4,
            mode: WindowMode::Windowed,
            vsync: false,
            resizable: false,
        }
    }

    /// Physical window width: `logical_width × pixel_width`.
    pub fn physical_width(&self) -> u32 {
        self.logical_width * self.pixel_width
    }

    /// Physical window height: `logical_height × pixel_height`.
    pub fn physical_height(&self) -> u32 {
        self.logical_height * self.pixel_height
    }

    /// Aspect ratio of the logical resolution.
    ///
    /// Returns `0.0` when `logical_height` is zero to avoid division by zero.
    pub fn aspect_ratio(&self) -> f32 {
        if self.logical_height == 0 {
            return 0.0;
        }
        self.logical_width as f32 / self.logical_height as f32
    }

    /// Clamp zero pixel/logical sizes up to 1 so a bad configuration degrades
    /// to a tiny window instead of a division by zero later on.
    pub(crate) fn sanitised(mut self) -> Self {
        if self.logical_width == 0 || self.logical_height == 0 {
            eprintln!(
                "[window] zero logical size {}x{}, clamping to 1",
                self.logical_width, self.logical_height
            );
            self.logical_width = self.logical_width.max(1);
            self.logical_height = self.logical_height.max(1);
        }
        if self.pixel_width == 0 || self.pixel_height == 0 {
            eprintln!(
                "[window] zero pixel size {}x{}, clamping to 1",
                self.pixel_width, self.pixel_height
            );
            self.pixel_width = self.pixel_width.max(1);
            self.pixel_height = self.pixel_height.max(1);
        }
        self
    }
}
