use std::collections::HashSet;

pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

// ── KeyState ────────────────────────────────────────────────────────────────

/// The four mutually exclusive states a key or button can be in on a given
/// frame. Recomputed once per frame by diffing the raw down-set against the
/// previous frame's snapshot; no key influences any other.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    /// Up, and was up last frame.
    #[default]
    Idle,
    /// Down this frame, up last frame (just went down).
    Pressed,
    /// Down this frame and last frame.
    Held,
    /// Up this frame, down last frame (just came up).
    Released,
}

impl KeyState {
    pub fn pressed(&self) -> bool {
        *self == KeyState::Pressed
    }
    pub fn held(&self) -> bool {
        *self == KeyState::Held
    }
    pub fn released(&self) -> bool {
        *self == KeyState::Released
    }
    pub fn idle(&self) -> bool {
        *self == KeyState::Idle
    }
    /// Down in any way this frame (pressed or held).
    pub fn down(&self) -> bool {
        matches!(self, KeyState::Pressed | KeyState::Held)
    }

    /// The per-key automaton: combine "down right now" with last frame's
    /// state.
    fn from_snapshot(down_now: bool, down_before: bool) -> Self {
        match (down_now, down_before) {
            (true, false) => KeyState::Pressed,
            (true, true) => KeyState::Held,
            (false, true) => KeyState::Released,
            (false, false) => KeyState::Idle,
        }
    }
}

// ── InputState ──────────────────────────────────────────────────────────────

/// Raw input snapshots plus the previous frame's copies.
///
/// Event handlers fill `keys_down` / `mouse_down` as winit reports changes;
/// [`InputState::end_frame`] rotates the snapshots once the frame is done.
/// Queries diff the two snapshots, so a key's [`KeyState`] is stable for the
/// whole frame no matter how often it is asked for.
#[derive(Debug, Default)]
pub struct InputState {
    pub(crate) keys_down: HashSet<KeyCode>,
    keys_prev: HashSet<KeyCode>,
    pub(crate) mouse_down: HashSet<MouseButton>,
    mouse_prev: HashSet<MouseButton>,
    /// Wheel movement accumulated over the current frame, in lines.
    pub(crate) wheel: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(&self, key: KeyCode) -> KeyState {
        KeyState::from_snapshot(self.keys_down.contains(&key), self.keys_prev.contains(&key))
    }

    pub fn mouse(&self, button: MouseButton) -> KeyState {
        KeyState::from_snapshot(
            self.mouse_down.contains(&button),
            self.mouse_prev.contains(&button),
        )
    }

    pub fn wheel(&self) -> f32 {
        self.wheel
    }

    /// Record a raw key transition. Normally fed by the event loop.
    pub fn set_key(&mut self, key: KeyCode, down: bool) {
        if down {
            self.keys_down.insert(key);
        } else {
            self.keys_down.remove(&key);
        }
    }

    /// Record a raw mouse-button transition. Normally fed by the event loop.
    pub fn set_mouse(&mut self, button: MouseButton, down: bool) {
        if down {
            self.mouse_down.insert(button);
        } else {
            self.mouse_down.remove(&button);
        }
    }

    /// Rotate the snapshots: the current down-sets become last frame's, and
    /// the per-frame wheel accumulator resets.
    pub fn end_frame(&mut self) {
        self.keys_prev = self.keys_down.clone();
        self.mouse_prev = self.mouse_down.clone();
        self.wheel = 0.0;
    }
}
