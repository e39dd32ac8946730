pub mod audio;
pub mod decal;
pub mod draw;
pub mod engine;
pub mod font;
mod font_data;
pub mod input;
pub mod pixel;
pub mod renderer;
pub mod sprite;
pub mod timer;
pub mod window;

pub use decal::Decal;
pub use engine::{Engine, EngineBuilder, Game, KeyCode, MouseButton};
pub use input::KeyState;
pub use pixel::{Pixel, PixelFormat, PixelMode};
pub use sprite::{Flip, Sprite};

// Positions and scales throughout the API use glam's vector types.
pub use glam::{IVec2, Vec2};
