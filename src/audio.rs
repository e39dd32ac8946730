use std::collections::HashMap;
use std::path::Path;

use kira::{
    Volume,
    manager::{AudioManager, AudioManagerSettings, backend::DefaultBackend},
    sound::{
        PlaybackRate, PlaybackState,
        static_sound::{StaticSoundData, StaticSoundHandle, StaticSoundSettings},
    },
    tween::Tween,
};

/// Configuration for playing a sound effect with variation.
#[derive(Debug, Clone, Copy)]
pub struct SoundConfig {
    pub volume: f32,
    pub pitch: f32,
    /// Random pitch variation range (e.g. 0.1 = +/- 10%)
    pub pitch_variation: f32,
    /// Random volume variation range
    pub volume_variation: f32,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self { volume: 1.0, pitch: 1.0, pitch_variation: 0.0, volume_variation: 0.0 }
    }
}

/// Sound playback: named one-shot effects plus one looping music track.
///
/// The manager is `None` when no audio device is available (headless / CI);
/// every operation then degrades to a no-op so the engine keeps running.
pub struct AudioContext {
    manager: Option<AudioManager>,
    sounds: HashMap<String, StaticSoundData>,
    active_music: Option<StaticSoundHandle>,
    /// Shared volume for the music track, in [0.0, 1.0].
    music_volume: f32,
    time_seed: u64,
}

impl AudioContext {
    pub fn new() -> Self {
        let manager = match AudioManager::<DefaultBackend>::new(AudioManagerSettings::default()) {
            Ok(m) => Some(m),
            Err(e) => {
                eprintln!("[audio] Failed to initialize audio manager: {e}. Audio disabled.");
                None
            }
        };
        Self {
            manager,
            sounds: HashMap::new(),
            active_music: None,
            music_volume: 1.0,
            time_seed: 0,
        }
    }

    /// Returns true if audio hardware is available.
    pub fn is_available(&self) -> bool {
        self.manager.is_some()
    }

    /// Load a sound file (OGG, WAV, etc.) into memory under `name`.
    /// Logs a warning and returns if the file cannot be read.
    pub fn load_sound<P: AsRef<Path>>(&mut self, name: &str, path: P) {
        match StaticSoundData::from_file(path.as_ref()) {
            Ok(sound) => {
                self.sounds.insert(name.to_string(), sound);
            }
            Err(e) => eprintln!(
                "[audio] Failed to load '{}' from '{}': {e}",
                name,
                path.as_ref().display()
            ),
        }
    }

    /// Play a sound effect once with optional variation.
    pub fn play(&mut self, name: &str, config: SoundConfig) {
        let Some(manager) = self.manager.as_mut() else { return };
        if let Some(data) = self.sounds.get(name) {
            let mut settings = StaticSoundSettings::new();

            // Advance the seed independently for each random variable to
            // avoid LCG correlation.
            self.time_seed = self.time_seed.wrapping_add(1);
            let p_offset = (pseudo_rand(self.time_seed) - 0.5) * 2.0 * config.pitch_variation;
            self.time_seed = self.time_seed.wrapping_add(1);
            let v_offset = (pseudo_rand(self.time_seed) - 0.5) * 2.0 * config.volume_variation;

            settings.playback_rate = PlaybackRate::Factor((config.pitch + p_offset) as f64).into();
            settings.volume =
                Volume::Amplitude((config.volume + v_offset).clamp(0.0, 2.0) as f64).into();

            let _ = manager.play(data.clone().with_settings(settings));
        } else {
            eprintln!("[audio] play: unknown sound '{name}'");
        }
    }

    /// Play background music that loops indefinitely, fading in over
    /// `fade_in_secs`. Any previous music track fades out first.
    pub fn play_music(&mut self, name: &str, fade_in_secs: f32) {
        let Some(manager) = self.manager.as_mut() else { return };
        if let Some(data) = self.sounds.get(name) {
            // Fade out previous music with a fixed short duration independent
            // of the new track's fade-in.
            if let Some(mut handle) = self.active_music.take() {
                let _ = handle.stop(Tween {
                    duration: std::time::Duration::from_secs_f32(0.5),
                    ..Default::default()
                });
            }

            let mut settings = StaticSoundSettings::new().loop_region(0.0..);
            settings.volume = Volume::Amplitude(0.0).into();

            match manager.play(data.clone().with_settings(settings)) {
                Ok(mut handle) => {
                    let _ = handle.set_volume(
                        Volume::Amplitude(self.music_volume as f64),
                        Tween {
                            duration: std::time::Duration::from_secs_f32(fade_in_secs),
                            ..Default::default()
                        },
                    );
                    self.active_music = Some(handle);
                }
                Err(e) => eprintln!("[audio] Failed to play music '{name}': {e}"),
            }
        } else {
            eprintln!("[audio] play_music: unknown sound '{name}'");
        }
    }

    /// Pause the music track (no-op when nothing is playing).
    pub fn pause_music(&mut self) {
        if let Some(handle) = self.active_music.as_mut() {
            let _ = handle.pause(Tween::default());
        }
    }

    /// Resume a paused music track.
    pub fn resume_music(&mut self) {
        if let Some(handle) = self.active_music.as_mut() {
            let _ = handle.resume(Tween::default());
        }
    }

    /// Stop the music track, fading out over `fade_out_secs`.
    pub fn stop_music(&mut self, fade_out_secs: f32) {
        if let Some(mut handle) = self.active_music.take() {
            let _ = handle.stop(Tween {
                duration: std::time::Duration::from_secs_f32(fade_out_secs),
                ..Default::default()
            });
        }
    }

    /// Set the music volume, shared by the current and future tracks.
    /// The value is clamped to [0.0, 1.0].
    pub fn set_music_volume(&mut self, volume: f32) {
        self.music_volume = volume.clamp(0.0, 1.0);
        if let Some(handle) = self.active_music.as_mut() {
            let _ = handle.set_volume(
                Volume::Amplitude(self.music_volume as f64),
                Tween::default(),
            );
        }
    }

    pub fn music_volume(&self) -> f32 {
        self.music_volume
    }

    pub fn is_music_playing(&self) -> bool {
        self.active_music
            .as_ref()
            .is_some_and(|h| matches!(h.state(), PlaybackState::Playing))
    }

    pub fn is_music_paused(&self) -> bool {
        self.active_music
            .as_ref()
            .is_some_and(|h| matches!(h.state(), PlaybackState::Paused | PlaybackState::Pausing))
    }
}

impl Default for AudioContext {
    fn default() -> Self {
        Self::new()
    }
}

fn pseudo_rand(seed: u64) -> f32 {
    let x = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    (x >> 33) as f32 / u32::MAX as f32
}
