// --- File: config.rs ---
use crate::error::{FloresError, Result};
use rand::Rng;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub type Rgb = [u8; 3];

/// Inclusive-exclusive numeric range read from config as `{ min = .., max = .. }`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.min < self.max {
            rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    fn check(&self, name: &str) -> Result<()> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min > self.max {
            return Err(FloresError::InvalidConfig(format!(
                "{name}: range [{}, {}] is inverted or not finite",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

// --- Frame timing ---
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub max_flowers: usize,
    // Frames after which no new flowers are added.
    pub spawn_duration_frames: u64,
    // Frames after which the message may start fading in.
    pub message_delay_frames: u64,
    pub message_fade_frames: u64,
    // Frames a new flower takes to grow from nothing to full size.
    pub scale_in_frames: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            max_flowers: 150,
            spawn_duration_frames: 420,
            message_delay_frames: 300,
            message_fade_frames: 120,
            scale_in_frames: 90,
        }
    }
}

// --- Keep-clear ellipse and sampler ---
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    // Ellipse radii as fractions of canvas width / height.
    pub keep_clear_radius_x: f32,
    pub keep_clear_radius_y: f32,
    // Samples are drawn in [margin, 1 - margin] of each dimension.
    pub sampling_margin: f32,
    pub max_attempts: u32,
    // Radial push past the ellipse edge when every sample was rejected.
    pub fallback_offset: Range,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            keep_clear_radius_x: 0.43,
            keep_clear_radius_y: 0.35,
            sampling_margin: 0.01,
            max_attempts: 150,
            fallback_offset: Range::new(10.0, 40.0),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FlowerConfig {
    // A uniform draw above this picks a rose, otherwise a daisy.
    pub rose_threshold: f32,
    pub daisy_size: Range,
    pub rose_size: Range,
    pub mobile_size_multiplier: f32,
    // Degrees per frame, drawn from [-max, max].
    pub max_rotation_speed: f32,
    pub rose_palette: Vec<Rgb>,
    // Pointer distance under which flowers turn towards it.
    pub proximity_radius: f32,
    pub proximity_max_rotation: f32,
}

impl Default for FlowerConfig {
    fn default() -> Self {
        Self {
            rose_threshold: 0.4,
            daisy_size: Range::new(30.0, 70.0),
            rose_size: Range::new(70.0, 150.0),
            mobile_size_multiplier: 0.6,
            max_rotation_speed: 0.05,
            rose_palette: vec![
                [255, 100, 150],
                [200, 50, 100],
                [150, 0, 200],
                [255, 150, 200],
                [180, 80, 220],
                [255, 80, 120],
            ],
            proximity_radius: 100.0,
            proximity_max_rotation: 15.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PetalConfig {
    // Petals are only spawned on frames divisible by this.
    pub spawn_interval_frames: u64,
    pub daisy_chance: f32,
    pub size: Range,
    pub max_rotation_speed: f32,
    pub scale: Range,
    pub min_life: u32,
    pub max_life: u32,
}

impl Default for PetalConfig {
    fn default() -> Self {
        Self {
            spawn_interval_frames: 2,
            daisy_chance: 0.5,
            size: Range::new(10.0, 30.0),
            max_rotation_speed: 0.1,
            scale: Range::new(0.5, 1.0),
            min_life: 60,
            max_life: 120,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MessageConfig {
    pub title: String,
    pub body: String,
    pub hint: String,
    pub rotate: String,
    pub rotate_hint: String,
    pub tap_to_start: String,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            title: "¡Para el amor de mi vida!".into(),
            body: "¡Cada flor es un pedacito de mi corazón para ti!".into(),
            hint: "Mueve el ratón para ver la magia...".into(),
            rotate: "Por favor, gira tu celular\na horizontal para una mejor experiencia".into(),
            rotate_hint: "(Y toca la pantalla para iniciar)".into(),
            tap_to_start: "Toca la pantalla para comenzar".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub path: Option<PathBuf>,
    // Linear amplitude, 1.0 = unchanged.
    pub volume: f64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            path: None,
            volume: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub timing: TimingConfig,
    pub placement: PlacementConfig,
    pub flower: FlowerConfig,
    pub petal: PetalConfig,
    pub message: MessageConfig,
    pub audio: AudioConfig,
    // Canvas size as a fraction of the window's inner size.
    pub canvas_fraction: f32,
    // Canvases narrower or shorter than this (logical units) are treated as mobile.
    pub mobile_threshold: f32,
    // Fixed seed for reproducible scenes; entropy when unset.
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            timing: TimingConfig::default(),
            placement: PlacementConfig::default(),
            flower: FlowerConfig::default(),
            petal: PetalConfig::default(),
            message: MessageConfig::default(),
            audio: AudioConfig::default(),
            canvas_fraction: 0.8,
            mobile_threshold: 600.0,
            seed: None,
        }
    }
}

impl SceneConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| FloresError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SceneConfig = toml::from_str(&content)?;
        log::info!("Loaded scene config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let timing = &self.timing;
        // Spawning must be able to reach the cap before it is declared finished,
        // and the message is timed against the same frame budget.
        if timing.max_flowers as u64 > timing.spawn_duration_frames {
            return Err(invalid(format!(
                "timing.max_flowers ({}) exceeds timing.spawn_duration_frames ({})",
                timing.max_flowers, timing.spawn_duration_frames
            )));
        }
        if timing.message_delay_frames > timing.spawn_duration_frames {
            return Err(invalid(format!(
                "timing.message_delay_frames ({}) exceeds timing.spawn_duration_frames ({})",
                timing.message_delay_frames, timing.spawn_duration_frames
            )));
        }
        if timing.message_fade_frames == 0 || timing.scale_in_frames == 0 {
            return Err(invalid("fade and scale-in durations must be at least one frame"));
        }

        let placement = &self.placement;
        if !(placement.keep_clear_radius_x > 0.0 && placement.keep_clear_radius_y > 0.0) {
            return Err(invalid("keep-clear radii must be positive"));
        }
        if !(0.0..0.5).contains(&placement.sampling_margin) {
            return Err(invalid("placement.sampling_margin must be in [0, 0.5)"));
        }
        if placement.max_attempts == 0 {
            return Err(invalid("placement.max_attempts must be at least 1"));
        }
        placement.fallback_offset.check("placement.fallback_offset")?;

        let flower = &self.flower;
        flower.daisy_size.check("flower.daisy_size")?;
        flower.rose_size.check("flower.rose_size")?;
        if flower.rose_palette.is_empty() {
            return Err(invalid("flower.rose_palette must not be empty"));
        }
        if flower.mobile_size_multiplier <= 0.0 || flower.proximity_radius <= 0.0 {
            return Err(invalid("size multiplier and proximity radius must be positive"));
        }

        let petal = &self.petal;
        petal.size.check("petal.size")?;
        petal.scale.check("petal.scale")?;
        if petal.min_life == 0 || petal.min_life > petal.max_life {
            return Err(invalid(format!(
                "petal life range [{}, {}] must be non-empty and start above zero",
                petal.min_life, petal.max_life
            )));
        }
        if !(0.0..=1.0).contains(&petal.daisy_chance) {
            return Err(invalid("petal.daisy_chance must be in [0, 1]"));
        }
        if petal.spawn_interval_frames == 0 {
            return Err(invalid("petal.spawn_interval_frames must be at least 1"));
        }

        if !(self.canvas_fraction > 0.0 && self.canvas_fraction <= 1.0) {
            return Err(invalid("canvas_fraction must be in (0, 1]"));
        }
        if self.audio.volume < 0.0 {
            return Err(invalid("audio.volume must not be negative"));
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> FloresError {
    FloresError::InvalidConfig(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        SceneConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: SceneConfig = toml::from_str(
            r#"
            seed = 7
            [timing]
            max_flowers = 40
            [flower]
            rose_palette = [[10, 20, 30]]
            [message]
            title = "Hola"
            "#,
        )
        .unwrap();

        assert_eq!(config.seed, Some(7));
        assert_eq!(config.timing.max_flowers, 40);
        assert_eq!(config.timing.spawn_duration_frames, 420);
        assert_eq!(config.flower.rose_palette, vec![[10, 20, 30]]);
        assert_eq!(config.flower.rose_size, Range::new(70.0, 150.0));
        assert_eq!(config.message.title, "Hola");
        assert_eq!(config.message.hint, MessageConfig::default().hint);
        config.validate().unwrap();
    }

    #[test]
    fn cap_must_fit_in_spawn_duration() {
        let mut config = SceneConfig::default();
        config.timing.max_flowers = 500;
        assert!(matches!(config.validate(), Err(FloresError::InvalidConfig(_))));
    }

    #[test]
    fn message_delay_is_tied_to_spawn_duration() {
        let mut config = SceneConfig::default();
        config.timing.message_delay_frames = 421;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_inverted_ranges_and_empty_palette() {
        let mut config = SceneConfig::default();
        config.petal.size = Range::new(30.0, 10.0);
        assert!(config.validate().is_err());

        let mut config = SceneConfig::default();
        config.flower.rose_palette.clear();
        assert!(config.validate().is_err());

        let mut config = SceneConfig::default();
        config.petal.min_life = 0;
        assert!(config.validate().is_err());

        let mut config = SceneConfig::default();
        config.petal.daisy_chance = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn degenerate_range_samples_its_bound() {
        let mut rng = rand::thread_rng();
        assert_eq!(Range::new(5.0, 5.0).sample(&mut rng), 5.0);
        let value = Range::new(1.0, 2.0).sample(&mut rng);
        assert!(Range::new(1.0, 2.0).contains(value));
    }

    #[test]
    fn unreadable_file_reports_path() {
        let err = SceneConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, FloresError::ConfigRead { .. }));
    }
}
// --- End of File: config.rs ---
