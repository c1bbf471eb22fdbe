// --- File: simulation.rs ---
use crate::config::{Rgb, SceneConfig};
use crate::constants::DAISY_COLOR;
use crate::placement::{KeepClearEllipse, SamplingBounds, place_outside};
use crate::presentation::{Presentation, SceneMode, is_inside_canvas};
use crate::utils::map_range;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

// --- Core Data Structures ---

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FlowerKind {
    Daisy,
    Rose,
}

/// Placed once, never removed. Only its scale-in depends on time.
#[derive(Debug, Clone)]
pub struct Flower {
    pub kind: FlowerKind,
    pub position: Vec2,
    pub size: f32,
    pub rotation: f32,       // degrees
    pub rotation_speed: f32, // degrees per frame
    pub color: Rgb,
    pub birth_frame: u64,
}

/// Short-lived particle left behind by pointer movement.
#[derive(Debug, Clone)]
pub struct Petal {
    pub kind: FlowerKind,
    pub position: Vec2,
    pub size: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub color: Rgb,
    pub scale: f32,
    pub life: u32,
    pub initial_life: u32,
    pub alpha: f32, // 0..=255
}

impl Petal {
    fn age(&mut self) {
        self.life = self.life.saturating_sub(1);
        self.alpha = map_range(self.life as f32, 0.0, self.initial_life as f32, 0.0, 255.0);
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0
    }
}

pub type SimRng = StdRng;

pub struct SceneState {
    pub config: SceneConfig,
    rng: SimRng,
    canvas: Vec2,
    presentation: Presentation,
    // Only advances while running.
    frame: u64,
    flowers: Vec<Flower>,
    petals: Vec<Petal>,
    flowers_finished: bool,
    message_shown: bool,
    pointer: Option<Vec2>,
    last_petal_frame: Option<u64>,
}

impl SceneState {
    pub fn new(canvas: Vec2, config: SceneConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SimRng::seed_from_u64(seed),
            None => SimRng::from_entropy(),
        };
        let presentation = Presentation::new(canvas, config.mobile_threshold);
        Self {
            rng,
            canvas,
            presentation,
            frame: 0,
            flowers: Vec::with_capacity(config.timing.max_flowers),
            petals: Vec::new(),
            flowers_finished: false,
            message_shown: false,
            pointer: None,
            last_petal_frame: None,
            config,
        }
    }

    /// Advances one frame. Does nothing while paused.
    pub fn update(&mut self) {
        if self.presentation.is_paused() {
            return;
        }
        self.frame += 1;

        // Petals that reached zero last frame were drawn fully transparent; drop them now.
        self.petals.retain(Petal::is_alive);

        self.spawn_flowers();

        for petal in &mut self.petals {
            petal.age();
        }

        if !self.message_shown
            && self.flowers_finished
            && self.frame > self.config.timing.message_delay_frames
        {
            self.message_shown = true;
            log::info!("Revealing message at frame {}", self.frame);
        }
    }

    fn spawn_flowers(&mut self) {
        if self.flowers_finished {
            return;
        }
        let timing = &self.config.timing;
        if self.flowers.len() < timing.max_flowers && self.frame < timing.spawn_duration_frames {
            let flower = self.create_flower();
            self.flowers.push(flower);
        }
        let timing = &self.config.timing;
        if self.flowers.len() >= timing.max_flowers && self.frame >= timing.spawn_duration_frames {
            self.flowers_finished = true;
            log::info!(
                "Flower spawning finished at frame {} with {} flowers",
                self.frame,
                self.flowers.len()
            );
        }
    }

    fn create_flower(&mut self) -> Flower {
        let flower_config = &self.config.flower;
        let placement_config = &self.config.placement;

        let kind = if self.rng.gen_range(0.0..1.0) > flower_config.rose_threshold {
            FlowerKind::Rose
        } else {
            FlowerKind::Daisy
        };

        let ellipse = KeepClearEllipse::for_canvas(self.canvas, placement_config);
        let bounds = SamplingBounds::for_canvas(self.canvas, placement_config.sampling_margin);
        let placement = place_outside(&mut self.rng, &ellipse, &bounds, placement_config);

        let size_multiplier = if self.presentation.is_mobile() {
            flower_config.mobile_size_multiplier
        } else {
            1.0
        };
        let (size, color) = match kind {
            FlowerKind::Daisy => (flower_config.daisy_size.sample(&mut self.rng), DAISY_COLOR),
            FlowerKind::Rose => (
                flower_config.rose_size.sample(&mut self.rng),
                pick_color(&mut self.rng, &flower_config.rose_palette),
            ),
        };

        let rotation = self.rng.gen_range(0.0..360.0);
        let max_speed = flower_config.max_rotation_speed;
        let rotation_speed = symmetric(&mut self.rng, max_speed);

        Flower {
            kind,
            position: placement.position,
            size: size * size_multiplier,
            rotation,
            rotation_speed,
            color,
            birth_frame: self.frame,
        }
    }

    fn create_petal(&mut self, position: Vec2) -> Petal {
        let petal_config = &self.config.petal;
        let kind = if self.rng.gen_bool((petal_config.daisy_chance as f64).clamp(0.0, 1.0)) {
            FlowerKind::Daisy
        } else {
            FlowerKind::Rose
        };
        let color = match kind {
            FlowerKind::Daisy => DAISY_COLOR,
            FlowerKind::Rose => pick_color(&mut self.rng, &self.config.flower.rose_palette),
        };
        let size = petal_config.size.sample(&mut self.rng);
        let rotation = self.rng.gen_range(0.0..360.0);
        let rotation_speed = symmetric(&mut self.rng, petal_config.max_rotation_speed);
        let scale = petal_config.scale.sample(&mut self.rng);
        let life = self
            .rng
            .gen_range(petal_config.min_life..=petal_config.max_life.max(petal_config.min_life));

        Petal {
            kind,
            position,
            size,
            rotation,
            rotation_speed,
            color,
            scale,
            life,
            initial_life: life,
            alpha: 255.0,
        }
    }

    // --- Input ---

    /// Pointer (mouse or touch) moved to `position` in canvas coordinates.
    /// Returns true when a petal was spawned.
    pub fn on_pointer_moved(&mut self, position: Vec2) -> bool {
        self.pointer = Some(position);
        if self.presentation.is_paused() || !is_inside_canvas(position, self.canvas) {
            return false;
        }
        // At most one petal per eligible frame, however many move events arrive.
        if self.frame % self.config.petal.spawn_interval_frames != 0
            || self.last_petal_frame == Some(self.frame)
        {
            return false;
        }
        let petal = self.create_petal(position);
        self.petals.push(petal);
        self.last_petal_frame = Some(self.frame);
        true
    }

    pub fn on_pointer_left(&mut self) {
        self.pointer = None;
    }

    pub fn on_gesture(&mut self) -> SceneMode {
        self.presentation.on_gesture(self.canvas)
    }

    pub fn resize(&mut self, canvas: Vec2) -> SceneMode {
        if canvas != self.canvas {
            log::info!("Canvas resized to {:.0}x{:.0}", canvas.x, canvas.y);
            self.canvas = canvas;
        }
        self.presentation.on_resize(canvas)
    }

    // --- Accessors ---

    pub fn frame(&self) -> u64 {
        self.frame
    }
    pub fn canvas(&self) -> Vec2 {
        self.canvas
    }
    pub fn mode(&self) -> SceneMode {
        self.presentation.mode()
    }
    pub fn is_paused(&self) -> bool {
        self.presentation.is_paused()
    }
    pub fn flowers(&self) -> &[Flower] {
        &self.flowers
    }
    pub fn petals(&self) -> &[Petal] {
        &self.petals
    }
    pub fn flowers_finished(&self) -> bool {
        self.flowers_finished
    }
    pub fn message_shown(&self) -> bool {
        self.message_shown
    }
    /// Pointer position if it is strictly inside the canvas.
    pub fn pointer_in_canvas(&self) -> Option<Vec2> {
        self.pointer.filter(|p| is_inside_canvas(*p, self.canvas))
    }
}

fn pick_color<R: Rng + ?Sized>(rng: &mut R, palette: &[Rgb]) -> Rgb {
    palette.choose(rng).copied().unwrap_or(DAISY_COLOR)
}

// Uniform in [-max, max].
fn symmetric<R: Rng + ?Sized>(rng: &mut R, max: f32) -> f32 {
    if max > 0.0 { rng.gen_range(-max..=max) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::CanvasRect;
    use winit::dpi::PhysicalSize;

    fn seeded(canvas: Vec2, seed: u64) -> SceneState {
        let config = SceneConfig {
            seed: Some(seed),
            ..SceneConfig::default()
        };
        SceneState::new(canvas, config)
    }

    fn desktop() -> SceneState {
        seeded(Vec2::new(800.0, 600.0), 1234)
    }

    #[test]
    fn one_flower_per_frame_until_cap() {
        let mut scene = desktop();
        assert_eq!(scene.mode(), SceneMode::Running);
        for frame in 1..=150u64 {
            scene.update();
            assert_eq!(scene.frame(), frame);
            assert_eq!(scene.flowers().len() as u64, frame);
            assert_eq!(scene.flowers().last().map(|f| f.birth_frame), Some(frame));
        }
        for _ in 0..1_000 {
            scene.update();
            assert_eq!(scene.flowers().len(), 150);
        }
    }

    #[test]
    fn finished_only_after_spawn_duration() {
        let mut scene = desktop();
        for _ in 0..419 {
            scene.update();
        }
        assert!(!scene.flowers_finished());
        assert!(!scene.message_shown());
        scene.update();
        assert_eq!(scene.frame(), 420);
        assert!(scene.flowers_finished());
        // frame > delay and finished: latched in the same frame.
        assert!(scene.message_shown());
        for _ in 0..100 {
            scene.update();
            assert!(scene.flowers_finished());
            assert!(scene.message_shown());
        }
    }

    #[test]
    fn message_needs_both_delay_and_finish() {
        let mut config = SceneConfig {
            seed: Some(5),
            ..SceneConfig::default()
        };
        config.timing.max_flowers = 10;
        config.timing.spawn_duration_frames = 20;
        config.timing.message_delay_frames = 15;
        let mut scene = SceneState::new(Vec2::new(800.0, 600.0), config);

        for _ in 0..15 {
            scene.update();
            assert!(!scene.message_shown());
        }
        assert_eq!(scene.flowers().len(), 10);
        for _ in 15..19 {
            scene.update();
            assert!(!scene.flowers_finished());
            assert!(!scene.message_shown(), "frame {}", scene.frame());
        }
        scene.update();
        assert_eq!(scene.frame(), 20);
        assert!(scene.flowers_finished());
        assert!(scene.message_shown());
    }

    #[test]
    fn flowers_avoid_the_keep_clear_ellipse() {
        let mut scene = desktop();
        for _ in 0..150 {
            scene.update();
        }
        let ellipse = KeepClearEllipse::for_canvas(scene.canvas(), &scene.config.placement);
        for flower in scene.flowers() {
            assert!(!ellipse.contains(flower.position), "{:?}", flower.position);
        }
    }

    #[test]
    fn flower_attributes_follow_their_kind() {
        let mut scene = desktop();
        for _ in 0..150 {
            scene.update();
        }
        let config = &scene.config.flower;
        let mut roses = 0;
        for flower in scene.flowers() {
            assert!((0.0..360.0).contains(&flower.rotation));
            assert!(flower.rotation_speed.abs() <= config.max_rotation_speed);
            match flower.kind {
                FlowerKind::Daisy => {
                    assert!(config.daisy_size.contains(flower.size));
                    assert_eq!(flower.color, DAISY_COLOR);
                }
                FlowerKind::Rose => {
                    roses += 1;
                    assert!(config.rose_size.contains(flower.size));
                    assert!(config.rose_palette.contains(&flower.color));
                }
            }
        }
        // 60% roses expected; loose bounds for a 150 sample.
        assert!((60..=120).contains(&roses), "roses = {roses}");
    }

    #[test]
    fn mobile_flowers_are_smaller() {
        let mut scene = seeded(Vec2::new(560.0, 400.0), 8);
        scene.on_gesture();
        assert_eq!(scene.mode(), SceneMode::Running);
        for _ in 0..150 {
            scene.update();
        }
        let config = &scene.config.flower;
        let max = config.rose_size.max * config.mobile_size_multiplier;
        assert!(scene.flowers().iter().all(|f| f.size <= max));
    }

    #[test]
    fn paused_scene_does_not_advance() {
        let mut scene = seeded(Vec2::new(400.0, 700.0), 2);
        assert_eq!(scene.mode(), SceneMode::WaitingForOrientation);
        for _ in 0..10 {
            scene.update();
        }
        assert_eq!(scene.frame(), 0);
        assert!(scene.flowers().is_empty());
        assert!(!scene.on_pointer_moved(Vec2::new(100.0, 100.0)));

        assert_eq!(scene.resize(Vec2::new(700.0, 400.0)), SceneMode::WaitingForFirstTouch);
        scene.update();
        assert_eq!(scene.frame(), 0);

        assert_eq!(scene.on_gesture(), SceneMode::Running);
        scene.update();
        assert_eq!(scene.frame(), 1);
        assert_eq!(scene.flowers().len(), 1);
    }

    #[test]
    fn petals_spawn_on_even_frames_inside_canvas() {
        let mut scene = desktop();
        assert!(!scene.on_pointer_moved(Vec2::new(900.0, 100.0)));
        assert!(scene.on_pointer_moved(Vec2::new(100.0, 100.0)));
        assert!(!scene.on_pointer_moved(Vec2::new(101.0, 100.0)));
        assert!(!scene.on_pointer_moved(Vec2::new(0.0, 100.0)));
        scene.update();
        assert!(!scene.on_pointer_moved(Vec2::new(100.0, 100.0)));
        scene.update();
        assert!(scene.on_pointer_moved(Vec2::new(120.0, 90.0)));
        assert_eq!(scene.petals().len(), 2);

        let config = &scene.config.petal;
        for petal in scene.petals() {
            assert!(config.size.contains(petal.size));
            assert!(config.scale.contains(petal.scale));
            assert!((config.min_life..=config.max_life).contains(&petal.initial_life));
        }

        let spawned = spawn_many_petals(&mut scene, 2_000);
        let max_speed = scene.config.petal.max_rotation_speed;
        assert!(spawned.iter().all(|p| p.rotation_speed.abs() <= max_speed));
        assert!(spawned.iter().any(|p| p.rotation_speed.abs() > max_speed / 2.0));
        let share = daisy_share(&spawned);
        assert!((0.42..0.58).contains(&share), "daisy share {share}");
    }

    // Moves the pointer once per frame for `frames` frames; returns every petal spawned.
    fn spawn_many_petals(scene: &mut SceneState, frames: usize) -> Vec<Petal> {
        let mut spawned = Vec::new();
        for _ in 0..frames {
            if scene.on_pointer_moved(Vec2::new(100.0, 100.0)) {
                spawned.extend(scene.petals().last().cloned());
            }
            scene.update();
        }
        spawned
    }

    fn daisy_share(petals: &[Petal]) -> f32 {
        let daisies = petals.iter().filter(|p| p.kind == FlowerKind::Daisy).count();
        daisies as f32 / petals.len() as f32
    }

    #[test]
    fn daisy_chance_sets_the_daisy_share() {
        let mut config = SceneConfig {
            seed: Some(99),
            ..SceneConfig::default()
        };
        config.petal.daisy_chance = 0.9;
        let mut scene = SceneState::new(Vec2::new(800.0, 600.0), config);
        let spawned = spawn_many_petals(&mut scene, 2_000);
        assert_eq!(spawned.len(), 1_000);
        let share = daisy_share(&spawned);
        assert!((0.84..0.96).contains(&share), "daisy share {share}");

        let mut config = SceneConfig::default();
        config.petal.daisy_chance = 0.0;
        let mut scene = SceneState::new(Vec2::new(800.0, 600.0), config);
        let spawned = spawn_many_petals(&mut scene, 200);
        assert!(spawned.iter().all(|p| p.kind == FlowerKind::Rose));
    }

    #[test]
    fn minimizing_keeps_flowers_on_the_last_canvas() {
        let mut scene = seeded(Vec2::new(1024.0, 640.0), 5);
        for _ in 0..20 {
            scene.update();
        }
        // A minimized window has no canvas, so the scene is never shrunk.
        if let Some(canvas) = CanvasRect::fit(PhysicalSize::new(0, 0), 1.0, 0.8) {
            scene.resize(canvas.size);
        }
        for _ in 0..60 {
            scene.update();
        }
        let restored = CanvasRect::fit(PhysicalSize::new(1280, 800), 1.0, 0.8).unwrap();
        scene.resize(restored.size);

        assert_eq!(scene.canvas(), Vec2::new(1024.0, 640.0));
        assert_eq!(scene.flowers().len(), 80);
        let margin = scene.config.placement.sampling_margin;
        let bounds = SamplingBounds::for_canvas(scene.canvas(), margin);
        assert!(scene.flowers().iter().all(|f| bounds.contains(f.position)));
    }

    #[test]
    fn petal_fades_to_zero_then_disappears() {
        let mut scene = desktop();
        assert!(scene.on_pointer_moved(Vec2::new(50.0, 50.0)));
        let initial_life = scene.petals()[0].initial_life;

        let mut previous_alpha = 255.0;
        for _ in 0..initial_life {
            scene.update();
            let petal = &scene.petals()[0];
            assert!(petal.alpha <= previous_alpha);
            assert_eq!(petal.alpha == 0.0, petal.life == 0);
            previous_alpha = petal.alpha;
        }
        assert_eq!(scene.petals()[0].life, 0);
        assert_eq!(scene.petals()[0].alpha, 0.0);

        scene.update();
        assert!(scene.petals().is_empty());
    }

    #[test]
    fn pointer_outside_canvas_is_ignored_for_proximity() {
        let mut scene = desktop();
        scene.on_pointer_moved(Vec2::new(-5.0, 20.0));
        assert_eq!(scene.pointer_in_canvas(), None);
        scene.on_pointer_moved(Vec2::new(5.0, 20.0));
        assert_eq!(scene.pointer_in_canvas(), Some(Vec2::new(5.0, 20.0)));
        scene.on_pointer_left();
        assert_eq!(scene.pointer_in_canvas(), None);
    }

    #[test]
    fn same_seed_same_scene() {
        let mut a = desktop();
        let mut b = desktop();
        for _ in 0..60 {
            a.update();
            b.update();
        }
        let positions = |s: &SceneState| s.flowers().iter().map(|f| f.position).collect::<Vec<_>>();
        assert_eq!(positions(&a), positions(&b));
    }
}
// --- End of File: simulation.rs ---
