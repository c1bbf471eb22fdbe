// --- File: constants.rs ---
// --- Global Scene Constants ---
// Clear color for the window area around the canvas.
pub const PAGE_COLOR: wgpu::Color = wgpu::Color {
    r: 0.97,
    g: 0.94,
    b: 0.98,
    a: 1.0,
};
pub const CANVAS_COLOR: [u8; 3] = [210, 180, 230];
pub const OVERLAY_COLOR: [u8; 4] = [210, 180, 230, 220];

pub const WINDOW_TITLE: &str = "Flores";
pub const WINDOW_WIDTH: u32 = 1280;
pub const WINDOW_HEIGHT: u32 = 800;

// One scene "frame" is one fixed tick.
pub const FIXED_TIMESTEP: f64 = 1.0 / 60.0;
// Ticks simulated per redraw at most, so a stalled window does not fast-forward the scene.
pub const MAX_TICKS_PER_REDRAW: u32 = 4;
pub const FPS_UPDATE_INTERVAL_SECS: f64 = 2.0;

// Initial size of the GPU instance buffer (grows on demand).
pub const INITIAL_INSTANCE_CAPACITY: usize = 16_384;

// --- Flower Geometry ---
pub const DAISY_PETAL_COUNT: usize = 20;
pub const DAISY_ALPHA: u8 = 200;
pub const DAISY_CENTER_COLOR: [u8; 3] = [255, 200, 0];
pub const ROSE_RING_COUNT: usize = 5;
pub const ROSE_PETALS_PER_RING: usize = 6;
pub const ROSE_RING_TWIST_DEGREES: f32 = 25.0;
pub const ROSE_RING_DARKEN_STEP: f32 = 0.15;
pub const ROSE_RING_SHRINK_STEP: f32 = 0.08;
pub const ROSE_CENTER_SHADE: f32 = 0.8;
pub const DAISY_COLOR: [u8; 3] = [255, 255, 255];

// --- Message Text ---
pub const TITLE_TEXT_SIZE: f32 = 0.04;
pub const BODY_TEXT_SIZE: f32 = 0.03;
pub const HINT_TEXT_SIZE: f32 = 0.02;
pub const OVERLAY_TEXT_SIZE: f32 = 0.05;
pub const OVERLAY_SUBTEXT_SIZE: f32 = 0.03;
pub const TEXT_SHADOW_OFFSET: f32 = 2.0;
pub const TEXT_SHADOW_ALPHA: f32 = 0.3;
pub const HINT_ALPHA: f32 = 0.8;
pub const TITLE_COLOR: [u8; 3] = [50, 50, 50];
pub const BODY_COLOR: [u8; 3] = [70, 70, 70];
pub const HINT_COLOR: [u8; 3] = [100, 100, 100];
// Lines wider than this fraction of the canvas are shrunk to fit.
pub const MAX_TEXT_WIDTH_FRACTION: f32 = 0.94;

// --- End of File: constants.rs ---
