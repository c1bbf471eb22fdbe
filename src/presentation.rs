// --- File: presentation.rs ---
use glam::Vec2;
use winit::dpi::{PhysicalPosition, PhysicalSize};

/// What the scene is doing right now. Replaces the loose paused / mobile /
/// orientation / interacted flags so invalid combinations cannot exist.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SceneMode {
    // Mobile held in portrait: paused behind the rotate-device overlay.
    WaitingForOrientation,
    // Mobile in landscape that has not been touched yet: paused behind the tap overlay.
    WaitingForFirstTouch,
    Running,
}

impl SceneMode {
    pub fn is_paused(self) -> bool {
        self != SceneMode::Running
    }
}

#[derive(Debug, Clone)]
pub struct Presentation {
    mobile: bool,
    interacted: bool,
    mode: SceneMode,
}

impl Presentation {
    /// Classifies the device once, from the canvas size at setup.
    pub fn new(canvas: Vec2, mobile_threshold: f32) -> Self {
        let mobile = canvas.x < mobile_threshold || canvas.y < mobile_threshold;
        let mut presentation = Self {
            mobile,
            interacted: false,
            mode: SceneMode::WaitingForFirstTouch,
        };
        presentation.evaluate(canvas);
        log::info!(
            "Canvas {:.0}x{:.0} classified as {}, starting in {:?}",
            canvas.x,
            canvas.y,
            if mobile { "mobile" } else { "desktop" },
            presentation.mode
        );
        presentation
    }

    fn evaluate(&mut self, canvas: Vec2) -> SceneMode {
        let next = if self.mobile && canvas.y > canvas.x {
            SceneMode::WaitingForOrientation
        } else if self.mobile && !self.interacted {
            SceneMode::WaitingForFirstTouch
        } else {
            SceneMode::Running
        };
        if next != self.mode {
            log::info!("Scene mode {:?} -> {:?}", self.mode, next);
            self.mode = next;
        }
        self.mode
    }

    pub fn on_resize(&mut self, canvas: Vec2) -> SceneMode {
        self.evaluate(canvas)
    }

    /// A press or touch only counts as the first interaction while paused.
    pub fn on_gesture(&mut self, canvas: Vec2) -> SceneMode {
        if self.mode.is_paused() {
            self.interacted = true;
            self.evaluate(canvas);
        }
        self.mode
    }

    pub fn mode(&self) -> SceneMode {
        self.mode
    }
    pub fn is_paused(&self) -> bool {
        self.mode.is_paused()
    }
    pub fn is_mobile(&self) -> bool {
        self.mobile
    }
}

/// The centered drawing area inside the window, in logical units.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CanvasRect {
    pub origin: Vec2,
    pub size: Vec2,
    scale_factor: f32,
}

impl CanvasRect {
    /// None while the window has no area, e.g. when minimized.
    pub fn fit(window: PhysicalSize<u32>, scale_factor: f64, fraction: f32) -> Option<Self> {
        if window.width == 0 || window.height == 0 {
            return None;
        }
        let scale_factor = (scale_factor as f32).max(f32::EPSILON);
        let window_logical = Vec2::new(window.width as f32, window.height as f32) / scale_factor;
        let size = (window_logical * fraction).max(Vec2::ONE).floor();
        let origin = ((window_logical - size) * 0.5).floor();
        Some(Self {
            origin,
            size,
            scale_factor,
        })
    }

    /// Window pointer position (physical pixels) -> canvas coordinates.
    pub fn to_canvas(&self, position: PhysicalPosition<f64>) -> Vec2 {
        Vec2::new(position.x as f32, position.y as f32) / self.scale_factor - self.origin
    }

    /// Viewport in physical pixels as (x, y, width, height).
    pub fn physical_viewport(&self) -> [f32; 4] {
        let origin = self.origin * self.scale_factor;
        let size = self.size * self.scale_factor;
        [origin.x, origin.y, size.x, size.y]
    }
}

/// Strictly inside the canvas; the edges themselves count as outside.
pub fn is_inside_canvas(point: Vec2, canvas: Vec2) -> bool {
    point.x > 0.0 && point.x < canvas.x && point.y > 0.0 && point.y < canvas.y
}

// --- End of File: presentation.rs ---
