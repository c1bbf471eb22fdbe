// --- File: draw.rs ---
// Turns the scene into a flat list of GPU shape instances, back to front.
use crate::config::{FlowerConfig, Rgb};
use crate::constants::*;
use crate::font::{self, GLYPH_ROWS};
use crate::presentation::SceneMode;
use crate::simulation::{Flower, FlowerKind, Petal, SceneState};
use crate::utils::{lerp_color, map_range, map_range_clamped, rgba, scale_color};
use glam::{Vec2, Vec4};
use rayon::prelude::*;

// --- GPU Data Structure ---
// This struct MUST match the instance layout in shader.wgsl
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShapeInstance {
    pub center: [f32; 2], // canvas units
    pub half_size: [f32; 2],
    pub rotation: f32, // radians, clockwise on screen
    pub shape: u32,
    pub color: [f32; 4],
}

pub const SHAPE_ELLIPSE: u32 = 0;
pub const SHAPE_RECT: u32 = 1;

impl ShapeInstance {
    fn rect(center: Vec2, half_size: Vec2, color: Vec4) -> Self {
        Self {
            center: center.into(),
            half_size: half_size.into(),
            rotation: 0.0,
            shape: SHAPE_RECT,
            color: color.into(),
        }
    }
}

// Translate / rotate / uniform scale, accumulated like a drawing-state stack.
#[derive(Debug, Copy, Clone)]
struct Pose {
    origin: Vec2,
    angle: f32, // radians
    scale: f32,
}

impl Pose {
    fn new(origin: Vec2, degrees: f32, scale: f32) -> Self {
        Self {
            origin,
            angle: degrees.to_radians(),
            scale,
        }
    }

    fn rotated(self, degrees: f32) -> Self {
        Self {
            angle: self.angle + degrees.to_radians(),
            ..self
        }
    }

    // Ellipse with radii `radii` centered at `offset` in local space.
    fn ellipse(&self, offset: Vec2, radii: Vec2, color: Vec4) -> ShapeInstance {
        let center = self.origin + Vec2::from_angle(self.angle).rotate(offset * self.scale);
        ShapeInstance {
            center: center.into(),
            half_size: (radii * self.scale).into(),
            rotation: self.angle,
            shape: SHAPE_ELLIPSE,
            color: color.into(),
        }
    }
}

/// Builds every shape for the current frame. While paused only the overlay is produced.
pub fn build_frame(scene: &SceneState) -> Vec<ShapeInstance> {
    let canvas = scene.canvas();
    let mut shapes = Vec::with_capacity(scene.flowers().len() * 32 + scene.petals().len() + 1);

    shapes.push(ShapeInstance::rect(
        canvas * 0.5,
        canvas * 0.5,
        rgba(CANVAS_COLOR, 255.0),
    ));

    if scene.is_paused() {
        push_overlay(&mut shapes, scene);
        return shapes;
    }

    let frame = scene.frame();
    let scale_in_frames = scene.config.timing.scale_in_frames;
    let pointer = scene.pointer_in_canvas();
    let flower_config = &scene.config.flower;
    shapes.par_extend(scene.flowers().par_iter().flat_map_iter(|flower| {
        flower_shapes(flower, frame, scale_in_frames, pointer, flower_config)
    }));

    shapes.extend(scene.petals().iter().filter_map(|petal| petal_shape(petal, frame)));

    if scene.message_shown() {
        push_message(&mut shapes, scene);
    }
    shapes
}

pub fn flower_shapes(
    flower: &Flower,
    frame: u64,
    scale_in_frames: u64,
    pointer: Option<Vec2>,
    config: &FlowerConfig,
) -> Vec<ShapeInstance> {
    let birth = flower.birth_frame as f32;
    let appear = map_range_clamped(frame as f32, birth, birth + scale_in_frames as f32, 0.0, 1.0);
    if appear <= 0.0 {
        return Vec::new();
    }

    // Flowers near the pointer turn a little extra.
    let lean = pointer
        .map(|p| flower.position.distance(p))
        .filter(|distance| *distance < config.proximity_radius)
        .map(|distance| {
            map_range(distance, 0.0, config.proximity_radius, 0.0, config.proximity_max_rotation)
        })
        .unwrap_or(0.0);

    let spin = flower.rotation + frame as f32 * flower.rotation_speed;
    let pose = Pose::new(flower.position, spin, appear).rotated(lean);
    match flower.kind {
        FlowerKind::Daisy => daisy(pose, flower.size, flower.color),
        FlowerKind::Rose => rose(pose, flower.size, flower.color),
    }
}

fn daisy(pose: Pose, size: f32, color: Rgb) -> Vec<ShapeInstance> {
    let petal_color = rgba(color, DAISY_ALPHA as f32);
    let step = 360.0 / DAISY_PETAL_COUNT as f32;
    let mut shapes: Vec<ShapeInstance> = (0..DAISY_PETAL_COUNT)
        .map(|i| {
            pose.rotated(i as f32 * step).ellipse(
                Vec2::new(0.0, size * 0.3),
                Vec2::new(size * 0.25, size * 0.8),
                petal_color,
            )
        })
        .collect();
    shapes.push(pose.ellipse(
        Vec2::ZERO,
        Vec2::splat(size * 0.25),
        rgba(DAISY_CENTER_COLOR, 255.0),
    ));
    shapes
}

// Five twisted rings of six petals, each ring smaller and darker than the last.
fn rose(pose: Pose, size: f32, color: Rgb) -> Vec<ShapeInstance> {
    let mut shapes = Vec::with_capacity(ROSE_RING_COUNT * ROSE_PETALS_PER_RING + 1);
    let petal_step = 360.0 / ROSE_PETALS_PER_RING as f32;
    for ring in 0..ROSE_RING_COUNT {
        let ring_f = ring as f32;
        let ring_color = rgba(
            lerp_color(color, [0, 0, 0], ring_f * ROSE_RING_DARKEN_STEP),
            255.0,
        );
        let shrink = 1.0 - ring_f * ROSE_RING_SHRINK_STEP;
        let ring_pose = pose.rotated(ring_f * ROSE_RING_TWIST_DEGREES);
        for petal in 1..=ROSE_PETALS_PER_RING {
            shapes.push(ring_pose.rotated(petal as f32 * petal_step).ellipse(
                Vec2::new(0.0, size * 0.1 * shrink),
                Vec2::new(size * 0.12, size * 0.22 * shrink),
                ring_color,
            ));
        }
    }
    shapes.push(pose.ellipse(
        Vec2::ZERO,
        Vec2::splat(size * 0.05),
        rgba(scale_color(color, ROSE_CENTER_SHADE), 255.0),
    ));
    shapes
}

pub fn petal_shape(petal: &Petal, frame: u64) -> Option<ShapeInstance> {
    if petal.alpha <= 0.0 {
        return None;
    }
    let spin = petal.rotation + frame as f32 * petal.rotation_speed;
    let pose = Pose::new(petal.position, spin, petal.scale);
    let size = petal.size;
    let color = rgba(petal.color, petal.alpha);
    let shape = match petal.kind {
        FlowerKind::Daisy => pose.ellipse(
            Vec2::new(0.0, size * 0.3),
            Vec2::new(size * 0.25, size * 0.8),
            color,
        ),
        FlowerKind::Rose => pose.ellipse(
            Vec2::new(0.0, size * 0.1),
            Vec2::new(size * 0.12, size * 0.22),
            color,
        ),
    };
    Some(shape)
}

// --- Text ---

fn push_message(shapes: &mut Vec<ShapeInstance>, scene: &SceneState) {
    let timing = &scene.config.timing;
    let messages = &scene.config.message;
    let canvas = scene.canvas();
    let (w, h) = (canvas.x, canvas.y);
    let delay = timing.message_delay_frames as f32;
    let alpha = map_range_clamped(
        scene.frame() as f32,
        delay,
        delay + timing.message_fade_frames as f32,
        0.0,
        255.0,
    );
    let max_width = w * MAX_TEXT_WIDTH_FRACTION;

    let title_center = Vec2::new(w / 2.0, h / 2.0 - w * TITLE_TEXT_SIZE);
    let title_size = w * TITLE_TEXT_SIZE;
    push_text(
        shapes,
        &messages.title,
        title_center + Vec2::splat(TEXT_SHADOW_OFFSET),
        title_size,
        max_width,
        rgba([0, 0, 0], alpha * TEXT_SHADOW_ALPHA),
    );
    push_text(
        shapes,
        &messages.title,
        title_center,
        title_size,
        max_width,
        rgba(TITLE_COLOR, alpha),
    );
    push_text(
        shapes,
        &messages.body,
        Vec2::new(w / 2.0, h / 2.0 + w * 0.01),
        w * BODY_TEXT_SIZE,
        max_width,
        rgba(BODY_COLOR, alpha),
    );
    push_text(
        shapes,
        &messages.hint,
        Vec2::new(w / 2.0, h / 2.0 + w * 0.01 + w * 0.05),
        w * HINT_TEXT_SIZE,
        max_width,
        rgba(HINT_COLOR, alpha * HINT_ALPHA),
    );
}

fn push_overlay(shapes: &mut Vec<ShapeInstance>, scene: &SceneState) {
    let canvas = scene.canvas();
    let (w, h) = (canvas.x, canvas.y);
    let [r, g, b, a] = OVERLAY_COLOR;
    shapes.push(ShapeInstance::rect(canvas * 0.5, canvas * 0.5, rgba([r, g, b], a as f32)));

    let messages = &scene.config.message;
    let max_width = w * MAX_TEXT_WIDTH_FRACTION;
    let color = rgba(TITLE_COLOR, 255.0);
    match scene.mode() {
        SceneMode::WaitingForOrientation => {
            push_text(
                shapes,
                &messages.rotate,
                Vec2::new(w / 2.0, h / 2.0 - w * 0.08),
                w * OVERLAY_TEXT_SIZE,
                max_width,
                color,
            );
            push_text(
                shapes,
                &messages.rotate_hint,
                Vec2::new(w / 2.0, h / 2.0 + w * 0.02),
                w * OVERLAY_SUBTEXT_SIZE,
                max_width,
                color,
            );
        }
        SceneMode::WaitingForFirstTouch => push_text(
            shapes,
            &messages.tap_to_start,
            Vec2::new(w / 2.0, h / 2.0),
            w * OVERLAY_TEXT_SIZE,
            max_width,
            color,
        ),
        SceneMode::Running => {}
    }
}

/// Lays out `text` (lines split on '\n') centered on `center`. `size` is the
/// nominal text height; the block shrinks so no line exceeds `max_width`.
pub fn push_text(
    shapes: &mut Vec<ShapeInstance>,
    text: &str,
    center: Vec2,
    size: f32,
    max_width: f32,
    color: Vec4,
) {
    if color.w <= 0.0 || size <= 0.0 {
        return;
    }
    let lines: Vec<&str> = text.lines().collect();
    let widest = lines.iter().map(|line| font::line_width(line)).max().unwrap_or(0);
    if widest == 0 {
        return;
    }

    // One font pixel; ten of them make up the nominal size.
    let pixel = (size / 10.0).min(max_width / widest as f32);
    let line_height = pixel * 12.5;
    let block_top = center.y - line_height * lines.len() as f32 / 2.0;
    let glyph_inset = (line_height - GLYPH_ROWS as f32 * pixel) / 2.0;
    let half_pixel = Vec2::splat(pixel * 0.5);

    for (index, line) in lines.iter().enumerate() {
        let top = block_top + index as f32 * line_height + glyph_inset;
        let mut left = center.x - font::line_width(line) as f32 * pixel / 2.0;
        for ch in line.chars() {
            if let Some(glyph) = font::glyph(ch) {
                for (column, row) in font::lit_pixels(glyph) {
                    let pixel_center = Vec2::new(
                        left + (column as f32 + 0.5) * pixel,
                        top + (row as f32 + 0.5) * pixel,
                    );
                    shapes.push(ShapeInstance::rect(pixel_center, half_pixel, color));
                }
            }
            left += font::GLYPH_ADVANCE as f32 * pixel;
        }
    }
}

// --- End of File: draw.rs ---
