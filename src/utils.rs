use crate::config::Rgb;
use glam::Vec4;

// --- Helper Functions ---

/// Re-maps `value` from [in_min, in_max] to [out_min, out_max] without clamping.
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let span = in_max - in_min;
    if span.abs() < f32::EPSILON {
        return out_min;
    }
    out_min + (value - in_min) / span * (out_max - out_min)
}

pub fn map_range_clamped(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let mapped = map_range(value, in_min, in_max, out_min, out_max);
    let (lo, hi) = if out_min <= out_max {
        (out_min, out_max)
    } else {
        (out_max, out_min)
    };
    mapped.clamp(lo, hi)
}

// Blend towards `target` by `amount` in [0, 1].
pub fn lerp_color(base: Rgb, target: Rgb, amount: f32) -> Rgb {
    let t = amount.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    [mix(base[0], target[0]), mix(base[1], target[1]), mix(base[2], target[2])]
}

pub fn scale_color(color: Rgb, factor: f32) -> Rgb {
    let scale = |c: u8| (c as f32 * factor).round().clamp(0.0, 255.0) as u8;
    [scale(color[0]), scale(color[1]), scale(color[2])]
}

// 0-255 color plus 0-255 alpha -> normalized RGBA for the GPU.
pub fn rgba(color: Rgb, alpha: f32) -> Vec4 {
    Vec4::new(
        color[0] as f32 / 255.0,
        color[1] as f32 / 255.0,
        color[2] as f32 / 255.0,
        (alpha / 255.0).clamp(0.0, 1.0),
    )
}
