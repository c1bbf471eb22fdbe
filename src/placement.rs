// --- File: placement.rs ---
use crate::config::PlacementConfig;
use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

/// Central region kept free of flowers so the message stays readable.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct KeepClearEllipse {
    pub center: Vec2,
    pub radii: Vec2,
}

impl KeepClearEllipse {
    pub fn for_canvas(canvas: Vec2, config: &PlacementConfig) -> Self {
        Self {
            center: canvas * 0.5,
            radii: Vec2::new(
                canvas.x * config.keep_clear_radius_x,
                canvas.y * config.keep_clear_radius_y,
            ),
        }
    }

    // On the boundary counts as inside.
    pub fn contains(&self, point: Vec2) -> bool {
        let d = (point - self.center) / self.radii;
        d.length_squared() <= 1.0
    }

    /// Distance from the center to the boundary along `angle` (radians).
    pub fn edge_distance(&self, angle: f32) -> f32 {
        let (a, b) = (self.radii.x, self.radii.y);
        let (sin, cos) = angle.sin_cos();
        (a * b) / ((a * a) * sin * sin + (b * b) * cos * cos).sqrt()
    }
}

/// Axis-aligned area samples are drawn from.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SamplingBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl SamplingBounds {
    pub fn for_canvas(canvas: Vec2, margin: f32) -> Self {
        Self {
            min: canvas * margin,
            max: canvas * (1.0 - margin),
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        let x = uniform(rng, self.min.x, self.max.x);
        let y = uniform(rng, self.min.y, self.max.y);
        Vec2::new(x, y)
    }

    fn clamp(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min, self.max)
    }
}

fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if lo < hi { rng.gen_range(lo..hi) } else { lo }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Placement {
    pub position: Vec2,
    // Samples drawn, including the accepted one.
    pub attempts: u32,
    // True when every sample was rejected and the boundary fallback was used.
    pub fallback: bool,
}

/// Rejection-samples a point outside the ellipse. After `max_attempts`
/// rejections the point is pushed just past the ellipse edge along a random
/// angle and clamped into the bounds, so this always terminates.
pub fn place_outside<R: Rng + ?Sized>(
    rng: &mut R,
    ellipse: &KeepClearEllipse,
    bounds: &SamplingBounds,
    config: &PlacementConfig,
) -> Placement {
    let max_attempts = config.max_attempts.max(1);
    for attempt in 1..=max_attempts {
        let candidate = bounds.sample(rng);
        if !ellipse.contains(candidate) {
            return Placement {
                position: candidate,
                attempts: attempt,
                fallback: false,
            };
        }
    }

    let pushed = fallback_point(rng, ellipse, config);
    log::debug!(
        "All {} placement samples inside keep-clear ellipse, falling back to {:?}",
        max_attempts,
        pushed
    );
    Placement {
        position: bounds.clamp(pushed),
        attempts: max_attempts,
        fallback: true,
    }
}

// Unclamped point just outside the ellipse boundary.
fn fallback_point<R: Rng + ?Sized>(
    rng: &mut R,
    ellipse: &KeepClearEllipse,
    config: &PlacementConfig,
) -> Vec2 {
    let angle = rng.gen_range(0.0..TAU);
    let offset = config.fallback_offset.sample(rng);
    let distance = ellipse.edge_distance(angle) + offset;
    ellipse.center + Vec2::from_angle(angle) * distance
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn canvas_setup(canvas: Vec2) -> (KeepClearEllipse, SamplingBounds, PlacementConfig) {
        let config = PlacementConfig::default();
        (
            KeepClearEllipse::for_canvas(canvas, &config),
            SamplingBounds::for_canvas(canvas, config.sampling_margin),
            config,
        )
    }

    #[test]
    fn ellipse_geometry() {
        let (ellipse, bounds, _) = canvas_setup(Vec2::new(1000.0, 600.0));
        assert_eq!(ellipse.center, Vec2::new(500.0, 300.0));
        assert!((ellipse.radii - Vec2::new(430.0, 210.0)).length() < 1e-3);
        assert!(ellipse.contains(Vec2::new(500.0, 300.0)));
        assert!(ellipse.contains(Vec2::new(929.0, 300.0)));
        assert!(!ellipse.contains(Vec2::new(931.0, 300.0)));
        assert!(!ellipse.contains(Vec2::new(20.0, 20.0)));
        assert!((ellipse.edge_distance(0.0) - 430.0).abs() < 1e-3);
        assert!((ellipse.edge_distance(std::f32::consts::FRAC_PI_2) - 210.0).abs() < 1e-3);
        assert!((bounds.min - Vec2::new(10.0, 6.0)).length() < 1e-3);
        assert!((bounds.max - Vec2::new(990.0, 594.0)).length() < 1e-3);
    }

    #[test]
    fn accepted_samples_are_outside_the_ellipse() {
        let (ellipse, bounds, config) = canvas_setup(Vec2::new(800.0, 600.0));
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..2_000 {
            let placement = place_outside(&mut rng, &ellipse, &bounds, &config);
            assert!(bounds.contains(placement.position));
            if placement.fallback {
                assert_eq!(placement.attempts, config.max_attempts);
            } else {
                assert!(!ellipse.contains(placement.position));
                assert!(placement.attempts <= config.max_attempts);
            }
        }
    }

    #[test]
    fn covering_ellipse_falls_back_into_bounds() {
        let canvas = Vec2::new(800.0, 600.0);
        let (_, bounds, config) = canvas_setup(canvas);
        let ellipse = KeepClearEllipse {
            center: canvas * 0.5,
            radii: canvas * 2.0,
        };
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let placement = place_outside(&mut rng, &ellipse, &bounds, &config);
            assert!(placement.fallback);
            assert_eq!(placement.attempts, 150);
            let p = placement.position;
            assert!(bounds.contains(p));
            assert!(p.x >= canvas.x * 0.01 - 1e-3 && p.x <= canvas.x * 0.99 + 1e-3);
            assert!(p.y >= canvas.y * 0.01 - 1e-3 && p.y <= canvas.y * 0.99 + 1e-3);
        }
    }

    #[test]
    fn fallback_lands_past_the_edge() {
        let ellipse = KeepClearEllipse {
            center: Vec2::new(400.0, 300.0),
            radii: Vec2::new(344.0, 210.0),
        };
        let config = PlacementConfig::default();
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..500 {
            let p = fallback_point(&mut rng, &ellipse, &config);
            assert!(!ellipse.contains(p));
            let offset = p - ellipse.center;
            let angle = offset.y.atan2(offset.x);
            let past_edge = offset.length() - ellipse.edge_distance(angle);
            assert!((9.99..=40.01).contains(&past_edge), "pushed {past_edge}");
        }
    }

    #[test]
    fn same_seed_same_placements() {
        let (ellipse, bounds, config) = canvas_setup(Vec2::new(640.0, 480.0));
        let mut a = StdRng::seed_from_u64(3);
        let mut b = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            assert_eq!(
                place_outside(&mut a, &ellipse, &bounds, &config),
                place_outside(&mut b, &ellipse, &bounds, &config)
            );
        }
    }
}
// --- End of File: placement.rs ---
