// extensions/easing.rs
//
// Easing curves used by the timeline choreography.
// Names follow the curve family; the comments give the GSAP-style alias the
// motion design was authored with.

use glam::Vec2;

use crate::core::color::Rgb;

/// Easing function type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant velocity ("none").
    #[default]
    Linear,
    /// power1.out
    QuadOut,
    /// power2.inOut: the whoosh arrow nudge.
    CubicInOut,
    /// power4.out: palette changes, perspective easing.
    QuintOut,
    /// power4.inOut: easter-egg timeline spin.
    QuintInOut,
    /// expo.inOut: every open/close/camera move.
    ExpoInOut,
}

impl Easing {
    /// Apply the curve to a normalized time `t` (clamped to [0, 1]).
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::QuintOut => 1.0 - (1.0 - t).powi(5),
            Easing::QuintInOut => {
                if t < 0.5 {
                    16.0 * t.powi(5)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(5) / 2.0
                }
            }
            Easing::ExpoInOut => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else if t < 0.5 {
                    2.0_f32.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2.0_f32.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
        }
    }
}

// ── Interpolation helpers ────────────────────────────────────────────────

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn ease(a: f32, b: f32, t: f32, easing: Easing) -> f32 {
    lerp(a, b, easing.apply(t))
}

#[inline]
pub fn ease_vec2(a: Vec2, b: Vec2, t: f32, easing: Easing) -> Vec2 {
    a.lerp(b, easing.apply(t))
}

#[inline]
pub fn ease_rgb(a: Rgb, b: Rgb, t: f32, easing: Easing) -> Rgb {
    a.lerp(b, easing.apply(t))
}
