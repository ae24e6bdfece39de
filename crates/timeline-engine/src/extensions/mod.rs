// extensions/mod.rs
//
// Animation extensions: easing curves, property tweens and multi-stage sequences.
// The engine owns one `TweenState`; everything here is driven from its frame tick.

pub mod easing;
pub mod sequence;
pub mod tween;

pub use easing::{Easing, lerp, ease, ease_vec2, ease_rgb};
pub use sequence::ColorCycle;
pub use tween::{TweenState, Tween, TweenId, TweenProperty, TweenValue, TweenAction, TweenHost, TweenLoop};
