// extensions/sequence.rs
//
// Multi-stage color sequences driven by the render loop.
// Each stage hands one tween per property to `TweenState`; the sequence only
// tracks which stage it is in, so a restart is a reset of `stage`, never a
// nested completion chain.

use crate::core::color::Rgb;
use super::easing::Easing;
use super::tween::{Tween, TweenProperty, TweenState};

#[derive(Debug, Clone)]
pub struct ColorCycle {
    properties: Vec<TweenProperty>,
    stops: Vec<Rgb>,
    stage_duration: f32,
    easing: Easing,
    looping: bool,
    stage: usize,
    stage_elapsed: f32,
    started: bool,
    finished: bool,
}

impl ColorCycle {
    pub fn new(properties: Vec<TweenProperty>, stops: Vec<Rgb>, stage_duration: f32, easing: Easing) -> Self {
        let finished = stops.is_empty() || properties.is_empty();
        Self {
            properties,
            stops,
            stage_duration,
            easing,
            looping: false,
            stage: 0,
            stage_elapsed: 0.0,
            started: false,
            finished,
        }
    }

    /// Start over from the first stop after the last one completes.
    pub fn looping(mut self) -> Self {
        self.looping = true;
        self
    }

    pub fn stage(&self) -> usize {
        self.stage
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance the sequence; call before `TweenState::tick` in the same frame.
    pub fn tick(&mut self, dt: f32, tweens: &mut TweenState) {
        if self.finished {
            return;
        }
        if !self.started {
            self.started = true;
            self.begin_stage(tweens);
            return;
        }

        self.stage_elapsed += dt;
        if self.stage_elapsed < self.stage_duration {
            return;
        }
        self.stage_elapsed -= self.stage_duration;
        self.stage += 1;
        if self.stage >= self.stops.len() {
            if !self.looping {
                self.finished = true;
                return;
            }
            self.stage = 0;
        }
        self.begin_stage(tweens);
    }

    fn begin_stage(&self, tweens: &mut TweenState) {
        let target = self.stops[self.stage];
        for &property in &self.properties {
            tweens.add(Tween::to(property, target.into(), self.stage_duration, self.easing));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stops() -> Vec<Rgb> {
        vec![Rgb::from_hex(0xfc4b0f), Rgb::from_hex(0xfc0fc0), Rgb::from_hex(0x0fc0fc)]
    }

    #[test]
    fn one_shot_cycle_walks_every_stop_then_stops() {
        let mut tweens = TweenState::new();
        let mut cycle = ColorCycle::new(vec![TweenProperty::Backdrop], stops(), 1.0, Easing::QuintOut);

        cycle.tick(0.0, &mut tweens);
        assert_eq!(cycle.stage(), 0);
        assert_eq!(tweens.len(), 1);

        cycle.tick(1.0, &mut tweens);
        assert_eq!(cycle.stage(), 1);
        cycle.tick(1.0, &mut tweens);
        assert_eq!(cycle.stage(), 2);
        cycle.tick(1.0, &mut tweens);
        assert!(cycle.is_finished());
    }

    #[test]
    fn looping_cycle_restarts_at_first_stop() {
        let mut tweens = TweenState::new();
        let mut cycle = ColorCycle::new(vec![TweenProperty::Backdrop], stops(), 1.0, Easing::QuintOut).looping();
        cycle.tick(0.0, &mut tweens);
        for _ in 0..3 {
            cycle.tick(1.0, &mut tweens);
        }
        assert!(!cycle.is_finished());
        assert_eq!(cycle.stage(), 0);
    }

    #[test]
    fn empty_cycle_is_finished() {
        let cycle = ColorCycle::new(vec![TweenProperty::Backdrop], Vec::new(), 1.0, Easing::Linear);
        assert!(cycle.is_finished());
    }
}
