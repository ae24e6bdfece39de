use crate::api::config::EngineConfig;

/// Raw scroll state. `position` is the scroll target; the rendered timeline
/// offset chases it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollState {
    pub position: f32,
    pub velocity: f32,
    pub scrolling: bool,
    pub allow_scrolling: bool,
    /// Constant per-tick advance from a held button or long press.
    pub auto_advance_speed: f32,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            position: 0.0,
            velocity: 0.0,
            scrolling: false,
            allow_scrolling: true,
            auto_advance_speed: 0.0,
        }
    }
}

/// Result of one physics tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollStep {
    /// Amount to add to the rendered offset this tick.
    pub delta: f32,
    /// Movement was large enough to re-evaluate months and videos.
    pub moved: bool,
}

/// Damped scroll: input feeds velocity, friction bleeds it off, and the
/// rendered offset follows the position by exponential smoothing.
#[derive(Debug, Clone)]
pub struct ScrollPhysics {
    pub state: ScrollState,
    stop_position: f32,
    speed_multiplier: f32,
    friction: f32,
    position_lerp: f32,
    min_speed: f32,
    min_delta: f32,
    rest_delta: f32,
    pan_multiplier: f32,
}

impl ScrollPhysics {
    pub fn new(config: &EngineConfig, stop_position: f32) -> Self {
        Self {
            state: ScrollState::default(),
            stop_position: stop_position.max(0.0),
            speed_multiplier: config.scroll_speed_multiplier,
            friction: config.friction,
            position_lerp: config.position_lerp,
            min_speed: config.min_scroll_speed,
            min_delta: config.min_position_delta,
            rest_delta: config.rest_position_delta,
            pan_multiplier: config.pan_speed_multiplier,
        }
    }

    pub fn stop_position(&self) -> f32 {
        self.stop_position
    }

    /// Wheel input. Ignored while scrolling is disabled.
    pub fn apply_input(&mut self, delta: f32) -> bool {
        if !self.state.allow_scrolling {
            return false;
        }
        self.state.velocity += delta * self.speed_multiplier;
        self.state.scrolling = true;
        true
    }

    /// Touch pan moves the position directly.
    pub fn pan(&mut self, velocity_y: f32) -> bool {
        if !self.state.allow_scrolling {
            return false;
        }
        self.state.position += -velocity_y * self.pan_multiplier;
        self.state.scrolling = true;
        true
    }

    pub fn set_auto_advance(&mut self, speed: f32) {
        self.state.auto_advance_speed = speed.max(0.0);
    }

    pub fn set_allow_scrolling(&mut self, allow: bool) {
        self.state.allow_scrolling = allow;
    }

    /// Tween-driven position change (whoosh glide).
    pub fn drive_position(&mut self, position: f32) {
        self.state.position = position;
        self.state.scrolling = true;
    }

    /// Integrate one frame and return how far the rendered offset (`rendered`)
    /// should move toward the position.
    pub fn tick(&mut self, rendered: f32) -> ScrollStep {
        let s = &mut self.state;

        if s.auto_advance_speed > 0.0 {
            s.scrolling = true;
            s.position += s.auto_advance_speed;
        }

        if s.velocity.abs() > self.min_speed {
            s.scrolling = true;
            s.position += s.velocity;
            s.velocity *= self.friction;
        } else {
            s.velocity = 0.0;
        }

        self.clamp();

        let s = &mut self.state;
        if !(s.allow_scrolling && s.scrolling) {
            return ScrollStep::default();
        }

        let delta = (s.position - rendered) * self.position_lerp;
        let moved = delta.abs() > self.min_delta;
        if moved {
            s.scrolling = true;
        } else if delta.abs() < self.rest_delta && s.velocity.abs() < self.min_speed {
            s.scrolling = false;
        }
        ScrollStep { delta, moved }
    }

    /// Keep the position inside `[0, stop]`; hitting either end kills velocity.
    fn clamp(&mut self) {
        let s = &mut self.state;
        if s.position <= 0.0 {
            s.position = 0.0;
            s.velocity = 0.0;
        }
        if s.position >= self.stop_position {
            s.position = self.stop_position;
            s.velocity = 0.0;
        }
    }
}
