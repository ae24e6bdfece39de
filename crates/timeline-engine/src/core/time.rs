/// Fixed timestep accumulator.
/// The scroll physics is tuned per frame, so the runner steps the engine at
/// a fixed rate regardless of the display refresh.
pub struct FixedTimestep {
    dt: f32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Add frame time. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        let steps = (self.accumulator / self.dt) as u32;
        // at most 10 steps per frame after a stall
        if steps > 10 {
            self.accumulator = 0.0;
            return 10;
        }
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }
}

/// Result of one `FrameClock::frame` call.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameSample {
    /// Set once per sample window with the measured rate.
    pub fps: Option<u32>,
    /// This frame took longer than the slow-frame threshold.
    pub slow: bool,
}

/// Frame-rate bookkeeping: measures FPS once a second, logs it every
/// five seconds, and flags frames slower than ~30 fps.
#[derive(Debug, Clone)]
pub struct FrameClock {
    elapsed: f32,
    window_start: f32,
    frames_in_window: u32,
    fps: u32,
    sample_window: f32,
    log_interval: f32,
    slow_frame: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            elapsed: 0.0,
            window_start: 0.0,
            frames_in_window: 0,
            fps: 0,
            sample_window: 1.0,
            log_interval: 5.0,
            slow_frame: 0.033,
        }
    }

    pub fn frame(&mut self, dt: f32) -> FrameSample {
        let previous = self.elapsed;
        self.elapsed += dt.max(0.0);
        self.frames_in_window += 1;

        let slow = dt > self.slow_frame;
        if slow {
            log::warn!("slow frame: {:.2}ms", dt * 1000.0);
        }

        let mut fps = None;
        let window = self.elapsed - self.window_start;
        if window >= self.sample_window {
            self.fps = (self.frames_in_window as f32 / window).round() as u32;
            if (self.elapsed / self.log_interval).floor() != (previous / self.log_interval).floor() {
                log::debug!("fps: {}", self.fps);
            }
            self.frames_in_window = 0;
            self.window_start = self.elapsed;
            fps = Some(self.fps);
        }

        FrameSample { fps, slow }
    }

    /// Last measured rate.
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Seconds since the clock started.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_exact() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(1.0 / 60.0), 1);
    }

    #[test]
    fn accumulates_partial() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(0.008), 0);
        assert_eq!(ts.accumulate(0.010), 1);
    }

    #[test]
    fn caps_at_ten_steps() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(1.0), 10);
    }

    #[test]
    fn fps_sampled_once_per_second() {
        let mut clock = FrameClock::new();
        let mut samples = Vec::new();
        for _ in 0..130 {
            if let Some(fps) = clock.frame(1.0 / 60.0).fps {
                samples.push(fps);
            }
        }
        assert_eq!(samples.len(), 2);
        assert!((59..=61).contains(&samples[0]), "fps was {}", samples[0]);
    }

    #[test]
    fn slow_frames_flagged() {
        let mut clock = FrameClock::new();
        assert!(!clock.frame(0.016).slow);
        assert!(clock.frame(0.050).slow);
    }
}
