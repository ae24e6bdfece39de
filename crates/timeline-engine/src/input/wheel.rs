/// Raw wheel event fields, as the browser reports them.
/// Older engines report `wheelDelta`/`detail`, newer ones `deltaY`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelDelta {
    pub delta_y: f32,
    pub wheel_delta: f32,
    pub detail: f32,
}

impl WheelDelta {
    pub fn from_delta_y(delta_y: f32) -> Self {
        Self {
            delta_y,
            ..Self::default()
        }
    }

    /// Legacy-normalized delta: positive means "wheel up".
    pub fn normalize(&self) -> f32 {
        if self.detail != 0.0 && self.wheel_delta != 0.0 {
            let sign = if self.detail > 0.0 { 1.0 } else { -1.0 };
            self.wheel_delta / self.detail / 40.0 * sign
        } else if self.delta_y != 0.0 {
            -self.delta_y / 60.0
        } else {
            self.wheel_delta / 120.0
        }
    }

    /// Scroll input: positive moves forward along the timeline.
    pub fn scroll_amount(&self) -> f32 {
        -self.normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_y_scrolls_forward() {
        let wheel = WheelDelta::from_delta_y(120.0);
        assert_eq!(wheel.normalize(), -2.0);
        assert_eq!(wheel.scroll_amount(), 2.0);
    }

    #[test]
    fn legacy_wheel_delta() {
        let wheel = WheelDelta { wheel_delta: -240.0, ..Default::default() };
        assert_eq!(wheel.scroll_amount(), 2.0);
    }

    #[test]
    fn detail_and_wheel_delta_combined() {
        let wheel = WheelDelta { delta_y: 0.0, wheel_delta: 120.0, detail: 3.0 };
        assert_eq!(wheel.normalize(), 1.0);
    }

    #[test]
    fn empty_event_is_zero() {
        assert_eq!(WheelDelta::default().scroll_amount(), 0.0);
    }
}
