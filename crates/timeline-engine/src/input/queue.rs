use super::wheel::WheelDelta;

/// Input events the timeline understands.
/// Pointer coordinates are CSS pixels relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Wheel(WheelDelta),
    /// Primary button / tap began.
    PointerDown { x: f32, y: f32 },
    /// Primary button / tap ended.
    PointerUp { x: f32, y: f32 },
    /// `over_canvas` is false while the pointer is over page chrome.
    PointerMove { x: f32, y: f32, over_canvas: bool },
    /// Touch pan; `velocity_y` as reported by the gesture recognizer.
    PanMove { velocity_y: f32 },
    PanEnd,
    LongPress,
    Resize { width: f32, height: f32, device_pixel_ratio: f32 },
    /// Device orientation angles in degrees.
    DeviceOrientation { beta: f32, gamma: f32 },
    /// Device rotation rate; any non-zero reading enables gyro mode.
    DeviceMotion { alpha: f32, beta: f32, gamma: f32 },
    /// "Say hello" toggle.
    SayHello,
    /// Re-capture the gyro reference orientation.
    ResetOrientation,
    /// Leave the loader.
    Enter,
    EasterEgg,
}

/// A queue of input events.
/// JS writes events into the queue; the engine drains it once per tick.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events in arrival order.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain_in_order() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDown { x: 10.0, y: 20.0 });
        q.push(InputEvent::Wheel(WheelDelta::from_delta_y(100.0)));
        q.push(InputEvent::SayHello);
        assert_eq!(q.len(), 3);
        let events = q.drain();
        assert_eq!(events[0], InputEvent::PointerDown { x: 10.0, y: 20.0 });
        assert_eq!(events[2], InputEvent::SayHello);
        assert!(q.is_empty());
    }
}
