// extensions/tween.rs
//
// Tween system: animates named timeline properties over time.
// Decoupled from the scene graph: anything implementing `TweenHost` can be
// animated, and completion side effects come back out as plain `TweenAction`
// values instead of closures.
//
// Usage:
//   let mut tweens = TweenState::new();
//   tweens.add(Tween::to(TweenProperty::TimelineDepth, 1200.0.into(), 1.5, Easing::ExpoInOut)
//       .on_complete(TweenAction::ItemClosed));
//   tweens.tick(dt, &mut host);          // advances and writes values
//   for action in tweens.drain_actions() { ... }

use glam::Vec2;

use crate::api::types::ItemId;
use crate::components::material::MaterialKind;
use crate::core::color::Rgb;
use super::easing::{ease, ease_rgb, ease_vec2, Easing};

/// A property the choreography can animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TweenProperty {
    /// Item group x/y inside its section.
    ItemPosition(ItemId),
    /// Item shader opacity uniform.
    ItemOpacity(ItemId),
    /// Item shader progress uniform (0 = resting, 1 = opened).
    ItemProgress(ItemId),
    /// Item gradient tint uniform.
    ItemTint(ItemId),
    /// Item mesh z rotation.
    ItemSpin(ItemId),
    /// Caption z offset inside the item group.
    CaptionDepth(ItemId),
    /// Timeline group z (the rendered scroll offset).
    TimelineDepth,
    /// Timeline group z rotation.
    TimelineSpin,
    /// Camera y (loader / contact moves).
    CameraHeight,
    /// Camera x/y rotation.
    CameraRotation,
    MaterialOpacity(MaterialKind),
    MaterialColor(MaterialKind),
    /// Fog color and clear color together.
    Backdrop,
    /// Link group z.
    LinkGroupDepth,
    /// Whoosh arrow z.
    ArrowDepth,
    /// Whoosh arrow x/y rotation.
    ArrowRotation,
    /// Section title z, by section index.
    TitleDepth(usize),
    /// Raw scroll position (whoosh glide).
    ScrollPosition,
    /// Auto-advance velocity source.
    AutoAdvance,
    /// Pure timer for leaving the loader. Nothing else animates it, so its
    /// completion cannot be overwritten by camera moves.
    EnterTimer,
}

/// A value a property takes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenValue {
    Scalar(f32),
    Pair(Vec2),
    Color(Rgb),
}

impl TweenValue {
    fn interpolate(self, to: TweenValue, t: f32, easing: Easing) -> TweenValue {
        match (self, to) {
            (TweenValue::Scalar(a), TweenValue::Scalar(b)) => TweenValue::Scalar(ease(a, b, t, easing)),
            (TweenValue::Pair(a), TweenValue::Pair(b)) => TweenValue::Pair(ease_vec2(a, b, t, easing)),
            (TweenValue::Color(a), TweenValue::Color(b)) => TweenValue::Color(ease_rgb(a, b, t, easing)),
            (_, to) => to,
        }
    }

    pub fn as_scalar(self) -> Option<f32> {
        match self {
            TweenValue::Scalar(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_pair(self) -> Option<Vec2> {
        match self {
            TweenValue::Pair(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_color(self) -> Option<Rgb> {
        match self {
            TweenValue::Color(v) => Some(v),
            _ => None,
        }
    }
}

impl From<f32> for TweenValue {
    fn from(v: f32) -> Self {
        TweenValue::Scalar(v)
    }
}

impl From<Vec2> for TweenValue {
    fn from(v: Vec2) -> Self {
        TweenValue::Pair(v)
    }
}

impl From<Rgb> for TweenValue {
    fn from(v: Rgb) -> Self {
        TweenValue::Color(v)
    }
}

/// Side effect requested when a tween starts or completes.
/// The engine applies these after the tween pass of the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenAction {
    /// Opened item reached the centre.
    ItemSettled,
    /// Timeline returned to its pre-open depth.
    ItemClosed,
    /// Caption/link overlays of a closing item faded out.
    ItemOverlaysHidden(ItemId),
    ShowCaption(ItemId),
    ShowLinkGroup,
    ShowMaterial(MaterialKind),
    HideMaterial(MaterialKind),
    /// Camera reached the contact section.
    ContactShown,
    /// Camera returned from the contact section.
    ContactClosed,
    /// Camera left the loader.
    TimelineEntered,
}

/// What happens when a tween completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TweenLoop {
    #[default]
    Once,
    /// Restart from the captured start value.
    Loop,
    /// Reverse direction (yoyo).
    PingPong,
}

/// A single tween.
#[derive(Debug, Clone)]
pub struct Tween {
    pub property: TweenProperty,
    /// Start value; `None` captures the live value when the tween starts.
    pub from: Option<TweenValue>,
    pub to: TweenValue,
    pub duration: f32,
    /// Seconds to wait before starting.
    pub delay: f32,
    pub elapsed: f32,
    pub easing: Easing,
    pub loop_mode: TweenLoop,
    /// Playback rate multiplier.
    pub time_scale: f32,
    started: bool,
    forward: bool,
    on_start: Option<TweenAction>,
    on_complete: Option<TweenAction>,
}

impl Tween {
    /// Tween from the live value to `to`.
    pub fn to(property: TweenProperty, to: TweenValue, duration: f32, easing: Easing) -> Self {
        Self {
            property,
            from: None,
            to,
            duration,
            delay: 0.0,
            elapsed: 0.0,
            easing,
            loop_mode: TweenLoop::Once,
            time_scale: 1.0,
            started: false,
            forward: true,
            on_start: None,
            on_complete: None,
        }
    }

    /// Tween between explicit endpoints.
    pub fn from_to(
        property: TweenProperty,
        from: TweenValue,
        to: TweenValue,
        duration: f32,
        easing: Easing,
    ) -> Self {
        Self {
            from: Some(from),
            ..Self::to(property, to, duration, easing)
        }
    }

    // -- Builder methods --

    pub fn delayed(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    pub fn with_loop(mut self, mode: TweenLoop) -> Self {
        self.loop_mode = mode;
        self
    }

    pub fn on_start(mut self, action: TweenAction) -> Self {
        self.on_start = Some(action);
        self
    }

    pub fn on_complete(mut self, action: TweenAction) -> Self {
        self.on_complete = Some(action);
        self
    }
}

/// Handle to a tween for later reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenId(pub u32);

/// Anything whose properties can be read and written by tweens.
pub trait TweenHost {
    /// Current value, or `None` if the property no longer exists.
    fn read(&self, property: TweenProperty) -> Option<TweenValue>;
    fn write(&mut self, property: TweenProperty, value: TweenValue);
}

/// Manages all active tweens.
///
/// Tweens run in insertion order. Adding a tween kills any tween already
/// animating the same property; a killed tween fires no actions.
#[derive(Debug, Default)]
pub struct TweenState {
    tweens: Vec<(TweenId, Tween)>,
    next_id: u32,
    actions: Vec<TweenAction>,
}

impl TweenState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tween, overwriting in-flight tweens on the same property.
    pub fn add(&mut self, tween: Tween) -> TweenId {
        self.kill_property(tween.property);
        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.tweens.push((id, tween));
        id
    }

    /// Remove a tween by handle.
    pub fn remove(&mut self, id: TweenId) -> bool {
        let before = self.tweens.len();
        self.tweens.retain(|(tid, _)| *tid != id);
        self.tweens.len() != before
    }

    /// Remove every tween animating `property`.
    pub fn kill_property(&mut self, property: TweenProperty) {
        self.tweens.retain(|(_, t)| t.property != property);
    }

    pub fn set_time_scale(&mut self, id: TweenId, scale: f32) {
        if let Some(tween) = self.get_mut(id) {
            tween.time_scale = scale.max(0.0);
        }
    }

    pub fn get(&self, id: TweenId) -> Option<&Tween> {
        self.tweens.iter().find(|(tid, _)| *tid == id).map(|(_, t)| t)
    }

    pub fn get_mut(&mut self, id: TweenId) -> Option<&mut Tween> {
        self.tweens.iter_mut().find(|(tid, _)| *tid == id).map(|(_, t)| t)
    }

    /// Whether a tween currently drives `property`.
    pub fn is_animating(&self, property: TweenProperty) -> bool {
        self.tweens.iter().any(|(_, t)| t.property == property)
    }

    /// Advance all tweens and write their values into `host`.
    /// Returns the number of tweens that completed this tick.
    pub fn tick(&mut self, dt: f32, host: &mut impl TweenHost) -> usize {
        let mut finished = Vec::new();

        for (id, tween) in self.tweens.iter_mut() {
            let mut step = dt * tween.time_scale;

            if tween.delay > 0.0 {
                tween.delay -= step;
                if tween.delay > 0.0 {
                    continue;
                }
                step = -tween.delay;
                tween.delay = 0.0;
            }

            if !tween.started {
                let from = match tween.from.or_else(|| host.read(tween.property)) {
                    Some(v) => v,
                    None => {
                        finished.push(*id);
                        continue;
                    }
                };
                tween.from = Some(from);
                tween.started = true;
                if let Some(action) = tween.on_start {
                    self.actions.push(action);
                }
            }

            tween.elapsed += step;
            let raw_t = if tween.duration > 0.0 {
                tween.elapsed / tween.duration
            } else {
                1.0
            };
            let t = if tween.forward {
                raw_t.clamp(0.0, 1.0)
            } else {
                (1.0 - raw_t).clamp(0.0, 1.0)
            };

            if let Some(from) = tween.from {
                host.write(tween.property, from.interpolate(tween.to, t, tween.easing));
            }

            if raw_t >= 1.0 {
                match tween.loop_mode {
                    TweenLoop::Once => {
                        if let Some(action) = tween.on_complete {
                            self.actions.push(action);
                        }
                        finished.push(*id);
                    }
                    TweenLoop::Loop => {
                        tween.elapsed = (tween.elapsed - tween.duration).max(0.0);
                    }
                    TweenLoop::PingPong => {
                        tween.elapsed = (tween.elapsed - tween.duration).max(0.0);
                        tween.forward = !tween.forward;
                    }
                }
            }
        }

        let count = finished.len();
        if count > 0 {
            self.tweens.retain(|(id, _)| !finished.contains(id));
        }
        count
    }

    /// Drain start/complete actions fired since the last drain.
    pub fn drain_actions(&mut self) -> Vec<TweenAction> {
        std::mem::take(&mut self.actions)
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    pub fn clear(&mut self) {
        self.tweens.clear();
        self.actions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Props(HashMap<TweenProperty, TweenValue>);

    impl TweenHost for Props {
        fn read(&self, property: TweenProperty) -> Option<TweenValue> {
            self.0.get(&property).copied()
        }

        fn write(&mut self, property: TweenProperty, value: TweenValue) {
            self.0.insert(property, value);
        }
    }

    fn scalar(props: &Props, property: TweenProperty) -> f32 {
        props.read(property).and_then(TweenValue::as_scalar).unwrap()
    }

    #[test]
    fn tween_captures_live_start_value() {
        let mut props = Props::default();
        props.write(TweenProperty::TimelineDepth, 100.0.into());
        let mut tweens = TweenState::new();
        tweens.add(Tween::to(TweenProperty::TimelineDepth, 200.0.into(), 1.0, Easing::Linear));

        tweens.tick(0.5, &mut props);
        assert!((scalar(&props, TweenProperty::TimelineDepth) - 150.0).abs() < 0.01);

        tweens.tick(0.5, &mut props);
        assert!((scalar(&props, TweenProperty::TimelineDepth) - 200.0).abs() < 0.01);
        assert!(tweens.is_empty());
    }

    #[test]
    fn delay_postpones_start_and_capture() {
        let mut props = Props::default();
        props.write(TweenProperty::LinkGroupDepth, 0.0.into());
        let mut tweens = TweenState::new();
        tweens.add(
            Tween::to(TweenProperty::LinkGroupDepth, 300.0.into(), 1.0, Easing::Linear)
                .delayed(0.3)
                .on_start(TweenAction::ShowLinkGroup),
        );

        tweens.tick(0.2, &mut props);
        assert_eq!(scalar(&props, TweenProperty::LinkGroupDepth), 0.0);
        assert!(tweens.drain_actions().is_empty());

        // 0.1 of delay left, 0.4 of animation
        tweens.tick(0.5, &mut props);
        assert!((scalar(&props, TweenProperty::LinkGroupDepth) - 120.0).abs() < 0.01);
        assert_eq!(tweens.drain_actions(), vec![TweenAction::ShowLinkGroup]);
    }

    #[test]
    fn completion_action_fires_once() {
        let mut props = Props::default();
        props.write(TweenProperty::CameraHeight, 2000.0.into());
        let mut tweens = TweenState::new();
        tweens.add(
            Tween::to(TweenProperty::CameraHeight, 0.0.into(), 2.0, Easing::ExpoInOut)
                .on_complete(TweenAction::TimelineEntered),
        );

        tweens.tick(1.0, &mut props);
        assert!(tweens.drain_actions().is_empty());
        tweens.tick(1.0, &mut props);
        assert_eq!(tweens.drain_actions(), vec![TweenAction::TimelineEntered]);
        tweens.tick(1.0, &mut props);
        assert!(tweens.drain_actions().is_empty());
    }

    #[test]
    fn adding_overwrites_same_property_without_firing() {
        let mut props = Props::default();
        props.write(TweenProperty::TimelineDepth, 0.0.into());
        let mut tweens = TweenState::new();
        tweens.add(
            Tween::to(TweenProperty::TimelineDepth, 500.0.into(), 1.0, Easing::Linear)
                .on_complete(TweenAction::ItemClosed),
        );
        tweens.tick(0.5, &mut props);
        tweens.add(Tween::to(TweenProperty::TimelineDepth, 0.0.into(), 1.0, Easing::Linear));
        assert_eq!(tweens.len(), 1);

        tweens.tick(1.0, &mut props);
        assert_eq!(scalar(&props, TweenProperty::TimelineDepth), 0.0);
        assert!(tweens.drain_actions().is_empty());
    }

    #[test]
    fn ping_pong_returns_to_start() {
        let mut props = Props::default();
        props.write(TweenProperty::ArrowDepth, (-60.0).into());
        let mut tweens = TweenState::new();
        tweens.add(
            Tween::to(TweenProperty::ArrowDepth, 0.0.into(), 1.0, Easing::Linear)
                .with_loop(TweenLoop::PingPong),
        );

        tweens.tick(1.0, &mut props);
        assert!(scalar(&props, TweenProperty::ArrowDepth).abs() < 0.01);
        tweens.tick(1.0, &mut props);
        assert!((scalar(&props, TweenProperty::ArrowDepth) + 60.0).abs() < 0.01);
        assert_eq!(tweens.len(), 1);
    }

    #[test]
    fn time_scale_speeds_up_playback() {
        let mut props = Props::default();
        props.write(TweenProperty::ArrowDepth, 0.0.into());
        let mut tweens = TweenState::new();
        let id = tweens.add(Tween::to(TweenProperty::ArrowDepth, 100.0.into(), 1.0, Easing::Linear));
        tweens.set_time_scale(id, 2.0);

        tweens.tick(0.25, &mut props);
        assert!((scalar(&props, TweenProperty::ArrowDepth) - 50.0).abs() < 0.01);
    }

    #[test]
    fn missing_property_drops_tween() {
        let mut props = Props::default();
        let mut tweens = TweenState::new();
        tweens.add(Tween::to(TweenProperty::ItemOpacity(ItemId(3)), 0.0.into(), 1.0, Easing::Linear));
        tweens.tick(0.1, &mut props);
        assert!(tweens.is_empty());
    }

    #[test]
    fn color_tween_interpolates() {
        let mut props = Props::default();
        props.write(TweenProperty::Backdrop, Rgb::BLACK.into());
        let mut tweens = TweenState::new();
        tweens.add(Tween::to(TweenProperty::Backdrop, Rgb::WHITE.into(), 1.0, Easing::Linear));
        tweens.tick(0.5, &mut props);
        let c = props.read(TweenProperty::Backdrop).and_then(TweenValue::as_color).unwrap();
        assert!((c.r - 0.5).abs() < 0.01);
    }
}
