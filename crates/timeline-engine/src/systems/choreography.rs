// systems/choreography.rs
//
// Every timed transition of the timeline: open/close item, open/close contact,
// the whoosh glide back to the start, the held-button auto-advance ramp,
// palette changes, pointer/gyro perspective, leaving the loader and the
// easter egg. Transitions are plain tweens on `EngineContext::tweens`; their
// side effects come back as `TweenAction`s applied after the tween pass.

use std::f32::consts::{PI, TAU};

use glam::Vec2;

use crate::api::engine::EngineContext;
use crate::api::types::{CursorKind, HostEvent, ItemId};
use crate::components::material::MaterialKind;
use crate::components::section::{WhooshCluster, END};
use crate::core::color::Rgb;
use crate::core::scene::SceneGraph;
use crate::extensions::easing::Easing;
use crate::extensions::sequence::ColorCycle;
use crate::extensions::tween::{Tween, TweenAction, TweenHost, TweenLoop, TweenProperty, TweenValue};
use crate::renderer::camera::PerspectiveCamera;
use crate::systems::interaction::{ClickAction, InteractionError, WhooshHover};
use crate::systems::months::{ArrowToggle, MonthTransition};
use crate::systems::scroll::ScrollPhysics;

/// Start point of the caption slide-in.
const CAPTION_START_DEPTH: f32 = -100.0;
/// Item fade/scatter duration while another item opens.
const SCATTER_DURATION: f32 = 1.3;
const OVERLAY_FADE_OUT: f32 = 0.4;
const OVERLAY_FADE_IN: f32 = 2.0;
const UNDERLINE_OPACITY: f32 = 0.4;
const CONTACT_UNDERLINE_OPACITY: f32 = 0.3;
const PERSPECTIVE_DURATION: f32 = 4.0;
const ORIENTATION_DURATION: f32 = 2.0;
const ARROW_NUDGE_DURATION: f32 = 1.0;
const ENTER_DURATION: f32 = 2.0;
/// Per-tick spin of the whoosh ring while hovered.
pub const CIRCLE_SPIN: f32 = 0.005;

/// Disco stops: orange, pink, cyan, green.
pub const DISCO_COLORS: [u32; 4] = [0xfc4b0f, 0xfc0fc0, 0x0fc0fc, 0x0ffc4b];

/// What the tweens of a frame may touch: the scene, the scroll state and the
/// camera. Borrowed from disjoint fields of the engine context.
pub struct TweenTargets<'a> {
    pub scene: &'a mut SceneGraph,
    pub scroll: &'a mut ScrollPhysics,
    pub camera: &'a mut PerspectiveCamera,
}

impl TweenHost for TweenTargets<'_> {
    fn read(&self, property: TweenProperty) -> Option<TweenValue> {
        match property {
            TweenProperty::CameraHeight => Some(self.camera.position.y.into()),
            TweenProperty::CameraRotation => Some(self.camera.rotation.into()),
            TweenProperty::ScrollPosition => Some(self.scroll.state.position.into()),
            TweenProperty::AutoAdvance => Some(self.scroll.state.auto_advance_speed.into()),
            TweenProperty::EnterTimer => Some(0.0.into()),
            other => self.scene.read_property(other),
        }
    }

    fn write(&mut self, property: TweenProperty, value: TweenValue) {
        match (property, value) {
            (TweenProperty::CameraHeight, TweenValue::Scalar(y)) => self.camera.position.y = y,
            (TweenProperty::CameraRotation, TweenValue::Pair(r)) => self.camera.rotation = r,
            (TweenProperty::ScrollPosition, TweenValue::Scalar(p)) => self.scroll.drive_position(p),
            (TweenProperty::AutoAdvance, TweenValue::Scalar(s)) => self.scroll.set_auto_advance(s),
            (TweenProperty::EnterTimer, _) => {}
            (other, value) => {
                if !self.scene.write_property(other, value) {
                    log::debug!("tween wrote {value:?} to unknown property {other:?}");
                }
            }
        }
    }
}

/// Pending pointer/gyro perspective input.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerspectiveInput {
    /// Pointer offset from the screen centre, each axis in [-0.5, 0.5].
    pub pointer: Vec2,
    pub pending: bool,
    pub gyro: bool,
    /// Latest (beta, gamma) reading.
    pub orientation: Vec2,
    /// Reference captured from the first reading (or a reset).
    pub reference: Option<Vec2>,
}

impl EngineContext {
    /// Tween the opened item to the centre and everything else out of the way.
    pub fn try_open_item(&mut self, id: ItemId) -> Result<(), InteractionError> {
        if self.scene.sections.is_empty() {
            return Err(InteractionError::NoSections);
        }
        let item = self.scene.item(id).ok_or(InteractionError::UnknownItem(id))?;
        let section_z = self.scene.section_of(id).ok_or(InteractionError::NoSections)?.z;

        let depth = item.depth;
        let is_video = item.is_video();
        let has_caption = item.caption.is_some();
        let link = item.link().map(str::to_string);
        let link_y = item.link_anchor_y();

        let return_z = self.scene.timeline.z;
        self.interaction.begin_open(id, return_z)?;
        self.scroll.set_allow_scrolling(false);
        log::debug!("opening item {}", id.0);

        if is_video {
            self.videos.set_playing(id, true);
            self.emit(HostEvent::VideoPlay { item: id, reload: self.config.is_mobile });
        }

        let open = self.config.open_duration;
        let offset = self.config.open_camera_offset();
        let ease = Easing::ExpoInOut;

        self.tweens.add(
            Tween::to(TweenProperty::ItemPosition(id), Vec2::ZERO.into(), open, ease)
                .on_complete(TweenAction::ItemSettled),
        );
        self.tweens.add(Tween::to(TweenProperty::ItemProgress(id), 1.0.into(), open, ease));
        self.tweens.add(Tween::to(
            TweenProperty::TimelineDepth,
            (-(section_z + depth) + offset).into(),
            open,
            ease,
        ));

        self.tweens.add(
            Tween::to(TweenProperty::MaterialOpacity(MaterialKind::Text), 0.0.into(), 1.0, ease)
                .on_complete(TweenAction::HideMaterial(MaterialKind::Text)),
        );
        self.tweens.add(
            Tween::to(TweenProperty::MaterialOpacity(MaterialKind::Caption), 1.0.into(), OVERLAY_FADE_IN, ease)
                .delayed(0.3)
                .on_start(TweenAction::ShowMaterial(MaterialKind::Caption)),
        );
        self.tweens.add(
            Tween::to(
                TweenProperty::MaterialOpacity(MaterialKind::LinkUnderline),
                UNDERLINE_OPACITY.into(),
                OVERLAY_FADE_IN,
                ease,
            )
            .delayed(0.3)
            .on_start(TweenAction::ShowMaterial(MaterialKind::LinkUnderline)),
        );

        if has_caption {
            self.tweens.add(
                Tween::from_to(
                    TweenProperty::CaptionDepth(id),
                    CAPTION_START_DEPTH.into(),
                    0.0.into(),
                    OVERLAY_FADE_IN,
                    ease,
                )
                .delayed(0.2)
                .on_start(TweenAction::ShowCaption(id)),
            );
        }

        if let Some(url) = link {
            self.scene.link_group.y = link_y;
            self.scene.link_group.url = Some(url);
            self.tweens.add(
                Tween::from_to(TweenProperty::LinkGroupDepth, 0.0.into(), offset.into(), OVERLAY_FADE_IN, ease)
                    .delayed(0.3)
                    .on_start(TweenAction::ShowLinkGroup),
            );
        }

        let others: Vec<(ItemId, Vec2)> = self
            .scene
            .items
            .iter()
            .filter(|other| other.id != id)
            .map(|other| (other.id, other.quadrant.spread()))
            .collect();
        for (other, spread) in others {
            self.tweens.add(Tween::to(TweenProperty::ItemOpacity(other), 0.0.into(), SCATTER_DURATION, ease));
            self.tweens.add(Tween::to(TweenProperty::ItemPosition(other), spread.into(), SCATTER_DURATION, ease));
        }
        Ok(())
    }

    /// Reverse the open animation. Scrolling comes back when the timeline
    /// reaches its pre-open depth.
    pub fn try_close_item(&mut self) -> Result<(), InteractionError> {
        let (id, return_z) = self.interaction.begin_close()?;
        log::debug!("closing item {}", id.0);

        if self.scene.item(id).is_some_and(|item| item.is_video()) {
            self.videos.set_playing(id, false);
            self.emit(HostEvent::VideoPause { item: id, unload: self.config.is_mobile });
        }

        let close = self.config.open_duration;
        let ease = Easing::ExpoInOut;

        let rests: Vec<(ItemId, Vec2)> = self.scene.items.iter().map(|item| (item.id, item.base_position)).collect();
        for (item, rest) in rests {
            self.tweens.add(Tween::to(TweenProperty::ItemPosition(item), rest.into(), close, ease));
            if item != id {
                self.tweens.add(Tween::to(TweenProperty::ItemOpacity(item), 1.0.into(), close, ease));
            }
        }
        self.tweens.add(Tween::to(TweenProperty::ItemProgress(id), 0.0.into(), close, ease));
        self.tweens.add(
            Tween::to(TweenProperty::TimelineDepth, return_z.into(), close, ease).on_complete(TweenAction::ItemClosed),
        );

        self.tweens.add(
            Tween::to(TweenProperty::MaterialOpacity(MaterialKind::Text), 1.0.into(), close, ease)
                .on_start(TweenAction::ShowMaterial(MaterialKind::Text)),
        );
        self.tweens.add(Tween::to(
            TweenProperty::MaterialOpacity(MaterialKind::Caption),
            0.0.into(),
            OVERLAY_FADE_OUT,
            ease,
        ));
        self.tweens.add(
            Tween::to(
                TweenProperty::MaterialOpacity(MaterialKind::LinkUnderline),
                0.0.into(),
                OVERLAY_FADE_OUT,
                ease,
            )
            .on_complete(TweenAction::ItemOverlaysHidden(id)),
        );
        Ok(())
    }

    /// Toggle the contact panel.
    pub fn try_toggle_contact(&mut self) -> Result<(), InteractionError> {
        if self.interaction.contact_open() {
            self.close_contact();
            return Ok(());
        }
        self.interaction.open_contact()?;
        log::debug!("opening contact");

        self.scene.contact.visible = true;
        self.scroll.set_allow_scrolling(false);
        let underline = &mut self.scene.materials.link_underline;
        underline.visible = true;
        underline.opacity = CONTACT_UNDERLINE_OPACITY;

        let target = self.scene.contact.y * self.scene.global_scale;
        self.tweens.add(
            Tween::to(TweenProperty::CameraHeight, target.into(), self.config.contact_duration, Easing::ExpoInOut)
                .on_complete(TweenAction::ContactShown),
        );
        Ok(())
    }

    /// Bring the timeline back and return the camera from the contact panel.
    pub fn close_contact(&mut self) {
        if !self.interaction.close_contact() {
            return;
        }
        log::debug!("closing contact");
        self.scene.timeline.visible = true;
        self.tweens.add(
            Tween::to(TweenProperty::CameraHeight, 0.0.into(), self.config.contact_duration, Easing::ExpoInOut)
                .on_complete(TweenAction::ContactClosed),
        );
    }

    /// Ease the scroll position back to the start. Months keep re-evaluating
    /// as the timeline passes them.
    pub fn whoosh_to_start(&mut self) {
        log::debug!("whoosh back to start");
        self.scroll.state.velocity = 0.0;
        self.scroll.state.scrolling = true;
        self.tweens.add(Tween::to(
            TweenProperty::ScrollPosition,
            0.0.into(),
            self.config.whoosh_glide_duration,
            Easing::ExpoInOut,
        ));
    }

    /// Held button with nothing under it: ramp up a constant advance after a
    /// short delay.
    pub fn prime_auto_advance(&mut self) {
        self.interaction.set_cursor(CursorKind::Move);
        self.tweens.add(
            Tween::to(
                TweenProperty::AutoAdvance,
                self.config.hold_auto_advance_speed.into(),
                self.config.hold_auto_advance_ramp,
                Easing::Linear,
            )
            .delayed(self.config.hold_auto_advance_delay),
        );
    }

    /// Stop any auto-advance, primed or running.
    pub fn cancel_auto_advance(&mut self) {
        self.tweens.kill_property(TweenProperty::AutoAdvance);
        self.scroll.set_auto_advance(0.0);
    }

    pub(crate) fn perform_click(&mut self, action: ClickAction) {
        match action {
            ClickAction::None => {}
            ClickAction::OpenItem(id) => {
                if let Err(err) = self.try_open_item(id) {
                    log::error!("cannot open item {}: {err}", id.0);
                }
            }
            ClickAction::CloseItem => {
                if let Err(err) = self.try_close_item() {
                    log::debug!("close ignored: {err}");
                }
            }
            ClickAction::CloseContact => self.close_contact(),
            ClickAction::FollowItemLink => {
                if let Some(url) = self.scene.link_group.url.clone() {
                    self.emit(HostEvent::OpenLink { url });
                }
            }
            ClickAction::FollowContactLink => {
                if let Some(url) = self.scene.contact.link.clone() {
                    self.emit(HostEvent::OpenLink { url });
                }
            }
            ClickAction::Whoosh => self.whoosh_to_start(),
            ClickAction::PrimeAutoAdvance => self.prime_auto_advance(),
        }
    }

    pub(crate) fn apply_whoosh_hover(&mut self, hover: WhooshHover) {
        let hovered = hover == WhooshHover::Entered;
        self.scene.whoosh.hovered = hovered;
        if let Some(tween) = self.scene.whoosh.arrow_tween {
            self.tweens.set_time_scale(tween, if hovered { 2.0 } else { 1.0 });
        }
    }

    /// Tween the scene into a new month's palette.
    pub fn apply_month_transition(&mut self, transition: MonthTransition) {
        let palette = transition.palette;
        let duration = self.config.palette_duration;
        let ease = Easing::QuintOut;

        self.tweens.add(Tween::to(TweenProperty::Backdrop, palette.background.into(), duration, ease));
        self.tweens.add(Tween::to(TweenProperty::MaterialColor(MaterialKind::Text), palette.text.into(), duration, ease));
        let ids: Vec<ItemId> = self.scene.items.iter().map(|item| item.id).collect();
        for id in ids {
            self.tweens.add(Tween::to(TweenProperty::ItemTint(id), palette.tint.into(), duration, ease));
        }
        if let Some(outline) = palette.outline {
            self.tweens.add(Tween::to(TweenProperty::MaterialColor(MaterialKind::Outline), outline.into(), duration, ease));
        }

        let materials = &mut self.scene.materials;
        materials.caption.color = palette.text;
        materials.link_underline.color = palette.text;
        materials.contact.color = palette.contact_or_white();

        self.emit(HostEvent::ThemeChanged {
            interface: palette.interface(),
            background: palette.background,
        });

        match transition.arrow {
            Some(ArrowToggle::Start) => self.start_arrow(),
            Some(ArrowToggle::Stop) => self.stop_arrow(),
            None => {}
        }

        if let Some(hover) = self.interaction.invalidate() {
            self.apply_whoosh_hover(hover);
        }
    }

    fn start_arrow(&mut self) {
        if self.scene.whoosh.arrow_tween.is_some() {
            return;
        }
        let id = self.tweens.add(
            Tween::to(TweenProperty::ArrowDepth, 0.0.into(), ARROW_NUDGE_DURATION, Easing::CubicInOut)
                .with_loop(TweenLoop::PingPong),
        );
        self.scene.whoosh.arrow_tween = Some(id);
    }

    fn stop_arrow(&mut self) {
        if let Some(id) = self.scene.whoosh.arrow_tween.take() {
            self.tweens.remove(id);
        }
        self.scene.whoosh.arrow_depth = self.scene.whoosh.arrow_rest_depth;
    }

    /// Ease the camera (and the end arrow) toward the last pointer offset.
    pub(crate) fn update_perspective(&mut self) {
        if self.config.touch_enabled || !self.perspective.pending {
            return;
        }
        self.perspective.pending = false;
        let p = self.perspective.pointer;
        self.tweens.add(Tween::to(
            TweenProperty::CameraRotation,
            Vec2::new(-p.y * 0.5, -p.x * 0.5).into(),
            PERSPECTIVE_DURATION,
            Easing::QuintOut,
        ));
        if self.months.is_active(END) {
            let rest = WhooshCluster::ARROW_REST_ROTATION;
            self.tweens.add(Tween::to(
                TweenProperty::ArrowRotation,
                Vec2::new(rest.x + p.y * 0.2, p.x * 0.8).into(),
                PERSPECTIVE_DURATION,
                Easing::QuintOut,
            ));
        }
    }

    /// Any non-zero rotation rate switches to gyro-driven perspective.
    pub(crate) fn device_motion(&mut self, rate: [f32; 3]) {
        if !self.perspective.gyro && rate.iter().any(|r| *r != 0.0) {
            log::info!("gyro perspective enabled");
            self.perspective.gyro = true;
        }
    }

    pub(crate) fn device_orientation(&mut self, beta: f32, gamma: f32) {
        if !self.perspective.gyro {
            return;
        }
        let reading = Vec2::new(beta, gamma);
        self.perspective.orientation = reading;
        let reference = *self.perspective.reference.get_or_insert(reading);
        let rotation = (reading - reference) * (PI / 300.0);
        self.tweens.add(Tween::to(
            TweenProperty::CameraRotation,
            rotation.into(),
            ORIENTATION_DURATION,
            Easing::QuintOut,
        ));
    }

    pub(crate) fn reset_orientation(&mut self) {
        self.perspective.reference = Some(self.perspective.orientation);
    }

    /// Lower the camera from the loader onto the timeline.
    pub fn move_to_start(&mut self) {
        if self.entered || self.tweens.is_animating(TweenProperty::EnterTimer) {
            return;
        }
        log::info!("entering timeline");
        self.emit(HostEvent::RevealInterface);
        // an open contact panel brings the camera back itself when closed
        if !self.interaction.contact_open() {
            self.tweens.add(Tween::to(TweenProperty::CameraHeight, 0.0.into(), ENTER_DURATION, Easing::ExpoInOut));
        }
        self.tweens.add(
            Tween::from_to(TweenProperty::EnterTimer, 0.0.into(), 1.0.into(), ENTER_DURATION, Easing::Linear)
                .on_complete(TweenAction::TimelineEntered),
        );
    }

    /// Disco mode. Only after the timeline was entered; runs until reload.
    pub fn easter_egg(&mut self) {
        if !self.entered || self.easter_egg {
            return;
        }
        log::info!("disco!");
        self.easter_egg = true;
        self.interaction.disable();
        self.scene.whoosh.hovered = false;

        self.tweens.add(Tween::to(TweenProperty::TimelineSpin, TAU.into(), 2.0, Easing::QuintInOut));

        let count = self.scene.items.len();
        let ids: Vec<ItemId> = self.scene.items.iter().map(|item| item.id).collect();
        for id in ids.iter().take(count.saturating_sub(1)) {
            self.tweens.add(
                Tween::from_to(TweenProperty::ItemSpin(*id), 0.0.into(), TAU.into(), 2.0, Easing::Linear)
                    .with_loop(TweenLoop::Loop),
            );
        }
        for index in 0..self.scene.sections.len() {
            self.tweens.add(
                Tween::from_to(TweenProperty::TitleDepth(index), 0.0.into(), 150.0.into(), 1.0, Easing::Linear)
                    .with_loop(TweenLoop::PingPong),
            );
        }

        let stops: Vec<Rgb> = DISCO_COLORS.iter().map(|hex| Rgb::from_hex(*hex)).collect();
        let mut foreground: Vec<TweenProperty> = ids.iter().map(|id| TweenProperty::ItemTint(*id)).collect();
        foreground.push(TweenProperty::MaterialColor(MaterialKind::Text));
        let reversed: Vec<Rgb> = stops.iter().rev().copied().collect();

        self.cycles = vec![
            ColorCycle::new(foreground, stops, 1.0, Easing::QuintOut).looping(),
            ColorCycle::new(vec![TweenProperty::Backdrop], reversed, 1.0, Easing::QuintOut).looping(),
        ];
    }

    /// Apply the side effects of finished (or started) tweens.
    pub(crate) fn apply_tween_action(&mut self, action: TweenAction) {
        match action {
            TweenAction::ItemSettled => self.interaction.finish_open(),
            TweenAction::ItemClosed => {
                self.interaction.finish_close();
                self.scroll.set_allow_scrolling(true);
                self.scene.link_group.url = None;
            }
            TweenAction::ItemOverlaysHidden(id) => {
                let materials = &mut self.scene.materials;
                materials.caption.visible = false;
                materials.link_underline.visible = false;
                if let Some(caption) = self.scene.item_mut(id).and_then(|item| item.caption.as_mut()) {
                    caption.visible = false;
                }
                self.scene.link_group.visible = false;
            }
            TweenAction::ShowCaption(id) => {
                if let Some(caption) = self.scene.item_mut(id).and_then(|item| item.caption.as_mut()) {
                    caption.visible = true;
                }
            }
            TweenAction::ShowLinkGroup => self.scene.link_group.visible = true,
            TweenAction::ShowMaterial(kind) => self.scene.materials.get_mut(kind).visible = true,
            TweenAction::HideMaterial(kind) => self.scene.materials.get_mut(kind).visible = false,
            TweenAction::ContactShown => self.scene.timeline.visible = false,
            TweenAction::ContactClosed => {
                self.scene.contact.visible = false;
                self.scroll.set_allow_scrolling(true);
                let underline = &mut self.scene.materials.link_underline;
                underline.visible = false;
                underline.opacity = 0.0;
            }
            TweenAction::TimelineEntered => {
                self.entered = true;
                self.emit(HostEvent::Entered);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::EngineConfig;
    use crate::core::scene::tests::{bundle, timeline_config};

    fn context() -> EngineContext {
        EngineContext::new(EngineConfig::default().with_loader(false), &timeline_config(), &bundle())
    }

    fn run(ctx: &mut EngineContext, seconds: f32) {
        let steps = (seconds * 60.0).ceil() as usize;
        for _ in 0..steps {
            ctx.step(1.0 / 60.0);
        }
    }

    #[test]
    fn open_item_centres_it_and_scatters_the_rest() {
        let mut ctx = context();
        ctx.try_open_item(ItemId(0)).unwrap();
        assert!(!ctx.scroll.state.allow_scrolling);
        run(&mut ctx, 2.5);

        let a = ctx.scene.item(ItemId(0)).unwrap();
        assert!(a.position.length() < 0.01);
        assert!((a.uniforms.progress - 1.0).abs() < 1e-3);
        assert!(a.caption.as_ref().unwrap().visible);
        let b = ctx.scene.item(ItemId(1)).unwrap();
        assert!((b.position - Vec2::new(700.0, 700.0)).length() < 0.01);
        assert!(b.uniforms.opacity < 1e-3);

        // jan at -1700, item depth -200, camera offset 300
        assert!((ctx.scene.timeline.z - 2200.0).abs() < 0.01);
        assert!(!ctx.scene.materials.text.visible);
        assert!(ctx.scene.materials.caption.visible);
        assert!(ctx.scene.link_group.visible);
        assert_eq!(ctx.scene.link_group.url.as_deref(), Some("https://example.com/snow"));
        assert!(!ctx.interaction.is_animating());
    }

    #[test]
    fn close_restores_quadrants_then_scrolling() {
        let mut ctx = context();
        ctx.try_open_item(ItemId(0)).unwrap();
        run(&mut ctx, 2.5);
        ctx.try_close_item().unwrap();

        run(&mut ctx, 1.0);
        assert!(!ctx.scroll.state.allow_scrolling);
        assert!(ctx.interaction.item_open().is_some());

        run(&mut ctx, 1.0);
        assert!(ctx.scroll.state.allow_scrolling);
        assert_eq!(ctx.interaction.item_open(), None);
        for item in &ctx.scene.items {
            assert!((item.position - item.base_position).length() < 0.01);
            assert!((item.uniforms.opacity - 1.0).abs() < 1e-3);
        }
        assert!(ctx.scene.timeline.z.abs() < 0.01);
        assert!(!ctx.scene.link_group.visible);
        assert!(!ctx.scene.materials.caption.visible);
    }

    #[test]
    fn opening_a_video_plays_it() {
        let mut ctx = context();
        ctx.try_open_item(ItemId(2)).unwrap();
        assert!(ctx.drain_events().contains(&HostEvent::VideoPlay { item: ItemId(2), reload: false }));
        run(&mut ctx, 2.0);
        ctx.try_close_item().unwrap();
        assert!(ctx.drain_events().contains(&HostEvent::VideoPause { item: ItemId(2), unload: false }));
    }

    #[test]
    fn invalid_targets_are_reported() {
        let mut ctx = context();
        assert_eq!(ctx.try_open_item(ItemId(42)), Err(InteractionError::UnknownItem(ItemId(42))));
        assert_eq!(ctx.try_close_item(), Err(InteractionError::NoItem));
        ctx.try_open_item(ItemId(0)).unwrap();
        assert_eq!(ctx.try_open_item(ItemId(1)), Err(InteractionError::Busy));
    }

    #[test]
    fn contact_hides_timeline_only_after_camera_arrives() {
        let mut ctx = context();
        ctx.try_toggle_contact().unwrap();
        assert!(ctx.scene.contact.visible);
        run(&mut ctx, 1.0);
        assert!(ctx.scene.timeline.visible);
        run(&mut ctx, 1.1);
        assert!(!ctx.scene.timeline.visible);
        assert!((ctx.camera.position.y + 1800.0).abs() < 0.01);

        ctx.try_toggle_contact().unwrap();
        assert!(ctx.scene.timeline.visible);
        assert!(!ctx.scroll.state.allow_scrolling);
        run(&mut ctx, 2.1);
        assert!(ctx.scroll.state.allow_scrolling);
        assert!(!ctx.scene.contact.visible);
        assert!(ctx.camera.position.y.abs() < 0.01);
    }

    #[test]
    fn whoosh_glides_back_to_start() {
        let mut ctx = context();
        ctx.scroll.drive_position(ctx.scroll.stop_position());
        run(&mut ctx, 3.0);
        assert_eq!(ctx.months.active(), Some(END));

        ctx.whoosh_to_start();
        run(&mut ctx, 6.0);
        assert!(ctx.scroll.state.position.abs() < 1e-3);
        assert_eq!(ctx.months.active(), Some("intro"));
        assert!(ctx.scene.whoosh.arrow_tween.is_none());
    }

    #[test]
    fn held_button_ramps_after_delay_and_release_cancels() {
        let mut ctx = context();
        ctx.prime_auto_advance();
        run(&mut ctx, 0.5);
        assert_eq!(ctx.scroll.state.auto_advance_speed, 0.0);
        run(&mut ctx, 1.0);
        assert_eq!(ctx.scroll.state.auto_advance_speed, 8.0);
        ctx.cancel_auto_advance();
        assert_eq!(ctx.scroll.state.auto_advance_speed, 0.0);
        assert!(!ctx.tweens.is_animating(TweenProperty::AutoAdvance));
    }

    #[test]
    fn month_change_tweens_palette_and_reports_theme() {
        let mut ctx = context();
        let t = ctx.months.force("feb", &timeline_config().months).unwrap();
        ctx.apply_month_transition(t);
        assert_eq!(ctx.scene.materials.contact.color, Rgb::from_hex(0xfd6f53));
        assert!(ctx.drain_events().contains(&HostEvent::ThemeChanged {
            interface: Rgb::from_hex(0xfd6f53),
            background: Rgb::from_hex(0x012534),
        }));
        run(&mut ctx, 1.1);
        assert_eq!(ctx.scene.backdrop.to_hex(), 0x012534);
        assert!(ctx.scene.items.iter().all(|i| i.uniforms.tint.to_hex() == 0x012534));
    }

    #[test]
    fn easter_egg_requires_entry_and_loops_colors() {
        let mut ctx = EngineContext::new(EngineConfig::default(), &timeline_config(), &bundle());
        ctx.easter_egg();
        assert!(!ctx.easter_egg);

        ctx.entered = true;
        ctx.easter_egg();
        assert_eq!(ctx.cycles.len(), 2);
        run(&mut ctx, 2.1);
        assert!((ctx.scene.timeline.spin - TAU).abs() < 1e-3);
        // last item does not spin
        assert_eq!(ctx.scene.item(ItemId(2)).unwrap().spin, 0.0);
        run(&mut ctx, 5.0);
        assert!(ctx.cycles.iter().all(|c| !c.is_finished()));
    }

    #[test]
    fn pointer_perspective_eases_camera() {
        let mut ctx = context();
        ctx.perspective.pointer = Vec2::new(0.5, -0.5);
        ctx.perspective.pending = true;
        run(&mut ctx, 4.1);
        assert!((ctx.camera.rotation - Vec2::new(0.25, -0.25)).length() < 1e-3);
        assert!(!ctx.perspective.pending);
    }

    #[test]
    fn gyro_uses_first_reading_as_reference() {
        let mut ctx = context();
        ctx.device_orientation(10.0, 10.0);
        assert!(ctx.perspective.reference.is_none());
        ctx.device_motion([0.0, 0.3, 0.0]);
        ctx.device_orientation(10.0, 20.0);
        ctx.device_orientation(40.0, 20.0);
        run(&mut ctx, 2.1);
        assert!((ctx.camera.rotation.x - 30.0 * PI / 300.0).abs() < 1e-4);
        assert!(ctx.camera.rotation.y.abs() < 1e-4);
    }
}
