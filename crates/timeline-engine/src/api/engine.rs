use glam::Vec2;

use crate::api::config::{EngineConfig, Viewport};
use crate::api::types::{HostEvent, ItemId};
use crate::assets::bundle::{AssetBundle, AssetCache};
use crate::assets::manifest::AssetManifest;
use crate::assets::pipeline::LoadProgress;
use crate::components::section::INTRO;
use crate::config::months::{MonthsConfig, TimelineConfig};
use crate::core::scene::SceneGraph;
use crate::core::time::{FixedTimestep, FrameClock};
use crate::extensions::sequence::ColorCycle;
use crate::extensions::tween::TweenState;
use crate::input::queue::{InputEvent, InputQueue};
use crate::renderer::camera::PerspectiveCamera;
use crate::renderer::frustum::Frustum;
use crate::renderer::instance::RenderBuffer;
use crate::systems::choreography::{PerspectiveInput, TweenTargets, CIRCLE_SPIN};
use crate::systems::interaction::InteractionController;
use crate::systems::months::MonthStateMachine;
use crate::systems::render::{build_render_buffer, FrameView};
use crate::systems::scroll::ScrollPhysics;
use crate::systems::streaming::StreamingTracker;
use crate::systems::video::VideoCuller;

/// Where the engine is in its boot sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BootPhase {
    /// Minimum splash time before assets are requested.
    Splash { elapsed: f32 },
    /// Waiting for the host to hand back the asset bundle.
    Loading,
    /// Scene built; the camera may still sit above the timeline.
    Ready,
    Entered,
}

impl BootPhase {
    /// Wire code for the shared buffer header.
    pub fn code(&self) -> f32 {
        match self {
            BootPhase::Splash { .. } => 0.0,
            BootPhase::Loading => 1.0,
            BootPhase::Ready => 2.0,
            BootPhase::Entered => 3.0,
        }
    }
}

/// All mutable timeline state. Built once the asset bundle is available;
/// owned by `TimelineEngine`, which is its only driver.
pub struct EngineContext {
    pub config: EngineConfig,
    pub scene: SceneGraph,
    pub camera: PerspectiveCamera,
    pub scroll: ScrollPhysics,
    pub months: MonthStateMachine,
    pub months_config: MonthsConfig,
    pub interaction: InteractionController,
    pub tweens: TweenState,
    /// Explicitly looping color sequences (easter egg).
    pub cycles: Vec<ColorCycle>,
    /// Present when months stream in lazily.
    pub streaming: Option<StreamingTracker>,
    pub videos: VideoCuller,
    /// Recomputed once per frame, after all camera updates.
    pub frustum: Frustum,
    pub perspective: PerspectiveInput,
    pub easter_egg: bool,
    /// The camera has left the loader.
    pub entered: bool,
    events: Vec<HostEvent>,
}

impl EngineContext {
    pub fn new(config: EngineConfig, timeline: &TimelineConfig, bundle: &AssetBundle) -> Self {
        let scene = SceneGraph::build(timeline, bundle, &config);
        let mut camera = PerspectiveCamera::new(
            &config.viewport,
            config.camera_distance,
            config.camera_near,
            config.camera_far,
        );
        if config.enable_loader {
            camera.position.y = config.loader_height;
        }
        let frustum = Frustum::from_view_projection(&camera.view_projection());
        let scroll = ScrollPhysics::new(&config, scene.stop_position);
        let months = MonthStateMachine::new(timeline.months.first().map(|m| m.key.as_str()));
        let streaming = config.stream_months.then(|| StreamingTracker::intro_only(config.view_distance));

        let mut ctx = Self {
            interaction: InteractionController::new(config.touch_enabled),
            entered: !config.enable_loader,
            config,
            scene,
            camera,
            scroll,
            months,
            months_config: timeline.months.clone(),
            tweens: TweenState::new(),
            cycles: Vec::new(),
            streaming,
            videos: VideoCuller::new(),
            frustum,
            perspective: PerspectiveInput::default(),
            easter_egg: false,
            events: Vec::new(),
        };

        if let Some(first) = timeline.months.first() {
            let palette = first.palette();
            ctx.emit(HostEvent::ThemeChanged {
                interface: palette.interface(),
                background: palette.background,
            });
        }
        ctx.stream_nearby();
        ctx
    }

    pub fn emit(&mut self, event: HostEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }

    /// One fixed step: perspective easing, scroll physics, month/stream
    /// evaluation on movement, decorative effects, then tweens.
    pub fn step(&mut self, dt: f32) {
        self.update_perspective();

        let step = self.scroll.tick(self.scene.timeline.z);
        self.scene.timeline.z += step.delta;
        if step.moved {
            self.timeline_moved();
        }

        if self.scene.whoosh.hovered {
            self.scene.whoosh.circle_rotation += CIRCLE_SPIN;
        }

        for cycle in &mut self.cycles {
            cycle.tick(dt, &mut self.tweens);
        }
        let mut targets = TweenTargets {
            scene: &mut self.scene,
            scroll: &mut self.scroll,
            camera: &mut self.camera,
        };
        self.tweens.tick(dt, &mut targets);
        for action in self.tweens.drain_actions() {
            self.apply_tween_action(action);
        }
    }

    fn timeline_moved(&mut self) {
        if !self.easter_egg {
            if let Some(transition) = self.months.evaluate(self.scene.timeline.z, &self.scene.sections, &self.months_config) {
                self.apply_month_transition(transition);
            }
        }
        self.stream_nearby();
        self.videos.mark_dirty();
    }

    fn stream_nearby(&mut self) {
        if let Some(tracker) = &mut self.streaming {
            for month in tracker.nearby(self.scene.timeline.z, &self.scene.sections) {
                self.events.push(HostEvent::StreamMonth { month });
            }
        }
    }

    /// Frustum, video culling and render output for the frame.
    pub fn end_frame(&mut self, buffer: &mut RenderBuffer) {
        self.frustum = Frustum::from_view_projection(&self.camera.view_projection());

        if self.config.cull_videos && !self.config.is_mobile {
            self.videos.cull(&self.scene, &self.frustum, &mut self.events);
        }

        let view = FrameView {
            camera: &self.camera,
            frustum: &self.frustum,
            fog: (self.config.fog_near, self.config.fog_far),
            open_item: self.interaction.item_open().map(|id| id.0),
            max_billboards: self.config.max_billboards,
            max_titles: self.config.max_titles,
        };
        build_render_buffer(&self.scene, view, buffer);

        if let Some(cursor) = self.interaction.take_cursor_change() {
            self.events.push(HostEvent::CursorChanged(cursor));
        }
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Wheel(wheel) => {
                self.scroll.apply_input(wheel.scroll_amount());
            }
            InputEvent::PointerDown { x, y } => {
                // touch devices never hover, so pick where the press lands
                self.pick(Vec2::new(x, y));
                let action = self.interaction.pointer_down();
                self.perform_click(action);
            }
            InputEvent::PointerUp { .. } => {
                self.interaction.pointer_up();
                self.cancel_auto_advance();
            }
            InputEvent::PointerMove { x, y, over_canvas } => {
                if !self.config.touch_enabled {
                    let size = self.config.viewport.size();
                    self.perspective.pointer = Vec2::new(x / size.x - 0.5, y / size.y - 0.5);
                    self.perspective.pending = true;
                }
                if over_canvas {
                    self.pick(Vec2::new(x, y));
                }
            }
            InputEvent::PanMove { velocity_y } => {
                self.scroll.pan(velocity_y);
            }
            InputEvent::PanEnd => self.cancel_auto_advance(),
            InputEvent::LongPress => {
                if self.scroll.state.allow_scrolling {
                    self.scroll.set_auto_advance(self.config.long_press_auto_advance_speed);
                }
            }
            InputEvent::Resize { width, height, device_pixel_ratio } => {
                self.resize(Viewport::new(width, height, device_pixel_ratio));
            }
            InputEvent::DeviceOrientation { beta, gamma } => self.device_orientation(beta, gamma),
            InputEvent::DeviceMotion { alpha, beta, gamma } => self.device_motion([alpha, beta, gamma]),
            InputEvent::SayHello => {
                if let Err(err) = self.try_toggle_contact() {
                    log::error!("cannot open contact: {err}");
                }
            }
            InputEvent::ResetOrientation => self.reset_orientation(),
            InputEvent::Enter => self.move_to_start(),
            InputEvent::EasterEgg => self.easter_egg(),
        }
    }

    fn pick(&mut self, screen: Vec2) {
        if self.easter_egg {
            return;
        }
        let ray = self.camera.ray_from_screen(screen);
        if let Some(hover) = self.interaction.pointer_move(&ray, &self.scene, self.months.active()) {
            self.apply_whoosh_hover(hover);
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.config.viewport = viewport;
        self.camera.resize(&viewport);
        self.scene.global_scale = self.config.global_scale();
    }

    /// Attach a streamed month's textures.
    pub fn month_assets_loaded(&mut self, month: &str, bundle: &AssetBundle) {
        let attached = self.scene.attach_month(month, bundle);
        log::info!("month '{month}' streamed: {attached} textures attached");
        self.videos.mark_dirty();
    }
}

/// The orchestrator: boot sequence, input queue, fixed-step loop and render
/// output. Everything the host sees leaves through `drain_events` and
/// `render_buffer`.
pub struct TimelineEngine {
    config: EngineConfig,
    timeline: TimelineConfig,
    phase: BootPhase,
    clock: FrameClock,
    input: InputQueue,
    timestep: FixedTimestep,
    ctx: Option<EngineContext>,
    render_buffer: RenderBuffer,
    events: Vec<HostEvent>,
}

impl TimelineEngine {
    /// A bundle already in `cache` skips splash and loading entirely.
    pub fn new(config: EngineConfig, timeline: TimelineConfig, cache: &AssetCache) -> Self {
        log::info!(
            "timeline engine: {} months, {} assets, loader {}",
            timeline.months.len(),
            timeline.manifest().total_count(),
            if config.enable_loader { "on" } else { "off" }
        );
        let mut engine = Self {
            timestep: FixedTimestep::new(config.fixed_dt),
            config,
            timeline,
            phase: BootPhase::Splash { elapsed: 0.0 },
            clock: FrameClock::new(),
            input: InputQueue::new(),
            ctx: None,
            render_buffer: RenderBuffer::new(),
            events: Vec::new(),
        };
        match cache.get() {
            Some(bundle) => {
                log::info!("asset cache hit: skipping loader");
                engine.build(&bundle);
            }
            None => log::info!("asset cache empty: splash for {}s", engine.config.splash_delay),
        }
        engine
    }

    /// What the host should load when it sees `LoadRequested`. With
    /// streaming only intro (and fonts) load up front.
    pub fn manifest(&self) -> AssetManifest {
        let full = self.timeline.manifest();
        if !self.config.stream_months {
            return full;
        }
        let mut initial = full.subset([INTRO]);
        initial.fonts = full.fonts.clone();
        initial
    }

    /// Files of one streamed month.
    pub fn month_manifest(&self, month: &str) -> AssetManifest {
        self.timeline.manifest().subset([month])
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    pub fn tick(&mut self, dt: f32) {
        let sample = self.clock.frame(dt);
        if let Some(fps) = sample.fps {
            self.events.push(HostEvent::PerformanceSample { fps });
        }

        match self.phase {
            BootPhase::Splash { elapsed } => {
                let elapsed = elapsed + dt;
                if !self.config.enable_loader || elapsed >= self.config.splash_delay {
                    log::info!("requesting {} assets", self.manifest().total_count());
                    self.phase = BootPhase::Loading;
                    self.events.push(HostEvent::LoadRequested);
                } else {
                    self.phase = BootPhase::Splash { elapsed };
                }
                self.apply_boot_input();
                return;
            }
            BootPhase::Loading => {
                self.apply_boot_input();
                return;
            }
            BootPhase::Ready | BootPhase::Entered => {}
        }

        let Some(ctx) = self.ctx.as_mut() else {
            return;
        };
        for event in self.input.drain() {
            ctx.handle_input(event);
        }
        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            ctx.step(self.timestep.dt());
        }
        ctx.end_frame(&mut self.render_buffer);

        if ctx.entered && self.phase == BootPhase::Ready {
            self.phase = BootPhase::Entered;
        }
        self.events.append(&mut ctx.drain_events());
    }

    /// Before the scene exists only viewport changes matter.
    fn apply_boot_input(&mut self) {
        for event in self.input.drain() {
            if let InputEvent::Resize { width, height, device_pixel_ratio } = event {
                self.config.viewport = Viewport::new(width, height, device_pixel_ratio);
            }
        }
    }

    pub fn load_progress(&mut self, progress: LoadProgress) {
        self.events.push(HostEvent::LoadProgress {
            completed: progress.completed,
            total: progress.total,
        });
    }

    /// The initial bundle arrived.
    pub fn assets_loaded(&mut self, bundle: &AssetBundle) {
        if self.ctx.is_some() {
            log::warn!("assets delivered twice; keeping the existing scene");
            return;
        }
        log::info!("assets loaded: {} textures", bundle.texture_count());
        self.build(bundle);
    }

    pub fn month_assets_loaded(&mut self, month: &str, bundle: &AssetBundle) {
        match self.ctx.as_mut() {
            Some(ctx) => ctx.month_assets_loaded(month, bundle),
            None => log::warn!("month '{month}' arrived before the scene was built"),
        }
    }

    fn build(&mut self, bundle: &AssetBundle) {
        let mut ctx = EngineContext::new(self.config.clone(), &self.timeline, bundle);
        self.phase = BootPhase::Ready;
        self.events.push(HostEvent::Ready);
        self.events.append(&mut ctx.drain_events());
        self.ctx = Some(ctx);
    }

    pub fn drain_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn render_buffer(&self) -> &RenderBuffer {
        &self.render_buffer
    }

    pub fn phase(&self) -> BootPhase {
        self.phase
    }

    pub fn viewport(&self) -> Viewport {
        self.ctx.as_ref().map_or(self.config.viewport, |ctx| ctx.config.viewport)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn context(&self) -> Option<&EngineContext> {
        self.ctx.as_ref()
    }

    pub fn context_mut(&mut self) -> Option<&mut EngineContext> {
        self.ctx.as_mut()
    }

    pub fn open_item(&mut self, id: ItemId) {
        let Some(ctx) = self.ctx.as_mut() else {
            log::error!("open_item({}) before the scene exists", id.0);
            return;
        };
        if let Err(err) = ctx.try_open_item(id) {
            log::error!("cannot open item {}: {err}", id.0);
        }
    }

    pub fn close_item(&mut self) {
        let Some(ctx) = self.ctx.as_mut() else {
            log::error!("close_item() before the scene exists");
            return;
        };
        if let Err(err) = ctx.try_close_item() {
            log::error!("cannot close item: {err}");
        }
    }

    pub fn toggle_contact(&mut self) {
        let Some(ctx) = self.ctx.as_mut() else {
            log::error!("toggle_contact() before the scene exists");
            return;
        };
        if let Err(err) = ctx.try_toggle_contact() {
            log::error!("cannot toggle contact: {err}");
        }
    }
}
