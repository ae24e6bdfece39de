use glam::Vec2;

/// Viewport in CSS pixels plus the capped device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub device_pixel_ratio: f32,
}

impl Viewport {
    /// The drawable never renders above 2×.
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
            device_pixel_ratio: if device_pixel_ratio >= 2.0 { 2.0 } else { 1.0 },
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1400.0, 900.0, 1.0)
    }
}

/// Engine tunables, provided by the host at construction.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Fixed step the runner drives the engine with (default: 1/60).
    pub fixed_dt: f32,

    // -- Scroll physics --
    pub scroll_speed_multiplier: f32,
    pub friction: f32,
    /// Per-frame smoothing of the rendered offset toward the scroll position.
    pub position_lerp: f32,
    pub min_scroll_speed: f32,
    /// Smoothed movement above this re-evaluates months, videos and streaming.
    pub min_position_delta: f32,
    /// Smoothed movement below this (with no velocity) ends scrolling.
    pub rest_position_delta: f32,
    pub hold_auto_advance_speed: f32,
    pub hold_auto_advance_delay: f32,
    pub hold_auto_advance_ramp: f32,
    pub long_press_auto_advance_speed: f32,
    pub pan_speed_multiplier: f32,

    // -- Choreography --
    pub palette_duration: f32,
    pub whoosh_glide_duration: f32,
    pub open_duration: f32,
    pub contact_duration: f32,

    // -- Layout --
    pub section_gap: f32,
    pub section_gap_overrides: Vec<(String, f32)>,
    pub month_trigger_lead: f32,
    pub whoosh_size: Vec2,
    pub arrow_rest_depth: f32,

    // -- Camera / scene --
    pub camera_distance: f32,
    pub camera_near: f32,
    pub camera_far: f32,
    pub fog_near: f32,
    pub fog_far: f32,
    /// Camera y while the loader covers the page.
    pub loader_height: f32,
    pub viewport: Viewport,

    // -- Boot / loading --
    pub enable_loader: bool,
    /// Minimum splash duration before loading starts.
    pub splash_delay: f32,
    /// Load intro up front, stream other months as they come into range.
    pub stream_months: bool,
    pub view_distance: f32,

    // -- Platform --
    pub is_mobile: bool,
    pub touch_enabled: bool,
    /// Play/pause videos by frustum visibility (desktop only).
    pub cull_videos: bool,

    // -- Shared buffer capacities --
    pub max_billboards: usize,
    pub max_titles: usize,
    pub max_events: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            scroll_speed_multiplier: 40.0,
            friction: 0.85,
            position_lerp: 0.1,
            min_scroll_speed: 0.1,
            min_position_delta: 0.05,
            rest_position_delta: 0.01,
            hold_auto_advance_speed: 8.0,
            hold_auto_advance_delay: 0.7,
            hold_auto_advance_ramp: 0.5,
            long_press_auto_advance_speed: 10.0,
            pan_speed_multiplier: 6.0,
            palette_duration: 1.0,
            whoosh_glide_duration: 4.0,
            open_duration: 1.5,
            contact_duration: 2.0,
            section_gap: 800.0,
            section_gap_overrides: vec![("intro".into(), 1700.0), ("dec".into(), 1800.0)],
            month_trigger_lead: 1100.0,
            whoosh_size: Vec2::new(300.0, 300.0),
            arrow_rest_depth: -60.0,
            camera_distance: 800.0,
            camera_near: 1.0,
            camera_far: 2000.0,
            fog_near: 1400.0,
            fog_far: 2000.0,
            loader_height: 2000.0,
            viewport: Viewport::default(),
            enable_loader: true,
            splash_delay: 2.0,
            stream_months: false,
            view_distance: 1500.0,
            is_mobile: false,
            touch_enabled: false,
            cull_videos: false,
            max_billboards: 256,
            max_titles: 32,
            max_events: 64,
        }
    }
}

impl EngineConfig {
    /// Scene scale for narrow viewports.
    pub fn global_scale(&self) -> f32 {
        (self.viewport.width / 1400.0).min(1.0)
    }

    /// How far in front of the camera an opened item settles.
    pub fn open_camera_offset(&self) -> f32 {
        if self.global_scale() < 0.5 {
            450.0
        } else {
            300.0
        }
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_loader(mut self, enabled: bool) -> Self {
        self.enable_loader = enabled;
        self
    }

    pub fn with_streaming(mut self, enabled: bool) -> Self {
        self.stream_months = enabled;
        self
    }

    pub fn with_platform(mut self, is_mobile: bool, touch_enabled: bool) -> Self {
        self.is_mobile = is_mobile;
        self.touch_enabled = touch_enabled;
        self
    }
}
