use timeline_engine::{
    write_frame, AssetBundle, AssetCache, AssetManifest, CursorKind, EngineConfig, FrameHeader, HostEvent, InputEvent,
    ItemId, LoadProgress, PackedEvent, ProtocolLayout, TimelineConfig, TimelineEngine,
};

/// Asset work the host has to start after a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadJob {
    /// The boot bundle. Goes into the process-wide cache once resolved.
    Initial(AssetManifest),
    /// One lazily streamed month.
    Month { month: String, manifest: AssetManifest },
}

/// Drives the engine once per animation frame and packs its output into the
/// shared float buffer.
///
/// `lib.rs` keeps one of these in a `thread_local!` and exports free
/// functions via `#[wasm_bindgen]`.
pub struct TimelineRunner {
    engine: TimelineEngine,
    layout: ProtocolLayout,
    buffer: Vec<f32>,
    frame: u32,
    cursor: CursorKind,
    progress: LoadProgress,
    packed: Vec<PackedEvent>,
    /// String payloads of this frame's events, indexed by their slot.
    texts: Vec<String>,
}

impl TimelineRunner {
    pub fn new(config: EngineConfig, timeline: TimelineConfig, cache: &AssetCache) -> Self {
        let layout = ProtocolLayout::from_config(&config);
        let cursor = if config.touch_enabled { CursorKind::Default } else { CursorKind::Pointer };
        log::info!(
            "shared buffer: {} floats ({} bytes)",
            layout.buffer_total_floats,
            layout.buffer_total_bytes
        );
        Self {
            engine: TimelineEngine::new(config, timeline, cache),
            buffer: vec![0.0; layout.buffer_total_floats],
            packed: Vec::with_capacity(layout.max_events),
            layout,
            frame: 0,
            cursor,
            progress: LoadProgress { completed: 0, total: 0 },
            texts: Vec::new(),
        }
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.engine.push_input(event);
    }

    /// Run one frame and write the shared buffer. Returns the loads the
    /// host should start.
    pub fn tick(&mut self, dt: f32) -> Vec<LoadJob> {
        self.engine.tick(dt);
        self.frame = self.frame.wrapping_add(1);

        self.packed.clear();
        self.texts.clear();
        let mut jobs = Vec::new();
        for event in self.engine.drain_events() {
            match &event {
                HostEvent::LoadRequested => jobs.push(LoadJob::Initial(self.engine.manifest())),
                HostEvent::StreamMonth { month } => jobs.push(LoadJob::Month {
                    month: month.clone(),
                    manifest: self.engine.month_manifest(month),
                }),
                HostEvent::CursorChanged(kind) => self.cursor = *kind,
                HostEvent::LoadProgress { completed, total } => {
                    self.progress = LoadProgress { completed: *completed, total: *total };
                }
                _ => {}
            }
            let slot = match event.text() {
                Some(text) => {
                    self.texts.push(text.to_string());
                    (self.texts.len() - 1) as u32
                }
                None => 0,
            };
            self.packed.push(event.pack(slot));
        }

        let header = FrameHeader {
            frame: self.frame,
            viewport: self.engine.viewport(),
            boot_phase: self.engine.phase().code(),
            cursor: self.cursor.code(),
            load_completed: self.progress.completed,
            load_total: self.progress.total,
        };
        write_frame(&self.layout, &header, self.engine.render_buffer(), &self.packed, &mut self.buffer);
        jobs
    }

    pub fn load_progress(&mut self, progress: LoadProgress) {
        self.engine.load_progress(progress);
    }

    pub fn assets_loaded(&mut self, bundle: &AssetBundle) {
        self.engine.assets_loaded(bundle);
    }

    pub fn month_loaded(&mut self, month: &str, bundle: &AssetBundle) {
        self.engine.month_assets_loaded(month, bundle);
    }

    pub fn open_item(&mut self, id: u32) {
        self.engine.open_item(ItemId(id));
    }

    pub fn close_item(&mut self) {
        self.engine.close_item();
    }

    pub fn is_mobile(&self) -> bool {
        self.engine.config().is_mobile
    }

    // ---- Pointer accessors for shared-buffer reads ----

    pub fn buffer_ptr(&self) -> *const f32 {
        self.buffer.as_ptr()
    }

    pub fn buffer(&self) -> &[f32] {
        &self.buffer
    }

    /// String payload (URL or month key) of an event packed this frame.
    pub fn event_text(&self, slot: u32) -> Option<String> {
        self.texts.get(slot as usize).cloned()
    }

    // ---- Capacity accessors (read by JavaScript via wasm_bindgen exports) ----

    pub fn max_billboards(&self) -> u32 {
        self.layout.max_billboards as u32
    }

    pub fn max_titles(&self) -> u32 {
        self.layout.max_titles as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timeline_engine::bridge::protocol::{
        HEADER_BOOT_PHASE, HEADER_CURSOR, HEADER_EVENT_COUNT, HEADER_FRAME_COUNTER, HEADER_LOAD_COMPLETED,
        HEADER_LOAD_TOTAL,
    };
    use timeline_engine::{BootPhase, MediaKind, TextureHandle, Vec2};

    const CONFIG_JSON: &str = r##"{
        "months": [
            { "key": "intro", "textColor": "#1b42d8", "bgColor": "#aec7c3", "tintColor": "#1b42d8" },
            { "key": "jan", "name": "JANUARY", "textColor": "#f7cf7e", "bgColor": "#428884", "tintColor": "#428884" },
            { "key": "end", "textColor": "#ed859c", "bgColor": "#416863", "tintColor": "#b9b4e8" }
        ],
        "assets": { "jan": ["a.png"] },
        "items": { "jan": { "a.png": { "caption": "Snow", "link": "https://example.com" } } },
        "contact": { "height": -1800, "link": "mailto:hello@example.com" }
    }"##;

    fn runner(config: EngineConfig) -> TimelineRunner {
        let timeline = TimelineConfig::from_json(CONFIG_JSON).unwrap();
        TimelineRunner::new(config, timeline, &AssetCache::new())
    }

    fn bundle() -> AssetBundle {
        let mut bundle = AssetBundle::new();
        bundle.insert_texture("jan", "a.png", TextureHandle::ready(MediaKind::Image, Vec2::new(600.0, 400.0)));
        bundle
    }

    fn event_kinds(r: &TimelineRunner) -> Vec<f32> {
        let count = r.buffer()[HEADER_EVENT_COUNT] as usize;
        let offset = r.layout.event_data_offset;
        (0..count).map(|i| r.buffer()[offset + i * 4]).collect()
    }

    #[test]
    fn load_request_becomes_a_job_and_progress_reaches_header() {
        let mut r = runner(EngineConfig::default().with_loader(false));
        let jobs = r.tick(1.0 / 60.0);
        assert_eq!(jobs.len(), 1);
        let LoadJob::Initial(manifest) = &jobs[0] else {
            panic!("expected the boot manifest");
        };
        assert_eq!(manifest.total_count(), 1);
        assert_eq!(r.buffer()[HEADER_BOOT_PHASE], BootPhase::Loading.code());
        assert!(event_kinds(&r).contains(&HostEvent::LOAD_REQUESTED));

        r.load_progress(LoadProgress { completed: 1, total: 1 });
        r.assets_loaded(&bundle());
        assert!(r.tick(1.0 / 60.0).is_empty());
        assert_eq!(r.buffer()[HEADER_LOAD_COMPLETED], 1.0);
        assert_eq!(r.buffer()[HEADER_LOAD_TOTAL], 1.0);
        assert_eq!(r.buffer()[HEADER_FRAME_COUNTER], 2.0);
        assert!(event_kinds(&r).contains(&HostEvent::READY));
    }

    #[test]
    fn streamed_month_text_is_addressable_by_slot() {
        let mut r = runner(EngineConfig::default().with_loader(false).with_streaming(true));
        r.tick(1.0 / 60.0);
        r.assets_loaded(&AssetBundle::new());
        let jobs = r.tick(1.0 / 60.0);
        assert!(jobs.iter().any(|j| matches!(j, LoadJob::Month { month, .. } if month == "jan")));

        let offset = r.layout.event_data_offset;
        let slot = (0..r.buffer()[HEADER_EVENT_COUNT] as usize)
            .find(|i| r.buffer()[offset + i * 4] == HostEvent::STREAM_MONTH)
            .map(|i| r.buffer()[offset + i * 4 + 1] as u32)
            .unwrap();
        assert_eq!(r.event_text(slot).as_deref(), Some("jan"));
        assert_eq!(r.event_text(99), None);
    }

    #[test]
    fn cursor_code_follows_changes() {
        let mut r = runner(EngineConfig::default().with_loader(false));
        r.tick(1.0 / 60.0);
        r.assets_loaded(&bundle());
        r.tick(1.0 / 60.0);
        assert_eq!(r.buffer()[HEADER_CURSOR], CursorKind::Pointer.code());

        r.push_input(InputEvent::PointerDown { x: 700.0, y: 450.0 });
        r.tick(1.0 / 60.0);
        assert_eq!(r.buffer()[HEADER_CURSOR], CursorKind::Move.code());
    }
}
