pub mod runner;
pub mod source;

pub use runner::{LoadJob, TimelineRunner};
pub use source::JsAssetSource;

use std::cell::RefCell;

use timeline_engine::{
    AssetCache, AssetPipeline, EngineConfig, InputEvent, TimelineConfig, Viewport, WheelDelta,
};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<TimelineRunner>> = RefCell::new(None);
    /// Survives re-initialisation within the page session.
    static CACHE: RefCell<AssetCache> = RefCell::new(AssetCache::new());
    static LOADER: RefCell<Option<js_sys::Function>> = RefCell::new(None);
}

/// `None` (with a warning) until `timeline_init` succeeded.
fn with_runner<R>(f: impl FnOnce(&mut TimelineRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(runner) => Some(f(runner)),
            None => {
                log::warn!("timeline not initialized; call timeline_init() first");
                None
            }
        }
    })
}

fn push(event: InputEvent) {
    with_runner(|r| r.push_input(event));
}

fn spawn_load(job: LoadJob) {
    let Some(loader) = LOADER.with(|cell| cell.borrow().clone()) else {
        log::error!("no asset loader registered");
        return;
    };
    let is_mobile = with_runner(|r| r.is_mobile()).unwrap_or(false);

    wasm_bindgen_futures::spawn_local(async move {
        let pipeline = AssetPipeline::new(JsAssetSource::new(loader), is_mobile);
        match job {
            LoadJob::Initial(manifest) => {
                let bundle = pipeline
                    .load(&manifest, |progress| {
                        with_runner(|r| r.load_progress(progress));
                    })
                    .await;
                let shared = CACHE.with(|cell| cell.borrow_mut().store(bundle));
                with_runner(|r| r.assets_loaded(&shared));
            }
            LoadJob::Month { month, manifest } => {
                let bundle = pipeline.load(&manifest, |_| {}).await;
                with_runner(|r| r.month_loaded(&month, &bundle));
            }
        }
    });
}

#[allow(clippy::too_many_arguments)]
#[wasm_bindgen]
pub fn timeline_init(
    config_json: &str,
    width: f32,
    height: f32,
    device_pixel_ratio: f32,
    is_mobile: bool,
    touch_enabled: bool,
    enable_loader: bool,
    stream_months: bool,
    loader: js_sys::Function,
) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::debug_1(&JsValue::from_str("timeline: logger already installed"));
    }

    let timeline = TimelineConfig::from_json(config_json).map_err(|err| {
        log::error!("timeline config rejected: {err}");
        JsValue::from_str(&err.to_string())
    })?;

    let mut config = EngineConfig::default()
        .with_viewport(Viewport::new(width, height, device_pixel_ratio))
        .with_platform(is_mobile, touch_enabled)
        .with_loader(enable_loader)
        .with_streaming(stream_months);
    config.cull_videos = !is_mobile;

    let runner = CACHE.with(|cell| TimelineRunner::new(config, timeline, &cell.borrow()));
    LOADER.with(|cell| *cell.borrow_mut() = Some(loader));
    RUNNER.with(|cell| *cell.borrow_mut() = Some(runner));
    log::info!("timeline: initialized");
    Ok(())
}

#[wasm_bindgen]
pub fn timeline_tick(dt: f32) {
    let jobs = with_runner(|r| r.tick(dt)).unwrap_or_default();
    for job in jobs {
        spawn_load(job);
    }
}

// ---- Input ----

#[wasm_bindgen]
pub fn timeline_wheel(delta_y: f32, wheel_delta: f32, detail: f32) {
    push(InputEvent::Wheel(WheelDelta { delta_y, wheel_delta, detail }));
}

#[wasm_bindgen]
pub fn timeline_pointer_down(x: f32, y: f32) {
    push(InputEvent::PointerDown { x, y });
}

#[wasm_bindgen]
pub fn timeline_pointer_up(x: f32, y: f32) {
    push(InputEvent::PointerUp { x, y });
}

#[wasm_bindgen]
pub fn timeline_pointer_move(x: f32, y: f32, over_canvas: bool) {
    push(InputEvent::PointerMove { x, y, over_canvas });
}

#[wasm_bindgen]
pub fn timeline_pan_move(velocity_y: f32) {
    push(InputEvent::PanMove { velocity_y });
}

#[wasm_bindgen]
pub fn timeline_pan_end() {
    push(InputEvent::PanEnd);
}

#[wasm_bindgen]
pub fn timeline_long_press() {
    push(InputEvent::LongPress);
}

#[wasm_bindgen]
pub fn timeline_resize(width: f32, height: f32, device_pixel_ratio: f32) {
    push(InputEvent::Resize { width, height, device_pixel_ratio });
}

#[wasm_bindgen]
pub fn timeline_device_orientation(beta: f32, gamma: f32) {
    push(InputEvent::DeviceOrientation { beta, gamma });
}

#[wasm_bindgen]
pub fn timeline_device_motion(alpha: f32, beta: f32, gamma: f32) {
    push(InputEvent::DeviceMotion { alpha, beta, gamma });
}

#[wasm_bindgen]
pub fn timeline_say_hello() {
    push(InputEvent::SayHello);
}

#[wasm_bindgen]
pub fn timeline_reset_orientation() {
    push(InputEvent::ResetOrientation);
}

#[wasm_bindgen]
pub fn timeline_enter() {
    push(InputEvent::Enter);
}

#[wasm_bindgen]
pub fn timeline_easter_egg() {
    push(InputEvent::EasterEgg);
}

#[wasm_bindgen]
pub fn timeline_open_item(id: u32) {
    with_runner(|r| r.open_item(id));
}

#[wasm_bindgen]
pub fn timeline_close_item() {
    with_runner(|r| r.close_item());
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_buffer_ptr() -> *const f32 {
    with_runner(|r| r.buffer_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_event_text(slot: u32) -> Option<String> {
    with_runner(|r| r.event_text(slot)).flatten()
}

// ---- Capacity accessors ----

#[wasm_bindgen]
pub fn get_max_billboards() -> u32 {
    with_runner(|r| r.max_billboards()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_max_titles() -> u32 {
    with_runner(|r| r.max_titles()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_max_events() -> u32 {
    with_runner(|r| r.max_events()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_buffer_total_floats() -> u32 {
    with_runner(|r| r.buffer_total_floats()).unwrap_or(0)
}
