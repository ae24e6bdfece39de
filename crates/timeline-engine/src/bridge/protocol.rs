/// Shared float buffer layout.
/// Must stay in sync with the JavaScript renderer's `protocol.js`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 16 floats]
/// [Uniforms: 56 floats]
/// [Billboards: max_billboards × 12 floats]
/// [Titles: max_titles × 4 floats]
/// [Events: max_events × 4 floats]
/// ```
///
/// Capacities are written into the header every frame.
/// JavaScript reads them from the header to compute offsets dynamically.

use crate::api::config::{EngineConfig, Viewport};
use crate::api::types::PackedEvent;
use crate::renderer::instance::{BillboardInstance, RenderBuffer, SceneUniforms, TitleAnchor};

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_BILLBOARDS: usize = 2;
pub const HEADER_BILLBOARD_COUNT: usize = 3;
pub const HEADER_MAX_TITLES: usize = 4;
pub const HEADER_TITLE_COUNT: usize = 5;
pub const HEADER_MAX_EVENTS: usize = 6;
pub const HEADER_EVENT_COUNT: usize = 7;
pub const HEADER_VIEWPORT_WIDTH: usize = 8;
pub const HEADER_VIEWPORT_HEIGHT: usize = 9;
pub const HEADER_DEVICE_PIXEL_RATIO: usize = 10;
pub const HEADER_PROTOCOL_VERSION: usize = 11;
pub const HEADER_BOOT_PHASE: usize = 12;
pub const HEADER_CURSOR: usize = 13;
pub const HEADER_LOAD_COMPLETED: usize = 14;
pub const HEADER_LOAD_TOTAL: usize = 15;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_billboards: usize,
    pub max_titles: usize,
    pub max_events: usize,

    pub uniform_data_floats: usize,
    pub billboard_data_floats: usize,
    pub title_data_floats: usize,
    pub event_data_floats: usize,

    /// Offset (in floats) where the scene uniforms begin.
    pub uniform_data_offset: usize,
    pub billboard_data_offset: usize,
    pub title_data_offset: usize,
    pub event_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    pub fn new(max_billboards: usize, max_titles: usize, max_events: usize) -> Self {
        let uniform_data_floats = SceneUniforms::FLOATS;
        let billboard_data_floats = max_billboards * BillboardInstance::FLOATS;
        let title_data_floats = max_titles * TitleAnchor::FLOATS;
        let event_data_floats = max_events * PackedEvent::FLOATS;

        let uniform_data_offset = HEADER_FLOATS;
        let billboard_data_offset = uniform_data_offset + uniform_data_floats;
        let title_data_offset = billboard_data_offset + billboard_data_floats;
        let event_data_offset = title_data_offset + title_data_floats;

        let buffer_total_floats = event_data_offset + event_data_floats;

        Self {
            max_billboards,
            max_titles,
            max_events,
            uniform_data_floats,
            billboard_data_floats,
            title_data_floats,
            event_data_floats,
            uniform_data_offset,
            billboard_data_offset,
            title_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.max_billboards, config.max_titles, config.max_events)
    }
}

/// Per-frame header values that do not come from the render buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameHeader {
    pub frame: u32,
    pub viewport: Viewport,
    pub boot_phase: f32,
    pub cursor: f32,
    pub load_completed: u32,
    pub load_total: u32,
}

/// Write one frame into `out`. Sections past their capacity are truncated.
/// The lock is raised while writing and cleared last.
pub fn write_frame(
    layout: &ProtocolLayout,
    header: &FrameHeader,
    render: &RenderBuffer,
    events: &[PackedEvent],
    out: &mut [f32],
) {
    if out.len() < layout.buffer_total_floats {
        log::error!(
            "frame buffer holds {} floats, layout needs {}",
            out.len(),
            layout.buffer_total_floats
        );
        return;
    }
    out[HEADER_LOCK] = 1.0;

    let billboards = copy_section(
        render.billboards_as_floats(),
        BillboardInstance::FLOATS,
        layout.max_billboards,
        &mut out[layout.billboard_data_offset..layout.title_data_offset],
    );
    let titles = copy_section(
        render.titles_as_floats(),
        TitleAnchor::FLOATS,
        layout.max_titles,
        &mut out[layout.title_data_offset..layout.event_data_offset],
    );
    let events = copy_section(
        bytemuck::cast_slice(events),
        PackedEvent::FLOATS,
        layout.max_events,
        &mut out[layout.event_data_offset..layout.buffer_total_floats],
    );
    out[layout.uniform_data_offset..layout.billboard_data_offset].copy_from_slice(render.uniforms_as_floats());

    out[HEADER_FRAME_COUNTER] = header.frame as f32;
    out[HEADER_MAX_BILLBOARDS] = layout.max_billboards as f32;
    out[HEADER_BILLBOARD_COUNT] = billboards as f32;
    out[HEADER_MAX_TITLES] = layout.max_titles as f32;
    out[HEADER_TITLE_COUNT] = titles as f32;
    out[HEADER_MAX_EVENTS] = layout.max_events as f32;
    out[HEADER_EVENT_COUNT] = events as f32;
    out[HEADER_VIEWPORT_WIDTH] = header.viewport.width;
    out[HEADER_VIEWPORT_HEIGHT] = header.viewport.height;
    out[HEADER_DEVICE_PIXEL_RATIO] = header.viewport.device_pixel_ratio;
    out[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
    out[HEADER_BOOT_PHASE] = header.boot_phase;
    out[HEADER_CURSOR] = header.cursor;
    out[HEADER_LOAD_COMPLETED] = header.load_completed as f32;
    out[HEADER_LOAD_TOTAL] = header.load_total as f32;

    out[HEADER_LOCK] = 0.0;
}

/// Copy up to `capacity` records of `stride` floats; returns the record count.
fn copy_section(src: &[f32], stride: usize, capacity: usize, dst: &mut [f32]) -> usize {
    let count = (src.len() / stride).min(capacity);
    if src.len() / stride > capacity {
        log::warn!("dropping {} records past capacity {capacity}", src.len() / stride - capacity);
    }
    dst[..count * stride].copy_from_slice(&src[..count * stride]);
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_MAX_BILLBOARDS: usize = 256;
    const DEFAULT_MAX_TITLES: usize = 32;
    const DEFAULT_MAX_EVENTS: usize = 64;
    const UNIFORM_DATA_OFFSET: usize = HEADER_FLOATS;
    const BILLBOARD_DATA_OFFSET: usize = UNIFORM_DATA_OFFSET + 56;
    const TITLE_DATA_OFFSET: usize = BILLBOARD_DATA_OFFSET + DEFAULT_MAX_BILLBOARDS * 12;
    const EVENT_DATA_OFFSET: usize = TITLE_DATA_OFFSET + DEFAULT_MAX_TITLES * 4;
    const BUFFER_TOTAL_FLOATS: usize = EVENT_DATA_OFFSET + DEFAULT_MAX_EVENTS * 4;

    fn header() -> FrameHeader {
        FrameHeader {
            frame: 7,
            viewport: Viewport::new(1400.0, 900.0, 2.0),
            boot_phase: 2.0,
            cursor: 1.0,
            load_completed: 3,
            load_total: 3,
        }
    }

    fn billboard(item: f32) -> BillboardInstance {
        BillboardInstance {
            item,
            opacity: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn from_default_config_matches_expected_sizes() {
        let layout = ProtocolLayout::from_config(&EngineConfig::default());

        assert_eq!(layout.max_billboards, DEFAULT_MAX_BILLBOARDS);
        assert_eq!(layout.max_titles, DEFAULT_MAX_TITLES);
        assert_eq!(layout.max_events, DEFAULT_MAX_EVENTS);

        assert_eq!(layout.uniform_data_offset, UNIFORM_DATA_OFFSET);
        assert_eq!(layout.billboard_data_offset, BILLBOARD_DATA_OFFSET);
        assert_eq!(layout.title_data_offset, TITLE_DATA_OFFSET);
        assert_eq!(layout.event_data_offset, EVENT_DATA_OFFSET);

        assert_eq!(layout.buffer_total_floats, BUFFER_TOTAL_FLOATS);
        assert_eq!(layout.buffer_total_bytes, BUFFER_TOTAL_FLOATS * 4);
    }

    #[test]
    fn offsets_are_contiguous() {
        let layout = ProtocolLayout::new(100, 10, 20);

        assert_eq!(layout.uniform_data_offset, HEADER_FLOATS);
        assert_eq!(layout.billboard_data_offset, layout.uniform_data_offset + layout.uniform_data_floats);
        assert_eq!(layout.title_data_offset, layout.billboard_data_offset + layout.billboard_data_floats);
        assert_eq!(layout.event_data_offset, layout.title_data_offset + layout.title_data_floats);
        assert_eq!(layout.buffer_total_floats, layout.event_data_offset + layout.event_data_floats);
    }

    #[test]
    fn writes_header_and_sections() {
        let layout = ProtocolLayout::new(4, 2, 4);
        let mut render = RenderBuffer::new();
        render.push(billboard(0.0));
        render.push(billboard(5.0));
        render.uniforms.fog_near = 1400.0;
        let events = [PackedEvent::new(5.0, 0.0, 0.0, 0.0)];
        let mut out = vec![0.0; layout.buffer_total_floats];

        write_frame(&layout, &header(), &render, &events, &mut out);

        assert_eq!(out[HEADER_LOCK], 0.0);
        assert_eq!(out[HEADER_FRAME_COUNTER], 7.0);
        assert_eq!(out[HEADER_BILLBOARD_COUNT], 2.0);
        assert_eq!(out[HEADER_TITLE_COUNT], 0.0);
        assert_eq!(out[HEADER_EVENT_COUNT], 1.0);
        assert_eq!(out[HEADER_DEVICE_PIXEL_RATIO], 2.0);
        assert_eq!(out[HEADER_PROTOCOL_VERSION], PROTOCOL_VERSION);
        assert_eq!(out[HEADER_LOAD_TOTAL], 3.0);

        let second = layout.billboard_data_offset + BillboardInstance::FLOATS;
        assert_eq!(&out[second..second + 12], &render.billboards_as_floats()[12..24]);
        assert_eq!(out[layout.event_data_offset], 5.0);
        let uniforms = &out[layout.uniform_data_offset..layout.billboard_data_offset];
        assert_eq!(uniforms, render.uniforms_as_floats());
    }

    #[test]
    fn truncates_past_capacity() {
        let layout = ProtocolLayout::new(1, 1, 1);
        let mut render = RenderBuffer::new();
        render.push(billboard(0.0));
        render.push(billboard(1.0));
        let events = [PackedEvent::default(); 3];
        let mut out = vec![0.0; layout.buffer_total_floats];

        write_frame(&layout, &header(), &render, &events, &mut out);
        assert_eq!(out[HEADER_BILLBOARD_COUNT], 1.0);
        assert_eq!(out[HEADER_EVENT_COUNT], 1.0);
    }

    #[test]
    fn short_buffer_is_left_untouched() {
        let layout = ProtocolLayout::new(4, 2, 4);
        let mut out = vec![9.0; HEADER_FLOATS];
        write_frame(&layout, &header(), &RenderBuffer::new(), &[], &mut out);
        assert!(out.iter().all(|v| *v == 9.0));
    }
}
