use bytemuck::{Pod, Zeroable};

use crate::core::color::Rgb;

/// Index of an item in build order (equals its global `index_total`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u32);

/// Cursor the host should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorKind {
    Default,
    #[default]
    Pointer,
    /// Over something clickable: an item, the whoosh, a link.
    Eye,
    /// Inside an open item or the contact panel, not over a link.
    Cross,
    /// Auto-advance primed by a held button.
    Move,
}

impl CursorKind {
    pub fn code(self) -> f32 {
        match self {
            CursorKind::Default => 0.0,
            CursorKind::Pointer => 1.0,
            CursorKind::Eye => 2.0,
            CursorKind::Cross => 3.0,
            CursorKind::Move => 4.0,
        }
    }

    /// CSS/data-attribute name.
    pub fn name(self) -> &'static str {
        match self {
            CursorKind::Default => "default",
            CursorKind::Pointer => "pointer",
            CursorKind::Eye => "eye",
            CursorKind::Cross => "cross",
            CursorKind::Move => "move",
        }
    }
}

/// Everything the engine asks of its host, drained once per frame.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    CursorChanged(CursorKind),
    /// Indicator colors (svg fill, compass stroke, theme meta) and the backdrop.
    ThemeChanged { interface: Rgb, background: Rgb },
    /// Splash finished and no cached bundle exists: start the asset pipeline.
    LoadRequested,
    LoadProgress { completed: u32, total: u32 },
    Ready,
    /// Slide the page chrome (logo, say-hello, loading curtain) into place.
    RevealInterface,
    Entered,
    VideoPlay { item: ItemId, reload: bool },
    VideoPause { item: ItemId, unload: bool },
    OpenLink { url: String },
    StreamMonth { month: String },
    PerformanceSample { fps: u32 },
}

impl HostEvent {
    pub const CURSOR: f32 = 1.0;
    pub const THEME: f32 = 2.0;
    pub const LOAD_REQUESTED: f32 = 3.0;
    pub const LOAD_PROGRESS: f32 = 4.0;
    pub const READY: f32 = 5.0;
    pub const REVEAL: f32 = 6.0;
    pub const ENTERED: f32 = 7.0;
    pub const VIDEO_PLAY: f32 = 8.0;
    pub const VIDEO_PAUSE: f32 = 9.0;
    pub const OPEN_LINK: f32 = 10.0;
    pub const STREAM_MONTH: f32 = 11.0;
    pub const PERFORMANCE: f32 = 12.0;

    /// Packed wire form. String payloads travel out of band: `slot` is the
    /// index into the runner's per-frame string table.
    pub fn pack(&self, slot: u32) -> PackedEvent {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        match self {
            HostEvent::CursorChanged(kind) => PackedEvent::new(Self::CURSOR, kind.code(), 0.0, 0.0),
            HostEvent::ThemeChanged { interface, background } => {
                // 24-bit values are exact in an f32 mantissa
                PackedEvent::new(Self::THEME, interface.to_hex() as f32, background.to_hex() as f32, 0.0)
            }
            HostEvent::LoadRequested => PackedEvent::new(Self::LOAD_REQUESTED, 0.0, 0.0, 0.0),
            HostEvent::LoadProgress { completed, total } => {
                PackedEvent::new(Self::LOAD_PROGRESS, *completed as f32, *total as f32, 0.0)
            }
            HostEvent::Ready => PackedEvent::new(Self::READY, 0.0, 0.0, 0.0),
            HostEvent::RevealInterface => PackedEvent::new(Self::REVEAL, 0.0, 0.0, 0.0),
            HostEvent::Entered => PackedEvent::new(Self::ENTERED, 0.0, 0.0, 0.0),
            HostEvent::VideoPlay { item, reload } => {
                PackedEvent::new(Self::VIDEO_PLAY, item.0 as f32, flag(*reload), 0.0)
            }
            HostEvent::VideoPause { item, unload } => {
                PackedEvent::new(Self::VIDEO_PAUSE, item.0 as f32, flag(*unload), 0.0)
            }
            HostEvent::OpenLink { .. } => PackedEvent::new(Self::OPEN_LINK, slot as f32, 0.0, 0.0),
            HostEvent::StreamMonth { .. } => PackedEvent::new(Self::STREAM_MONTH, slot as f32, 0.0, 0.0),
            HostEvent::PerformanceSample { fps } => PackedEvent::new(Self::PERFORMANCE, *fps as f32, 0.0, 0.0),
        }
    }

    /// String payload carried out of band, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            HostEvent::OpenLink { url } => Some(url),
            HostEvent::StreamMonth { month } => Some(month),
            _ => None,
        }
    }
}

/// A host event in shared-buffer form: `kind` identifies it, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct PackedEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl PackedEvent {
    pub const FLOATS: usize = 4;

    pub fn new(kind: f32, a: f32, b: f32, c: f32) -> Self {
        Self { kind, a, b, c }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_event_is_four_floats() {
        assert_eq!(std::mem::size_of::<PackedEvent>(), 16);
    }

    #[test]
    fn theme_colors_pack_exactly() {
        let ev = HostEvent::ThemeChanged {
            interface: Rgb::from_hex(0xb9b4e8),
            background: Rgb::from_hex(0x416863),
        };
        let packed = ev.pack(0);
        assert_eq!(packed.kind, HostEvent::THEME);
        assert_eq!(packed.a as u32, 0xb9b4e8);
        assert_eq!(packed.b as u32, 0x416863);
    }

    #[test]
    fn string_events_reference_their_slot() {
        let ev = HostEvent::OpenLink { url: "https://example.com".into() };
        assert_eq!(ev.pack(3).a, 3.0);
        assert_eq!(ev.text(), Some("https://example.com"));
        assert_eq!(HostEvent::Ready.text(), None);
    }
}
