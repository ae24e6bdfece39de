use std::collections::BTreeMap;
use std::rc::Rc;

use glam::Vec2;

use super::manifest::MediaKind;
use super::pipeline::AssetError;

/// Display size used until a texture reports its real dimensions.
pub const PLACEHOLDER_SIZE: Vec2 = Vec2::new(10.0, 10.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadyState {
    /// Not fetched yet (lazily streamed month).
    #[default]
    Pending,
    Ready,
    /// Fetch failed; the item keeps a placeholder.
    Failed,
}

/// A decoded image or video, as far as the engine cares.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureHandle {
    pub media: MediaKind,
    /// Source pixel dimensions.
    pub natural_size: Vec2,
    pub ready: ReadyState,
}

impl TextureHandle {
    pub fn ready(media: MediaKind, natural_size: Vec2) -> Self {
        Self {
            media,
            natural_size,
            ready: ReadyState::Ready,
        }
    }

    pub fn placeholder(media: MediaKind) -> Self {
        Self {
            media,
            natural_size: Vec2::ZERO,
            ready: ReadyState::Pending,
        }
    }

    pub fn failed(media: MediaKind) -> Self {
        Self {
            ready: ReadyState::Failed,
            ..Self::placeholder(media)
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready == ReadyState::Ready
    }

    pub fn is_video(&self) -> bool {
        self.media == MediaKind::Video
    }

    /// World size of the quad: half the natural size (sources are @2x).
    pub fn display_size(&self) -> Vec2 {
        if self.is_ready() {
            self.natural_size / 2.0
        } else {
            PLACEHOLDER_SIZE
        }
    }
}

/// A loaded typeface, keyed by the family name it registers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontHandle {
    pub family: String,
    pub path: String,
}

/// Everything the pipeline produced.
#[derive(Debug, Default)]
pub struct AssetBundle {
    /// month → filename → texture.
    pub textures: BTreeMap<String, BTreeMap<String, TextureHandle>>,
    /// family → font.
    pub fonts: BTreeMap<String, FontHandle>,
    /// Individual failures; the bundle is still usable.
    pub failures: Vec<AssetError>,
}

impl AssetBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_texture(&mut self, month: &str, filename: &str, texture: TextureHandle) {
        self.textures
            .entry(month.to_string())
            .or_default()
            .insert(filename.to_string(), texture);
    }

    pub fn insert_font(&mut self, font: FontHandle) {
        self.fonts.insert(font.family.clone(), font);
    }

    pub fn texture(&self, month: &str, filename: &str) -> Option<&TextureHandle> {
        self.textures.get(month).and_then(|files| files.get(filename))
    }

    pub fn month(&self, month: &str) -> Option<&BTreeMap<String, TextureHandle>> {
        self.textures.get(month)
    }

    pub fn has_font(&self, family: &str) -> bool {
        self.fonts.contains_key(family)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.values().map(BTreeMap::len).sum()
    }
}

/// Process-wide bundle cache. A session that finds a bundle here skips the
/// splash and the pipeline entirely.
#[derive(Debug, Default, Clone)]
pub struct AssetCache {
    bundle: Option<Rc<AssetBundle>>,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Rc<AssetBundle>> {
        self.bundle.clone()
    }

    pub fn store(&mut self, bundle: AssetBundle) -> Rc<AssetBundle> {
        let bundle = Rc::new(bundle);
        self.bundle = Some(Rc::clone(&bundle));
        bundle
    }

    pub fn is_empty(&self) -> bool {
        self.bundle.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_size_is_half_natural() {
        let tex = TextureHandle::ready(MediaKind::Image, Vec2::new(800.0, 600.0));
        assert_eq!(tex.display_size(), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn placeholder_uses_fixed_size() {
        let tex = TextureHandle::placeholder(MediaKind::Video);
        assert!(!tex.is_ready());
        assert!(tex.is_video());
        assert_eq!(tex.display_size(), PLACEHOLDER_SIZE);
        assert_eq!(TextureHandle::failed(MediaKind::Image).ready, ReadyState::Failed);
    }

    #[test]
    fn cache_hands_back_the_stored_bundle() {
        let mut cache = AssetCache::new();
        assert!(cache.is_empty());
        let mut bundle = AssetBundle::new();
        bundle.insert_font(FontHandle { family: "Gentilis".into(), path: "fonts/g.json".into() });
        cache.store(bundle);
        let cached = cache.get().unwrap();
        assert!(cached.has_font("Gentilis"));
    }
}
