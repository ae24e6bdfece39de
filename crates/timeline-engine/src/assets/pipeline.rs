use futures::future::{FutureExt, LocalBoxFuture};
use futures::stream::{FuturesUnordered, StreamExt};
use glam::Vec2;
use thiserror::Error;

use super::bundle::{AssetBundle, FontHandle, TextureHandle};
use super::manifest::{AssetManifest, FontDescriptor, ManifestEntry, MediaKind};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("image '{path}' failed to load: {reason}")]
    Image { path: String, reason: String },
    #[error("video '{path}' failed to load: {reason}")]
    Video { path: String, reason: String },
    #[error("font '{path}' failed to load: {reason}")]
    Font { path: String, reason: String },
    #[error("asset manifest is not valid JSON: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// Which media event marks a video as usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoReadiness {
    /// Desktop: enough buffered to play to the end.
    CanPlayThrough,
    /// Mobile: first frame decoded.
    LoadedData,
}

impl VideoReadiness {
    pub fn for_platform(is_mobile: bool) -> Self {
        if is_mobile {
            VideoReadiness::LoadedData
        } else {
            VideoReadiness::CanPlayThrough
        }
    }
}

/// Fetches and decodes individual files. The web bridge implements this over
/// the browser; tests implement it in memory.
pub trait AssetSource {
    /// Resolves with the image's natural pixel size.
    fn load_image(&self, path: String) -> LocalBoxFuture<'_, Result<Vec2, AssetError>>;

    /// Resolves with the video's natural pixel size once `readiness` fires.
    /// `reload` forces the element to reload before waiting.
    fn load_video(
        &self,
        path: String,
        readiness: VideoReadiness,
        reload: bool,
    ) -> LocalBoxFuture<'_, Result<Vec2, AssetError>>;

    fn load_font(&self, font: FontDescriptor) -> LocalBoxFuture<'_, Result<FontHandle, AssetError>>;
}

/// One settlement reported to the progress callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProgress {
    pub completed: u32,
    pub total: u32,
}

impl LoadProgress {
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            100
        } else {
            (self.completed as f32 / self.total as f32 * 100.0).round() as u32
        }
    }

    pub fn is_done(&self) -> bool {
        self.completed >= self.total
    }
}

enum Settled {
    Texture {
        entry: ManifestEntry,
        result: Result<Vec2, AssetError>,
    },
    Font {
        font: FontDescriptor,
        result: Result<FontHandle, AssetError>,
    },
}

/// Loads every file of a manifest concurrently into one `AssetBundle`.
pub struct AssetPipeline<S> {
    source: S,
    is_mobile: bool,
}

impl<S: AssetSource> AssetPipeline<S> {
    pub fn new(source: S, is_mobile: bool) -> Self {
        Self { source, is_mobile }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolve once every file has settled. Progress is reported after each
    /// settlement in completion order, so `completed` counts 1..=total.
    /// Failures are logged and recorded; the file keeps a failed placeholder.
    pub async fn load(&self, manifest: &AssetManifest, mut on_progress: impl FnMut(LoadProgress)) -> AssetBundle {
        let total = manifest.total_count() as u32;
        log::info!("loading {total} assets");

        let mut pending: FuturesUnordered<LocalBoxFuture<'_, Settled>> = FuturesUnordered::new();
        for entry in manifest.entries() {
            pending.push(self.load_media(entry).boxed_local());
        }
        for font in manifest.fonts.iter().cloned() {
            pending.push(
                async move {
                    let result = self.source.load_font(font.clone()).await;
                    Settled::Font { font, result }
                }
                .boxed_local(),
            );
        }

        let mut bundle = AssetBundle::new();
        let mut completed = 0;
        while let Some(settled) = pending.next().await {
            completed += 1;
            match settled {
                Settled::Texture { entry, result } => match result {
                    Ok(size) => {
                        bundle.insert_texture(&entry.month, &entry.filename, TextureHandle::ready(entry.kind, size));
                    }
                    Err(err) => {
                        log::warn!("{err}");
                        bundle.insert_texture(&entry.month, &entry.filename, TextureHandle::failed(entry.kind));
                        bundle.failures.push(err);
                    }
                },
                Settled::Font { font, result } => match result {
                    Ok(handle) => bundle.insert_font(handle),
                    Err(err) => {
                        log::warn!("{err} (family '{}')", font.family);
                        bundle.failures.push(err);
                    }
                },
            }
            on_progress(LoadProgress { completed, total });
        }

        log::info!(
            "assets loaded: {} textures, {} fonts, {} failures",
            bundle.texture_count(),
            bundle.fonts.len(),
            bundle.failures.len()
        );
        bundle
    }

    async fn load_media(&self, entry: ManifestEntry) -> Settled {
        let path = entry.path();
        let result = match entry.kind {
            MediaKind::Image => self.source.load_image(path).await,
            MediaKind::Video => self.load_video(path).await,
        };
        Settled::Texture { entry, result }
    }

    /// Mobile browsers sometimes fail a first decode; retry once with a
    /// forced reload. A second failure stands.
    async fn load_video(&self, path: String) -> Result<Vec2, AssetError> {
        let readiness = VideoReadiness::for_platform(self.is_mobile);
        match self.source.load_video(path.clone(), readiness, false).await {
            Err(err) if self.is_mobile => {
                log::warn!("{err}; retrying with reload");
                self.source.load_video(path, readiness, true).await
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use futures::future;
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};

    /// In-memory source. Each path resolves after yielding `delay` times, so
    /// completion order differs from submission order.
    #[derive(Default)]
    struct MemorySource {
        sizes: HashMap<String, Vec2>,
        delays: HashMap<String, u32>,
        /// Video paths that fail until reloaded.
        flaky: HashSet<String>,
        missing: HashSet<String>,
        video_calls: RefCell<Vec<(String, VideoReadiness, bool)>>,
    }

    impl MemorySource {
        fn with(mut self, path: &str, size: Vec2, delay: u32) -> Self {
            self.sizes.insert(path.to_string(), size);
            self.delays.insert(path.to_string(), delay);
            self
        }

        fn resolve(&self, path: String) -> LocalBoxFuture<'_, Result<Vec2, AssetError>> {
            let delay = self.delays.get(&path).copied().unwrap_or(0);
            async move {
                for _ in 0..delay {
                    yield_now().await;
                }
                self.sizes.get(&path).copied().ok_or_else(|| AssetError::Image {
                    path: path.clone(),
                    reason: "404".into(),
                })
            }
            .boxed_local()
        }
    }

    /// Pending once, then ready: forces the executor to poll siblings.
    async fn yield_now() {
        let mut yielded = false;
        future::poll_fn(move |cx| {
            if yielded {
                std::task::Poll::Ready(())
            } else {
                yielded = true;
                cx.waker().wake_by_ref();
                std::task::Poll::Pending
            }
        })
        .await
    }

    impl AssetSource for MemorySource {
        fn load_image(&self, path: String) -> LocalBoxFuture<'_, Result<Vec2, AssetError>> {
            if self.missing.contains(&path) {
                return future::ready(Err(AssetError::Image { path, reason: "404".into() })).boxed_local();
            }
            self.resolve(path)
        }

        fn load_video(
            &self,
            path: String,
            readiness: VideoReadiness,
            reload: bool,
        ) -> LocalBoxFuture<'_, Result<Vec2, AssetError>> {
            self.video_calls.borrow_mut().push((path.clone(), readiness, reload));
            if self.flaky.contains(&path) && !reload {
                return future::ready(Err(AssetError::Video { path, reason: "decode".into() })).boxed_local();
            }
            self.resolve(path)
        }

        fn load_font(&self, font: FontDescriptor) -> LocalBoxFuture<'_, Result<FontHandle, AssetError>> {
            let delay = self.delays.get(&font.path).copied().unwrap_or(0);
            async move {
                for _ in 0..delay {
                    yield_now().await;
                }
                Ok(FontHandle { family: font.family, path: font.path })
            }
            .boxed_local()
        }
    }

    fn manifest() -> AssetManifest {
        AssetManifest::new()
            .with_month("jan", vec!["a.png".into(), "b.png".into()])
            .with_month("feb", vec!["c.mp4".into()])
            .with_font("Gentilis Bold", "fonts/gentilis_bold.typeface.json")
            .with_font("Gentilis", "fonts/gentilis_regular.typeface.json")
            .with_font("Helvetiker Bold", "fonts/helvetiker_bold.typeface.json")
    }

    fn source() -> MemorySource {
        MemorySource::default()
            .with("assets/jan/a.png", Vec2::new(800.0, 600.0), 5)
            .with("assets/jan/b.png", Vec2::new(400.0, 400.0), 1)
            .with("assets/feb/c.mp4", Vec2::new(1280.0, 720.0), 3)
    }

    #[test]
    fn bundle_holds_every_texture_and_font() {
        let pipeline = AssetPipeline::new(source(), false);
        let mut progress = Vec::new();
        let bundle = block_on(pipeline.load(&manifest(), |p| progress.push(p)));

        assert!(bundle.texture("jan", "a.png").is_some_and(|t| t.is_ready()));
        assert!(bundle.texture("jan", "b.png").is_some_and(|t| t.is_ready()));
        let video = bundle.texture("feb", "c.mp4").unwrap();
        assert!(video.is_video());
        assert_eq!(video.natural_size, Vec2::new(1280.0, 720.0));
        for family in ["Gentilis Bold", "Gentilis", "Helvetiker Bold"] {
            assert!(bundle.has_font(family), "missing {family}");
        }
        assert!(bundle.failures.is_empty());

        let completed: Vec<u32> = progress.iter().map(|p| p.completed).collect();
        assert_eq!(completed, vec![1, 2, 3, 4, 5, 6]);
        assert!(progress.iter().all(|p| p.total == 6));
        assert!(progress.last().unwrap().is_done());
    }

    #[test]
    fn failed_image_degrades_without_failing_bundle() {
        let mut src = source();
        src.missing.insert("assets/jan/b.png".into());
        let pipeline = AssetPipeline::new(src, false);
        let mut last = None;
        let bundle = block_on(pipeline.load(&manifest(), |p| last = Some(p)));

        let b = bundle.texture("jan", "b.png").unwrap();
        assert!(!b.is_ready());
        assert_eq!(bundle.failures.len(), 1);
        assert!(bundle.texture("jan", "a.png").unwrap().is_ready());
        assert_eq!(last, Some(LoadProgress { completed: 6, total: 6 }));
    }

    #[test]
    fn desktop_waits_for_play_through_without_retry() {
        let mut src = source();
        src.flaky.insert("assets/feb/c.mp4".into());
        let pipeline = AssetPipeline::new(src, false);
        let bundle = block_on(pipeline.load(&manifest(), |_| {}));

        assert!(!bundle.texture("feb", "c.mp4").unwrap().is_ready());
        let calls = pipeline.source().video_calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, VideoReadiness::CanPlayThrough);
    }

    #[test]
    fn mobile_video_retries_once_with_reload() {
        let mut src = source();
        src.flaky.insert("assets/feb/c.mp4".into());
        let pipeline = AssetPipeline::new(src, true);
        let bundle = block_on(pipeline.load(&manifest(), |_| {}));

        assert!(bundle.texture("feb", "c.mp4").unwrap().is_ready());
        let calls = pipeline.source().video_calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], ("assets/feb/c.mp4".to_string(), VideoReadiness::LoadedData, false));
        assert!(calls[1].2);
    }

    #[test]
    fn empty_manifest_resolves_immediately() {
        let pipeline = AssetPipeline::new(MemorySource::default(), false);
        let mut calls = 0;
        let bundle = block_on(pipeline.load(&AssetManifest::new(), |_| calls += 1));
        assert_eq!(bundle.texture_count(), 0);
        assert_eq!(calls, 0);
    }

    #[test]
    fn percent_rounds() {
        assert_eq!(LoadProgress { completed: 1, total: 3 }.percent(), 33);
        assert_eq!(LoadProgress { completed: 0, total: 0 }.percent(), 100);
    }
}
