pub mod bundle;
pub mod manifest;
pub mod pipeline;
pub mod registry;

pub use bundle::{AssetBundle, AssetCache, FontHandle, ReadyState, TextureHandle};
pub use manifest::{AssetManifest, FontDescriptor, ManifestEntry, MediaKind};
pub use pipeline::{AssetError, AssetPipeline, AssetSource, LoadProgress, VideoReadiness};
pub use registry::{ItemCatalog, ItemData};
