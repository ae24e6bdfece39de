pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod assets;
pub mod config;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::config::{EngineConfig, Viewport};
pub use api::engine::{BootPhase, EngineContext, TimelineEngine};
pub use api::types::{CursorKind, HostEvent, ItemId, PackedEvent};
pub use assets::{AssetBundle, AssetCache, AssetError, AssetManifest, AssetPipeline, AssetSource, LoadProgress, MediaKind, TextureHandle};
pub use bridge::protocol::{write_frame, FrameHeader, ProtocolLayout};
pub use config::{ConfigError, MonthEntry, MonthsConfig, Palette, TimelineConfig};
pub use core::color::Rgb;
pub use core::scene::SceneGraph;
pub use core::time::FixedTimestep;
pub use input::queue::{InputEvent, InputQueue};
pub use input::wheel::WheelDelta;
pub use renderer::instance::{BillboardInstance, RenderBuffer, SceneUniforms};
pub use systems::interaction::InteractionError;
pub use glam::Vec2;

// Extensions: animation helpers driven by the engine's tween state
pub use extensions::{Easing, Tween, TweenId, TweenLoop, TweenProperty, TweenState, TweenValue};
