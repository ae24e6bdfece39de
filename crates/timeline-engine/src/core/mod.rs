pub mod color;
pub mod scene;
pub mod time;

pub use color::Rgb;
pub use scene::{LinkGroup, SceneGraph, TimelineGroup};
pub use time::{FixedTimestep, FrameClock, FrameSample};
