pub mod choreography;
pub mod interaction;
pub mod months;
pub mod render;
pub mod scroll;
pub mod streaming;
pub mod video;

pub use choreography::{PerspectiveInput, TweenTargets};
pub use interaction::{ClickAction, InteractionController, InteractionError, InteractionState, PointerTarget, WhooshHover};
pub use months::{ArrowToggle, MonthStateMachine, MonthTransition};
pub use render::{build_render_buffer, FrameView};
pub use scroll::{ScrollPhysics, ScrollState, ScrollStep};
pub use streaming::StreamingTracker;
pub use video::VideoCuller;
