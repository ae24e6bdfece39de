pub mod queue;
pub mod wheel;

pub use queue::{InputEvent, InputQueue};
pub use wheel::WheelDelta;
