pub mod camera;
pub mod frustum;
pub mod instance;
pub mod raycast;

pub use camera::PerspectiveCamera;
pub use frustum::Frustum;
pub use instance::{BillboardInstance, RenderBuffer, SceneUniforms, TitleAnchor};
pub use raycast::{cast, Hit, Ray};
