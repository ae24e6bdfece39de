use glam::{Mat4, Vec2, Vec3};

use crate::api::config::Viewport;
use super::raycast::Ray;

/// Perspective camera looking down -z.
/// The field of view is derived from the viewport height so that one world
/// unit at z = 0 maps to one CSS pixel.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    /// x/y rotation in radians.
    pub rotation: Vec2,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    viewport: Vec2,
}

impl PerspectiveCamera {
    pub fn new(viewport: &Viewport, distance: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 0.0, distance),
            rotation: Vec2::ZERO,
            fov_y: 0.0,
            aspect: 1.0,
            near,
            far,
            viewport: viewport.size(),
        };
        camera.resize(viewport);
        camera
    }

    /// Recompute fov and aspect for a new viewport; position and rotation stay.
    pub fn resize(&mut self, viewport: &Viewport) {
        self.viewport = viewport.size();
        self.aspect = viewport.aspect();
        self.fov_y = 2.0 * (viewport.height / 2.0 / self.position.z).atan();
    }

    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_rotation_x(self.rotation.x)
            * Mat4::from_rotation_y(self.rotation.y)
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.world_matrix().inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// CSS pixel position to normalized device coordinates (y up).
    pub fn screen_to_ndc(&self, screen: Vec2) -> Vec2 {
        Vec2::new(
            screen.x / self.viewport.x * 2.0 - 1.0,
            -(screen.y / self.viewport.y) * 2.0 + 1.0,
        )
    }

    /// World-space ray from the camera through an NDC point.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection().inverse();
        let through = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 0.5));
        Ray::new(self.position, through - self.position)
    }

    pub fn ray_from_screen(&self, screen: Vec2) -> Ray {
        self.ray_from_ndc(self.screen_to_ndc(screen))
    }
}
