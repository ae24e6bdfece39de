use glam::{Mat4, Vec3, Vec4};

/// View frustum as six inward-facing planes `(normal, d)`.
/// Extracted once per frame and reused for every visibility test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    planes: [Vec4; 6],
}

impl Frustum {
    /// Planes of a view-projection matrix with a [0, 1] depth range.
    pub fn from_view_projection(m: &Mat4) -> Self {
        let r0 = m.row(0);
        let r1 = m.row(1);
        let r2 = m.row(2);
        let r3 = m.row(3);
        let planes = [r3 + r0, r3 - r0, r3 + r1, r3 - r1, r2, r3 - r2].map(|p| {
            let len = p.truncate().length();
            if len > 0.0 {
                p / len
            } else {
                p
            }
        });
        Self { planes }
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        self.intersects_sphere(point, 0.0)
    }

    pub fn intersects_sphere(&self, centre: Vec3, radius: f32) -> bool {
        self.planes
            .iter()
            .all(|p| p.truncate().dot(centre) + p.w >= -radius)
    }

    /// Test the unit quad mapped by `transform` via its bounding sphere.
    pub fn intersects_quad(&self, transform: &Mat4) -> bool {
        let centre = transform.transform_point3(Vec3::ZERO);
        let corner = transform.transform_point3(Vec3::new(0.5, 0.5, 0.0));
        let other = transform.transform_point3(Vec3::new(0.5, -0.5, 0.0));
        let radius = (corner - centre).length().max((other - centre).length());
        self.intersects_sphere(centre, radius)
    }
}

impl Default for Frustum {
    /// Accepts everything.
    fn default() -> Self {
        Self {
            planes: [Vec4::new(0.0, 0.0, 0.0, 1.0); 6],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::Viewport;
    use crate::renderer::camera::PerspectiveCamera;

    fn frustum() -> Frustum {
        let cam = PerspectiveCamera::new(&Viewport::new(1400.0, 900.0, 1.0), 800.0, 1.0, 2000.0);
        Frustum::from_view_projection(&cam.view_projection())
    }

    #[test]
    fn point_in_front_visible() {
        assert!(frustum().contains_point(Vec3::new(0.0, 0.0, 0.0)));
        assert!(frustum().contains_point(Vec3::new(600.0, 400.0, 0.0)));
    }

    #[test]
    fn points_outside_rejected() {
        let f = frustum();
        assert!(!f.contains_point(Vec3::new(0.0, 0.0, 900.0)), "behind camera");
        assert!(!f.contains_point(Vec3::new(0.0, 0.0, -1500.0)), "past far plane");
        assert!(!f.contains_point(Vec3::new(900.0, 0.0, 0.0)), "right of view");
    }

    #[test]
    fn quad_straddling_edge_visible() {
        let m = Mat4::from_translation(Vec3::new(750.0, 0.0, 0.0)) * Mat4::from_scale(Vec3::new(200.0, 200.0, 1.0));
        assert!(frustum().intersects_quad(&m));
    }

    #[test]
    fn default_accepts_all() {
        assert!(Frustum::default().contains_point(Vec3::splat(1e6)));
    }
}
