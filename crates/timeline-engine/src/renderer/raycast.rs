use glam::{Mat4, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance along the ray to the unit quad (`[-0.5, 0.5]²` at z = 0)
    /// mapped by `transform`, if the ray hits it. Both faces count.
    pub fn intersect_quad(&self, transform: &Mat4) -> Option<f32> {
        let centre = transform.transform_point3(Vec3::ZERO);
        let axis_u = transform.transform_vector3(Vec3::X);
        let axis_v = transform.transform_vector3(Vec3::Y);
        let normal = axis_u.cross(axis_v);

        let denom = self.direction.dot(normal);
        if denom.abs() < 1e-8 {
            return None;
        }
        let t = (centre - self.origin).dot(normal) / denom;
        if t < 0.0 {
            return None;
        }

        let offset = self.at(t) - centre;
        let u = offset.dot(axis_u) / axis_u.length_squared();
        let v = offset.dot(axis_v) / axis_v.length_squared();
        (u.abs() <= 0.5 && v.abs() <= 0.5).then_some(t)
    }
}

/// One raycast hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit<T> {
    pub target: T,
    pub distance: f32,
}

/// Test every candidate and return hits sorted nearest first.
pub fn cast<T: Copy>(ray: &Ray, candidates: impl IntoIterator<Item = (T, Mat4)>) -> Vec<Hit<T>> {
    let mut hits: Vec<Hit<T>> = candidates
        .into_iter()
        .filter_map(|(target, transform)| {
            ray.intersect_quad(&transform).map(|distance| Hit { target, distance })
        })
        .collect();
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_at(x: f32, y: f32, z: f32, size: f32) -> Mat4 {
        Mat4::from_translation(Vec3::new(x, y, z)) * Mat4::from_scale(Vec3::new(size, size, 1.0))
    }

    fn down_z() -> Ray {
        Ray::new(Vec3::new(0.0, 0.0, 800.0), Vec3::NEG_Z)
    }

    #[test]
    fn hits_quad_in_front() {
        let t = down_z().intersect_quad(&quad_at(0.0, 0.0, -200.0, 100.0));
        assert_eq!(t, Some(1000.0));
    }

    #[test]
    fn misses_outside_extent() {
        assert_eq!(down_z().intersect_quad(&quad_at(60.0, 0.0, 0.0, 100.0)), None);
        assert!(down_z().intersect_quad(&quad_at(40.0, 0.0, 0.0, 100.0)).is_some());
    }

    #[test]
    fn ignores_quads_behind_origin() {
        assert_eq!(down_z().intersect_quad(&quad_at(0.0, 0.0, 900.0, 100.0)), None);
    }

    #[test]
    fn rotated_quad_still_hit() {
        let m = Mat4::from_rotation_z(0.7) * Mat4::from_scale(Vec3::new(200.0, 50.0, 1.0));
        assert!(down_z().intersect_quad(&m).is_some());
    }

    #[test]
    fn cast_sorts_nearest_first() {
        let hits = cast(
            &down_z(),
            [
                (1u32, quad_at(0.0, 0.0, -500.0, 100.0)),
                (2u32, quad_at(0.0, 0.0, 100.0, 100.0)),
                (3u32, quad_at(500.0, 0.0, 0.0, 100.0)),
            ],
        );
        let order: Vec<u32> = hits.iter().map(|h| h.target).collect();
        assert_eq!(order, vec![2, 1]);
    }
}
